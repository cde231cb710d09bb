//! Where the service keeps its settings file and model files, per platform,
//! via the `dirs` crate.
//!
//! | | settings | models |
//! |---|---|---|
//! | Linux | `~/.config/live-transcribe/settings.toml` | `~/.local/share/live-transcribe/models/` |
//! | macOS | `~/Library/Application Support/live-transcribe/settings.toml` | `~/Library/Application Support/live-transcribe/models/` |
//! | Windows | `%APPDATA%\live-transcribe\settings.toml` | `%LOCALAPPDATA%\live-transcribe\models\` |
//!
//! Containers without a home directory fall back to the working directory.

use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "live-transcribe";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
    /// GGML model files.
    pub models_dir: PathBuf,
}

impl AppPaths {
    /// Resolve against the platform's config and local-data directories.
    pub fn new() -> Self {
        let here = || PathBuf::from(".");
        Self::under(
            &dirs::config_dir().unwrap_or_else(here),
            &dirs::data_local_dir().unwrap_or_else(here),
        )
    }

    /// Lay the service directories out under explicit roots.
    pub fn under(config_root: &Path, data_root: &Path) -> Self {
        let config_dir = config_root.join(APP_NAME);
        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            models_dir: data_root.join(APP_NAME).join("models"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_roots() {
        let paths = AppPaths::under(Path::new("/etc/xdg"), Path::new("/var/lib"));
        assert_eq!(paths.config_dir, Path::new("/etc/xdg/live-transcribe"));
        assert_eq!(paths.settings_file, Path::new("/etc/xdg/live-transcribe/settings.toml"));
        assert_eq!(paths.models_dir, Path::new("/var/lib/live-transcribe/models"));
    }

    #[test]
    fn platform_paths_end_in_service_dirs() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.ends_with(APP_NAME));
        assert!(paths.models_dir.ends_with(Path::new(APP_NAME).join("models")));
    }
}
