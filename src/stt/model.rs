//! Model metadata and path resolution.
//!
//! [`WHISPER_MODELS`] lists the standard multilingual GGML files the service
//! knows by name; [`resolve_model_path`] turns an [`SttConfig`] into the
//! on-disk file to load.

use std::path::PathBuf;

use crate::config::{AppPaths, SttConfig};

/// Static metadata for a single GGML model file.
#[derive(Debug)]
pub struct ModelInfo {
    /// Identifier used in `SttConfig::model` (e.g. `"base"`).
    pub id: &'static str,
    /// File name under the models directory.
    pub file_name: &'static str,
}

/// Standard OpenAI Whisper models converted to GGML.
pub const WHISPER_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "tiny",
        file_name: "ggml-tiny.bin",
    },
    ModelInfo {
        id: "base",
        file_name: "ggml-base.bin",
    },
    ModelInfo {
        id: "small",
        file_name: "ggml-small.bin",
    },
    ModelInfo {
        id: "medium",
        file_name: "ggml-medium.bin",
    },
];

/// Look up a known model by id.
pub fn find_model_by_id(id: &str) -> Option<&'static ModelInfo> {
    WHISPER_MODELS.iter().find(|m| m.id == id)
}

/// Resolve the model file for `config`.
///
/// An explicit `model_path` wins.  Otherwise a known id maps to its catalog
/// file name and an unknown id to `ggml-<id>.bin`, both under `paths.models_dir`.
pub fn resolve_model_path(config: &SttConfig, paths: &AppPaths) -> PathBuf {
    if let Some(path) = &config.model_path {
        return path.clone();
    }
    let file_name = match find_model_by_id(&config.model) {
        Some(info) => info.file_name.to_string(),
        None => format!("ggml-{}.bin", config.model),
    };
    paths.models_dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> AppPaths {
        AppPaths {
            config_dir: PathBuf::from("/cfg"),
            settings_file: PathBuf::from("/cfg/settings.toml"),
            models_dir: PathBuf::from("/models"),
        }
    }

    #[test]
    fn explicit_path_wins() {
        let config = SttConfig {
            model_path: Some(PathBuf::from("/opt/whisper.bin")),
            ..SttConfig::default()
        };
        assert_eq!(
            resolve_model_path(&config, &paths()),
            PathBuf::from("/opt/whisper.bin")
        );
    }

    #[test]
    fn known_id_uses_catalog_file_name() {
        let config = SttConfig::default();
        assert_eq!(
            resolve_model_path(&config, &paths()),
            PathBuf::from("/models/ggml-base.bin")
        );
    }

    #[test]
    fn unknown_id_falls_back_to_ggml_prefix() {
        let config = SttConfig {
            model: "large-v3-turbo".into(),
            ..SttConfig::default()
        };
        assert_eq!(
            resolve_model_path(&config, &paths()),
            PathBuf::from("/models/ggml-large-v3-turbo.bin")
        );
    }

    #[test]
    fn catalog_ids_are_unique() {
        for (i, a) in WHISPER_MODELS.iter().enumerate() {
            for b in &WHISPER_MODELS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
