//! Service settings structs, defaults and TOML persistence.
//!
//! A settings file may name only the sections it wants to change; every
//! missing field falls back to its default.  Environment overrides are
//! applied on top of whatever the file produced.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::stt::engine::{MAX_AUDIO_SAMPLES, MIN_AUDIO_SAMPLES};

/// Environment variable that overrides the settings file location.
pub const CONFIG_PATH_ENV: &str = "LIVE_TRANSCRIBE_CONFIG";

/// The only input rate Whisper models accept.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Listener and scheduling settings for the connection server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g. `"0.0.0.0"`, `"127.0.0.1"`).
    pub host: String,
    /// TCP port for HTTP and WebSocket traffic.
    pub port: u16,
    /// Async worker threads.  `None` lets tokio pick one per core.
    pub worker_threads: Option<usize>,
    /// Upper bound on tokio's blocking pool; a running inference holds one
    /// thread of it while queued windows hold none.
    pub max_blocking_threads: usize,
    /// Capacity of each session's inbound and outbound frame queues.
    pub channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            worker_threads: None,
            max_blocking_threads: 4,
            channel_capacity: 64,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Windowing settings.  Fixed for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sample rate of inbound PCM (mono, 16-bit).  Must be
    /// [`WHISPER_SAMPLE_RATE`].
    pub sample_rate: u32,
    /// Length of each transcription window in seconds.
    pub window_secs: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: WHISPER_SAMPLE_RATE,
            window_secs: 3,
        }
    }
}

impl AudioConfig {
    /// Number of samples in one window (`sample_rate × window_secs`).
    ///
    /// ```
    /// use live_transcribe::config::AudioConfig;
    ///
    /// assert_eq!(AudioConfig::default().window_size(), 48_000);
    /// ```
    pub fn window_size(&self) -> usize {
        self.sample_rate as usize * self.window_secs as usize
    }

    /// Reject settings every window would fail with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.sample_rate == WHISPER_SAMPLE_RATE,
            "audio.sample_rate must be {WHISPER_SAMPLE_RATE}, got {}",
            self.sample_rate
        );
        let window = self.window_size();
        ensure!(
            (MIN_AUDIO_SAMPLES..=MAX_AUDIO_SAMPLES).contains(&window),
            "audio.window_secs = {} gives {window} samples per window; \
             the engine accepts {MIN_AUDIO_SAMPLES}..={MAX_AUDIO_SAMPLES}",
            self.window_secs
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// GGML model name (e.g. `"base"`, `"small"`), resolved under the
    /// models directory.
    pub model: String,
    /// Explicit model file path; takes precedence over `model`.
    pub model_path: Option<PathBuf>,
    /// ISO-639-1 language code, or `"auto"` for Whisper's language detection.
    pub language: String,
    /// Beam width for decoding; `0` or `1` decodes greedily.
    pub beam_size: u32,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "base".into(),
            model_path: None,
            language: "auto".into(),
            beam_size: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// ScoringConfig
// ---------------------------------------------------------------------------

/// Settings for the external scoring collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base URL of the OpenAI-compatible API (no trailing path).
    pub base_url: String,
    /// API key sent as a bearer token.  `None` leaves scoring unconfigured.
    pub api_key: Option<String>,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Upper bound on a single scoring call, in seconds.
    pub timeout_secs: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.x.ai".into(),
            api_key: None,
            model: "grok-beta".into(),
            temperature: 0.3,
            timeout_secs: 30,
        }
    }
}

impl ScoringConfig {
    /// `true` when a non-empty API key is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level service configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use live_transcribe::config::AppConfig;
///
/// // Defaults when the file is missing, then environment overrides.
/// let config = AppConfig::load().unwrap().with_env_overrides();
/// println!("listening on {}", config.server.listen_addr());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub audio: AudioConfig,
    pub stt: SttConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    /// Load configuration from `$LIVE_TRANSCRIBE_CONFIG`, or from the
    /// platform `settings.toml` when the variable is unset.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolved settings file location.
    pub fn settings_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| AppPaths::new().settings_file)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in
    /// production, a map in tests).  Unparseable numeric values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("SCORING_API_KEY") {
            self.scoring.api_key = Some(key);
        }
        if let Some(url) = lookup("SCORING_BASE_URL") {
            self.scoring.base_url = url;
        }
        if let Some(model) = lookup("SCORING_MODEL") {
            self.scoring.model = model;
        }
        if let Some(path) = lookup("WHISPER_MODEL") {
            self.stt.model_path = Some(PathBuf::from(path));
        }
        if let Some(host) = lookup("LISTEN_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("LISTEN_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => log::warn!("ignoring LISTEN_PORT={port:?}: {e}"),
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use tempfile::tempdir;

    #[test]
    fn saved_settings_load_back() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.toml");

        let mut saved = AppConfig::default();
        saved.server.port = 8123;
        saved.server.worker_threads = Some(2);
        saved.audio.window_secs = 5;
        saved.stt.model = "small".into();
        saved.stt.model_path = Some(PathBuf::from("/srv/models/custom.bin"));
        saved.scoring.api_key = Some("xai-saved".into());
        saved.scoring.temperature = 0.1;
        saved.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(loaded.server.port, 8123);
        assert_eq!(loaded.server.worker_threads, Some(2));
        assert_eq!(loaded.audio.window_size(), 80_000);
        assert_eq!(loaded.stt.model, "small");
        assert_eq!(loaded.stt.model_path, saved.stt.model_path);
        assert_eq!(loaded.scoring.api_key.as_deref(), Some("xai-saved"));
        assert!((loaded.scoring.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.audio.window_size(), 48_000);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.server.listen_addr(), "0.0.0.0:8000");
        assert_eq!(cfg.server.channel_capacity, 64);
        assert_eq!(cfg.audio.sample_rate, 16_000);
        assert_eq!(cfg.audio.window_secs, 3);
        assert_eq!(cfg.stt.model, "base");
        assert!(cfg.stt.model_path.is_none());
        assert_eq!(cfg.scoring.model, "grok-beta");
        assert_eq!(cfg.scoring.timeout_secs, 30);
        assert!(!cfg.scoring.is_configured());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[server]\nport = 9100\n\n[scoring]\napi_key = \"xai-1\"\n")
            .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.audio.window_size(), 48_000);
        assert!(cfg.scoring.is_configured());
        assert_eq!(cfg.scoring.timeout_secs, 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[server\nport = ").expect("write");

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SCORING_API_KEY", "sk-env"),
            ("SCORING_BASE_URL", "http://127.0.0.1:9999"),
            ("WHISPER_MODEL", "/models/ggml-small.bin"),
            ("LISTEN_PORT", "9001"),
        ]);

        let cfg = AppConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.scoring.api_key.as_deref(), Some("sk-env"));
        assert_eq!(cfg.scoring.base_url, "http://127.0.0.1:9999");
        assert_eq!(
            cfg.stt.model_path.as_deref(),
            Some(Path::new("/models/ggml-small.bin"))
        );
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.scoring.model, "grok-beta");
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let cfg = AppConfig::default().with_overrides(|k| {
            (k == "LISTEN_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn default_audio_settings_validate() {
        assert!(AudioConfig::default().validate().is_ok());
        let one_minute = AudioConfig {
            window_secs: 60,
            ..AudioConfig::default()
        };
        assert!(one_minute.validate().is_ok());
    }

    #[test]
    fn non_whisper_sample_rate_is_rejected() {
        let audio = AudioConfig {
            sample_rate: 44_100,
            ..AudioConfig::default()
        };
        let err = audio.validate().unwrap_err().to_string();
        assert!(err.contains("16000"), "{err}");
    }

    #[test]
    fn window_lengths_outside_engine_range_are_rejected() {
        for window_secs in [0, 61] {
            let audio = AudioConfig {
                window_secs,
                ..AudioConfig::default()
            };
            assert!(audio.validate().is_err(), "window_secs = {window_secs}");
        }
    }

    #[test]
    fn blank_api_key_is_not_configured() {
        let scoring = ScoringConfig {
            api_key: Some("   ".into()),
            ..ScoringConfig::default()
        };
        assert!(!scoring.is_configured());
    }
}
