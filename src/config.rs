use crate::error::QuizError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_REQUEST_DELAY_SECS: f64 = 1.0;
pub const HOME_ENV_VAR: &str = "TOPIC_QUIZ_HOME";

const CONFIG_FILE_NAME: &str = "config.json";
const CONTENT_DIR_NAME: &str = "organized_content";
const SETTINGS_FILE_NAME: &str = "settings.json";
const LOG_FILE_NAME: &str = "quiz_debug.log";

const REQUIRED_KEYS: [&str; 3] = ["api_key", "model_name", "context_window"];

/// Every file location the application touches, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub base_dir: PathBuf,
    pub config_file: PathBuf,
    pub content_dir: PathBuf,
    pub settings_file: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn from_base(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            config_file: base_dir.join(CONFIG_FILE_NAME),
            content_dir: base_dir.join(CONTENT_DIR_NAME),
            settings_file: base_dir.join(SETTINGS_FILE_NAME),
            log_file: base_dir.join(LOG_FILE_NAME),
            base_dir,
        }
    }

    /// `$TOPIC_QUIZ_HOME` when set, otherwise the directory holding the executable.
    pub fn discover() -> Result<Self, QuizError> {
        if let Ok(home) = std::env::var(HOME_ENV_VAR)
            && !home.trim().is_empty()
        {
            return Ok(Self::from_base(home));
        }

        let exe = std::env::current_exe()?;
        let base = exe
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| QuizError::Config("Cannot resolve executable directory".into()))?;
        Ok(Self::from_base(base))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model_name: String,
    /// Required to be present; not used by generation.
    pub context_window: serde_json::Value,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub request_delay_seconds: Option<f64>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl GenerationConfig {
    pub fn load(path: &Path) -> Result<Self, QuizError> {
        if !path.exists() {
            return Err(QuizError::Config(format!(
                "Config file not found at: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, QuizError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| QuizError::Config(format!("Config is not valid JSON: {}", e)))?;

        let object = value
            .as_object()
            .ok_or_else(|| QuizError::Config("Config must be a JSON object".into()))?;

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !object.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(QuizError::Config(format!(
                "Config missing {}.",
                missing
                    .iter()
                    .map(|k| format!("'{}'", k))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let config: GenerationConfig = serde_json::from_value(value)
            .map_err(|e| QuizError::Config(format!("Invalid config value: {}", e)))?;

        if let Some(delay) = config.request_delay_seconds
            && (!delay.is_finite() || delay < 0.0)
        {
            return Err(QuizError::Config(format!(
                "'request_delay_seconds' must be a non-negative number, got {}",
                delay
            )));
        }

        Ok(config)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(
            self.request_delay_seconds
                .unwrap_or(DEFAULT_REQUEST_DELAY_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "api_key": "sk-test",
        "model_name": "some/model",
        "context_window": 128000
    }"#;

    #[test]
    fn test_paths_from_base() {
        let paths = AppPaths::from_base("/opt/quiz");
        assert_eq!(paths.config_file, PathBuf::from("/opt/quiz/config.json"));
        assert_eq!(
            paths.content_dir,
            PathBuf::from("/opt/quiz/organized_content")
        );
        assert_eq!(paths.settings_file, PathBuf::from("/opt/quiz/settings.json"));
        assert_eq!(paths.log_file, PathBuf::from("/opt/quiz/quiz_debug.log"));
    }

    #[test]
    fn test_load_valid_config_defaults() {
        let config = GenerationConfig::from_json(VALID).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model_name, "some/model");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_custom_url_and_delay() {
        let raw = r#"{
            "api_key": "k",
            "model_name": "m",
            "context_window": 8192,
            "api_url": "http://localhost:9000/v1/chat/completions",
            "request_delay_seconds": 2.5
        }"#;
        let config = GenerationConfig::from_json(raw).unwrap();
        assert_eq!(config.api_url, "http://localhost:9000/v1/chat/completions");
        assert_eq!(config.request_delay(), Duration::from_millis(2500));
    }

    #[test]
    fn test_missing_required_keys() {
        let raw = r#"{"api_key": "k"}"#;
        let err = GenerationConfig::from_json(raw).unwrap_err();
        match err {
            QuizError::Config(msg) => {
                assert!(msg.contains("'model_name'"));
                assert!(msg.contains("'context_window'"));
                assert!(!msg.contains("'api_key'"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_negative_delay_rejected() {
        let raw = r#"{"api_key": "k", "model_name": "m", "context_window": 1, "request_delay_seconds": -1}"#;
        assert!(matches!(
            GenerationConfig::from_json(raw),
            Err(QuizError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(
            GenerationConfig::from_json("not json"),
            Err(QuizError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GenerationConfig::load(&dir.path().join("config.json")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, VALID).unwrap();
        let config = GenerationConfig::load(&path).unwrap();
        assert_eq!(config.model_name, "some/model");
    }
}
