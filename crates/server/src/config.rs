//! # Application Configuration
//!
//! This module defines the configuration structure for `docstruct-server` and
//! loads it from programmatic defaults, an optional `config.yml` file and
//! environment variables, in that order of precedence (last wins).

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use docstruct::providers::{
    ai::openai::{DEFAULT_OPENAI_API_URL, DEFAULT_OPENAI_MODEL},
    ocr::mistral::{DEFAULT_MISTRAL_OCR_API_URL, DEFAULT_MISTRAL_OCR_MODEL},
};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("placeholder pattern is valid")
});

/// A custom error type for configuration issues.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    #[error("Configuration error: {0}")]
    General(String),
    /// An explicitly requested configuration file does not exist.
    #[error("Config file not found at '{0}'.")]
    NotFound(String),
    /// A required credential is unset or empty.
    #[error("'{0}' must be set (e.g. in the environment or in .env)")]
    MissingCredential(&'static str),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// Settings for the OCR service.
#[derive(Debug, Deserialize, Clone)]
pub struct OcrSettings {
    pub api_url: String,
    pub model: String,
}

/// Settings for the structuring chat model.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmSettings {
    pub api_url: String,
    pub model: String,
    /// Request a JSON-object response format from the model.
    #[serde(default)]
    pub json_mode: bool,
}

/// Retry behavior for both upstream calls.
#[derive(Debug, Deserialize, Clone)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    pub port: u16,
    /// Loaded from `MISTRAL_API_KEY`.
    #[serde(default)]
    pub mistral_api_key: String,
    /// Loaded from `OPENAI_API_KEY`.
    #[serde(default)]
    pub openai_api_key: String,
    pub ocr: OcrSettings,
    pub llm: LlmSettings,
    /// Where uploads are staged while they are processed.
    pub temp_dir: PathBuf,
    /// Where structured documents are saved.
    pub output_dir: PathBuf,
    /// Reject model output that does not match the document schema.
    pub strict_validation: bool,
    pub retry: RetrySettings,
    /// Per-request timeout for upstream calls. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Largest accepted `/ingest` request body.
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.retry.initial_backoff_ms)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("mistral_api_key", &redact(&self.mistral_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("ocr", &self.ocr)
            .field("llm", &self.llm)
            .field("temp_dir", &self.temp_dir)
            .field("output_dir", &self.output_dir)
            .field("strict_validation", &self.strict_validation)
            .field("retry", &self.retry)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

// Reads a file and substitutes `${VAR}` placeholders from the environment.
// Returns Ok(None) if the file does not exist. Unset variables become empty.
fn read_and_substitute(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::General(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let expanded = ENV_PLACEHOLDER.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded.into_owned()))
}

/// Loads the application configuration.
///
/// Layers, lowest precedence first:
/// 1. Built-in defaults.
/// 2. `config.yml` in the server crate directory, or `config_path_override`
///    (which must exist when given).
/// 3. Plain environment variables for top-level keys (`PORT`, `MISTRAL_API_KEY`,
///    `OUTPUT_DIR`, ...).
/// 4. `DOCSTRUCT_` variables for nested keys (e.g. `DOCSTRUCT_LLM__JSON_MODE`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder()
        .set_default("port", 8000)?
        .set_default("ocr.api_url", DEFAULT_MISTRAL_OCR_API_URL)?
        .set_default("ocr.model", DEFAULT_MISTRAL_OCR_MODEL)?
        .set_default("llm.api_url", DEFAULT_OPENAI_API_URL)?
        .set_default("llm.model", DEFAULT_OPENAI_MODEL)?
        .set_default("llm.json_mode", false)?
        .set_default("temp_dir", "app/temp")?
        .set_default("output_dir", "app/output")?
        .set_default("strict_validation", false)?
        .set_default("retry.max_attempts", 1)?
        .set_default("retry.initial_backoff_ms", 500)?
        .set_default("max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES)?;

    let config_path = match config_path_override {
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            path
        }
        None => Path::new(env!("CARGO_MANIFEST_DIR")).join("config.yml"),
    };

    if let Some(content) = read_and_substitute(&config_path)? {
        info!("Loading configuration from '{}'.", config_path.display());
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("DOCSTRUCT")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;

    if config.mistral_api_key.trim().is_empty() {
        return Err(ConfigError::MissingCredential("MISTRAL_API_KEY"));
    }
    if config.openai_api_key.trim().is_empty() {
        return Err(ConfigError::MissingCredential("OPENAI_API_KEY"));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_substituted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "a: \"${DOCSTRUCT_UNIT_TEST_PLACEHOLDER_UNSET}\"\nb: plain\n").unwrap();

        let content = read_and_substitute(&path).unwrap().unwrap();
        assert_eq!(content, "a: \"\"\nb: plain\n");
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_and_substitute(&dir.path().join("nope.yml"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn debug_output_hides_credentials() {
        let config = AppConfig {
            port: 8000,
            mistral_api_key: "mistral-secret".into(),
            openai_api_key: String::new(),
            ocr: OcrSettings {
                api_url: DEFAULT_MISTRAL_OCR_API_URL.into(),
                model: DEFAULT_MISTRAL_OCR_MODEL.into(),
            },
            llm: LlmSettings {
                api_url: DEFAULT_OPENAI_API_URL.into(),
                model: DEFAULT_OPENAI_MODEL.into(),
                json_mode: false,
            },
            temp_dir: "app/temp".into(),
            output_dir: "app/output".into(),
            strict_validation: false,
            retry: RetrySettings {
                max_attempts: 1,
                initial_backoff_ms: 500,
            },
            request_timeout_secs: None,
            max_upload_bytes: 1024,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("mistral-secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("<unset>"));
    }
}
