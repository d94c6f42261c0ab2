use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Default Ollama endpoint used when `OLLAMA_URL` is unset.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Default checkpoint requested from the summarization runtime.
pub const DEFAULT_SUMMARIZATION_MODEL: &str = "llama3.2";
/// Default input budget (in characters) applied before inference.
pub const DEFAULT_INPUT_CHAR_LIMIT: usize = 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for SumItUp.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Backend that produces summaries.
    pub summarization_provider: SummarizationProvider,
    /// Checkpoint name passed to the provider.
    pub summarization_model: String,
    /// Base URL of the Ollama runtime.
    pub ollama_url: String,
    /// Refuse to download a checkpoint that is not already present.
    pub offline: bool,
    /// Keep inference on the CPU.
    pub force_cpu: bool,
    /// Character budget applied to the input before inference; `None` disables truncation.
    pub input_char_limit: Option<usize>,
    /// Summary length used when a request does not carry one.
    pub default_summary_length: u32,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Supported summarization backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizationProvider {
    /// Pre-trained checkpoint served by a local Ollama runtime.
    Ollama,
    /// Deterministic in-process sentence extraction.
    Extractive,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            summarization_provider: SummarizationProvider::Ollama,
            summarization_model: DEFAULT_SUMMARIZATION_MODEL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            offline: false,
            force_cpu: false,
            input_char_limit: Some(DEFAULT_INPUT_CHAR_LIMIT),
            default_summary_length: crate::pipeline::SummaryLength::DEFAULT,
            server_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            summarization_provider: load_env_optional("SUMMARIZATION_PROVIDER")
                .map(|value| {
                    value.parse().map_err(|()| {
                        ConfigError::InvalidValue("SUMMARIZATION_PROVIDER".to_string())
                    })
                })
                .transpose()?
                .unwrap_or(defaults.summarization_provider),
            summarization_model: load_env_optional("SUMMARIZATION_MODEL")
                .unwrap_or(defaults.summarization_model),
            ollama_url: load_env_optional("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            offline: load_flag("SUMITUP_OFFLINE")?,
            force_cpu: load_flag("SUMITUP_FORCE_CPU")?,
            input_char_limit: match load_env_optional("SUMITUP_INPUT_CHAR_LIMIT") {
                Some(value) => {
                    let limit: usize = value.parse().map_err(|_| {
                        ConfigError::InvalidValue("SUMITUP_INPUT_CHAR_LIMIT".to_string())
                    })?;
                    (limit > 0).then_some(limit)
                }
                None => defaults.input_char_limit,
            },
            default_summary_length: load_env_optional("SUMMARY_LENGTH_DEFAULT")
                .map(|value| {
                    value
                        .parse::<u32>()
                        .ok()
                        .filter(|length| crate::pipeline::SummaryLength::RANGE.contains(length))
                        .ok_or_else(|| ConfigError::InvalidValue("SUMMARY_LENGTH_DEFAULT".into()))
                })
                .transpose()?
                .unwrap_or(defaults.default_summary_length),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_flag(key: &str) -> Result<bool, ConfigError> {
    match load_env_optional(key) {
        None => Ok(false),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(key.to_string())),
        },
    }
}

impl std::str::FromStr for SummarizationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "extractive" => Ok(Self::Extractive),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        provider = ?config.summarization_provider,
        model = %config.summarization_model,
        ollama_url = %config.ollama_url,
        offline = config.offline,
        force_cpu = config.force_cpu,
        input_char_limit = ?config.input_char_limit,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!(
            "Ollama".parse::<SummarizationProvider>(),
            Ok(SummarizationProvider::Ollama)
        );
        assert_eq!(
            " extractive ".parse::<SummarizationProvider>(),
            Ok(SummarizationProvider::Extractive)
        );
        assert!("bart".parse::<SummarizationProvider>().is_err());
    }

    #[test]
    fn defaults_match_the_slider_and_input_budget() {
        let config = Config::default();
        assert_eq!(config.default_summary_length, 250);
        assert_eq!(config.input_char_limit, Some(1024));
        assert!(!config.offline);
        assert_eq!(config.ollama_url, DEFAULT_OLLAMA_URL);
    }
}
