//! Configuration file support for storycast

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the chat-completions provider
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature; 0 keeps extraction as deterministic as the
    /// provider allows
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

// Defaults

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.0
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            request_timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default config location (~/.config/storycast/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("storycast/config.toml"))
    }

    /// Resolve the API key from the config file or the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.request_timeout_secs, 120);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("model = \"gpt-4.1-mini\"").unwrap();
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.endpoint, "https://api.openai.com/v1");
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.model = "test-model".to_string();
        config.to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.model, "test-model");
        assert_eq!(loaded.endpoint, config.endpoint);
    }

    #[test]
    fn test_file_key_wins_over_environment() {
        let config = Config {
            api_key: Some("sk-from-file".to_string()),
            ..Config::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-from-file"));
    }
}
