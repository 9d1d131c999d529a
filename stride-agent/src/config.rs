// stride-agent/src/config.rs
// Configuration management

use crate::narrative::NarrativeConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stride_core::Catalog;
use tracing::{info, warn};

pub const API_KEY_ENV: &str = "STRIDE_AGENT_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub narrative: NarrativeConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// JSON catalog replacing the built-in knowledge base
    pub catalog_path: Option<String>,
    pub include_profile: bool,
    pub include_references: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Try to load from file, fallback to default
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path);
                    Ok(config)
                }
                Err(e) => {
                    warn!("Failed to parse config file {}, using defaults: {:#}", path, e);
                    Ok(Self::default())
                }
            },
            Err(_) => {
                warn!("Config file {} not found, using defaults", path);
                Ok(Self::default())
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid TOML configuration")
    }

    /// Fills the API key from the environment when neither file nor flags set one
    pub fn apply_env(&mut self, env_key: Option<String>) {
        let missing = self
            .narrative
            .api_key
            .as_deref()
            .map_or(true, str::is_empty);
        if missing {
            if let Some(key) = env_key.filter(|k| !k.is_empty()) {
                self.narrative.api_key = Some(key);
            }
        }
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.analysis.catalog_path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read catalog {}", path))?;
                let catalog = Catalog::from_json(&text)
                    .with_context(|| format!("failed to load catalog {}", path))?;
                info!("Using catalog from {}", path);
                Ok(catalog)
            }
            None => Ok(Catalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::parse(
            r#"
            [narrative]
            enabled = true
            provider = "gemini"

            [output]
            pretty = true
            "#,
        )
        .unwrap();

        assert!(config.narrative.enabled);
        assert_eq!(config.narrative.provider, "gemini");
        assert_eq!(config.narrative.timeout_secs, 30);
        assert!(config.output.pretty);
        assert!(!config.analysis.include_profile);
        assert!(config.analysis.catalog_path.is_none());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load("/nonexistent/stride-agent.toml").unwrap();
        assert_eq!(config.narrative.provider, "local");
        assert!(!config.narrative.enabled);
    }

    #[test]
    fn test_invalid_toml_is_an_error_when_parsed_directly() {
        assert!(Config::parse("narrative = [").is_err());
    }

    #[test]
    fn test_env_key_only_fills_gaps() {
        let mut config = Config::default();
        config.apply_env(Some("from-env".to_string()));
        assert_eq!(config.narrative.api_key.as_deref(), Some("from-env"));

        config.narrative.api_key = Some("from-file".to_string());
        config.apply_env(Some("from-env".to_string()));
        assert_eq!(config.narrative.api_key.as_deref(), Some("from-file"));

        let mut empty = Config::default();
        empty.apply_env(Some(String::new()));
        assert!(empty.narrative.api_key.is_none());
    }

    #[test]
    fn test_builtin_catalog_without_path() {
        let catalog = Config::default().load_catalog().unwrap();
        assert_eq!(catalog, Catalog::builtin());

        let mut config = Config::default();
        config.analysis.catalog_path = Some("/nonexistent/catalog.json".to_string());
        assert!(config.load_catalog().is_err());
    }
}
