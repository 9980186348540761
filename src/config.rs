//! WanderLog configuration.
//!
//! Loaded from `~/.wanderlog/config.toml`. Every key is optional; a missing
//! file means defaults. The API key can also come from the environment.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Location label used until the traveller sets one.
pub const DEFAULT_LOCATION: &str = "Current Location";

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables checked, in order, for the enrichment API key.
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// WanderLog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Location label for new drafts.
    pub default_location: String,

    /// Where the journal lives. Defaults to `~/.wanderlog/`.
    pub data_dir: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,

    pub enrichment: EnrichmentConfig,
}

/// Settings for the caption and weather service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EnrichmentConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL up to and including the API version.
    pub endpoint: String,
    /// Upper bound on one enrichment request.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_location: DEFAULT_LOCATION.to_string(),
            data_dir: None,
            log_level: "warn".to_string(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EnrichmentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load config from `~/.wanderlog/config.toml`, then apply environment
    /// overrides. Returns an error only if the file exists and is invalid.
    pub fn load() -> Result<Self, String> {
        let path = Self::path().ok_or("could not determine home directory")?;

        let config = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Parse config from TOML text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply environment overrides using `lookup` to read variables.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = API_KEY_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|v| !v.is_empty()))
        {
            self.enrichment.api_key = Some(key);
        }
        self
    }

    /// The config file path: `~/.wanderlog/config.toml`.
    pub fn path() -> Option<PathBuf> {
        Self::home().map(|h| h.join("config.toml"))
    }

    /// The directory holding the journal database.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(Self::home)
    }

    fn home() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".wanderlog"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.default_location, "Current Location");
        assert_eq!(config.enrichment.timeout_secs, 30);
    }

    #[test]
    fn parses_kebab_case_keys() {
        let config = Config::parse(
            r#"
            default-location = "Kyoto"
            data-dir = "/tmp/wanderlog"
            log-level = "debug"

            [enrichment]
            api-key = "secret"
            timeout-secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.default_location, "Kyoto");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/wanderlog")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.enrichment.api_key.as_deref(), Some("secret"));
        assert_eq!(config.enrichment.timeout(), Duration::from_secs(5));
        assert_eq!(config.enrichment.model, DEFAULT_MODEL);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::parse("log-level = 3").is_err());
    }

    #[test]
    fn env_key_overrides_file_key() {
        let config = Config::parse("[enrichment]\napi-key = \"from-file\"")
            .unwrap()
            .with_env_overrides(|name| (name == "API_KEY").then(|| "from-env".to_string()));

        assert_eq!(config.enrichment.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn gemini_var_wins_over_generic_var() {
        let config = Config::default().with_env_overrides(|name| match name {
            "GEMINI_API_KEY" => Some("gemini".to_string()),
            "API_KEY" => Some("generic".to_string()),
            _ => None,
        });

        assert_eq!(config.enrichment.api_key.as_deref(), Some("gemini"));
    }

    #[test]
    fn empty_env_value_is_ignored() {
        let config = Config::parse("[enrichment]\napi-key = \"from-file\"")
            .unwrap()
            .with_env_overrides(|_| Some(String::new()));

        assert_eq!(config.enrichment.api_key.as_deref(), Some("from-file"));
    }
}
