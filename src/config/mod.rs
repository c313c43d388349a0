use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://jservice.io/api";
pub const DEFAULT_POOL_SIZE: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Colour overrides as `#RRGGBB` or `#RGB` strings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ThemeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of a jService-compatible API
    pub api_base_url: String,

    /// How many categories to list before drawing six
    pub candidate_pool_size: usize,

    /// Per-request timeout
    pub request_timeout_secs: u64,

    pub theme: ThemeOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            candidate_pool_size: DEFAULT_POOL_SIZE,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            theme: ThemeOverrides::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("trivia-board");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or fall back to defaults. The file is only read.
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match Self::from_toml(&content) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", path.display());
                        return Ok(config);
                    }
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        Ok(AppConfig::default())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;

        // Drawing six categories needs at least six candidates
        if config.candidate_pool_size < crate::game::board::CATEGORY_COUNT {
            tracing::warn!(
                "candidate_pool_size {} too small, using {}",
                config.candidate_pool_size,
                DEFAULT_POOL_SIZE
            );
            config.candidate_pool_size = DEFAULT_POOL_SIZE;
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            api_base_url: "http://localhost:3000/api".to_string(),
            candidate_pool_size: 40,
            request_timeout_secs: 3,
            theme: ThemeOverrides {
                mask: Some("#ffcc00".to_string()),
                ..Default::default()
            },
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized = AppConfig::from_toml(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::from_toml("request_timeout_secs = 30\n").unwrap();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.candidate_pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.theme, ThemeOverrides::default());
    }

    #[test]
    fn test_tiny_pool_is_replaced() {
        let config = AppConfig::from_toml("candidate_pool_size = 3\n").unwrap();
        assert_eq!(config.candidate_pool_size, DEFAULT_POOL_SIZE);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(AppConfig::from_toml("candidate_pool_size = \"lots\"").is_err());
    }
}
