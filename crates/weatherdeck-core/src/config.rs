//! Application configuration management.
//!
//! Configuration is stored at `~/.config/weatherdeck/config.json` and can be
//! overridden through environment variables (a `.env` file is honored by the
//! binary before this module runs):
//!
//! - `WEATHERDECK_ACCESS_KEY` - provider API key, required for live mode
//! - `WEATHERDECK_MOCK` - force the mock provider on or off
//! - `WEATHERDECK_PAID_ENDPOINTS` - enable the historical/forecast calls
//!   gated behind the provider's paid subscription tier

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "weatherdeck";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub access_key: Option<String>,
    pub mock_enabled: Option<bool>,
    pub paid_endpoints: Option<bool>,
    pub last_query: Option<String>,
}

impl Config {
    /// Load from disk (missing file yields defaults), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("WEATHERDECK_ACCESS_KEY") {
            if !key.is_empty() {
                self.access_key = Some(key);
            }
        }
        if let Some(flag) = env_flag("WEATHERDECK_MOCK") {
            self.mock_enabled = Some(flag);
        }
        if let Some(flag) = env_flag("WEATHERDECK_PAID_ENDPOINTS") {
            self.paid_endpoints = Some(flag);
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Whether the mock provider is active.
    /// Defaults to mock whenever no access key is configured, so the app
    /// works out of the box.
    pub fn is_mock_enabled(&self) -> bool {
        self.mock_enabled
            .unwrap_or_else(|| self.access_key.is_none())
    }

    /// Whether the historical and forecast endpoints may be called
    pub fn paid_endpoints_enabled(&self) -> bool {
        self.paid_endpoints.unwrap_or(false)
    }
}

/// Parse a boolean environment variable. Unset or unrecognized values
/// leave the configured value untouched.
fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("yes"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_mock_defaults_to_key_presence() {
        let mut config = Config::default();
        assert!(config.is_mock_enabled());

        config.access_key = Some("abc123".to_string());
        assert!(!config.is_mock_enabled());

        // explicit flag wins over key presence
        config.mock_enabled = Some(true);
        assert!(config.is_mock_enabled());
    }

    #[test]
    fn test_paid_endpoints_default_off() {
        assert!(!Config::default().paid_endpoints_enabled());
    }
}
