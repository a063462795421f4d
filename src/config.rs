use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

use crate::db::LinkAction;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where link snapshots come from: a JSON file path or an http(s) URL
    pub source: String,

    /// Poll interval in seconds (default: 5)
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// HTTP request timeout in seconds (default: 5)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Actions that get logged, e.g. ["new", "remove"] (default: all)
    #[serde(default = "default_actions")]
    pub actions: Vec<LinkAction>,
}

impl Config {
    /// Load config from TOML file
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Box<dyn Error>> {
        let config: Config = toml::from_str(content)?;

        if config.source.trim().is_empty() {
            return Err("source must not be empty".into());
        }
        if config.interval == 0 {
            return Err("interval must be > 0".into());
        }

        Ok(config)
    }

    /// Get poll interval as Duration
    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn default_interval() -> u64 {
    5
}

fn default_timeout() -> u64 {
    5
}

fn default_actions() -> Vec<LinkAction> {
    LinkAction::ALL.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml(r#"source = "links.json""#).expect("minimal config should parse");

        assert_eq!(config.source, "links.json");
        assert_eq!(config.interval_duration(), Duration::from_secs(5));
        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert_eq!(config.actions, LinkAction::ALL.to_vec());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            source = "http://127.0.0.1:7570/links"
            interval = 30
            timeout = 2
            actions = ["new", 2]
            "#,
        )
        .expect("full config should parse");

        assert_eq!(config.interval, 30);
        assert_eq!(config.timeout, 2);
        assert_eq!(config.actions, vec![LinkAction::New, LinkAction::Remove]);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = Config::from_toml(r#"source = "  ""#).expect_err("empty source should fail");
        assert!(err.to_string().contains("source"));

        let err = Config::from_toml("source = \"links.json\"\ninterval = 0").expect_err("zero interval should fail");
        assert!(err.to_string().contains("interval"));

        assert!(Config::from_toml("source = \"links.json\"\nactions = [\"rename\"]").is_err());
        assert!(Config::from_toml("interval = 5").is_err());
    }
}
