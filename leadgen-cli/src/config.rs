use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds. Research and SEO calls scrape the
    /// target site server-side and can take a while.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

pub static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Load `config.toml` from the working directory into `CONFIG`.
/// A missing file is not an error; defaults apply.
pub fn read_config() -> anyhow::Result<()> {
    let path = "config.toml";
    let config = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(e) => return Err(e.into()),
    };

    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Config already loaded"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: AppConfig = toml::from_str("api_base_url = \"http://example.com/api\"").unwrap();
        assert_eq!(config.api_base_url, "http://example.com/api");
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.api_base_url, AppConfig::default().api_base_url);
    }
}
