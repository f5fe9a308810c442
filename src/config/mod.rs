use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;

pub const DEFAULT_ASSISTANT_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_ASSISTANT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl ClientConfig {
    pub fn load() -> Result<Self> {
        let configured_path = std::env::var("CREWMATCH_CLIENT_CONFIG")
            .unwrap_or_else(|_| "config/client.toml".to_string());
        assert!(
            !configured_path.is_empty(),
            "Configuration path must be non-empty"
        );
        assert!(
            configured_path.len() < 4096,
            "Configuration path length exceeds hard limit"
        );

        let mut builder = Config::builder()
            .add_source(File::new(&configured_path, FileFormat::Toml).required(true));

        if let Ok(env_override) = std::env::var("CREWMATCH_CLIENT_ENV") {
            if !env_override.is_empty() {
                let env_file = format!("config/client.{}.toml", env_override);
                if Path::new(&env_file).exists() {
                    builder = builder.add_source(File::new(&env_file, FileFormat::Toml));
                }
            }
        }

        let settings = builder
            .build()
            .map_err(|err| map_config_error(err, &configured_path))?;
        let config: Self = settings
            .try_deserialize()
            .context("Failed to deserialize client configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        assert!(
            !self.store.base_url.is_empty(),
            "Store base URL must be specified"
        );
        if !self.assistant.api_key.trim().is_empty() {
            assert!(
                !self.assistant.model.is_empty(),
                "Assistant model must be named when a key is configured"
            );
        }
        self.cache.ensure_bounds()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub request_timeout_ms: Option<u64>,
}

impl StoreConfig {
    pub fn request_timeout(&self) -> Duration {
        let millis = self.request_timeout_ms.unwrap_or(10_000);
        assert!(millis >= 100, "Store timeout must be at least 100ms");
        assert!(millis <= 60_000, "Store timeout cannot exceed 60 seconds");
        Duration::from_millis(millis)
    }
}

/// Assistant section. Entirely optional: a blank API key runs the
/// platform on canned fallbacks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub request_timeout_ms: Option<u64>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ASSISTANT_BASE_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_ASSISTANT_MODEL.to_string(),
            request_timeout_ms: None,
        }
    }
}

impl AssistantConfig {
    pub fn request_timeout(&self) -> Duration {
        let millis = self.request_timeout_ms.unwrap_or(15_000);
        assert!(millis >= 100, "Assistant timeout must be at least 100ms");
        assert!(
            millis <= 120_000,
            "Assistant timeout cannot exceed two minutes"
        );
        Duration::from_millis(millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub peers_max_capacity: u64,
    pub peers_ttl_seconds: u64,
    pub matches_max_capacity: u64,
    pub matches_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            peers_max_capacity: 256,
            peers_ttl_seconds: 60,
            matches_max_capacity: 256,
            matches_ttl_seconds: 300,
        }
    }
}

impl CacheConfig {
    fn ensure_bounds(&self) -> Result<()> {
        assert!(
            self.peers_max_capacity >= 16,
            "Peer cache capacity must be at least 16"
        );
        assert!(
            self.peers_ttl_seconds <= 86_400,
            "Peer cache TTL cannot exceed one day"
        );
        assert!(
            self.matches_max_capacity >= 16,
            "Match cache capacity must be at least 16"
        );
        assert!(
            self.matches_ttl_seconds <= 86_400,
            "Match cache TTL cannot exceed one day"
        );
        Ok(())
    }
}

fn map_config_error(err: ConfigError, path: &str) -> ConfigError {
    match err {
        ConfigError::NotFound(_) => ConfigError::NotFound(path.to_string()),
        other => other,
    }
}
