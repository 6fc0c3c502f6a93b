use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to, verbatim.
    pub base_url: String,
    /// Transport timeout in seconds; 0 leaves the transport default in place.
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Path of the session file. Empty string selects in-memory storage.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default values
            .set_default("environment", "development")?
            .set_default("api.base_url", "http://127.0.0.1:8000/venta")?
            .set_default("api.timeout_secs", 0)?
            .set_default("storage.path", "")?
            .set_default("chat.poll_interval_ms", 3000)?
            // Add in settings from the config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in settings from environment variables (with prefix "APP_")
            // E.g., `APP_API__BASE_URL=https://venta.example/api` would set
            // `Settings.api.base_url`
            .add_source(
                Environment::with_prefix("app")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }

    pub fn new_for_test() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("environment", "test")?
            .set_default("api.base_url", "http://127.0.0.1:8000/venta")?
            .set_default("api.timeout_secs", 0)?
            .set_default("storage.path", "")?
            .set_default("chat.poll_interval_ms", 50)?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::new_for_test().expect("Failed to load settings");
        assert_eq!(settings.environment, "test");
        assert_eq!(settings.api.base_url, "http://127.0.0.1:8000/venta");
        assert_eq!(settings.api.timeout_secs, 0);
        assert_eq!(settings.storage.path, "");
        assert_eq!(settings.chat.poll_interval_ms, 50);
    }

    #[test]
    fn test_explicit_overrides() {
        let settings = Config::builder()
            .set_default("environment", "test")
            .unwrap()
            .set_default("api.base_url", "http://127.0.0.1:8000/venta")
            .unwrap()
            .set_default("api.timeout_secs", 0)
            .unwrap()
            .set_default("storage.path", "")
            .unwrap()
            .set_default("chat.poll_interval_ms", 3000)
            .unwrap()
            .set_override("api.base_url", "https://venta.example/api")
            .unwrap()
            .set_override("chat.poll_interval_ms", 10_000)
            .unwrap()
            .build()
            .expect("Failed to build config")
            .try_deserialize::<Settings>()
            .expect("Failed to deserialize settings");

        assert_eq!(settings.api.base_url, "https://venta.example/api");
        assert_eq!(settings.chat.poll_interval_ms, 10_000);
    }

    #[test]
    fn test_invalid_interval() {
        let result = Config::builder()
            .set_default("environment", "test")
            .unwrap()
            .set_default("api.base_url", "http://127.0.0.1:8000/venta")
            .unwrap()
            .set_default("api.timeout_secs", 0)
            .unwrap()
            .set_default("storage.path", "")
            .unwrap()
            .set_default("chat.poll_interval_ms", 3000)
            .unwrap()
            .set_override("chat.poll_interval_ms", "not-a-number")
            .unwrap()
            .build()
            .and_then(|config| config.try_deserialize::<Settings>());

        assert!(result.is_err(), "Expected error for invalid interval");
    }
}
