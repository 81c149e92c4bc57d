use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WIDGET_SCRIPT_URL: &str = "https://checkout.bold.co/library/boldPaymentButton.js";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 { 30 }

/// Backoff for read endpoints. Cold starts of the backend answer 503 for a while.
#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    pub widget_script_url: String,
    pub success_redirect_delay_ms: u64,
    pub failure_redirect_delay_ms: u64,
    pub bridge_path: String,
}

impl PaymentConfig {
    pub fn success_delay(&self) -> Duration {
        Duration::from_millis(self.success_redirect_delay_ms)
    }

    pub fn failure_delay(&self) -> Duration {
        Duration::from_millis(self.failure_redirect_delay_ms)
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            widget_script_url: DEFAULT_WIDGET_SCRIPT_URL.to_string(),
            success_redirect_delay_ms: 3000,
            failure_redirect_delay_ms: 6000,
            bridge_path: "/payment-bridge".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub resume_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            resume_dir: PathBuf::from(".nevado"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Untracked developer overrides
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `NEVADO_GATEWAY__BASE_URL=http://localhost:5001` sets `gateway.base_url`
            .add_source(config::Environment::with_prefix("NEVADO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_fall_back_to_defaults() {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 8080

                [gateway]
                base_url = "http://localhost:5001/public"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: Config = s.try_deserialize().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.gateway.timeout_seconds, 30);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.payment.widget_script_url, DEFAULT_WIDGET_SCRIPT_URL);
        assert!(config.payment.failure_delay() > config.payment.success_delay());
    }
}
