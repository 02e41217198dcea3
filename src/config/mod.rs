//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `CLOUDLOCKER` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use cloudlocker::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod auth;
mod blob;
mod database;
mod error;
mod lifecycle;
mod payment;
mod push;
mod server;

pub use auth::AuthConfig;
pub use blob::BlobConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use lifecycle::LifecycleConfig;
pub use payment::PaymentConfig;
pub use push::PushConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Authentication configuration (identity tokens)
    pub auth: AuthConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Push configuration (FCM)
    pub push: PushConfig,

    /// Blob storage configuration (bucket directory)
    pub blob: BlobConfig,

    /// Lifecycle configuration (storage retention)
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `CLOUDLOCKER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CLOUDLOCKER__DATABASE__URL=...` -> `database.url = ...`
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLOUDLOCKER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.payment.validate()?;
        self.push.validate()?;
        self.blob.validate()?;
        self.lifecycle.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgresql://app@localhost/cloudlocker".to_string(),
                min_connections: 1,
                max_connections: 10,
                acquire_timeout_secs: 5,
                run_migrations: false,
            },
            auth: AuthConfig {
                jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            },
            payment: PaymentConfig {
                stripe_api_key: "sk_test_xxx".to_string(),
                stripe_api_base_url: None,
            },
            push: PushConfig {
                fcm_server_key: "AAAA-test-key".to_string(),
                fcm_api_url: None,
            },
            blob: BlobConfig {
                root_dir: std::path::PathBuf::from("/var/cloudlocker/blobs"),
            },
            lifecycle: LifecycleConfig::default(),
        }
    }

    #[test]
    fn minimal_config_validates() {
        assert!(minimal_config().validate().is_ok());
    }

    #[test]
    fn validation_catches_bad_sections() {
        let mut config = minimal_config();
        config.payment.stripe_api_key = "not-a-key".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn development_is_not_production() {
        assert!(!minimal_config().is_production());
    }
}
