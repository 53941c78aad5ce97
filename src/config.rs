//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::time::Duration;

/// Which `OfferStore` implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Google Cloud Firestore (or its emulator)
    Firestore,
    /// In-process store, lost on restart
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid("OFFER_STORE", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Affiliate network offer list endpoint (paged with `page`/`perpage`)
    pub offer_source_url: String,
    /// Timeout for one page fetch
    pub source_timeout: Duration,
    /// Timeout for one record write
    pub store_timeout: Duration,
    pub store_backend: StoreBackend,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Firestore collection holding offers
    pub offers_collection: String,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Run a sync once when the process starts
    pub sync_on_startup: bool,
    /// Suppress service-level error logs (APP_ENV=test)
    pub quiet_errors: bool,
}

impl Config {
    /// Config for tests: in-memory store, no startup sync, quiet errors.
    pub fn test_default() -> Self {
        Self {
            offer_source_url: "http://127.0.0.1:9/offers".to_string(),
            source_timeout: Duration::from_secs(5),
            store_timeout: Duration::from_secs(5),
            store_backend: StoreBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            offers_collection: crate::db::collections::OFFERS.to_string(),
            port: 3000,
            frontend_url: "http://localhost:5173".to_string(),
            sync_on_startup: false,
            quiet_errors: true,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("OFFER_STORE") {
            Ok(v) => v.parse()?,
            Err(_) => StoreBackend::Firestore,
        };

        Ok(Self {
            offer_source_url: env::var("OFFER_SOURCE_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OFFER_SOURCE_URL"))?,
            source_timeout: Duration::from_secs(parse_or("SOURCE_TIMEOUT_SECS", 30)?),
            store_timeout: Duration::from_secs(parse_or("STORE_TIMEOUT_SECS", 10)?),
            store_backend,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            offers_collection: env::var("OFFERS_COLLECTION")
                .unwrap_or_else(|_| crate::db::collections::OFFERS.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            sync_on_startup: env::var("SYNC_ON_STARTUP")
                .map(|v| !matches!(v.trim(), "0" | "false" | "FALSE" | "False"))
                .unwrap_or(true),
            quiet_errors: env::var("APP_ENV").is_ok_and(|v| v.trim() == "test"),
        })
    }
}

/// Parse an optional numeric variable, falling back to `default` when unset.
fn parse_or(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Only variables no other test touches
        env::set_var("OFFER_SOURCE_URL", "https://affiliate.example/offers ");
        env::set_var("OFFER_STORE", "memory");
        env::set_var("SOURCE_TIMEOUT_SECS", "12");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.offer_source_url, "https://affiliate.example/offers");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.source_timeout, Duration::from_secs(12));
        assert_eq!(config.offers_collection, "offers");
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("Firestore".parse::<StoreBackend>().unwrap(), StoreBackend::Firestore);
        assert_eq!(" memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!(matches!(
            "mongo".parse::<StoreBackend>(),
            Err(ConfigError::Invalid("OFFER_STORE", _))
        ));
    }
}
