//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target local development against the
//! public Platzi fake store API.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_SESSION_IDLE_MINUTES` - Session and visitor idle timeout (default: 1440)
//! - `STORE_API_URL` - Remote store API root (default: <https://api.escuelajs.co/api/v1>)
//! - `STORE_API_CACHE_TTL_SECS` - Single-product and category cache TTL (default: 300)
//! - `STORE_API_TIMEOUT_SECS` - Remote request timeout (default: none)
//! - `REGISTER_AVATAR_URL` - Avatar sent with new registrations (default: <https://picsum.photos/800>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_STORE_API_URL: &str = "https://api.escuelajs.co/api/v1";
pub const DEFAULT_AVATAR_URL: &str = "https://picsum.photos/800";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Idle time after which a session (and its cart) is dropped
    pub session_idle: Duration,
    /// Remote store API configuration
    pub store_api: StoreApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Remote store API configuration, shared by the storefront and the CLI.
#[derive(Debug, Clone)]
pub struct StoreApiConfig {
    /// API root, e.g. `https://api.escuelajs.co/api/v1`
    pub base_url: Url,
    /// How long single products and the category list stay cached
    pub cache_ttl: Duration,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Avatar URL submitted with new registrations
    pub register_avatar_url: String,
}

impl Default for StoreApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_STORE_API_URL).expect("default store API URL is valid"),
            cache_ttl: Duration::from_secs(300),
            timeout: None,
            register_avatar_url: DEFAULT_AVATAR_URL.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host: IpAddr = parse_or_default(&lookup, "STOREFRONT_HOST", "127.0.0.1")?;
        let port: u16 = parse_or_default(&lookup, "STOREFRONT_PORT", "3000")?;
        let base_url = lookup("STOREFRONT_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        let idle_minutes: u64 =
            parse_or_default(&lookup, "STOREFRONT_SESSION_IDLE_MINUTES", "1440")?;
        if idle_minutes == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SESSION_IDLE_MINUTES".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            session_idle: Duration::from_secs(idle_minutes * 60),
            store_api: StoreApiConfig::from_lookup(&lookup)?,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_or_default(&lookup, "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_or_default(
                &lookup,
                "SENTRY_TRACES_SAMPLE_RATE",
                "0.0",
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl StoreApiConfig {
    /// Load the store API section from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("STORE_API_URL").unwrap_or_else(|| DEFAULT_STORE_API_URL.to_string());
        let base_url = Url::parse(raw_url.trim_end_matches('/'))
            .map_err(|e| ConfigError::InvalidEnvVar("STORE_API_URL".to_string(), e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "STORE_API_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let cache_ttl_secs: u64 = parse_or_default(lookup, "STORE_API_CACHE_TTL_SECS", "300")?;
        let timeout = match lookup("STORE_API_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_value("STORE_API_TIMEOUT_SECS", &raw)?)),
            None => None,
        };

        Ok(Self {
            base_url,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            timeout,
            register_avatar_url: lookup("REGISTER_AVATAR_URL")
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to a default when it is unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    parse_value(key, &raw)
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.session_idle, Duration::from_secs(1440 * 60));
        assert_eq!(
            config.store_api.base_url.as_str(),
            "https://api.escuelajs.co/api/v1"
        );
        assert_eq!(config.store_api.cache_ttl, Duration::from_secs(300));
        assert!(config.store_api.timeout.is_none());
        assert_eq!(config.store_api.register_avatar_url, DEFAULT_AVATAR_URL);
        assert!(config.sentry_dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_BASE_URL", "https://shop.example.com"),
            ("STORE_API_URL", "http://127.0.0.1:9999/api/v1/"),
            ("STORE_API_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.is_secure());
        assert_eq!(
            config.store_api.base_url.as_str(),
            "http://127.0.0.1:9999/api/v1"
        );
        assert_eq!(config.store_api.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("STOREFRONT_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_api_url() {
        let err = config_from(&[("STORE_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STORE_API_URL"));
    }

    #[test]
    fn test_zero_idle_rejected() {
        assert!(config_from(&[("STOREFRONT_SESSION_IDLE_MINUTES", "0")]).is_err());
    }

    #[test]
    fn test_empty_sentry_dsn_is_ignored() {
        let config = config_from(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
