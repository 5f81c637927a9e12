//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and handed to the
//! server; handlers never read the environment themselves.
//!
//! ```bash
//! export DB_ADDR="localhost:6379"
//! export DB_PASS=""
//! export DOMAIN="s.example.com"
//! export API_QUOTA="10"
//! export PORT="3000"
//! ```
//!
//! ## Required Variables
//!
//! - `DOMAIN` - Public host of this service, used to compose short URLs and to
//!   reject links that point back at the service
//!
//! ## Optional Variables
//!
//! - `DB_ADDR` - Redis `host:port` (default: `localhost:6379`)
//! - `DB_PASS` - Redis password; empty means no authentication
//! - `API_QUOTA` - Shorten requests per client per 30 minutes (default: 10)
//! - `PORT` - Listen port, as `3000`, `:3000` or `host:port` (default: `3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `BEHIND_PROXY` - Read client IP from forwarding headers (default: `false`)

use anyhow::{Context, Result};
use std::env;
use url::Url;

use crate::infrastructure::store::Namespace;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis `host:port`.
    pub db_addr: String,
    pub db_password: Option<String>,
    /// Public host of this service, without scheme.
    pub domain: String,
    /// Initial per-client quota of shorten requests.
    pub api_quota: i64,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, the client IP is read from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `DOMAIN` is missing or `API_QUOTA` is not an integer.
    pub fn from_env() -> Result<Self> {
        let db_addr = env::var("DB_ADDR").unwrap_or_else(|_| "localhost:6379".to_string());
        let db_password = env::var("DB_PASS").ok().filter(|p| !p.is_empty());

        let domain = env::var("DOMAIN").context("DOMAIN must be set")?;

        let api_quota = match env::var("API_QUOTA") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("API_QUOTA must be an integer, got '{}'", raw))?,
            Err(_) => 10,
        };

        let listen_addr = Self::load_listen_addr();
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            db_addr,
            db_password,
            domain,
            api_quota,
            listen_addr,
            log_level,
            log_format,
            behind_proxy,
        })
    }

    /// Builds the listen address from `PORT`.
    ///
    /// Accepts a bare port (`3000`), a Go-style `:3000`, or a full `host:port`.
    /// Bare ports bind on all interfaces.
    fn load_listen_addr() -> String {
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.trim();

        if let Some(bare) = port.strip_prefix(':') {
            format!("0.0.0.0:{}", bare)
        } else if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) {
            format!("0.0.0.0:{}", port)
        } else {
            port.to_string()
        }
    }

    /// Redis connection URL selecting the database of `namespace`.
    ///
    /// The password is percent-encoded, so it may contain `@`, `/`, `#` or `:`.
    ///
    /// # Errors
    ///
    /// Returns an error if `db_addr` does not form a valid URL host.
    pub fn redis_url(&self, namespace: Namespace) -> Result<String> {
        let mut url = Url::parse(&format!("redis://{}/{}", self.db_addr, namespace.index()))
            .with_context(|| format!("DB_ADDR is not a valid address: '{}'", self.db_addr))?;

        if let Some(pwd) = &self.db_password {
            url.set_password(Some(pwd))
                .map_err(|_| anyhow::anyhow!("Cannot set password on Redis URL"))?;
        }

        Ok(url.into())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `domain` is empty, contains whitespace, or carries a scheme
    /// - `api_quota` is less than 1
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` or `db_addr` is not `host:port`
    pub fn validate(&self) -> Result<()> {
        if self.domain.is_empty() || self.domain.chars().any(char::is_whitespace) {
            anyhow::bail!("DOMAIN must be a non-empty host, got '{}'", self.domain);
        }

        if self.domain.contains("://") {
            anyhow::bail!(
                "DOMAIN must not include a scheme (e.g. 's.example.com'), got '{}'",
                self.domain
            );
        }

        if self.api_quota < 1 {
            anyhow::bail!("API_QUOTA must be at least 1, got {}", self.api_quota);
        }

        // Validate log format
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        // Validate listen address format
        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "PORT must be a port or 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.db_addr.contains(':') {
            anyhow::bail!("DB_ADDR must be in format 'host:port', got '{}'", self.db_addr);
        }

        self.redis_url(Namespace::Links)?;

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        if let Ok(url) = self.redis_url(Namespace::Links) {
            tracing::info!("  Redis: {}", mask_connection_string(&url));
        }
        tracing::info!("  Domain: {}", self.domain);
        tracing::info!("  API quota: {} per 30 min", self.api_quota);
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks sensitive information in connection strings for logging.
///
/// Replaces password with `***` in URLs like:
/// - `redis://:password@host:port/db` → `redis://:***@host:port/db`
pub fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            // Check if there's a password (contains ':')
            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_config() -> Config {
        Config {
            db_addr: "localhost:6379".to_string(),
            db_password: None,
            domain: "s.example.com".to_string(),
            api_quota: 10,
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
        }
    }

    #[test]
    fn test_mask_connection_string() {
        assert_eq!(
            mask_connection_string("redis://:password@localhost:6379/0"),
            "redis://:***@localhost:6379/0"
        );

        assert_eq!(
            mask_connection_string("redis://localhost:6379/1"),
            "redis://localhost:6379/1"
        );
    }

    #[test]
    fn test_redis_url_per_namespace() {
        let mut config = test_config();
        assert_eq!(
            config.redis_url(Namespace::Links).unwrap(),
            "redis://localhost:6379/0"
        );
        assert_eq!(
            config.redis_url(Namespace::Counters).unwrap(),
            "redis://localhost:6379/1"
        );

        config.db_password = Some("secret".to_string());
        assert_eq!(
            config.redis_url(Namespace::Counters).unwrap(),
            "redis://:secret@localhost:6379/1"
        );
    }

    #[test]
    fn test_redis_url_encodes_password() {
        let mut config = test_config();
        config.db_password = Some("p@ss/w:rd#1".to_string());

        let url = config.redis_url(Namespace::Links).unwrap();
        assert_eq!(url, "redis://:p%40ss%2Fw%3Ard%231@localhost:6379/0");

        let parsed = Url::parse(&url).unwrap();
        assert_eq!(parsed.host_str(), Some("localhost"));
        assert_eq!(parsed.port(), Some(6379));
        assert_eq!(parsed.path(), "/0");

        assert_eq!(
            mask_connection_string(&url),
            "redis://:***@localhost:6379/0"
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.api_quota = 0;
        assert!(config.validate().is_err());
        config.api_quota = 10;

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        config.domain = "https://s.example.com".to_string();
        assert!(config.validate().is_err());
        config.domain = String::new();
        assert!(config.validate().is_err());
        config.domain = "localhost:3000".to_string();
        assert!(config.validate().is_ok());

        config.db_addr = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_listen_addr_forms() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("PORT", ":8080");
        }
        assert_eq!(Config::load_listen_addr(), "0.0.0.0:8080");

        unsafe {
            env::set_var("PORT", "9000");
        }
        assert_eq!(Config::load_listen_addr(), "0.0.0.0:9000");

        unsafe {
            env::set_var("PORT", "127.0.0.1:4000");
        }
        assert_eq!(Config::load_listen_addr(), "127.0.0.1:4000");

        unsafe {
            env::remove_var("PORT");
        }
        assert_eq!(Config::load_listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    #[serial]
    fn test_from_env() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("DOMAIN", "s.example.com");
            env::set_var("DB_ADDR", "redis-host:6380");
            env::set_var("DB_PASS", "");
            env::set_var("API_QUOTA", "25");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.domain, "s.example.com");
        assert_eq!(config.db_addr, "redis-host:6380");
        // Empty password means no authentication
        assert_eq!(config.db_password, None);
        assert_eq!(config.api_quota, 25);

        unsafe {
            env::set_var("API_QUOTA", "many");
        }
        assert!(Config::from_env().is_err());

        // Cleanup
        unsafe {
            env::remove_var("DOMAIN");
            env::remove_var("DB_ADDR");
            env::remove_var("DB_PASS");
            env::remove_var("API_QUOTA");
        }
    }

    #[test]
    #[serial]
    fn test_domain_is_required() {
        // SAFETY: Tests are run serially
        unsafe {
            env::remove_var("DOMAIN");
        }

        assert!(Config::from_env().is_err());
    }
}
