use crate::utils::env::{get_env, get_env_parsed};

use anyhow::{anyhow, Error};
use std::time::Duration;

const DEFAULT_POSTGRES_PORT: u16 = 5432;
const DEFAULT_EVENT_BUS_NAME: &str = "billogram-event-bus";
const DEFAULT_REGION: &str = "ap-northeast-1";
const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 3600;

/// Connection settings for the discounts database
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

/// Centralized configuration for the discount Lambda functions
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountConfig {
    pub database: DatabaseConfig,
    /// URL of the identity provider's published JWKS document
    pub jwks_url: String,
    /// Expected `iss` claim; issuer is not checked when unset
    pub issuer: Option<String>,
    /// How long a fetched JWKS document is reused
    pub jwks_cache_ttl: Duration,
    pub event_bus_name: String,
    pub region: String,
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: DEFAULT_POSTGRES_PORT,
                name: "postgres".to_string(),
                user: "postgres".to_string(),
                password: String::new(),
            },
            jwks_url: String::new(),
            issuer: None,
            jwks_cache_ttl: Duration::from_secs(DEFAULT_JWKS_CACHE_TTL_SECS),
            event_bus_name: DEFAULT_EVENT_BUS_NAME.to_string(),
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl DiscountConfig {
    /// Get configuration from environment variables
    pub fn from_env() -> Result<Self, Error> {
        let port = get_env("POSTGRES_PORT", &DEFAULT_POSTGRES_PORT.to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| anyhow!("Invalid POSTGRES_PORT '{}': {}", port, e))?;

        let jwks_cache_ttl_secs =
            get_env_parsed("JWKS_CACHE_TTL_SECS", DEFAULT_JWKS_CACHE_TTL_SECS);

        Ok(Self {
            database: DatabaseConfig {
                host: Self::required("POSTGRES_ENDPOINT")?,
                port,
                name: Self::required("POSTGRES_DBNAME")?,
                user: Self::required("POSTGRES_DBUSER")?,
                password: Self::required("POSTGRES_DBPASS")?,
            },
            jwks_url: Self::required("COGNITO_PUBLIC_KEYS_URL")?,
            issuer: std::env::var("COGNITO_ISSUER")
                .ok()
                .filter(|issuer| !issuer.is_empty()),
            jwks_cache_ttl: Duration::from_secs(jwks_cache_ttl_secs),
            event_bus_name: get_env("EVENT_BUS_NAME", DEFAULT_EVENT_BUS_NAME),
            region: get_env("AWS_REGION", DEFAULT_REGION),
        })
    }

    fn required(key: &str) -> Result<String, Error> {
        std::env::var(key)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("Missing environment variable: {}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Tests below mutate process-wide environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const REQUIRED_VARS: [(&str, &str); 5] = [
        ("POSTGRES_ENDPOINT", "db.internal"),
        ("POSTGRES_DBNAME", "loyalty"),
        ("POSTGRES_DBUSER", "lambda"),
        ("POSTGRES_DBPASS", "secret"),
        ("COGNITO_PUBLIC_KEYS_URL", "https://test.jwks.url"),
    ];

    const OPTIONAL_VARS: [&str; 5] = [
        "POSTGRES_PORT",
        "COGNITO_ISSUER",
        "JWKS_CACHE_TTL_SECS",
        "EVENT_BUS_NAME",
        "AWS_REGION",
    ];

    fn set_required_vars() {
        for (key, value) in REQUIRED_VARS {
            env::set_var(key, value);
        }
    }

    fn clear_vars() {
        for (key, _) in REQUIRED_VARS {
            env::remove_var(key);
        }
        for key in OPTIONAL_VARS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = DiscountConfig::default();

        assert_eq!(config.database.port, 5432);
        assert_eq!(config.event_bus_name, "billogram-event-bus");
        assert_eq!(config.region, "ap-northeast-1");
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(3600));
        assert!(config.issuer.is_none());
    }

    #[test]
    fn test_from_env_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_vars();
        set_required_vars();

        let config = DiscountConfig::from_env().unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "loyalty");
        assert_eq!(config.database.user, "lambda");
        assert_eq!(config.database.password, "secret");
        assert_eq!(config.jwks_url, "https://test.jwks.url");
        assert_eq!(config.event_bus_name, "billogram-event-bus");
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(3600));

        clear_vars();
    }

    #[test]
    fn test_from_env_with_custom_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_vars();
        set_required_vars();
        env::set_var("POSTGRES_PORT", "6543");
        env::set_var("COGNITO_ISSUER", "https://issuer.example");
        env::set_var("JWKS_CACHE_TTL_SECS", "60");
        env::set_var("EVENT_BUS_NAME", "test-bus");

        let config = DiscountConfig::from_env().unwrap();

        assert_eq!(config.database.port, 6543);
        assert_eq!(config.issuer.as_deref(), Some("https://issuer.example"));
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.event_bus_name, "test-bus");

        clear_vars();
    }

    #[test]
    fn test_from_env_missing_required_value() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_vars();
        set_required_vars();
        env::remove_var("POSTGRES_DBPASS");

        let err = DiscountConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("POSTGRES_DBPASS"));

        clear_vars();
    }

    #[test]
    fn test_from_env_with_invalid_port() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_vars();
        set_required_vars();
        env::set_var("POSTGRES_PORT", "not_a_port");

        assert!(DiscountConfig::from_env().is_err());

        clear_vars();
    }

    #[test]
    fn test_from_env_with_invalid_ttl_falls_back() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_vars();
        set_required_vars();
        env::set_var("JWKS_CACHE_TTL_SECS", "invalid");

        let config = DiscountConfig::from_env().unwrap();
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(3600));

        clear_vars();
    }
}
