use anyhow::Context;

/// `REDIS_URL` value that selects the in-process cache instead of a Redis server.
pub const MEMORY_CACHE_URL: &str = "memory://";

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means the built-in sample catalog is served (mock mode).
    pub database_url: Option<String>,
    /// Unset means caching and the server-side cart are disabled (mock mode).
    pub redis_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url: var("DATABASE_URL"),
            redis_url: var("REDIS_URL"),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            environment: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn empty_connection_strings_mean_mock_mode() {
        let config = from_pairs(&[("DATABASE_URL", ""), ("REDIS_URL", "   ")]).unwrap();
        assert!(config.database_url.is_none());
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = from_pairs(&[
            ("DATABASE_URL", "postgres://shop@db/shop"),
            ("REDIS_URL", "redis://cache:6379"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3001"),
            ("APP_ENV", "production"),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://shop@db/shop"));
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.bind_addr(), "127.0.0.1:3001");
        assert_eq!(config.environment, "production");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = from_pairs(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
