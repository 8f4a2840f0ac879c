//! Server settings read from the environment.

use std::net::SocketAddr;

use geolens_core::{FetchConfig, GeoConfig};

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Deployment label reported by `/health`.
    pub environment: String,
    pub jina_api_key: Option<String>,
    pub account_id: Option<String>,
    pub api_token: Option<String>,
    /// Upstream HTTP timeout in seconds.
    pub upstream_timeout: u64,
    /// Whole-request timeout in seconds.
    pub request_timeout: u64,
    pub model_id: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8787)),
            environment: "unknown".to_string(),
            jina_api_key: None,
            account_id: None,
            api_token: None,
            upstream_timeout: 30,
            request_timeout: 120,
            model_id: None,
        }
    }
}

impl ServerConfig {
    /// Reads `GEOLENS_BIND`, `ENVIRONMENT`, `JINA_API_KEY`, `CLOUDFLARE_ACCOUNT_ID`,
    /// `CLOUDFLARE_API_TOKEN`, `GEOLENS_MODEL`, `GEOLENS_UPSTREAM_TIMEOUT` and
    /// `GEOLENS_REQUEST_TIMEOUT`, falling back to defaults.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind = match non_empty("GEOLENS_BIND") {
            Some(value) => value.parse().map_err(|e| format!("Invalid GEOLENS_BIND {value}: {e}"))?,
            None => defaults.bind,
        };
        let seconds = |key: &str, default: u64| -> Result<u64, String> {
            match non_empty(key) {
                Some(value) => value.parse().map_err(|_| format!("Invalid {key}: {value}")),
                None => Ok(default),
            }
        };

        Ok(Self {
            bind,
            environment: non_empty("ENVIRONMENT").unwrap_or(defaults.environment),
            jina_api_key: non_empty("JINA_API_KEY"),
            account_id: non_empty("CLOUDFLARE_ACCOUNT_ID"),
            api_token: non_empty("CLOUDFLARE_API_TOKEN"),
            upstream_timeout: seconds("GEOLENS_UPSTREAM_TIMEOUT", defaults.upstream_timeout)?,
            request_timeout: seconds("GEOLENS_REQUEST_TIMEOUT", defaults.request_timeout)?,
            model_id: non_empty("GEOLENS_MODEL"),
        })
    }

    pub fn fetch_config(&self) -> FetchConfig {
        let config = FetchConfig::default().with_timeout(self.upstream_timeout);
        match &self.jina_api_key {
            Some(key) => config.with_api_key(key.clone()),
            None => config,
        }
    }

    pub fn geo_config(&self) -> GeoConfig {
        let builder = GeoConfig::builder();
        match &self.model_id {
            Some(model) => builder.model_id(model.clone()).build(),
            None => builder.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind.port(), 8787);
        assert_eq!(config.environment, "unknown");
        assert!(config.jina_api_key.is_none());
        assert_eq!(config.geo_config().model_id, geolens_core::DEFAULT_MODEL_ID);
    }

    #[test]
    fn test_values_from_env() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("GEOLENS_BIND", "127.0.0.1:9000"),
            ("ENVIRONMENT", "production"),
            ("JINA_API_KEY", "jina"),
            ("GEOLENS_REQUEST_TIMEOUT", "45"),
            ("CLOUDFLARE_API_TOKEN", "  "),
        ]))
        .unwrap();

        assert_eq!(config.bind.to_string(), "127.0.0.1:9000");
        assert_eq!(config.environment, "production");
        assert_eq!(config.fetch_config().api_key.as_deref(), Some("jina"));
        assert_eq!(config.request_timeout, 45);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(ServerConfig::from_lookup(lookup(&[("GEOLENS_BIND", "nowhere")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("GEOLENS_UPSTREAM_TIMEOUT", "soon")])).is_err());
    }
}
