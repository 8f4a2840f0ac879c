//! Shared handler state.

use std::sync::Arc;

use geolens_core::{FetchConfig, GeoAnalyzer, JinaReader, ModelClient, Result, WorkersAiClient};

use crate::config::ServerConfig;

/// State cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: GeoAnalyzer,
    pub environment: String,
    /// Template for per-request readers built from a caller-supplied Jina key.
    fetch: Option<FetchConfig>,
}

impl AppState {
    pub fn new(analyzer: GeoAnalyzer, environment: impl Into<String>) -> Self {
        Self { analyzer, environment: environment.into(), fetch: None }
    }

    /// State backed by the Jina reader and, when credentials are present, Workers AI.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let fetch = config.fetch_config();
        let reader = JinaReader::new(fetch.clone())?;
        let mut analyzer = GeoAnalyzer::new(Arc::new(reader), config.geo_config());

        match (&config.account_id, &config.api_token) {
            (Some(account), Some(token)) => {
                let client = WorkersAiClient::new(account.clone(), token.clone(), config.upstream_timeout)?;
                analyzer = analyzer.with_model(Arc::new(client) as Arc<dyn ModelClient>);
            }
            _ => tracing::warn!("no Workers AI credentials, semantic stage disabled"),
        }

        Ok(Self { analyzer, environment: config.environment.clone(), fetch: Some(fetch) })
    }

    /// The analyzer to use for one request; a caller-supplied Jina key gets its own reader.
    pub fn analyzer_for(&self, jina_api_key: Option<&str>) -> Result<GeoAnalyzer> {
        match (jina_api_key.filter(|k| !k.is_empty()), &self.fetch) {
            (Some(key), Some(fetch)) => {
                let reader = JinaReader::new(fetch.clone().with_api_key(key))?;
                Ok(self.analyzer.with_source(Arc::new(reader)))
            }
            _ => Ok(self.analyzer.clone()),
        }
    }
}
