//! Jina Reader content source.
//!
//! [`JinaReader`] reads pages through `r.jina.ai`, which returns readable
//! Markdown plus token usage, and discovers competitor pages through
//! `s.jina.ai`. Both endpoints are asked for JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use url::Url;

use crate::source::{ContentSource, ReadOptions};
use crate::{GeoError, RawContent, Result};

/// HTTP client configuration for the content source adapters.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
    /// Optional Jina API key; search requires one.
    pub api_key: Option<String>,
    /// Reader endpoint, the target URL is appended as a path.
    pub reader_base: String,
    /// Search endpoint.
    pub search_base: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (compatible; GeoLens/1.0; +https://github.com/geolens/geolens)".to_string(),
            api_key: None,
            reader_base: "https://r.jina.ai".to_string(),
            search_base: "https://s.jina.ai".to_string(),
        }
    }
}

impl FetchConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

#[derive(Deserialize)]
struct JinaEnvelope<T> {
    data: T,
}

/// Validates that `url` is an absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| GeoError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(GeoError::InvalidUrl(format!("unsupported scheme '{other}' in {url}"))),
    }
}

/// [`ContentSource`] backed by the Jina Reader and Search APIs.
#[derive(Debug, Clone)]
pub struct JinaReader {
    client: Client,
    config: FetchConfig,
}

impl JinaReader {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(GeoError::HttpError)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("User-Agent", &self.config.user_agent)
            .header("Accept", "application/json");
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() { GeoError::Timeout { timeout: self.config.timeout } } else { GeoError::HttpError(e) }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeoError::Upstream { status: status.as_u16(), message });
        }
        Ok(response)
    }
}

#[async_trait]
impl ContentSource for JinaReader {
    async fn read(&self, url: &str, options: &ReadOptions) -> Result<RawContent> {
        let target = validate_url(url)?;
        let endpoint = format!("{}/{}", self.config.reader_base.trim_end_matches('/'), target);

        let mut request = self.authorize(self.client.get(&endpoint));
        if options.with_images_summary {
            request = request.header("X-With-Images-Summary", "true");
        }
        if options.with_links_summary {
            request = request.header("X-With-Links-Summary", "true");
        }

        tracing::debug!(%url, "reading content");
        let envelope: JinaEnvelope<RawContent> = self.send(request).await?.json().await?;
        let mut content = envelope.data;
        if content.url.is_empty() {
            content.url = url.to_string();
        }
        Ok(content)
    }

    async fn search(&self, query: &str, _options: &ReadOptions) -> Result<Vec<RawContent>> {
        if query.trim().is_empty() {
            return Err(GeoError::InvalidInput("search query must not be empty".to_string()));
        }
        let endpoint = format!("{}/", self.config.search_base.trim_end_matches('/'));
        let request = self.authorize(self.client.get(&endpoint).query(&[("q", query)]));

        tracing::debug!(%query, "searching for competitors");
        let envelope: JinaEnvelope<Vec<RawContent>> = self.send(request).await?.json().await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("GeoLens"));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/post").is_ok());
        assert!(matches!(validate_url("example.com"), Err(GeoError::InvalidUrl(_))));
        assert!(matches!(validate_url("ftp://example.com"), Err(GeoError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_read_rejects_invalid_url_before_sending() {
        let reader = JinaReader::new(FetchConfig::default()).unwrap();
        let result = reader.read("not-a-url", &ReadOptions::default()).await;
        assert!(matches!(result, Err(GeoError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let reader = JinaReader::new(FetchConfig::default().with_api_key("k")).unwrap();
        let result = reader.search("  ", &ReadOptions::default()).await;
        assert!(matches!(result, Err(GeoError::InvalidInput(_))));
    }

    #[test]
    fn test_envelope_deserializes_reader_payload() {
        let json = r#"{"code": 200, "data": {"title": "T", "url": "https://x.test", "content": "Body", "usage": {"tokens": 12}}}"#;
        let envelope: JinaEnvelope<RawContent> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.tokens_used(), 12);
        assert_eq!(envelope.data.body, "Body");
    }
}
