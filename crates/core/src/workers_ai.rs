//! Cloudflare Workers AI model transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::model::{ModelClient, ModelRequest};
use crate::{GeoError, Result};

const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// [`ModelClient`] that calls the Workers AI REST endpoint for an account.
#[derive(Debug, Clone)]
pub struct WorkersAiClient {
    client: Client,
    account_id: String,
    api_token: String,
    api_base: String,
    timeout: u64,
}

impl WorkersAiClient {
    /// Creates a client with a request timeout in seconds.
    pub fn new(account_id: impl Into<String>, api_token: impl Into<String>, timeout: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(GeoError::HttpError)?;
        Ok(Self {
            client,
            account_id: account_id.into(),
            api_token: api_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout,
        })
    }

    /// Overrides the API base, e.g. for an AI Gateway.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/accounts/{}/ai/run/{}", self.api_base.trim_end_matches('/'), self.account_id, model)
    }
}

/// Pull the generated text out of a Workers AI reply.
///
/// Some models return structured output; it is passed on as JSON text.
pub fn extract_response(reply: &Value) -> Result<String> {
    match reply.get("result").and_then(|r| r.get("response")) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Null) | None => Err(GeoError::Model("LLM returned no response field".to_string())),
        Some(other) => Ok(other.to_string()),
    }
}

#[async_trait]
impl ModelClient for WorkersAiClient {
    async fn run(&self, request: &ModelRequest) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint(&request.model))
            .bearer_auth(&self.api_token)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() { GeoError::Timeout { timeout: self.timeout } } else { GeoError::HttpError(e) }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoError::Model(format!("Workers AI returned {}: {}", status.as_u16(), body)));
        }

        let reply: Value = response.json().await?;
        extract_response(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint() {
        let client = WorkersAiClient::new("acct", "token", 30).unwrap();
        assert_eq!(
            client.endpoint("@cf/meta/llama-3.3-70b-instruct-fp8-fast"),
            "https://api.cloudflare.com/client/v4/accounts/acct/ai/run/@cf/meta/llama-3.3-70b-instruct-fp8-fast"
        );
    }

    #[test]
    fn test_extract_string_response() {
        let reply = json!({"result": {"response": "{\"entities\": []}"}, "success": true});
        assert_eq!(extract_response(&reply).unwrap(), "{\"entities\": []}");
    }

    #[test]
    fn test_extract_structured_response_is_stringified() {
        let reply = json!({"result": {"response": {"entities": []}}});
        assert_eq!(extract_response(&reply).unwrap(), r#"{"entities":[]}"#);
    }

    #[test]
    fn test_missing_response_field() {
        let reply = json!({"result": {}});
        assert!(matches!(extract_response(&reply), Err(GeoError::Model(_))));
    }
}
