//! HTTP routes.
//!
//! - `GET /health`
//! - `POST /api/analyze`
//! - `POST /api/analyze-text`
//! - `POST /api/compare`
//! - `POST /api/validate-rewrite`

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Method, Request, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use geolens_core::{AnalysisEnvelope, AnalyzeOptions, ComparisonReport, RewriteValidation, TextOptions};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const VERSION: &str = "1.0.0";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub url: Option<String>,
    pub query: Option<String>,
    pub competitor_urls: Option<Vec<String>>,
    pub auto_discover_competitors: Option<bool>,
    pub jina_api_key: Option<String>,
    pub skip_llm: Option<bool>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextRequest {
    pub content: Option<String>,
    pub query: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub skip_llm: Option<bool>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub urls: Option<Vec<String>>,
    pub query: Option<String>,
    pub jina_api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRewriteRequest {
    pub original_url: Option<String>,
    pub optimized_content: Option<String>,
    pub query: Option<String>,
    pub jina_api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerInfo {
    pub environment: String,
    pub ai_binding: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub worker: WorkerInfo,
}

/// Present and non-blank, else the field name is reported missing.
fn required<'a>(value: &'a Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> &'a str {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(name);
            ""
        }
    }
}

fn check_missing(missing: &[&str]) -> ApiResult<()> {
    if missing.is_empty() { Ok(()) } else { Err(ApiError::missing_fields(missing)) }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
        timestamp: OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
        worker: WorkerInfo { environment: state.environment.clone(), ai_binding: state.analyzer.has_model() },
    })
}

async fn analyze(
    State(state): State<AppState>, payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisEnvelope>> {
    let Json(body) = payload?;
    let mut missing = Vec::new();
    let url = required(&body.url, "url", &mut missing);
    let query = required(&body.query, "query", &mut missing);
    check_missing(&missing)?;

    let options = AnalyzeOptions {
        competitor_urls: body.competitor_urls.clone().unwrap_or_default(),
        auto_discover_competitors: body.auto_discover_competitors.unwrap_or(false),
        skip_semantic: body.skip_llm.unwrap_or(false),
        model_id: body.model.clone(),
        ..Default::default()
    };

    let analyzer = state.analyzer_for(body.jina_api_key.as_deref())?;
    let envelope = analyzer.analyze(url, query, options).await?;
    tracing::info!(%url, overall = envelope.scores().overall(), "analysis complete");
    Ok(Json(envelope))
}

async fn analyze_text(
    State(state): State<AppState>, payload: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisEnvelope>> {
    let Json(body) = payload?;
    let mut missing = Vec::new();
    let content = required(&body.content, "content", &mut missing);
    let query = required(&body.query, "query", &mut missing);
    check_missing(&missing)?;

    let options = TextOptions {
        title: body.title.clone(),
        url: body.url.clone(),
        skip_semantic: body.skip_llm.unwrap_or(false),
        model_id: body.model.clone(),
    };
    let envelope = state.analyzer.analyze_text(content, query, options).await?;
    Ok(Json(envelope))
}

async fn compare(
    State(state): State<AppState>, payload: Result<Json<CompareRequest>, JsonRejection>,
) -> ApiResult<Json<ComparisonReport>> {
    let Json(body) = payload?;
    let mut missing = Vec::new();
    let urls = body.urls.as_deref().unwrap_or_default();
    if urls.is_empty() {
        missing.push("urls");
    }
    let query = required(&body.query, "query", &mut missing);
    check_missing(&missing)?;

    let analyzer = state.analyzer_for(body.jina_api_key.as_deref())?;
    Ok(Json(analyzer.compare(urls, query).await?))
}

async fn validate_rewrite(
    State(state): State<AppState>, payload: Result<Json<ValidateRewriteRequest>, JsonRejection>,
) -> ApiResult<Json<RewriteValidation>> {
    let Json(body) = payload?;
    let mut missing = Vec::new();
    let original_url = required(&body.original_url, "originalUrl", &mut missing);
    let optimized = required(&body.optimized_content, "optimizedContent", &mut missing);
    let query = required(&body.query, "query", &mut missing);
    check_missing(&missing)?;

    let analyzer = state.analyzer_for(body.jina_api_key.as_deref())?;
    Ok(Json(analyzer.validate_rewrite(original_url, optimized, query).await?))
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// The full application with tracing, timeout, compression and CORS layers.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                uri = %request.uri(),
            )
        }))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(CompressionLayer::new())
        .layer(cors_layer());

    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/analyze-text", post(analyze_text))
        .route("/api/compare", post(compare))
        .route("/api/validate-rewrite", post(validate_rewrite))
        .fallback(not_found)
        .layer(middleware)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use geolens_core::{
        ContentSource, GeoAnalyzer, GeoConfig, GeoError, ModelClient, ModelRequest, RawContent, ReadOptions, Result,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    const ARTICLE: &str = "# Lake Houses\n\nRenting a lake house costs $300 per night in 2025. Book early.";

    struct Pages(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl ContentSource for Pages {
        async fn read(&self, url: &str, _options: &ReadOptions) -> Result<RawContent> {
            self.0
                .get(url)
                .map(|body| RawContent::new("Page", url, *body).with_usage(12))
                .ok_or_else(|| GeoError::Upstream { status: 404, message: "not found".to_string() })
        }

        async fn search(&self, _query: &str, _options: &ReadOptions) -> Result<Vec<RawContent>> {
            Ok(Vec::new())
        }
    }

    struct BrokenModel;

    #[async_trait]
    impl ModelClient for BrokenModel {
        async fn run(&self, _request: &ModelRequest) -> Result<String> {
            Ok("no json here".to_string())
        }
    }

    fn app(with_model: bool) -> Router {
        let pages = Pages(HashMap::from([("https://a.test", ARTICLE), ("https://b.test", "Short page.")]));
        let mut analyzer = GeoAnalyzer::new(Arc::new(pages), GeoConfig::default());
        if with_model {
            analyzer = analyzer.with_model(Arc::new(BrokenModel));
        }
        router(AppState::new(analyzer, "test"), Duration::from_secs(5))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder.header("content-type", "application/json").body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(false), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], "1.0.0");
        assert_eq!(body["worker"]["environment"], "test");
        assert_eq!(body["worker"]["aiBinding"], false);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let (_, body) = send(app(true), "GET", "/health", None).await;
        assert_eq!(body["worker"]["aiBinding"], true);
    }

    #[tokio::test]
    async fn test_analyze_missing_fields() {
        let (status, body) = send(app(false), "POST", "/api/analyze", Some(json!({"url": "https://a.test"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: query");

        let (status, body) = send(app(false), "POST", "/api/analyze", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: url, query");
    }

    #[tokio::test]
    async fn test_analyze_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app(false).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let (status, body) =
            send(app(false), "POST", "/api/analyze", Some(json!({"url": "https://a.test", "query": "lake house"})))
                .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["request"]["url"], "https://a.test");
        assert_eq!(body["usage"]["jinaTokensUsed"], 12);
        assert_eq!(body["meta"]["featuresUsed"][0], "pattern-analysis");
    }

    #[tokio::test]
    async fn test_analyze_model_fallback() {
        let (status, body) =
            send(app(true), "POST", "/api/analyze", Some(json!({"url": "https://a.test", "query": "lake house"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["featuresUsed"][1], "llm-fallback");
        assert_eq!(body["usage"]["neuronsUsed"], 0);
    }

    #[tokio::test]
    async fn test_analyze_upstream_error() {
        let (status, body) =
            send(app(false), "POST", "/api/analyze", Some(json!({"url": "https://gone.test", "query": "q"}))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_analyze_text_without_model() {
        let (status, body) =
            send(app(false), "POST", "/api/analyze-text", Some(json!({"content": ARTICLE, "query": "lake house"})))
                .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["request"]["url"], "text://optimized-content");
        assert_eq!(body["meta"]["featuresUsed"], json!(["pattern-analysis", "text-input"]));
        assert_eq!(body["geoAnalysis"]["scores"]["citability"], 0.0);
    }

    #[tokio::test]
    async fn test_compare_insufficient_results() {
        let (status, body) = send(
            app(false),
            "POST",
            "/api/compare",
            Some(json!({"urls": ["https://a.test", "https://gone.test"], "query": "lake"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_compare_ranks() {
        let (status, body) = send(
            app(false),
            "POST",
            "/api/compare",
            Some(json!({"urls": ["https://a.test", "https://b.test"], "query": "lake house"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ranked"].as_array().unwrap().len(), 2);
        assert_eq!(body["ranked"][0]["rank"], 1);
    }

    #[tokio::test]
    async fn test_validate_rewrite() {
        let (status, body) = send(
            app(false),
            "POST",
            "/api/validate-rewrite",
            Some(json!({"originalUrl": "https://b.test", "optimizedContent": ARTICLE, "query": "lake house"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["originalUrl"], "https://b.test");
        assert!(body["deltas"]["overall"]["change"].is_number());
    }

    #[tokio::test]
    async fn test_validate_rewrite_missing_fields() {
        let (status, body) = send(app(false), "POST", "/api/validate-rewrite", Some(json!({"query": "q"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: originalUrl, optimizedContent");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = send(app(false), "GET", "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/analyze")
            .header("origin", "https://dashboard.test")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app(false).oneshot(request).await.unwrap();
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
