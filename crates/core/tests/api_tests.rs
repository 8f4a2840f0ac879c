//! Library API integration tests
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use geolens_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

const THIN_PAGE: &str = "Lake houses are nice. People like them a lot. You should consider one.";

/// In-memory pages keyed by URL; unknown URLs fail like a 404.
struct Pages {
    pages: HashMap<String, RawContent>,
    search: Option<Vec<RawContent>>,
}

impl Pages {
    fn new() -> Self {
        let mut pages = HashMap::new();
        pages.insert(
            "https://lake.test/guide".to_string(),
            RawContent::new("Lake House Guide", "https://lake.test/guide", fixture("article.md")).with_usage(420),
        );
        pages.insert(
            "https://thin.test/page".to_string(),
            RawContent::new("Thin Page", "https://thin.test/page", THIN_PAGE).with_usage(30),
        );
        Self { pages, search: None }
    }

    fn with_search(mut self, results: Vec<RawContent>) -> Self {
        self.search = Some(results);
        self
    }
}

#[async_trait]
impl ContentSource for Pages {
    async fn read(&self, url: &str, _options: &ReadOptions) -> Result<RawContent> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| GeoError::Upstream { status: 404, message: format!("{url} not found") })
    }

    async fn search(&self, _query: &str, _options: &ReadOptions) -> Result<Vec<RawContent>> {
        self.search.clone().ok_or(GeoError::Upstream { status: 401, message: "search disabled".to_string() })
    }
}

/// Model that always answers with the fixture response, or always fails.
struct FixtureModel {
    fail: bool,
}

#[async_trait]
impl ModelClient for FixtureModel {
    async fn run(&self, _request: &ModelRequest) -> Result<String> {
        if self.fail {
            return Err(GeoError::Model("Workers AI returned 503".to_string()));
        }
        Ok(fixture("model_response.json"))
    }
}

fn analyzer() -> GeoAnalyzer {
    GeoAnalyzer::new(Arc::new(Pages::new()), GeoConfig::default())
}

fn analyzer_with_model(fail: bool) -> GeoAnalyzer {
    analyzer().with_model(Arc::new(FixtureModel { fail }))
}

const QUERY: &str = "how to rent a lake house";

#[tokio::test]
async fn test_analyze_without_model() {
    let envelope = analyzer().analyze("https://lake.test/guide", QUERY, AnalyzeOptions::default()).await.unwrap();

    assert_eq!(envelope.meta.features_used, vec![features::PATTERN_ANALYSIS]);
    assert_eq!(envelope.scores().citability(), 0.0);
    let expected = ((envelope.scores().extractability() + envelope.scores().readability()) / 2.0 * 10.0).round() / 10.0;
    assert_eq!(envelope.scores().overall(), expected);
    assert!(envelope.geo_analysis.metrics.semantic.is_none());

    assert_eq!(envelope.usage.neurons_used, 0);
    assert_eq!(envelope.usage.daily_remaining, 10000);
    assert_eq!(envelope.usage.jina_tokens_used, 420);
    assert!(!envelope.usage.cache_hit);
    assert_eq!(envelope.meta.version, "1.0.0");
}

#[tokio::test]
async fn test_analyze_with_model() {
    let envelope =
        analyzer_with_model(false).analyze("https://lake.test/guide", QUERY, AnalyzeOptions::default()).await.unwrap();

    assert!(envelope.used_feature(features::LLM_SEMANTIC_ANALYSIS));
    assert!(!envelope.used_feature(features::LLM_FALLBACK));
    assert_eq!(envelope.scores().citability(), 7.4);
    assert_eq!(envelope.usage.neurons_used, 50);
    assert_eq!(envelope.usage.daily_remaining, 9950);

    let methods: Vec<&str> = envelope.recommendations().iter().map(|r| r.method.as_str()).collect();
    assert!(methods.contains(&"Display Author Credentials"));
    assert_eq!(envelope.geo_analysis.chunking.average_coherence, Some(0.9));
}

#[tokio::test]
async fn test_model_failure_falls_back() {
    let envelope =
        analyzer_with_model(true).analyze("https://lake.test/guide", QUERY, AnalyzeOptions::default()).await.unwrap();

    assert_eq!(envelope.meta.features_used[0], features::PATTERN_ANALYSIS);
    assert_eq!(envelope.meta.features_used[1], features::LLM_FALLBACK);
    assert!(envelope.meta.features_used[2].starts_with("llm-error: "));
    assert!(envelope.meta.features_used[2].contains("503"));
    assert_eq!(envelope.usage.neurons_used, 0);
    assert!(envelope.scores().citability() >= 0.0);
    assert!(envelope.geo_analysis.metrics.semantic.is_some());
}

#[tokio::test]
async fn test_skip_semantic_option() {
    let options = AnalyzeOptions { skip_semantic: true, ..Default::default() };
    let envelope = analyzer_with_model(false).analyze("https://lake.test/guide", QUERY, options).await.unwrap();

    assert_eq!(envelope.meta.features_used, vec![features::PATTERN_ANALYSIS]);
    assert_eq!(envelope.usage.neurons_used, 0);
}

#[tokio::test]
async fn test_unreadable_target_is_an_error() {
    let err = analyzer().analyze("https://missing.test", QUERY, AnalyzeOptions::default()).await.unwrap_err();
    assert!(matches!(err, GeoError::Upstream { status: 404, .. }));

    let err = analyzer().analyze("  ", QUERY, AnalyzeOptions::default()).await.unwrap_err();
    assert!(matches!(err, GeoError::InvalidInput(_)));
}

#[tokio::test]
async fn test_explicit_competitors_with_failure() {
    let options = AnalyzeOptions {
        competitor_urls: vec!["https://thin.test/page".to_string(), "https://gone.test".to_string()],
        ..Default::default()
    };
    let envelope = analyzer().analyze("https://lake.test/guide", QUERY, options).await.unwrap();

    assert!(envelope.used_feature(features::COMPETITOR_ANALYSIS));
    assert_eq!(envelope.request.competitor_urls.as_ref().map(Vec::len), Some(2));

    let competitors = envelope.competitors.as_ref().unwrap();
    assert_eq!(competitors.analyses.len(), 1);
    assert_eq!(competitors.analyses[0].title, "Thin Page");
    assert_eq!(competitors.analyses[0].sentence_count, 3);
    assert_eq!(competitors.failures.len(), 1);
    assert_eq!(competitors.failures[0].url, "https://gone.test");
    assert_eq!(competitors.jina_results.query, QUERY);
}

#[tokio::test]
async fn test_discovery_failure_is_flagged() {
    let options = AnalyzeOptions { auto_discover_competitors: true, ..Default::default() };
    let envelope = analyzer().analyze("https://lake.test/guide", QUERY, options).await.unwrap();

    assert!(envelope.competitors.is_none());
    assert!(envelope.meta.features_used.iter().any(|f| f.starts_with("competitor-search-error: ")));
    assert!(!envelope.used_feature(features::COMPETITOR_ANALYSIS));
}

#[tokio::test]
async fn test_discovery_uses_search_results() {
    let source = Pages::new().with_search(vec![RawContent::new("Rival", "https://rival.test", THIN_PAGE)]);
    let analyzer = GeoAnalyzer::new(Arc::new(source), GeoConfig::default());
    let options = AnalyzeOptions {
        auto_discover_competitors: true,
        competitor_urls: vec!["https://ignored.test".to_string()],
        ..Default::default()
    };
    let envelope = analyzer.analyze("https://lake.test/guide", QUERY, options).await.unwrap();

    let competitors = envelope.competitors.unwrap();
    assert_eq!(competitors.analyses.len(), 1);
    assert_eq!(competitors.analyses[0].url, "https://rival.test");
    assert!(competitors.failures.is_empty());
}

#[tokio::test]
async fn test_analyze_text_defaults() {
    let envelope = analyzer().analyze_text(&fixture("article.md"), QUERY, TextOptions::default()).await.unwrap();

    assert_eq!(envelope.request.url, DEFAULT_TEXT_URL);
    assert_eq!(envelope.jina_content.title, DEFAULT_TEXT_TITLE);
    assert_eq!(envelope.jina_content.tokens_used(), 0);
    assert_eq!(envelope.meta.features_used, vec![features::PATTERN_ANALYSIS, features::TEXT_INPUT]);
}

#[tokio::test]
async fn test_analyze_text_normalizes_html() {
    let html = "<html><body><h1>Lake Houses</h1><p>Renting costs $300 per night.</p></body></html>";
    let options = TextOptions { title: Some("Draft".to_string()), ..Default::default() };
    let envelope = analyzer().analyze_text(html, QUERY, options).await.unwrap();

    assert_eq!(envelope.jina_content.title, "Draft");
    assert!(!envelope.jina_content.body.contains("<p>"));
    assert!(envelope.jina_content.body.contains("Renting costs $300 per night."));
}

#[tokio::test]
async fn test_compare_ranks_by_overall() {
    let urls = vec!["https://thin.test/page".to_string(), "https://lake.test/guide".to_string()];
    let report = analyzer().compare(&urls, QUERY).await.unwrap();

    assert_eq!(report.ranked.len(), 2);
    assert_eq!(report.ranked[0].rank, 1);
    assert!(report.ranked[0].scores.overall() >= report.ranked[1].scores.overall());
    assert_eq!(report.leader().map(|p| p.rank), Some(1));
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_compare_needs_two_successes() {
    let urls = vec!["https://lake.test/guide".to_string(), "https://gone.test".to_string()];
    let err = analyzer().compare(&urls, QUERY).await.unwrap_err();
    assert!(matches!(err, GeoError::InsufficientResults { needed: 2, succeeded: 1 }));

    let err = analyzer().compare(&urls[..1], QUERY).await.unwrap_err();
    assert!(matches!(err, GeoError::InvalidInput(_)));
}

#[tokio::test]
async fn test_compare_reports_failures() {
    let urls = vec![
        "https://lake.test/guide".to_string(),
        "https://gone.test".to_string(),
        "https://thin.test/page".to_string(),
    ];
    let report = analyzer().compare(&urls, QUERY).await.unwrap();

    assert_eq!(report.ranked.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, "https://gone.test");
}

#[tokio::test]
async fn test_validate_rewrite_deltas() {
    let validation =
        analyzer().validate_rewrite("https://thin.test/page", &fixture("article.md"), QUERY).await.unwrap();

    assert_eq!(validation.original_url, "https://thin.test/page");
    assert_eq!(validation.deltas.overall.before, validation.original.scores().overall());
    assert_eq!(validation.deltas.overall.after, validation.optimized.scores().overall());
    assert_eq!(validation.improved, validation.deltas.overall.change > 0.0);
    assert!(validation.optimized.used_feature(features::TEXT_INPUT));
}

#[tokio::test]
async fn test_envelope_json_shape() {
    let envelope = analyzer().analyze("https://lake.test/guide", QUERY, AnalyzeOptions::default()).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&JsonFormatter::default().convert(&envelope).unwrap()).unwrap();

    assert_eq!(json["request"]["url"], "https://lake.test/guide");
    assert!(json["request"].get("competitorUrls").is_none());
    assert_eq!(json["jinaContent"]["content"], fixture("article.md"));
    assert_eq!(json["jinaContent"]["usage"]["tokens"], 420);
    assert_eq!(json["geoAnalysis"]["targetQuery"], QUERY);
    assert!(json["geoAnalysis"]["scores"]["overall"].is_number());
    assert!(json["geoAnalysis"]["metrics"]["sentenceLength"].is_object());
    assert!(json["geoAnalysis"]["recommendations"].is_array());
    assert_eq!(json["usage"]["neuronsUsed"], 0);
    assert_eq!(json["meta"]["featuresUsed"][0], "pattern-analysis");
    assert!(json.get("competitors").is_none());
}

#[tokio::test]
async fn test_markdown_report() {
    let envelope =
        analyzer_with_model(false).analyze("https://lake.test/guide", QUERY, AnalyzeOptions::default()).await.unwrap();
    let markdown = formatters::render(&envelope, OutputFormat::Markdown).unwrap();

    assert!(markdown.starts_with("# GEO Analysis: Lake House Guide"));
    assert!(markdown.contains("| Citability | 7.4 |"));
    assert!(markdown.contains("Display Author Credentials"));
}
