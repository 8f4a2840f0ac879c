//! Model-backed semantic analysis with strict validation and a deterministic fallback.
//!
//! One prompt is sent per document through a [`ModelClient`]. The raw answer
//! is parsed by [`parse_response`], which either yields a fully validated
//! [`SemanticResult`] or a [`GeoError::SemanticParse`]. [`SemanticExtractor::extract`]
//! never fails: any error is replaced by [`SemanticExtractor::fallback_result`].

mod parse;
mod prompt;
mod types;

use std::sync::Arc;

pub use parse::{ValidationLimits, find_json_object, parse_response, strip_fences};
pub use prompt::{SYSTEM_INSTRUCTION, build_prompt, build_request, truncate_content};
pub use types::*;

use crate::model::ModelClient;
use crate::pattern::query_terms;
use crate::{GeoConfig, GeoError, Result};

/// Marker placed in `missingContext` when the fallback result is used.
pub const FALLBACK_MARKER: &str = "LLM analysis failed - using fallback";

/// Runs the semantic stage for one document at a time.
#[derive(Clone)]
pub struct SemanticExtractor {
    client: Arc<dyn ModelClient>,
    model_id: String,
    max_content_chars: usize,
    max_output_tokens: u32,
    temperature: f32,
    limits: ValidationLimits,
}

impl SemanticExtractor {
    pub fn new(client: Arc<dyn ModelClient>, config: &GeoConfig) -> Self {
        Self {
            client,
            model_id: config.model_id.clone(),
            max_content_chars: config.max_content_chars,
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            limits: config.limits.clone(),
        }
    }

    /// Use a different model than the configured default.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Analyze `content`, substituting the fallback result on any failure.
    pub async fn extract(&self, content: &str, target_query: &str) -> SemanticResult {
        match self.extract_or_throw(content, target_query).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "semantic extraction failed, using fallback");
                Self::fallback_result(content, target_query)
            }
        }
    }

    /// Analyze `content` and propagate transport or parse errors.
    ///
    /// # Errors
    ///
    /// [`GeoError::Model`] when the transport fails or returns blank text,
    /// [`GeoError::SemanticParse`] when the answer cannot be recovered.
    pub async fn extract_or_throw(&self, content: &str, target_query: &str) -> Result<SemanticResult> {
        let truncated = truncate_content(content, self.max_content_chars);
        if truncated.len() < content.len() {
            tracing::debug!(original = content.len(), kept = truncated.len(), "content truncated for model");
        }

        let request = build_request(
            &self.model_id,
            build_prompt(truncated, target_query),
            self.max_output_tokens,
            self.temperature,
        );

        let raw = self.client.run(&request).await.map_err(|e| match e {
            GeoError::Model(_) => e,
            other => GeoError::Model(other.to_string()),
        })?;
        if raw.trim().is_empty() {
            return Err(GeoError::Model("model returned an empty response".to_string()));
        }
        tracing::debug!(model = %self.model_id, chars = raw.len(), "model response received");

        parse_response(&raw, &self.limits)
    }

    /// Deterministic stand-in used when the model stage fails.
    ///
    /// All signals take their defaults; relevance is the fraction of query
    /// terms that literally occur in `content` (zero for an empty query).
    pub fn fallback_result(content: &str, target_query: &str) -> SemanticResult {
        let terms = query_terms(target_query);
        let topical_relevance = if terms.is_empty() {
            0.0
        } else {
            let lower = content.to_lowercase();
            let matched = terms.iter().filter(|t| lower.contains(t.as_str())).count();
            (matched as f64 / terms.len() as f64).min(1.0)
        };

        SemanticResult {
            semantic_triples: Vec::new(),
            advanced_entities: Vec::new(),
            chunk_coherence: ChunkCoherence {
                coherent: true,
                missing_context: vec![FALLBACK_MARKER.to_string()],
                self_contained: true,
            },
            topical_relevance,
            structure_quality: StructureQuality::default(),
            data_point_metrics: DataPointMetrics::default(),
            originality_signals: OriginalitySignals::default(),
            writing_quality: WritingQuality::default(),
            eeat_signals: EeatSignals::default(),
            actionability: ActionabilityAssessment::default(),
            entity_coverage: EntityCoverage::default(),
            overall_assessment: None,
        }
    }
}

impl std::fmt::Debug for SemanticExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticExtractor")
            .field("model_id", &self.model_id)
            .field("max_content_chars", &self.max_content_chars)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn is_fallback(result: &SemanticResult) -> bool {
        result.semantic_triples.is_empty()
            && result.advanced_entities.is_empty()
            && result.chunk_coherence.missing_context.iter().any(|m| m == FALLBACK_MARKER)
    }

    struct Scripted {
        reply: Result<String>,
        seen: Mutex<Vec<ModelRequest>>,
    }

    impl Scripted {
        fn new(reply: Result<String>) -> Arc<Self> {
            Arc::new(Self { reply, seen: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl ModelClient for Scripted {
        async fn run(&self, request: &ModelRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(GeoError::Model(e.to_string())),
            }
        }
    }

    fn extractor(client: Arc<Scripted>) -> SemanticExtractor {
        SemanticExtractor::new(client, &GeoConfig::default())
    }

    #[test]
    fn test_fallback_relevance() {
        let result = SemanticExtractor::fallback_result("Lake houses on Lake Tahoe", "lake house rentals");
        assert!((result.topical_relevance - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.chunk_coherence.missing_context, vec![FALLBACK_MARKER]);
        assert!(is_fallback(&result));
    }

    #[test]
    fn test_fallback_empty_query() {
        let result = SemanticExtractor::fallback_result("anything", "   ");
        assert_eq!(result.topical_relevance, 0.0);
    }

    #[tokio::test]
    async fn test_extract_parses_model_answer() {
        let client = Scripted::new(Ok(r#"{"entities": [{"text": "Acme", "type": "ORGANIZATION"}]}"#.to_string()));
        let result = extractor(client.clone()).extract("Acme builds things.", "acme").await;

        assert_eq!(result.advanced_entities.len(), 1);
        assert!(!is_fallback(&result));

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].model, crate::DEFAULT_MODEL_ID);
        assert_eq!(seen[0].max_tokens, 4500);
        assert!(seen[0].messages[1].content.contains("Acme builds things."));
    }

    #[tokio::test]
    async fn test_blank_answer_is_model_error() {
        let client = Scripted::new(Ok("  \n".to_string()));
        let err = extractor(client).extract_or_throw("text", "q").await.unwrap_err();
        assert!(matches!(err, GeoError::Model(_)));
    }

    #[tokio::test]
    async fn test_transport_error_becomes_fallback() {
        let client = Scripted::new(Err(GeoError::Model("503".to_string())));
        let result = extractor(client).extract("text about lakes", "lakes").await;
        assert!(is_fallback(&result));
        assert_eq!(result.topical_relevance, 1.0);
    }

    #[tokio::test]
    async fn test_long_content_is_truncated_before_prompting() {
        let client = Scripted::new(Ok(r#"{"entities": []}"#.to_string()));
        let config = GeoConfig::builder().max_content_chars(20).build();
        let extractor = SemanticExtractor::new(client.clone(), &config);
        extractor.extract("Short first. This second sentence is far too long.", "q").await;

        let seen = client.seen.lock().unwrap();
        assert!(seen[0].messages[1].content.contains("Short first."));
        assert!(!seen[0].messages[1].content.contains("second sentence"));
    }
}
