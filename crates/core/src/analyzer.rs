//! The analysis pipeline.
//!
//! [`GeoAnalyzer`] sequences one document through reading, pattern analysis,
//! the optional semantic stage, score synthesis and recommendation rules, and
//! optionally gathers competitor documents alongside. The semantic stage is
//! isolated: its failure is recorded in `meta.featuresUsed` and the
//! deterministic fallback takes its place.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use geolens_core::{AnalyzeOptions, FetchConfig, GeoAnalyzer, GeoConfig, JinaReader};
//!
//! # async fn run() -> geolens_core::Result<()> {
//! let reader = JinaReader::new(FetchConfig::default())?;
//! let analyzer = GeoAnalyzer::new(Arc::new(reader), GeoConfig::default());
//! let envelope = analyzer
//!     .analyze("https://example.com/guide", "how to rent a lake house", AnalyzeOptions::default())
//!     .await?;
//! println!("overall: {}", envelope.scores().overall());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::{join, join_all};

use crate::competitor::analyze_competitors;
use crate::compare::{ComparisonReport, RewriteValidation};
use crate::envelope::{
    AnalysisEnvelope, CompetitorBlock, CompetitorResults, Failure, GeoAnalysis, Meta, RequestInfo, Usage, features,
    now_rfc3339,
};
use crate::model::ModelClient;
use crate::pattern::PatternAnalyzer;
use crate::recommend::{Recommendation, RecommendationEngine};
use crate::semantic::{SemanticExtractor, SemanticResult};
use crate::source::{ContentSource, ReadOptions};
use crate::synthesis::ScoreSynthesizer;
use crate::{GeoConfig, GeoError, RawContent, Result};

/// Title used for caller-supplied text without one.
pub const DEFAULT_TEXT_TITLE: &str = "Optimized Content";

/// URL used for caller-supplied text without one.
pub const DEFAULT_TEXT_URL: &str = "text://optimized-content";

/// Options for [`GeoAnalyzer::analyze`].
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Competitor pages to read alongside the target.
    pub competitor_urls: Vec<String>,
    /// Discover competitors by searching for the query; takes precedence over `competitor_urls`.
    pub auto_discover_competitors: bool,
    /// Skip the semantic stage even when a model is configured.
    pub skip_semantic: bool,
    /// Model override for this call.
    pub model_id: Option<String>,
    /// Hints for reading the target page.
    pub read: ReadOptions,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            competitor_urls: Vec::new(),
            auto_discover_competitors: false,
            skip_semantic: false,
            model_id: None,
            read: ReadOptions { with_images_summary: true, with_links_summary: true },
        }
    }
}

/// Options for [`GeoAnalyzer::analyze_text`].
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    pub title: Option<String>,
    pub url: Option<String>,
    pub skip_semantic: bool,
    pub model_id: Option<String>,
}

/// Result of the pipeline before the envelope is assembled.
struct PipelineRun {
    analysis: GeoAnalysis,
    semantic_succeeded: bool,
    flags: Vec<String>,
}

/// Runs the full scoring pipeline against a content source and an optional model.
#[derive(Clone)]
pub struct GeoAnalyzer {
    source: Arc<dyn ContentSource>,
    model: Option<Arc<dyn ModelClient>>,
    config: GeoConfig,
    pattern: PatternAnalyzer,
    synthesizer: ScoreSynthesizer,
    engine: RecommendationEngine,
}

impl GeoAnalyzer {
    /// Creates an analyzer without a model; the semantic stage is skipped until one is attached.
    pub fn new(source: Arc<dyn ContentSource>, config: GeoConfig) -> Self {
        Self {
            source,
            model: None,
            pattern: PatternAnalyzer::new(config.pattern.clone()),
            synthesizer: ScoreSynthesizer::new(config.synthesis.clone()),
            engine: RecommendationEngine::new(config.recommendations.clone()),
            config,
        }
    }

    pub fn with_model(mut self, model: Arc<dyn ModelClient>) -> Self {
        self.model = Some(model);
        self
    }

    /// A copy of this analyzer reading through a different source.
    pub fn with_source(&self, source: Arc<dyn ContentSource>) -> Self {
        Self { source, ..self.clone() }
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Read `url` and analyze it for `query`.
    ///
    /// # Errors
    ///
    /// Fails only when the target page cannot be read. Semantic and competitor
    /// failures are recorded as feature flags.
    pub async fn analyze(&self, url: &str, query: &str, options: AnalyzeOptions) -> Result<AnalysisEnvelope> {
        if url.trim().is_empty() {
            return Err(GeoError::InvalidInput("url must not be empty".to_string()));
        }
        let started = Instant::now();
        let analyzed_at = now_rfc3339();

        let content = self.source.read(url, &options.read).await?;
        tracing::debug!(%url, chars = content.body.len(), "content read");

        let (mut run, (competitors, competitor_flags)) = join(
            self.run_pipeline(&content, query, options.skip_semantic, options.model_id.as_deref()),
            self.gather_competitors(query, &options),
        )
        .await;

        let mut features_used = vec![features::PATTERN_ANALYSIS.to_string()];
        features_used.append(&mut run.flags);
        features_used.extend(competitor_flags);

        let request = RequestInfo {
            url: url.to_string(),
            query: query.to_string(),
            competitor_urls: (!options.competitor_urls.is_empty()).then(|| options.competitor_urls.clone()),
            analyzed_at,
        };
        Ok(self.envelope(request, content, run, competitors, features_used, started))
    }

    /// Analyze caller-supplied text; nothing is read from the content source.
    pub async fn analyze_text(&self, text: &str, query: &str, options: TextOptions) -> Result<AnalysisEnvelope> {
        let started = Instant::now();
        let analyzed_at = now_rfc3339();

        let title = options.title.unwrap_or_else(|| DEFAULT_TEXT_TITLE.to_string());
        let url = options.url.unwrap_or_else(|| DEFAULT_TEXT_URL.to_string());
        let content = RawContent::from_text(title, url.clone(), text).with_usage(0);

        let mut run = self.run_pipeline(&content, query, options.skip_semantic, options.model_id.as_deref()).await;

        let mut features_used = vec![features::PATTERN_ANALYSIS.to_string(), features::TEXT_INPUT.to_string()];
        features_used.append(&mut run.flags);

        let request = RequestInfo { url, query: query.to_string(), competitor_urls: None, analyzed_at };
        Ok(self.envelope(request, content, run, None, features_used, started))
    }

    /// Analyze several pages for the same query and rank them by overall score.
    ///
    /// # Errors
    ///
    /// [`GeoError::InvalidInput`] for fewer than two URLs,
    /// [`GeoError::InsufficientResults`] when fewer than two pages succeed.
    pub async fn compare(&self, urls: &[String], query: &str) -> Result<ComparisonReport> {
        const NEEDED: usize = 2;
        if urls.len() < NEEDED {
            return Err(GeoError::InvalidInput(format!("compare needs at least {NEEDED} URLs")));
        }

        let analyses = join_all(urls.iter().map(|url| async move {
            let options = AnalyzeOptions::default();
            (url, self.analyze(url, query, options).await)
        }))
        .await;

        let mut envelopes = Vec::new();
        let mut failures = Vec::new();
        for (url, outcome) in analyses {
            match outcome {
                Ok(envelope) => envelopes.push(envelope),
                Err(e) => {
                    tracing::warn!(%url, error = %e, "comparison page failed");
                    failures.push(Failure { url: url.clone(), error: e.to_string() });
                }
            }
        }

        if envelopes.len() < NEEDED {
            return Err(GeoError::InsufficientResults { needed: NEEDED, succeeded: envelopes.len() });
        }
        Ok(ComparisonReport::rank(query, now_rfc3339(), envelopes, failures))
    }

    /// Analyze an existing page and a rewrite of it, and report per-score deltas.
    pub async fn validate_rewrite(
        &self, original_url: &str, optimized_text: &str, query: &str,
    ) -> Result<RewriteValidation> {
        let (original, optimized) = join(
            self.analyze(original_url, query, AnalyzeOptions::default()),
            self.analyze_text(optimized_text, query, TextOptions::default()),
        )
        .await;
        Ok(RewriteValidation::new(query, original?, optimized?))
    }

    async fn run_pipeline(
        &self, content: &RawContent, query: &str, skip_semantic: bool, model_id: Option<&str>,
    ) -> PipelineRun {
        let pattern = self.pattern.analyze(&content.body, query);

        let mut flags = Vec::new();
        let mut semantic_succeeded = false;
        let semantic = match (&self.model, skip_semantic) {
            (Some(client), false) => {
                let mut extractor = SemanticExtractor::new(Arc::clone(client), &self.config);
                if let Some(model_id) = model_id {
                    extractor = extractor.with_model_id(model_id);
                }
                match extractor.extract_or_throw(&content.body, query).await {
                    Ok(result) => {
                        semantic_succeeded = true;
                        flags.push(features::LLM_SEMANTIC_ANALYSIS.to_string());
                        Some(result)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "semantic stage failed, using fallback");
                        flags.push(features::LLM_FALLBACK.to_string());
                        flags.push(features::llm_error(&e));
                        Some(SemanticExtractor::fallback_result(&content.body, query))
                    }
                }
            }
            _ => None,
        };

        let synthesis = self.synthesizer.synthesize(&pattern, semantic.as_ref());
        let recommendations = self.recommendations(pattern.recommendations, semantic.as_ref());
        tracing::debug!(
            overall = synthesis.scores.overall(),
            recommendations = recommendations.len(),
            semantic = semantic.is_some(),
            "analysis synthesized"
        );

        PipelineRun {
            analysis: GeoAnalysis {
                analyzed_at: now_rfc3339(),
                version: self.config.analyzer_version.clone(),
                target_query: query.to_string(),
                scores: synthesis.scores,
                metrics: synthesis.metrics,
                chunking: synthesis.chunking,
                recommendations,
            },
            semantic_succeeded,
            flags,
        }
    }

    fn recommendations(&self, mut pattern: Vec<Recommendation>, semantic: Option<&SemanticResult>) -> Vec<Recommendation> {
        if let Some(signals) = semantic {
            pattern.extend(self.engine.generate(signals));
        }
        pattern
    }

    async fn gather_competitors(&self, query: &str, options: &AnalyzeOptions) -> (Option<CompetitorBlock>, Vec<String>) {
        let competitor_options = ReadOptions::default();

        let (results, failures) = if options.auto_discover_competitors {
            match self.source.search(query, &competitor_options).await {
                Ok(results) => (results, Vec::new()),
                Err(e) => {
                    tracing::warn!(error = %e, "competitor discovery failed");
                    return (None, vec![features::competitor_search_error(&e)]);
                }
            }
        } else if !options.competitor_urls.is_empty() {
            let reads = self.source.read_batch(&options.competitor_urls, &competitor_options).await;
            let mut results = Vec::new();
            let mut failures = Vec::new();
            for read in reads {
                match read.outcome {
                    Ok(content) => results.push(content),
                    Err(e) => {
                        tracing::warn!(url = %read.url, error = %e, "competitor read failed");
                        failures.push(Failure { url: read.url, error: e.to_string() });
                    }
                }
            }
            (results, failures)
        } else {
            return (None, Vec::new());
        };

        let block = CompetitorBlock {
            analyses: analyze_competitors(&results),
            jina_results: CompetitorResults { query: query.to_string(), results, retrieved_at: now_rfc3339() },
            failures,
        };
        (Some(block), vec![features::COMPETITOR_ANALYSIS.to_string()])
    }

    fn envelope(
        &self, request: RequestInfo, content: RawContent, run: PipelineRun, competitors: Option<CompetitorBlock>,
        features_used: Vec<String>, started: Instant,
    ) -> AnalysisEnvelope {
        let neurons_used = if run.semantic_succeeded { self.config.neurons_per_analysis } else { 0 };
        let usage = Usage {
            neurons_used,
            jina_tokens_used: content.tokens_used(),
            daily_remaining: self.config.daily_neuron_budget.saturating_sub(neurons_used),
            cache_hit: false,
        };
        let meta = Meta {
            version: self.config.analyzer_version.clone(),
            processing_time: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            features_used,
        };

        AnalysisEnvelope { request, jina_content: content, geo_analysis: run.analysis, competitors, usage, meta }
    }
}

impl std::fmt::Debug for GeoAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoAnalyzer")
            .field("model", &self.model.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
