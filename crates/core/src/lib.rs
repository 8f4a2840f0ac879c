pub mod analyzer;
pub mod compare;
pub mod competitor;
pub mod config;
pub mod content;
pub mod envelope;
pub mod error;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod formatters;
pub mod model;
pub mod pattern;
pub mod recommend;
pub mod semantic;
pub mod source;
pub mod synthesis;
#[cfg(feature = "fetch")]
pub mod workers_ai;

pub use analyzer::{AnalyzeOptions, DEFAULT_TEXT_TITLE, DEFAULT_TEXT_URL, GeoAnalyzer, TextOptions};
pub use compare::{ComparisonReport, RankedPage, RewriteValidation, ScoreDelta, ScoreDeltas};
pub use competitor::{CompetitorAnalysis, analyze_competitors};
pub use config::{DEFAULT_MODEL_ID, GeoConfig, GeoConfigBuilder};
pub use content::{ContentUsage, RawContent};
pub use envelope::{AnalysisEnvelope, CompetitorBlock, Failure, GeoAnalysis, Meta, RequestInfo, Usage, features};
pub use error::{GeoError, Result};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, JinaReader, validate_url};
pub use formatters::{JsonConfig, JsonFormatter, MarkdownConfig, MarkdownFormatter, OutputFormat};
pub use model::{ChatMessage, ModelClient, ModelRequest};
pub use pattern::{Chunking, PatternAnalysisResult, PatternAnalyzer, PatternConfig, PatternScores};
pub use recommend::{Impact, Priority, Recommendation, RecommendationConfig, RecommendationEngine, RuleFamily};
pub use semantic::{SemanticExtractor, SemanticResult, ValidationLimits, parse_response};
pub use source::{BatchRead, ContentSource, ReadOptions, read_file, read_stdin};
pub use synthesis::{GeoMetrics, ScoreSynthesizer, Scores, SynthesisConfig, Synthesis};
#[cfg(feature = "fetch")]
pub use workers_ai::WorkersAiClient;
