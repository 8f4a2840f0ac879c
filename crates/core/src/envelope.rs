//! The analysis envelope returned by every analyze call.
//!
//! Field names are part of the boundary format consumed by dashboards and
//! tooling, so every struct serializes camelCase.

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::RawContent;
use crate::competitor::CompetitorAnalysis;
use crate::pattern::Chunking;
use crate::recommend::Recommendation;
use crate::synthesis::{GeoMetrics, Scores};

/// Values recorded in `meta.featuresUsed`.
pub mod features {
    pub const PATTERN_ANALYSIS: &str = "pattern-analysis";
    pub const TEXT_INPUT: &str = "text-input";
    pub const LLM_SEMANTIC_ANALYSIS: &str = "llm-semantic-analysis";
    pub const LLM_FALLBACK: &str = "llm-fallback";
    pub const COMPETITOR_ANALYSIS: &str = "competitor-analysis";

    pub fn llm_error(reason: impl std::fmt::Display) -> String {
        format!("llm-error: {reason}")
    }

    pub fn competitor_search_error(reason: impl std::fmt::Display) -> String {
        format!("competitor-search-error: {reason}")
    }
}

/// Current UTC time as an RFC 3339 timestamp.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    pub url: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitor_urls: Option<Vec<String>>,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoAnalysis {
    pub analyzed_at: String,
    pub version: String,
    pub target_query: String,
    pub scores: Scores,
    pub metrics: GeoMetrics,
    pub chunking: Chunking,
    pub recommendations: Vec<Recommendation>,
}

/// A URL that could not be read or analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorResults {
    pub query: String,
    pub results: Vec<RawContent>,
    pub retrieved_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorBlock {
    pub jina_results: CompetitorResults,
    pub analyses: Vec<CompetitorAnalysis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<Failure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub neurons_used: u32,
    pub jina_tokens_used: u64,
    pub daily_remaining: u32,
    pub cache_hit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub version: String,
    /// Wall-clock milliseconds spent in the analyze call.
    pub processing_time: u64,
    pub features_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEnvelope {
    pub request: RequestInfo,
    pub jina_content: RawContent,
    pub geo_analysis: GeoAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitors: Option<CompetitorBlock>,
    pub usage: Usage,
    pub meta: Meta,
}

impl AnalysisEnvelope {
    pub fn scores(&self) -> &Scores {
        &self.geo_analysis.scores
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.geo_analysis.recommendations
    }

    pub fn used_feature(&self, flag: &str) -> bool {
        self.meta.features_used.iter().any(|f| f == flag)
    }
}
