//! Result types for multi-page comparison and rewrite validation.

use serde::Serialize;

use crate::envelope::{AnalysisEnvelope, Failure};
use crate::synthesis::{Scores, round1};

/// Before/after movement of one score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDelta {
    pub before: f64,
    pub after: f64,
    /// `after - before`, one decimal.
    pub change: f64,
    /// Whole-percent change relative to `before`; absent when `before` is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<i64>,
}

impl ScoreDelta {
    pub fn new(before: f64, after: f64) -> Self {
        // Halves round toward positive infinity, so -37.5 becomes -37.
        let percent_change = (before != 0.0).then(|| ((after - before) / before * 100.0 + 0.5).floor() as i64);
        Self { before, after, change: round1(after - before), percent_change }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreDeltas {
    pub overall: ScoreDelta,
    pub extractability: ScoreDelta,
    pub readability: ScoreDelta,
    pub citability: ScoreDelta,
}

impl ScoreDeltas {
    pub fn between(before: &Scores, after: &Scores) -> Self {
        Self {
            overall: ScoreDelta::new(before.overall(), after.overall()),
            extractability: ScoreDelta::new(before.extractability(), after.extractability()),
            readability: ScoreDelta::new(before.readability(), after.readability()),
            citability: ScoreDelta::new(before.citability(), after.citability()),
        }
    }
}

/// Outcome of comparing an existing page with a rewritten version of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteValidation {
    pub query: String,
    pub original_url: String,
    pub deltas: ScoreDeltas,
    /// Overall score went up.
    pub improved: bool,
    /// Recommendation methods that no longer apply after the rewrite.
    pub resolved_recommendations: Vec<String>,
    /// Recommendation methods that only apply after the rewrite.
    pub new_recommendations: Vec<String>,
    pub original: AnalysisEnvelope,
    pub optimized: AnalysisEnvelope,
}

impl RewriteValidation {
    pub fn new(query: &str, original: AnalysisEnvelope, optimized: AnalysisEnvelope) -> Self {
        let deltas = ScoreDeltas::between(original.scores(), optimized.scores());
        let before = methods(&original);
        let after = methods(&optimized);

        Self {
            query: query.to_string(),
            original_url: original.request.url.clone(),
            deltas,
            improved: deltas.overall.change > 0.0,
            resolved_recommendations: before.iter().filter(|m| !after.contains(m)).cloned().collect(),
            new_recommendations: after.iter().filter(|m| !before.contains(m)).cloned().collect(),
            original,
            optimized,
        }
    }
}

fn methods(envelope: &AnalysisEnvelope) -> Vec<String> {
    envelope.recommendations().iter().map(|r| r.method.clone()).collect()
}

/// One successfully analyzed page in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPage {
    pub rank: usize,
    pub url: String,
    pub title: String,
    pub scores: Scores,
    pub recommendation_count: usize,
    pub top_recommendations: Vec<String>,
}

/// Pages ranked by overall score, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub query: String,
    pub analyzed_at: String,
    pub ranked: Vec<RankedPage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<Failure>,
}

impl ComparisonReport {
    /// Rank envelopes by overall score; ties keep input order.
    pub fn rank(query: &str, analyzed_at: String, mut envelopes: Vec<AnalysisEnvelope>, failures: Vec<Failure>) -> Self {
        envelopes.sort_by(|a, b| b.scores().overall().total_cmp(&a.scores().overall()));

        let ranked = envelopes
            .iter()
            .enumerate()
            .map(|(i, e)| RankedPage {
                rank: i + 1,
                url: e.request.url.clone(),
                title: e.jina_content.title.clone(),
                scores: *e.scores(),
                recommendation_count: e.recommendations().len(),
                top_recommendations: e.recommendations().iter().take(3).map(|r| r.method.clone()).collect(),
            })
            .collect();

        Self { query: query.to_string(), analyzed_at, ranked, failures }
    }

    pub fn leader(&self) -> Option<&RankedPage> {
        self.ranked.first()
    }
}
