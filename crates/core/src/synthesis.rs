//! Fusion of pattern metrics and semantic signals into composite scores.

use serde::Serialize;

use crate::pattern::{Chunking, PatternAnalysisResult, PatternMetrics};
use crate::semantic::SemanticResult;

/// Weights and caps for the citability formula.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Points per semantic triple
    pub triple_weight: f64,
    /// Entities needed per point
    pub entity_divisor: f64,
    /// Cap for the triple and entity components, and for citability itself
    pub component_cap: f64,
    /// Bonus per reported statistic
    pub statistic_weight: f64,
    /// Cap for the statistics bonus
    pub data_point_cap: f64,
    /// Multiplier applied to the originality score
    pub originality_weight: f64,
    /// Divisor applied to the component sum
    pub citability_divisor: f64,
    /// Coherence reported for chunks the model judged coherent
    pub coherent_chunk_score: f64,
    /// Coherence reported otherwise
    pub incoherent_chunk_score: f64,
    /// Triples quoted in the metrics
    pub max_triple_examples: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            triple_weight: 2.0,
            entity_divisor: 2.0,
            component_cap: 10.0,
            statistic_weight: 0.2,
            data_point_cap: 2.0,
            originality_weight: 2.0,
            citability_divisor: 2.5,
            coherent_chunk_score: 0.9,
            incoherent_chunk_score: 0.7,
            max_triple_examples: 3,
        }
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clamp to the `[0,10]` score range, mapping NaN to zero.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 10.0) }
}

/// The four composite scores of one analysis.
///
/// `overall` is derived when the value is built and has no setter, so it can
/// never disagree with the other three.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    overall: f64,
    extractability: f64,
    readability: f64,
    citability: f64,
}

impl Scores {
    /// Scores without semantic signals: citability is zero and `overall`
    /// averages the two pattern scores.
    pub fn pattern_only(extractability: f64, readability: f64) -> Self {
        let extractability = round1(clamp_score(extractability));
        let readability = round1(clamp_score(readability));
        Self { overall: round1((extractability + readability) / 2.0), extractability, readability, citability: 0.0 }
    }

    /// Scores with a citability dimension; `overall` averages all three using
    /// the unrounded citability.
    pub fn with_citability(extractability: f64, readability: f64, citability: f64) -> Self {
        let extractability = round1(clamp_score(extractability));
        let readability = round1(clamp_score(readability));
        let citability = clamp_score(citability);
        Self {
            overall: round1((extractability + readability + citability) / 3.0),
            extractability,
            readability,
            citability: round1(citability),
        }
    }

    pub fn overall(&self) -> f64 {
        self.overall
    }

    pub fn extractability(&self) -> f64 {
        self.extractability
    }

    pub fn readability(&self) -> f64 {
        self.readability
    }

    pub fn citability(&self) -> f64 {
        self.citability
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripleExample {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripleSummary {
    pub total: usize,
    /// Triples per sentence, two decimals.
    pub density: f64,
    /// Mean triple confidence, two decimals.
    pub quality: f64,
    pub examples: Vec<TripleExample>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    pub total: usize,
    pub distinct_types: usize,
    /// Mean entity importance, two decimals.
    pub average_importance: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPointSummary {
    pub statistics_count: u32,
    pub numerical_claims: u32,
    pub research_citations: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalitySummary {
    pub score: f64,
    pub has_original_research: bool,
    pub has_unique_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingSummary {
    pub active_voice_percentage: f64,
    pub passive_voice_count: u32,
    pub ai_slop_detected: bool,
    pub ai_slop_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EeatSummary {
    pub has_author: bool,
    pub has_credentials: bool,
    pub has_expertise: bool,
    pub trust_signals_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionabilitySummary {
    pub score: f64,
    pub has_implementation_steps: bool,
}

/// Metrics that only exist when the semantic stage produced a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticMetrics {
    pub semantic_triples: TripleSummary,
    pub semantic_entities: EntitySummary,
    pub data_points: DataPointSummary,
    pub originality: OriginalitySummary,
    pub writing_quality: WritingSummary,
    pub eeat: EeatSummary,
    pub actionability: ActionabilitySummary,
    pub topical_relevance: f64,
}

/// Pattern metrics, extended with semantic metrics when available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoMetrics {
    #[serde(flatten)]
    pub pattern: PatternMetrics,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Synthesis {
    pub scores: Scores,
    pub metrics: GeoMetrics,
    pub chunking: Chunking,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreSynthesizer {
    config: SynthesisConfig,
}

impl ScoreSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    /// Unrounded citability of a semantic result, in `[0,10]`.
    pub fn citability(&self, semantic: &SemanticResult) -> f64 {
        let c = &self.config;
        let triple_score = (semantic.semantic_triples.len() as f64 * c.triple_weight).min(c.component_cap);
        let entity_score = (semantic.advanced_entities.len() as f64 / c.entity_divisor).min(c.component_cap);
        let data_point_bonus =
            (f64::from(semantic.data_point_metrics.statistics_count) * c.statistic_weight).min(c.data_point_cap);
        let originality_bonus = semantic.originality_signals.originality_score * c.originality_weight;
        let eeat_bonus = f64::from(u8::from(semantic.eeat_signals.has_author_attribution))
            + f64::from(u8::from(semantic.eeat_signals.has_credentials));

        let sum = triple_score + entity_score + data_point_bonus + originality_bonus + eeat_bonus;
        clamp_score((sum / c.citability_divisor).min(c.component_cap))
    }

    /// Combine a pattern result with optional semantic signals.
    pub fn synthesize(&self, pattern: &PatternAnalysisResult, semantic: Option<&SemanticResult>) -> Synthesis {
        let Some(semantic) = semantic else {
            return Synthesis {
                scores: Scores::pattern_only(pattern.scores.extractability, pattern.scores.readability),
                metrics: GeoMetrics { pattern: pattern.metrics.clone(), semantic: None },
                chunking: pattern.chunking.clone(),
            };
        };

        let scores = Scores::with_citability(
            pattern.scores.extractability,
            pattern.scores.readability,
            self.citability(semantic),
        );

        let coherence = if semantic.chunk_coherence.coherent {
            self.config.coherent_chunk_score
        } else {
            self.config.incoherent_chunk_score
        };
        let chunking = Chunking {
            average_coherence: Some(coherence),
            problematic_boundaries: Some(semantic.chunk_coherence.missing_context.len()),
            ..pattern.chunking.clone()
        };

        Synthesis {
            scores,
            metrics: GeoMetrics {
                pattern: pattern.metrics.clone(),
                semantic: Some(self.semantic_metrics(pattern, semantic)),
            },
            chunking,
        }
    }

    fn semantic_metrics(&self, pattern: &PatternAnalysisResult, s: &SemanticResult) -> SemanticMetrics {
        let sentences = pattern.metrics.sentence_length.total_sentences;
        let triples = s.semantic_triples.len();

        SemanticMetrics {
            semantic_triples: TripleSummary {
                total: triples,
                density: if sentences == 0 { 0.0 } else { round2(triples as f64 / sentences as f64) },
                quality: s.average_triple_confidence(),
                examples: s
                    .semantic_triples
                    .iter()
                    .take(self.config.max_triple_examples)
                    .map(|t| TripleExample {
                        subject: t.subject.clone(),
                        predicate: t.predicate.clone(),
                        object: t.object.clone(),
                        confidence: t.confidence,
                    })
                    .collect(),
            },
            semantic_entities: EntitySummary {
                total: s.advanced_entities.len(),
                distinct_types: s.entity_kind_count(),
                average_importance: s.average_entity_importance(),
            },
            data_points: DataPointSummary {
                statistics_count: s.data_point_metrics.statistics_count,
                numerical_claims: s.data_point_metrics.numerical_claims_count,
                research_citations: s.data_point_metrics.research_citations_count,
            },
            originality: OriginalitySummary {
                score: s.originality_signals.originality_score,
                has_original_research: s.originality_signals.has_original_research,
                has_unique_data: s.originality_signals.has_unique_data,
            },
            writing_quality: WritingSummary {
                active_voice_percentage: s.writing_quality.active_voice_percentage,
                passive_voice_count: s.writing_quality.passive_voice_instances,
                ai_slop_detected: s.writing_quality.ai_slop_indicators.detected,
                ai_slop_confidence: s.writing_quality.ai_slop_indicators.confidence,
            },
            eeat: EeatSummary {
                has_author: s.eeat_signals.has_author_attribution,
                has_credentials: s.eeat_signals.has_credentials,
                has_expertise: s.eeat_signals.has_expertise_markers,
                trust_signals_count: s.eeat_signals.trust_signals.len(),
            },
            actionability: ActionabilitySummary {
                score: s.actionability.actionability_score,
                has_implementation_steps: s.actionability.has_actionable_steps,
            },
            topical_relevance: s.topical_relevance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternScores;

    #[test]
    fn test_pattern_only_scores() {
        let scores = Scores::pattern_only(6.0, 7.5);
        assert_eq!(scores.citability(), 0.0);
        assert_eq!(scores.overall(), 6.8);
    }

    #[test]
    fn test_scores_are_clamped() {
        let scores = Scores::with_citability(14.0, -2.0, f64::NAN);
        assert_eq!(scores.extractability(), 10.0);
        assert_eq!(scores.readability(), 0.0);
        assert_eq!(scores.citability(), 0.0);
        assert_eq!(scores.overall(), 3.3);
    }

    #[test]
    fn test_citability_rounded_for_display() {
        let scores = Scores::with_citability(5.0, 5.0, 7.36);
        assert_eq!(scores.citability(), 7.4);
        assert_eq!(scores.overall(), 5.8);
    }

    #[test]
    fn test_degraded_synthesis_passes_pattern_through() {
        let pattern = PatternAnalysisResult {
            scores: PatternScores { extractability: 4.2, readability: 8.0 },
            ..Default::default()
        };
        let synthesis = ScoreSynthesizer::default().synthesize(&pattern, None);
        assert_eq!(synthesis.scores.overall(), 6.1);
        assert!(synthesis.metrics.semantic.is_none());
        assert_eq!(synthesis.chunking, pattern.chunking);
    }

    #[test]
    fn test_serialized_scores_shape() {
        let json = serde_json::to_value(Scores::pattern_only(5.0, 5.0)).unwrap();
        assert_eq!(json["overall"], 5.0);
        assert_eq!(json["citability"], 0.0);
    }
}
