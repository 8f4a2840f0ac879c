use std::collections::HashSet;

use serde::Serialize;

use crate::synthesis::round2;

/// A subject-predicate-object assertion extracted by the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    /// Model confidence in `[0,1]`.
    pub confidence: f64,
    pub is_active_voice: bool,
}

/// Entity categories the model is allowed to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Person,
    Organization,
    Location,
    Product,
    Technology,
    Metric,
}

impl EntityKind {
    /// Parses the exact upper-case wire name; anything else is rejected.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "PERSON" => Some(Self::Person),
            "ORGANIZATION" => Some(Self::Organization),
            "LOCATION" => Some(Self::Location),
            "PRODUCT" => Some(Self::Product),
            "TECHNOLOGY" => Some(Self::Technology),
            "METRIC" => Some(Self::Metric),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedEntity {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub context: String,
    /// Importance in `[0,1]`.
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkCoherence {
    pub coherent: bool,
    pub missing_context: Vec<String>,
    pub self_contained: bool,
}

impl Default for ChunkCoherence {
    fn default() -> Self {
        Self { coherent: true, missing_context: Vec::new(), self_contained: true }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingHierarchy {
    Clear,
    #[default]
    Partial,
    Poor,
}

impl HeadingHierarchy {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "clear" => Some(Self::Clear),
            "partial" => Some(Self::Partial),
            "poor" => Some(Self::Poor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureQuality {
    pub has_answer_first: bool,
    pub heading_hierarchy: HeadingHierarchy,
    pub questions_covered: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPointMetrics {
    pub statistics_count: u32,
    pub numerical_claims_count: u32,
    pub research_citations_count: u32,
    pub specific_examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalitySignals {
    pub has_personal_insights: bool,
    pub has_original_research: bool,
    pub has_unique_data: bool,
    pub has_expert_opinion: bool,
    /// Originality in `[0,1]`.
    pub originality_score: f64,
    pub generic_phrases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl Default for OriginalitySignals {
    fn default() -> Self {
        Self {
            has_personal_insights: false,
            has_original_research: false,
            has_unique_data: false,
            has_expert_opinion: false,
            originality_score: 0.5,
            generic_phrases: Vec::new(),
            analysis: None,
        }
    }
}

/// A flagged phrase with the model's suggested rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProblematicPhrase {
    pub phrase: String,
    pub context: String,
    pub suggestion: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSlopIndicators {
    pub detected: bool,
    /// Detection confidence in `[0,1]`.
    pub confidence: f64,
    pub problematic_phrases: Vec<ProblematicPhrase>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingQuality {
    pub passive_voice_instances: u32,
    pub passive_voice_examples: Vec<String>,
    /// Share of active-voice sentences in `[0,100]`.
    pub active_voice_percentage: f64,
    pub ai_slop_indicators: AiSlopIndicators,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Default for WritingQuality {
    fn default() -> Self {
        Self {
            passive_voice_instances: 0,
            passive_voice_examples: Vec::new(),
            active_voice_percentage: 70.0,
            ai_slop_indicators: AiSlopIndicators::default(),
            explanation: None,
        }
    }
}

/// Location value used when the author block is absent.
pub const AUTHOR_LOCATION_MISSING: &str = "missing";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorDetails {
    pub present: bool,
    pub location: String,
}

impl Default for AuthorDetails {
    fn default() -> Self {
        Self { present: false, location: AUTHOR_LOCATION_MISSING.to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EeatSignals {
    pub has_author_attribution: bool,
    pub has_credentials: bool,
    pub has_expertise_markers: bool,
    pub author_details: AuthorDetails,
    pub trust_signals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionabilityAssessment {
    pub has_actionable_steps: bool,
    pub implementation_guidance_present: bool,
    pub clear_next_steps: Vec<String>,
    /// Actionability in `[0,1]`.
    pub actionability_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl Default for ActionabilityAssessment {
    fn default() -> Self {
        Self {
            has_actionable_steps: false,
            implementation_guidance_present: false,
            clear_next_steps: Vec::new(),
            actionability_score: 0.5,
            analysis: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCoverage {
    pub core_entity_present: bool,
    pub related_entities_found: Vec<String>,
    pub missing_related_entities: Vec<String>,
    /// Entity density in `[0,1]`.
    pub entity_density_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl Default for EntityCoverage {
    fn default() -> Self {
        Self {
            core_entity_present: true,
            related_entities_found: Vec::new(),
            missing_related_entities: Vec::new(),
            entity_density_score: 0.5,
            analysis: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityAction {
    pub action: String,
    pub effort: String,
    pub impact: String,
    pub reasoning: String,
    pub implementation: String,
    pub expected_improvement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAssessment {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub quick_wins: Vec<String>,
    pub priority_actions: Vec<PriorityAction>,
}

/// Validated semantic analysis of one document.
///
/// Either every field comes from a successful parse (with per-field defaults
/// filling whatever the model omitted) or the whole value is the fallback
/// built by [`SemanticExtractor::fallback_result`](super::SemanticExtractor::fallback_result).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticResult {
    pub semantic_triples: Vec<SemanticTriple>,
    pub advanced_entities: Vec<AdvancedEntity>,
    pub chunk_coherence: ChunkCoherence,
    /// Topical relevance to the target query in `[0,1]`.
    pub topical_relevance: f64,
    pub structure_quality: StructureQuality,
    pub data_point_metrics: DataPointMetrics,
    pub originality_signals: OriginalitySignals,
    pub writing_quality: WritingQuality,
    pub eeat_signals: EeatSignals,
    pub actionability: ActionabilityAssessment,
    pub entity_coverage: EntityCoverage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_assessment: Option<OverallAssessment>,
}

impl SemanticResult {
    /// Mean triple confidence rounded to two decimals, zero without triples.
    pub fn average_triple_confidence(&self) -> f64 {
        if self.semantic_triples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.semantic_triples.iter().map(|t| t.confidence).sum();
        round2(sum / self.semantic_triples.len() as f64)
    }

    /// Mean entity importance rounded to two decimals, zero without entities.
    pub fn average_entity_importance(&self) -> f64 {
        if self.advanced_entities.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.advanced_entities.iter().map(|e| e.importance).sum();
        round2(sum / self.advanced_entities.len() as f64)
    }

    /// Number of distinct entity kinds reported.
    pub fn entity_kind_count(&self) -> usize {
        self.advanced_entities.iter().map(|e| e.kind).collect::<HashSet<_>>().len()
    }
}
