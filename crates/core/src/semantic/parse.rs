//! Recovery of a typed [`SemanticResult`] from raw model text.
//!
//! Model output is treated as untrusted input. Only three conditions are hard
//! failures (no JSON object, invalid JSON, neither required key present);
//! everything else is repaired field by field: wrong types fall back to the
//! field default, numbers are clamped, lists are truncated.

use serde_json::{Map, Value};

use super::types::*;
use crate::{GeoError, Result};

/// Caps applied to lists and counts while validating model output.
#[derive(Debug, Clone)]
pub struct ValidationLimits {
    pub max_triples: usize,
    pub max_entities: usize,
    pub max_missing_context: usize,
    pub max_questions: usize,
    pub max_examples: usize,
    pub max_generic_phrases: usize,
    pub max_passive_examples: usize,
    pub max_problematic_phrases: usize,
    pub max_trust_signals: usize,
    pub max_next_steps: usize,
    pub max_related_entities: usize,
    pub max_missing_entities: usize,
    pub max_assessment_items: usize,
    pub max_priority_actions: usize,
    /// Upper bound for any reported count.
    pub max_count: u32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_triples: 15,
            max_entities: 15,
            max_missing_context: 5,
            max_questions: 10,
            max_examples: 10,
            max_generic_phrases: 15,
            max_passive_examples: 10,
            max_problematic_phrases: 15,
            max_trust_signals: 10,
            max_next_steps: 10,
            max_related_entities: 20,
            max_missing_entities: 10,
            max_assessment_items: 10,
            max_priority_actions: 5,
            max_count: 100_000,
        }
    }
}

/// Remove Markdown code fences and stray backticks around a model answer.
pub fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").replace('`', "").trim().to_string()
}

/// Locate the first top-level `{...}` span, honoring JSON string escapes.
///
/// Returns `None` when there is no `{` or the first object never closes.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse a raw model answer into a validated [`SemanticResult`].
///
/// # Errors
///
/// Returns [`GeoError::SemanticParse`] when the answer is empty, contains no
/// JSON object, does not parse, or carries neither `semanticTriples` nor
/// `entities`.
pub fn parse_response(raw: &str, limits: &ValidationLimits) -> Result<SemanticResult> {
    let cleaned = strip_fences(raw);
    if cleaned.is_empty() {
        return Err(GeoError::SemanticParse("Empty response after trim".to_string()));
    }

    let json = find_json_object(&cleaned)
        .ok_or_else(|| GeoError::SemanticParse("No JSON object found in response".to_string()))?;

    let parsed: Value = serde_json::from_str(json).map_err(|e| GeoError::SemanticParse(e.to_string()))?;
    let root = parsed
        .as_object()
        .ok_or_else(|| GeoError::SemanticParse("Response is not a JSON object".to_string()))?;

    let has_triples = root.get("semanticTriples").is_some_and(truthy);
    let has_entities = root.get("entities").is_some_and(truthy);
    if !has_triples && !has_entities {
        return Err(GeoError::SemanticParse("Invalid JSON structure".to_string()));
    }

    Ok(SemanticResult {
        semantic_triples: validate_triples(root.get("semanticTriples"), limits),
        advanced_entities: validate_entities(root.get("entities"), limits),
        chunk_coherence: validate_coherence(section(root, "coherence"), limits),
        topical_relevance: unit(root.get("relevance"), 0.5),
        structure_quality: validate_structure(section(root, "structureQuality"), limits),
        data_point_metrics: validate_data_points(section(root, "dataPointMetrics"), limits),
        originality_signals: validate_originality(section(root, "originalitySignals"), limits),
        writing_quality: validate_writing_quality(section(root, "writingQuality"), limits),
        eeat_signals: validate_eeat(section(root, "eeatSignals"), limits),
        actionability: validate_actionability(section(root, "actionability"), limits),
        entity_coverage: validate_entity_coverage(section(root, "entityCoverage"), limits),
        overall_assessment: section(root, "overallAssessment").map(|m| validate_assessment(m, limits)),
    })
}

fn validate_triples(value: Option<&Value>, limits: &ValidationLimits) -> Vec<SemanticTriple> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter(|t| ["subject", "predicate", "object"].iter().all(|k| t.get(*k).is_some_and(truthy)))
        .take(limits.max_triples)
        .map(|t| SemanticTriple {
            subject: text(t.get("subject")),
            predicate: text(t.get("predicate")),
            object: text(t.get("object")),
            confidence: unit(t.get("confidence"), 0.7),
            is_active_voice: not_false(t.get("isActiveVoice")),
        })
        .collect()
}

fn validate_entities(value: Option<&Value>, limits: &ValidationLimits) -> Vec<AdvancedEntity> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|e| {
            if !e.get("text").is_some_and(truthy) {
                return None;
            }
            let kind = e.get("type").and_then(Value::as_str).and_then(EntityKind::from_wire)?;
            Some(AdvancedEntity {
                text: text(e.get("text")),
                kind,
                context: e.get("context").filter(|v| truthy(v)).map(js_string).unwrap_or_default(),
                importance: unit(e.get("importance"), 0.5),
            })
        })
        .take(limits.max_entities)
        .collect()
}

fn validate_coherence(section: Option<&Map<String, Value>>, limits: &ValidationLimits) -> ChunkCoherence {
    let Some(c) = section else {
        return ChunkCoherence::default();
    };

    ChunkCoherence {
        coherent: not_false(c.get("coherent")),
        missing_context: strings(c.get("missingContext"), limits.max_missing_context),
        self_contained: not_false(c.get("selfContained")),
    }
}

fn validate_structure(section: Option<&Map<String, Value>>, limits: &ValidationLimits) -> StructureQuality {
    StructureQuality {
        has_answer_first: is_true(field(section, "hasAnswerFirst")),
        heading_hierarchy: field(section, "headingHierarchy")
            .and_then(Value::as_str)
            .and_then(HeadingHierarchy::from_wire)
            .unwrap_or_default(),
        questions_covered: strings(field(section, "questionsCovered"), limits.max_questions),
    }
}

fn validate_data_points(section: Option<&Map<String, Value>>, limits: &ValidationLimits) -> DataPointMetrics {
    DataPointMetrics {
        statistics_count: count(field(section, "statisticsCount"), limits.max_count),
        numerical_claims_count: count(field(section, "numericalClaimsCount"), limits.max_count),
        research_citations_count: count(field(section, "researchCitationsCount"), limits.max_count),
        specific_examples: strings(field(section, "specificExamples"), limits.max_examples),
    }
}

fn validate_originality(section: Option<&Map<String, Value>>, limits: &ValidationLimits) -> OriginalitySignals {
    OriginalitySignals {
        has_personal_insights: is_true(field(section, "hasPersonalInsights")),
        has_original_research: is_true(field(section, "hasOriginalResearch")),
        has_unique_data: is_true(field(section, "hasUniqueData")),
        has_expert_opinion: is_true(field(section, "hasExpertOpinion")),
        originality_score: unit(field(section, "originalityScore"), 0.5),
        generic_phrases: strings(field(section, "genericPhrases"), limits.max_generic_phrases),
        analysis: optional_text(field(section, "analysis")),
    }
}

fn validate_writing_quality(section: Option<&Map<String, Value>>, limits: &ValidationLimits) -> WritingQuality {
    let slop = field(section, "aiSlopIndicators").and_then(Value::as_object);

    let problematic_phrases = field(slop, "problematicPhrases")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .take(limits.max_problematic_phrases)
                .map(|p| {
                    let p = p.as_object();
                    ProblematicPhrase {
                        phrase: text_or_empty(field(p, "phrase")),
                        context: text_or_empty(field(p, "context")),
                        suggestion: text_or_empty(field(p, "suggestion")),
                        reason: text_or_empty(field(p, "reason")),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    WritingQuality {
        passive_voice_instances: count(field(section, "passiveVoiceInstances"), limits.max_count),
        passive_voice_examples: strings(field(section, "passiveVoiceExamples"), limits.max_passive_examples),
        active_voice_percentage: bounded(field(section, "activeVoicePercentage"), 0.0, 100.0, 70.0),
        ai_slop_indicators: AiSlopIndicators {
            detected: is_true(field(slop, "detected")),
            confidence: unit(field(slop, "confidence"), 0.0),
            problematic_phrases,
        },
        explanation: optional_text(field(section, "explanation")),
    }
}

fn validate_eeat(section: Option<&Map<String, Value>>, limits: &ValidationLimits) -> EeatSignals {
    let author = field(section, "authorDetails").and_then(Value::as_object);

    EeatSignals {
        has_author_attribution: is_true(field(section, "hasAuthorAttribution")),
        has_credentials: is_true(field(section, "hasCredentials")),
        has_expertise_markers: is_true(field(section, "hasExpertiseMarkers")),
        author_details: AuthorDetails {
            present: is_true(field(author, "present")),
            location: optional_text(field(author, "location")).unwrap_or_else(|| AUTHOR_LOCATION_MISSING.to_string()),
        },
        trust_signals: strings(field(section, "trustSignals"), limits.max_trust_signals),
        analysis: optional_text(field(section, "analysis")),
    }
}

fn validate_actionability(
    section: Option<&Map<String, Value>>, limits: &ValidationLimits,
) -> ActionabilityAssessment {
    ActionabilityAssessment {
        has_actionable_steps: is_true(field(section, "hasActionableSteps")),
        implementation_guidance_present: is_true(field(section, "implementationGuidancePresent")),
        clear_next_steps: strings(field(section, "clearNextSteps"), limits.max_next_steps),
        actionability_score: unit(field(section, "actionabilityScore"), 0.5),
        analysis: optional_text(field(section, "analysis")),
    }
}

fn validate_entity_coverage(section: Option<&Map<String, Value>>, limits: &ValidationLimits) -> EntityCoverage {
    EntityCoverage {
        core_entity_present: not_false(field(section, "coreEntityPresent")),
        related_entities_found: strings(field(section, "relatedEntitiesFound"), limits.max_related_entities),
        missing_related_entities: strings(field(section, "missingRelatedEntities"), limits.max_missing_entities),
        entity_density_score: unit(field(section, "entityDensityScore"), 0.5),
        analysis: optional_text(field(section, "analysis")),
    }
}

fn validate_assessment(section: &Map<String, Value>, limits: &ValidationLimits) -> OverallAssessment {
    let priority_actions = section
        .get("priorityActions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .take(limits.max_priority_actions)
                .map(|a| {
                    let a = a.as_object();
                    PriorityAction {
                        action: text_or_empty(field(a, "action")),
                        effort: text_or_empty(field(a, "effort")),
                        impact: text_or_empty(field(a, "impact")),
                        reasoning: text_or_empty(field(a, "reasoning")),
                        implementation: text_or_empty(field(a, "implementation")),
                        expected_improvement: text_or_empty(field(a, "expectedImprovement")),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    OverallAssessment {
        strengths: strings(section.get("strengths"), limits.max_assessment_items),
        weaknesses: strings(section.get("weaknesses"), limits.max_assessment_items),
        quick_wins: strings(section.get("quickWins"), limits.max_assessment_items),
        priority_actions,
    }
}

fn section<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    root.get(key).and_then(Value::as_object)
}

fn field<'a>(section: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Value> {
    section.and_then(|m| m.get(key))
}

/// JavaScript-style truthiness, which is what the prompt's consumers expect
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

fn not_false(value: Option<&Value>) -> bool {
    !matches!(value, Some(Value::Bool(false)))
}

fn js_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text(value: Option<&Value>) -> String {
    value.map(js_string).unwrap_or_default()
}

fn text_or_empty(value: Option<&Value>) -> String {
    value.filter(|v| truthy(v)).map(js_string).unwrap_or_default()
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn strings(value: Option<&Value>, max: usize) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().take(max).map(js_string).collect())
        .unwrap_or_default()
}

fn bounded(value: Option<&Value>, min: f64, max: f64, default: f64) -> f64 {
    value.and_then(Value::as_f64).map(|n| n.clamp(min, max)).unwrap_or(default)
}

fn unit(value: Option<&Value>, default: f64) -> f64 {
    bounded(value, 0.0, 1.0, default)
}

fn count(value: Option<&Value>, max: u32) -> u32 {
    value
        .and_then(Value::as_f64)
        .map(|n| n.clamp(0.0, f64::from(max)).round() as u32)
        .unwrap_or(0)
}
