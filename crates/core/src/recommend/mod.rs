//! Threshold-rule recommendation generation.
//!
//! Recommendations come from flat, ordered tables of independent
//! predicate → record rules. A rule never looks at another rule's output, so
//! the tables can grow one row at a time and each row can be tested alone.
//! Output is grouped by [`RuleFamily`] in a fixed order and, within a family,
//! keeps table order.

mod pattern_rules;
mod semantic_rules;

pub(crate) use pattern_rules::PATTERN_RULES;
pub use semantic_rules::SEMANTIC_RULES;

use serde::Serialize;

use crate::semantic::SemanticResult;

/// How urgently a recommendation should be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Expected effect of applying a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

/// Metric family a rule belongs to, listed in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleFamily {
    Pattern,
    Structure,
    DataPoints,
    WritingQuality,
    Originality,
    Eeat,
    Actionability,
}

impl RuleFamily {
    /// Output order of families.
    pub const ORDER: [RuleFamily; 7] = [
        RuleFamily::Pattern,
        RuleFamily::Structure,
        RuleFamily::DataPoints,
        RuleFamily::WritingQuality,
        RuleFamily::Originality,
        RuleFamily::Eeat,
        RuleFamily::Actionability,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RuleFamily::Pattern => "Pattern",
            RuleFamily::Structure => "Structure",
            RuleFamily::DataPoints => "Data Points",
            RuleFamily::WritingQuality => "Writing Quality",
            RuleFamily::Originality => "Originality",
            RuleFamily::Eeat => "E-E-A-T",
            RuleFamily::Actionability => "Actionability",
        }
    }
}

/// One actionable edit suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub category: RuleFamily,
    pub method: String,
    pub priority: Priority,
    pub impact: Impact,
    pub location: String,
    pub details: String,
    pub rationale: String,
}

/// A single predicate → record rule over input `T` with thresholds `C`.
pub struct Rule<T, C> {
    pub family: RuleFamily,
    pub method: &'static str,
    pub priority: Priority,
    pub impact: Impact,
    pub location: &'static str,
    pub rationale: &'static str,
    pub trigger: fn(&T, &C) -> bool,
    pub details: fn(&T, &C) -> String,
}

impl<T, C> Rule<T, C> {
    /// Returns the record for this rule when its trigger fires.
    pub fn evaluate(&self, input: &T, config: &C) -> Option<Recommendation> {
        if !(self.trigger)(input, config) {
            return None;
        }

        Some(Recommendation {
            category: self.family,
            method: self.method.to_string(),
            priority: self.priority,
            impact: self.impact,
            location: self.location.to_string(),
            details: (self.details)(input, config),
            rationale: self.rationale.to_string(),
        })
    }
}

/// Evaluate every rule and concatenate the records family by family
pub(crate) fn apply_rules<T, C>(rules: &[Rule<T, C>], input: &T, config: &C) -> Vec<Recommendation> {
    RuleFamily::ORDER
        .iter()
        .flat_map(|family| {
            rules
                .iter()
                .filter(move |rule| rule.family == *family)
                .filter_map(|rule| rule.evaluate(input, config))
        })
        .collect()
}

/// Thresholds for the semantic recommendation rules.
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Fewer covered questions than this triggers "Answer More User Questions".
    pub min_questions_covered: usize,
    /// Missing-context items quoted in "Address Content Gaps".
    pub context_gap_examples: usize,
    /// Fewer statistics than this triggers "Add More Statistical Data".
    pub min_statistics: u32,
    /// Fewer numerical claims than this triggers "Add Quantifiable Claims".
    pub min_numerical_claims: u32,
    /// More passive constructions than this triggers "Reduce Passive Voice".
    pub max_passive_instances: u32,
    /// Slop confidence above this (with detection) triggers the AI-language rule.
    pub slop_confidence: f64,
    /// Active voice percentage below this triggers "Increase Active Voice Usage".
    pub min_active_voice: f64,
    /// Originality score below this triggers "Increase Content Originality".
    pub min_originality: f64,
    /// More generic phrases than this triggers "Replace Generic Phrases".
    pub max_generic_phrases: usize,
    /// Fewer trust signals than this triggers "Strengthen Trust Signals".
    pub min_trust_signals: usize,
    /// Actionability below this triggers "Increase Content Actionability".
    pub min_actionability: f64,
    /// Fewer next steps than this triggers "Add Clear Next Actions".
    pub min_next_steps: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            min_questions_covered: 3,
            context_gap_examples: 3,
            min_statistics: 3,
            min_numerical_claims: 5,
            max_passive_instances: 5,
            slop_confidence: 0.5,
            min_active_voice: 70.0,
            min_originality: 0.5,
            max_generic_phrases: 5,
            min_trust_signals: 2,
            min_actionability: 0.5,
            min_next_steps: 3,
        }
    }
}

/// Stateless generator for semantic-signal recommendations.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    /// Evaluate the semantic rule table against validated model signals.
    pub fn generate(&self, signals: &SemanticResult) -> Vec<Recommendation> {
        apply_rules(SEMANTIC_RULES, signals, &self.config)
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }
}

/// Render a 0..1 ratio as a whole percentage
pub(crate) fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: u32,
    }

    fn rule(family: RuleFamily, method: &'static str, trigger: fn(&Counter, &u32) -> bool) -> Rule<Counter, u32> {
        Rule {
            family,
            method,
            priority: Priority::High,
            impact: Impact::Low,
            location: "Body",
            rationale: "Because",
            trigger,
            details: |c, limit| format!("{} of {}", c.value, limit),
        }
    }

    #[test]
    fn test_rule_interpolates_details() {
        let r = rule(RuleFamily::DataPoints, "Low", |c, limit| c.value < *limit);
        let rec = r.evaluate(&Counter { value: 1 }, &3).unwrap();
        assert_eq!(rec.details, "1 of 3");
        assert_eq!(rec.category, RuleFamily::DataPoints);
        assert!(r.evaluate(&Counter { value: 4 }, &3).is_none());
    }

    #[test]
    fn test_apply_rules_groups_by_family_order() {
        let rules = [
            rule(RuleFamily::Actionability, "Last", |_, _| true),
            rule(RuleFamily::Structure, "First", |_, _| true),
            rule(RuleFamily::Actionability, "Last-2", |_, _| true),
            rule(RuleFamily::Structure, "Skipped", |_, _| false),
        ];
        let methods: Vec<String> =
            apply_rules(&rules, &Counter { value: 0 }, &0).into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec!["First", "Last", "Last-2"]);
    }

    #[test]
    fn test_serialized_levels() {
        let json = serde_json::to_value(Priority::Medium).unwrap();
        assert_eq!(json, "medium");
        let json = serde_json::to_value(RuleFamily::DataPoints).unwrap();
        assert_eq!(json, "data-points");
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0.346), 35);
        assert_eq!(percent(0.5), 50);
        assert_eq!(percent(0.0), 0);
    }
}
