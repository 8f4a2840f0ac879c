use super::{Impact, Priority, Rule, RuleFamily, percent};
use crate::pattern::{PatternAnalysisResult, PatternConfig};

pub(crate) type PatternRule = Rule<PatternAnalysisResult, PatternConfig>;

/// Rules over deterministic pattern metrics.
pub(crate) static PATTERN_RULES: &[PatternRule] = &[
    Rule {
        family: RuleFamily::Pattern,
        method: "Lead With a Direct Answer",
        priority: Priority::High,
        impact: Impact::High,
        location: "First paragraph",
        rationale: "Answer engines quote the opening passage when it answers the query in a few sentences",
        trigger: |r, _| !r.metrics.structure.has_direct_answer,
        details: |r, c| {
            let query = &r.metrics.query_alignment.primary_query;
            if query.trim().is_empty() {
                format!("Open with a paragraph of at most {} words that states the main answer.", c.direct_answer_max_words)
            } else {
                format!(
                    "Open with a paragraph of at most {} words that answers \"{}\" and uses its key terms.",
                    c.direct_answer_max_words, query
                )
            }
        },
    },
    Rule {
        family: RuleFamily::Pattern,
        method: "Align Content With Target Query",
        priority: Priority::High,
        impact: Impact::High,
        location: "Headings and first paragraph",
        rationale: "Passages are retrieved by overlap with the user's wording",
        trigger: |r, _| !r.metrics.query_alignment.missing_terms.is_empty(),
        details: |r, _| {
            let alignment = &r.metrics.query_alignment;
            format!(
                "Only {} of {} query terms appear ({}% coverage). Missing: {}.",
                alignment.terms_matched,
                alignment.terms_total,
                percent(alignment.coverage),
                alignment.missing_terms.join(", ")
            )
        },
    },
    Rule {
        family: RuleFamily::Pattern,
        method: "Shorten Long Sentences",
        priority: Priority::High,
        impact: Impact::Medium,
        location: "Throughout content",
        rationale: "Short sentences survive extraction as complete, quotable statements",
        trigger: |r, c| {
            let s = &r.metrics.sentence_length;
            s.total_sentences > 0 && (s.average > c.readability_threshold || s.long_ratio() > c.max_long_sentence_ratio)
        },
        details: |r, c| {
            let s = &r.metrics.sentence_length;
            format!(
                "Average sentence length is {} words and {} of {} sentences exceed {} words. Split sentences that carry more than one fact.",
                s.average, s.long_sentences, s.total_sentences, c.long_sentence_words
            )
        },
    },
    Rule {
        family: RuleFamily::Pattern,
        method: "Increase Claim Density",
        priority: Priority::Medium,
        impact: Impact::High,
        location: "Content body",
        rationale: "Sentences with concrete numbers and comparisons are the ones engines cite",
        trigger: |r, c| r.metrics.sentence_length.total_sentences > 0 && r.metrics.claim_density.density < c.claim_density_target,
        details: |r, c| {
            format!(
                "{}% of sentences make a quantifiable claim (target {}%). Back key statements with figures, dates or comparisons.",
                percent(r.metrics.claim_density.density),
                percent(c.claim_density_target)
            )
        },
    },
    Rule {
        family: RuleFamily::Pattern,
        method: "Add Descriptive Headings",
        priority: Priority::Medium,
        impact: Impact::High,
        location: "Document structure",
        rationale: "Headings give each passage a label that retrieval can match against",
        trigger: |r, _| r.metrics.structure.headings == 0,
        details: |r, _| {
            format!(
                "No headings found across {} paragraphs. Add question-style H2/H3 headings for each subtopic.",
                r.metrics.structure.paragraphs
            )
        },
    },
    Rule {
        family: RuleFamily::Pattern,
        method: "Use Lists for Scannable Facts",
        priority: Priority::Low,
        impact: Impact::Medium,
        location: "Content body",
        rationale: "List items are lifted as ready-made answer fragments",
        trigger: |r, _| r.metrics.structure.list_items == 0,
        details: |_, _| "No lists found. Present steps, options or key facts as bulleted or numbered lists.".to_string(),
    },
    Rule {
        family: RuleFamily::Pattern,
        method: "Break Up Long Sections",
        priority: Priority::Medium,
        impact: Impact::Medium,
        location: "Oversized sections",
        rationale: "Retrieval works on passages; oversized sections dilute the passage that matches",
        trigger: |r, _| r.chunking.oversized_chunks > 0,
        details: |r, c| {
            format!(
                "{} of {} sections exceed {} words. Split them under more specific subheadings.",
                r.chunking.oversized_chunks, r.chunking.total_chunks, c.max_chunk_words
            )
        },
    },
    Rule {
        family: RuleFamily::Pattern,
        method: "Add Freshness Signals",
        priority: Priority::Low,
        impact: Impact::Medium,
        location: "Header or byline",
        rationale: "Dated content is preferred for queries where recency matters",
        trigger: |r, _| r.metrics.date_markers.count == 0,
        details: |_, _| "No dates found. Add a published or last-updated date and date the statistics you cite.".to_string(),
    },
];
