//! Deterministic, pattern-based extractability metrics.
//!
//! [`PatternAnalyzer::analyze`] reads plain text (Markdown-style headings and
//! list markers are recognized) and reports sentence length, claim density,
//! date markers, structure, entities, query alignment and heading-delimited
//! chunking. Everything here is pure: the same input always produces the same
//! result and nothing can fail.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::recommend::{PATTERN_RULES, Recommendation, apply_rules};
use crate::synthesis::{clamp_score, round1, round2};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s{0,3}#{1,6}\s+\S").unwrap());

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:[-*+•]|\d{1,3}[.)])\s+").unwrap());

static CLAIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \d
        | \b(?:percent|per\ cent)\b
        | \b(?:faster|slower|more|less|fewer|higher|lower|better|worse|cheaper|larger|smaller)\s+than\b
        | \b(?:increased|decreased|grew|declined|doubled|tripled|halved|reduced|improved|rose|fell|dropped)\b",
    )
    .unwrap()
});

/// ISO dates first, then "Month DD[, YYYY]", then bare years, so each date is counted once.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \b\d{4}-\d{2}-\d{2}\b
        | \b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+\d{1,2}\b(?:,\s+(?:19|20)\d{2}\b)?
        | \b(?:19|20)\d{2}\b",
    )
    .unwrap()
});

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[A-Z][\w&'-]*(?:[ \t]+[A-Z][\w&'-]*)+|[A-Z]{2,6})\b").unwrap()
});

/// Capitalized words that start a sentence without being part of a name.
const LEADING_FILLER: &[&str] = &[
    "A", "An", "And", "As", "At", "But", "By", "For", "From", "How", "If", "In", "Is", "It", "Of", "On", "Or",
    "Our", "So", "The", "These", "This", "Those", "To", "We", "What", "When", "Where", "Why", "With", "You", "Your",
];

/// Thresholds and weights for pattern metrics and pattern recommendations.
#[derive(Debug, Clone)]
pub struct PatternConfig {
    /// Sentences with more words than this count as long
    pub long_sentence_words: usize,
    /// Average sentence length at which readability starts losing points
    pub readability_threshold: f64,
    /// Readability points lost per word of average length past the threshold
    pub readability_penalty: f64,
    /// Largest opening paragraph, in words, that still counts as a direct answer
    pub direct_answer_max_words: usize,
    /// Claim density that earns the full claim sub-score
    pub claim_density_target: f64,
    /// Distinct entities that earn the full entity sub-score
    pub entity_target: usize,
    /// Sections longer than this many words are oversized chunks
    pub max_chunk_words: usize,
    /// Entities quoted in the metrics
    pub max_entity_examples: usize,
    /// Share of long sentences above which shortening is recommended
    pub max_long_sentence_ratio: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            long_sentence_words: 20,
            readability_threshold: 20.0,
            readability_penalty: 0.35,
            direct_answer_max_words: 60,
            claim_density_target: 0.3,
            entity_target: 10,
            max_chunk_words: 300,
            max_entity_examples: 5,
            max_long_sentence_ratio: 0.25,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceLengthMetrics {
    /// Mean words per sentence, one decimal.
    pub average: f64,
    pub longest: usize,
    pub long_sentences: usize,
    pub total_sentences: usize,
}

impl SentenceLengthMetrics {
    pub fn long_ratio(&self) -> f64 {
        if self.total_sentences == 0 {
            return 0.0;
        }
        self.long_sentences as f64 / self.total_sentences as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDensity {
    pub claims: usize,
    /// Claims per sentence in `[0,1]`, two decimals.
    pub density: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateMarkers {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_recent_year: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureMetrics {
    pub headings: usize,
    pub list_items: usize,
    pub paragraphs: usize,
    pub has_direct_answer: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetrics {
    pub total: usize,
    pub unique: usize,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAlignment {
    pub primary_query: String,
    pub terms_matched: usize,
    pub terms_total: usize,
    /// Fraction of query terms present in the body, two decimals.
    pub coverage: f64,
    pub missing_terms: Vec<String>,
    pub in_first_paragraph: bool,
    pub in_headings: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMetrics {
    pub sentence_length: SentenceLengthMetrics,
    pub claim_density: ClaimDensity,
    pub date_markers: DateMarkers,
    pub structure: StructureMetrics,
    pub entities: EntityMetrics,
    pub query_alignment: QueryAlignment,
}

/// Heading-delimited chunking summary.
///
/// The coherence fields are only filled in once semantic signals are available.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunking {
    pub total_chunks: usize,
    pub average_chunk_words: f64,
    pub oversized_chunks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_coherence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problematic_boundaries: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PatternScores {
    pub extractability: f64,
    pub readability: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatternAnalysisResult {
    pub scores: PatternScores,
    pub metrics: PatternMetrics,
    pub chunking: Chunking,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug)]
enum Block<'a> {
    Heading(&'a str),
    Prose(Vec<&'a str>),
}

/// Line-level view of a document.
struct Document<'a> {
    blocks: Vec<Block<'a>>,
}

impl<'a> Document<'a> {
    fn parse(text: &'a str) -> Self {
        let mut blocks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(Block::Prose(std::mem::take(&mut current)));
                }
            } else if HEADING_RE.is_match(line) {
                if !current.is_empty() {
                    blocks.push(Block::Prose(std::mem::take(&mut current)));
                }
                blocks.push(Block::Heading(line.trim().trim_start_matches('#').trim()));
            } else {
                current.push(line.trim());
            }
        }
        if !current.is_empty() {
            blocks.push(Block::Prose(current));
        }

        Self { blocks }
    }

    fn headings(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.blocks.iter().filter_map(|b| match b {
            Block::Heading(h) => Some(*h),
            Block::Prose(_) => None,
        })
    }

    fn paragraphs(&self) -> impl Iterator<Item = &[&'a str]> + '_ {
        self.blocks.iter().filter_map(|b| match b {
            Block::Prose(lines) => Some(lines.as_slice()),
            Block::Heading(_) => None,
        })
    }

    /// Sentence-splittable units: each list item alone, other lines joined per paragraph.
    fn units(&self) -> Vec<String> {
        let mut units = Vec::new();
        for lines in self.paragraphs() {
            let mut running = String::new();
            for line in lines {
                if let Some(marker) = LIST_ITEM_RE.find(line) {
                    if !running.is_empty() {
                        units.push(std::mem::take(&mut running));
                    }
                    units.push(line[marker.end()..].to_string());
                } else {
                    if !running.is_empty() {
                        running.push(' ');
                    }
                    running.push_str(line);
                }
            }
            if !running.is_empty() {
                units.push(running);
            }
        }
        units
    }

    /// Word counts of heading-delimited sections, skipping empty ones.
    fn section_word_counts(&self) -> Vec<usize> {
        let mut sections = Vec::new();
        let mut words = 0;
        for block in &self.blocks {
            match block {
                Block::Heading(_) => {
                    if words > 0 {
                        sections.push(words);
                    }
                    words = 0;
                }
                Block::Prose(lines) => words += lines.iter().map(|l| word_count(l)).sum::<usize>(),
            }
        }
        if words > 0 {
            sections.push(words);
        }
        sections
    }
}

/// Split text after runs of terminal punctuation followed by whitespace or the end.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let boundary = match chars.peek() {
            None => true,
            Some((_, next)) => next.is_whitespace(),
        };
        if boundary {
            let end = idx + ch.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lower-cased, de-duplicated query terms with surrounding punctuation removed.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

/// Computes [`PatternAnalysisResult`]s from raw text.
#[derive(Debug, Clone, Default)]
pub struct PatternAnalyzer {
    config: PatternConfig,
}

impl PatternAnalyzer {
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Analyze `text` against `target_query`.
    ///
    /// Empty or whitespace-only text yields a zeroed result with no recommendations.
    pub fn analyze(&self, text: &str, target_query: &str) -> PatternAnalysisResult {
        let terms = query_terms(target_query);
        if text.trim().is_empty() {
            let query_alignment = QueryAlignment {
                primary_query: target_query.to_string(),
                terms_total: terms.len(),
                missing_terms: terms,
                ..Default::default()
            };
            return PatternAnalysisResult {
                metrics: PatternMetrics { query_alignment, ..Default::default() },
                ..Default::default()
            };
        }

        let doc = Document::parse(text);
        let units = doc.units();
        let sentences: Vec<&str> = units
            .iter()
            .flat_map(|u| split_sentences(u))
            .filter(|s| word_count(s) > 0)
            .collect();

        let metrics = PatternMetrics {
            sentence_length: self.sentence_length(&sentences),
            claim_density: claim_density(&sentences),
            date_markers: date_markers(text),
            structure: self.structure(&doc, &terms),
            entities: self.entities(&sentences),
            query_alignment: query_alignment(&doc, text, target_query, &terms),
        };
        let chunking = self.chunking(&doc);
        let scores = PatternScores {
            extractability: self.extractability(&metrics),
            readability: self.readability(&metrics.sentence_length),
        };

        let draft = PatternAnalysisResult { scores, metrics, chunking, recommendations: Vec::new() };
        let recommendations = apply_rules(PATTERN_RULES, &draft, &self.config);
        tracing::debug!(
            extractability = scores.extractability,
            readability = scores.readability,
            recommendations = recommendations.len(),
            "pattern analysis complete"
        );

        PatternAnalysisResult { recommendations, ..draft }
    }

    fn sentence_length(&self, sentences: &[&str]) -> SentenceLengthMetrics {
        if sentences.is_empty() {
            return SentenceLengthMetrics::default();
        }
        let lengths: Vec<usize> = sentences.iter().map(|s| word_count(s)).collect();
        let total: usize = lengths.iter().sum();

        SentenceLengthMetrics {
            average: round1(total as f64 / lengths.len() as f64),
            longest: lengths.iter().copied().max().unwrap_or(0),
            long_sentences: lengths.iter().filter(|&&n| n > self.config.long_sentence_words).count(),
            total_sentences: lengths.len(),
        }
    }

    fn structure(&self, doc: &Document<'_>, terms: &[String]) -> StructureMetrics {
        let list_items = doc.paragraphs().flatten().filter(|line| LIST_ITEM_RE.is_match(line)).count();

        let has_direct_answer = doc.paragraphs().next().is_some_and(|lines| {
            let joined = lines.join(" ");
            let words = word_count(&joined);
            let lower = joined.to_lowercase();
            words > 0
                && words <= self.config.direct_answer_max_words
                && !split_sentences(&joined).is_empty()
                && (terms.is_empty() || terms.iter().any(|t| lower.contains(t.as_str())))
        });

        StructureMetrics {
            headings: doc.headings().count(),
            list_items,
            paragraphs: doc.paragraphs().count(),
            has_direct_answer,
        }
    }

    fn entities(&self, sentences: &[&str]) -> EntityMetrics {
        let mut found = Vec::new();
        for sentence in sentences {
            for m in ENTITY_RE.find_iter(sentence) {
                if let Some(entity) = strip_leading_filler(m.as_str()) {
                    found.push(entity);
                }
            }
        }

        let mut seen = HashSet::new();
        let unique: Vec<&str> = found.iter().copied().filter(|e| seen.insert(*e)).collect();

        EntityMetrics {
            total: found.len(),
            unique: unique.len(),
            examples: unique.iter().take(self.config.max_entity_examples).map(|e| e.to_string()).collect(),
        }
    }

    fn chunking(&self, doc: &Document<'_>) -> Chunking {
        let sections = doc.section_word_counts();
        if sections.is_empty() {
            return Chunking::default();
        }
        let total: usize = sections.iter().sum();

        Chunking {
            total_chunks: sections.len(),
            average_chunk_words: round1(total as f64 / sections.len() as f64),
            oversized_chunks: sections.iter().filter(|&&w| w > self.config.max_chunk_words).count(),
            average_coherence: None,
            problematic_boundaries: None,
        }
    }

    /// Readability on `[0,10]`, decreasing with average sentence length past the threshold.
    pub fn readability(&self, sentence_length: &SentenceLengthMetrics) -> f64 {
        if sentence_length.total_sentences == 0 {
            return 0.0;
        }
        let overshoot = (sentence_length.average - self.config.readability_threshold).max(0.0);
        let length_score = clamp_score(10.0 - overshoot * self.config.readability_penalty);
        let long_score = clamp_score(10.0 * (1.0 - sentence_length.long_ratio()));

        round1(clamp_score(0.7 * length_score + 0.3 * long_score))
    }

    /// Extractability on `[0,10]`.
    pub fn extractability(&self, metrics: &PatternMetrics) -> f64 {
        let structure = &metrics.structure;
        let structure_score = clamp_score(
            4.0 * f64::from(u8::from(structure.headings > 0))
                + 3.0 * f64::from(u8::from(structure.list_items > 0))
                + 3.0 * f64::from(u8::from(structure.has_direct_answer)),
        );
        let claims_score = clamp_score(10.0 * metrics.claim_density.density / self.config.claim_density_target);
        let alignment_score = clamp_score(10.0 * metrics.query_alignment.coverage);
        let entity_score = clamp_score(10.0 * metrics.entities.unique as f64 / self.config.entity_target as f64);
        let freshness_score = if metrics.date_markers.count > 0 { 10.0 } else { 0.0 };

        round1(clamp_score(
            0.30 * structure_score
                + 0.25 * claims_score
                + 0.25 * alignment_score
                + 0.10 * entity_score
                + 0.10 * freshness_score,
        ))
    }
}

fn claim_density(sentences: &[&str]) -> ClaimDensity {
    let claims = sentences.iter().filter(|s| CLAIM_RE.is_match(s)).count();
    let density = if sentences.is_empty() { 0.0 } else { round2(claims as f64 / sentences.len() as f64) };
    ClaimDensity { claims, density }
}

fn date_markers(text: &str) -> DateMarkers {
    DateMarkers {
        count: DATE_RE.find_iter(text).count(),
        most_recent_year: YEAR_RE.find_iter(text).filter_map(|m| m.as_str().parse().ok()).max(),
    }
}

fn query_alignment(doc: &Document<'_>, text: &str, query: &str, terms: &[String]) -> QueryAlignment {
    let body = text.to_lowercase();
    let (matched, missing): (Vec<&String>, Vec<&String>) = terms.iter().partition(|t| body.contains(t.as_str()));

    let contains_any = |haystack: &str| {
        let lower = haystack.to_lowercase();
        terms.iter().any(|t| lower.contains(t.as_str()))
    };

    let coverage = if terms.is_empty() { 0.0 } else { round2(matched.len() as f64 / terms.len() as f64) };

    QueryAlignment {
        primary_query: query.to_string(),
        terms_matched: matched.len(),
        terms_total: terms.len(),
        coverage,
        missing_terms: missing.into_iter().cloned().collect(),
        in_first_paragraph: doc.paragraphs().next().is_some_and(|lines| contains_any(&lines.join(" "))),
        in_headings: doc.headings().any(contains_any),
    }
}

fn strip_leading_filler(candidate: &str) -> Option<&str> {
    let mut rest = candidate;
    while let Some((first, tail)) = rest.split_once(char::is_whitespace) {
        if !LEADING_FILLER.contains(&first) {
            break;
        }
        rest = tail.trim_start();
    }

    let is_acronym = rest.len() >= 2 && rest.chars().all(|c| c.is_ascii_uppercase());
    if rest.contains(char::is_whitespace) || is_acronym { Some(rest) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ARTICLE: &str = "\
# What is generative engine optimization?

Generative engine optimization (GEO) makes content easy for AI answer engines to quote.

## Why it matters

Google AI Overviews appeared in 2024 and cut organic clicks by 34% for some publishers.
Perplexity and ChatGPT now cite sources directly.

## How to start

- Lead with a direct answer.
- Add statistics with sources.
- Use descriptive headings.
";

    #[rstest]
    #[case("One. Two! Three?", vec!["One.", "Two!", "Three?"])]
    #[case("Growth was 3.5% this year. Nice.", vec!["Growth was 3.5% this year.", "Nice."])]
    #[case("Wait... what?! Done", vec!["Wait...", "what?!", "Done"])]
    #[case("   ", vec![])]
    fn test_split_sentences(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_sentences(text), expected);
    }

    #[rstest]
    #[case("best lake houses", vec!["best", "lake", "houses"])]
    #[case("  What's GEO? GEO!  ", vec!["what's", "geo"])]
    #[case("", vec![])]
    fn test_query_terms(#[case] query: &str, #[case] expected: Vec<&str>) {
        assert_eq!(query_terms(query), expected);
    }

    #[test]
    fn test_empty_text_is_zeroed() {
        let result = PatternAnalyzer::default().analyze("  \n\n ", "geo basics");
        assert_eq!(result.scores, PatternScores::default());
        assert_eq!(result.metrics.sentence_length.total_sentences, 0);
        assert_eq!(result.metrics.query_alignment.terms_total, 2);
        assert_eq!(result.metrics.query_alignment.coverage, 0.0);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_structure_counts() {
        let result = PatternAnalyzer::default().analyze(ARTICLE, "generative engine optimization");
        let structure = &result.metrics.structure;
        assert_eq!(structure.headings, 3);
        assert_eq!(structure.list_items, 3);
        assert_eq!(structure.paragraphs, 3);
        assert!(structure.has_direct_answer);
    }

    #[test]
    fn test_list_items_are_separate_sentences() {
        let result = PatternAnalyzer::default().analyze("- first item\n- second item", "");
        assert_eq!(result.metrics.sentence_length.total_sentences, 2);
    }

    #[test]
    fn test_query_alignment() {
        let result = PatternAnalyzer::default().analyze(ARTICLE, "GEO citation statistics");
        let alignment = &result.metrics.query_alignment;
        assert_eq!(alignment.terms_total, 3);
        assert_eq!(alignment.terms_matched, 2);
        assert_eq!(alignment.coverage, 0.67);
        assert_eq!(alignment.missing_terms, vec!["citation"]);
        assert!(alignment.in_first_paragraph);
        assert!(!alignment.in_headings);
    }

    #[test]
    fn test_empty_query_has_zero_coverage() {
        let result = PatternAnalyzer::default().analyze(ARTICLE, "");
        assert_eq!(result.metrics.query_alignment.coverage, 0.0);
        assert!(result.metrics.query_alignment.missing_terms.is_empty());
    }

    #[test]
    fn test_dates_and_claims() {
        let text = "Traffic increased on March 3, 2025. The report from 2023-11-02 was older. Nothing here.";
        let result = PatternAnalyzer::default().analyze(text, "");
        assert_eq!(result.metrics.date_markers.count, 2);
        assert_eq!(result.metrics.date_markers.most_recent_year, Some(2025));
        assert_eq!(result.metrics.claim_density.claims, 2);
        assert_eq!(result.metrics.claim_density.density, 0.67);
    }

    #[test]
    fn test_entities_skip_sentence_initial_filler() {
        let text = "The Cloudflare Workers platform runs GEO checks. This is fine. Google AI Overviews cite it.";
        let entities = PatternAnalyzer::default().analyze(text, "").metrics.entities;
        assert_eq!(entities.examples, vec!["Cloudflare Workers", "GEO", "Google AI Overviews"]);
        assert_eq!(entities.unique, 3);
    }

    #[test]
    fn test_chunking_by_heading() {
        let long = "word ".repeat(350);
        let text = format!("Intro line here.\n\n# One\n\n{long}\n\n# Empty\n\n# Two\n\nShort section.");
        let chunking = PatternAnalyzer::default().analyze(&text, "").chunking;
        assert_eq!(chunking.total_chunks, 3);
        assert_eq!(chunking.oversized_chunks, 1);
        assert!(chunking.average_coherence.is_none());
    }

    #[test]
    fn test_readability_decreases_with_sentence_length() {
        let analyzer = PatternAnalyzer::default();
        let mut previous = f64::MAX;
        for average in [10.0, 20.0, 25.0, 30.0, 40.0, 60.0] {
            let metrics = SentenceLengthMetrics { average, longest: 0, long_sentences: 0, total_sentences: 4 };
            let score = analyzer.readability(&metrics);
            assert!((0.0..=10.0).contains(&score));
            assert!(score <= previous);
            previous = score;
        }
        let metrics = SentenceLengthMetrics { average: 30.0, longest: 0, long_sentences: 0, total_sentences: 4 };
        assert!(analyzer.readability(&metrics) < 10.0);
    }

    #[rstest]
    #[case::article(ARTICLE.to_string())]
    #[case::run_on("This sentence keeps going and going with many words that never seem to end at all because the author forgot punctuation ".repeat(30))]
    #[case::single_char("x".to_string())]
    #[case::numbered_dots("1. 2. 3.".to_string())]
    #[case::cjk("# 生成式引擎优化\n\n生成式引擎优化让内容更容易被引用。东京在2024年增长了34%。".to_string())]
    #[case::emoji("🚀 Launch day! 🎉 Revenue grew 40% 📈. Ship it 🔥🔥🔥".to_string())]
    #[case::punctuation_only("?!... ,,, ;;; !!! ??? ...".to_string())]
    #[case::bare_hashes("#\n######\n# \n###### Deep Heading".to_string())]
    #[case::crlf("# Title\r\n\r\nFirst line here.\r\n- item one\r\n- item two\r\n".to_string())]
    #[case::nul("Before\0after. \0\0 Null bytes. In 2023 NASA said so.".to_string())]
    #[case::huge_token("A".repeat(200_000))]
    #[case::combining_marks("Cafe\u{301} owners in Zu\u{308}rich Said Hello. E\u{301}\u{301}\u{301}.".to_string())]
    fn test_scores_in_range(#[case] text: String) {
        let analyzer = PatternAnalyzer::default();
        for query in ["geo", "", "生成式 引擎", "🚀"] {
            let result = analyzer.analyze(&text, query);
            assert!((0.0..=10.0).contains(&result.scores.extractability), "{:?}", result.scores);
            assert!((0.0..=10.0).contains(&result.scores.readability), "{:?}", result.scores);
            assert!((0.0..=1.0).contains(&result.metrics.query_alignment.coverage));
        }
    }

    #[test]
    fn test_deterministic() {
        let analyzer = PatternAnalyzer::default();
        assert_eq!(analyzer.analyze(ARTICLE, "geo"), analyzer.analyze(ARTICLE, "geo"));
    }
}
