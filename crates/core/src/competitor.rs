//! Shallow metrics for competitor documents.

use serde::Serialize;

use crate::RawContent;
use crate::pattern::{split_sentences, word_count};
use crate::synthesis::round1;

/// Size and structure summary of one competitor page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAnalysis {
    pub url: String,
    pub title: String,
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    pub heading_count: usize,
}

impl CompetitorAnalysis {
    pub fn from_content(content: &RawContent) -> Self {
        let body = &content.body;
        let words: usize = body.lines().map(|line| word_count(line.trim_start().trim_start_matches('#'))).sum();
        let heading_count = body.lines().filter(|line| is_heading(line)).count();
        let sentence_count: usize = body
            .lines()
            .filter(|line| !is_heading(line))
            .map(|line| split_sentences(line).len())
            .sum();

        Self {
            url: content.url.clone(),
            title: content.title.clone(),
            word_count: words,
            sentence_count,
            avg_sentence_length: if sentence_count == 0 { 0.0 } else { round1(words as f64 / sentence_count as f64) },
            heading_count,
        }
    }
}

fn is_heading(line: &str) -> bool {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') && !trimmed[hashes..].trim().is_empty()
}

/// Shallow metrics for each document, in input order.
pub fn analyze_competitors(contents: &[RawContent]) -> Vec<CompetitorAnalysis> {
    contents.iter().map(CompetitorAnalysis::from_content).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competitor_metrics() {
        let content = RawContent::new(
            "Rival",
            "https://rival.test",
            "# Guide\n\nFirst sentence here. Second one!\n\n## More\n\nThird sentence with five words.",
        );
        let analysis = CompetitorAnalysis::from_content(&content);

        assert_eq!(analysis.heading_count, 2);
        assert_eq!(analysis.sentence_count, 3);
        assert_eq!(analysis.word_count, 12);
        assert_eq!(analysis.avg_sentence_length, 4.0);
        assert_eq!(analysis.title, "Rival");
    }

    #[test]
    fn test_competitor_sentences_match_pattern_splitting() {
        let content = RawContent::new(
            "Rival",
            "https://rival.test",
            "## Prices in 2024\n\nA cabin costs $3.5k per week. Is it worth it?",
        );
        let analysis = CompetitorAnalysis::from_content(&content);

        assert_eq!(analysis.heading_count, 1);
        assert_eq!(analysis.sentence_count, 2);
        assert_eq!(analysis.word_count, 13);
        assert_eq!(analysis.avg_sentence_length, 6.5);
    }

    #[test]
    fn test_empty_competitor() {
        let analysis = CompetitorAnalysis::from_content(&RawContent::new("", "https://empty.test", ""));
        assert_eq!(analysis.word_count, 0);
        assert_eq!(analysis.avg_sentence_length, 0.0);
    }

    #[test]
    fn test_hashtag_is_not_heading() {
        assert!(!is_heading("#rustlang is great"));
        assert!(is_heading("### Real heading"));
        assert!(!is_heading("####### too deep"));
    }
}
