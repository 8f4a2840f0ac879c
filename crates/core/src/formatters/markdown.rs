use crate::compare::{ComparisonReport, RewriteValidation, ScoreDelta};
use crate::envelope::{AnalysisEnvelope, Failure};
use crate::recommend::Recommendation;
use crate::synthesis::{GeoMetrics, Scores};

/// Configuration for Markdown reports
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Include the metrics section
    pub include_metrics: bool,
    /// Include the competitor table when competitors were analyzed
    pub include_competitors: bool,
    /// Include each recommendation's rationale as a blockquote
    pub include_rationale: bool,
    /// Cap on listed recommendations (`None` lists all)
    pub max_recommendations: Option<usize>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { include_metrics: true, include_competitors: true, include_rationale: true, max_recommendations: None }
    }
}

/// A value that can be rendered as a Markdown report.
pub trait MarkdownReport {
    fn write_markdown(&self, out: &mut String, config: &MarkdownConfig);
}

/// Markdown formatter with configurable options
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn convert<R: MarkdownReport + ?Sized>(&self, report: &R) -> String {
        let mut out = String::new();
        report.write_markdown(&mut out, &self.config);
        out
    }
}

impl MarkdownReport for AnalysisEnvelope {
    fn write_markdown(&self, out: &mut String, config: &MarkdownConfig) {
        let title = if self.jina_content.title.is_empty() { &self.request.url } else { &self.jina_content.title };
        out.push_str(&format!("# GEO Analysis: {}\n\n", title));
        out.push_str(&format!("- **URL:** {}\n", self.request.url));
        out.push_str(&format!("- **Query:** {}\n", self.request.query));
        out.push_str(&format!("- **Analyzed:** {}\n", self.request.analyzed_at));
        out.push_str(&format!("- **Features:** {}\n\n", self.meta.features_used.join(", ")));

        out.push_str("## Scores\n\n");
        push_score_table(out, self.scores());

        if config.include_metrics {
            out.push_str("\n## Metrics\n\n");
            push_metrics(out, &self.geo_analysis.metrics);
        }

        if config.include_competitors
            && let Some(competitors) = &self.competitors
        {
            out.push_str("\n## Competitors\n\n");
            out.push_str("| Page | Words | Sentences | Avg. sentence | Headings |\n");
            out.push_str("|---|---:|---:|---:|---:|\n");
            for analysis in &competitors.analyses {
                out.push_str(&format!(
                    "| [{}]({}) | {} | {} | {:.1} | {} |\n",
                    escape_cell(&analysis.title),
                    analysis.url,
                    analysis.word_count,
                    analysis.sentence_count,
                    analysis.avg_sentence_length,
                    analysis.heading_count
                ));
            }
            push_failures(out, &competitors.failures);
        }

        out.push_str("\n## Recommendations\n\n");
        push_recommendations(out, self.recommendations(), config);
    }
}

impl MarkdownReport for ComparisonReport {
    fn write_markdown(&self, out: &mut String, _config: &MarkdownConfig) {
        out.push_str(&format!("# GEO Comparison: {}\n\n", self.query));
        out.push_str(&format!("- **Analyzed:** {}\n\n", self.analyzed_at));
        out.push_str("| Rank | Page | Overall | Extractability | Readability | Citability | Recommendations |\n");
        out.push_str("|---:|---|---:|---:|---:|---:|---:|\n");
        for page in &self.ranked {
            let title = if page.title.is_empty() { &page.url } else { &page.title };
            out.push_str(&format!(
                "| {} | [{}]({}) | {:.1} | {:.1} | {:.1} | {:.1} | {} |\n",
                page.rank,
                escape_cell(title),
                page.url,
                page.scores.overall(),
                page.scores.extractability(),
                page.scores.readability(),
                page.scores.citability(),
                page.recommendation_count
            ));
        }

        for page in self.ranked.iter().filter(|p| !p.top_recommendations.is_empty()) {
            out.push_str(&format!("\n### {}. {}\n\n", page.rank, page.url));
            for method in &page.top_recommendations {
                out.push_str(&format!("- {}\n", method));
            }
        }

        push_failures(out, &self.failures);
    }
}

impl MarkdownReport for RewriteValidation {
    fn write_markdown(&self, out: &mut String, config: &MarkdownConfig) {
        out.push_str(&format!("# Rewrite Validation: {}\n\n", self.query));
        out.push_str(&format!("- **Original:** {}\n", self.original_url));
        out.push_str(&format!("- **Improved:** {}\n\n", if self.improved { "yes" } else { "no" }));

        out.push_str("| Dimension | Before | After | Change |\n");
        out.push_str("|---|---:|---:|---:|\n");
        for (name, delta) in [
            ("Overall", &self.deltas.overall),
            ("Extractability", &self.deltas.extractability),
            ("Readability", &self.deltas.readability),
            ("Citability", &self.deltas.citability),
        ] {
            out.push_str(&format!("| {} | {:.1} | {:.1} | {} |\n", name, delta.before, delta.after, change(delta)));
        }

        if !self.resolved_recommendations.is_empty() {
            out.push_str("\n## Resolved\n\n");
            for method in &self.resolved_recommendations {
                out.push_str(&format!("- {}\n", method));
            }
        }
        if !self.new_recommendations.is_empty() {
            out.push_str("\n## Introduced\n\n");
            for method in &self.new_recommendations {
                out.push_str(&format!("- {}\n", method));
            }
        }

        out.push_str("\n## Remaining Recommendations\n\n");
        push_recommendations(out, self.optimized.recommendations(), config);
    }
}

fn push_score_table(out: &mut String, scores: &Scores) {
    out.push_str("| Dimension | Score |\n|---|---:|\n");
    out.push_str(&format!("| **Overall** | **{:.1}** |\n", scores.overall()));
    out.push_str(&format!("| Extractability | {:.1} |\n", scores.extractability()));
    out.push_str(&format!("| Readability | {:.1} |\n", scores.readability()));
    out.push_str(&format!("| Citability | {:.1} |\n", scores.citability()));
}

fn push_metrics(out: &mut String, metrics: &GeoMetrics) {
    let pattern = &metrics.pattern;
    out.push_str(&format!(
        "- Sentences: {} (average {:.1} words, {} long)\n",
        pattern.sentence_length.total_sentences, pattern.sentence_length.average, pattern.sentence_length.long_sentences
    ));
    out.push_str(&format!(
        "- Claims: {} (density {:.2})\n",
        pattern.claim_density.claims, pattern.claim_density.density
    ));
    out.push_str(&format!(
        "- Structure: {} headings, {} list items, {} paragraphs\n",
        pattern.structure.headings, pattern.structure.list_items, pattern.structure.paragraphs
    ));
    out.push_str(&format!(
        "- Query coverage: {}/{} terms\n",
        pattern.query_alignment.terms_matched, pattern.query_alignment.terms_total
    ));

    if let Some(semantic) = &metrics.semantic {
        out.push_str(&format!(
            "- Semantic triples: {} (quality {:.2})\n",
            semantic.semantic_triples.total, semantic.semantic_triples.quality
        ));
        out.push_str(&format!(
            "- Entities: {} across {} types (importance {:.2})\n",
            semantic.semantic_entities.total,
            semantic.semantic_entities.distinct_types,
            semantic.semantic_entities.average_importance
        ));
        out.push_str(&format!("- Topical relevance: {:.2}\n", semantic.topical_relevance));
    }
}

fn push_recommendations(out: &mut String, recommendations: &[Recommendation], config: &MarkdownConfig) {
    if recommendations.is_empty() {
        out.push_str("No recommendations.\n");
        return;
    }

    let limit = config.max_recommendations.unwrap_or(recommendations.len());
    for (i, rec) in recommendations.iter().take(limit).enumerate() {
        out.push_str(&format!(
            "### {}. {}\n\n*{} · {} priority · {} impact · {}*\n\n{}\n",
            i + 1,
            rec.method,
            rec.category.label(),
            rec.priority.as_str(),
            rec.impact.as_str(),
            rec.location,
            rec.details
        ));
        if config.include_rationale {
            out.push_str(&format!("\n> {}\n", rec.rationale));
        }
        out.push('\n');
    }

    if recommendations.len() > limit {
        out.push_str(&format!("_{} more not shown._\n", recommendations.len() - limit));
    }
}

fn push_failures(out: &mut String, failures: &[Failure]) {
    if failures.is_empty() {
        return;
    }
    out.push_str("\n**Failed:**\n\n");
    for failure in failures {
        out.push_str(&format!("- {}: {}\n", failure.url, failure.error));
    }
}

fn change(delta: &ScoreDelta) -> String {
    match delta.percent_change {
        Some(percent) => format!("{:+.1} ({:+}%)", delta.change, percent),
        None => format!("{:+.1}", delta.change),
    }
}

/// Escape pipe characters so titles don't break table rows
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
