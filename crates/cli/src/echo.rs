use geolens_core::{AnalysisEnvelope, ComparisonReport, RewriteValidation, Scores};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "GeoLens".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Score content for AI answer-engine citation\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Color a 0-10 score: green from 7, yellow from 4, red below
fn paint_score(score: f64) -> String {
    let text = format!("{:>4.1}", score);
    if score >= 7.0 {
        text.bright_green().to_string()
    } else if score >= 4.0 {
        text.bright_yellow().to_string()
    } else {
        text.bright_red().to_string()
    }
}

fn print_scores(scores: &Scores) {
    eprintln!("  {} {}", "Overall:       ".dimmed(), paint_score(scores.overall()).bold());
    eprintln!("  {} {}", "Extractability:".dimmed(), paint_score(scores.extractability()));
    eprintln!("  {} {}", "Readability:   ".dimmed(), paint_score(scores.readability()));
    eprintln!("  {} {}", "Citability:    ".dimmed(), paint_score(scores.citability()));
}

/// Print the score block and usage of one analysis
pub fn print_analysis_summary(envelope: &AnalysisEnvelope) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Scores".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    print_scores(envelope.scores());
    eprintln!(
        "  {} {}",
        "Recommendations:".dimmed(),
        envelope.recommendations().len().to_string().bright_white()
    );
    eprintln!(
        "  {} {}",
        "Features:".dimmed(),
        envelope.meta.features_used.join(", ").bright_white()
    );
    eprintln!(
        "  {} {}ms\n",
        "Processing:".dimmed(),
        envelope.meta.processing_time.to_string().bright_white()
    );
}

/// Print the ranking of a comparison
pub fn print_comparison_summary(report: &ComparisonReport) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Ranking".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    for page in &report.ranked {
        eprintln!("  {} {} {}", format!("#{}", page.rank).bold(), paint_score(page.scores.overall()), page.url);
    }
    for failure in &report.failures {
        print_warning(&format!("{}: {}", failure.url, failure.error));
    }
    eprintln!();
}

/// Print the overall movement of a rewrite
pub fn print_rewrite_summary(validation: &RewriteValidation) {
    let overall = &validation.deltas.overall;
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Rewrite".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!(
        "  {} {} → {} ({:+.1})",
        "Overall:".dimmed(),
        paint_score(overall.before),
        paint_score(overall.after),
        overall.change
    );
    eprintln!(
        "  {} {}  {} {}\n",
        "Resolved:".dimmed(),
        validation.resolved_recommendations.len().to_string().bright_green(),
        "Introduced:".dimmed(),
        validation.new_recommendations.len().to_string().bright_yellow()
    );
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
