//! Renderers for analysis envelopes, comparison reports and rewrite validations.

pub mod json;
pub mod markdown;

use std::str::FromStr;

use serde::Serialize;

use crate::{GeoError, Result};

pub use json::{JsonConfig, JsonFormatter, to_json};
pub use markdown::{MarkdownConfig, MarkdownFormatter, MarkdownReport};

/// Output formats supported by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// camelCase JSON, the boundary format.
    #[default]
    Json,
    /// Human-readable Markdown report.
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(GeoError::InvalidInput(format!("unknown output format: {other}"))),
        }
    }
}

/// Render any report in `format`; JSON output is pretty-printed.
pub fn render<R: Serialize + MarkdownReport>(report: &R, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report, true),
        OutputFormat::Markdown => Ok(MarkdownFormatter::default().convert(report)),
    }
}
