//! Error types for GeoLens operations.
//!
//! This module defines the main error type [`GeoError`] which represents
//! every failure that can surface from content reading, model inference,
//! semantic parsing and the comparison operations.
//!
//! Only a subset of these ever reaches the caller of
//! [`GeoAnalyzer::analyze`](crate::GeoAnalyzer::analyze): model and parse
//! failures are recovered inside the pipeline and recorded as feature flags.
//!
//! # Example
//!
//! ```rust
//! use geolens_core::{GeoError, Result};
//!
//! fn require_query(query: &str) -> Result<&str> {
//!     if query.trim().is_empty() {
//!         return Err(GeoError::InvalidInput("query must not be empty".to_string()));
//!     }
//!     Ok(query)
//! }
//! ```

use thiserror::Error;

/// Main error type for content analysis operations.
#[derive(Error, Debug)]
pub enum GeoError {
    /// The content source answered with a non-success status.
    ///
    /// Fatal for the whole analyze call; the upstream status and body are kept
    /// so callers can surface them verbatim.
    #[error("Content source returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// HTTP transport errors from reqwest.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Missing or malformed caller input (empty query, empty URL list, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The model transport failed or returned nothing usable.
    #[error("LLM call failed: {0}")]
    Model(String),

    /// The model answered but no usable JSON object could be recovered.
    ///
    /// Raised only for the hard-fail conditions: no object found, invalid JSON,
    /// or neither of the two required top-level keys present.
    #[error("Failed to parse semantic analysis: {0}")]
    SemanticParse(String),

    /// A comparison-style operation did not get enough successful analyses.
    #[error("Need at least {needed} successful analyses, got {succeeded}")]
    InsufficientResults { needed: usize, succeeded: usize },

    /// JSON serialization errors.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File read errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for GeoError.
pub type Result<T> = std::result::Result<T, GeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_display() {
        let err = GeoError::Upstream { status: 451, message: "blocked".to_string() };
        assert!(err.to_string().contains("451"));
        assert!(err.to_string().contains("blocked"));
    }

    #[test]
    fn test_insufficient_results_display() {
        let err = GeoError::InsufficientResults { needed: 2, succeeded: 1 };
        assert_eq!(err.to_string(), "Need at least 2 successful analyses, got 1");
    }

    #[test]
    fn test_model_error_display() {
        let err = GeoError::Model("LLM returned empty response".to_string());
        assert!(err.to_string().starts_with("LLM call failed"));
    }
}
