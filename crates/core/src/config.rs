//! Pipeline-wide configuration.
//!
//! Every tunable the analyzer uses (default model, prompt budget, score caps,
//! recommendation thresholds, list limits) is carried by [`GeoConfig`] and
//! handed to each component at construction, so tests can run the pipeline
//! with overridden thresholds.
//!
//! # Example
//!
//! ```rust
//! use geolens_core::GeoConfig;
//!
//! let config = GeoConfig::builder()
//!     .model_id("@cf/meta/llama-3.1-8b-instruct")
//!     .max_content_chars(20_000)
//!     .temperature(0.0)
//!     .build();
//! assert_eq!(config.max_content_chars, 20_000);
//! ```

use crate::pattern::PatternConfig;
use crate::recommend::RecommendationConfig;
use crate::semantic::ValidationLimits;
use crate::synthesis::SynthesisConfig;

/// Default hosted model used for semantic extraction.
pub const DEFAULT_MODEL_ID: &str = "@cf/meta/llama-3.3-70b-instruct-fp8-fast";

/// Configuration for a [`GeoAnalyzer`](crate::GeoAnalyzer).
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// Model identifier passed to the model transport.
    pub model_id: String,

    /// Character budget for content embedded in the prompt (default: 70 000).
    pub max_content_chars: usize,

    /// Output token limit requested from the model (default: 4500).
    pub max_output_tokens: u32,

    /// Sampling temperature requested from the model (default: 0.1).
    pub temperature: f32,

    /// Neurons billed for one successful semantic analysis (default: 50).
    pub neurons_per_analysis: u32,

    /// Daily neuron allowance reported in usage accounting (default: 10 000).
    pub daily_neuron_budget: u32,

    /// Version stamped into `geoAnalysis.version` and `meta.version`.
    pub analyzer_version: String,

    /// Pattern metric thresholds and weights.
    pub pattern: PatternConfig,

    /// Citability formula constants.
    pub synthesis: SynthesisConfig,

    /// Recommendation rule thresholds.
    pub recommendations: RecommendationConfig,

    /// Caps applied while validating model output.
    pub limits: ValidationLimits,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_content_chars: 70_000,
            max_output_tokens: 4500,
            temperature: 0.1,
            neurons_per_analysis: 50,
            daily_neuron_budget: 10_000,
            analyzer_version: "1.0.0".to_string(),
            pattern: PatternConfig::default(),
            synthesis: SynthesisConfig::default(),
            recommendations: RecommendationConfig::default(),
            limits: ValidationLimits::default(),
        }
    }
}

impl GeoConfig {
    /// Creates a new builder for GeoConfig.
    pub fn builder() -> GeoConfigBuilder {
        GeoConfigBuilder::new()
    }
}

/// Builder for GeoConfig.
pub struct GeoConfigBuilder {
    config: GeoConfig,
}

impl GeoConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: GeoConfig::default() }
    }

    /// Sets the model identifier.
    pub fn model_id(mut self, value: impl Into<String>) -> Self {
        self.config.model_id = value.into();
        self
    }

    /// Sets the prompt content budget in characters.
    pub fn max_content_chars(mut self, value: usize) -> Self {
        self.config.max_content_chars = value;
        self
    }

    /// Sets the model output token limit.
    pub fn max_output_tokens(mut self, value: u32) -> Self {
        self.config.max_output_tokens = value;
        self
    }

    /// Sets the sampling temperature.
    pub fn temperature(mut self, value: f32) -> Self {
        self.config.temperature = value;
        self
    }

    /// Sets the neurons billed per successful semantic analysis.
    pub fn neurons_per_analysis(mut self, value: u32) -> Self {
        self.config.neurons_per_analysis = value;
        self
    }

    /// Sets the daily neuron budget.
    pub fn daily_neuron_budget(mut self, value: u32) -> Self {
        self.config.daily_neuron_budget = value;
        self
    }

    /// Sets the pattern metric configuration.
    pub fn pattern(mut self, value: PatternConfig) -> Self {
        self.config.pattern = value;
        self
    }

    /// Sets the citability formula constants.
    pub fn synthesis(mut self, value: SynthesisConfig) -> Self {
        self.config.synthesis = value;
        self
    }

    /// Sets the recommendation thresholds.
    pub fn recommendations(mut self, value: RecommendationConfig) -> Self {
        self.config.recommendations = value;
        self
    }

    /// Sets the validation list caps.
    pub fn limits(mut self, value: ValidationLimits) -> Self {
        self.config.limits = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> GeoConfig {
        self.config
    }
}

impl Default for GeoConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeoConfig::default();
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
        assert_eq!(config.max_content_chars, 70_000);
        assert_eq!(config.max_output_tokens, 4500);
        assert_eq!(config.neurons_per_analysis, 50);
        assert_eq!(config.daily_neuron_budget, 10_000);
    }

    #[test]
    fn test_builder_overrides() {
        let thresholds = RecommendationConfig { min_statistics: 5, ..Default::default() };
        let config = GeoConfig::builder()
            .model_id("test-model")
            .max_output_tokens(512)
            .recommendations(thresholds)
            .build();

        assert_eq!(config.model_id, "test-model");
        assert_eq!(config.max_output_tokens, 512);
        assert_eq!(config.recommendations.min_statistics, 5);
        assert_eq!(config.max_content_chars, 70_000);
    }
}
