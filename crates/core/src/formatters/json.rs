use serde::Serialize;

use crate::Result;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Serialize `value` as compact or pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    Ok(json)
}

/// JSON formatter with configurable options
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        to_json(value, self.config.pretty)
    }
}
