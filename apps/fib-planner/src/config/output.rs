//! Report output configuration.

use serde::{Deserialize, Serialize};

/// How the report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable sections.
    #[default]
    Text,
    /// `PlanEvaluation` as pretty JSON.
    Json,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
    /// Fractional digits for prices, quantities and distances.
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Include trading notes.
    #[serde(default)]
    pub advanced: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            decimals: default_decimals(),
            advanced: false,
        }
    }
}

const fn default_decimals() -> u32 {
    2
}
