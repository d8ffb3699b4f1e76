use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::DEFAULT_ID_MARKER;

/// Settings for an analysis session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Probability (percent) used when the caller does not pick one.
    pub default_threshold: u32,
    /// Pause before running the analysis, in milliseconds. 0 disables it.
    pub analysis_delay_ms: u64,
    /// Prefix of exported file names.
    pub product_name: String,
    /// Marker stripped from the front of the `name` column.
    pub id_marker: char,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_threshold: 100,
            analysis_delay_ms: 0,
            product_name: "vacciology".to_string(),
            id_marker: DEFAULT_ID_MARKER,
        }
    }
}

impl AnalysisConfig {
    /// Load a JSON config; missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_threshold > 100 {
            bail!(
                "default_threshold must be between 0 and 100, got {}",
                self.default_threshold
            );
        }
        if self.product_name.trim().is_empty() {
            bail!("product_name must not be empty");
        }
        Ok(())
    }
}
