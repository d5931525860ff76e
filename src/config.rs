//! Configuration management and validation.
//!
//! Controls which channel codes the aggregators look for and how the
//! batch processor reacts to failing operations.

use crate::error::{Error, Result};
use crate::models::RepresentationCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Aggregation and batch processing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Row-level seeding rate codes, highest priority first
    pub planting_rate_codes: Vec<RepresentationCode>,

    /// Implement-level applied rate codes, highest priority first
    pub application_rate_codes: Vec<RepresentationCode>,

    /// Derive harvest width from active sections when no width channel is logged
    pub harvest_width_from_sections: bool,

    /// Stop the batch at the first failed operation
    pub fail_fast: bool,

    /// Show a progress bar while processing operations
    pub show_progress: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            planting_rate_codes: vec![
                RepresentationCode::SeedRateMassActual,
                RepresentationCode::SeedRateSeedsActual,
            ],
            application_rate_codes: vec![
                RepresentationCode::AppRateVolumeActual,
                RepresentationCode::AppRateMassActual,
            ],
            harvest_width_from_sections: true,
            fail_fast: false,
            show_progress: false,
        }
    }
}

impl AggregatorConfig {
    /// Load configuration from a JSON file; missing keys take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Set the planting rate codes
    pub fn with_planting_rate_codes(mut self, codes: Vec<RepresentationCode>) -> Self {
        self.planting_rate_codes = codes;
        self
    }

    /// Set the application rate codes
    pub fn with_application_rate_codes(mut self, codes: Vec<RepresentationCode>) -> Self {
        self.application_rate_codes = codes;
        self
    }

    /// Require an explicit harvest width channel
    pub fn without_section_width_fallback(mut self) -> Self {
        self.harvest_width_from_sections = false;
        self
    }

    /// Abort the batch on the first failed operation
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Enable the progress bar
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.planting_rate_codes.is_empty() {
            return Err(Error::configuration(
                "planting_rate_codes must list at least one code",
            ));
        }
        if self.application_rate_codes.is_empty() {
            return Err(Error::configuration(
                "application_rate_codes must list at least one code",
            ));
        }
        Ok(())
    }
}
