//! Summary values produced by one aggregation pass.
//!
//! Summaries are plain data: they are built by an aggregator, returned
//! to the caller and never mutated afterwards.

use crate::error::{Error, Result};
use crate::mix::MixApportionment;
use crate::models::ProductId;
use serde::Serialize;
use std::fmt;

/// A derived ratio that may be undefined
///
/// Zero-coverage operations are legitimate, so a zero denominator is
/// reported as `Undefined` instead of leaking NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rate {
    Defined(f64),
    Undefined,
}

impl Rate {
    /// `numerator / denominator`, undefined for a zero denominator
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Self::Undefined;
        }
        let value = numerator / denominator;
        if value.is_finite() {
            Self::Defined(value)
        } else {
            Self::Undefined
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(value) => Some(*value),
            Self::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    /// Demand a defined value, naming the quantity in the error
    pub fn defined_or_err(&self, quantity: &str) -> Result<f64> {
        self.value().ok_or_else(|| Error::degenerate_rate(quantity))
    }

    /// Apply `f` to a defined value
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Defined(value) => Self::Defined(f(value)),
            Self::Undefined => Self::Undefined,
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(value) => fmt::Display::fmt(value, f),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

/// How many records a pass visited and how many contributed nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub processed: usize,
    pub skipped: usize,
}

impl RecordCounts {
    pub fn contributed(&self) -> usize {
        self.processed - self.skipped
    }
}

/// Where the harvest working width came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthSource {
    /// Implement-level equipment width channel
    Channel,
    /// Sum of active section widths
    Sections,
}

/// Harvest totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarvestSummary {
    /// Harvested area in acres
    pub total_area: f64,
    /// Wet mass, in the wet mass channel's unit (lb)
    pub total_wet_mass: f64,
    /// Dry yield volume, in the yield volume channel's unit (bu)
    pub total_dry_volume: f64,
    /// Mass-weighted average moisture (%), undefined for zero wet mass
    pub average_moisture: Rate,
    pub width_source: WidthSource,
    pub records: RecordCounts,
}

/// Planting totals for one product (seed variety)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub product_id: ProductId,
    pub description: Option<String>,
    /// Planted area in acres
    pub total_area: f64,
    /// Seeds or mass, depending on the rate channel
    pub total_amount: f64,
    /// Amount per acre; zero when nothing was planted
    pub average_rate: f64,
}

/// Planting totals broken down per product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantingSummary {
    /// Unit of the row rate channels (e.g. "seeds/ac")
    pub rate_units: Option<String>,
    /// One entry per declared product, in declaration order
    pub products: Vec<ProductSummary>,
    pub records: RecordCounts,
}

impl PlantingSummary {
    pub fn total_area(&self) -> f64 {
        self.products.iter().map(|product| product.total_area).sum()
    }

    pub fn total_amount(&self) -> f64 {
        self.products.iter().map(|product| product.total_amount).sum()
    }
}

/// Primary product of an as-applied operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedProduct {
    pub product_id: ProductId,
    pub description: Option<String>,
    /// Component breakdown when the product is a mixture
    pub mix: Option<MixApportionment>,
}

/// As-applied (crop protection / fertilizing) totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSummary {
    /// Applied area in acres
    pub total_area: f64,
    /// Applied amount (gal or lb)
    pub total_amount: f64,
    pub average_rate: Rate,
    pub rate_units: Option<String>,
    pub product: Option<AppliedProduct>,
    pub records: RecordCounts,
}

/// Result of aggregating one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationSummary {
    Harvest(HarvestSummary),
    Planting(PlantingSummary),
    Application(ApplicationSummary),
}

impl OperationSummary {
    /// Total covered area in acres
    pub fn total_area(&self) -> f64 {
        match self {
            Self::Harvest(summary) => summary.total_area,
            Self::Planting(summary) => summary.total_area(),
            Self::Application(summary) => summary.total_area,
        }
    }

    pub fn records(&self) -> RecordCounts {
        match self {
            Self::Harvest(summary) => summary.records,
            Self::Planting(summary) => summary.records,
            Self::Application(summary) => summary.records,
        }
    }

    /// One-line description for logging
    pub fn summary(&self) -> String {
        match self {
            Self::Harvest(s) => format!(
                "Harvest: {:.2} ac | wet mass {:.2} | moisture {:.2} | dry volume {:.2}",
                s.total_area, s.total_wet_mass, s.average_moisture, s.total_dry_volume
            ),
            Self::Planting(s) => format!(
                "Planting: {:.2} ac | amount {:.2} | {} product(s)",
                s.total_area(),
                s.total_amount(),
                s.products.len()
            ),
            Self::Application(s) => format!(
                "Application: {:.2} ac | amount {:.2} | rate {:.2} {}",
                s.total_area,
                s.total_amount,
                s.average_rate,
                s.rate_units.as_deref().unwrap_or("")
            ),
        }
    }
}
