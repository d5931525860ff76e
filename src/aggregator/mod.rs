//! Operation aggregation engine.
//!
//! Each supported operation type has one aggregator. All of them share
//! the same shape:
//!
//! 1. Resolve the channels they need once, through [`MeterIndex`]
//! 2. Walk the operation's spatial records exactly once, in emission order
//! 3. Return an immutable [`OperationSummary`]
//!
//! A required channel that cannot be resolved fails the operation with
//! [`Error::ChannelNotFound`]. A record that is missing a value for a
//! resolved channel contributes nothing and is counted as skipped.
//!
//! [`MeterIndex`]: crate::meter_index::MeterIndex

pub mod as_applied;
pub mod harvest;
pub mod planting;

#[cfg(test)]
pub mod tests;

pub use as_applied::AsAppliedAggregator;
pub use harvest::HarvestAggregator;
pub use planting::PlantingAggregator;

use crate::config::AggregatorConfig;
use crate::error::{Error, Result};
use crate::models::{Catalog, OperationData, OperationType};
use crate::summary::OperationSummary;
use tracing::debug;

/// Aggregation algorithm selected by operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationAggregator {
    Harvest,
    Planting,
    AsApplied,
}

impl OperationAggregator {
    /// Aggregator for `operation_type`, `None` if the type is not summarised
    pub fn for_operation_type(operation_type: OperationType) -> Option<Self> {
        match operation_type {
            OperationType::Harvesting => Some(Self::Harvest),
            OperationType::SowingAndPlanting => Some(Self::Planting),
            OperationType::CropProtection | OperationType::Fertilizing => Some(Self::AsApplied),
            OperationType::Tillage | OperationType::Irrigation | OperationType::Unknown => None,
        }
    }

    /// Run one aggregation pass over `operation`
    pub fn run(
        &self,
        operation: &OperationData,
        catalog: &Catalog,
        config: &AggregatorConfig,
    ) -> Result<OperationSummary> {
        debug!(
            "Aggregating operation {} ({}) with {:?} aggregator: {} records",
            operation.id,
            operation.operation_type,
            self,
            operation.spatial_records.len()
        );

        let summary = match self {
            Self::Harvest => OperationSummary::Harvest(
                HarvestAggregator::new(operation, catalog, config).run()?,
            ),
            Self::Planting => OperationSummary::Planting(
                PlantingAggregator::new(operation, catalog, config).run()?,
            ),
            Self::AsApplied => OperationSummary::Application(
                AsAppliedAggregator::new(operation, catalog, config).run()?,
            ),
        };

        debug!("Operation {}: {}", operation.id, summary.summary());
        Ok(summary)
    }
}

/// Aggregate one operation, dispatching on its operation type
pub fn aggregate(
    operation: &OperationData,
    catalog: &Catalog,
    config: &AggregatorConfig,
) -> Result<OperationSummary> {
    let aggregator = OperationAggregator::for_operation_type(operation.operation_type).ok_or(
        Error::UnsupportedOperation {
            operation_type: operation.operation_type,
        },
    )?;
    aggregator.run(operation, catalog, config)
}
