//! Field Log Processor Library
//!
//! Offline aggregation of precision-agriculture machine logs into per-field
//! operation summaries.
//!
//! This library provides tools for:
//! - Resolving sensor channels by representation code and device level
//! - Tracking per-row (section) state: width, on/off status, rate, product
//! - Per-product area/amount ledgers for planting operations
//! - Harvest, planting and as-applied aggregation over spatial records
//! - Apportioning tank-mix totals to their ingredients

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod loader;
pub mod meter_index;
pub mod mix;
pub mod models;
pub mod processor;
pub mod section;
pub mod summary;

// Re-export commonly used types
pub use aggregator::{OperationAggregator, aggregate};
pub use config::AggregatorConfig;
pub use error::{Error, Result};
pub use ledger::ProductLedger;
pub use meter_index::MeterIndex;
pub use mix::MixApportioner;
pub use models::{Catalog, Dataset, LoggedData, OperationData, OperationType};
pub use processor::{DatasetProcessor, ProcessingReport};
pub use section::SectionState;
pub use summary::{OperationSummary, Rate};
