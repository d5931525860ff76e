//! Batch processing over an imported dataset.
//!
//! Runs the aggregation engine for every logged operation and collects
//! the results into a report. A failing operation is recorded and the
//! batch moves on; data-integrity failures abort the batch and are
//! returned to the caller.

use crate::aggregator::OperationAggregator;
use crate::config::AggregatorConfig;
use crate::error::Result;
use crate::models::{Catalog, Dataset, LoggedData, OperationData, OperationType, ReferenceId};
use crate::summary::OperationSummary;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Counters for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessingStats {
    pub logged_data_processed: usize,
    pub operations_summarized: usize,
    pub operations_failed: usize,
    pub operations_unsupported: usize,
    pub records_visited: usize,
    pub processing_time_ms: u64,
}

impl ProcessingStats {
    pub fn operations_total(&self) -> usize {
        self.operations_summarized + self.operations_failed + self.operations_unsupported
    }

    /// Share of supported operations that produced a summary, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.operations_summarized + self.operations_failed;
        if attempted == 0 {
            100.0
        } else {
            (self.operations_summarized as f64 / attempted as f64) * 100.0
        }
    }

    /// Get summary string for logging
    pub fn summary(&self) -> String {
        format!(
            "Processing Summary: {} logged data block(s), {} operation(s) | \
             Summarized: {} | Failed: {} | Unsupported: {} | Records: {} ({:.1}% success)",
            self.logged_data_processed,
            self.operations_total(),
            self.operations_summarized,
            self.operations_failed,
            self.operations_unsupported,
            self.records_visited,
            self.success_rate()
        )
    }
}

/// What happened to one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationOutcome {
    Summarized { summary: OperationSummary },
    Failed { error: String },
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationReport {
    pub operation_id: ReferenceId,
    pub operation_type: OperationType,
    pub outcome: OperationOutcome,
}

/// Results for one logged-data block with its grower/farm/field context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedDataReport {
    pub id: ReferenceId,
    pub description: String,
    pub grower: Option<String>,
    pub farm: Option<String>,
    pub field: Option<String>,
    pub operations: Vec<OperationReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingReport {
    /// Catalog description of the imported file set
    pub file_set: String,
    pub logged_data: Vec<LoggedDataReport>,
    pub stats: ProcessingStats,
}

/// Aggregates every operation of a dataset
#[derive(Debug, Clone, Default)]
pub struct DatasetProcessor {
    config: AggregatorConfig,
}

impl DatasetProcessor {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Process a dataset, consuming it
    ///
    /// Each logged-data block is dropped as soon as its operations have
    /// been aggregated, releasing its spatial records.
    pub fn process(&self, dataset: Dataset) -> Result<ProcessingReport> {
        let start_time = Instant::now();
        let Dataset {
            catalog,
            logged_data,
        } = dataset;

        info!(
            "Processing file set '{}': {} logged data block(s)",
            catalog.description,
            logged_data.len()
        );

        let operation_count: usize = logged_data.iter().map(|ld| ld.operations.len()).sum();
        let progress = self
            .config
            .show_progress
            .then(|| create_progress_bar(operation_count));

        let mut stats = ProcessingStats::default();
        let mut reports = Vec::with_capacity(logged_data.len());

        for block in logged_data {
            let report = self.process_logged_data(&catalog, block, &mut stats, progress.as_ref())?;
            reports.push(report);
            stats.logged_data_processed += 1;
        }

        if let Some(pb) = progress {
            pb.finish_with_message(format!(
                "Aggregation complete: {} operations",
                stats.operations_total()
            ));
        }

        stats.processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!("{}", stats.summary());

        Ok(ProcessingReport {
            file_set: catalog.description,
            logged_data: reports,
            stats,
        })
    }

    fn process_logged_data(
        &self,
        catalog: &Catalog,
        block: LoggedData,
        stats: &mut ProcessingStats,
        progress: Option<&ProgressBar>,
    ) -> Result<LoggedDataReport> {
        debug!("Logged data {}: {}", block.id, block.description);

        let grower = block
            .grower_id
            .and_then(|id| catalog.grower(id))
            .map(|grower| grower.name.clone());
        let farm = block
            .farm_id
            .and_then(|id| catalog.farm(id))
            .map(|farm| farm.description.clone());
        let field = block
            .field_id
            .and_then(|id| catalog.field(id))
            .map(|field| field.description.clone());

        let mut operations = Vec::with_capacity(block.operations.len());
        for operation in &block.operations {
            let outcome = self.process_operation(catalog, operation, stats)?;
            operations.push(OperationReport {
                operation_id: operation.id,
                operation_type: operation.operation_type,
                outcome,
            });
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        Ok(LoggedDataReport {
            id: block.id,
            description: block.description,
            grower,
            farm,
            field,
            operations,
        })
    }

    fn process_operation(
        &self,
        catalog: &Catalog,
        operation: &OperationData,
        stats: &mut ProcessingStats,
    ) -> Result<OperationOutcome> {
        let Some(aggregator) = OperationAggregator::for_operation_type(operation.operation_type)
        else {
            debug!(
                "Operation {}: {} is not summarised",
                operation.id, operation.operation_type
            );
            stats.operations_unsupported += 1;
            return Ok(OperationOutcome::Unsupported);
        };

        match aggregator.run(operation, catalog, &self.config) {
            Ok(summary) => {
                stats.operations_summarized += 1;
                stats.records_visited += summary.records().processed;
                Ok(OperationOutcome::Summarized { summary })
            }
            Err(error) if error.is_data_integrity() || self.config.fail_fast => Err(error),
            Err(error) => {
                warn!("Operation {} failed: {}", operation.id, error);
                stats.operations_failed += 1;
                Ok(OperationOutcome::Failed {
                    error: error.to_string(),
                })
            }
        }
    }
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} operations {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
