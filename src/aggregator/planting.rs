//! Planting aggregation, broken down per seed variety.
//!
//! Area is computed row by row: each active row covers its own width
//! times the distance travelled. Split and multi-hybrid planters report
//! which product each row is planting through a product-index channel;
//! everything else plants the operation's first declared product.

use crate::config::AggregatorConfig;
use crate::constants::levels;
use crate::error::{Error, Result};
use crate::ledger::ProductLedger;
use crate::meter_index::MeterIndex;
use crate::models::{Catalog, Channel, OperationData, RepresentationCode};
use crate::section::build_sections;
use crate::summary::{PlantingSummary, ProductSummary, RecordCounts};
use tracing::{trace, warn};

/// Planting aggregator for one operation
#[derive(Debug)]
pub struct PlantingAggregator<'a> {
    operation: &'a OperationData,
    catalog: &'a Catalog,
    config: &'a AggregatorConfig,
}

impl<'a> PlantingAggregator<'a> {
    pub fn new(
        operation: &'a OperationData,
        catalog: &'a Catalog,
        config: &'a AggregatorConfig,
    ) -> Self {
        Self {
            operation,
            catalog,
            config,
        }
    }

    pub fn run(self) -> Result<PlantingSummary> {
        let operation = self.operation;
        let index = MeterIndex::for_operation(operation);
        let distance = index.require(levels::MACHINE, &RepresentationCode::DistanceTraveled)?;
        let rows = build_sections(operation, self.catalog, &self.config.planting_rate_codes)?;

        let default_product = operation.primary_product_id().ok_or(Error::NoProducts {
            operation_id: operation.id,
        })?;
        let mut ledger = ProductLedger::seeded(&operation.product_ids);

        if rows.is_empty() {
            warn!("Operation {}: no row-level device elements", operation.id);
        }

        // Rate channels are unit-homogeneous within an operation
        let rate_units = rows
            .iter()
            .find_map(|row| row.rate.and_then(Channel::unit_code))
            .map(str::to_string);

        let mut records = RecordCounts::default();
        for record in operation.spatial_records() {
            records.processed += 1;

            let Some(distance_feet) = record.numeric_value(distance) else {
                records.skipped += 1;
                trace!(
                    "Operation {}: no distance at {}, skipping record",
                    operation.id, record.timestamp
                );
                continue;
            };

            for row in rows.iter().filter(|row| row.is_active(record)) {
                let product_id = row.product_at(record, default_product);
                let area = row.covered_area(distance_feet);
                ledger.add_area(product_id, area)?;

                if let Some(rate) = row.rate_at(record) {
                    ledger.add_amount(product_id, rate * area)?;
                }
            }
        }

        Ok(PlantingSummary {
            rate_units,
            products: self.product_summaries(&ledger),
            records,
        })
    }

    fn product_summaries(&self, ledger: &ProductLedger) -> Vec<ProductSummary> {
        ledger
            .iter()
            .map(|(product_id, entry)| {
                let description = self
                    .catalog
                    .product(product_id)
                    .map(|product| product.description.clone());
                if description.is_none() {
                    warn!(
                        "Operation {}: product {} not found in catalog",
                        self.operation.id, product_id
                    );
                }
                ProductSummary {
                    product_id,
                    description,
                    total_area: entry.total_area,
                    total_amount: entry.total_amount,
                    average_rate: entry.average_rate(),
                }
            })
            .collect()
    }
}
