//! As-applied aggregation for crop protection and fertilizing.
//!
//! The implement logs the area covered since the previous record
//! directly, so area is summed as logged rather than recomputed from
//! distance and width.

use crate::config::AggregatorConfig;
use crate::constants::levels;
use crate::error::{Error, Result};
use crate::meter_index::MeterIndex;
use crate::mix::MixApportioner;
use crate::models::{Catalog, Channel, OperationData, RepresentationCode};
use crate::summary::{AppliedProduct, ApplicationSummary, Rate, RecordCounts};
use tracing::{trace, warn};

/// As-applied aggregator for one operation
#[derive(Debug)]
pub struct AsAppliedAggregator<'a> {
    operation: &'a OperationData,
    catalog: &'a Catalog,
    config: &'a AggregatorConfig,
}

impl<'a> AsAppliedAggregator<'a> {
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

    pub fn run(self) -> Result<ApplicationSummary> {
        let operation = self.operation;
        let (area_channel, rate_channel) = self.resolve_channels()?;

        let mut total_area = 0.0;
        let mut total_amount = 0.0;
        let mut rate_units: Option<String> = None;
        let mut records = RecordCounts::default();

        for record in operation.spatial_records() {
            records.processed += 1;

            let area = record.numeric_value(area_channel);
            let rate_value = record.value_of(rate_channel);
            let (Some(area), Some(rate)) = (area, rate_value.and_then(|v| v.as_numeric())) else {
                records.skipped += 1;
                trace!(
                    "Operation {}: incomplete as-applied record at {}",
                    operation.id, record.timestamp
                );
                continue;
            };

            if rate_units.is_none() {
                rate_units = rate_value
                    .and_then(|value| value.unit_code())
                    .or_else(|| rate_channel.unit_code())
                    .map(str::to_string);
            }

            total_area += area;
            total_amount += rate * area;
        }

        Ok(ApplicationSummary {
            total_area,
            total_amount,
            average_rate: Rate::ratio(total_amount, total_area),
            rate_units,
            product: self.applied_product(total_amount, total_area),
            records,
        })
    }

    fn resolve_channels(&self) -> Result<(&'a Channel, &'a Channel)> {
        let index = MeterIndex::for_operation(self.operation);
        let area = index.require(levels::IMPLEMENT, &RepresentationCode::DeltaArea)?;

        let rate_codes = &self.config.application_rate_codes;
        let rate = match index.resolve_any(levels::IMPLEMENT, rate_codes) {
            Some(channel) => channel,
            None => {
                let code = rate_codes
                    .first()
                    .cloned()
                    .unwrap_or(RepresentationCode::AppRateVolumeActual);
                return Err(Error::channel_not_found(levels::IMPLEMENT, code));
            }
        };

        Ok((area, rate))
    }

    /// Primary product details, apportioned when it is a mixture
    fn applied_product(&self, total_amount: f64, total_area: f64) -> Option<AppliedProduct> {
        let product_id = self.operation.primary_product_id()?;

        let Some(product) = self.catalog.product(product_id) else {
            warn!(
                "Operation {}: applied product {} not found in catalog",
                self.operation.id, product_id
            );
            return Some(AppliedProduct {
                product_id,
                description: None,
                mix: None,
            });
        };

        let mix = product.is_mix().then(|| {
            MixApportioner::new(self.catalog).apportion(product, total_amount, total_area)
        });

        Some(AppliedProduct {
            product_id,
            description: Some(product.description.clone()),
            mix,
        })
    }
}
