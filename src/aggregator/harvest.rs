//! Harvest (yield) aggregation.
//!
//! Area comes from distance × working width. Moisture is averaged
//! weighted by wet mass: the moisture sensor samples independently of
//! mass flow, so a plain mean over records would over-weight sparse
//! stretches of the field.

use crate::config::AggregatorConfig;
use crate::constants::{SQUARE_FEET_PER_ACRE, levels};
use crate::error::{Error, Result};
use crate::meter_index::MeterIndex;
use crate::models::{Catalog, Channel, OperationData, RepresentationCode, SpatialRecord};
use crate::section::{SectionState, active_width_feet, build_sections};
use crate::summary::{HarvestSummary, Rate, RecordCounts, WidthSource};
use tracing::{debug, trace};

/// Where per-record working width is read from
#[derive(Debug)]
enum WidthMeter<'a> {
    /// Header width in feet
    Channel(&'a Channel),
    /// Active width of the logged sections
    Sections(Vec<SectionState<'a>>),
}

impl WidthMeter<'_> {
    fn width_feet(&self, record: &SpatialRecord) -> Option<f64> {
        match self {
            Self::Channel(channel) => record.numeric_value(channel),
            Self::Sections(sections) => Some(active_width_feet(record, sections)),
        }
    }

    fn source(&self) -> WidthSource {
        match self {
            Self::Channel(_) => WidthSource::Channel,
            Self::Sections(_) => WidthSource::Sections,
        }
    }
}

#[derive(Debug)]
struct HarvestChannels<'a> {
    distance: &'a Channel,
    moisture: &'a Channel,
    wet_mass: &'a Channel,
    dry_volume: &'a Channel,
    width: WidthMeter<'a>,
}

/// Values of one record, present only when every channel reported
#[derive(Debug, Clone, Copy)]
struct HarvestSample {
    area: f64,
    wet_mass: f64,
    moisture: f64,
    dry_volume: f64,
}

/// Running harvest totals
#[derive(Debug, Default)]
struct HarvestTotals {
    area: f64,
    wet_mass: f64,
    dry_volume: f64,
    moisture_mass: f64,
}

impl HarvestTotals {
    fn add(&mut self, sample: HarvestSample) {
        self.area += sample.area;
        self.wet_mass += sample.wet_mass;
        self.dry_volume += sample.dry_volume;
        self.moisture_mass += sample.moisture * sample.wet_mass;
    }
}

/// Harvest aggregator for one operation
#[derive(Debug)]
pub struct HarvestAggregator<'a> {
    operation: &'a OperationData,
    catalog: &'a Catalog,
    config: &'a AggregatorConfig,
}

impl<'a> HarvestAggregator<'a> {
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

    pub fn run(self) -> Result<HarvestSummary> {
        let channels = self.resolve_channels()?;
        let mut totals = HarvestTotals::default();
        let mut records = RecordCounts::default();

        for record in self.operation.spatial_records() {
            records.processed += 1;
            match sample(&channels, record) {
                Some(sample) => totals.add(sample),
                None => {
                    records.skipped += 1;
                    trace!(
                        "Operation {}: skipping harvest record at {}",
                        self.operation.id, record.timestamp
                    );
                }
            }
        }

        Ok(HarvestSummary {
            total_area: totals.area,
            total_wet_mass: totals.wet_mass,
            total_dry_volume: totals.dry_volume,
            average_moisture: Rate::ratio(totals.moisture_mass, totals.wet_mass),
            width_source: channels.width.source(),
            records,
        })
    }

    fn resolve_channels(&self) -> Result<HarvestChannels<'a>> {
        let index = MeterIndex::for_operation(self.operation);

        let distance = index.require(levels::MACHINE, &RepresentationCode::DistanceTraveled)?;
        let moisture = index.require(levels::MACHINE, &RepresentationCode::HarvestMoisture)?;
        let wet_mass = index.require(levels::MACHINE, &RepresentationCode::YieldWetMass)?;
        let dry_volume = index.require(levels::MACHINE, &RepresentationCode::YieldVolume)?;

        let width = match index.resolve(levels::IMPLEMENT, &RepresentationCode::EquipmentWidth) {
            Some(channel) => WidthMeter::Channel(channel),
            None if self.config.harvest_width_from_sections => {
                let sections = build_sections(self.operation, self.catalog, &[])?;
                if sections.is_empty() {
                    return Err(Error::channel_not_found(
                        levels::IMPLEMENT,
                        RepresentationCode::EquipmentWidth,
                    ));
                }
                debug!(
                    "Operation {}: no header width channel, using {} section widths",
                    self.operation.id,
                    sections.len()
                );
                WidthMeter::Sections(sections)
            }
            None => {
                return Err(Error::channel_not_found(
                    levels::IMPLEMENT,
                    RepresentationCode::EquipmentWidth,
                ));
            }
        };

        Ok(HarvestChannels {
            distance,
            moisture,
            wet_mass,
            dry_volume,
            width,
        })
    }
}

fn sample(channels: &HarvestChannels<'_>, record: &SpatialRecord) -> Option<HarvestSample> {
    let distance_feet = record.numeric_value(channels.distance)?;
    let width_feet = channels.width.width_feet(record)?;
    let wet_mass = record.numeric_value(channels.wet_mass)?;
    let moisture = record.numeric_value(channels.moisture)?;
    let dry_volume = record.numeric_value(channels.dry_volume)?;

    Some(HarvestSample {
        area: distance_feet * width_feet / SQUARE_FEET_PER_ACRE,
        wet_mass,
        moisture,
        dry_volume,
    })
}
