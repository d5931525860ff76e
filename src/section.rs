//! Row / section runtime state.
//!
//! Each row unit (planter) or boom section (sprayer) is logged as a
//! level-2 device element use. Its width comes from the catalog; its
//! status, rate and product assignment come from its own channels.

use crate::constants::{INCHES_PER_FOOT, SQUARE_FEET_PER_ACRE, levels, section_status};
use crate::error::{Error, Result};
use crate::meter_index::MeterIndex;
use crate::models::{
    Catalog, Channel, DeviceElementUse, OperationData, ProductId, ReferenceId, RepresentationCode,
    SpatialRecord,
};
use tracing::debug;

/// Resolved configuration of one row or section
#[derive(Debug, Clone)]
pub struct SectionState<'a> {
    pub device_configuration_id: ReferenceId,
    pub width_inches: f64,
    /// `dtRecordingStatus`
    pub status: &'a Channel,
    /// Application / seeding rate, when the row logs one
    pub rate: Option<&'a Channel>,
    /// `vrProductIndex`, only present on split and multi-hybrid planters
    pub product_index: Option<&'a Channel>,
}

impl<'a> SectionState<'a> {
    /// Resolve width and channels for one level-2 element
    ///
    /// `rate_codes` are tried in order; the first one the row logs is used.
    pub fn build(
        element: &'a DeviceElementUse,
        catalog: &Catalog,
        rate_codes: &[RepresentationCode],
    ) -> Result<Self> {
        let configuration = catalog
            .section_configuration(element.device_configuration_id)
            .ok_or(Error::ConfigurationMissing {
                configuration_id: element.device_configuration_id,
            })?;

        let index = MeterIndex::for_element(element);
        let status = index.require(levels::SECTION, &RepresentationCode::RecordingStatus)?;
        let rate = index.resolve_any(levels::SECTION, rate_codes);
        let product_index = index.resolve(levels::SECTION, &RepresentationCode::ProductIndex);

        Ok(Self {
            device_configuration_id: element.device_configuration_id,
            width_inches: configuration.section_width_inches,
            status,
            rate,
            product_index,
        })
    }

    pub fn width_feet(&self) -> f64 {
        self.width_inches / INCHES_PER_FOOT
    }

    /// Acres covered by this section over `distance_feet`
    pub fn covered_area(&self, distance_feet: f64) -> f64 {
        self.width_feet() * distance_feet / SQUARE_FEET_PER_ACRE
    }

    /// Status value at `record`, `None` when the status channel is silent
    pub fn status_at<'r>(&self, record: &'r SpatialRecord) -> Option<&'r str> {
        record.enumerated_value(self.status)
    }

    /// Whether the section contributes at `record`
    ///
    /// Only an explicit "Off" deactivates a section; a record without a
    /// status value gives no contribution either.
    pub fn is_active(&self, record: &SpatialRecord) -> bool {
        matches!(self.status_at(record), Some(status) if status != section_status::OFF)
    }

    /// Whether the section reads exactly "On" at `record`
    pub fn is_on(&self, record: &SpatialRecord) -> bool {
        self.status_at(record) == Some(section_status::ON)
    }

    /// Product being applied by this section, falling back to `default`
    pub fn product_at(&self, record: &SpatialRecord, default: ProductId) -> ProductId {
        self.product_index
            .and_then(|channel| record.numeric_value(channel))
            .map(|index| index as ProductId)
            .unwrap_or(default)
    }

    /// Rate value at `record`, if the section logs a rate
    pub fn rate_at(&self, record: &SpatialRecord) -> Option<f64> {
        self.rate.and_then(|channel| record.numeric_value(channel))
    }
}

/// One [`SectionState`] per level-2 element of the operation
pub fn build_sections<'a>(
    operation: &'a OperationData,
    catalog: &Catalog,
    rate_codes: &[RepresentationCode],
) -> Result<Vec<SectionState<'a>>> {
    let sections = operation
        .device_element_uses(levels::SECTION)
        .map(|element| SectionState::build(element, catalog, rate_codes))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Operation {}: resolved {} section(s)",
        operation.id,
        sections.len()
    );
    Ok(sections)
}

/// Combined width in feet of the sections reading "On" at `record`
pub fn active_width_feet(record: &SpatialRecord, sections: &[SectionState<'_>]) -> f64 {
    let active_inches: f64 = sections
        .iter()
        .filter(|section| section.is_on(record))
        .map(|section| section.width_inches)
        .sum();
    active_inches / INCHES_PER_FOOT
}
