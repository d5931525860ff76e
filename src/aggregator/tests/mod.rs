//! Tests for the operation aggregators
//!
//! Shared fixture builders for hand-built operations and catalogs.

pub mod harvest_tests;
pub mod planting_tests;

use crate::constants::levels;
use crate::models::{
    Catalog, Channel, DeviceElementUse, MeterValue, OperationData, OperationType, Product,
    ProductComponent, ProductId, Quantity, ReferenceId, RepresentationCode, SectionConfiguration,
    SpatialRecord, UnitDimension, UnitOfMeasure,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub const DISTANCE: ReferenceId = 1;
pub const MOISTURE: ReferenceId = 2;
pub const WET_MASS: ReferenceId = 3;
pub const DRY_VOLUME: ReferenceId = 4;
pub const WIDTH: ReferenceId = 5;
pub const DELTA_AREA: ReferenceId = 6;
pub const APP_RATE: ReferenceId = 7;

/// Float comparison tolerance
pub const EPSILON: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// Timestamp of the `index`th record, one second apart
pub fn timestamp(index: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 15, 14, 0, 0).unwrap() + Duration::seconds(index as i64)
}

/// Channel ids for row `row`: (status, rate, product index)
pub fn row_channel_ids(row: usize) -> (ReferenceId, ReferenceId, ReferenceId) {
    let base = 100 + 10 * row as ReferenceId;
    (base, base + 1, base + 2)
}

/// One harvest record: (distance ft, width ft, wet mass lb, moisture %, dry volume bu)
pub type HarvestRow = (f64, f64, f64, f64, f64);

/// Harvest operation with machine-level yield channels and a header width channel
pub fn create_harvest_operation(rows: &[HarvestRow]) -> OperationData {
    let mut operation = OperationData::new(10, OperationType::Harvesting);
    operation.device_element_uses = vec![
        DeviceElementUse::new(
            levels::MACHINE,
            1,
            vec![
                Channel::new(DISTANCE, RepresentationCode::DistanceTraveled),
                Channel::new(MOISTURE, RepresentationCode::HarvestMoisture),
                Channel::new(WET_MASS, RepresentationCode::YieldWetMass),
                Channel::new(DRY_VOLUME, RepresentationCode::YieldVolume),
            ],
        ),
        DeviceElementUse::new(
            levels::IMPLEMENT,
            2,
            vec![Channel::new(WIDTH, RepresentationCode::EquipmentWidth)],
        ),
    ];
    operation.spatial_records = rows
        .iter()
        .enumerate()
        .map(|(i, &(distance, width, wet_mass, moisture, dry_volume))| {
            SpatialRecord::new(timestamp(i))
                .with_value(DISTANCE, MeterValue::numeric(distance))
                .with_value(WIDTH, MeterValue::numeric(width))
                .with_value(WET_MASS, MeterValue::numeric(wet_mass))
                .with_value(MOISTURE, MeterValue::numeric(moisture))
                .with_value(DRY_VOLUME, MeterValue::numeric(dry_volume))
        })
        .collect();
    operation
}

/// Planting operation with `widths.len()` rows (configuration ids 1..)
///
/// Every row logs status and a seeds/ac rate channel; product-index
/// channels are added when `product_index` is set.
pub fn create_planting_setup(
    widths: &[f64],
    product_ids: &[ProductId],
    product_index: bool,
) -> (OperationData, Catalog) {
    let mut operation = OperationData::new(20, OperationType::SowingAndPlanting);
    operation.product_ids = product_ids.to_vec();
    operation.device_element_uses.push(DeviceElementUse::new(
        levels::MACHINE,
        100,
        vec![Channel::new(DISTANCE, RepresentationCode::DistanceTraveled)],
    ));

    let mut catalog = Catalog::default();
    for (row, &width) in widths.iter().enumerate() {
        let configuration_id = row as ReferenceId + 1;
        let (status, rate, index) = row_channel_ids(row);
        let mut channels = vec![
            Channel::new(status, RepresentationCode::RecordingStatus),
            Channel::new(rate, RepresentationCode::SeedRateSeedsActual)
                .with_unit(UnitOfMeasure::new("seeds/ac", UnitDimension::Count)),
        ];
        if product_index {
            channels.push(Channel::new(index, RepresentationCode::ProductIndex));
        }
        operation.device_element_uses.push(DeviceElementUse::new(
            levels::SECTION,
            configuration_id,
            channels,
        ));
        catalog.section_configurations.push(SectionConfiguration {
            id: configuration_id,
            section_width_inches: width,
        });
    }

    for &product_id in product_ids {
        catalog.products.push(Product {
            id: product_id,
            description: format!("Hybrid {product_id}"),
            components: Vec::new(),
        });
    }

    (operation, catalog)
}

/// State of one row in one planting record
#[derive(Debug, Clone, Copy)]
pub struct RowReading {
    pub status: &'static str,
    pub rate: Option<f64>,
    pub product: Option<ProductId>,
}

impl RowReading {
    pub fn on(rate: f64) -> Self {
        Self {
            status: "On",
            rate: Some(rate),
            product: None,
        }
    }

    pub fn off(rate: f64) -> Self {
        Self {
            status: "Off",
            rate: Some(rate),
            product: None,
        }
    }

    pub fn planting(mut self, product: ProductId) -> Self {
        self.product = Some(product);
        self
    }
}

/// Planting record with a distance and one reading per row
pub fn planting_record(index: usize, distance: f64, rows: &[RowReading]) -> SpatialRecord {
    let mut record =
        SpatialRecord::new(timestamp(index)).with_value(DISTANCE, MeterValue::numeric(distance));
    for (row, reading) in rows.iter().enumerate() {
        let (status, rate, product_index) = row_channel_ids(row);
        record = record.with_value(status, MeterValue::enumerated(reading.status));
        if let Some(value) = reading.rate {
            record = record.with_value(rate, MeterValue::numeric(value));
        }
        if let Some(product) = reading.product {
            record = record.with_value(product_index, MeterValue::numeric(product as f64));
        }
    }
    record
}

/// As-applied operation logging delta area and a gal/ac rate on the implement
pub fn create_application_operation(
    rows: &[(f64, f64)],
    product_ids: &[ProductId],
) -> OperationData {
    let mut operation = OperationData::new(30, OperationType::CropProtection);
    operation.product_ids = product_ids.to_vec();
    operation.device_element_uses = vec![DeviceElementUse::new(
        levels::IMPLEMENT,
        3,
        vec![
            Channel::new(DELTA_AREA, RepresentationCode::DeltaArea),
            Channel::new(APP_RATE, RepresentationCode::AppRateVolumeActual)
                .with_unit(UnitOfMeasure::new("gal/ac", UnitDimension::Volume)),
        ],
    )];
    operation.spatial_records = rows
        .iter()
        .enumerate()
        .map(|(i, &(area, rate))| {
            SpatialRecord::new(timestamp(i))
                .with_value(DELTA_AREA, MeterValue::numeric(area))
                .with_value(
                    APP_RATE,
                    MeterValue::Numeric {
                        value: rate,
                        unit: Some("gal1ac-1".to_string()),
                    },
                )
        })
        .collect();
    operation
}

/// Catalog with a two-component tank mix (id 50) of water (51) and herbicide (52)
pub fn create_mix_catalog(water_gal: f64, herbicide_gal: f64) -> Catalog {
    let volume_component = |ingredient_id, value| ProductComponent {
        ingredient_id,
        quantity: Quantity {
            value,
            unit: UnitOfMeasure::new("gal", UnitDimension::Volume),
        },
    };

    Catalog {
        products: vec![
            Product {
                id: 50,
                description: "Burndown Mix".to_string(),
                components: vec![
                    volume_component(51, water_gal),
                    volume_component(52, herbicide_gal),
                ],
            },
            Product {
                id: 51,
                description: "Water".to_string(),
                components: Vec::new(),
            },
            Product {
                id: 52,
                description: "Glyphosate".to_string(),
                components: Vec::new(),
            },
        ],
        ..Default::default()
    }
}
