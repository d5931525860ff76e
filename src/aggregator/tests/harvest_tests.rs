//! Tests for harvest aggregation

use super::*;
use crate::aggregator::HarvestAggregator;
use crate::config::AggregatorConfig;
use crate::error::Error;
use crate::summary::{Rate, WidthSource};

fn run(operation: &OperationData, catalog: &Catalog) -> crate::Result<crate::summary::HarvestSummary> {
    let config = AggregatorConfig::default();
    HarvestAggregator::new(operation, catalog, &config).run()
}

#[test]
fn test_moisture_is_mass_weighted() {
    let operation = create_harvest_operation(&[
        (10.0, 30.0, 100.0, 15.0, 1.5),
        (10.0, 30.0, 200.0, 20.0, 3.0),
        (10.0, 30.0, 50.0, 18.0, 0.8),
    ]);

    let summary = run(&operation, &Catalog::default()).unwrap();

    // (1500 + 4000 + 900) / 350
    let moisture = summary.average_moisture.value().unwrap();
    assert!((moisture - 18.2857).abs() < 1e-4);
    assert_close(summary.total_wet_mass, 350.0);
    assert_close(summary.total_dry_volume, 5.3);
    assert_close(summary.total_area, 3.0 * 10.0 * 30.0 / 43_560.0);
    assert_eq!(summary.width_source, WidthSource::Channel);
    assert_eq!(summary.records.processed, 3);
    assert_eq!(summary.records.skipped, 0);
}

#[test]
fn test_area_is_monotonic_in_record_count() {
    let rows: Vec<HarvestRow> = (0..12)
        .map(|i| (i as f64 * 1.5, 30.0, 80.0, 17.0, 1.2))
        .collect();

    let mut previous = 0.0;
    for count in 0..=rows.len() {
        let operation = create_harvest_operation(&rows[..count]);
        let area = run(&operation, &Catalog::default()).unwrap().total_area;
        assert!(area >= previous, "area decreased at {count} records");
        previous = area;
    }
}

#[test]
fn test_zero_wet_mass_moisture_is_undefined() {
    let operation = create_harvest_operation(&[(10.0, 30.0, 0.0, 15.0, 0.0)]);

    let summary = run(&operation, &Catalog::default()).unwrap();

    assert_eq!(summary.average_moisture, Rate::Undefined);
    assert!(summary.total_area > 0.0);
}

#[test]
fn test_empty_operation_has_zero_totals() {
    let operation = create_harvest_operation(&[]);

    let summary = run(&operation, &Catalog::default()).unwrap();

    assert_eq!(summary.total_area, 0.0);
    assert_eq!(summary.average_moisture, Rate::Undefined);
    assert_eq!(summary.records.processed, 0);
}

#[test]
fn test_record_missing_value_is_skipped() {
    let mut operation = create_harvest_operation(&[
        (10.0, 30.0, 100.0, 15.0, 1.5),
        (10.0, 30.0, 200.0, 20.0, 3.0),
    ]);
    let baseline = run(&operation, &Catalog::default()).unwrap();

    // A record that carries everything except moisture
    let incomplete = SpatialRecord::new(timestamp(2))
        .with_value(DISTANCE, MeterValue::numeric(500.0))
        .with_value(WIDTH, MeterValue::numeric(30.0))
        .with_value(WET_MASS, MeterValue::numeric(900.0))
        .with_value(DRY_VOLUME, MeterValue::numeric(12.0));
    operation.spatial_records.insert(1, incomplete);

    let summary = run(&operation, &Catalog::default()).unwrap();

    assert_eq!(summary.total_area, baseline.total_area);
    assert_eq!(summary.total_wet_mass, baseline.total_wet_mass);
    assert_eq!(summary.total_dry_volume, baseline.total_dry_volume);
    assert_eq!(summary.average_moisture, baseline.average_moisture);
    assert_eq!(summary.records.processed, 3);
    assert_eq!(summary.records.skipped, 1);
}

#[test]
fn test_missing_machine_channel_fails() {
    let mut operation = create_harvest_operation(&[(10.0, 30.0, 100.0, 15.0, 1.5)]);
    operation.device_element_uses[0]
        .channels
        .retain(|channel| channel.code != RepresentationCode::YieldWetMass);

    let error = run(&operation, &Catalog::default()).unwrap_err();

    assert!(matches!(
        error,
        Error::ChannelNotFound {
            level: levels::MACHINE,
            code: RepresentationCode::YieldWetMass
        }
    ));
}

#[test]
fn test_width_channel_must_be_on_implement_level() {
    let mut operation = create_harvest_operation(&[(10.0, 30.0, 100.0, 15.0, 1.5)]);
    // Move the width channel to the machine level
    let width = operation.device_element_uses.remove(1).channels.remove(0);
    operation.device_element_uses[0].channels.push(width);

    let config = AggregatorConfig::default().without_section_width_fallback();
    let error = HarvestAggregator::new(&operation, &Catalog::default(), &config)
        .run()
        .unwrap_err();

    assert!(matches!(
        error,
        Error::ChannelNotFound {
            level: levels::IMPLEMENT,
            code: RepresentationCode::EquipmentWidth
        }
    ));
}

#[test]
fn test_width_falls_back_to_active_sections() {
    let mut operation = create_harvest_operation(&[]);
    operation.device_element_uses.truncate(1);

    let mut catalog = Catalog::default();
    for row in 0..2 {
        let (status, _, _) = row_channel_ids(row);
        let configuration_id = row as ReferenceId + 1;
        operation.device_element_uses.push(DeviceElementUse::new(
            levels::SECTION,
            configuration_id,
            vec![Channel::new(status, RepresentationCode::RecordingStatus)],
        ));
        catalog.section_configurations.push(SectionConfiguration {
            id: configuration_id,
            section_width_inches: 180.0,
        });
    }

    let (status_a, _, _) = row_channel_ids(0);
    let (status_b, _, _) = row_channel_ids(1);
    operation.spatial_records = vec![
        SpatialRecord::new(timestamp(0))
            .with_value(DISTANCE, MeterValue::numeric(100.0))
            .with_value(WET_MASS, MeterValue::numeric(100.0))
            .with_value(MOISTURE, MeterValue::numeric(15.0))
            .with_value(DRY_VOLUME, MeterValue::numeric(1.5))
            .with_value(status_a, MeterValue::enumerated("On"))
            .with_value(status_b, MeterValue::enumerated("Off")),
    ];

    let summary = run(&operation, &catalog).unwrap();

    assert_eq!(summary.width_source, WidthSource::Sections);
    // Only one 15 ft section is on
    assert_close(summary.total_area, 100.0 * 15.0 / 43_560.0);
}

#[test]
fn test_no_width_source_fails() {
    let mut operation = create_harvest_operation(&[(10.0, 30.0, 100.0, 15.0, 1.5)]);
    operation.device_element_uses.truncate(1);

    let error = run(&operation, &Catalog::default()).unwrap_err();

    assert!(matches!(
        error,
        Error::ChannelNotFound {
            code: RepresentationCode::EquipmentWidth,
            ..
        }
    ));
}
