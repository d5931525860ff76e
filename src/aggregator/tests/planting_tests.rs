//! Tests for planting aggregation

use super::*;
use crate::aggregator::PlantingAggregator;
use crate::config::AggregatorConfig;
use crate::error::Error;
use crate::summary::PlantingSummary;

/// Distance giving exactly one acre for a 30 inch row
const ACRE_DISTANCE_30IN: f64 = 17_424.0;

fn run(operation: &OperationData, catalog: &Catalog) -> crate::Result<PlantingSummary> {
    let config = AggregatorConfig::default();
    PlantingAggregator::new(operation, catalog, &config).run()
}

#[test]
fn test_inactive_row_contributes_nothing() {
    let (mut operation, catalog) = create_planting_setup(&[30.0, 30.0], &[1], false);
    operation.spatial_records = (0..4)
        .map(|i| {
            planting_record(
                i,
                ACRE_DISTANCE_30IN,
                &[RowReading::on(32_000.0), RowReading::off(99_000.0)],
            )
        })
        .collect();

    let summary = run(&operation, &catalog).unwrap();

    assert_eq!(summary.products.len(), 1);
    let product = &summary.products[0];
    assert_close(product.total_area, 4.0);
    assert_close(product.total_amount, 4.0 * 32_000.0);
    assert_close(product.average_rate, 32_000.0);
}

#[test]
fn test_all_rows_off_gives_zero_area_and_zero_rate() {
    let (mut operation, catalog) = create_planting_setup(&[30.0, 30.0], &[1], false);
    operation.spatial_records = vec![planting_record(
        0,
        ACRE_DISTANCE_30IN,
        &[RowReading::off(32_000.0), RowReading::off(32_000.0)],
    )];

    let summary = run(&operation, &catalog).unwrap();

    assert_eq!(summary.products[0].total_area, 0.0);
    assert_eq!(summary.products[0].total_amount, 0.0);
    assert_eq!(summary.products[0].average_rate, 0.0);
}

#[test]
fn test_product_index_splits_area_evenly() {
    let (mut operation, catalog) = create_planting_setup(&[30.0], &[1, 2], true);
    operation.spatial_records = [1, 2, 1, 2]
        .iter()
        .enumerate()
        .map(|(i, &product)| {
            planting_record(
                i,
                ACRE_DISTANCE_30IN,
                &[RowReading::on(30_000.0).planting(product)],
            )
        })
        .collect();

    let summary = run(&operation, &catalog).unwrap();

    let total = summary.total_area();
    assert_close(total, 4.0);
    for product in &summary.products {
        assert_close(product.total_area, total / 2.0);
        assert_close(product.total_amount, 60_000.0);
    }
    assert_eq!(summary.products[0].description.as_deref(), Some("Hybrid 1"));
    assert_eq!(summary.products[1].product_id, 2);
}

#[test]
fn test_rows_without_product_index_value_use_default_product() {
    let (mut operation, catalog) = create_planting_setup(&[30.0, 30.0], &[7, 8], true);
    operation.spatial_records = vec![planting_record(
        0,
        ACRE_DISTANCE_30IN,
        &[RowReading::on(30_000.0), RowReading::on(30_000.0).planting(8)],
    )];

    let summary = run(&operation, &catalog).unwrap();

    assert_close(summary.products[0].total_area, 1.0);
    assert_close(summary.products[1].total_area, 1.0);
}

#[test]
fn test_undeclared_product_index_is_data_integrity_error() {
    let (mut operation, catalog) = create_planting_setup(&[30.0], &[1, 2], true);
    operation.spatial_records = vec![planting_record(
        0,
        ACRE_DISTANCE_30IN,
        &[RowReading::on(30_000.0).planting(3)],
    )];

    let error = run(&operation, &catalog).unwrap_err();

    assert!(matches!(error, Error::UnknownProduct { product_id: 3 }));
    assert!(error.is_data_integrity());
}

#[test]
fn test_row_without_rate_value_accumulates_area_only() {
    let (mut operation, catalog) = create_planting_setup(&[30.0], &[1], false);
    let reading = RowReading {
        status: "On",
        rate: None,
        product: None,
    };
    operation.spatial_records = vec![planting_record(0, ACRE_DISTANCE_30IN, &[reading])];

    let summary = run(&operation, &catalog).unwrap();

    assert_close(summary.products[0].total_area, 1.0);
    assert_eq!(summary.products[0].total_amount, 0.0);
}

#[test]
fn test_record_without_distance_is_skipped() {
    let (mut operation, catalog) = create_planting_setup(&[30.0], &[1], false);
    let mut silent = planting_record(1, 0.0, &[RowReading::on(30_000.0)]);
    silent.values.remove(&DISTANCE);
    operation.spatial_records = vec![
        planting_record(0, ACRE_DISTANCE_30IN, &[RowReading::on(30_000.0)]),
        silent,
    ];

    let summary = run(&operation, &catalog).unwrap();

    assert_close(summary.products[0].total_area, 1.0);
    assert_eq!(summary.records.processed, 2);
    assert_eq!(summary.records.skipped, 1);
}

#[test]
fn test_rate_units_come_from_row_rate_channel() {
    let (operation, catalog) = create_planting_setup(&[30.0], &[1], false);

    let summary = run(&operation, &catalog).unwrap();

    assert_eq!(summary.rate_units.as_deref(), Some("seeds/ac"));
}

#[test]
fn test_missing_row_configuration_fails() {
    let (operation, mut catalog) = create_planting_setup(&[30.0, 30.0], &[1], false);
    catalog.section_configurations.retain(|config| config.id != 2);

    let error = run(&operation, &catalog).unwrap_err();

    assert!(matches!(
        error,
        Error::ConfigurationMissing {
            configuration_id: 2
        }
    ));
}

#[test]
fn test_missing_distance_channel_fails() {
    let (mut operation, catalog) = create_planting_setup(&[30.0], &[1], false);
    operation
        .device_element_uses
        .retain(|deu| deu.depth != levels::MACHINE);

    let error = run(&operation, &catalog).unwrap_err();

    assert!(matches!(
        error,
        Error::ChannelNotFound {
            level: levels::MACHINE,
            code: RepresentationCode::DistanceTraveled
        }
    ));
}

#[test]
fn test_operation_without_products_fails() {
    let (operation, catalog) = create_planting_setup(&[30.0], &[], false);

    let error = run(&operation, &catalog).unwrap_err();

    assert!(matches!(error, Error::NoProducts { operation_id: 20 }));
}
