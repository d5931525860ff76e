//! Error handling for field log aggregation.
//!
//! Separates configuration problems in the logged equipment (a channel or
//! section configuration that cannot be found) from data-integrity
//! failures where the import layer and the aggregation engine disagree
//! about the dataset.

use crate::models::{OperationType, ProductId, ReferenceId, RepresentationCode};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Channel '{code}' not found at device level {level}")]
    ChannelNotFound {
        level: u8,
        code: RepresentationCode,
    },

    #[error("Section configuration {configuration_id} not found in catalog")]
    ConfigurationMissing { configuration_id: ReferenceId },

    #[error("Record references product {product_id} which the operation never declared")]
    UnknownProduct { product_id: ProductId },

    #[error("Operation {operation_id} declares no products")]
    NoProducts { operation_id: ReferenceId },

    #[error("Undefined {quantity}: zero denominator")]
    DegenerateRate { quantity: String },

    #[error("No aggregator for operation type {operation_type:?}")]
    UnsupportedOperation { operation_type: OperationType },

    #[error("Dataset not found at path: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create a channel-not-found error
    pub fn channel_not_found(level: u8, code: RepresentationCode) -> Self {
        Self::ChannelNotFound { level, code }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a degenerate rate error
    pub fn degenerate_rate(quantity: impl Into<String>) -> Self {
        Self::DegenerateRate {
            quantity: quantity.into(),
        }
    }

    /// Whether the error means the dataset itself is inconsistent.
    ///
    /// These are never recovered at the operation boundary.
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, Self::UnknownProduct { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unknown_product_is_data_integrity() {
        assert!(Error::UnknownProduct { product_id: 7 }.is_data_integrity());
        assert!(
            !Error::channel_not_found(0, RepresentationCode::DistanceTraveled).is_data_integrity()
        );
        assert!(
            !Error::ConfigurationMissing {
                configuration_id: 3
            }
            .is_data_integrity()
        );
    }

    #[test]
    fn test_channel_not_found_message_uses_wire_code() {
        let error = Error::channel_not_found(2, RepresentationCode::RecordingStatus);
        assert_eq!(
            error.to_string(),
            "Channel 'dtRecordingStatus' not found at device level 2"
        );
    }
}
