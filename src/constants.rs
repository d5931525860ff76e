//! Application constants for the field log processor
//!
//! Unit conversions, equipment hierarchy levels and the enumerated
//! literals that machine telemetry uses for section status.

// =============================================================================
// Unit Conversions
// =============================================================================

/// Square feet in one acre
pub const SQUARE_FEET_PER_ACRE: f64 = 43_560.0;

/// Inches in one foot (section widths are always logged in inches)
pub const INCHES_PER_FOOT: f64 = 12.0;

// =============================================================================
// Equipment Hierarchy
// =============================================================================

/// Device element use depths as logged by the equipment
pub mod levels {
    /// Whole machine / vehicle
    pub const MACHINE: u8 = 0;

    /// Implement or header
    pub const IMPLEMENT: u8 = 1;

    /// Individual row unit or boom section
    pub const SECTION: u8 = 2;
}

// =============================================================================
// Section Status Values
// =============================================================================

/// Enumerated values reported by `dtRecordingStatus` channels
pub mod section_status {
    /// Section is recording / applying
    pub const ON: &str = "On";

    /// Section is switched off and contributes nothing
    pub const OFF: &str = "Off";
}

// =============================================================================
// Dataset Discovery
// =============================================================================

/// File extension of serialised datasets handed over by the import layer
pub const DATASET_FILE_EXTENSION: &str = "json";

/// Default log target used when `RUST_LOG` is not set
pub const LOG_TARGET: &str = "fieldlog_processor";
