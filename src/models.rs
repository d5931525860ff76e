//! Core data structures for logged machine operations.
//!
//! Mirrors what an import layer hands over once a field-log archive has
//! been read: a catalog of reference entities plus logged operations,
//! each with its device element uses, channels and spatial records.
//! Everything deserialises from JSON so the import layer can be swapped
//! without touching the aggregation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Catalog reference identifier
pub type ReferenceId = i32;

/// Product reference identifier
pub type ProductId = ReferenceId;

// =============================================================================
// Representation Codes
// =============================================================================

/// Semantic code identifying what a channel measures
///
/// Known codes are closed variants so lookups cannot be misspelled; codes
/// the engine never asks for are carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RepresentationCode {
    DistanceTraveled,
    HarvestMoisture,
    YieldWetMass,
    YieldVolume,
    EquipmentWidth,
    RecordingStatus,
    SeedRateMassActual,
    SeedRateSeedsActual,
    ProductIndex,
    DeltaArea,
    AppRateVolumeActual,
    AppRateMassActual,
    Other(String),
}

impl RepresentationCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &str {
        match self {
            Self::DistanceTraveled => "vrDistanceTraveled",
            Self::HarvestMoisture => "vrHarvestMoisture",
            Self::YieldWetMass => "vrYieldWetMass",
            Self::YieldVolume => "vrYieldVolume",
            Self::EquipmentWidth => "vrEquipmentWidth",
            Self::RecordingStatus => "dtRecordingStatus",
            Self::SeedRateMassActual => "vrSeedRateMassActual",
            Self::SeedRateSeedsActual => "vrSeedRateSeedsActual",
            Self::ProductIndex => "vrProductIndex",
            Self::DeltaArea => "vrDeltaArea",
            Self::AppRateVolumeActual => "vrAppRateVolumeActual",
            Self::AppRateMassActual => "vrAppRateMassActual",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for RepresentationCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "vrDistanceTraveled" => Self::DistanceTraveled,
            "vrHarvestMoisture" => Self::HarvestMoisture,
            "vrYieldWetMass" => Self::YieldWetMass,
            "vrYieldVolume" => Self::YieldVolume,
            "vrEquipmentWidth" => Self::EquipmentWidth,
            "dtRecordingStatus" => Self::RecordingStatus,
            "vrSeedRateMassActual" => Self::SeedRateMassActual,
            "vrSeedRateSeedsActual" => Self::SeedRateSeedsActual,
            "vrProductIndex" => Self::ProductIndex,
            "vrDeltaArea" => Self::DeltaArea,
            "vrAppRateVolumeActual" => Self::AppRateVolumeActual,
            "vrAppRateMassActual" => Self::AppRateMassActual,
            _ => Self::Other(code),
        }
    }
}

impl From<RepresentationCode> for String {
    fn from(code: RepresentationCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for RepresentationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Units
// =============================================================================

/// Physical dimension of a unit of measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitDimension {
    Volume,
    Mass,
    Area,
    Length,
    Count,
    #[default]
    #[serde(other)]
    Other,
}

/// Unit of measure attached to channels and quantities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitOfMeasure {
    /// Unit code as logged (e.g. "gal/ac", "lb", "seeds/ac")
    pub code: String,

    #[serde(default)]
    pub dimension: UnitDimension,
}

impl UnitOfMeasure {
    pub fn new(code: impl Into<String>, dimension: UnitDimension) -> Self {
        Self {
            code: code.into(),
            dimension,
        }
    }
}

/// A numeric value with its unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: UnitOfMeasure,
}

// =============================================================================
// Channels and Device Element Uses
// =============================================================================

/// A sensor data source (working data) on one device element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Identifier used by spatial records to key this channel's values
    pub id: ReferenceId,

    pub code: RepresentationCode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitOfMeasure>,
}

impl Channel {
    pub fn new(id: ReferenceId, code: RepresentationCode) -> Self {
        Self {
            id,
            code,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: UnitOfMeasure) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Unit code declared on the channel, if any
    pub fn unit_code(&self) -> Option<&str> {
        self.unit.as_ref().map(|unit| unit.code.as_str())
    }
}

/// Channels grouped at one level of the equipment hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceElementUse {
    /// 0 = machine, 1 = implement/head, 2 = row/section
    pub depth: u8,

    /// Catalog reference to the element's configuration
    pub device_configuration_id: ReferenceId,

    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl DeviceElementUse {
    pub fn new(depth: u8, device_configuration_id: ReferenceId, channels: Vec<Channel>) -> Self {
        Self {
            depth,
            device_configuration_id,
            channels,
        }
    }
}

// =============================================================================
// Spatial Records
// =============================================================================

/// Value observed for one channel in one spatial record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeterValue {
    Numeric {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Enumerated {
        value: String,
    },
}

impl MeterValue {
    pub fn numeric(value: f64) -> Self {
        Self::Numeric { value, unit: None }
    }

    pub fn enumerated(value: impl Into<String>) -> Self {
        Self::Enumerated {
            value: value.into(),
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Numeric { value, .. } => Some(*value),
            Self::Enumerated { .. } => None,
        }
    }

    pub fn as_enumerated(&self) -> Option<&str> {
        match self {
            Self::Enumerated { value } => Some(value),
            Self::Numeric { .. } => None,
        }
    }

    /// Unit carried on the value itself (numeric values only)
    pub fn unit_code(&self) -> Option<&str> {
        match self {
            Self::Numeric { unit, .. } => unit.as_deref(),
            Self::Enumerated { .. } => None,
        }
    }
}

/// Geographic position of a spatial record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

/// One timestamped, positioned observation across many channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialRecord {
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// Observed values keyed by channel id
    #[serde(default)]
    pub values: HashMap<ReferenceId, MeterValue>,
}

impl SpatialRecord {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            position: None,
            values: HashMap::new(),
        }
    }

    /// Attach a value for a channel
    pub fn with_value(mut self, channel_id: ReferenceId, value: MeterValue) -> Self {
        self.values.insert(channel_id, value);
        self
    }

    /// Value observed for `channel`, or `None` if it produced nothing here
    pub fn value_of(&self, channel: &Channel) -> Option<&MeterValue> {
        self.values.get(&channel.id)
    }

    pub fn numeric_value(&self, channel: &Channel) -> Option<f64> {
        self.value_of(channel).and_then(MeterValue::as_numeric)
    }

    pub fn enumerated_value(&self, channel: &Channel) -> Option<&str> {
        self.value_of(channel).and_then(MeterValue::as_enumerated)
    }
}

// =============================================================================
// Catalog Entities
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grower {
    pub id: ReferenceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub id: ReferenceId,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: ReferenceId,
    pub description: String,
}

/// Static physical configuration of one row unit or boom section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfiguration {
    pub id: ReferenceId,

    /// Section width, always logged in inches
    pub section_width_inches: f64,
}

/// One ingredient of a mix product with its fixed per-unit quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductComponent {
    pub ingredient_id: ProductId,
    pub quantity: Quantity,
}

/// Seed variety, chemical, fertilizer or tank mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub description: String,

    #[serde(default)]
    pub components: Vec<ProductComponent>,
}

impl Product {
    /// A product with components is a mixture
    pub fn is_mix(&self) -> bool {
        !self.components.is_empty()
    }
}

/// Reference entities resolvable by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub growers: Vec<Grower>,
    #[serde(default)]
    pub farms: Vec<Farm>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub section_configurations: Vec<SectionConfiguration>,
}

impl Catalog {
    pub fn grower(&self, id: ReferenceId) -> Option<&Grower> {
        self.growers.iter().find(|grower| grower.id == id)
    }

    pub fn farm(&self, id: ReferenceId) -> Option<&Farm> {
        self.farms.iter().find(|farm| farm.id == id)
    }

    pub fn field(&self, id: ReferenceId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn section_configuration(&self, id: ReferenceId) -> Option<&SectionConfiguration> {
        self.section_configurations
            .iter()
            .find(|config| config.id == id)
    }
}

// =============================================================================
// Logged Operations
// =============================================================================

/// Kind of field operation a machine performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Harvesting,
    SowingAndPlanting,
    CropProtection,
    Fertilizing,
    Tillage,
    Irrigation,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One machine operation instance with its full record sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationData {
    pub id: ReferenceId,
    pub operation_type: OperationType,

    /// Declared products; the first entry is the default/primary product
    #[serde(default)]
    pub product_ids: Vec<ProductId>,

    #[serde(default)]
    pub device_element_uses: Vec<DeviceElementUse>,

    /// Records in emission order
    #[serde(default)]
    pub spatial_records: Vec<SpatialRecord>,
}

impl OperationData {
    pub fn new(id: ReferenceId, operation_type: OperationType) -> Self {
        Self {
            id,
            operation_type,
            product_ids: Vec::new(),
            device_element_uses: Vec::new(),
            spatial_records: Vec::new(),
        }
    }

    /// Device element uses logged at `depth`, in upstream order
    pub fn device_element_uses(&self, depth: u8) -> impl Iterator<Item = &DeviceElementUse> {
        self.device_element_uses
            .iter()
            .filter(move |deu| deu.depth == depth)
    }

    /// Spatial records in emission order; each call restarts the sequence
    pub fn spatial_records(&self) -> impl Iterator<Item = &SpatialRecord> {
        self.spatial_records.iter()
    }

    /// First declared product, if any
    pub fn primary_product_id(&self) -> Option<ProductId> {
        self.product_ids.first().copied()
    }
}

/// A logged-data block: one field visit, possibly several operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedData {
    pub id: ReferenceId,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub grower_id: Option<ReferenceId>,
    #[serde(default)]
    pub farm_id: Option<ReferenceId>,
    #[serde(default)]
    pub field_id: Option<ReferenceId>,

    #[serde(default)]
    pub operations: Vec<OperationData>,
}

/// Everything one import produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub catalog: Catalog,

    #[serde(default)]
    pub logged_data: Vec<LoggedData>,
}
