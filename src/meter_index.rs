//! Channel ("meter") resolution by semantic code.
//!
//! Equipment logs expose many device-specific channels; the aggregators
//! only care about a handful of them, identified by representation code
//! at a given level of the equipment hierarchy.

use crate::error::{Error, Result};
use crate::models::{Channel, DeviceElementUse, OperationData, RepresentationCode};
use tracing::debug;

/// Index over the device element uses an aggregator may resolve from
///
/// Resolution is a pure scan and can be repeated, but callers resolve once
/// per operation and hold on to the returned channel.
#[derive(Debug, Clone)]
pub struct MeterIndex<'a> {
    uses: Vec<&'a DeviceElementUse>,
}

impl<'a> MeterIndex<'a> {
    /// Index every device element use of an operation
    pub fn for_operation(operation: &'a OperationData) -> Self {
        Self {
            uses: operation.device_element_uses.iter().collect(),
        }
    }

    /// Index a single device element use (one row or section)
    pub fn for_element(element: &'a DeviceElementUse) -> Self {
        Self {
            uses: vec![element],
        }
    }

    /// First channel at `level` whose code matches.
    ///
    /// Uses are scanned in upstream order, then channels within each use.
    /// When the same code appears more than once at a level the first one
    /// wins; later duplicates are only logged.
    pub fn resolve(&self, level: u8, code: &RepresentationCode) -> Option<&'a Channel> {
        let mut matches = self
            .uses
            .iter()
            .copied()
            .filter(|deu| deu.depth == level)
            .flat_map(|deu| deu.channels.iter())
            .filter(|channel| &channel.code == code);

        let first = matches.next()?;
        let duplicates = matches.count();
        if duplicates > 0 {
            debug!(
                "{} duplicate '{}' channel(s) at level {}; using channel {}",
                duplicates, code, level, first.id
            );
        }
        Some(first)
    }

    /// Like [`resolve`](Self::resolve) but a missing channel is an error
    pub fn require(&self, level: u8, code: &RepresentationCode) -> Result<&'a Channel> {
        self.resolve(level, code)
            .ok_or_else(|| Error::channel_not_found(level, code.clone()))
    }

    /// First code in `codes` (priority order) that resolves at `level`
    pub fn resolve_any(&self, level: u8, codes: &[RepresentationCode]) -> Option<&'a Channel> {
        codes.iter().find_map(|code| self.resolve(level, code))
    }
}
