//! Per-product area and amount accumulation.

use crate::error::{Error, Result};
use crate::models::ProductId;
use std::collections::HashMap;

/// Accumulated totals for one product
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerEntry {
    /// Acres
    pub total_area: f64,
    pub total_amount: f64,
}

impl LedgerEntry {
    /// Amount per acre; zero when no area was covered
    pub fn average_rate(&self) -> f64 {
        if self.total_area == 0.0 {
            return 0.0;
        }
        self.total_amount / self.total_area
    }
}

/// Product id to accumulated totals, seeded before a pass begins
///
/// Entries keep the operation's declaration order; the first seeded id is
/// the default product.
#[derive(Debug, Clone, Default)]
pub struct ProductLedger {
    entries: Vec<(ProductId, LedgerEntry)>,
    index: HashMap<ProductId, usize>,
}

impl ProductLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger with zeroed entries for every declared product
    pub fn seeded(product_ids: &[ProductId]) -> Self {
        let mut ledger = Self::new();
        ledger.seed(product_ids);
        ledger
    }

    /// Add zeroed entries for `product_ids`; already seeded ids are kept
    pub fn seed(&mut self, product_ids: &[ProductId]) {
        for &product_id in product_ids {
            if !self.index.contains_key(&product_id) {
                self.index.insert(product_id, self.entries.len());
                self.entries.push((product_id, LedgerEntry::default()));
            }
        }
    }

    /// First seeded product
    pub fn default_product(&self) -> Option<ProductId> {
        self.entries.first().map(|(product_id, _)| *product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.index.contains_key(&product_id)
    }

    /// Add area and amount to a seeded product
    pub fn accumulate(&mut self, product_id: ProductId, area: f64, amount: f64) -> Result<()> {
        let entry = self.entry_mut(product_id)?;
        entry.total_area += area;
        entry.total_amount += amount;
        Ok(())
    }

    pub fn add_area(&mut self, product_id: ProductId, area: f64) -> Result<()> {
        self.entry_mut(product_id)?.total_area += area;
        Ok(())
    }

    pub fn add_amount(&mut self, product_id: ProductId, amount: f64) -> Result<()> {
        self.entry_mut(product_id)?.total_amount += amount;
        Ok(())
    }

    pub fn get(&self, product_id: ProductId) -> Option<&LedgerEntry> {
        self.index
            .get(&product_id)
            .map(|&position| &self.entries[position].1)
    }

    /// Average rate for a product, zero when it covered no area
    pub fn average_rate(&self, product_id: ProductId) -> Result<f64> {
        self.get(product_id)
            .map(LedgerEntry::average_rate)
            .ok_or(Error::UnknownProduct { product_id })
    }

    /// Entries in seeding order
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, &LedgerEntry)> {
        self.entries.iter().map(|(product_id, entry)| (*product_id, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Result<&mut LedgerEntry> {
        let position = *self
            .index
            .get(&product_id)
            .ok_or(Error::UnknownProduct { product_id })?;
        Ok(&mut self.entries[position].1)
    }
}
