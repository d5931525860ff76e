//! Tank-mix apportionment.
//!
//! A mix product lists each ingredient with a fixed quantity per unit of
//! mix. Given how much mix the machine actually applied, each ingredient's
//! share follows from those fixed ratios.

use crate::models::{Catalog, Product, ProductId, UnitDimension};
use crate::summary::Rate;
use serde::Serialize;
use tracing::warn;

/// Actual applied amount and rate for one mix ingredient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentApportionment {
    pub ingredient_id: ProductId,
    pub description: Option<String>,
    /// Unit code of the component quantity (e.g. "gal", "lb")
    pub unit_code: String,
    pub dimension: UnitDimension,
    /// Fixed quantity per unit of mix
    pub quantity_per_unit: f64,
    /// Total ingredient applied over the operation
    pub amount: Rate,
    /// Ingredient applied per acre
    pub rate: Rate,
}

/// Breakdown of a mix product over one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixApportionment {
    /// Sum of volume-dimension component quantities
    pub volume_rate: f64,
    /// Sum of mass-dimension component quantities
    pub mass_rate: f64,
    /// Dimension the mix is rated by (volume for liquid, mass for dry)
    pub basis: UnitDimension,
    /// Units of mix applied: total amount / rate of the chosen basis
    pub total_units: Rate,
    pub components: Vec<ComponentApportionment>,
}

impl MixApportionment {
    /// Rate of the chosen basis
    pub fn mix_rate(&self) -> f64 {
        match self.basis {
            UnitDimension::Volume => self.volume_rate,
            _ => self.mass_rate,
        }
    }
}

/// Splits an applied total across a mix product's components
#[derive(Debug, Clone, Copy)]
pub struct MixApportioner<'a> {
    catalog: &'a Catalog,
}

impl<'a> MixApportioner<'a> {
    /// The catalog is only used to describe ingredients
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Apportion `total_amount` applied over `total_area` acres
    ///
    /// Liquid mixes are rated by volume; the mass total is used only when
    /// no component has a volume quantity. Zero rate or zero area make the
    /// affected values `Undefined`.
    pub fn apportion(
        &self,
        product: &Product,
        total_amount: f64,
        total_area: f64,
    ) -> MixApportionment {
        let mut volume_rate = 0.0;
        let mut mass_rate = 0.0;
        for component in &product.components {
            match component.quantity.unit.dimension {
                UnitDimension::Volume => volume_rate += component.quantity.value,
                UnitDimension::Mass => mass_rate += component.quantity.value,
                _ => {}
            }
        }

        let (basis, mix_rate) = if volume_rate != 0.0 {
            (UnitDimension::Volume, volume_rate)
        } else {
            (UnitDimension::Mass, mass_rate)
        };
        let total_units = Rate::ratio(total_amount, mix_rate);

        let components = product
            .components
            .iter()
            .map(|component| {
                let description = self
                    .catalog
                    .product(component.ingredient_id)
                    .map(|ingredient| ingredient.description.clone());
                if description.is_none() {
                    warn!(
                        "Mix {}: ingredient {} not found in catalog",
                        product.id, component.ingredient_id
                    );
                }

                let quantity = component.quantity.value;
                let amount = total_units.map(|units| units * quantity);
                let rate = match amount {
                    Rate::Defined(amount) => Rate::ratio(amount, total_area),
                    Rate::Undefined => Rate::Undefined,
                };

                ComponentApportionment {
                    ingredient_id: component.ingredient_id,
                    description,
                    unit_code: component.quantity.unit.code.clone(),
                    dimension: component.quantity.unit.dimension,
                    quantity_per_unit: quantity,
                    amount,
                    rate,
                }
            })
            .collect();

        MixApportionment {
            volume_rate,
            mass_rate,
            basis,
            total_units,
            components,
        }
    }
}
