//! Catalog types - what the buyer wants and what sellers carry
//!
//! Buyer constraints and seller inventory share a `ProductRef` facet so the
//! engine can match on canonical product identity first and fall back to
//! exact item names. There is deliberately no fuzzy matching anywhere in
//! this model: selling the wrong SKU is worse than making no match.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Optional canonical product identity shared by buyer requests and
/// inventory rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Canonical catalog id, if the item was picked from a catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Variant discriminator (e.g. color, edition)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Numeric size component (e.g. 13.0 for a 13-inch laptop)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_value: Option<f64>,
    /// Size unit (e.g. "inch", "kg")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_unit: Option<String>,
}

impl ProductRef {
    /// A reference with no identity facets set (matches by name only)
    pub fn unspecified() -> Self {
        Self::default()
    }
}

/// Buyer's constraints for a single item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerConstraints {
    pub item_id: String,
    pub item_name: String,
    #[serde(default)]
    pub product: ProductRef,
    pub quantity_needed: u32,
    pub min_price_per_unit: f64,
    pub max_price_per_unit: f64,
}

impl BuyerConstraints {
    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.quantity_needed == 0 {
            return Err(DomainError::InvalidConstraints {
                reason: "quantity_needed must be greater than zero".to_string(),
            });
        }
        if self.min_price_per_unit < 0.0 {
            return Err(DomainError::InvalidConstraints {
                reason: "min_price_per_unit must not be negative".to_string(),
            });
        }
        if self.max_price_per_unit <= self.min_price_per_unit {
            return Err(DomainError::InvalidConstraints {
                reason: format!(
                    "max_price_per_unit {:.2} must exceed min_price_per_unit {:.2}",
                    self.max_price_per_unit, self.min_price_per_unit
                ),
            });
        }
        Ok(())
    }
}

/// Seller's inventory row with pricing bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: String,
    pub item_name: String,
    #[serde(default)]
    pub product: ProductRef,
    /// What the item cost the seller
    pub cost_price: f64,
    /// List price the seller opens with
    pub selling_price: f64,
    /// Floor below which the seller never goes
    pub least_price: f64,
    pub quantity_available: u32,
}

impl InventoryItem {
    /// Check `cost_price < least_price < selling_price`
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.cost_price < self.least_price && self.least_price < self.selling_price) {
            return Err(DomainError::InvalidInventory {
                item: self.item_name.clone(),
                reason: format!(
                    "expected cost {:.2} < least {:.2} < selling {:.2}",
                    self.cost_price, self.least_price, self.selling_price
                ),
            });
        }
        Ok(())
    }
}
