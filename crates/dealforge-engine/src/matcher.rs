//! Inventory matching - which of a seller's items is the buyer asking for?
//!
//! Matching is strict by design: a product-identity match requires variant
//! and size to agree, and the name fallback is exact (case-insensitive,
//! trimmed) equality, again gated by variant and size. No fuzzy matching -
//! cross-selling the wrong SKU is a worse failure than finding no match.

use dealforge_types::{BuyerConstraints, InventoryItem, Seller};

fn eq_trimmed_ci(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Variant gate: buyer unset matches anything; buyer set requires the
/// seller to carry an equal variant
pub fn variant_matches(buyer: Option<&str>, seller: Option<&str>) -> bool {
    match (buyer, seller) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(b), Some(s)) => eq_trimmed_ci(b, s),
    }
}

/// Size gate: buyer fully unset matches anything; otherwise both numeric
/// value and unit must match exactly
pub fn size_matches(
    buyer_value: Option<f64>,
    buyer_unit: Option<&str>,
    seller_value: Option<f64>,
    seller_unit: Option<&str>,
) -> bool {
    if buyer_value.is_none() && buyer_unit.is_none() {
        return true;
    }
    let (Some(sv), Some(su)) = (seller_value, seller_unit) else {
        return false;
    };
    match (buyer_value, buyer_unit) {
        (Some(bv), Some(bu)) => bv == sv && eq_trimmed_ci(bu, su),
        // Buyer set only half of the size; nothing can match exactly
        _ => false,
    }
}

fn item_matches(item: &InventoryItem, constraints: &BuyerConstraints) -> bool {
    let facets_match = variant_matches(
        constraints.product.variant.as_deref(),
        item.product.variant.as_deref(),
    ) && size_matches(
        constraints.product.size_value,
        constraints.product.size_unit.as_deref(),
        item.product.size_value,
        item.product.size_unit.as_deref(),
    );

    if let (Some(buyer_pid), Some(item_pid)) = (
        constraints.product.product_id.as_deref(),
        item.product.product_id.as_deref(),
    ) {
        // Both carry catalog identity: identity decides, the name never does
        return buyer_pid == item_pid && facets_match;
    }

    eq_trimmed_ci(&item.item_name, &constraints.item_name) && facets_match
}

/// Find the inventory item that strictly matches the buyer's request
pub fn match_inventory<'a>(
    seller: &'a Seller,
    constraints: &BuyerConstraints,
) -> Option<&'a InventoryItem> {
    seller
        .inventory
        .iter()
        .find(|item| item_matches(item, constraints))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealforge_types::{
        ProductRef, SellerId, SellerPriority, SellerProfile, SpeakingStyle, SellerStrategy,
    };

    fn item(name: &str, product: ProductRef) -> InventoryItem {
        InventoryItem {
            item_id: format!("inv_{}", name.to_lowercase()),
            item_name: name.to_string(),
            product,
            cost_price: 25.0,
            selling_price: 60.0,
            least_price: 35.0,
            quantity_available: 5,
        }
    }

    fn seller(inventory: Vec<InventoryItem>) -> Seller {
        Seller {
            id: SellerId::new("seller_1"),
            name: "TechStore".to_string(),
            profile: SellerProfile {
                priority: SellerPriority::MaximizeProfit,
                speaking_style: SpeakingStyle::Professional,
                strategy: SellerStrategy::FirmPricing,
            },
            inventory,
        }
    }

    fn constraints(name: &str, product: ProductRef) -> BuyerConstraints {
        BuyerConstraints {
            item_id: "item_1".to_string(),
            item_name: name.to_string(),
            product,
            quantity_needed: 2,
            min_price_per_unit: 30.0,
            max_price_per_unit: 50.0,
        }
    }

    fn variant_size(variant: &str, value: f64, unit: &str) -> ProductRef {
        ProductRef {
            product_id: Some("prod_1".to_string()),
            variant: Some(variant.to_string()),
            size_value: Some(value),
            size_unit: Some(unit.to_string()),
        }
    }

    #[test]
    fn identical_identity_triple_matches() {
        let s = seller(vec![item("Laptop", variant_size("Silver", 13.0, "inch"))]);
        let c = constraints("Laptop", variant_size("Silver", 13.0, "inch"));
        assert!(match_inventory(&s, &c).is_some());
    }

    #[test]
    fn variant_mismatch_rejects_even_with_matching_name() {
        let s = seller(vec![item("Laptop", variant_size("Silver", 13.0, "inch"))]);
        let c = constraints("Laptop", variant_size("Space Gray", 13.0, "inch"));
        assert!(match_inventory(&s, &c).is_none());
    }

    #[test]
    fn size_mismatch_rejects_even_with_matching_name() {
        let s = seller(vec![item("Laptop", variant_size("Silver", 13.0, "inch"))]);
        let c = constraints("Laptop", variant_size("Silver", 15.0, "inch"));
        assert!(match_inventory(&s, &c).is_none());
    }

    #[test]
    fn name_fallback_is_case_insensitive_and_trimmed() {
        let s = seller(vec![item("Laptop", ProductRef::unspecified())]);
        let c = constraints("  laptop ", ProductRef::unspecified());
        assert!(match_inventory(&s, &c).is_some());
    }

    #[test]
    fn no_partial_name_matching() {
        let s = seller(vec![item("Laptop Pro", ProductRef::unspecified())]);
        let c = constraints("Laptop", ProductRef::unspecified());
        assert!(match_inventory(&s, &c).is_none());
    }

    #[test]
    fn buyer_variant_unset_is_wildcard() {
        let s = seller(vec![item(
            "Laptop",
            ProductRef {
                product_id: None,
                variant: Some("Silver".to_string()),
                size_value: None,
                size_unit: None,
            },
        )]);
        let c = constraints("Laptop", ProductRef::unspecified());
        assert!(match_inventory(&s, &c).is_some());
    }

    #[test]
    fn buyer_variant_set_seller_unset_rejects() {
        let s = seller(vec![item("Laptop", ProductRef::unspecified())]);
        let c = constraints(
            "Laptop",
            ProductRef {
                product_id: None,
                variant: Some("Silver".to_string()),
                size_value: None,
                size_unit: None,
            },
        );
        assert!(match_inventory(&s, &c).is_none());
    }

    #[test]
    fn product_identity_beats_differing_name() {
        // Same catalog id, different display names: identity wins
        let s = seller(vec![item("Laptop 13\"", variant_size("Silver", 13.0, "inch"))]);
        let c = constraints("Laptop", variant_size("Silver", 13.0, "inch"));
        assert!(match_inventory(&s, &c).is_some());
    }

    #[test]
    fn product_identity_mismatch_skips_name_fallback() {
        let mut inv = item("Laptop", variant_size("Silver", 13.0, "inch"));
        inv.product.product_id = Some("prod_other".to_string());
        let s = seller(vec![inv]);
        let c = constraints("Laptop", variant_size("Silver", 13.0, "inch"));
        // Names agree but catalog ids disagree: no match
        assert!(match_inventory(&s, &c).is_none());
    }

    #[test]
    fn size_unit_comparison_is_case_insensitive() {
        assert!(size_matches(Some(13.0), Some("Inch "), Some(13.0), Some("inch")));
        assert!(!size_matches(Some(13.0), Some("inch"), Some(13.0), Some("cm")));
        assert!(!size_matches(Some(13.0), Some("inch"), None, None));
        assert!(size_matches(None, None, Some(13.0), Some("inch")));
    }
}
