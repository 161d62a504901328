//! Offer validation against the buyer's hard constraints
//!
//! This is the guard rail that no language-model output can bypass: an
//! offer above the buyer's stated ceiling is rejected here, before the
//! decision step ever sees it.

use dealforge_types::{BuyerConstraints, Offer};

/// Whether an offer satisfies the buyer's hard constraints
pub fn is_valid_offer(offer: &Offer, constraints: &BuyerConstraints) -> bool {
    if offer.price_per_unit > constraints.max_price_per_unit {
        tracing::warn!(
            price = offer.price_per_unit,
            ceiling = constraints.max_price_per_unit,
            "rejecting offer above the buyer's price ceiling"
        );
        return false;
    }
    offer.price_per_unit >= constraints.min_price_per_unit
        && offer.quantity <= constraints.quantity_needed
}
