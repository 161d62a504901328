//! Standing offers - each seller's latest offer on the table
//!
//! Later messages overwrite earlier ones, so a seller that counter-offered
//! is judged on the counter. Offers from earlier rounds stay standing: a
//! seller who made a good offer and then went quiet can still win.

use std::collections::HashMap;

use dealforge_types::{BuyerConstraints, Message, Offer, Seller, SellerId, SenderType};

use crate::matcher::match_inventory;

/// A seller's latest offer, with the seller's cost for margin math
#[derive(Debug, Clone, PartialEq)]
pub struct StandingOffer {
    pub seller_id: SellerId,
    pub seller_name: String,
    pub offer: Offer,
    pub seller_cost_per_unit: f64,
}

/// Extract the latest offer per seller from the conversation, in seller
/// list order
pub fn latest_offers_per_seller(
    history: &[Message],
    sellers: &[Seller],
    constraints: &BuyerConstraints,
) -> Vec<StandingOffer> {
    let mut latest: HashMap<&str, (&Message, &Offer)> = HashMap::new();
    for msg in history {
        if msg.sender_type != SenderType::Seller {
            continue;
        }
        if let Some(ref offer) = msg.offer {
            latest.insert(msg.sender_id.as_str(), (msg, offer));
        }
    }

    sellers
        .iter()
        .filter_map(|seller| {
            let (msg, offer) = latest.get(seller.id.as_str())?;
            let cost = match_inventory(seller, constraints)
                .map(|item| item.cost_price)
                .unwrap_or(0.0);
            Some(StandingOffer {
                seller_id: seller.id.clone(),
                seller_name: msg.sender_name.clone(),
                offer: (*offer).clone(),
                seller_cost_per_unit: cost,
            })
        })
        .collect()
}
