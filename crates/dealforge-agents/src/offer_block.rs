//! Offer extraction from seller replies
//!
//! Sellers are asked to append a fenced ```json block holding
//! `{"offer": {"price": 45.0, "quantity": 2}}`.
//!
//! Model output is untrusted: the block is parsed defensively, stripped
//! from the visible message, and the offer is checked against the seller's
//! own inventory bounds before anything downstream sees it.

use serde::Deserialize;

use dealforge_types::{InventoryItem, Offer};

#[derive(Deserialize)]
struct OfferEnvelope {
    offer: OfferBody,
}

#[derive(Deserialize)]
struct OfferBody {
    price: f64,
    quantity: u32,
}

/// Parse one JSON value starting at `start`, returning the envelope and the
/// byte length consumed
fn parse_envelope_at(text: &str, start: usize) -> Option<(OfferEnvelope, usize)> {
    let mut stream =
        serde_json::Deserializer::from_str(&text[start..]).into_iter::<serde_json::Value>();
    let value = stream.next()?.ok()?;
    let consumed = stream.byte_offset();
    let envelope: OfferEnvelope = serde_json::from_value(value).ok()?;
    Some((envelope, consumed))
}

/// Extract an offer from a seller reply
///
/// Returns the message with the offer block removed, plus the parsed offer
/// if one was present and well-formed. A malformed block is dropped
/// silently - the message text still stands on its own.
pub fn extract_offer(text: &str) -> (String, Option<Offer>) {
    // Fenced block first
    if let Some(fence_start) = text.find("```json") {
        let body_start = fence_start + "```json".len();
        if let Some(rel_end) = text[body_start..].find("```") {
            let body = &text[body_start..body_start + rel_end];
            let fence_end = body_start + rel_end + "```".len();
            let mut clean = String::new();
            clean.push_str(text[..fence_start].trim_end());
            clean.push_str(text[fence_end..].trim_end());
            let offer = parse_envelope_at(body.trim(), 0)
                .map(|(envelope, _)| Offer::new(envelope.offer.price, envelope.offer.quantity));
            return (clean.trim().to_string(), offer);
        }
    }

    // Bare inline object as a fallback
    if let Some(start) = text.find("{\"offer\"") {
        if let Some((envelope, consumed)) = parse_envelope_at(text, start) {
            let mut clean = String::new();
            clean.push_str(text[..start].trim_end());
            clean.push_str(text[start + consumed..].trim_end());
            return (
                clean.trim().to_string(),
                Some(Offer::new(envelope.offer.price, envelope.offer.quantity)),
            );
        }
    }

    (text.trim().to_string(), None)
}

/// Drop offers that violate the seller's own inventory bounds
///
/// Price must lie in `[least_price, selling_price]` and quantity in
/// `[1, quantity_available]`. An out-of-bounds offer means the model ignored
/// its instructions; the reply text is kept, the offer is not.
pub fn enforce_bounds(offer: Offer, item: &InventoryItem) -> Option<Offer> {
    if offer.price_per_unit < item.least_price || offer.price_per_unit > item.selling_price {
        tracing::warn!(
            price = offer.price_per_unit,
            least = item.least_price,
            selling = item.selling_price,
            item = %item.item_name,
            "dropping offer outside inventory price bounds"
        );
        return None;
    }
    if offer.quantity == 0 || offer.quantity > item.quantity_available {
        tracing::warn!(
            quantity = offer.quantity,
            available = item.quantity_available,
            item = %item.item_name,
            "dropping offer with invalid quantity"
        );
        return None;
    }
    Some(offer)
}
