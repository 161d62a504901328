//! Mention parsing - which sellers did the buyer address?
//!
//! The buyer is instructed to address sellers as `@SellerName`. Matching is
//! case-insensitive and longest-name-first so `@TechWorld Plus` is not also
//! counted as a mention of `TechWorld`. A literal seller id in the text
//! counts too (models sometimes echo ids back).

use dealforge_types::{Seller, SellerId};

/// Extract the sellers mentioned in a buyer message, in seller-list order
pub fn parse_mentions(text: &str, sellers: &[Seller]) -> Vec<SellerId> {
    let mut masked = text.to_lowercase();
    let mut mentioned: Vec<SellerId> = Vec::new();

    // Longest names first so overlapping names don't double-match
    let mut by_length: Vec<&Seller> = sellers.iter().collect();
    by_length.sort_by_key(|s| std::cmp::Reverse(s.name.len()));

    for seller in by_length {
        let pattern = format!("@{}", seller.name.to_lowercase());
        let mut found = false;
        while let Some(pos) = masked.find(&pattern) {
            found = true;
            // Mask the span so shorter names can't rematch it
            masked.replace_range(pos..pos + pattern.len(), &"\u{0}".repeat(pattern.len()));
        }
        if !found && masked.contains(&seller.id.as_str().to_lowercase()) {
            found = true;
        }
        if found {
            mentioned.push(seller.id.clone());
        }
    }

    // Return in the caller's seller order, not match order
    sellers
        .iter()
        .filter(|s| mentioned.contains(&s.id))
        .map(|s| s.id.clone())
        .collect()
}
