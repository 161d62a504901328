//! Message routing - which sellers respond this round
//!
//! If the buyer mentioned sellers, only those respond (intersected with the
//! active seller set). No mentions means everyone responds. An empty result
//! is only possible when the room has no sellers at all, which the caller
//! treats as fatal.

use dealforge_types::{Seller, SellerId};

/// Select the sellers that must respond to the buyer's last message
pub fn route(mentioned: &[SellerId], all_sellers: &[Seller]) -> Vec<Seller> {
    if mentioned.is_empty() {
        tracing::debug!(count = all_sellers.len(), "no mentions, all sellers respond");
        return all_sellers.to_vec();
    }

    let responding: Vec<Seller> = all_sellers
        .iter()
        .filter(|s| mentioned.contains(&s.id))
        .cloned()
        .collect();
    tracing::debug!(
        mentioned = mentioned.len(),
        responding = responding.len(),
        "routing buyer message to mentioned sellers"
    );
    responding
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealforge_types::{SellerPriority, SellerProfile, SpeakingStyle, SellerStrategy};

    fn seller(id: &str) -> Seller {
        Seller {
            id: SellerId::new(id),
            name: id.to_string(),
            profile: SellerProfile {
                priority: SellerPriority::MaximizeProfit,
                speaking_style: SpeakingStyle::Professional,
                strategy: SellerStrategy::FirmPricing,
            },
            inventory: vec![],
        }
    }

    #[test]
    fn mentions_select_only_those_sellers() {
        let sellers = vec![seller("a"), seller("b"), seller("c")];
        let routed = route(&[SellerId::new("b")], &sellers);
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].id, SellerId::new("b"));
    }

    #[test]
    fn no_mentions_selects_everyone() {
        let sellers = vec![seller("a"), seller("b")];
        assert_eq!(route(&[], &sellers).len(), 2);
    }

    #[test]
    fn unknown_mentions_intersect_to_empty() {
        let sellers = vec![seller("a")];
        assert!(route(&[SellerId::new("ghost")], &sellers).is_empty());
    }

    #[test]
    fn no_sellers_yields_empty() {
        assert!(route(&[], &[]).is_empty());
    }
}
