//! In-memory wallet store keyed by session
//!
//! Persistence is out of scope; sessions hold their wallets in a concurrent
//! map so dispatcher tasks can read them without locking the room.

use dashmap::DashMap;

use dealforge_types::SessionId;

use crate::card::{CardReward, CardWallet, CreditCard, VendorOffer};

/// Per-session card wallets
#[derive(Debug, Default)]
pub struct WalletStore {
    wallets: DashMap<SessionId, CardWallet>,
}

impl WalletStore {
    pub fn new() -> Self {
        Self {
            wallets: DashMap::new(),
        }
    }

    /// Store a wallet for a session, replacing any existing one
    pub fn insert(&self, session_id: SessionId, wallet: CardWallet) {
        self.wallets.insert(session_id, wallet);
    }

    /// Wallet for a session; empty when none was stored
    pub fn get(&self, session_id: &SessionId) -> CardWallet {
        self.wallets
            .get(session_id)
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    pub fn remove(&self, session_id: &SessionId) -> Option<CardWallet> {
        self.wallets.remove(session_id).map(|(_, w)| w)
    }
}

/// Demo wallet with four sample cards
pub fn demo_wallet() -> CardWallet {
    CardWallet {
        cards: vec![
            CreditCard {
                id: "chase_sapphire".to_string(),
                name: "Chase Sapphire Preferred".to_string(),
                issuer: "Chase".to_string(),
                rewards: vec![
                    CardReward {
                        category: "dining".to_string(),
                        cashback_pct: 3.0,
                        description: String::new(),
                    },
                    CardReward {
                        category: "travel".to_string(),
                        cashback_pct: 5.0,
                        description: String::new(),
                    },
                    CardReward {
                        category: "online_shopping".to_string(),
                        cashback_pct: 2.0,
                        description: String::new(),
                    },
                    CardReward {
                        category: "general".to_string(),
                        cashback_pct: 1.0,
                        description: String::new(),
                    },
                ],
                vendor_offers: vec![VendorOffer {
                    vendor_keyword: "Amazon".to_string(),
                    discount_pct: 5.0,
                    max_discount: 25.0,
                    description: "5% off Amazon purchases up to $25".to_string(),
                }],
                annual_fee: 95.0,
            },
            CreditCard {
                id: "amex_blue".to_string(),
                name: "Amex Blue Cash Preferred".to_string(),
                issuer: "American Express".to_string(),
                rewards: vec![
                    CardReward {
                        category: "groceries".to_string(),
                        cashback_pct: 6.0,
                        description: String::new(),
                    },
                    CardReward {
                        category: "electronics".to_string(),
                        cashback_pct: 3.0,
                        description: String::new(),
                    },
                    CardReward {
                        category: "online_shopping".to_string(),
                        cashback_pct: 3.0,
                        description: String::new(),
                    },
                    CardReward {
                        category: "general".to_string(),
                        cashback_pct: 1.0,
                        description: String::new(),
                    },
                ],
                vendor_offers: vec![
                    VendorOffer {
                        vendor_keyword: "BestBuy".to_string(),
                        discount_pct: 10.0,
                        max_discount: 50.0,
                        description: "10% off Best Buy up to $50".to_string(),
                    },
                    VendorOffer {
                        vendor_keyword: "Tech".to_string(),
                        discount_pct: 5.0,
                        max_discount: 30.0,
                        description: "5% off tech retailers up to $30".to_string(),
                    },
                ],
                annual_fee: 95.0,
            },
            CreditCard {
                id: "citi_double".to_string(),
                name: "Citi Double Cash".to_string(),
                issuer: "Citi".to_string(),
                rewards: vec![CardReward {
                    category: "general".to_string(),
                    cashback_pct: 2.0,
                    description: "2% on everything (1% purchase + 1% payment)".to_string(),
                }],
                vendor_offers: vec![],
                annual_fee: 0.0,
            },
            CreditCard {
                id: "discover_it".to_string(),
                name: "Discover it Cash Back".to_string(),
                issuer: "Discover".to_string(),
                rewards: vec![
                    CardReward {
                        category: "electronics".to_string(),
                        cashback_pct: 5.0,
                        description: "5% rotating category - electronics this quarter".to_string(),
                    },
                    CardReward {
                        category: "general".to_string(),
                        cashback_pct: 1.0,
                        description: String::new(),
                    },
                ],
                vendor_offers: vec![VendorOffer {
                    vendor_keyword: "Walmart".to_string(),
                    discount_pct: 5.0,
                    max_discount: 20.0,
                    description: String::new(),
                }],
                annual_fee: 0.0,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_round_trip() {
        let store = WalletStore::new();
        let session = SessionId::new("session_1");
        assert!(store.get(&session).is_empty());

        store.insert(session.clone(), demo_wallet());
        assert_eq!(store.get(&session).cards.len(), 4);

        store.remove(&session);
        assert!(store.get(&session).is_empty());
    }

    #[test]
    fn demo_wallet_card_ids_unique() {
        let wallet = demo_wallet();
        let ids: std::collections::HashSet<&str> =
            wallet.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), wallet.cards.len());
    }
}
