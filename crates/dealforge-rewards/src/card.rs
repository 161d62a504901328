//! Credit cards, reward tiers, and best-card selection

use serde::{Deserialize, Serialize};

/// A reward tier on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardReward {
    /// Reward category, e.g. "electronics", "dining", "general"
    pub category: String,
    /// Cashback percentage, e.g. 5.0 for 5%
    pub cashback_pct: f64,
    #[serde(default)]
    pub description: String,
}

/// A vendor-specific offer on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorOffer {
    /// Matched case-insensitively against the seller name
    pub vendor_keyword: String,
    pub discount_pct: f64,
    /// 0 means uncapped
    #[serde(default)]
    pub max_discount: f64,
    #[serde(default)]
    pub description: String,
}

/// A buyer's credit card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: String,
    pub name: String,
    pub issuer: String,
    #[serde(default)]
    pub rewards: Vec<CardReward>,
    #[serde(default)]
    pub vendor_offers: Vec<VendorOffer>,
    #[serde(default)]
    pub annual_fee: f64,
}

/// A buyer's collection of cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardWallet {
    pub cards: Vec<CreditCard>,
}

impl CardWallet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Computed benefit of paying with a specific card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardBenefit {
    pub card_id: String,
    pub card_name: String,
    pub cashback_pct: f64,
    pub cashback_amount: f64,
    pub vendor_discount_pct: f64,
    pub vendor_discount_amount: f64,
    /// Total after all rewards
    pub effective_price: f64,
    pub total_savings: f64,
    pub explanation: String,
}

/// Item-keyword to reward-category table
const CATEGORY_MAP: &[(&str, &str)] = &[
    ("laptop", "electronics"),
    ("phone", "electronics"),
    ("tablet", "electronics"),
    ("computer", "electronics"),
    ("monitor", "electronics"),
    ("keyboard", "electronics"),
    ("mouse", "electronics"),
    ("headphones", "electronics"),
    ("camera", "electronics"),
    ("tv", "electronics"),
    ("speaker", "electronics"),
    ("console", "electronics"),
    ("gpu", "electronics"),
    ("ram", "electronics"),
    ("ssd", "electronics"),
    ("furniture", "home"),
    ("chair", "home"),
    ("desk", "home"),
    ("sofa", "home"),
    ("mattress", "home"),
    ("lamp", "home"),
    ("book", "books"),
    ("textbook", "books"),
    ("clothing", "fashion"),
    ("shoes", "fashion"),
    ("jacket", "fashion"),
    ("food", "dining"),
    ("restaurant", "dining"),
    ("grocery", "groceries"),
];

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Matches purchases against card reward structures
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardsEngine;

impl RewardsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Detect the reward category from an item name
    pub fn detect_category(&self, item_name: &str) -> &'static str {
        let item_lower = item_name.to_lowercase();
        for (keyword, category) in CATEGORY_MAP {
            if item_lower.contains(keyword) {
                return category;
            }
        }
        "general"
    }

    fn benefit_for_card(
        &self,
        card: &CreditCard,
        category: &str,
        seller_name: &str,
        total_price: f64,
    ) -> CardBenefit {
        // Best matching reward tier: category-specific or general
        let mut cashback_pct = 0.0;
        for reward in &card.rewards {
            if (reward.category == category || reward.category == "general")
                && reward.cashback_pct > cashback_pct
            {
                cashback_pct = reward.cashback_pct;
            }
        }
        let cashback_amount = total_price * (cashback_pct / 100.0);

        // First matching vendor offer wins, capped at max_discount
        let mut vendor_discount_pct = 0.0;
        let mut vendor_discount_amount = 0.0;
        let seller_lower = seller_name.to_lowercase();
        for offer in &card.vendor_offers {
            if seller_lower.contains(&offer.vendor_keyword.to_lowercase()) {
                vendor_discount_pct = offer.discount_pct;
                vendor_discount_amount = total_price * (vendor_discount_pct / 100.0);
                if offer.max_discount > 0.0 {
                    vendor_discount_amount = vendor_discount_amount.min(offer.max_discount);
                }
                break;
            }
        }

        let total_savings = cashback_amount + vendor_discount_amount;
        let effective_price = total_price - total_savings;

        let mut parts = Vec::new();
        if cashback_pct > 0.0 {
            parts.push(format!(
                "{}% cashback on {} (${:.2})",
                cashback_pct, category, cashback_amount
            ));
        }
        if vendor_discount_pct > 0.0 {
            parts.push(format!(
                "{}% vendor offer with {} (${:.2})",
                vendor_discount_pct, seller_name, vendor_discount_amount
            ));
        }
        let explanation = if parts.is_empty() {
            format!("No special rewards with {}", card.name)
        } else {
            format!("Using {}: {}", card.name, parts.join(", "))
        };

        CardBenefit {
            card_id: card.id.clone(),
            card_name: card.name.clone(),
            cashback_pct,
            cashback_amount: round_cents(cashback_amount),
            vendor_discount_pct,
            vendor_discount_amount: round_cents(vendor_discount_amount),
            effective_price: round_cents(effective_price),
            total_savings: round_cents(total_savings),
            explanation,
        }
    }

    /// Compute the best card to use for a purchase, or `None` for an empty
    /// wallet
    pub fn best_card(
        &self,
        wallet: &CardWallet,
        item_name: &str,
        seller_name: &str,
        price_per_unit: f64,
        quantity: u32,
    ) -> Option<CardBenefit> {
        if wallet.cards.is_empty() {
            return None;
        }

        let total_price = price_per_unit * quantity as f64;
        let category = self.detect_category(item_name);

        wallet
            .cards
            .iter()
            .map(|card| self.benefit_for_card(card, category, seller_name, total_price))
            .max_by(|a, b| {
                a.total_savings
                    .partial_cmp(&b.total_savings)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Benefits for every card, best savings first
    pub fn all_cards(
        &self,
        wallet: &CardWallet,
        item_name: &str,
        seller_name: &str,
        price_per_unit: f64,
        quantity: u32,
    ) -> Vec<CardBenefit> {
        let total_price = price_per_unit * quantity as f64;
        let category = self.detect_category(item_name);

        let mut benefits: Vec<CardBenefit> = wallet
            .cards
            .iter()
            .map(|card| self.benefit_for_card(card, category, seller_name, total_price))
            .collect();
        benefits.sort_by(|a, b| {
            b.total_savings
                .partial_cmp(&a.total_savings)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        benefits
    }
}
