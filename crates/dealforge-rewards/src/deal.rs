//! Deal context - single source of truth for "buyer pays / seller gets"
//!
//! Pure computation, no I/O. Both agents receive the same numbers so
//! neither can hallucinate a different total.

use serde::{Deserialize, Serialize};

use crate::card::{CardWallet, RewardsEngine};

/// Structured deal figures for both sides of the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealContext {
    /// What the buyer pays at the register
    pub buyer_list_total: f64,
    /// What the buyer effectively pays after the best card's rewards
    pub buyer_effective_total: f64,
    pub buyer_savings: f64,
    pub recommended_card_name: Option<String>,
    pub recommended_card_explanation: Option<String>,
    pub seller_receives: f64,
    pub seller_cost_total: f64,
    pub seller_profit: f64,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute what the buyer pays (list and effective) and what the seller
/// gets and profits at a given price and quantity
pub fn compute_deal_context(
    price_per_unit: f64,
    quantity: u32,
    item_name: &str,
    seller_name: &str,
    seller_cost_per_unit: f64,
    wallet: &CardWallet,
) -> DealContext {
    let buyer_list_total = price_per_unit * quantity as f64;
    let seller_receives = buyer_list_total;
    let seller_cost_total = seller_cost_per_unit * quantity as f64;
    let seller_profit = seller_receives - seller_cost_total;

    let benefit = RewardsEngine::new().best_card(wallet, item_name, seller_name, price_per_unit, quantity);

    match benefit {
        Some(benefit) => DealContext {
            buyer_list_total: round_cents(buyer_list_total),
            buyer_effective_total: benefit.effective_price,
            buyer_savings: benefit.total_savings,
            recommended_card_name: Some(benefit.card_name),
            recommended_card_explanation: Some(benefit.explanation),
            seller_receives: round_cents(seller_receives),
            seller_cost_total: round_cents(seller_cost_total),
            seller_profit: round_cents(seller_profit),
        },
        None => DealContext {
            buyer_list_total: round_cents(buyer_list_total),
            buyer_effective_total: round_cents(buyer_list_total),
            buyer_savings: 0.0,
            recommended_card_name: None,
            recommended_card_explanation: None,
            seller_receives: round_cents(seller_receives),
            seller_cost_total: round_cents(seller_cost_total),
            seller_profit: round_cents(seller_profit),
        },
    }
}

/// Prompt-safe deal text for the seller: their take, and the buyer's
/// effective cost so they can pitch card benefits
pub fn format_deal_context_for_seller(ctx: &DealContext) -> String {
    let mut parts = vec![format!(
        "If this deal closes at this price: you receive ${:.2} total; \
         your cost is ${:.2}; your profit is ${:.2}.",
        ctx.seller_receives, ctx.seller_cost_total, ctx.seller_profit
    )];
    if ctx.buyer_savings > 0.0 {
        if let Some(ref card) = ctx.recommended_card_name {
            parts.push(format!(
                "The buyer's effective cost after their payment rewards could be ${:.2} \
                 (saving ${:.2} with {}), which may make them more willing to accept. \
                 You can mention: \"Use your {} and you'll save ${:.2}.\"",
                ctx.buyer_effective_total, ctx.buyer_savings, card, card, ctx.buyer_savings
            ));
            return parts.join(" ");
        }
    }
    parts.push(format!(
        "The buyer would pay ${:.2} at the register (no card rewards applied).",
        ctx.buyer_list_total
    ));
    parts.join(" ")
}

/// Prompt-safe deal text for the buyer: list total, effective total, and
/// the recommended card
pub fn format_deal_context_for_buyer(ctx: &DealContext) -> String {
    if ctx.buyer_savings > 0.0 {
        if let Some(ref card) = ctx.recommended_card_name {
            return format!(
                "At this price you would pay ${:.2} total at the register; \
                 with your best card ({}) you'd effectively pay ${:.2} (saving ${:.2}).",
                ctx.buyer_list_total, card, ctx.buyer_effective_total, ctx.buyer_savings
            );
        }
    }
    format!(
        "At this price you would pay ${:.2} total. No card rewards apply to this purchase.",
        ctx.buyer_list_total
    )
}
