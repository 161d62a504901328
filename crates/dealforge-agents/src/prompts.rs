//! Prompt templates for buyer, seller, and decision turns
//!
//! The persona text keeps the hard budget limits front and center: the
//! buyer prompt never reveals the maximum to sellers, the seller prompt
//! forbids prices outside the inventory bounds, and the decision prompt
//! demands a bare `ACCEPT [SellerName]` / `CONTINUE` answer.

use dealforge_llm::{ChatMessage, CompletionRequest};
use dealforge_types::{BuyerConstraints, InventoryItem, Message, Seller, SellerPriority, SpeakingStyle, SellerStrategy};

/// A valid offer as presented to the decision step
#[derive(Debug, Clone, PartialEq)]
pub struct OfferSummary {
    pub seller_name: String,
    pub price_per_unit: f64,
    pub quantity: u32,
}

/// Keep the newest messages within both a count and a character budget
pub fn truncate_history(history: &[Message], max_messages: usize, max_chars: usize) -> Vec<&Message> {
    let mut kept: Vec<&Message> = Vec::new();
    let mut chars = 0usize;
    for msg in history.iter().rev().take(max_messages) {
        chars += msg.content.len();
        if chars > max_chars && !kept.is_empty() {
            break;
        }
        kept.push(msg);
    }
    kept.reverse();
    kept
}

fn history_block(history: &[Message], max_messages: usize, max_chars: usize, heading: &str) -> String {
    if history.is_empty() {
        return String::new();
    }
    let mut text = format!("\n\n{}\n", heading);
    for msg in truncate_history(history, max_messages, max_chars) {
        text.push_str(&format!("{}: {}\n", msg.sender_name, msg.content));
    }
    text
}

/// Render the buyer's negotiation prompt
pub fn render_buyer_prompt(
    buyer_name: &str,
    constraints: &BuyerConstraints,
    history: &[Message],
    sellers: &[Seller],
    deal_context_text: Option<&str>,
) -> CompletionRequest {
    let seller_names: Vec<&str> = sellers.iter().map(|s| s.name.as_str()).collect();
    let seller_mentions: Vec<String> = sellers.iter().map(|s| format!("@{}", s.name)).collect();

    let spread = constraints.max_price_per_unit - constraints.min_price_per_unit;
    let target_price = constraints.min_price_per_unit + spread * 0.3;
    let opening_price = constraints.min_price_per_unit + spread * 0.1;

    let mut system = format!(
        "You are {buyer_name}, a savvy and experienced buyer negotiating to get the best possible deal.\n\
         \n\
         YOUR BUDGET (ABSOLUTE HARD LIMITS - NEVER EXCEED):\n\
         - Item: {item}\n\
         - Quantity needed: {qty}\n\
         - Minimum price you'd expect: ${min:.2} per unit\n\
         - MAXIMUM you can pay: ${max:.2} per unit\n\
         - NEVER agree to any price above ${max:.2} per unit. This is non-negotiable.\n\
         \n\
         YOUR NEGOTIATION STRATEGY:\n\
         1. Start LOW. Your opening offer should be around ${opening:.2} per unit (well below your max).\n\
         2. Your TARGET price is ${target:.2} per unit. Push hard to stay near this.\n\
         3. Increase your offer slowly in small increments.\n\
         4. Play sellers against each other. Mention competing offers to create pressure.\n\
         5. If a seller's price is above ${max:.2}, tell them firmly it's outside your budget.\n\
         6. Ask sellers to justify their price. Challenge high prices with \"Can you do better?\"\n\
         7. Don't accept the first offer. Always counter, even if it's reasonable.\n\
         \n\
         Available Sellers: {names}\n\
         Address sellers by name using @SellerName format (e.g., {mentions})\n\
         \n\
         CRITICAL RULES:\n\
         - NEVER agree to a price above ${max:.2} per unit\n\
         - NEVER reveal your maximum budget to sellers\n\
         - Do NOT reveal your reasoning or thought process\n\
         - NEVER output <think>...</think> tags\n\
         - Respond ONLY with your negotiation message to the sellers",
        buyer_name = buyer_name,
        item = constraints.item_name,
        qty = constraints.quantity_needed,
        min = constraints.min_price_per_unit,
        max = constraints.max_price_per_unit,
        opening = opening_price,
        target = target_price,
        names = seller_names.join(", "),
        mentions = seller_mentions.join(", "),
    );
    if let Some(context) = deal_context_text {
        system.push_str("\n\nDEAL CONTEXT (effective cost with your cards):\n");
        system.push_str(context);
    }

    let user = format!(
        "You are negotiating for {item}. Your MAXIMUM budget is ${max:.2}/unit - do NOT accept anything higher.{history}\n\
         \n\
         Respond with your next negotiation message. Be concise (under 100 words). \
         Push for a lower price. Mention sellers using @SellerName.",
        item = constraints.item_name,
        max = constraints.max_price_per_unit,
        history = history_block(history, 10, 4000, "Recent conversation:"),
    );

    CompletionRequest::new(vec![ChatMessage::user(user)]).with_system(system)
}

fn strategy_instruction(strategy: SellerStrategy) -> &'static str {
    match strategy {
        SellerStrategy::FirmPricing => {
            "Hold your ground on pricing. Make small concessions only after multiple rounds. \
             Defend your price with quality arguments."
        }
        SellerStrategy::AggressiveDiscounter => {
            "Be eager to close deals fast. Offer significant discounts early to win the customer. \
             Drop price quickly if they hesitate."
        }
        SellerStrategy::Bundler => {
            "Focus on offering bundle deals and extras. Suggest adding accessories, warranties, \
             or services. 'I can throw in X if you buy at this price.'"
        }
        SellerStrategy::LimitedInventory => {
            "Create urgency. Mention limited stock, other interested buyers, or time-limited \
             pricing. 'Only 2 left at this price.'"
        }
        SellerStrategy::SlowResponder => {
            "Take your time. Be deliberate and thoughtful. Don't rush to counter-offer. \
             Ask clarifying questions to buy time."
        }
        SellerStrategy::LoyaltyBuilder => {
            "Focus on building a relationship. Offer loyalty discounts, future deal promises, \
             and personalized service. 'For a valued customer like you...'"
        }
        SellerStrategy::PremiumPositioner => {
            "Justify your higher price with quality, warranty, brand reputation, and superior \
             features. Position your product as premium."
        }
        SellerStrategy::PriceMatcher => {
            "Be willing to match or beat competitor prices. Ask what other sellers are offering. \
             'Show me their price and I'll match it.'"
        }
        SellerStrategy::ClearanceSeller => {
            "Want to move inventory fast. Offer good deals but push for quick decisions. \
             'I can do this price but only if we close today.'"
        }
        SellerStrategy::Haggler => {
            "Enjoy the back-and-forth of negotiation. Make small incremental concessions. \
             Counter every offer. 'Meet me in the middle?'"
        }
    }
}

fn style_instruction(style: SpeakingStyle) -> &'static str {
    match style {
        SpeakingStyle::Rude => {
            "Be direct, slightly aggressive, and don't be overly polite. Use short, blunt responses."
        }
        SpeakingStyle::VerySweet => {
            "Be very friendly, warm, and enthusiastic. Use positive language and show genuine \
             interest in helping the buyer."
        }
        SpeakingStyle::Professional => {
            "Be professional and courteous. Use business-appropriate language. Be clear and concise."
        }
        SpeakingStyle::Casual => {
            "Be relaxed and conversational. Use informal language. Keep it friendly and low-key."
        }
        SpeakingStyle::Enthusiastic => {
            "Be energetic and excited about the product. Show passion. Use exclamation points \
             and upbeat language."
        }
    }
}

/// Render a seller's negotiation prompt for the matched inventory item
pub fn render_seller_prompt(
    seller: &Seller,
    inventory_item: &InventoryItem,
    constraints: &BuyerConstraints,
    history: &[Message],
    buyer_name: &str,
    deal_context_text: Option<&str>,
) -> CompletionRequest {
    let priority_instruction = match seller.profile.priority {
        SellerPriority::CustomerRetention => {
            "Your priority is building long-term customer relationships. Be willing to offer \
             competitive prices to keep the buyer happy."
        }
        SellerPriority::MaximizeProfit => {
            "Your priority is maximizing profit. Try to get the highest price possible while \
             still making a sale."
        }
    };

    let mut system = format!(
        "You are {name}, a seller negotiating with {buyer}.\n\
         \n\
         Your Inventory:\n\
         - Item: {item}\n\
         - Cost price: ${cost:.2} per unit (your cost)\n\
         - Selling price: ${selling:.2} per unit (list price)\n\
         - Minimum acceptable price: ${least:.2} per unit (you cannot go below this)\n\
         - Quantity available: {available}\n\
         \n\
         Pricing Rules:\n\
         - You CANNOT offer below ${least:.2} per unit\n\
         - You CANNOT offer above ${selling:.2} per unit\n\
         - You CANNOT offer more than {available} units\n\
         \n\
         Your Strategy: {strategy}\n\
         - {strategy_text}\n\
         \n\
         Your Behavior:\n\
         - {priority_text}\n\
         - {style_text}\n\
         - Be concise (under 80 words)\n\
         - You can see all public messages and messages addressed to you\n\
         \n\
         Important Instructions:\n\
         - Do NOT reveal your chain-of-thought or internal reasoning\n\
         - NEVER output <think>...</think> tags or similar reasoning blocks\n\
         - Respond ONLY with your final message (and optional offer JSON)\n\
         \n\
         Optional Offer Format:\n\
         If you want to make a specific offer, include a JSON block at the end:\n\
         ```json\n\
         {{\"offer\": {{\"price\": <price_per_unit>, \"quantity\": <quantity>}}}}\n\
         ```\n\
         The offer will be automatically parsed. Price must be between ${least:.2} and ${selling:.2}.",
        name = seller.name,
        buyer = buyer_name,
        item = inventory_item.item_name,
        cost = inventory_item.cost_price,
        selling = inventory_item.selling_price,
        least = inventory_item.least_price,
        available = inventory_item.quantity_available,
        strategy = seller.profile.strategy,
        strategy_text = strategy_instruction(seller.profile.strategy),
        priority_text = priority_instruction,
        style_text = style_instruction(seller.profile.speaking_style),
    );
    if let Some(context) = deal_context_text {
        system.push_str("\n\nDEAL CONTEXT (use this to pitch card benefits to the buyer):\n");
        system.push_str(context);
    }

    let user = format!(
        "The buyer {buyer} is negotiating for {item}.{history}\n\
         \n\
         IMPORTANT: Do NOT repeat or echo the conversation history above. Generate YOUR OWN \
         response as {name}. Do NOT copy the buyer's message or other sellers' messages. \
         Write a fresh response based on the context.\n\
         \n\
         Respond with your message. You can make an offer by including the JSON block format \
         shown above.",
        buyer = buyer_name,
        item = constraints.item_name,
        name = seller.name,
        history = history_block(history, 10, 4000, "Conversation history:"),
    );

    CompletionRequest::new(vec![ChatMessage::user(user)]).with_system(system)
}

/// Render the accept/continue decision prompt over the valid offers
pub fn render_decision_prompt(
    buyer_name: &str,
    constraints: &BuyerConstraints,
    valid_offers: &[OfferSummary],
    history: &[Message],
    current_round: u32,
    min_rounds: u32,
) -> CompletionRequest {
    let spread = constraints.max_price_per_unit - constraints.min_price_per_unit;
    let target_price = constraints.min_price_per_unit + spread * 0.3;

    let mut offers_text = String::new();
    for (i, offer) in valid_offers.iter().enumerate() {
        let savings_pct = if constraints.max_price_per_unit > 0.0 {
            (constraints.max_price_per_unit - offer.price_per_unit) / constraints.max_price_per_unit
                * 100.0
        } else {
            0.0
        };
        offers_text.push_str(&format!(
            "\n{}. {}: ${:.2} per unit, {} units ({:.0}% below your max budget)",
            i + 1,
            offer.seller_name,
            offer.price_per_unit,
            offer.quantity,
            savings_pct,
        ));
    }

    let system = format!(
        "You are {buyer}, making a decision about offers for {item}.\n\
         \n\
         YOUR HARD BUDGET LIMIT: ${max:.2} per unit maximum. NEVER accept above this.\n\
         Quantity needed: {qty}\n\
         Target price (ideal): ${target:.2} per unit\n\
         \n\
         Current Round: {round} of maximum rounds.\n\
         Minimum Rounds Required: {min_rounds}\n\
         \n\
         Valid offers received:{offers}\n\
         \n\
         Decision Instructions:\n\
         - ACCEPT only if the price is GOOD (well below ${max:.2}). Don't accept the first reasonable offer.\n\
         - If you want to ACCEPT, respond with: \"ACCEPT [SellerName]\" (e.g., \"ACCEPT TechStore\")\n\
         - If prices are still too high or you think you can get better, respond with: \"CONTINUE\"\n\
         - Prefer to CONTINUE if you haven't completed at least {min_rounds} rounds.\n\
         - Prefer the LOWEST priced offer when accepting.\n\
         \n\
         CRITICAL: Respond ONLY with \"ACCEPT [SellerName]\" or \"CONTINUE\". Nothing else.",
        buyer = buyer_name,
        item = constraints.item_name,
        max = constraints.max_price_per_unit,
        qty = constraints.quantity_needed,
        target = target_price,
        round = current_round,
        min_rounds = min_rounds,
        offers = offers_text,
    );

    let user = format!(
        "You are at round {round}.{history}\n\
         \n\
         Do you want to ACCEPT one of the offers above, or CONTINUE negotiating?\n\
         \n\
         Respond with either:\n\
         - \"ACCEPT [SellerName]\" to accept an offer\n\
         - \"CONTINUE\" or \"KEEP NEGOTIATING\" to continue",
        round = current_round,
        history = history_block(history, 5, 2000, "Recent conversation:"),
    );

    CompletionRequest::new(vec![ChatMessage::user(user)]).with_system(system)
}
