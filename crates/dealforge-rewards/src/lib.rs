//! Dealforge Rewards - reward-aware deal mathematics
//!
//! Both the buyer and the sellers reason about "what does this deal really
//! cost" - which depends on the buyer's card wallet. The numbers are
//! computed here, by code, never by a language model: agents only receive
//! the formatted result as prompt text.
//!
//! - [`RewardsEngine`] matches purchases to card reward tiers and vendor
//!   offers and picks the best card
//! - [`compute_deal_context`] is the single source of truth for
//!   "buyer pays / seller gets"
//! - [`WalletStore`] holds per-session wallets in memory

pub mod card;
pub mod deal;
pub mod wallet;

pub use card::{CardBenefit, CardReward, CreditCard, CardWallet, RewardsEngine, VendorOffer};
pub use deal::{
    compute_deal_context, format_deal_context_for_buyer, format_deal_context_for_seller,
    DealContext,
};
pub use wallet::{demo_wallet, WalletStore};
