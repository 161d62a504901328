//! Seller configuration - behavioral profile and inventory
//!
//! The behavioral profile is opaque to the engine: it is passed through to
//! the prompt layer, which turns it into persona instructions. Ten strategy
//! types keep negotiation dynamics varied across sellers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::InventoryItem;
use crate::identity::SellerId;

/// What the seller optimizes for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellerPriority {
    CustomerRetention,
    MaximizeProfit,
}

/// How the seller talks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakingStyle {
    Rude,
    VerySweet,
    Professional,
    Casual,
    Enthusiastic,
}

impl Default for SpeakingStyle {
    fn default() -> Self {
        Self::Professional
    }
}

/// Negotiation strategy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellerStrategy {
    /// Won't budge much, defends list price
    FirmPricing,
    /// Quickly drops price to close deals
    AggressiveDiscounter,
    /// Offers bundle deals and extras
    Bundler,
    /// Creates urgency with scarcity
    LimitedInventory,
    /// Takes time, deliberate, may stall
    SlowResponder,
    /// Focuses on relationship building
    LoyaltyBuilder,
    /// Justifies high price with quality
    PremiumPositioner,
    /// Will match competitor prices
    PriceMatcher,
    /// Wants to move inventory fast
    ClearanceSeller,
    /// Enjoys back-and-forth, small increments
    Haggler,
}

impl Default for SellerStrategy {
    fn default() -> Self {
        Self::FirmPricing
    }
}

impl fmt::Display for SellerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FirmPricing => "Firm Pricing",
            Self::AggressiveDiscounter => "Aggressive Discounter",
            Self::Bundler => "Bundler",
            Self::LimitedInventory => "Limited Inventory",
            Self::SlowResponder => "Slow Responder",
            Self::LoyaltyBuilder => "Loyalty Builder",
            Self::PremiumPositioner => "Premium Positioner",
            Self::PriceMatcher => "Price Matcher",
            Self::ClearanceSeller => "Clearance Seller",
            Self::Haggler => "Haggler",
        };
        write!(f, "{}", name)
    }
}

/// Seller's behavioral profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerProfile {
    pub priority: SellerPriority,
    #[serde(default)]
    pub speaking_style: SpeakingStyle,
    #[serde(default)]
    pub strategy: SellerStrategy,
}

/// Complete seller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    pub profile: SellerProfile,
    pub inventory: Vec<InventoryItem>,
}
