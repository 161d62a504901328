//! Dealforge CLI - run negotiations from the terminal
//!
//! ```bash
//! # Offline demo (deterministic provider, ends at the round limit)
//! dealforge run --seed 42
//!
//! # Against a local model
//! DEALFORGE_LLM_PROVIDER=ollama dealforge run
//!
//! # Custom scenario
//! dealforge run --scenario scenario.json
//!
//! # Inspect the demo wallet
//! dealforge wallet
//! ```
//!
//! Events are printed as JSON lines so the output can be piped into `jq`
//! or replayed elsewhere.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::{pin_mut, StreamExt};
use serde::Deserialize;

use dealforge_engine::{EngineConfig, NegotiationRoom, RoundOrchestrator};
use dealforge_llm::LlmRouter;
use dealforge_rewards::{demo_wallet, RewardsEngine, WalletStore};
use dealforge_types::{
    BuyerConstraints, BuyerId, InventoryItem, ProductRef, Seller, SellerId, SellerPriority,
    SellerProfile, SessionId, SpeakingStyle, SellerStrategy,
};

/// Dealforge - multi-party price negotiation between LLM agents
#[derive(Parser)]
#[command(name = "dealforge")]
#[command(version)]
#[command(about = "One buyer, N sellers, bounded rounds, hard price ceilings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a negotiation and stream events as JSON lines
    Run {
        /// Room-level seed for deterministic tie-breaking
        #[arg(long)]
        seed: Option<u64>,

        /// Override the round limit
        #[arg(long)]
        max_rounds: Option<u32>,

        /// Scenario file (JSON); the built-in demo scenario when omitted
        #[arg(long)]
        scenario: Option<PathBuf>,
    },

    /// Show the demo wallet and its best card for a sample purchase
    Wallet,
}

/// On-disk scenario format
#[derive(Deserialize)]
struct Scenario {
    buyer_name: String,
    constraints: BuyerConstraints,
    sellers: Vec<Seller>,
}

fn demo_scenario() -> Scenario {
    let item = |cost: f64, selling: f64, least: f64| InventoryItem {
        item_id: "item_laptop".to_string(),
        item_name: "Laptop".to_string(),
        product: ProductRef::unspecified(),
        cost_price: cost,
        selling_price: selling,
        least_price: least,
        quantity_available: 10,
    };

    Scenario {
        buyer_name: "Alice".to_string(),
        constraints: BuyerConstraints {
            item_id: "item_laptop".to_string(),
            item_name: "Laptop".to_string(),
            product: ProductRef::unspecified(),
            quantity_needed: 2,
            min_price_per_unit: 500.0,
            max_price_per_unit: 800.0,
        },
        sellers: vec![
            Seller {
                id: SellerId::new("seller_techstore"),
                name: "TechStore".to_string(),
                profile: SellerProfile {
                    priority: SellerPriority::MaximizeProfit,
                    speaking_style: SpeakingStyle::Professional,
                    strategy: SellerStrategy::FirmPricing,
                },
                inventory: vec![item(520.0, 780.0, 600.0)],
            },
            Seller {
                id: SellerId::new("seller_gadgethub"),
                name: "GadgetHub".to_string(),
                profile: SellerProfile {
                    priority: SellerPriority::CustomerRetention,
                    speaking_style: SpeakingStyle::Enthusiastic,
                    strategy: SellerStrategy::AggressiveDiscounter,
                },
                inventory: vec![item(500.0, 760.0, 560.0)],
            },
            Seller {
                id: SellerId::new("seller_bestbuy"),
                name: "BestBuy Outlet".to_string(),
                profile: SellerProfile {
                    priority: SellerPriority::MaximizeProfit,
                    speaking_style: SpeakingStyle::Casual,
                    strategy: SellerStrategy::PriceMatcher,
                },
                inventory: vec![item(540.0, 790.0, 620.0)],
            },
        ],
    }
}

async fn run(seed: Option<u64>, max_rounds: Option<u32>, scenario: Option<PathBuf>) -> anyhow::Result<()> {
    let scenario = match scenario {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading scenario file {}", path.display()))?;
            serde_json::from_str(&raw).context("parsing scenario file")?
        }
        None => demo_scenario(),
    };

    let mut config = EngineConfig::from_env();
    if let Some(max_rounds) = max_rounds {
        config.max_rounds = max_rounds;
    }

    let session_id = SessionId::new("session_demo");
    let wallets = Arc::new(WalletStore::new());
    wallets.insert(session_id.clone(), demo_wallet());

    let mut room = NegotiationRoom::new(
        BuyerId::new("buyer_alice"),
        scenario.buyer_name,
        scenario.constraints,
        scenario.sellers,
        config.max_rounds,
    )?
    .with_session(session_id);
    if let Some(seed) = seed {
        room = room.with_seed(seed);
    }

    let router = LlmRouter::from_env();
    tracing::info!(provider = %router.kind(), "using generation provider");

    let orchestrator = RoundOrchestrator::new(router.provider(), config).with_wallets(wallets);
    let events = orchestrator.run(room);
    pin_mut!(events);
    while let Some(event) = events.next().await {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(())
}

fn wallet() -> anyhow::Result<()> {
    let wallet = demo_wallet();
    let engine = RewardsEngine::new();

    println!("Demo wallet ({} cards):", wallet.cards.len());
    for card in &wallet.cards {
        println!("  - {} ({}), annual fee ${:.2}", card.name, card.issuer, card.annual_fee);
        for reward in &card.rewards {
            println!("      {}% on {}", reward.cashback_pct, reward.category);
        }
        for offer in &card.vendor_offers {
            println!(
                "      {}% off at vendors matching \"{}\"",
                offer.discount_pct, offer.vendor_keyword
            );
        }
    }

    println!();
    println!("Best card for 2x Laptop at $650.00 from BestBuy Outlet:");
    match engine.best_card(&wallet, "Laptop", "BestBuy Outlet", 650.0, 2) {
        Some(benefit) => {
            println!("  {}", benefit.explanation);
            println!(
                "  Effective total ${:.2} (saving ${:.2})",
                benefit.effective_price, benefit.total_savings
            );
        }
        None => println!("  no cards in wallet"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            seed,
            max_rounds,
            scenario,
        } => run(seed, max_rounds, scenario).await,
        Commands::Wallet => wallet(),
    }
}
