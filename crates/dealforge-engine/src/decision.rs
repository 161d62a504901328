//! Decision engine - accept an offer or keep negotiating
//!
//! Valid offers are selected deterministically (the validator is the hard
//! guard), sorted cheapest-first, and only then is a free-text
//! classification call asked whether to accept. The contract is
//! conservative everywhere: ambiguity, an unparseable reply, or a failed
//! call all mean "continue" - the engine never guesses an acceptance. An
//! accept that names no resolvable seller takes the cheapest valid offer.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use dealforge_agents::{render_decision_prompt, OfferSummary};
use dealforge_llm::LlmProvider;
use dealforge_types::Decision;

use crate::config::EngineConfig;
use crate::room::NegotiationRoom;
use crate::standing::{latest_offers_per_seller, StandingOffer};
use crate::validator::is_valid_offer;

/// Sampling used for the classification call; deliberately cool and short
const DECISION_TEMPERATURE: f32 = 0.3;
const DECISION_MAX_TOKENS: u32 = 100;

/// Decides accept vs. continue from the valid standing offers
pub struct DecisionEngine {
    provider: Arc<dyn LlmProvider>,
    config: EngineConfig,
}

impl DecisionEngine {
    pub fn new(provider: Arc<dyn LlmProvider>, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    /// The valid offers on the table, cheapest first; ties are broken by a
    /// seeded shuffle before the stable sort
    async fn valid_offers(
        &self,
        room: &NegotiationRoom,
        rng: &mut Option<StdRng>,
    ) -> Vec<StandingOffer> {
        let history = room.log.snapshot().await;
        let mut valid: Vec<StandingOffer> =
            latest_offers_per_seller(&history, &room.sellers, &room.constraints)
                .into_iter()
                .filter(|o| is_valid_offer(&o.offer, &room.constraints))
                .collect();

        if let Some(rng) = rng {
            valid.shuffle(rng);
        }
        valid.sort_by(|a, b| {
            a.offer
                .price_per_unit
                .partial_cmp(&b.offer.price_per_unit)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        valid
    }

    /// Evaluate the room after a round of seller responses
    ///
    /// Returns `None` to continue negotiating.
    pub async fn decide(
        &self,
        room: &NegotiationRoom,
        rng: &mut Option<StdRng>,
    ) -> Option<Decision> {
        // Minimum-exchange gate
        if room.current_round < self.config.min_rounds {
            tracing::debug!(
                round = room.current_round,
                min_rounds = self.config.min_rounds,
                "below minimum rounds, continuing"
            );
            return None;
        }

        let valid = self.valid_offers(room, rng).await;
        if valid.is_empty() {
            tracing::debug!("no valid offers, continuing negotiation");
            return None;
        }

        let summaries: Vec<OfferSummary> = valid
            .iter()
            .map(|o| OfferSummary {
                seller_name: o.seller_name.clone(),
                price_per_unit: o.offer.price_per_unit,
                quantity: o.offer.quantity,
            })
            .collect();

        let history = room.log.snapshot().await;
        let request = render_decision_prompt(
            &room.buyer_name,
            &room.constraints,
            &summaries,
            &history,
            room.current_round,
            self.config.min_rounds,
        )
        .with_temperature(DECISION_TEMPERATURE)
        .with_max_tokens(DECISION_MAX_TOKENS);

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                // Classification failure is never fatal
                tracing::warn!(error = %e, "decision classification failed, continuing");
                return None;
            }
        };

        let text = response.content.trim().to_uppercase();
        tracing::info!(decision = %text, "buyer decision response");

        if text.contains("ACCEPT") {
            for offer in &valid {
                if text.contains(&offer.seller_name.to_uppercase())
                    || text.contains(&offer.seller_id.as_str().to_uppercase())
                {
                    return Some(Decision {
                        seller_id: offer.seller_id.clone(),
                        seller_name: offer.seller_name.clone(),
                        offer: offer.offer.clone(),
                        reason: format!(
                            "Buyer accepted offer from {}: ${:.2} per unit",
                            offer.seller_name, offer.offer.price_per_unit
                        ),
                    });
                }
            }

            // Accept intent with no resolvable seller: cheapest wins
            tracing::warn!("accept signal without a resolvable seller, taking cheapest offer");
            let best = &valid[0];
            return Some(Decision {
                seller_id: best.seller_id.clone(),
                seller_name: best.seller_name.clone(),
                offer: best.offer.clone(),
                reason: format!(
                    "Buyer accepted offer: ${:.2} per unit",
                    best.offer.price_per_unit
                ),
            });
        }

        // CONTINUE, KEEP NEGOTIATING, or anything unrecognized
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use dealforge_llm::{
        CompletionRequest, CompletionResponse, LlmError, ProviderKind, Result as LlmResult,
    };
    use dealforge_types::{
        BuyerConstraints, BuyerId, InventoryItem, Message, MessageId, Offer, ProductRef, Seller,
        SellerId, SellerPriority, SellerProfile, SenderType, SpeakingStyle, SellerStrategy,
    };
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn replying(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "Scripted"
        }
        fn kind(&self) -> ProviderKind {
            ProviderKind::Deterministic
        }
        async fn is_available(&self) -> bool {
            true
        }
        async fn complete(&self, _request: CompletionRequest) -> LlmResult<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(reply) => Ok(CompletionResponse::new(reply)),
                None => Err(LlmError::RequestFailed {
                    message: "classifier down".to_string(),
                }),
            }
        }
    }

    fn seller(id: &str, name: &str) -> Seller {
        Seller {
            id: SellerId::new(id),
            name: name.to_string(),
            profile: SellerProfile {
                priority: SellerPriority::MaximizeProfit,
                speaking_style: SpeakingStyle::Professional,
                strategy: SellerStrategy::FirmPricing,
            },
            inventory: vec![InventoryItem {
                item_id: "inv_1".to_string(),
                item_name: "Laptop".to_string(),
                product: ProductRef::unspecified(),
                cost_price: 25.0,
                selling_price: 60.0,
                least_price: 35.0,
                quantity_available: 5,
            }],
        }
    }

    fn offer_message(round: u32, seller: &Seller, price: f64) -> Message {
        Message {
            id: MessageId::new(format!("msg_r{}_{}", round, seller.id)),
            round,
            timestamp: Utc::now(),
            sender_id: seller.id.as_str().to_string(),
            sender_type: SenderType::Seller,
            sender_name: seller.name.clone(),
            content: "here is my offer".to_string(),
            offer: Some(Offer::new(price, 2)),
            mentioned_sellers: vec![],
            visibility: vec!["buyer_1".to_string(), seller.id.as_str().to_string()],
        }
    }

    async fn room_with_offers(round: u32, offers: &[(Seller, f64)]) -> NegotiationRoom {
        let constraints = BuyerConstraints {
            item_id: "item_1".to_string(),
            item_name: "Laptop".to_string(),
            product: ProductRef::unspecified(),
            quantity_needed: 2,
            min_price_per_unit: 30.0,
            max_price_per_unit: 50.0,
        };
        let sellers: Vec<Seller> = offers.iter().map(|(s, _)| s.clone()).collect();
        let mut room =
            NegotiationRoom::new(BuyerId::new("buyer_1"), "Alice", constraints, sellers, 10)
                .unwrap();
        room.current_round = round;
        for (seller, price) in offers {
            room.log.append(offer_message(round, seller, *price)).await;
        }
        room
    }

    #[tokio::test]
    async fn gate_blocks_early_rounds_without_calling_classifier() {
        let provider = ScriptedProvider::replying("ACCEPT TechStore");
        let engine = DecisionEngine::new(provider.clone(), EngineConfig::default());
        let room = room_with_offers(1, &[(seller("seller_1", "TechStore"), 45.0)]).await;

        let decision = engine.decide(&room, &mut None).await;
        assert!(decision.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ceiling_violations_never_reach_the_classifier() {
        // Two offers: $45 valid, $55 above the $50 ceiling; classifier says
        // to accept the expensive one by name
        let provider = ScriptedProvider::replying("ACCEPT PriceyPlace");
        let engine = DecisionEngine::new(provider, EngineConfig::default());
        let room = room_with_offers(
            3,
            &[
                (seller("seller_1", "TechStore"), 45.0),
                (seller("seller_2", "PriceyPlace"), 55.0),
            ],
        )
        .await;

        let decision = engine.decide(&room, &mut None).await.unwrap();
        // PriceyPlace was filtered out, so the accept falls back to the
        // cheapest valid offer
        assert_eq!(decision.seller_id, SellerId::new("seller_1"));
        assert_eq!(decision.offer.price_per_unit, 45.0);
    }

    #[tokio::test]
    async fn named_accept_resolves_that_seller() {
        let provider = ScriptedProvider::replying("ACCEPT TechStore");
        let engine = DecisionEngine::new(provider, EngineConfig::default());
        let room = room_with_offers(
            3,
            &[
                (seller("seller_1", "TechStore"), 45.0),
                (seller("seller_2", "GadgetHub"), 40.0),
            ],
        )
        .await;

        let decision = engine.decide(&room, &mut None).await.unwrap();
        assert_eq!(decision.seller_id, SellerId::new("seller_1"));
        assert!(decision.reason.contains("TechStore"));
        assert!(decision.reason.contains("45.00"));
    }

    #[tokio::test]
    async fn unresolvable_accept_takes_cheapest() {
        let provider = ScriptedProvider::replying("ACCEPT THE BEST ONE");
        let engine = DecisionEngine::new(provider, EngineConfig::default());
        let room = room_with_offers(
            3,
            &[
                (seller("seller_1", "TechStore"), 45.0),
                (seller("seller_2", "GadgetHub"), 40.0),
            ],
        )
        .await;

        let decision = engine.decide(&room, &mut None).await.unwrap();
        assert_eq!(decision.seller_id, SellerId::new("seller_2"));
        assert_eq!(decision.offer.price_per_unit, 40.0);
    }

    #[tokio::test]
    async fn continue_reply_continues() {
        let provider = ScriptedProvider::replying("CONTINUE");
        let engine = DecisionEngine::new(provider, EngineConfig::default());
        let room = room_with_offers(3, &[(seller("seller_1", "TechStore"), 45.0)]).await;
        assert!(engine.decide(&room, &mut None).await.is_none());
    }

    #[tokio::test]
    async fn ambiguous_reply_continues() {
        let provider = ScriptedProvider::replying("hmm, tough call, maybe?");
        let engine = DecisionEngine::new(provider, EngineConfig::default());
        let room = room_with_offers(3, &[(seller("seller_1", "TechStore"), 45.0)]).await;
        assert!(engine.decide(&room, &mut None).await.is_none());
    }

    #[tokio::test]
    async fn classifier_failure_continues() {
        let provider = ScriptedProvider::failing();
        let engine = DecisionEngine::new(provider, EngineConfig::default());
        let room = room_with_offers(3, &[(seller("seller_1", "TechStore"), 45.0)]).await;
        assert!(engine.decide(&room, &mut None).await.is_none());
    }

    #[tokio::test]
    async fn no_valid_offers_continues_without_calling_classifier() {
        let provider = ScriptedProvider::replying("ACCEPT TechStore");
        let engine = DecisionEngine::new(provider.clone(), EngineConfig::default());
        let room = room_with_offers(3, &[(seller("seller_1", "TechStore"), 55.0)]).await;

        assert!(engine.decide(&room, &mut None).await.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn equal_price_ties_break_deterministically_per_seed() {
        let room = room_with_offers(
            3,
            &[
                (seller("seller_1", "TechStore"), 45.0),
                (seller("seller_2", "GadgetHub"), 45.0),
            ],
        )
        .await;

        let pick = |seed: u64| {
            let provider = ScriptedProvider::replying("ACCEPT SOMEONE");
            let engine = DecisionEngine::new(provider, EngineConfig::default());
            let room = &room;
            async move {
                let mut rng = Some(StdRng::seed_from_u64(seed));
                engine.decide(room, &mut rng).await.unwrap().seller_id
            }
        };

        let first = pick(7).await;
        let second = pick(7).await;
        assert_eq!(first, second);
    }
}
