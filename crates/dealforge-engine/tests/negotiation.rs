//! End-to-end negotiation runs against a scripted provider

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;

use dealforge_engine::{EngineConfig, EventKind, NegotiationEvent, NegotiationRoom, RoundOrchestrator};
use dealforge_llm::{
    CompletionRequest, CompletionResponse, LlmError, LlmProvider, ProviderKind, Result as LlmResult,
};
use dealforge_types::{
    BuyerConstraints, BuyerId, InventoryItem, ProductRef, Seller, SellerId, SellerPriority,
    SellerProfile, SpeakingStyle, SellerStrategy,
};

/// What a scripted seller does when asked to respond
#[derive(Clone)]
enum SellerScript {
    Reply(&'static str),
    Fail,
}

/// Routes each request to a buyer, seller, or decision script based on the
/// markers the prompt layer embeds
struct ScriptedProvider {
    buyer_replies: Mutex<VecDeque<&'static str>>,
    buyer_fails: bool,
    seller_scripts: HashMap<String, SellerScript>,
    decision_replies: Mutex<VecDeque<&'static str>>,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            buyer_replies: Mutex::new(VecDeque::new()),
            buyer_fails: false,
            seller_scripts: HashMap::new(),
            decision_replies: Mutex::new(VecDeque::new()),
        }
    }

    fn with_buyer_reply(self, reply: &'static str) -> Self {
        self.buyer_replies.lock().unwrap().push_back(reply);
        self
    }

    fn with_failing_buyer(mut self) -> Self {
        self.buyer_fails = true;
        self
    }

    fn with_seller(mut self, name: &str, script: SellerScript) -> Self {
        self.seller_scripts.insert(name.to_string(), script);
        self
    }

    fn with_decision_reply(self, reply: &'static str) -> Self {
        self.decision_replies.lock().unwrap().push_back(reply);
        self
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

    async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse> {
        let prompt = request.prompt_text();

        if prompt.contains("making a decision about offers") {
            let reply = self
                .decision_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or("CONTINUE");
            return Ok(CompletionResponse::new(reply));
        }

        if prompt.contains("Your Inventory:") {
            for (name, script) in &self.seller_scripts {
                if prompt.contains(&format!("You are {}, a seller", name)) {
                    return match script {
                        SellerScript::Reply(reply) => Ok(CompletionResponse::new(*reply)),
                        SellerScript::Fail => Err(LlmError::RequestFailed {
                            message: "seller backend exploded".to_string(),
                        }),
                    };
                }
            }
            return Ok(CompletionResponse::new("Let me get back to you."));
        }

        if self.buyer_fails {
            return Err(LlmError::RequestFailed {
                message: "buyer backend exploded".to_string(),
            });
        }
        let reply = self
            .buyer_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or("Anyone able to do better on price?");
        Ok(CompletionResponse::new(reply))
    }
}

fn constraints() -> BuyerConstraints {
    BuyerConstraints {
        item_id: "item_1".to_string(),
        item_name: "Laptop".to_string(),
        product: ProductRef::unspecified(),
        quantity_needed: 2,
        min_price_per_unit: 30.0,
        max_price_per_unit: 50.0,
    }
}

fn seller(id: &str, name: &str, selling: f64, least: f64, cost: f64) -> Seller {
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
            cost_price: cost,
            selling_price: selling,
            least_price: least,
            quantity_available: 5,
        }],
    }
}

fn room(sellers: Vec<Seller>, max_rounds: u32) -> NegotiationRoom {
    NegotiationRoom::new(BuyerId::new("buyer_1"), "Alice", constraints(), sellers, max_rounds)
        .unwrap()
}

async fn collect(provider: ScriptedProvider, room: NegotiationRoom, config: EngineConfig) -> Vec<NegotiationEvent> {
    let orchestrator = RoundOrchestrator::new(Arc::new(provider), config);
    orchestrator.run(room).collect().await
}

/// Exactly one terminal event, and it is the last one
fn assert_stream_invariants(events: &[NegotiationEvent]) {
    let terminal_count = events.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminal_count, 1, "expected exactly one terminal event");
    assert!(events.last().unwrap().is_terminal(), "terminal event must end the stream");
}

fn seller_response_senders(events: &[NegotiationEvent]) -> HashSet<String> {
    events
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::SellerResponse { sender_name, .. } => Some(sender_name.clone()),
            _ => None,
        })
        .collect()
}

const OFFER_45: &str =
    "I can do $45 each.\n```json\n{\"offer\": {\"price\": 45.0, \"quantity\": 2}}\n```";
const OFFER_55: &str =
    "Premium quality, $55.\n```json\n{\"offer\": {\"price\": 55.0, \"quantity\": 2}}\n```";

#[tokio::test]
async fn accepted_deal_completes_with_decision_and_complete_events() {
    // $45 is valid; $55 violates the buyer's $50 ceiling
    let provider = ScriptedProvider::new()
        .with_seller("TechStore", SellerScript::Reply(OFFER_45))
        .with_seller("PriceyPlace", SellerScript::Reply(OFFER_55))
        .with_decision_reply("ACCEPT TechStore");
    let sellers = vec![
        seller("seller_1", "TechStore", 60.0, 35.0, 25.0),
        seller("seller_2", "PriceyPlace", 70.0, 50.0, 40.0),
    ];

    let events = collect(provider, room(sellers, 10), EngineConfig::default()).await;
    assert_stream_invariants(&events);

    let decision = events
        .iter()
        .find_map(|e| match &e.kind {
            EventKind::Decision {
                chosen_seller_name,
                final_price,
                final_quantity,
                total_cost,
                ..
            } => Some((
                chosen_seller_name.clone(),
                *final_price,
                *final_quantity,
                *total_cost,
            )),
            _ => None,
        })
        .expect("a decision event");
    assert_eq!(decision.0, "TechStore");
    assert_eq!(decision.1, 45.0);
    assert_eq!(decision.2, 2);
    assert_eq!(decision.3, 90.0);

    match &events.last().unwrap().kind {
        EventKind::NegotiationComplete {
            selected_seller_id,
            final_offer,
            rounds,
            ..
        } => {
            assert_eq!(selected_seller_id, &Some(SellerId::new("seller_1")));
            assert_eq!(final_offer.as_ref().unwrap().price_per_unit, 45.0);
            // min_rounds gate forces at least two rounds
            assert_eq!(*rounds, 2);
        }
        other => panic!("expected negotiation_complete, got {:?}", other),
    }
}

#[tokio::test]
async fn round_exhaustion_completes_with_null_selection() {
    let provider = ScriptedProvider::new()
        .with_seller("TechStore", SellerScript::Reply("Thinking about it."));
    let sellers = vec![seller("seller_1", "TechStore", 60.0, 35.0, 25.0)];

    let events = collect(provider, room(sellers, 3), EngineConfig::default()).await;
    assert_stream_invariants(&events);

    let round_starts = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::RoundStart { .. }))
        .count();
    assert_eq!(round_starts, 3);

    match &events.last().unwrap().kind {
        EventKind::NegotiationComplete {
            selected_seller_id,
            selected_seller_name,
            final_offer,
            reason,
            rounds,
        } => {
            assert_eq!(selected_seller_id, &None);
            assert_eq!(selected_seller_name, &None);
            assert!(final_offer.is_none());
            assert_eq!(reason.as_deref(), Some("Max rounds reached"));
            assert_eq!(*rounds, 3);
        }
        other => panic!("expected negotiation_complete, got {:?}", other),
    }
}

#[tokio::test]
async fn buyer_failure_aborts_with_exactly_one_error_event() {
    let provider = ScriptedProvider::new()
        .with_failing_buyer()
        .with_seller("TechStore", SellerScript::Reply(OFFER_45));
    let sellers = vec![seller("seller_1", "TechStore", 60.0, 35.0, 25.0)];

    let events = collect(provider, room(sellers, 10), EngineConfig::default()).await;
    assert_stream_invariants(&events);

    match &events.last().unwrap().kind {
        EventKind::Error { error, round } => {
            assert_eq!(*round, 1);
            assert!(error.contains("Buyer turn failed"));
        }
        other => panic!("expected error event, got {:?}", other),
    }
    // The failed round produced no buyer or seller messages
    assert!(!events
        .iter()
        .any(|e| matches!(e.kind, EventKind::BuyerMessage { .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e.kind, EventKind::SellerResponse { .. })));
}

#[tokio::test]
async fn mentions_route_to_only_the_mentioned_seller() {
    let provider = ScriptedProvider::new()
        .with_buyer_reply("@GadgetHub can you beat everyone else?")
        .with_seller("TechStore", SellerScript::Reply(OFFER_45))
        .with_seller("GadgetHub", SellerScript::Reply(OFFER_45))
        .with_seller("ByteBarn", SellerScript::Reply(OFFER_45));
    let sellers = vec![
        seller("seller_1", "TechStore", 60.0, 35.0, 25.0),
        seller("seller_2", "GadgetHub", 60.0, 35.0, 25.0),
        seller("seller_3", "ByteBarn", 60.0, 35.0, 25.0),
    ];

    let events = collect(provider, room(sellers, 1), EngineConfig::default()).await;
    assert_stream_invariants(&events);

    let senders = seller_response_senders(&events);
    assert_eq!(senders, HashSet::from(["GadgetHub".to_string()]));
}

#[tokio::test]
async fn seller_failures_are_isolated_and_do_not_abort_the_round() {
    let provider = ScriptedProvider::new()
        .with_seller("TechStore", SellerScript::Reply(OFFER_45))
        .with_seller("FlakyMart", SellerScript::Fail)
        .with_seller("ByteBarn", SellerScript::Reply(OFFER_45));
    let sellers = vec![
        seller("seller_1", "TechStore", 60.0, 35.0, 25.0),
        seller("seller_2", "FlakyMart", 60.0, 35.0, 25.0),
        seller("seller_3", "ByteBarn", 60.0, 35.0, 25.0),
    ];

    let events = collect(provider, room(sellers, 1), EngineConfig::default()).await;
    assert_stream_invariants(&events);

    // Membership assertion, not order: same-round seller responses interleave
    let senders = seller_response_senders(&events);
    assert_eq!(
        senders,
        HashSet::from(["TechStore".to_string(), "ByteBarn".to_string()])
    );
    // Seller-level failure is not a room-level error
    assert!(!events.iter().any(|e| matches!(e.kind, EventKind::Error { .. })));
}

#[tokio::test]
async fn ceiling_violation_cannot_be_accepted_even_when_named() {
    // The only standing offer is above the ceiling; the classifier tries to
    // accept it anyway
    let provider = ScriptedProvider::new()
        .with_seller("PriceyPlace", SellerScript::Reply(OFFER_55))
        .with_decision_reply("ACCEPT PriceyPlace")
        .with_decision_reply("ACCEPT PriceyPlace")
        .with_decision_reply("ACCEPT PriceyPlace");
    let sellers = vec![seller("seller_1", "PriceyPlace", 70.0, 50.0, 40.0)];

    let events = collect(provider, room(sellers, 3), EngineConfig::default()).await;
    assert_stream_invariants(&events);

    assert!(!events
        .iter()
        .any(|e| matches!(e.kind, EventKind::Decision { .. })));
    match &events.last().unwrap().kind {
        EventKind::NegotiationComplete {
            selected_seller_id, ..
        } => assert_eq!(selected_seller_id, &None),
        other => panic!("expected negotiation_complete, got {:?}", other),
    }
}

#[tokio::test]
async fn round_counter_never_exceeds_the_limit() {
    let provider = ScriptedProvider::new()
        .with_seller("TechStore", SellerScript::Reply("Still thinking."));
    let sellers = vec![seller("seller_1", "TechStore", 60.0, 35.0, 25.0)];

    let events = collect(provider, room(sellers, 5), EngineConfig::default()).await;

    let max_seen = events
        .iter()
        .filter_map(|e| match e.kind {
            EventKind::RoundStart { round_number, .. } => Some(round_number),
            _ => None,
        })
        .max()
        .unwrap();
    assert!(max_seen <= 5);
}

#[tokio::test]
async fn room_without_sellers_aborts_with_an_error() {
    let provider = ScriptedProvider::new();
    let events = collect(provider, room(vec![], 10), EngineConfig::default()).await;
    assert_stream_invariants(&events);

    match &events.last().unwrap().kind {
        EventKind::Error { error, round } => {
            assert_eq!(*round, 1);
            assert!(error.contains("No sellers available"));
        }
        other => panic!("expected error event, got {:?}", other),
    }
}

#[tokio::test]
async fn seeded_runs_make_the_same_decision() {
    // Two equal-priced valid offers; the accept names no one, so the
    // cheapest-after-tie-break wins. Same seed, same winner.
    let run = |seed: u64| async move {
        let provider = ScriptedProvider::new()
            .with_seller("TechStore", SellerScript::Reply(OFFER_45))
            .with_seller("GadgetHub", SellerScript::Reply(OFFER_45))
            .with_decision_reply("ACCEPT")
            .with_decision_reply("ACCEPT");
        let sellers = vec![
            seller("seller_1", "TechStore", 60.0, 35.0, 25.0),
            seller("seller_2", "GadgetHub", 60.0, 35.0, 25.0),
        ];
        let room = room(sellers, 10).with_seed(seed);
        let events = collect(provider, room, EngineConfig::default()).await;
        events
            .iter()
            .find_map(|e| match &e.kind {
                EventKind::Decision {
                    chosen_seller_id, ..
                } => Some(chosen_seller_id.clone()),
                _ => None,
            })
            .expect("a decision event")
    };

    let first = run(42).await;
    let second = run(42).await;
    assert_eq!(first, second);
}
