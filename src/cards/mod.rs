//! Card data collaborator interfaces and the bundled in-memory catalog.
//!
//! The engine only ever sees cards through `CardDataProvider`; the real
//! deployment fronts a content-management backend, which may be slow,
//! return not-found, or hand back descriptors with missing sub-fields.
//! Everything here degrades to log-and-skip rather than failing a match.

use crate::engine::game_state::PlayerSetup;
use crate::engine::types::{CardType, DonPool, EffectDescriptor};
use log::warn;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;
use std::collections::HashMap;

/// Static attributes of a card plus its declarative effect list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct CardData {
    pub id: String,
    pub name: String,
    pub card_type: CardType,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub power: i64,
    /// Leaders carry the starting life total.
    #[serde(default)]
    pub life: Option<u32>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub can_attack_multiple_times: bool,
    #[serde(default)]
    pub effect_logic: Vec<EffectDescriptor>,
}

/// Supplies card data by id. May suspend on I/O; must never be called with
/// another mutation of the same match in flight.
pub trait CardDataProvider {
    fn fetch(&self, card_id: &str) -> Result<Option<CardData>, String>;
}

/// Answers whether a hand plus a DON!! pool allows at least one play.
/// Consulted only to decide turn auto-skipping; failures mean "no info".
pub trait AvailableActionsProbe {
    fn has_playable_action(&self, hand: &[String], don: &DonPool) -> Result<bool, String>;
}

/// Probe backed by card data: playable iff some hand card's cost is
/// covered by the active DON!! count.
pub struct CostedHandProbe<'a> {
    pub provider: &'a dyn CardDataProvider,
}

impl AvailableActionsProbe for CostedHandProbe<'_> {
    fn has_playable_action(&self, hand: &[String], don: &DonPool) -> Result<bool, String> {
        for card_id in hand {
            if let Some(card) = self.provider.fetch(card_id)? {
                if card.cost <= don.active {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

/// In-memory card catalog. Index by catalog id.
#[derive(Debug, Clone, Default)]
pub struct CardLibrary {
    pub cards: HashMap<String, CardData>,
}

impl CardLibrary {
    pub fn new() -> Self {
        CardLibrary {
            cards: HashMap::new(),
        }
    }

    pub fn insert(&mut self, card: CardData) {
        self.cards.insert(card.id.clone(), card);
    }

    /// Parse an `effect_logic` array, skipping entries that do not
    /// deserialize instead of rejecting the whole card.
    pub fn parse_effect_list(card_id: &str, value: serde_json::Value) -> Vec<EffectDescriptor> {
        let entries = match value {
            serde_json::Value::Array(entries) => entries,
            serde_json::Value::Null => return Vec::new(),
            other => {
                warn!("card {card_id}: effect_logic is not an array: {other}");
                return Vec::new();
            }
        };
        let mut effects = Vec::new();
        for entry in entries {
            match serde_json::from_value::<EffectDescriptor>(entry) {
                Ok(effect) => effects.push(effect),
                Err(e) => warn!("card {card_id}: skipping malformed effect: {e}"),
            }
        }
        effects
    }

    /// The bundled demo catalog: two leaders and a small pool that touches
    /// every handler and condition the engine knows.
    pub fn standard() -> Self {
        let mut lib = CardLibrary::new();

        lib.insert(CardData {
            id: "ST01-001".to_string(),
            name: "Red Captain".to_string(),
            card_type: CardType::Leader,
            cost: 0,
            power: 5000,
            life: Some(5),
            traits: vec!["Straw Hat Crew".to_string()],
            can_attack_multiple_times: false,
            effect_logic: Self::parse_effect_list(
                "ST01-001",
                serde_json::json!([
                    { "trigger": "onAttack", "action": "givePower", "amount": 1000 }
                ]),
            ),
        });

        lib.insert(CardData {
            id: "ST02-001".to_string(),
            name: "Blue Admiral".to_string(),
            card_type: CardType::Leader,
            cost: 0,
            power: 5000,
            life: Some(5),
            traits: vec!["Navy".to_string()],
            can_attack_multiple_times: false,
            effect_logic: Vec::new(),
        });

        lib.insert(CardData {
            id: "ST01-004".to_string(),
            name: "Lookout".to_string(),
            card_type: CardType::Character,
            cost: 0,
            power: 3000,
            life: None,
            traits: vec!["Straw Hat Crew".to_string()],
            can_attack_multiple_times: false,
            effect_logic: Self::parse_effect_list(
                "ST01-004",
                serde_json::json!([
                    { "trigger": "onPlay", "action": "drawCard", "amount": 1 }
                ]),
            ),
        });

        lib.insert(CardData {
            id: "ST01-006".to_string(),
            name: "First Mate".to_string(),
            card_type: CardType::Character,
            cost: 1,
            power: 4000,
            life: None,
            traits: vec!["Straw Hat Crew".to_string()],
            can_attack_multiple_times: false,
            effect_logic: Self::parse_effect_list(
                "ST01-006",
                serde_json::json!([
                    { "trigger": "onPlay", "action": "givePower", "amount": 1000, "optional": true }
                ]),
            ),
        });

        lib.insert(CardData {
            id: "ST01-008".to_string(),
            name: "Helmsman".to_string(),
            card_type: CardType::Character,
            cost: 1,
            power: 4000,
            life: None,
            traits: vec!["Straw Hat Crew".to_string()],
            can_attack_multiple_times: false,
            effect_logic: Self::parse_effect_list(
                "ST01-008",
                serde_json::json!([
                    {
                        "trigger": "onPlay",
                        "action": "givePower",
                        "amount": 2000,
                        "condition": { "type": "hasTrait", "trait": "Straw Hat Crew" }
                    }
                ]),
            ),
        });

        lib.insert(CardData {
            id: "OP01-013".to_string(),
            name: "Twin Blade".to_string(),
            card_type: CardType::Character,
            cost: 3,
            power: 6000,
            life: None,
            traits: vec![],
            can_attack_multiple_times: true,
            effect_logic: Vec::new(),
        });

        lib.insert(CardData {
            id: "ST02-004".to_string(),
            name: "Silencer".to_string(),
            card_type: CardType::Character,
            cost: 0,
            power: 2000,
            life: None,
            traits: vec!["Navy".to_string()],
            can_attack_multiple_times: false,
            effect_logic: Self::parse_effect_list(
                "ST02-004",
                serde_json::json!([
                    {
                        "trigger": "onPlay",
                        "action": "negateEffects",
                        "filter": "onPlay",
                        "duration": "untilEndOfTurn"
                    }
                ]),
            ),
        });

        lib.insert(CardData {
            id: "ST01-024".to_string(),
            name: "Rally the Crew".to_string(),
            card_type: CardType::Event,
            cost: 0,
            power: 0,
            life: None,
            traits: vec![],
            can_attack_multiple_times: false,
            effect_logic: Self::parse_effect_list(
                "ST01-024",
                serde_json::json!([
                    { "action": "attachDon", "amount": 2 }
                ]),
            ),
        });

        lib.insert(CardData {
            id: "OP01-029".to_string(),
            name: "Desperate Gambit".to_string(),
            card_type: CardType::Event,
            cost: 1,
            power: 0,
            life: None,
            traits: vec![],
            can_attack_multiple_times: false,
            effect_logic: Self::parse_effect_list(
                "OP01-029",
                serde_json::json!([
                    {
                        "action": "drawCard",
                        "amount": 2,
                        "condition": { "type": "trashCard", "amount": 1 }
                    }
                ]),
            ),
        });

        lib.insert(CardData {
            id: "OP01-016".to_string(),
            name: "Pressure".to_string(),
            card_type: CardType::Event,
            cost: 0,
            power: 0,
            life: None,
            traits: vec![],
            can_attack_multiple_times: false,
            effect_logic: Self::parse_effect_list(
                "OP01-016",
                serde_json::json!([
                    {
                        "action": "reducePower",
                        "amount": 2000,
                        "condition": { "type": "opponentHasCard" }
                    },
                    { "action": "restDon", "amount": 1, "condition": { "type": "donThreshold", "min": 1 } }
                ]),
            ),
        });

        lib
    }
}

impl CardDataProvider for CardLibrary {
    fn fetch(&self, card_id: &str) -> Result<Option<CardData>, String> {
        Ok(self.cards.get(card_id).cloned())
    }
}

/// Leader and 15-card deck lists used for the default demo match: after the
/// opening draw of 5, each deck holds 10 cards.
pub fn standard_setups() -> (PlayerSetup, PlayerSetup) {
    let deck1: Vec<String> = [
        "ST01-004", "ST01-004", "ST01-004", "ST01-006", "ST01-006", "ST01-008", "ST01-008",
        "OP01-013", "OP01-013", "ST01-024", "ST01-024", "ST01-024", "OP01-029", "OP01-029",
        "OP01-016",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let deck2: Vec<String> = [
        "ST02-004", "ST02-004", "ST02-004", "ST02-004", "ST01-024", "ST01-024", "ST01-024",
        "OP01-016", "OP01-016", "OP01-029", "OP01-029", "OP01-013", "OP01-013", "ST01-006",
        "ST01-006",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    (
        PlayerSetup {
            leader: "ST01-001".to_string(),
            deck: deck1,
        },
        PlayerSetup {
            leader: "ST02-001".to_string(),
            deck: deck2,
        },
    )
}
