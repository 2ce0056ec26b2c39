use rocket::serde::{self, Deserialize, Serialize};
use rocket_okapi::JsonSchema;

/// One of the two seats in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub enum PlayerId {
    Player1,
    Player2,
}

impl PlayerId {
    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::Player1 => PlayerId::Player2,
            PlayerId::Player2 => PlayerId::Player1,
        }
    }
}

/// Phases a turn moves through. `Main` stays current until an end-turn request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub enum Phase {
    Reset,
    Draw,
    Main,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct TurnState {
    /// Starts at 1; incremented on every end-turn transition.
    pub number: u32,
    pub current_player: PlayerId,
    pub phase: Phase,
}

/// The DON!! resource of one player.
///
/// `total` counts cards ever attached; `active` is spendable now; `rested`
/// returns to `active` at that player's next reset phase.
/// Invariant: `active + rested <= total`, all counters non-negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct DonPool {
    pub total: u32,
    pub active: u32,
    pub rested: u32,
}

impl DonPool {
    /// Attach `amount` new DON!! cards; they arrive active.
    pub fn attach(&mut self, amount: u32) {
        self.total += amount;
        self.active += amount;
    }

    /// Remove up to `amount` from the active pool. Returns how many were spent.
    pub fn spend(&mut self, amount: u32) -> u32 {
        let spent = amount.min(self.active);
        self.active -= spent;
        spent
    }

    /// Move up to `amount` from active to rested. Returns how many moved.
    pub fn rest(&mut self, amount: u32) -> u32 {
        let moved = amount.min(self.active);
        self.active -= moved;
        self.rested += moved;
        moved
    }

    /// Move up to `amount` from rested back to active. Returns how many moved.
    pub fn ready(&mut self, amount: u32) -> u32 {
        let moved = amount.min(self.rested);
        self.rested -= moved;
        self.active += moved;
        moved
    }

    /// Ready every rested DON!!; runs at each reset phase.
    pub fn ready_all(&mut self) {
        self.active += self.rested;
        self.rested = 0;
    }
}

/// Printed type of a card. Only leaders and characters are attackable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub enum CardType {
    Leader,
    Character,
    Event,
    Stage,
}

/// A card in play: the leader or a card occupying a board slot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct BoardCard {
    /// Stable per-instance identity, unique within a match.
    pub id: String,
    /// Catalog id this instance was played from.
    pub card_id: String,
    pub name: String,
    pub card_type: CardType,
    pub power: i64,
    pub traits: Vec<String>,
    pub rested: bool,
    pub attacks_this_turn: u32,
    pub summoning_sickness: bool,
    pub can_attack_multiple_times: bool,
}

/// Everything one player owns during a match.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct PlayerState {
    pub life: u32,
    /// Ordered; cards are drawn to the back and costs trim from the front.
    pub hand: Vec<String>,
    pub board: Vec<BoardCard>,
    /// Ordered; draws come from the front.
    pub deck: Vec<String>,
    pub trash: Vec<String>,
    pub don: DonPool,
    /// Delta applied on top of card power during combat checks.
    pub power_buff: i64,
    /// Absent only before setup.
    pub leader: Option<BoardCard>,
}

/// How long a suppression entry survives; cleanup rules live in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub enum SuppressionDuration {
    UntilEndOfTurn,
    UntilEndOfOpponentTurn,
    UntilEndOfOpponentNextTurn,
    Permanent,
    /// Unrecognized durations are kept forever, like `Permanent`.
    Unrecognized,
}

// Card data may carry duration strings this engine has never heard of;
// those must degrade to `Unrecognized` instead of failing the whole card.
impl<'de> Deserialize<'de> for SuppressionDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "untilEndOfTurn" => SuppressionDuration::UntilEndOfTurn,
            "untilEndOfOpponentTurn" => SuppressionDuration::UntilEndOfOpponentTurn,
            "untilEndOfOpponentNextTurn" => SuppressionDuration::UntilEndOfOpponentNextTurn,
            "permanent" => SuppressionDuration::Permanent,
            _ => SuppressionDuration::Unrecognized,
        })
    }
}

/// A temporary block on one player's effects, created by `negateEffects`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct SuppressionEntry {
    /// The player whose effects are silenced.
    pub target: PlayerId,
    /// Matched against the trigger tag of incoming effects.
    pub filter: Option<String>,
    pub duration: SuppressionDuration,
    pub created_turn: u32,
}

/// Declarative description of one card ability, owned by the card data
/// collaborator and consumed read-only. Unknown or missing sub-fields must
/// not break resolution; everything here is optional except for semantics
/// documented per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct EffectDescriptor {
    /// Trigger tag such as `onPlay`, `onAttack` or `Activate:<label>`.
    /// Absent means the effect fires whenever the card resolves.
    #[serde(default)]
    pub trigger: Option<String>,
    /// Key into the effect handler registry. Absent or unknown keys are
    /// logged as `UnhandledEffect` and skipped.
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub condition: Option<ConditionDescriptor>,
    /// Optional effects are deferred into the pending-choice queue instead
    /// of running immediately.
    #[serde(default)]
    pub optional: bool,
    /// Trigger-tag filter for suppression-type effects.
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub duration: Option<SuppressionDuration>,
    // Declared by card data but not consulted when ordering resolution.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub timing: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
}

/// Predicate gating an effect. Unknown types evaluate to false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", tag = "type", rename_all = "camelCase")]
pub enum ConditionDescriptor {
    HasTrait {
        #[serde(rename = "trait")]
        trait_name: String,
    },
    DonThreshold {
        min: u32,
    },
    OpponentHasCard {
        #[serde(default)]
        min: Option<u32>,
    },
    /// Checks (and, when the gated effect runs, trims) the hand — not the
    /// trash zone, despite the name. The cost it describes is paid by the
    /// resolution pipeline before the handler is invoked.
    TrashCard {
        #[serde(default)]
        amount: Option<u32>,
    },
    #[serde(other)]
    Unknown,
}

/// A deferred optional effect awaiting an accept/decline decision.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct PendingChoice {
    pub player: PlayerId,
    pub card_id: String,
    pub effect: EffectDescriptor,
}

/// An interrupt window pushed while a multi-step effect is in flight.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", tag = "kind")]
pub enum StackEntry {
    Combat {
        player: PlayerId,
        attacker: String,
        target: String,
        attacker_power: i64,
        target_power: i64,
    },
}

/// Payloads for the append-only action log.
///
/// Player-initiated commands (`SetSeed`, `PlayCard`, `ResolveChoice`,
/// `EndTurn`, `ProgressPhase`, `Attack`) are what replay re-applies; the
/// rest are audit records appended by the engine and never read back by it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", tag = "type")]
pub enum ActionPayload {
    // Player-initiated commands
    SetSeed {
        seed: u64,
    },
    PlayCard {
        player: PlayerId,
        card_id: String,
    },
    ResolveChoice {
        player: PlayerId,
        index: usize,
        accept: bool,
    },
    EndTurn {
        player: PlayerId,
    },
    ProgressPhase {
        player: PlayerId,
    },
    Attack {
        player: PlayerId,
        attacker: String,
        target: String,
    },
    // Audit records
    DrawCard {
        player: PlayerId,
        requested: u32,
        drawn: u32,
    },
    AttachDon {
        player: PlayerId,
        amount: u32,
    },
    DonMinus {
        player: PlayerId,
        spent: u32,
    },
    RestDon {
        player: PlayerId,
        moved: u32,
    },
    ReadyDon {
        player: PlayerId,
        moved: u32,
    },
    GivePower {
        player: PlayerId,
        amount: i64,
    },
    ReducePower {
        player: PlayerId,
        amount: i64,
    },
    NegateEffects {
        player: PlayerId,
        target: PlayerId,
        filter: Option<String>,
        duration: SuppressionDuration,
    },
    AttackDeclared {
        player: PlayerId,
        attacker: String,
        target: String,
        attacker_power: i64,
        target_power: i64,
    },
    AttackBlocked {
        player: PlayerId,
        attacker: String,
        target: String,
        reason: String,
    },
    PhaseReset {
        player: PlayerId,
    },
    UnhandledEffect {
        player: PlayerId,
        action: String,
    },
    EffectApplied {
        player: PlayerId,
        card_id: String,
        action: String,
        accepted: bool,
    },
    OptionalEffectPrompt {
        player: PlayerId,
        card_id: String,
        action: String,
    },
    TurnEnded {
        player: PlayerId,
    },
    TurnSkipped {
        player: PlayerId,
    },
}

/// Stored entry in the append-only action log.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct ActionEntry {
    pub seq: u64,
    pub action_type: String,
    pub payload: ActionPayload,
    /// Milliseconds since the unix epoch, as a string.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn don_pool_spend_clamps_at_zero() {
        let mut don = DonPool {
            total: 5,
            active: 3,
            rested: 0,
        };
        let spent = don.spend(5);
        assert_eq!(spent, 3);
        assert_eq!(don.active, 0);
        assert_eq!(don.total, 5);
    }

    #[test]
    fn don_pool_rest_and_ready_conserve_totals() {
        let mut don = DonPool {
            total: 5,
            active: 5,
            rested: 0,
        };
        assert_eq!(don.rest(2), 2);
        assert_eq!(don.active, 3);
        assert_eq!(don.rested, 2);
        assert_eq!(don.active + don.rested, 5);

        assert_eq!(don.ready(1), 1);
        assert_eq!(don.active, 4);
        assert_eq!(don.rested, 1);
        assert_eq!(don.active + don.rested, 5);
    }

    #[test]
    fn don_pool_ready_all_empties_rested() {
        let mut don = DonPool {
            total: 6,
            active: 1,
            rested: 4,
        };
        don.ready_all();
        assert_eq!(don.active, 5);
        assert_eq!(don.rested, 0);
    }

    #[test]
    fn effect_descriptor_tolerates_missing_fields() {
        let parsed: EffectDescriptor =
            serde_json::from_str(r#"{ "action": "drawCard" }"#).expect("minimal descriptor");
        assert_eq!(parsed.action.as_deref(), Some("drawCard"));
        assert_eq!(parsed.amount, None);
        assert!(!parsed.optional);
        assert!(parsed.condition.is_none());
    }

    #[test]
    fn unknown_condition_type_parses_as_unknown() {
        let parsed: ConditionDescriptor =
            serde_json::from_str(r#"{ "type": "moonPhase", "phase": "full" }"#)
                .expect("unknown condition should still parse");
        assert_eq!(parsed, ConditionDescriptor::Unknown);
    }

    #[test]
    fn unrecognized_duration_parses_as_unrecognized() {
        let parsed: SuppressionDuration =
            serde_json::from_str(r#""untilTheSunExplodes""#).expect("duration");
        assert_eq!(parsed, SuppressionDuration::Unrecognized);
    }
}
