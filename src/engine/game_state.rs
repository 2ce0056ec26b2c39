use super::action_log::ActionLog;
use super::combat;
use super::handlers;
use super::resolution::{self, TriggerContext};
use super::types::{
    ActionEntry, ActionPayload, BoardCard, CardType, DonPool, PendingChoice, Phase, PlayerId,
    PlayerState, StackEntry, SuppressionEntry, TurnState,
};
use crate::action::persistence::FileWriter;
use crate::cards::{AvailableActionsProbe, CardData, CardDataProvider, CardLibrary};
use log::warn;
use rand::{RngCore, SeedableRng};
use rand_pcg::Lcg64Xsh32;
use rocket::serde::Serialize;
use rocket_okapi::JsonSchema;
use std::sync::Arc;

/// Character and stage slots available on one side of the board.
pub const MAX_BOARD_SLOTS: usize = 5;

/// Opening hand size drawn at match setup.
pub const OPENING_HAND: usize = 5;

/// Leader and deck list one player brings into a match.
#[derive(Debug, Clone)]
pub struct PlayerSetup {
    pub leader: String,
    pub deck: Vec<String>,
}

/// Both seats of a match.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct Players {
    pub player1: PlayerState,
    pub player2: PlayerState,
}

/// The shared mutable state of one match. Explicitly constructed and owned
/// by the caller; every engine operation threads through an instance, there
/// is no process-wide singleton.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct GameState {
    #[serde(skip)]
    #[schemars(skip)]
    pub action_log: Arc<ActionLog>,
    pub turn: TurnState,
    pub players: Players,
    pub effect_suppression: Vec<SuppressionEntry>,
    pub effect_stack: Vec<StackEntry>,
    pub pending_triggers: Vec<PendingChoice>,
    #[serde(skip)]
    #[schemars(skip)]
    next_instance: u64,
}

fn seed_bytes(seed: u64) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    bytes[0..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..16].copy_from_slice(&seed.to_le_bytes());
    bytes
}

fn shuffle(rng: &mut Lcg64Xsh32, cards: &mut [String]) {
    for i in (1..cards.len()).rev() {
        let j = (rng.next_u64() as usize) % (i + 1);
        cards.swap(i, j);
    }
}

impl GameState {
    /// Fresh match over the standard card set, seeded for determinism.
    pub fn new(seed: u64) -> Self {
        let library = CardLibrary::standard();
        let (p1, p2) = crate::cards::standard_setups();
        Self::with_setup(seed, p1, p2, &library)
            .expect("standard card set always produces a valid match")
    }

    /// Fresh match with explicit decks: shuffle both decks, draw opening
    /// hands, place leaders. Fails when a leader id does not resolve to a
    /// leader card.
    pub fn with_setup(
        seed: u64,
        p1: PlayerSetup,
        p2: PlayerSetup,
        provider: &dyn CardDataProvider,
    ) -> Result<Self, String> {
        let mut rng = Lcg64Xsh32::from_seed(seed_bytes(seed));
        let mut next_instance = 0u64;
        let player1 = Self::setup_player(&mut rng, &p1, provider, &mut next_instance)?;
        let player2 = Self::setup_player(&mut rng, &p2, provider, &mut next_instance)?;

        let action_log = match std::env::var("ACTION_LOG_FILE") {
            Ok(path) => {
                let mut log = ActionLog::load_from_file(&path).unwrap_or_else(|_| ActionLog::new());
                if let Ok(writer) = FileWriter::new(std::path::PathBuf::from(&path)) {
                    log.set_writer(Some(writer));
                }
                log
            }
            Err(_) => ActionLog::new(),
        };

        Ok(GameState {
            action_log: Arc::new(action_log),
            turn: TurnState {
                number: 1,
                current_player: PlayerId::Player1,
                phase: Phase::Main,
            },
            players: Players { player1, player2 },
            effect_suppression: Vec::new(),
            effect_stack: Vec::new(),
            pending_triggers: Vec::new(),
            next_instance,
        })
    }

    fn setup_player(
        rng: &mut Lcg64Xsh32,
        setup: &PlayerSetup,
        provider: &dyn CardDataProvider,
        next_instance: &mut u64,
    ) -> Result<PlayerState, String> {
        let leader_data = provider
            .fetch(&setup.leader)?
            .ok_or_else(|| format!("leader card {} not found", setup.leader))?;
        if leader_data.card_type != CardType::Leader {
            return Err(format!("card {} is not a leader", setup.leader));
        }
        let mut deck = setup.deck.clone();
        shuffle(rng, &mut deck);
        let opening = OPENING_HAND.min(deck.len());
        let hand: Vec<String> = deck.drain(..opening).collect();
        let leader = Self::instantiate(&leader_data, next_instance, false);
        Ok(PlayerState {
            life: leader_data.life.unwrap_or(5),
            hand,
            board: Vec::new(),
            deck,
            trash: Vec::new(),
            don: DonPool::default(),
            power_buff: 0,
            leader: Some(leader),
        })
    }

    fn instantiate(card: &CardData, next_instance: &mut u64, summoning_sickness: bool) -> BoardCard {
        *next_instance += 1;
        BoardCard {
            id: format!("{}#{}", card.id, next_instance),
            card_id: card.id.clone(),
            name: card.name.clone(),
            card_type: card.card_type,
            power: card.power,
            traits: card.traits.clone(),
            rested: false,
            attacks_this_turn: 0,
            summoning_sickness,
            can_attack_multiple_times: card.can_attack_multiple_times,
        }
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        match id {
            PlayerId::Player1 => &self.players.player1,
            PlayerId::Player2 => &self.players.player2,
        }
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        match id {
            PlayerId::Player1 => &mut self.players.player1,
            PlayerId::Player2 => &mut self.players.player2,
        }
    }

    /// Append an entry to the audit log; returns the appended entry.
    pub fn append_action(&self, action_type: &str, payload: ActionPayload) -> ActionEntry {
        self.action_log.append(action_type, payload)
    }

    /// Play a card from hand: validate, pay the DON!! cost, move the card
    /// to its zone, then run its `onPlay` resolution pass. Returns the
    /// optional effects now awaiting a decision. Rejections leave the state
    /// untouched.
    pub fn play_card(
        &mut self,
        player: PlayerId,
        card_id: &str,
        provider: &dyn CardDataProvider,
    ) -> Result<Vec<PendingChoice>, String> {
        if player != self.turn.current_player {
            return Err("it is not your turn".to_string());
        }
        if self.turn.phase != Phase::Main {
            return Err("cards can only be played in the main phase".to_string());
        }
        let hand_index = self
            .player(player)
            .hand
            .iter()
            .position(|c| c == card_id)
            .ok_or_else(|| format!("card {card_id} is not in hand"))?;
        let card = provider
            .fetch(card_id)?
            .ok_or_else(|| format!("card {card_id} not found"))?;
        if card.card_type == CardType::Leader {
            return Err("leader cards cannot be played from hand".to_string());
        }
        let active = self.player(player).don.active;
        if active < card.cost {
            return Err(format!(
                "insufficient DON!!: cost {} but only {active} active",
                card.cost
            ));
        }
        if matches!(card.card_type, CardType::Character | CardType::Stage)
            && self.player(player).board.len() >= MAX_BOARD_SLOTS
        {
            return Err("board is full".to_string());
        }

        // Validation done; everything below mutates.
        self.player_mut(player).don.rest(card.cost);
        self.player_mut(player).hand.remove(hand_index);
        match card.card_type {
            CardType::Character | CardType::Stage => {
                let sickness = card.card_type == CardType::Character;
                let instance = Self::instantiate(&card, &mut self.next_instance, sickness);
                self.player_mut(player).board.push(instance);
            }
            CardType::Event => {
                self.player_mut(player).trash.push(card.id.clone());
            }
            CardType::Leader => unreachable!("rejected above"),
        }
        Ok(resolution::resolve_effects(self, &card, player, TriggerContext::Play))
    }

    /// Apply or discard one pending optional effect through the same
    /// handler dispatch path the pipeline uses.
    pub fn resolve_pending_choice(
        &mut self,
        player: PlayerId,
        index: usize,
        accept: bool,
    ) -> Result<String, String> {
        if index >= self.pending_triggers.len() {
            return Err(format!("no pending choice at index {index}"));
        }
        if self.pending_triggers[index].player != player {
            return Err("pending choice belongs to the other player".to_string());
        }
        let choice = self.pending_triggers.remove(index);
        let action = choice.effect.action.clone().unwrap_or_default();
        if accept {
            resolution::dispatch(self, &choice.effect, player);
        }
        self.append_action(
            "EffectApplied",
            ActionPayload::EffectApplied {
                player,
                card_id: choice.card_id.clone(),
                action: action.clone(),
                accepted: accept,
            },
        );
        Ok(if accept {
            format!("applied optional effect {action} of {}", choice.card_id)
        } else {
            format!("declined optional effect {action} of {}", choice.card_id)
        })
    }

    /// Declare an attack for `player`. Blocked attacks are ordinary
    /// outcomes; only phase/turn precondition failures are rejections.
    /// A successful declaration also fires the attacker's `onAttack`
    /// effects when card data is available.
    pub fn attempt_attack(
        &mut self,
        player: PlayerId,
        attacker_ref: &str,
        target_ref: &str,
        provider: &dyn CardDataProvider,
    ) -> Result<String, String> {
        if player != self.turn.current_player {
            return Err("it is not your turn".to_string());
        }
        if self.turn.phase != Phase::Main {
            return Err("attacks can only be declared in the main phase".to_string());
        }
        let attacker_card_id = combat::resolve_combatant(self.player(player), attacker_ref)
            .map(|c| c.card_id.clone());
        let outcome = handlers::attack(self, player, attacker_ref, target_ref);
        if outcome.allowed {
            if let Some(card_id) = attacker_card_id {
                match provider.fetch(&card_id) {
                    Ok(Some(card)) => {
                        resolution::resolve_effects(self, &card, player, TriggerContext::Attack);
                    }
                    Ok(None) => {}
                    Err(e) => warn!("card data fetch failed for {card_id}: {e}"),
                }
            }
        }
        Ok(outcome.message)
    }

    /// Reconstruct a match by re-applying the player-initiated command
    /// entries of an action log. Audit entries are regenerated by the
    /// replayed commands themselves. Deterministic for a given provider
    /// and probe.
    pub fn replay_from_log(
        log: &ActionLog,
        provider: &dyn CardDataProvider,
        probe: &dyn AvailableActionsProbe,
    ) -> GameState {
        let mut gs = GameState::new(0);
        for e in log.entries() {
            match &e.payload {
                ActionPayload::SetSeed { seed } => {
                    gs = GameState::new(*seed);
                }
                ActionPayload::PlayCard { player, card_id } => {
                    let _ = gs.play_card(*player, card_id, provider);
                }
                ActionPayload::ResolveChoice {
                    player,
                    index,
                    accept,
                } => {
                    let _ = gs.resolve_pending_choice(*player, *index, *accept);
                }
                ActionPayload::EndTurn { .. } => {
                    super::turn::request_end_turn(&mut gs, probe);
                }
                ActionPayload::ProgressPhase { .. } => {
                    super::turn::progress_phase(&mut gs);
                }
                ActionPayload::Attack {
                    player,
                    attacker,
                    target,
                } => {
                    let _ = gs.attempt_attack(*player, attacker, target, provider);
                }
                _ => {
                    // audit entries; regenerated during replay
                }
            }
        }
        gs
    }

    /// Graceful shutdown helper to flush and close any background writer.
    pub fn shutdown(&self) {
        if let Some(w) = &self.action_log.writer {
            w.close();
        }
    }
}
