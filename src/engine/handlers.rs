//! The effect handler registry.
//!
//! Handlers mutate the shared game state in place and append exactly one
//! audit record each. Dispatch is a closed enum rather than a string-keyed
//! map, so adding an action without wiring a handler fails to compile;
//! unknown keys arriving from card data fall through to `log_unhandled`.

use super::combat;
use super::game_state::GameState;
use super::suppression;
use super::types::{
    ActionPayload, EffectDescriptor, PlayerId, StackEntry, SuppressionDuration,
};

/// Every action the engine knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectAction {
    DrawCard,
    AttachDon,
    DonMinus,
    RestDon,
    ReadyDon,
    GivePower,
    ReducePower,
    NegateEffects,
    Attack,
}

impl EffectAction {
    /// Map an action key from card data onto the registry.
    pub fn from_key(key: &str) -> Option<EffectAction> {
        match key {
            "drawCard" => Some(EffectAction::DrawCard),
            "attachDon" => Some(EffectAction::AttachDon),
            "donMinus" => Some(EffectAction::DonMinus),
            "restDon" => Some(EffectAction::RestDon),
            "readyDon" => Some(EffectAction::ReadyDon),
            "givePower" => Some(EffectAction::GivePower),
            "reducePower" => Some(EffectAction::ReducePower),
            "negateEffects" => Some(EffectAction::NegateEffects),
            "attack" => Some(EffectAction::Attack),
            _ => None,
        }
    }
}

fn count_amount(effect: &EffectDescriptor, default: i64) -> u32 {
    effect.amount.unwrap_or(default).max(0) as u32
}

/// Apply one effect for `player`. Infallible by design: rule outcomes are
/// recorded in the log, invariant violations are clamped away.
pub fn apply(
    state: &mut GameState,
    action: EffectAction,
    effect: &EffectDescriptor,
    player: PlayerId,
) {
    match action {
        EffectAction::DrawCard => {
            draw_cards(state, player, count_amount(effect, 1));
        }
        EffectAction::AttachDon => {
            let amount = count_amount(effect, 1);
            state.player_mut(player).don.attach(amount);
            state.append_action("AttachDon", ActionPayload::AttachDon { player, amount });
        }
        EffectAction::DonMinus => {
            let spent = state.player_mut(player).don.spend(count_amount(effect, 1));
            state.append_action("DonMinus", ActionPayload::DonMinus { player, spent });
        }
        EffectAction::RestDon => {
            let moved = state.player_mut(player).don.rest(count_amount(effect, 1));
            state.append_action("RestDon", ActionPayload::RestDon { player, moved });
        }
        EffectAction::ReadyDon => {
            let moved = state.player_mut(player).don.ready(count_amount(effect, 1));
            state.append_action("ReadyDon", ActionPayload::ReadyDon { player, moved });
        }
        EffectAction::GivePower => {
            let amount = effect.amount.unwrap_or(1000);
            state.player_mut(player).power_buff += amount;
            state.append_action("GivePower", ActionPayload::GivePower { player, amount });
        }
        EffectAction::ReducePower => {
            let amount = effect.amount.unwrap_or(1000);
            state.player_mut(player).power_buff -= amount;
            state.append_action("ReducePower", ActionPayload::ReducePower { player, amount });
        }
        EffectAction::NegateEffects => {
            // register appends the NegateEffects record itself
            suppression::register(
                state,
                player,
                effect.filter.clone(),
                effect.duration.unwrap_or(SuppressionDuration::UntilEndOfTurn),
            );
        }
        EffectAction::Attack => {
            // Descriptor-driven attacks come from the leader; the target
            // metadata names the defender, defaulting to the enemy leader.
            let target_ref = effect.target.clone().unwrap_or_else(|| "leader".to_string());
            let _ = attack(state, player, "leader", &target_ref);
        }
    }
}

/// Move up to `requested` cards from the front of the deck to the hand.
/// Deck-out is not an error; however many cards remain are moved.
pub fn draw_cards(state: &mut GameState, player: PlayerId, requested: u32) -> u32 {
    let side = state.player_mut(player);
    let n = (requested as usize).min(side.deck.len());
    let drawn: Vec<String> = side.deck.drain(..n).collect();
    side.hand.extend(drawn);
    state.append_action(
        "DrawCard",
        ActionPayload::DrawCard {
            player,
            requested,
            drawn: n as u32,
        },
    );
    n as u32
}

/// Result of an attack declaration; blocked attacks are ordinary game
/// outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub allowed: bool,
    pub message: String,
}

fn blocked(
    state: &mut GameState,
    player: PlayerId,
    attacker_ref: &str,
    target_ref: &str,
    reason: String,
) -> AttackOutcome {
    state.append_action(
        "AttackBlocked",
        ActionPayload::AttackBlocked {
            player,
            attacker: attacker_ref.to_string(),
            target: target_ref.to_string(),
            reason: reason.clone(),
        },
    );
    AttackOutcome {
        allowed: false,
        message: format!("attack blocked: {reason}"),
    }
}

/// Declare an attack. On a disallowed attack this appends an
/// `AttackBlocked` record and stops without touching any other state; on an
/// allowed one it rests the attacker, counts the attack, logs it and pushes
/// an interrupt window onto the effect stack.
pub fn attack(
    state: &mut GameState,
    player: PlayerId,
    attacker_ref: &str,
    target_ref: &str,
) -> AttackOutcome {
    let powers = match combat::can_attack(state, player, attacker_ref, target_ref) {
        Ok(p) => p,
        Err(reason) => return blocked(state, player, attacker_ref, target_ref, reason),
    };

    let side = state.player_mut(player);
    let attacker = match if attacker_ref == "leader" {
        side.leader.as_mut()
    } else {
        side.board.iter_mut().find(|c| c.id == attacker_ref)
    } {
        Some(a) => a,
        // can_attack already resolved it above
        None => {
            let reason = format!("attacker {attacker_ref} not found");
            return blocked(state, player, attacker_ref, target_ref, reason);
        }
    };
    if attacker.attacks_this_turn >= 1 && !attacker.can_attack_multiple_times {
        let reason = format!("attacker {attacker_ref} has already attacked this turn");
        return blocked(state, player, attacker_ref, target_ref, reason);
    }
    attacker.rested = true;
    attacker.attacks_this_turn += 1;

    state.append_action(
        "AttackDeclared",
        ActionPayload::AttackDeclared {
            player,
            attacker: attacker_ref.to_string(),
            target: target_ref.to_string(),
            attacker_power: powers.attacker,
            target_power: powers.target,
        },
    );
    state.effect_stack.push(StackEntry::Combat {
        player,
        attacker: attacker_ref.to_string(),
        target: target_ref.to_string(),
        attacker_power: powers.attacker,
        target_power: powers.target,
    });
    AttackOutcome {
        allowed: true,
        message: format!("{attacker_ref} attacks {target_ref}"),
    }
}

/// Record an action key the registry does not know. Resolution continues.
pub fn log_unhandled(state: &mut GameState, player: PlayerId, action: &str) {
    state.append_action(
        "UnhandledEffect",
        ActionPayload::UnhandledEffect {
            player,
            action: action.to_string(),
        },
    );
}
