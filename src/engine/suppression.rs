//! Registry of temporary effect blocks.
//!
//! Suppression is offensive: registering always targets the opponent of the
//! acting player. Entries are purged by `cleanup`, which runs exactly once
//! per end-of-turn transition.

use super::game_state::GameState;
use super::types::{
    ActionPayload, EffectDescriptor, PlayerId, SuppressionDuration, SuppressionEntry,
};

/// True iff a live entry targets `player` and its filter equals the
/// effect's trigger tag.
pub fn is_suppressed(effect: &EffectDescriptor, player: PlayerId, state: &GameState) -> bool {
    state
        .effect_suppression
        .iter()
        .any(|entry| {
            entry.target == player
                && entry.filter == effect.trigger
                && !is_expired(entry, state.turn.number)
        })
}

// Only the turn-counted duration can lapse between cleanup passes.
fn is_expired(entry: &SuppressionEntry, current_turn: u32) -> bool {
    match entry.duration {
        SuppressionDuration::UntilEndOfOpponentNextTurn => {
            current_turn.saturating_sub(entry.created_turn) >= 2
        }
        _ => false,
    }
}

/// Register a block against the opponent of `acting_player` and log it.
pub fn register(
    state: &mut GameState,
    acting_player: PlayerId,
    filter: Option<String>,
    duration: SuppressionDuration,
) {
    let target = acting_player.opponent();
    let created_turn = state.turn.number;
    state.effect_suppression.push(SuppressionEntry {
        target,
        filter: filter.clone(),
        duration,
        created_turn,
    });
    state.append_action(
        "NegateEffects",
        ActionPayload::NegateEffects {
            player: acting_player,
            target,
            filter,
            duration,
        },
    );
}

/// Purge expired entries. Must run once per end-of-turn transition, after
/// the current player has been swapped and the turn number incremented.
///
/// The `untilEndOfTurn` polarity is deliberate: the entry dies the moment
/// its *target* becomes the current player, so it survives through the
/// remainder of the caster's turn and nothing longer.
pub fn cleanup(state: &mut GameState) {
    let new_current = state.turn.current_player;
    let turn_number = state.turn.number;
    state.effect_suppression.retain(|entry| match entry.duration {
        SuppressionDuration::UntilEndOfTurn => entry.target != new_current,
        SuppressionDuration::UntilEndOfOpponentTurn => entry.target == new_current,
        SuppressionDuration::UntilEndOfOpponentNextTurn => {
            turn_number.saturating_sub(entry.created_turn) < 2
        }
        SuppressionDuration::Permanent | SuppressionDuration::Unrecognized => true,
    });
}
