//! Turn and phase progression: `reset -> draw -> main`, end-of-turn
//! cleanup, and forced skipping of turns with no legal action.

use super::game_state::GameState;
use super::handlers;
use super::suppression;
use super::types::{ActionPayload, BoardCard, Phase};
use crate::cards::AvailableActionsProbe;
use log::debug;

/// Run the current phase's action and advance to the next phase.
/// `Main` is sticky: it stays current until an end-turn request.
pub fn progress_phase(state: &mut GameState) -> String {
    match state.turn.phase {
        Phase::Reset => {
            reset_phase_action(state);
            state.turn.phase = Phase::Draw;
            "reset phase: board readied".to_string()
        }
        Phase::Draw => {
            let player = state.turn.current_player;
            let drawn = handlers::draw_cards(state, player, 1);
            state.turn.phase = Phase::Main;
            if drawn == 0 {
                "draw phase: no cards left in deck".to_string()
            } else {
                "draw phase: drew 1 card".to_string()
            }
        }
        Phase::Main => "main phase: waiting for actions".to_string(),
    }
}

// Ready the current player's side: clear rested/sickness flags, zero the
// attack counters, and ready every rested DON!! regardless of amount.
fn reset_phase_action(state: &mut GameState) {
    let player = state.turn.current_player;
    let side = state.player_mut(player);
    if let Some(leader) = side.leader.as_mut() {
        refresh(leader);
    }
    for card in side.board.iter_mut() {
        refresh(card);
    }
    side.don.ready_all();
    state.append_action("PhaseReset", ActionPayload::PhaseReset { player });
}

fn refresh(card: &mut BoardCard) {
    card.rested = false;
    card.attacks_this_turn = 0;
    card.summoning_sickness = false;
}

/// Hand the turn to the opponent: swap the current player, bump the turn
/// number, then run the suppression registry's cleanup pass exactly once.
pub fn end_turn(state: &mut GameState) {
    let ending = state.turn.current_player;
    state.turn.current_player = ending.opponent();
    state.turn.number += 1;
    state.turn.phase = Phase::Reset;
    suppression::cleanup(state);
    state.append_action("TurnEnded", ActionPayload::TurnEnded { player: ending });
}

/// `end_turn` plus an immediate synchronous reset pass; used when a turn is
/// skipped without the usual caller-driven phase requests.
pub fn advance_turn(state: &mut GameState) {
    end_turn(state);
    reset_phase_action(state);
    state.turn.phase = Phase::Draw;
}

/// End the current turn, then probe the incoming player for a playable
/// action. A player with nothing to do is skipped outright: the engine
/// performs a second turn transition and runs their phase cycle for them.
/// A probe failure means "no info" and never blocks the flow.
pub fn request_end_turn(state: &mut GameState, probe: &dyn AvailableActionsProbe) -> String {
    end_turn(state);
    let next = state.turn.current_player;
    let side = state.player(next);
    match probe.has_playable_action(&side.hand, &side.don) {
        Ok(false) => {
            state.append_action("TurnSkipped", ActionPayload::TurnSkipped { player: next });
            advance_turn(state);
            progress_phase(state);
            format!("turn ended; {next:?} had no available action and was skipped")
        }
        Ok(true) => "turn ended".to_string(),
        Err(e) => {
            debug!("available-actions probe failed, not skipping: {e}");
            "turn ended".to_string()
        }
    }
}
