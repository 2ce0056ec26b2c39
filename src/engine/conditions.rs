//! Pure predicate evaluation for effect conditions.
//!
//! Safe to call repeatedly; never mutates game state. The `trashCard`
//! condition only *checks* the hand here — the resolution pipeline pays the
//! cost it describes.

use super::game_state::GameState;
use super::types::{ConditionDescriptor, PlayerId};
use log::warn;

/// Evaluate an optional condition for `player`. Absent conditions gate nothing.
pub fn evaluate(
    condition: Option<&ConditionDescriptor>,
    state: &GameState,
    player: PlayerId,
) -> bool {
    let condition = match condition {
        Some(c) => c,
        None => return true,
    };
    match condition {
        ConditionDescriptor::HasTrait { trait_name } => state
            .player(player)
            .board
            .iter()
            .any(|card| card.traits.iter().any(|t| t == trait_name)),
        ConditionDescriptor::DonThreshold { min } => {
            let don = &state.player(player).don;
            don.active.max(don.total) >= *min
        }
        ConditionDescriptor::OpponentHasCard { min } => {
            let needed = min.unwrap_or(1) as usize;
            state.player(player.opponent()).hand.len() >= needed
        }
        ConditionDescriptor::TrashCard { amount } => {
            let needed = amount.unwrap_or(1) as usize;
            state.player(player).hand.len() >= needed
        }
        ConditionDescriptor::Unknown => {
            warn!("unknown condition type encountered; treating as unmet");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_state::GameState;
    use crate::engine::types::{ConditionDescriptor, PlayerId};

    fn fresh_state() -> GameState {
        GameState::new(7)
    }

    #[test]
    fn absent_condition_is_always_met() {
        let state = fresh_state();
        assert!(evaluate(None, &state, PlayerId::Player1));
    }

    #[test]
    fn don_threshold_checks_active_or_total() {
        let mut state = fresh_state();
        state.player_mut(PlayerId::Player1).don.attach(3);
        let met = ConditionDescriptor::DonThreshold { min: 3 };
        let unmet = ConditionDescriptor::DonThreshold { min: 4 };
        assert!(evaluate(Some(&met), &state, PlayerId::Player1));
        assert!(!evaluate(Some(&unmet), &state, PlayerId::Player1));

        // Rested DON!! still count through the total.
        state.player_mut(PlayerId::Player1).don.rest(3);
        assert!(evaluate(Some(&met), &state, PlayerId::Player1));
    }

    #[test]
    fn has_trait_scans_the_board() {
        let mut state = fresh_state();
        let cond = ConditionDescriptor::HasTrait {
            trait_name: "Straw Hat Crew".to_string(),
        };
        assert!(!evaluate(Some(&cond), &state, PlayerId::Player1));

        let mut card = crate::engine::types::BoardCard {
            id: "c#1".to_string(),
            card_id: "c".to_string(),
            name: "Crewmate".to_string(),
            card_type: crate::engine::types::CardType::Character,
            power: 3000,
            traits: vec!["Straw Hat Crew".to_string()],
            rested: false,
            attacks_this_turn: 0,
            summoning_sickness: false,
            can_attack_multiple_times: false,
        };
        state.player_mut(PlayerId::Player1).board.push(card.clone());
        assert!(evaluate(Some(&cond), &state, PlayerId::Player1));

        // The opponent's board does not satisfy it.
        card.id = "c#2".to_string();
        assert!(!evaluate(Some(&cond), &state, PlayerId::Player2));
    }

    #[test]
    fn opponent_has_card_defaults_to_one() {
        let mut state = fresh_state();
        state.player_mut(PlayerId::Player2).hand.clear();
        let cond = ConditionDescriptor::OpponentHasCard { min: None };
        assert!(!evaluate(Some(&cond), &state, PlayerId::Player1));
        state
            .player_mut(PlayerId::Player2)
            .hand
            .push("x".to_string());
        assert!(evaluate(Some(&cond), &state, PlayerId::Player1));
    }

    #[test]
    fn trash_card_checks_hand_size_not_trash_zone() {
        let mut state = fresh_state();
        let p1 = state.player_mut(PlayerId::Player1);
        p1.hand.clear();
        p1.trash = vec!["t1".to_string(), "t2".to_string()];
        let cond = ConditionDescriptor::TrashCard { amount: Some(1) };
        assert!(!evaluate(Some(&cond), &state, PlayerId::Player1));

        state
            .player_mut(PlayerId::Player1)
            .hand
            .push("h1".to_string());
        assert!(evaluate(Some(&cond), &state, PlayerId::Player1));
    }

    #[test]
    fn unknown_condition_is_unmet_without_mutation() {
        let state = fresh_state();
        let before = state.player(PlayerId::Player1).hand.len();
        assert!(!evaluate(
            Some(&ConditionDescriptor::Unknown),
            &state,
            PlayerId::Player1
        ));
        assert_eq!(state.player(PlayerId::Player1).hand.len(), before);
    }
}
