//! Stateless attack legality checks.
//!
//! `can_attack` never mutates state; the attack handler acts on its verdict
//! and surfaces the rejection reason in the `AttackBlocked` audit record.

use super::game_state::GameState;
use super::types::{BoardCard, CardType, PlayerId, PlayerState};

/// Effective powers of both sides of a legal attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackPowers {
    pub attacker: i64,
    pub target: i64,
}

/// Resolve `"leader"` or a board-card instance id on one player's side.
pub fn resolve_combatant<'a>(side: &'a PlayerState, reference: &str) -> Option<&'a BoardCard> {
    if reference == "leader" {
        side.leader.as_ref()
    } else {
        side.board.iter().find(|card| card.id == reference)
    }
}

/// Check whether `player` may attack `target_ref` with `attacker_ref`.
/// Checks run in order; the first failure wins and carries the reason.
pub fn can_attack(
    state: &GameState,
    player: PlayerId,
    attacker_ref: &str,
    target_ref: &str,
) -> Result<AttackPowers, String> {
    if state.turn.number < 3 {
        return Err("attacks are not allowed before turn 3".to_string());
    }
    let own_side = state.player(player);
    let attacker = resolve_combatant(own_side, attacker_ref)
        .ok_or_else(|| format!("attacker {attacker_ref} not found"))?;
    let enemy_side = state.player(player.opponent());
    let target = resolve_combatant(enemy_side, target_ref)
        .ok_or_else(|| format!("target {target_ref} not found"))?;
    match target.card_type {
        CardType::Leader | CardType::Character => {}
        _ => return Err(format!("target {target_ref} cannot be attacked")),
    }
    if attacker.rested {
        return Err(format!("attacker {attacker_ref} is rested"));
    }
    if target.card_type == CardType::Character && !target.rested {
        return Err("characters can only be attacked while rested".to_string());
    }
    let attacker_power = attacker.power + own_side.power_buff;
    let target_power = target.power + enemy_side.power_buff;
    if attacker_power < target_power {
        return Err(format!(
            "attacker power {attacker_power} is less than target power {target_power}"
        ));
    }
    Ok(AttackPowers {
        attacker: attacker_power,
        target: target_power,
    })
}
