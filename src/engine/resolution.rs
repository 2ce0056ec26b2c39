//! Orchestrates a card's effect list against the game state.
//!
//! Effects resolve strictly in list order and independently of one another:
//! a skipped or unhandled effect never aborts the rest of the list. The
//! `priority` and `timing` descriptor fields are carried in the data model
//! but do not reorder anything.

use super::conditions;
use super::game_state::GameState;
use super::handlers::{self, EffectAction};
use super::suppression;
use super::types::{ActionPayload, ConditionDescriptor, EffectDescriptor, PendingChoice, PlayerId};
use crate::cards::CardData;
use log::debug;

/// What caused this resolution pass; gates which trigger tags fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerContext {
    /// The card was just played from hand.
    Play,
    /// The card's holder declared an attack.
    Attack,
}

/// True iff an effect with `trigger` fires in `ctx`.
pub fn trigger_matches(ctx: TriggerContext, trigger: Option<&str>) -> bool {
    match ctx {
        TriggerContext::Play => match trigger {
            None => true,
            Some(tag) => tag == "onPlay" || tag.starts_with("Activate:"),
        },
        TriggerContext::Attack => trigger == Some("onAttack"),
    }
}

/// Resolve every effect of `card` for `player` in list order.
///
/// Returns the optional effects deferred this pass; they are also queued on
/// `state.pending_triggers` for a later accept/decline decision.
pub fn resolve_effects(
    state: &mut GameState,
    card: &CardData,
    player: PlayerId,
    ctx: TriggerContext,
) -> Vec<PendingChoice> {
    let mut deferred = Vec::new();
    for effect in &card.effect_logic {
        if !trigger_matches(ctx, effect.trigger.as_deref()) {
            continue;
        }
        if suppression::is_suppressed(effect, player, state) {
            debug!("effect on {} suppressed for {:?}", card.id, player);
            continue;
        }
        if !conditions::evaluate(effect.condition.as_ref(), state, player) {
            continue;
        }
        // The trashCard condition describes a cost; paying it is a side
        // effect of the condition, not of the handler.
        if let Some(ConditionDescriptor::TrashCard { amount }) = &effect.condition {
            pay_trash_cost(state, player, amount.unwrap_or(1));
        }
        if effect.optional {
            let choice = PendingChoice {
                player,
                card_id: card.id.clone(),
                effect: effect.clone(),
            };
            state.append_action(
                "OptionalEffectPrompt",
                ActionPayload::OptionalEffectPrompt {
                    player,
                    card_id: card.id.clone(),
                    action: effect.action.clone().unwrap_or_default(),
                },
            );
            state.pending_triggers.push(choice.clone());
            deferred.push(choice);
            continue;
        }
        dispatch(state, effect, player);
    }
    deferred
}

/// Route one effect through the handler registry, logging unknown keys.
/// Pending-choice application reuses this same path.
pub fn dispatch(state: &mut GameState, effect: &EffectDescriptor, player: PlayerId) {
    let key = effect.action.as_deref().unwrap_or("");
    match EffectAction::from_key(key) {
        Some(action) => handlers::apply(state, action, effect, player),
        None => handlers::log_unhandled(state, player, key),
    }
}

// Trim `amount` cards off the front of the hand into the trash.
fn pay_trash_cost(state: &mut GameState, player: PlayerId, amount: u32) {
    let side = state.player_mut(player);
    let n = (amount as usize).min(side.hand.len());
    let trimmed: Vec<String> = side.hand.drain(..n).collect();
    debug!("trash cost for {:?}: {:?}", player, trimmed);
    side.trash.extend(trimmed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardData;
    use crate::engine::types::{CardType, SuppressionDuration};

    fn effect(action: &str) -> EffectDescriptor {
        EffectDescriptor {
            action: Some(action.to_string()),
            ..EffectDescriptor::default()
        }
    }

    fn card_with_effects(effects: Vec<EffectDescriptor>) -> CardData {
        CardData {
            id: "TEST-001".to_string(),
            name: "Test Card".to_string(),
            card_type: CardType::Event,
            cost: 0,
            power: 0,
            life: None,
            traits: vec![],
            can_attack_multiple_times: false,
            effect_logic: effects,
        }
    }

    #[test]
    fn effects_resolve_in_list_order_with_pending_and_suppressed_split() {
        let mut state = GameState::new(5);

        // C's trigger is blocked for Player1 by an opponent suppression.
        suppression::register(
            &mut state,
            PlayerId::Player2,
            Some("onPlay".to_string()),
            SuppressionDuration::Permanent,
        );

        let mut a = effect("givePower");
        a.optional = true;
        let b = effect("attachDon");
        let mut c = effect("attachDon");
        c.trigger = Some("onPlay".to_string());
        let card = card_with_effects(vec![a, b, c]);

        let log_before = state.action_log.entries().len();
        let pending = resolve_effects(&mut state, &card, PlayerId::Player1, TriggerContext::Play);

        // Exactly A is deferred.
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].effect.action.as_deref(), Some("givePower"));
        assert_eq!(state.pending_triggers.len(), 1);

        // Exactly B ran: one AttachDon record, don total bumped once.
        assert_eq!(state.player(PlayerId::Player1).don.total, 1);
        let new_entries: Vec<String> = state
            .action_log
            .entries()
            .iter()
            .skip(log_before)
            .map(|e| e.action_type.clone())
            .collect();
        assert_eq!(
            new_entries,
            vec!["OptionalEffectPrompt".to_string(), "AttachDon".to_string()]
        );
    }

    #[test]
    fn unmatched_trigger_is_skipped_for_play_context() {
        let mut state = GameState::new(5);
        let mut on_attack = effect("attachDon");
        on_attack.trigger = Some("onAttack".to_string());
        let mut activate = effect("attachDon");
        activate.trigger = Some("Activate:Main".to_string());
        let card = card_with_effects(vec![on_attack, activate]);
        resolve_effects(&mut state, &card, PlayerId::Player1, TriggerContext::Play);
        // Only the Activate effect fires on a play action.
        assert_eq!(state.player(PlayerId::Player1).don.total, 1);
    }

    #[test]
    fn failed_condition_skips_only_that_effect() {
        let mut state = GameState::new(5);
        let mut gated = effect("attachDon");
        gated.condition = Some(ConditionDescriptor::DonThreshold { min: 99 });
        let after = effect("attachDon");
        let card = card_with_effects(vec![gated, after]);
        resolve_effects(&mut state, &card, PlayerId::Player1, TriggerContext::Play);
        assert_eq!(state.player(PlayerId::Player1).don.total, 1);
    }

    #[test]
    fn trash_card_condition_pays_its_cost_from_the_front_of_hand() {
        let mut state = GameState::new(5);
        {
            let side = state.player_mut(PlayerId::Player1);
            side.hand = vec!["first".into(), "second".into(), "third".into()];
            side.trash.clear();
        }
        let mut gated = effect("drawCard");
        gated.condition = Some(ConditionDescriptor::TrashCard { amount: Some(2) });
        let card = card_with_effects(vec![gated]);
        resolve_effects(&mut state, &card, PlayerId::Player1, TriggerContext::Play);

        let side = state.player(PlayerId::Player1);
        assert_eq!(side.trash, vec!["first".to_string(), "second".to_string()]);
        // Cost paid, then the gated draw ran.
        assert!(side.hand.len() >= 1);
    }

    #[test]
    fn unknown_action_logs_unhandled_and_continues() {
        let mut state = GameState::new(5);
        let unknown = effect("summonKraken");
        let known = effect("attachDon");
        let card = card_with_effects(vec![unknown, known]);
        resolve_effects(&mut state, &card, PlayerId::Player1, TriggerContext::Play);
        assert_eq!(state.player(PlayerId::Player1).don.total, 1);
        let types: Vec<String> = state
            .action_log
            .entries()
            .iter()
            .map(|e| e.action_type.clone())
            .collect();
        assert!(types.contains(&"UnhandledEffect".to_string()));
    }
}
