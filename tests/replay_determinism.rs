use leader_duel::cards::{CardLibrary, CostedHandProbe};
use leader_duel::engine::types::{ActionPayload, PlayerId};
use leader_duel::engine::{turn, GameState};

/// Drive a short match the way the HTTP layer does: engine call first, then
/// the command entry. Replaying the command stream must land on an
/// identical state.
#[test]
fn replayed_command_stream_reproduces_the_state() {
    let library = CardLibrary::standard();
    let probe = CostedHandProbe { provider: &library };

    let mut gs = GameState::new(9);
    gs.append_action("SetSeed", ActionPayload::SetSeed { seed: 9 });

    let player = gs.turn.current_player;
    turn::request_end_turn(&mut gs, &probe);
    gs.append_action("EndTurn", ActionPayload::EndTurn { player });

    for _ in 0..2 {
        let player = gs.turn.current_player;
        turn::progress_phase(&mut gs);
        gs.append_action("ProgressPhase", ActionPayload::ProgressPhase { player });
    }

    // A blocked attack is part of the record too.
    let player = gs.turn.current_player;
    let _ = gs.attempt_attack(player, "leader", "leader", &library);
    gs.append_action(
        "Attack",
        ActionPayload::Attack {
            player,
            attacker: "leader".to_string(),
            target: "leader".to_string(),
        },
    );

    let replayed = GameState::replay_from_log(&gs.action_log, &library, &probe);

    let original = serde_json::to_value(&gs).expect("serializable");
    let rebuilt = serde_json::to_value(&replayed).expect("serializable");
    assert_eq!(original, rebuilt);
}

#[test]
fn replay_without_set_seed_defaults_to_seed_zero() {
    let library = CardLibrary::standard();
    let probe = CostedHandProbe { provider: &library };
    let empty = leader_duel::engine::action_log::ActionLog::new();
    let replayed = GameState::replay_from_log(&empty, &library, &probe);
    let fresh = GameState::new(0);
    assert_eq!(
        replayed.player(PlayerId::Player1).deck,
        fresh.player(PlayerId::Player1).deck
    );
}
