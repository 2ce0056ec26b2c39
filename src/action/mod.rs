use either::{Either, Left, Right};
use rocket::response::status::{BadRequest, NotFound};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};

pub mod persistence;

use crate::cards::{CardLibrary, CostedHandProbe};
use crate::engine::types::{ActionEntry, ActionPayload, PendingChoice};
use crate::engine::{turn, GameState};
use crate::status_messages::{new_status, Status};

/// Player actions accepted by the `/action` endpoint. Each applies to the
/// current player of the match.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", tag = "action_type")]
pub enum PlayerAction {
    PlayCard { card_id: String },
    ResolveChoice { index: usize, accept: bool },
    EndTurn,
    ProgressPhase,
    Attack { attacker: String, target: String },
}

/// What the caller gets back: the logged command, a human-readable outcome,
/// and the optional effects now awaiting a decision.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct ActionOutcome {
    pub entry: ActionEntry,
    pub message: String,
    pub pending_choices: Vec<PendingChoice>,
}

fn reject(message: String) -> Either<NotFound<Json<Status>>, BadRequest<Json<Status>>> {
    if message.contains("not found") {
        Left(NotFound(new_status(message)))
    } else {
        Right(BadRequest(new_status(message)))
    }
}

#[openapi]
#[post("/action", format = "json", data = "<player_action>")]
pub async fn play(
    game_state: &State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
    card_library: &State<std::sync::Arc<CardLibrary>>,
    player_action: Json<PlayerAction>,
) -> Result<
    (rocket::http::Status, Json<ActionOutcome>),
    Either<NotFound<Json<Status>>, BadRequest<Json<Status>>>,
> {
    let action = player_action.0;
    let library: &CardLibrary = &***card_library;
    let mut gs = game_state.lock().await;
    let player = gs.turn.current_player;

    match action {
        PlayerAction::PlayCard { card_id } => {
            match gs.play_card(player, &card_id, library) {
                Ok(pending) => {
                    let entry = gs.append_action(
                        "PlayCard",
                        ActionPayload::PlayCard {
                            player,
                            card_id: card_id.clone(),
                        },
                    );
                    Ok((
                        rocket::http::Status::Created,
                        Json(ActionOutcome {
                            entry,
                            message: format!("played {card_id}"),
                            pending_choices: pending,
                        }),
                    ))
                }
                Err(e) => Err(reject(e)),
            }
        }
        PlayerAction::ResolveChoice { index, accept } => {
            match gs.resolve_pending_choice(player, index, accept) {
                Ok(message) => {
                    let entry = gs.append_action(
                        "ResolveChoice",
                        ActionPayload::ResolveChoice {
                            player,
                            index,
                            accept,
                        },
                    );
                    Ok((
                        rocket::http::Status::Created,
                        Json(ActionOutcome {
                            entry,
                            message,
                            pending_choices: gs.pending_triggers.clone(),
                        }),
                    ))
                }
                Err(e) => Err(reject(e)),
            }
        }
        PlayerAction::EndTurn => {
            let probe = CostedHandProbe { provider: library };
            let message = turn::request_end_turn(&mut gs, &probe);
            let entry = gs.append_action("EndTurn", ActionPayload::EndTurn { player });
            Ok((
                rocket::http::Status::Created,
                Json(ActionOutcome {
                    entry,
                    message,
                    pending_choices: gs.pending_triggers.clone(),
                }),
            ))
        }
        PlayerAction::ProgressPhase => {
            let message = turn::progress_phase(&mut gs);
            let entry = gs.append_action("ProgressPhase", ActionPayload::ProgressPhase { player });
            Ok((
                rocket::http::Status::Created,
                Json(ActionOutcome {
                    entry,
                    message,
                    pending_choices: gs.pending_triggers.clone(),
                }),
            ))
        }
        PlayerAction::Attack { attacker, target } => {
            match gs.attempt_attack(player, &attacker, &target, library) {
                Ok(message) => {
                    let entry = gs.append_action(
                        "Attack",
                        ActionPayload::Attack {
                            player,
                            attacker,
                            target,
                        },
                    );
                    Ok((
                        rocket::http::Status::Created,
                        Json(ActionOutcome {
                            entry,
                            message,
                            pending_choices: gs.pending_triggers.clone(),
                        }),
                    ))
                }
                Err(e) => Err(reject(e)),
            }
        }
    }
}
