use super::game_state::GameState;
use super::types::{ActionPayload, PendingChoice};
use rocket::serde::json::Json;
use rocket_okapi::openapi;

/// Snapshot of the current match state.
#[openapi]
#[get("/game")]
pub async fn get_game(
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Json<GameState> {
    let gs = game_state.lock().await;
    Json(gs.clone())
}

/// Pending optional effects awaiting an accept/decline decision.
#[openapi]
#[get("/game/pending")]
pub async fn get_pending_choices(
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> Json<Vec<PendingChoice>> {
    let gs = game_state.lock().await;
    Json(gs.pending_triggers.clone())
}

/// Test endpoint: replace the match with a freshly seeded one. The seed is
/// logged so the new match can be replayed from its action log.
#[post("/tests/game?<seed>")]
pub async fn reset_game(
    seed: Option<u64>,
    game_state: &rocket::State<std::sync::Arc<rocket::futures::lock::Mutex<GameState>>>,
) -> rocket::response::status::Created<String> {
    let seed = seed.unwrap_or(0);
    let mut gs = game_state.lock().await;
    *gs = GameState::new(seed);
    gs.append_action("SetSeed", ActionPayload::SetSeed { seed });
    rocket::response::status::Created::new("/game".to_string())
}
