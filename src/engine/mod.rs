//! The match engine: shared game state, effect resolution, combat
//! validation and turn progression.
//!
//! Everything operates on a caller-owned `GameState`; callers serialize
//! access per match, the engine itself never interleaves two operations on
//! the same state.

pub mod action_log;
pub mod combat;
pub mod conditions;
mod endpoints;
pub mod game_state;
pub mod handlers;
pub mod resolution;
pub mod suppression;
pub mod turn;
pub mod types;

pub use endpoints::{
    get_game, get_pending_choices, okapi_add_operation_for_get_game_,
    okapi_add_operation_for_get_pending_choices_, reset_game,
};
pub use game_state::GameState;
