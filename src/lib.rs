//! # Leader Duel
//!
//! A server-side engine for a two-player collectible card game: leaders,
//! characters, a DON!! resource economy and declarative JSON card effects.
//!
//! ## Architecture
//!
//! The match engine (`engine`) operates on a caller-owned `GameState` and
//! knows nothing about HTTP. Card data and the available-actions probe are
//! external collaborators consumed through the traits in `cards`. The
//! Rocket layer below is a thin adapter: it owns one match behind an
//! `Arc<Mutex<_>>`, translates `/action` bodies into engine calls, and
//! serves observability endpoints plus OpenAPI documentation.

// Rocket makes this a bit tricky to support
#![allow(clippy::module_name_repetitions)]
#[macro_use]
extern crate rocket;

use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};

pub mod action;
pub mod actions_log;
pub mod cards;
pub mod engine;
pub mod status_messages;

/// Initializes and configures the Rocket web server with all routes and OpenAPI documentation.
///
/// # Returns
///
/// A configured Rocket instance ready to be launched.
///
/// # Example
///
/// ```no_run
/// use leader_duel::rocket_initialize;
///
/// #[rocket::main]
/// async fn main() {
///     rocket_initialize().launch().await.expect("Failed to launch rocket");
/// }
/// ```
pub fn rocket_initialize() -> rocket::Rocket<rocket::Build> {
    use crate::action::okapi_add_operation_for_play_;
    use crate::action::play;
    use crate::actions_log::list_actions_log;
    use crate::actions_log::okapi_add_operation_for_list_actions_log_;
    use crate::engine::{
        get_game, get_pending_choices, okapi_add_operation_for_get_game_,
        okapi_add_operation_for_get_pending_choices_,
    };

    #[allow(clippy::no_effect_underscore_binding)]
    let _ = env_logger::try_init();

    use rocket::fairing::AdHoc;

    let gs = std::sync::Arc::new(rocket::futures::lock::Mutex::new(engine::GameState::new(0)));
    let library = std::sync::Arc::new(cards::CardLibrary::standard());

    let rocket = rocket::build()
        .mount(
            "/",
            openapi_get_routes![play, get_game, get_pending_choices, list_actions_log],
        )
        .mount("/swagger", make_swagger_ui(&get_docs()))
        .mount("/", rocket::routes![crate::engine::reset_game])
        .manage(gs.clone())
        .manage(library)
        .attach(AdHoc::on_liftoff("actionlog-shutdown", |rocket| {
            Box::pin(async move {
                // When the process receives SIGINT/SIGTERM (or ctrl-c), flush the action log writer
                if let Some(gs_state) = rocket
                    .state::<std::sync::Arc<rocket::futures::lock::Mutex<engine::GameState>>>()
                    .cloned()
                {
                    rocket::tokio::spawn(async move {
                        #[cfg(unix)]
                        {
                            use rocket::tokio::signal::unix::{signal, SignalKind};
                            let mut sigterm = signal(SignalKind::terminate())
                                .expect("failed to set SIGTERM handler");
                            let mut sigint = signal(SignalKind::interrupt())
                                .expect("failed to set SIGINT handler");
                            rocket::tokio::select! {
                                _ = sigterm.recv() => {},
                                _ = sigint.recv() => {},
                            }
                        }
                        #[cfg(not(unix))]
                        {
                            let _ = rocket::tokio::signal::ctrl_c().await;
                        }

                        // call shutdown helper to flush file writer
                        let gs = gs_state.lock().await;
                        gs.shutdown();
                    });
                }
            })
        }));

    rocket
}

fn get_docs() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/openapi.json".to_string(),
        ..Default::default()
    }
}
