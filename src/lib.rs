//! Deckwise: spaced repetition progress for generated flashcard decks
//!
//! Decks are generated on the fly, so there is no card table to hang progress
//! on. Instead every card gets a stable identity derived from its front text
//! and position, each deck gets a content fingerprint, and per-user SM-2 state
//! is stored against the card identity with the fingerprint alongside.
//!
//! ### Modules
//!
//! - `identity`: deck fingerprints and card identities
//! - `scheduler`: the pure SM-2 state transition
//! - `deck`: validation of generated card JSON
//! - `progress`: the tracker joining scheduler and storage
//! - `store`: storage backends (SQLite and in-memory)
//! - `handlers`, `dto`: the JSON HTTP API
//!
//! ### Web API
//!
//! - `POST /decks/fingerprint`: Fingerprint a deck
//! - `POST /users/{user_id}/deck-progress`: Progress view of a deck
//! - `GET /users/{user_id}/states`: Bulk load review states
//! - `DELETE /users/{user_id}/states`: Reset progress on cards
//! - `POST /users/{user_id}/reviews`: Record a review
//! - `GET /users/{user_id}/cards/{card_identity}/preview`: Preview review buttons
//! - `DELETE /users/{user_id}`: Delete all progress of a user

pub mod config;
pub mod db;
pub mod deck;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod logging;
pub mod models;
pub mod progress;
pub mod scheduler;
pub mod schema;
pub mod store;

#[cfg(test)]
pub mod test_utils;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use errors::ApiError;
use progress::ProgressTracker;
use store::ProgressStore;

pub use deck::Deck;
pub use errors::ProgressError;
pub use progress::{DeckProgress, FingerprintScope};

/// Creates the application router
///
/// ### Arguments
///
/// * `tracker` - The progress tracker shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes and the tracker as state
pub fn create_app<S: ProgressStore>(tracker: Arc<ProgressTracker<S>>) -> Router {
    Router::new()
        // Route for fingerprinting a deck without touching storage
        .route("/decks/fingerprint", post(handlers::fingerprint_deck_handler))
        // Route for deleting a user's progress
        .route("/users/{user_id}", delete(handlers::delete_user_handler::<S>))
        // Route for the progress view of a deck
        .route("/users/{user_id}/deck-progress", post(handlers::deck_progress_handler::<S>))
        // Routes for bulk loading and resetting states
        .route(
            "/users/{user_id}/states",
            get(handlers::get_states_handler::<S>).delete(handlers::delete_states_handler::<S>),
        )
        // Route for recording reviews
        .route("/users/{user_id}/reviews", post(handlers::record_review_handler::<S>))
        // Route for previewing the review buttons of a card
        .route(
            "/users/{user_id}/cards/{card_identity}/preview",
            get(handlers::preview_review_handler::<S>),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(tracker)
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
