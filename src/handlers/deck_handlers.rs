use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::deck::Deck;
use crate::dto::DeckRequestDto;
use crate::errors::ApiError;
use crate::progress::{DeckProgress, ProgressTracker};
use crate::store::ProgressStore;

/// Handler for fingerprinting a generated deck
///
/// This function handles POST requests to `/decks/fingerprint`. Nothing is
/// stored; the response carries the content hash and the identity of each
/// validated card.
#[instrument(skip(payload))]
pub async fn fingerprint_deck_handler(
    Json(payload): Json<DeckRequestDto>,
) -> Result<Json<Deck>, ApiError> {
    let deck = Deck::from_json(&payload.cards)?;
    debug!(content_hash = %deck.content_hash(), cards = deck.len(), "Fingerprinted deck");
    Ok(Json(deck))
}

/// Handler for the progress view of a deck
///
/// This function handles POST requests to `/users/{user_id}/deck-progress`.
/// The deck is sent in the body because decks are generated on the fly and
/// never stored server side.
#[instrument(skip(tracker, payload), fields(user_id = %user_id))]
pub async fn deck_progress_handler<S: ProgressStore>(
    State(tracker): State<Arc<ProgressTracker<S>>>,
    Path(user_id): Path<String>,
    Json(payload): Json<DeckRequestDto>,
) -> Result<Json<DeckProgress>, ApiError> {
    let deck = Deck::from_json(&payload.cards)?;
    let progress = tracker.deck_progress(&user_id, &deck, Utc::now()).await?;

    info!(
        cards = progress.cards.len(),
        due = progress.counts.due,
        "Built deck progress"
    );
    Ok(Json(progress))
}
