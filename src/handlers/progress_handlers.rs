use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::dto::{DeleteStatesDto, DeletedDto, StatesQuery};
use crate::errors::ApiError;
use crate::models::{CardIdentity, ReviewState};
use crate::progress::ProgressTracker;
use crate::store::ProgressStore;

/// Handler for bulk loading review states
///
/// This function handles GET requests to
/// `/users/{user_id}/states?card_identity=a&card_identity=b`. Cards never
/// reviewed are absent from the returned map.
#[instrument(skip(tracker, query), fields(user_id = %user_id, requested = query.card_identity.len()))]
pub async fn get_states_handler<S: ProgressStore>(
    State(tracker): State<Arc<ProgressTracker<S>>>,
    Path(user_id): Path<String>,
    Query(query): Query<StatesQuery>,
) -> Result<Json<HashMap<CardIdentity, ReviewState>>, ApiError> {
    let states = tracker.load_states(&user_id, &query.card_identity).await?;
    debug!(found = states.len(), "Loaded review states");
    Ok(Json(states))
}

/// Handler for resetting progress on specific cards
///
/// This function handles DELETE requests to `/users/{user_id}/states`.
#[instrument(skip(tracker, payload), fields(user_id = %user_id))]
pub async fn delete_states_handler<S: ProgressStore>(
    State(tracker): State<Arc<ProgressTracker<S>>>,
    Path(user_id): Path<String>,
    Json(payload): Json<DeleteStatesDto>,
) -> Result<Json<DeletedDto>, ApiError> {
    let deleted = tracker.reset_cards(&user_id, &payload.card_identities).await?;
    Ok(Json(DeletedDto { deleted }))
}

/// Handler for deleting everything stored for a user
///
/// This function handles DELETE requests to `/users/{user_id}`.
#[instrument(skip(tracker))]
pub async fn delete_user_handler<S: ProgressStore>(
    State(tracker): State<Arc<ProgressTracker<S>>>,
    Path(user_id): Path<String>,
) -> Result<Json<DeletedDto>, ApiError> {
    let deleted = tracker.forget_user(&user_id).await?;
    info!(deleted, "User progress deleted");
    Ok(Json(DeletedDto { deleted }))
}
