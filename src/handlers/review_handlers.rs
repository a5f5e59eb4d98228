use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::dto::{PreviewQuery, RecordReviewDto, ReviewOutcomeDto};
use crate::errors::{ApiError, ProgressError};
use crate::models::{CardIdentity, Quality};
use crate::progress::ProgressTracker;
use crate::scheduler::ReviewPreview;
use crate::store::ProgressStore;

/// Handler for recording a review of a card
///
/// This function handles POST requests to `/users/{user_id}/reviews`.
///
/// ### Returns
///
/// The persisted review state and its bucket as JSON
#[instrument(
    skip(tracker, payload),
    fields(user_id = %user_id, card_identity = %payload.card_identity, quality = %payload.quality)
)]
pub async fn record_review_handler<S: ProgressStore>(
    State(tracker): State<Arc<ProgressTracker<S>>>,
    Path(user_id): Path<String>,
    Json(payload): Json<RecordReviewDto>,
) -> Result<Json<ReviewOutcomeDto>, ApiError> {
    let quality = match Quality::new(payload.quality) {
        Ok(quality) => quality,
        Err(ProgressError::InvalidArgument(msg)) => {
            warn!("Invalid quality: {}", payload.quality);
            return Err(ApiError::InvalidQuality(msg));
        }
        Err(e) => return Err(e.into()),
    };

    let state = tracker
        .record_review(&user_id, &payload.card_identity, &payload.content_hash, quality)
        .await?;

    info!("Successfully recorded review");
    Ok(Json(ReviewOutcomeDto {
        card_identity: payload.card_identity,
        content_hash: payload.content_hash,
        bucket: state.bucket(),
        state,
    }))
}

/// Handler for previewing every review button on a card
///
/// This function handles GET requests to
/// `/users/{user_id}/cards/{card_identity}/preview?content_hash=..`.
#[instrument(skip(tracker, query), fields(user_id = %user_id, card_identity = %card_identity))]
pub async fn preview_review_handler<S: ProgressStore>(
    State(tracker): State<Arc<ProgressTracker<S>>>,
    Path((user_id, card_identity)): Path<(String, CardIdentity)>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<Vec<ReviewPreview>>, ApiError> {
    let previews = tracker
        .preview_review(&user_id, &card_identity, &query.content_hash, Utc::now())
        .await?;
    Ok(Json(previews))
}
