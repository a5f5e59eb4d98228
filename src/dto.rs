use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{CardIdentity, ContentFingerprint, RetentionBucket, ReviewState};

/// Body carrying a generated deck as produced by the card generator
///
/// `cards` is kept as raw JSON; [`crate::deck::normalize_cards`] validates it.
/// A missing field reads as `null` and is rejected there.
#[derive(Serialize, Deserialize, Debug)]
pub struct DeckRequestDto {
    #[serde(default)]
    pub cards: Value,
}

/// Data transfer object for recording a review
///
/// `quality` stays a plain integer so an out-of-range value is reported as an
/// invalid quality instead of a body rejection.
#[derive(Serialize, Deserialize, Debug)]
pub struct RecordReviewDto {
    pub card_identity: CardIdentity,
    pub content_hash: ContentFingerprint,
    pub quality: i32,
}

/// Result of a recorded review
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReviewOutcomeDto {
    pub card_identity: CardIdentity,
    pub content_hash: ContentFingerprint,
    pub bucket: RetentionBucket,
    pub state: ReviewState,
}

/// Query for bulk state lookup: `?card_identity=a&card_identity=b`
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct StatesQuery {
    pub card_identity: Vec<CardIdentity>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PreviewQuery {
    pub content_hash: ContentFingerprint,
}

/// Body for deleting a user's progress on specific cards
#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteStatesDto {
    pub card_identities: Vec<CardIdentity>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedDto {
    pub deleted: usize,
}
