/// Data models module
///
/// This module defines the core data structures used throughout the application:
/// the identity newtypes, quality signals, scheduling state, validated cards and
/// the database row that persists progress.

mod identity;
pub use identity::{CardIdentity, ContentFingerprint};

mod quality;
pub use quality::{Quality, ReviewButton};

mod review_state;
pub use review_state::{
    INITIAL_EASE_FACTOR, MASTERED_INTERVAL_DAYS, MIN_EASE_FACTOR, RetentionBucket, ReviewState,
};
pub(crate) use review_state::clamp_ease;

mod flashcard;
pub use flashcard::{Difficulty, Flashcard};

mod card_progress;
pub use card_progress::{CardProgressRow, StoredProgress};
