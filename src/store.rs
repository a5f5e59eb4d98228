//! Persistence seam for review progress.
//!
//! The tracker talks to storage only through [`ProgressStore`]. Rows are keyed
//! by `(user_id, card_identity)`; the deck fingerprint rides along as metadata.
//! Backends report failures as `anyhow` errors, which the tracker surfaces as
//! `StorageUnavailable`.

use std::collections::HashMap;
use std::future::Future;

use crate::models::{CardIdentity, StoredProgress};

mod memory_store;
mod sqlite_store;

pub use memory_store::MemoryProgressStore;
pub use sqlite_store::SqliteProgressStore;

/// Durable per-user progress storage
pub trait ProgressStore: Send + Sync + 'static {
    /// Loads the stored entries for `cards` in one round trip
    ///
    /// Cards without a row are absent from the map.
    fn load_states(
        &self,
        user_id: &str,
        cards: &[CardIdentity],
    ) -> impl Future<Output = anyhow::Result<HashMap<CardIdentity, StoredProgress>>> + Send;

    /// Inserts or replaces the row for `(user_id, progress.card_identity)`
    fn upsert_state(
        &self,
        user_id: &str,
        progress: &StoredProgress,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Deletes the rows for `cards`, returning how many existed
    fn delete_states(
        &self,
        user_id: &str,
        cards: &[CardIdentity],
    ) -> impl Future<Output = anyhow::Result<usize>> + Send;

    /// Deletes every row owned by `user_id`
    fn delete_user(&self, user_id: &str) -> impl Future<Output = anyhow::Result<usize>> + Send;
}
