use std::collections::HashMap;

use tokio::sync::RwLock;

use super::ProgressStore;
use crate::models::{CardIdentity, StoredProgress};

type Key = (String, CardIdentity);

/// Process-local store, for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    rows: RwLock<HashMap<Key, StoredProgress>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows across all users
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl ProgressStore for MemoryProgressStore {
    async fn load_states(
        &self,
        user_id: &str,
        cards: &[CardIdentity],
    ) -> anyhow::Result<HashMap<CardIdentity, StoredProgress>> {
        let rows = self.rows.read().await;
        Ok(cards
            .iter()
            .filter_map(|card| {
                rows.get(&(user_id.to_string(), card.clone()))
                    .map(|progress| (card.clone(), progress.clone()))
            })
            .collect())
    }

    async fn upsert_state(&self, user_id: &str, progress: &StoredProgress) -> anyhow::Result<()> {
        self.rows.write().await.insert(
            (user_id.to_string(), progress.card_identity.clone()),
            progress.clone(),
        );
        Ok(())
    }

    async fn delete_states(&self, user_id: &str, cards: &[CardIdentity]) -> anyhow::Result<usize> {
        let mut rows = self.rows.write().await;
        Ok(cards
            .iter()
            .filter(|card| rows.remove(&(user_id.to_string(), (*card).clone())).is_some())
            .count())
    }

    async fn delete_user(&self, user_id: &str) -> anyhow::Result<usize> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|(owner, _), _| owner != user_id);
        Ok(before - rows.len())
    }
}
