use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use diesel::prelude::*;
use tracing::debug;

use super::ProgressStore;
use crate::db::DbPool;
use crate::models::{CardIdentity, CardProgressRow, StoredProgress};
use crate::schema::card_progress;

/// Identities bound per IN list; bundled SQLite allows 32766 parameters per statement
const MAX_IDS_PER_QUERY: usize = 10_000;

/// SQLite-backed store on top of the diesel connection pool
///
/// Diesel is synchronous, so every operation runs on the blocking thread pool.
#[derive(Clone)]
pub struct SqliteProgressStore {
    pool: Arc<DbPool>,
}

impl SqliteProgressStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<DbPool> {
        &self.pool
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let conn = &mut pool.get().context("failed to get a database connection")?;
            op(conn)
        })
        .await
        .context("database task panicked or was cancelled")?
    }
}

impl ProgressStore for SqliteProgressStore {
    async fn load_states(
        &self,
        user_id: &str,
        cards: &[CardIdentity],
    ) -> Result<HashMap<CardIdentity, StoredProgress>> {
        if cards.is_empty() {
            return Ok(HashMap::new());
        }

        let user = user_id.to_string();
        let ids: Vec<String> = cards.iter().map(|c| c.as_str().to_string()).collect();
        let rows = self
            .with_conn(move |conn| {
                let mut rows = Vec::new();
                for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
                    let found = card_progress::table
                        .filter(card_progress::user_id.eq(&user))
                        .filter(card_progress::card_identity.eq_any(chunk))
                        .select(CardProgressRow::as_select())
                        .load::<CardProgressRow>(conn)
                        .context("failed to load card progress")?;
                    rows.extend(found);
                }
                Ok(rows)
            })
            .await?;

        debug!(requested = cards.len(), found = rows.len(), "Loaded card progress");

        rows.into_iter()
            .map(|row| {
                let progress = row.into_progress()?;
                Ok((progress.card_identity.clone(), progress))
            })
            .collect()
    }

    async fn upsert_state(&self, user_id: &str, progress: &StoredProgress) -> Result<()> {
        let row = CardProgressRow::from_progress(user_id, progress)?;
        self.with_conn(move |conn| {
            diesel::insert_into(card_progress::table)
                .values(&row)
                .on_conflict((card_progress::user_id, card_progress::card_identity))
                .do_update()
                .set(&row)
                .execute(conn)
                .context("failed to upsert card progress")?;
            Ok(())
        })
        .await
    }

    async fn delete_states(&self, user_id: &str, cards: &[CardIdentity]) -> Result<usize> {
        if cards.is_empty() {
            return Ok(0);
        }

        let user = user_id.to_string();
        let ids: Vec<String> = cards.iter().map(|c| c.as_str().to_string()).collect();
        self.with_conn(move |conn| {
            conn.transaction(|conn| {
                let mut deleted = 0;
                for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
                    deleted += diesel::delete(
                        card_progress::table
                            .filter(card_progress::user_id.eq(&user))
                            .filter(card_progress::card_identity.eq_any(chunk)),
                    )
                    .execute(conn)?;
                }
                Ok::<_, diesel::result::Error>(deleted)
            })
            .context("failed to delete card progress")
        })
        .await
    }

    async fn delete_user(&self, user_id: &str) -> Result<usize> {
        let user = user_id.to_string();
        self.with_conn(move |conn| {
            diesel::delete(card_progress::table.filter(card_progress::user_id.eq(&user)))
                .execute(conn)
                .context("failed to delete user progress")
        })
        .await
    }
}
