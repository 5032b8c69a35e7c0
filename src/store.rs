//! Layout persistence: the store trait plus in-memory and Postgres backends.
//!
//! DESIGN
//! ======
//! One layout per owner, stored whole. Saves are explicit user actions and
//! never merge: whichever save lands last wins, including over a newer layout
//! saved from another device.
//!
//! ERROR HANDLING
//! ==============
//! A failed save is reported to the caller and nothing else; the editor's
//! in-memory plan stays authoritative until the next successful load.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{LoadError, SaveError};
use crate::layout::LayoutRecord;

/// Backend-neutral async layout store. Enables swapping Postgres for memory in tests.
#[async_trait::async_trait]
pub trait LayoutStore: Send + Sync {
    /// Fetch the owner's layout, if one was ever saved.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the backend fails or the stored JSON does
    /// not decode.
    async fn load(&self, owner_id: Uuid) -> Result<Option<LayoutRecord>, LoadError>;

    /// Replace the owner's layout.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] if encoding or the backend write fails.
    async fn save(&self, owner_id: Uuid, record: &LayoutRecord) -> Result<(), SaveError>;
}

/// Process-local store. Layouts are kept as JSON so they go through the same
/// encode/decode path as the database.
#[derive(Debug, Default)]
pub struct MemoryLayoutStore {
    layouts: RwLock<HashMap<Uuid, serde_json::Value>>,
}

impl MemoryLayoutStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of owners with a saved layout.
    pub async fn len(&self) -> usize {
        self.layouts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.layouts.read().await.is_empty()
    }

    /// Store raw JSON for `owner_id`, bypassing encoding. Used to seed legacy data.
    pub async fn insert_raw(&self, owner_id: Uuid, layout: serde_json::Value) {
        self.layouts.write().await.insert(owner_id, layout);
    }
}

#[async_trait::async_trait]
impl LayoutStore for MemoryLayoutStore {
    async fn load(&self, owner_id: Uuid) -> Result<Option<LayoutRecord>, LoadError> {
        let layouts = self.layouts.read().await;
        let Some(value) = layouts.get(&owner_id) else {
            debug!(%owner_id, "no stored layout");
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(value.clone())?))
    }

    async fn save(&self, owner_id: Uuid, record: &LayoutRecord) -> Result<(), SaveError> {
        let value = serde_json::to_value(record)?;
        self.layouts.write().await.insert(owner_id, value);
        debug!(%owner_id, elements = record.elements.len(), "layout saved");
        Ok(())
    }
}

/// Postgres store: the `layout` JSONB column of the owner's `restaurants` row.
#[derive(Debug, Clone)]
pub struct PgLayoutStore {
    pool: PgPool,
}

impl PgLayoutStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LayoutStore for PgLayoutStore {
    async fn load(&self, owner_id: Uuid) -> Result<Option<LayoutRecord>, LoadError> {
        let row = sqlx::query_scalar::<_, Option<serde_json::Value>>("SELECT layout FROM restaurants WHERE user_id = $1")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(Some(value)) = row else {
            debug!(%owner_id, "no stored layout");
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(value)?))
    }

    async fn save(&self, owner_id: Uuid, record: &LayoutRecord) -> Result<(), SaveError> {
        let value = serde_json::to_value(record)?;
        let result = sqlx::query(
            "INSERT INTO restaurants (user_id, layout, updated_at)
             VALUES ($1, $2, now())
             ON CONFLICT (user_id) DO UPDATE SET layout = EXCLUDED.layout, updated_at = now()",
        )
        .bind(owner_id)
        .bind(value)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SaveError::Rejected(format!("no row written for owner {owner_id}")));
        }
        info!(%owner_id, elements = record.elements.len(), "layout saved");
        Ok(())
    }
}
