use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{ProgressSlot, StorageError};

use super::SqliteRepository;

#[async_trait]
impl ProgressSlot for SqliteRepository {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_slots WHERE key = ?1")
            .bind(&self.slot_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(value))
    }

    async fn write(&self, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO kv_slots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&self.slot_key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_slots WHERE key = ?1")
            .bind(&self.slot_key)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
