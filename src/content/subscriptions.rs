/// Subscription manager
use crate::{
    account::ProfileSummary,
    db::models::Subscription,
    error::{ApiError, ApiResult},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One edge of the subscription graph with the profile on the far end
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionEntry {
    pub profile: ProfileSummary,
    pub subscribed_at: DateTime<Utc>,
}

pub struct SubscriptionManager {
    db: SqlitePool,
}

impl SubscriptionManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Toggle a subscription; returns the created edge, or None when an
    /// existing one was removed. Subscribing to yourself is rejected
    /// before the toggle.
    pub async fn toggle(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> ApiResult<Option<Subscription>> {
        if subscriber_id == channel_id {
            return Err(ApiError::Validation(
                "Cannot subscribe to your own channel".to_string(),
            ));
        }

        let deleted = sqlx::query(
            "DELETE FROM subscription WHERE subscriber_id = ?1 AND channel_id = ?2",
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        if deleted.rows_affected() > 0 {
            return Ok(None);
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO subscription (id, subscriber_id, channel_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&id)
        .bind(subscriber_id)
        .bind(channel_id)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(Some(Subscription {
            id,
            subscriber_id: subscriber_id.to_string(),
            channel_id: channel_id.to_string(),
            created_at: now,
        }))
    }

    /// Accounts subscribed to a channel, newest first
    pub async fn subscribers(&self, channel_id: &str) -> ApiResult<Vec<SubscriptionEntry>> {
        let rows = sqlx::query(
            "SELECT a.id, a.username, a.full_name, a.avatar_url, s.created_at
             FROM subscription s
             JOIN account a ON a.id = s.subscriber_id
             WHERE s.channel_id = ?1
             ORDER BY s.created_at DESC",
        )
        .bind(channel_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(rows.into_iter().map(Self::entry_from_row).collect())
    }

    /// Channels an account subscribes to, newest first
    pub async fn subscribed_channels(
        &self,
        subscriber_id: &str,
    ) -> ApiResult<Vec<SubscriptionEntry>> {
        let rows = sqlx::query(
            "SELECT a.id, a.username, a.full_name, a.avatar_url, s.created_at
             FROM subscription s
             JOIN account a ON a.id = s.channel_id
             WHERE s.subscriber_id = ?1
             ORDER BY s.created_at DESC",
        )
        .bind(subscriber_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(rows.into_iter().map(Self::entry_from_row).collect())
    }

    fn entry_from_row(row: sqlx::sqlite::SqliteRow) -> SubscriptionEntry {
        SubscriptionEntry {
            profile: ProfileSummary {
                id: row.get("id"),
                username: row.get("username"),
                full_name: row.get("full_name"),
                avatar_url: row.get("avatar_url"),
            },
            subscribed_at: row.get("created_at"),
        }
    }
}
