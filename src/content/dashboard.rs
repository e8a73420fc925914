/// Channel dashboard: statistics and the owner's own video listing
use crate::{
    db::models::Video,
    error::{ApiError, ApiResult},
};
use serde::Serialize;
use sqlx::SqlitePool;

/// Aggregate numbers for one channel
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_likes: i64,
    pub total_subscribers: i64,
}

/// One page of the owner's videos plus the total count
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelVideos {
    pub videos: Vec<Video>,
    pub total_videos: i64,
    pub page: i64,
    pub limit: i64,
}

pub struct DashboardManager {
    db: SqlitePool,
}

impl DashboardManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Grouping and counting are delegated to the database; this composes
    /// the four aggregates
    pub async fn channel_stats(&self, channel_id: &str) -> ApiResult<ChannelStats> {
        let total_videos: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM video WHERE owner_id = ?1")
                .bind(channel_id)
                .fetch_one(&self.db)
                .await
                .map_err(ApiError::Database)?;

        let total_views: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(views), 0) FROM video WHERE owner_id = ?1",
        )
        .bind(channel_id)
        .fetch_one(&self.db)
        .await
        .map_err(ApiError::Database)?;

        // Likes across all of the channel's videos
        let total_likes: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM likes l
             JOIN video v ON v.id = l.video_id
             WHERE v.owner_id = ?1",
        )
        .bind(channel_id)
        .fetch_one(&self.db)
        .await
        .map_err(ApiError::Database)?;

        let total_subscribers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscription WHERE channel_id = ?1")
                .bind(channel_id)
                .fetch_one(&self.db)
                .await
                .map_err(ApiError::Database)?;

        Ok(ChannelStats {
            total_videos,
            total_views,
            total_likes,
            total_subscribers,
        })
    }

    /// The channel's own videos (published or not), newest first
    pub async fn channel_videos(
        &self,
        channel_id: &str,
        page: i64,
        limit: i64,
    ) -> ApiResult<ChannelVideos> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let total_videos: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM video WHERE owner_id = ?1")
                .bind(channel_id)
                .fetch_one(&self.db)
                .await
                .map_err(ApiError::Database)?;

        let videos = sqlx::query_as::<_, Video>(
            "SELECT * FROM video WHERE owner_id = ?1
             ORDER BY created_at DESC
             LIMIT ?2 OFFSET ?3",
        )
        .bind(channel_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(ChannelVideos {
            videos,
            total_videos,
            page,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::Utc;
    use uuid::Uuid;

    async fn seed_account(pool: &SqlitePool, username: &str) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO account (id, username, email, full_name, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?2 || '@x.com', ?2, 'hash', ?3, ?3)",
        )
        .bind(&id)
        .bind(username)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
        id
    }

    async fn seed_video(pool: &SqlitePool, owner: &str, views: i64) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO video (id, owner_id, title, description, video_url, views, created_at, updated_at)
             VALUES (?1, ?2, 'clip', '', 'https://m/v.mp4', ?3, ?4, ?4)",
        )
        .bind(&id)
        .bind(owner)
        .bind(views)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
        id
    }

    #[tokio::test]
    async fn stats_aggregate_across_tables() {
        let pool = db::test_pool().await;
        let ana = seed_account(&pool, "ana").await;
        let bea = seed_account(&pool, "bea").await;

        let v1 = seed_video(&pool, &ana, 10).await;
        let v2 = seed_video(&pool, &ana, 5).await;
        seed_video(&pool, &bea, 100).await; // someone else's numbers

        for video in [&v1, &v2] {
            sqlx::query(
                "INSERT INTO likes (id, owner_id, video_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&bea)
            .bind(video)
            .bind(Utc::now())
            .execute(&pool)
            .await
            .unwrap();
        }

        sqlx::query(
            "INSERT INTO subscription (id, subscriber_id, channel_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&bea)
        .bind(&ana)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        let stats = DashboardManager::new(pool).channel_stats(&ana).await.unwrap();
        assert_eq!(stats.total_videos, 2);
        assert_eq!(stats.total_views, 15);
        assert_eq!(stats.total_likes, 2);
        assert_eq!(stats.total_subscribers, 1);
    }

    #[tokio::test]
    async fn empty_channel_has_zero_stats() {
        let pool = db::test_pool().await;
        let ana = seed_account(&pool, "ana").await;

        let stats = DashboardManager::new(pool).channel_stats(&ana).await.unwrap();
        assert_eq!(stats.total_videos, 0);
        assert_eq!(stats.total_views, 0);
    }

    #[tokio::test]
    async fn channel_videos_paginate_with_total() {
        let pool = db::test_pool().await;
        let ana = seed_account(&pool, "ana").await;
        for _ in 0..12 {
            seed_video(&pool, &ana, 0).await;
        }

        let manager = DashboardManager::new(pool);
        let first = manager.channel_videos(&ana, 1, 10).await.unwrap();
        assert_eq!(first.videos.len(), 10);
        assert_eq!(first.total_videos, 12);

        let second = manager.channel_videos(&ana, 2, 10).await.unwrap();
        assert_eq!(second.videos.len(), 2);
    }
}
