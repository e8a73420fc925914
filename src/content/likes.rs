/// Like manager: toggle semantics for videos, comments, and tweets
use crate::{
    db::models::{Like, Video},
    error::{ApiError, ApiResult},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Which target column a like row points at
#[derive(Debug, Clone, Copy)]
enum LikeTarget {
    Video,
    Comment,
    Tweet,
}

impl LikeTarget {
    fn column(self) -> &'static str {
        match self {
            LikeTarget::Video => "video_id",
            LikeTarget::Comment => "comment_id",
            LikeTarget::Tweet => "tweet_id",
        }
    }
}

pub struct LikeManager {
    db: SqlitePool,
}

impl LikeManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Toggle a like on a video; returns the created like, or None when
    /// an existing one was removed
    pub async fn toggle_video(&self, owner_id: &str, video_id: &str) -> ApiResult<Option<Like>> {
        self.toggle(owner_id, LikeTarget::Video, video_id).await
    }

    /// Toggle a like on a comment
    pub async fn toggle_comment(
        &self,
        owner_id: &str,
        comment_id: &str,
    ) -> ApiResult<Option<Like>> {
        self.toggle(owner_id, LikeTarget::Comment, comment_id).await
    }

    /// Toggle a like on a tweet
    pub async fn toggle_tweet(&self, owner_id: &str, tweet_id: &str) -> ApiResult<Option<Like>> {
        self.toggle(owner_id, LikeTarget::Tweet, tweet_id).await
    }

    /// Toggling twice returns to the original state. A racing duplicate
    /// insert trips the partial unique index and maps onto the delete
    /// branch of the next call, so the pair never ends up double-liked.
    async fn toggle(
        &self,
        owner_id: &str,
        target: LikeTarget,
        target_id: &str,
    ) -> ApiResult<Option<Like>> {
        // Column names come from the enum, never from input
        let delete_sql = format!(
            "DELETE FROM likes WHERE owner_id = ?1 AND {} = ?2",
            target.column()
        );
        let deleted = sqlx::query(&delete_sql)
            .bind(owner_id)
            .bind(target_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        if deleted.rows_affected() > 0 {
            return Ok(None);
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let insert_sql = format!(
            "INSERT INTO likes (id, owner_id, {}, created_at) VALUES (?1, ?2, ?3, ?4)",
            target.column()
        );
        sqlx::query(&insert_sql)
            .bind(&id)
            .bind(owner_id)
            .bind(target_id)
            .bind(now)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        let target_id = target_id.to_string();
        let (video_id, comment_id, tweet_id) = match target {
            LikeTarget::Video => (Some(target_id), None, None),
            LikeTarget::Comment => (None, Some(target_id), None),
            LikeTarget::Tweet => (None, None, Some(target_id)),
        };

        Ok(Some(Like {
            id,
            owner_id: owner_id.to_string(),
            video_id,
            comment_id,
            tweet_id,
            created_at: now,
        }))
    }

    /// Videos the account has liked, newest like first
    pub async fn liked_videos(&self, owner_id: &str) -> ApiResult<Vec<Video>> {
        sqlx::query_as::<_, Video>(
            "SELECT v.* FROM likes l
             JOIN video v ON v.id = l.video_id
             WHERE l.owner_id = ?1 AND l.video_id IS NOT NULL
             ORDER BY l.created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)
    }

    /// Count likes on one video
    pub async fn count_for_video(&self, video_id: &str) -> ApiResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE video_id = ?1")
            .bind(video_id)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn setup() -> (LikeManager, SqlitePool, String, String) {
        let pool = db::test_pool().await;
        let now = Utc::now();

        let owner_id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO account (id, username, email, full_name, password_hash, created_at, updated_at)
             VALUES (?1, 'ana', 'ana@x.com', 'Ana', 'hash', ?2, ?2)",
        )
        .bind(&owner_id)
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();

        let video_id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO video (id, owner_id, title, description, video_url, created_at, updated_at)
             VALUES (?1, ?2, 'clip', '', 'https://m/v.mp4', ?3, ?3)",
        )
        .bind(&video_id)
        .bind(&owner_id)
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();

        (LikeManager::new(pool.clone()), pool, owner_id, video_id)
    }

    #[tokio::test]
    async fn toggle_is_an_involution() {
        let (manager, _pool, owner, video) = setup().await;

        let like = manager.toggle_video(&owner, &video).await.unwrap();
        assert_eq!(like.unwrap().video_id.as_deref(), Some(video.as_str()));
        assert_eq!(manager.count_for_video(&video).await.unwrap(), 1);

        // Second toggle returns to the original unliked state
        assert!(manager.toggle_video(&owner, &video).await.unwrap().is_none());
        assert_eq!(manager.count_for_video(&video).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn targets_are_independent() {
        let (manager, pool, owner, video) = setup().await;

        let tweet_id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO tweet (id, owner_id, content, created_at, updated_at)
             VALUES (?1, ?2, 'hi', ?3, ?3)",
        )
        .bind(&tweet_id)
        .bind(&owner)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        manager.toggle_video(&owner, &video).await.unwrap();
        manager.toggle_tweet(&owner, &tweet_id).await.unwrap();

        // Unliking the tweet leaves the video like alone
        manager.toggle_tweet(&owner, &tweet_id).await.unwrap();
        assert_eq!(manager.count_for_video(&video).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn liked_videos_newest_first() {
        let (manager, pool, owner, first_video) = setup().await;

        let second_video = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO video (id, owner_id, title, description, video_url, created_at, updated_at)
             VALUES (?1, ?2, 'later', '', 'https://m/v2.mp4', ?3, ?3)",
        )
        .bind(&second_video)
        .bind(&owner)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        manager.toggle_video(&owner, &first_video).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        manager.toggle_video(&owner, &second_video).await.unwrap();

        let liked = manager.liked_videos(&owner).await.unwrap();
        let ids: Vec<&str> = liked.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec![second_video.as_str(), first_video.as_str()]);
    }
}
