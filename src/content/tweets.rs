/// Tweet manager
use crate::{
    db::models::Tweet,
    error::{ApiError, ApiResult},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct TweetManager {
    db: SqlitePool,
}

impl TweetManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Post a tweet
    pub async fn create(&self, owner_id: &str, content: &str) -> ApiResult<Tweet> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ApiError::Validation(
                "Tweet content is required".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO tweet (id, owner_id, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
        )
        .bind(&id)
        .bind(owner_id)
        .bind(content)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        self.get(&id).await
    }

    /// All tweets by one account, newest first
    pub async fn list_for_user(&self, user_id: &str) -> ApiResult<Vec<Tweet>> {
        sqlx::query_as::<_, Tweet>(
            "SELECT * FROM tweet WHERE owner_id = ?1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)
    }

    /// Get by id
    pub async fn get(&self, id: &str) -> ApiResult<Tweet> {
        sqlx::query_as::<_, Tweet>("SELECT * FROM tweet WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)?
            .ok_or_else(|| ApiError::NotFound("Tweet not found".to_string()))
    }

    /// Rewrite the content
    pub async fn update(&self, id: &str, content: &str) -> ApiResult<Tweet> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ApiError::Validation(
                "Tweet content is required".to_string(),
            ));
        }

        sqlx::query("UPDATE tweet SET content = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(content)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        self.get(id).await
    }

    /// Delete a tweet (its likes cascade)
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM tweet WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Tweet not found".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn setup() -> (TweetManager, String) {
        let pool = db::test_pool().await;
        let owner_id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO account (id, username, email, full_name, password_hash, created_at, updated_at)
             VALUES (?1, 'ana', 'ana@x.com', 'Ana', 'hash', ?2, ?2)",
        )
        .bind(&owner_id)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        (TweetManager::new(pool), owner_id)
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let (manager, owner) = setup().await;

        let tweet = manager.create(&owner, "hello world").await.unwrap();
        let listed = manager.list_for_user(&owner).await.unwrap();
        assert_eq!(listed.len(), 1);

        let updated = manager.update(&tweet.id, "edited").await.unwrap();
        assert_eq!(updated.content, "edited");

        manager.delete(&tweet.id).await.unwrap();
        assert!(matches!(
            manager.get(&tweet.id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn blank_content_rejected() {
        let (manager, owner) = setup().await;
        assert!(matches!(
            manager.create(&owner, "").await,
            Err(ApiError::Validation(_))
        ));
    }
}
