/// Comment manager
use crate::{
    account::ProfileSummary,
    db::models::Comment,
    error::{ApiError, ApiResult},
};
use chrono::Utc;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Comment joined with its author's short profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithOwner {
    #[serde(flatten)]
    pub comment: Comment,
    pub owner: ProfileSummary,
}

/// One page of comments plus the total count for the video
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<CommentWithOwner>,
    pub page: i64,
    pub limit: i64,
    pub total_comments: i64,
}

pub struct CommentManager {
    db: SqlitePool,
}

impl CommentManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Comments on a video, newest first, with author summaries
    pub async fn list_for_video(
        &self,
        video_id: &str,
        page: i64,
        limit: i64,
    ) -> ApiResult<CommentPage> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let total_comments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM comment WHERE video_id = ?1")
                .bind(video_id)
                .fetch_one(&self.db)
                .await
                .map_err(ApiError::Database)?;

        let rows = sqlx::query(
            "SELECT c.id, c.video_id, c.owner_id, c.content, c.created_at, c.updated_at,
                    a.username, a.full_name, a.avatar_url
             FROM comment c
             JOIN account a ON a.id = c.owner_id
             WHERE c.video_id = ?1
             ORDER BY c.created_at DESC
             LIMIT ?2 OFFSET ?3",
        )
        .bind(video_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        let comments = rows
            .into_iter()
            .map(|row| CommentWithOwner {
                comment: Comment {
                    id: row.get("id"),
                    video_id: row.get("video_id"),
                    owner_id: row.get("owner_id"),
                    content: row.get("content"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                },
                owner: ProfileSummary {
                    id: row.get("owner_id"),
                    username: row.get("username"),
                    full_name: row.get("full_name"),
                    avatar_url: row.get("avatar_url"),
                },
            })
            .collect();

        Ok(CommentPage {
            comments,
            page,
            limit,
            total_comments,
        })
    }

    /// Add a comment to a video
    pub async fn create(&self, video_id: &str, owner_id: &str, content: &str) -> ApiResult<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ApiError::Validation(
                "Comment content is required".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO comment (id, video_id, owner_id, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        )
        .bind(&id)
        .bind(video_id)
        .bind(owner_id)
        .bind(content)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        self.get(&id).await
    }

    /// Get by id
    pub async fn get(&self, id: &str) -> ApiResult<Comment> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comment WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)?
            .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))
    }

    /// Rewrite the content
    pub async fn update(&self, id: &str, content: &str) -> ApiResult<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ApiError::Validation(
                "Comment content is required".to_string(),
            ));
        }

        sqlx::query("UPDATE comment SET content = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(content)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        self.get(id).await
    }

    /// Delete a comment (its likes cascade)
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM comment WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Comment not found".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn setup() -> (CommentManager, SqlitePool, String, String) {
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

        (CommentManager::new(pool.clone()), pool, owner_id, video_id)
    }

    #[tokio::test]
    async fn create_list_update_delete() {
        let (manager, _pool, owner, video) = setup().await;

        let comment = manager.create(&video, &owner, " nice clip ").await.unwrap();
        assert_eq!(comment.content, "nice clip");

        let page = manager.list_for_video(&video, 1, 10).await.unwrap();
        assert_eq!(page.total_comments, 1);
        assert_eq!(page.comments[0].owner.username, "ana");

        let updated = manager.update(&comment.id, "changed my mind").await.unwrap();
        assert_eq!(updated.content, "changed my mind");

        manager.delete(&comment.id).await.unwrap();
        assert!(matches!(
            manager.get(&comment.id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn blank_content_rejected() {
        let (manager, _pool, owner, video) = setup().await;
        assert!(matches!(
            manager.create(&video, &owner, "   ").await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn pagination_counts_all_pages() {
        let (manager, _pool, owner, video) = setup().await;
        for i in 0..15 {
            manager
                .create(&video, &owner, &format!("comment {}", i))
                .await
                .unwrap();
        }

        let first = manager.list_for_video(&video, 1, 10).await.unwrap();
        assert_eq!(first.comments.len(), 10);
        assert_eq!(first.total_comments, 15);

        let second = manager.list_for_video(&video, 2, 10).await.unwrap();
        assert_eq!(second.comments.len(), 5);
    }
}
