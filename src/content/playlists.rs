/// Playlist manager
use crate::{
    db::models::{Playlist, Video},
    error::{ApiError, ApiResult},
};
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Playlist with its videos in insertion order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistWithVideos {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub videos: Vec<Video>,
}

pub struct PlaylistManager {
    db: SqlitePool,
}

impl PlaylistManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a playlist; both name and description are required
    pub async fn create(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
    ) -> ApiResult<Playlist> {
        let name = name.trim();
        let description = description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(ApiError::Validation(
                "Name and description are both required".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO playlist (id, owner_id, name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        )
        .bind(&id)
        .bind(owner_id)
        .bind(name)
        .bind(description)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        self.get(&id).await
    }

    /// All playlists owned by one account, newest first
    pub async fn list_for_user(&self, user_id: &str) -> ApiResult<Vec<Playlist>> {
        sqlx::query_as::<_, Playlist>(
            "SELECT * FROM playlist WHERE owner_id = ?1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)
    }

    /// Get by id
    pub async fn get(&self, id: &str) -> ApiResult<Playlist> {
        sqlx::query_as::<_, Playlist>("SELECT * FROM playlist WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)?
            .ok_or_else(|| ApiError::NotFound("Playlist not found".to_string()))
    }

    /// Get by id with the member videos in the order they were added
    pub async fn get_with_videos(&self, id: &str) -> ApiResult<PlaylistWithVideos> {
        let playlist = self.get(id).await?;

        let videos = sqlx::query_as::<_, Video>(
            "SELECT v.* FROM playlist_video pv
             JOIN video v ON v.id = pv.video_id
             WHERE pv.playlist_id = ?1
             ORDER BY pv.added_at ASC",
        )
        .bind(id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(PlaylistWithVideos { playlist, videos })
    }

    /// Add a video; re-adding an existing member is a no-op (set semantics)
    pub async fn add_video(&self, playlist_id: &str, video_id: &str) -> ApiResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO playlist_video (playlist_id, video_id, added_at)
             VALUES (?1, ?2, ?3)",
        )
        .bind(playlist_id)
        .bind(video_id)
        .bind(Utc::now())
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Remove a video; removing a non-member is a no-op
    pub async fn remove_video(&self, playlist_id: &str, video_id: &str) -> ApiResult<()> {
        sqlx::query("DELETE FROM playlist_video WHERE playlist_id = ?1 AND video_id = ?2")
            .bind(playlist_id)
            .bind(video_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Update name and/or description; at least one must be present
    pub async fn update(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> ApiResult<Playlist> {
        let name = name.map(str::trim).filter(|s| !s.is_empty());
        let description = description.map(str::trim).filter(|s| !s.is_empty());
        if name.is_none() && description.is_none() {
            return Err(ApiError::Validation(
                "At least one field must be updated".to_string(),
            ));
        }

        let current = self.get(id).await?;

        sqlx::query(
            "UPDATE playlist SET name = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(name.unwrap_or(&current.name))
        .bind(description.unwrap_or(&current.description))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        self.get(id).await
    }

    /// Delete a playlist (membership rows cascade)
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM playlist WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Playlist not found".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn setup() -> (PlaylistManager, SqlitePool, String) {
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

        (PlaylistManager::new(pool.clone()), pool, owner_id)
    }

    async fn seed_video(pool: &SqlitePool, owner: &str, title: &str) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO video (id, owner_id, title, description, video_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, '', 'https://m/v.mp4', ?4, ?4)",
        )
        .bind(&id)
        .bind(owner)
        .bind(title)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
        id
    }

    #[tokio::test]
    async fn create_requires_both_fields() {
        let (manager, _pool, owner) = setup().await;
        assert!(matches!(
            manager.create(&owner, "mix", "  ").await,
            Err(ApiError::Validation(_))
        ));
        assert!(manager.create(&owner, "mix", "good stuff").await.is_ok());
    }

    #[tokio::test]
    async fn membership_is_a_set() {
        let (manager, pool, owner) = setup().await;
        let playlist = manager.create(&owner, "mix", "stuff").await.unwrap();
        let video = seed_video(&pool, &owner, "clip").await;

        manager.add_video(&playlist.id, &video).await.unwrap();
        manager.add_video(&playlist.id, &video).await.unwrap();

        let with_videos = manager.get_with_videos(&playlist.id).await.unwrap();
        assert_eq!(with_videos.videos.len(), 1);

        manager.remove_video(&playlist.id, &video).await.unwrap();
        let with_videos = manager.get_with_videos(&playlist.id).await.unwrap();
        assert!(with_videos.videos.is_empty());
    }

    #[tokio::test]
    async fn update_needs_at_least_one_field() {
        let (manager, _pool, owner) = setup().await;
        let playlist = manager.create(&owner, "mix", "stuff").await.unwrap();

        assert!(matches!(
            manager.update(&playlist.id, None, None).await,
            Err(ApiError::Validation(_))
        ));

        let updated = manager
            .update(&playlist.id, Some("new mix"), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "new mix");
        assert_eq!(updated.description, "stuff");
    }
}
