/// Video catalog manager
use crate::{
    account::ProfileSummary,
    db::models::Video,
    error::{ApiError, ApiResult},
};
use chrono::Utc;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Sortable columns for the public listing; anything else falls back to
/// creation time
const SORTABLE: &[&str] = &["created_at", "views", "duration_secs", "title"];

/// Listing filters and pagination
#[derive(Debug, Clone, Default)]
pub struct VideoListFilter {
    pub page: i64,
    pub limit: i64,
    /// Case-insensitive title substring
    pub query: Option<String>,
    pub owner_id: Option<String>,
    pub sort_by: Option<String>,
    pub descending: bool,
}

/// Video joined with its owner's short profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoWithOwner {
    #[serde(flatten)]
    pub video: Video,
    pub owner: ProfileSummary,
}

/// Fields accepted by the update path
#[derive(Debug, Clone, Default)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

pub struct VideoManager {
    db: SqlitePool,
}

impl VideoManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Publish a new video
    pub async fn create(
        &self,
        owner_id: &str,
        title: &str,
        description: &str,
        video_url: &str,
        thumbnail_url: Option<&str>,
        duration_secs: Option<f64>,
    ) -> ApiResult<Video> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("Title is required".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO video (id, owner_id, title, description, video_url, thumbnail_url, duration_secs, views, published, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 1, ?8, ?8)",
        )
        .bind(&id)
        .bind(owner_id)
        .bind(title)
        .bind(description.trim())
        .bind(video_url)
        .bind(thumbnail_url)
        .bind(duration_secs)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        self.get(&id).await
    }

    /// Get by id, regardless of publish state
    pub async fn get(&self, id: &str) -> ApiResult<Video> {
        sqlx::query_as::<_, Video>("SELECT * FROM video WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)?
            .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))
    }

    /// Get by id as seen by `viewer_id`: an unpublished video exists only
    /// for its owner
    pub async fn get_visible(&self, id: &str, viewer_id: &str) -> ApiResult<Video> {
        let video = self.get(id).await?;
        if !video.published && video.owner_id != viewer_id {
            return Err(ApiError::NotFound("Video not found".to_string()));
        }
        Ok(video)
    }

    /// Get by id joined with the owner profile
    pub async fn get_with_owner(&self, id: &str, viewer_id: &str) -> ApiResult<VideoWithOwner> {
        let video = self.get_visible(id, viewer_id).await?;

        let row = sqlx::query(
            "SELECT id, username, full_name, avatar_url FROM account WHERE id = ?1",
        )
        .bind(&video.owner_id)
        .fetch_one(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(VideoWithOwner {
            video,
            owner: ProfileSummary {
                id: row.get("id"),
                username: row.get("username"),
                full_name: row.get("full_name"),
                avatar_url: row.get("avatar_url"),
            },
        })
    }

    /// Public listing with filters, sort, and pagination. Unpublished
    /// videos appear only in their owner's view.
    pub async fn list(
        &self,
        filter: &VideoListFilter,
        viewer_id: Option<&str>,
    ) -> ApiResult<Vec<Video>> {
        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let sort_column = filter
            .sort_by
            .as_deref()
            .filter(|c| SORTABLE.contains(c))
            .unwrap_or("created_at");
        let direction = if filter.descending { "DESC" } else { "ASC" };

        // sort_column is whitelisted above; the rest is bound
        let sql = format!(
            "SELECT * FROM video
             WHERE (published = 1 OR owner_id = ?1)
               AND (?2 IS NULL OR title LIKE '%' || ?2 || '%')
               AND (?3 IS NULL OR owner_id = ?3)
             ORDER BY {} {}
             LIMIT ?4 OFFSET ?5",
            sort_column, direction
        );

        sqlx::query_as::<_, Video>(&sql)
            .bind(viewer_id.unwrap_or(""))
            .bind(filter.query.as_deref())
            .bind(filter.owner_id.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(ApiError::Database)
    }

    /// Bump the view counter; relies on the store's atomic single-row
    /// update, so concurrent views never lose increments
    pub async fn increment_views(&self, id: &str) -> ApiResult<()> {
        sqlx::query("UPDATE video SET views = views + 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Update title/description/thumbnail; last write wins on races
    pub async fn update(&self, id: &str, update: VideoUpdate) -> ApiResult<Video> {
        let current = self.get(id).await?;

        let title = match update.title.as_deref().map(str::trim) {
            Some("") | None => current.title.clone(),
            Some(t) => t.to_string(),
        };
        let description = match update.description.as_deref().map(str::trim) {
            None => current.description.clone(),
            Some(d) => d.to_string(),
        };
        let thumbnail_url = update.thumbnail_url.or(current.thumbnail_url.clone());

        sqlx::query(
            "UPDATE video SET title = ?1, description = ?2, thumbnail_url = ?3, updated_at = ?4 WHERE id = ?5",
        )
        .bind(&title)
        .bind(&description)
        .bind(&thumbnail_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        self.get(id).await
    }

    /// Delete a video (comments, likes, playlist entries, and history rows
    /// cascade in the schema)
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM video WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Video not found".to_string()));
        }

        Ok(())
    }

    /// Flip the publish flag; returns the new state
    pub async fn toggle_publish(&self, id: &str) -> ApiResult<bool> {
        let video = self.get(id).await?;
        let next = !video.published;

        sqlx::query("UPDATE video SET published = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(next)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(next)
    }
}
