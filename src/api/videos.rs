/// Video endpoints
use crate::{
    account::Principal,
    auth::ensure_owner,
    content::videos::{VideoListFilter, VideoUpdate, VideoWithOwner},
    context::AppContext,
    db::models::Video,
    error::{ApiError, ApiResult},
    response::ApiResponse,
};
use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    routing::{get, patch},
    Router,
};
use serde::Deserialize;

/// Build video routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(list_videos).post(publish_video))
        .route(
            "/:video_id",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route("/toggle/publish/:video_id", patch(toggle_publish))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    #[serde(default = "crate::api::default_page")]
    page: i64,
    #[serde(default = "crate::api::default_limit")]
    limit: i64,
    query: Option<String>,
    sort_by: Option<String>,
    sort_type: Option<String>,
    user_id: Option<String>,
}

/// Listing; unpublished videos only appear to their owner
async fn list_videos(
    State(ctx): State<AppContext>,
    principal: Principal,
    Query(query): Query<ListQuery>,
) -> ApiResult<ApiResponse<Vec<Video>>> {
    let filter = VideoListFilter {
        page: query.page,
        limit: query.limit,
        query: query.query,
        owner_id: query.user_id,
        sort_by: query.sort_by,
        descending: query.sort_type.as_deref() != Some("asc"),
    };

    let videos = ctx.videos.list(&filter, Some(&principal.id)).await?;

    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

#[derive(Default)]
struct VideoForm {
    title: Option<String>,
    description: Option<String>,
    video_file: Option<(String, Bytes)>,
    thumbnail: Option<(String, Bytes)>,
}

async fn read_video_form(mut multipart: Multipart) -> ApiResult<VideoForm> {
    let mut form = VideoForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => {
                form.title = Some(field.text().await.map_err(|e| {
                    ApiError::Validation(format!("Malformed multipart field: {}", e))
                })?)
            }
            "description" => {
                form.description = Some(field.text().await.map_err(|e| {
                    ApiError::Validation(format!("Malformed multipart field: {}", e))
                })?)
            }
            "videoFile" | "thumbnail" => {
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let data = field.bytes().await.map_err(|e| {
                    ApiError::Validation(format!("Malformed multipart file: {}", e))
                })?;
                if name == "videoFile" {
                    form.video_file = Some((file_name, data));
                } else {
                    form.thumbnail = Some((file_name, data));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Publish a video: upload the file (and optional thumbnail) to the media
/// store, then create the record. Duration comes from the media service.
async fn publish_video(
    State(ctx): State<AppContext>,
    principal: Principal,
    multipart: Multipart,
) -> ApiResult<ApiResponse<Video>> {
    let form = read_video_form(multipart).await?;

    let title = form
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("Title is required".to_string()))?
        .to_string();

    let (video_name, video_data) = form
        .video_file
        .ok_or_else(|| ApiError::Validation("Video file is required".to_string()))?;

    let uploaded = ctx.media.stage_and_upload(&video_name, &video_data).await?;

    let thumbnail_url = match form.thumbnail {
        Some((thumb_name, thumb_data)) => {
            Some(ctx.media.stage_and_upload(&thumb_name, &thumb_data).await?.url)
        }
        None => None,
    };

    let video = ctx
        .videos
        .create(
            &principal.id,
            &title,
            form.description.as_deref().unwrap_or(""),
            &uploaded.url,
            thumbnail_url.as_deref(),
            uploaded.duration,
        )
        .await?;

    Ok(ApiResponse::created(video, "Video published successfully"))
}

/// Fetch one video: counts the view and appends to the viewer's watch
/// history
async fn get_video(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(video_id): Path<String>,
) -> ApiResult<ApiResponse<VideoWithOwner>> {
    // Existence (and visibility) first
    ctx.videos.get_visible(&video_id, &principal.id).await?;

    ctx.videos.increment_views(&video_id).await?;
    ctx.accounts.record_watch(&principal.id, &video_id).await?;

    let video = ctx.videos.get_with_owner(&video_id, &principal.id).await?;

    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

/// Update title/description and optionally a new thumbnail
async fn update_video(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<ApiResponse<Video>> {
    let video = ctx.videos.get(&video_id).await?;
    ensure_owner(&principal, &video.owner_id)?;

    let form = read_video_form(multipart).await?;

    let thumbnail_url = match form.thumbnail {
        Some((thumb_name, thumb_data)) => {
            Some(ctx.media.stage_and_upload(&thumb_name, &thumb_data).await?.url)
        }
        None => None,
    };

    let updated = ctx
        .videos
        .update(
            &video_id,
            VideoUpdate {
                title: form.title,
                description: form.description,
                thumbnail_url,
            },
        )
        .await?;

    Ok(ApiResponse::ok(updated, "Video updated successfully"))
}

/// Delete a video
async fn delete_video(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(video_id): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let video = ctx.videos.get(&video_id).await?;
    ensure_owner(&principal, &video.owner_id)?;

    ctx.videos.delete(&video_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Video deleted successfully",
    ))
}

/// Flip the publish flag
async fn toggle_publish(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(video_id): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let video = ctx.videos.get(&video_id).await?;
    ensure_owner(&principal, &video.owner_id)?;

    let published = ctx.videos.toggle_publish(&video_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({ "published": published }),
        "Publish status updated successfully",
    ))
}
