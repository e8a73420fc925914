/// Playlist endpoints
use crate::{
    account::Principal,
    auth::ensure_owner,
    content::playlists::PlaylistWithVideos,
    context::AppContext,
    db::models::Playlist,
    error::ApiResult,
    response::ApiResponse,
};
use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;

/// Build playlist routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/", post(create_playlist))
        .route("/user/:user_id", get(user_playlists))
        .route(
            "/:playlist_id",
            get(get_playlist).patch(update_playlist).delete(delete_playlist),
        )
        .route(
            "/:playlist_id/videos/:video_id",
            patch(add_video).delete(remove_video),
        )
}

#[derive(Debug, Deserialize)]
struct CreatePlaylistBody {
    name: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct UpdatePlaylistBody {
    name: Option<String>,
    description: Option<String>,
}

/// Create a playlist
async fn create_playlist(
    State(ctx): State<AppContext>,
    principal: Principal,
    Json(body): Json<CreatePlaylistBody>,
) -> ApiResult<ApiResponse<Playlist>> {
    let playlist = ctx
        .playlists
        .create(&principal.id, &body.name, &body.description)
        .await?;

    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

/// All playlists owned by one account
async fn user_playlists(
    State(ctx): State<AppContext>,
    _principal: Principal,
    Path(user_id): Path<String>,
) -> ApiResult<ApiResponse<Vec<Playlist>>> {
    ctx.accounts.get_account(&user_id).await?;

    let playlists = ctx.playlists.list_for_user(&user_id).await?;

    Ok(ApiResponse::ok(playlists, "User playlists fetched successfully"))
}

/// Get one playlist with its videos
async fn get_playlist(
    State(ctx): State<AppContext>,
    _principal: Principal,
    Path(playlist_id): Path<String>,
) -> ApiResult<ApiResponse<PlaylistWithVideos>> {
    let playlist = ctx.playlists.get_with_videos(&playlist_id).await?;

    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

/// Add a video; playlist existence, then ownership, then video existence
async fn add_video(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path((playlist_id, video_id)): Path<(String, String)>,
) -> ApiResult<ApiResponse<PlaylistWithVideos>> {
    let playlist = ctx.playlists.get(&playlist_id).await?;
    ensure_owner(&principal, &playlist.owner_id)?;
    ctx.videos.get(&video_id).await?;

    ctx.playlists.add_video(&playlist_id, &video_id).await?;

    let updated = ctx.playlists.get_with_videos(&playlist_id).await?;

    Ok(ApiResponse::ok(updated, "Video added to playlist successfully"))
}

/// Remove a video from a playlist
async fn remove_video(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path((playlist_id, video_id)): Path<(String, String)>,
) -> ApiResult<ApiResponse<PlaylistWithVideos>> {
    let playlist = ctx.playlists.get(&playlist_id).await?;
    ensure_owner(&principal, &playlist.owner_id)?;

    ctx.playlists.remove_video(&playlist_id, &video_id).await?;

    let updated = ctx.playlists.get_with_videos(&playlist_id).await?;

    Ok(ApiResponse::ok(
        updated,
        "Video removed from playlist successfully",
    ))
}

/// Update name and/or description
async fn update_playlist(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(playlist_id): Path<String>,
    Json(body): Json<UpdatePlaylistBody>,
) -> ApiResult<ApiResponse<Playlist>> {
    let playlist = ctx.playlists.get(&playlist_id).await?;
    ensure_owner(&principal, &playlist.owner_id)?;

    let updated = ctx
        .playlists
        .update(&playlist_id, body.name.as_deref(), body.description.as_deref())
        .await?;

    Ok(ApiResponse::ok(updated, "Playlist updated successfully"))
}

/// Delete a playlist
async fn delete_playlist(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(playlist_id): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let playlist = ctx.playlists.get(&playlist_id).await?;
    ensure_owner(&principal, &playlist.owner_id)?;

    ctx.playlists.delete(&playlist_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Playlist deleted successfully",
    ))
}
