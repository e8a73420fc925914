/// Like endpoints
use crate::{
    account::Principal,
    context::AppContext,
    db::models::Video,
    error::ApiResult,
    response::ApiResponse,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};

/// Build like routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/toggle/v/:video_id", post(toggle_video_like))
        .route("/toggle/c/:comment_id", post(toggle_comment_like))
        .route("/toggle/t/:tweet_id", post(toggle_tweet_like))
        .route("/videos", get(liked_videos))
}

/// The created like (or empty data for a removal) in the envelope
fn toggle_response(
    like: Option<crate::db::models::Like>,
    target: &str,
) -> ApiResponse<serde_json::Value> {
    match like {
        Some(like) => ApiResponse::ok(
            serde_json::json!(like),
            format!("{} liked successfully", target),
        ),
        None => ApiResponse::ok(
            serde_json::json!({}),
            format!("Like removed from {}", target),
        ),
    }
}

/// Toggle a like on a video; the target must exist
async fn toggle_video_like(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(video_id): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    ctx.videos.get(&video_id).await?;

    let like = ctx.likes.toggle_video(&principal.id, &video_id).await?;

    Ok(toggle_response(like, "Video"))
}

/// Toggle a like on a comment
async fn toggle_comment_like(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(comment_id): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    ctx.comments.get(&comment_id).await?;

    let like = ctx.likes.toggle_comment(&principal.id, &comment_id).await?;

    Ok(toggle_response(like, "Comment"))
}

/// Toggle a like on a tweet
async fn toggle_tweet_like(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(tweet_id): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    ctx.tweets.get(&tweet_id).await?;

    let like = ctx.likes.toggle_tweet(&principal.id, &tweet_id).await?;

    Ok(toggle_response(like, "Tweet"))
}

/// The caller's liked videos, newest like first
async fn liked_videos(
    State(ctx): State<AppContext>,
    principal: Principal,
) -> ApiResult<ApiResponse<Vec<Video>>> {
    let videos = ctx.likes.liked_videos(&principal.id).await?;

    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}
