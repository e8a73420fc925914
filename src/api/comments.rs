/// Comment endpoints
use crate::{
    account::Principal,
    auth::ensure_owner,
    content::comments::CommentPage,
    context::AppContext,
    db::models::Comment,
    error::ApiResult,
    response::ApiResponse,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;

/// Build comment routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/:video_id", get(list_comments).post(add_comment))
        .route("/c/:comment_id", patch(update_comment).delete(delete_comment))
}

#[derive(Debug, Deserialize)]
struct CommentBody {
    content: String,
}

/// Comments on a video, newest first
async fn list_comments(
    State(ctx): State<AppContext>,
    _principal: Principal,
    Path(video_id): Path<String>,
    Query(pagination): Query<crate::api::Pagination>,
) -> ApiResult<ApiResponse<CommentPage>> {
    // 404 for a missing video rather than an empty page
    ctx.videos.get(&video_id).await?;

    let page = ctx
        .comments
        .list_for_video(&video_id, pagination.page, pagination.limit)
        .await?;

    Ok(ApiResponse::ok(page, "Video comments fetched successfully"))
}

/// Add a comment to a video
async fn add_comment(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(video_id): Path<String>,
    Json(body): Json<CommentBody>,
) -> ApiResult<ApiResponse<Comment>> {
    ctx.videos.get(&video_id).await?;

    let comment = ctx
        .comments
        .create(&video_id, &principal.id, &body.content)
        .await?;

    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

/// Edit a comment; existence before ownership
async fn update_comment(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(comment_id): Path<String>,
    Json(body): Json<CommentBody>,
) -> ApiResult<ApiResponse<Comment>> {
    let comment = ctx.comments.get(&comment_id).await?;
    ensure_owner(&principal, &comment.owner_id)?;

    let updated = ctx.comments.update(&comment_id, &body.content).await?;

    Ok(ApiResponse::ok(updated, "Comment updated successfully"))
}

/// Delete a comment; existence before ownership
async fn delete_comment(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(comment_id): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let comment = ctx.comments.get(&comment_id).await?;
    ensure_owner(&principal, &comment.owner_id)?;

    ctx.comments.delete(&comment_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Comment deleted successfully",
    ))
}
