/// Channel dashboard endpoints
use crate::{
    account::Principal,
    api::Pagination,
    content::dashboard::{ChannelStats, ChannelVideos},
    context::AppContext,
    error::ApiResult,
    response::ApiResponse,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};

/// Build dashboard routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/stats", get(channel_stats))
        .route("/videos", get(channel_videos))
}

/// Aggregate numbers for the caller's channel
async fn channel_stats(
    State(ctx): State<AppContext>,
    principal: Principal,
) -> ApiResult<ApiResponse<ChannelStats>> {
    let stats = ctx.dashboard.channel_stats(&principal.id).await?;

    Ok(ApiResponse::ok(stats, "Dashboard stats fetched"))
}

/// The caller's own videos, paginated
async fn channel_videos(
    State(ctx): State<AppContext>,
    principal: Principal,
    Query(pagination): Query<Pagination>,
) -> ApiResult<ApiResponse<ChannelVideos>> {
    let videos = ctx
        .dashboard
        .channel_videos(&principal.id, pagination.page, pagination.limit)
        .await?;

    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}
