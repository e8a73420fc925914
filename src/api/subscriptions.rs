/// Subscription endpoints
use crate::{
    account::Principal,
    content::subscriptions::SubscriptionEntry,
    context::AppContext,
    error::{ApiError, ApiResult},
    response::ApiResponse,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};

/// Build subscription routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/c/:channel_id", post(toggle_subscription))
        .route("/c/:channel_id/subscribers", get(channel_subscribers))
        .route("/u/:subscriber_id", get(subscribed_channels))
}

/// Toggle a subscription to a channel; the channel must exist
async fn toggle_subscription(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(channel_id): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    ctx.accounts.get_account(&channel_id).await?;

    let edge = ctx
        .subscriptions
        .toggle(&principal.id, &channel_id)
        .await?;

    Ok(match edge {
        Some(subscription) => ApiResponse::ok(
            serde_json::json!(subscription),
            "Subscribed to channel successfully",
        ),
        None => ApiResponse::ok(
            serde_json::json!({}),
            "Unsubscribed from channel successfully",
        ),
    })
}

/// Subscriber list; only the channel owner may view it
async fn channel_subscribers(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(channel_id): Path<String>,
) -> ApiResult<ApiResponse<Vec<SubscriptionEntry>>> {
    ctx.accounts.get_account(&channel_id).await?;

    if principal.id != channel_id {
        return Err(ApiError::Forbidden(
            "You are not allowed to view this subscriber list".to_string(),
        ));
    }

    let subscribers = ctx.subscriptions.subscribers(&channel_id).await?;

    Ok(ApiResponse::ok(
        subscribers,
        "Channel subscribers fetched successfully",
    ))
}

/// Channels an account subscribes to; only that account may view it
async fn subscribed_channels(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(subscriber_id): Path<String>,
) -> ApiResult<ApiResponse<Vec<SubscriptionEntry>>> {
    ctx.accounts.get_account(&subscriber_id).await?;

    if principal.id != subscriber_id {
        return Err(ApiError::Forbidden(
            "You are not allowed to view this subscription list".to_string(),
        ));
    }

    let channels = ctx.subscriptions.subscribed_channels(&subscriber_id).await?;

    Ok(ApiResponse::ok(
        channels,
        "Subscribed channels fetched successfully",
    ))
}
