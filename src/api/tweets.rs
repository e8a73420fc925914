/// Tweet endpoints
use crate::{
    account::Principal,
    auth::ensure_owner,
    context::AppContext,
    db::models::Tweet,
    error::ApiResult,
    response::ApiResponse,
};
use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;

/// Build tweet routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/", post(create_tweet))
        .route("/user/:user_id", get(user_tweets))
        .route("/:tweet_id", patch(update_tweet).delete(delete_tweet))
}

#[derive(Debug, Deserialize)]
struct TweetBody {
    content: String,
}

/// Post a tweet
async fn create_tweet(
    State(ctx): State<AppContext>,
    principal: Principal,
    Json(body): Json<TweetBody>,
) -> ApiResult<ApiResponse<Tweet>> {
    let tweet = ctx.tweets.create(&principal.id, &body.content).await?;

    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

/// All tweets by one account, newest first
async fn user_tweets(
    State(ctx): State<AppContext>,
    _principal: Principal,
    Path(user_id): Path<String>,
) -> ApiResult<ApiResponse<Vec<Tweet>>> {
    // 404 for a missing account rather than an empty list
    ctx.accounts.get_account(&user_id).await?;

    let tweets = ctx.tweets.list_for_user(&user_id).await?;

    Ok(ApiResponse::ok(tweets, "User tweets fetched successfully"))
}

/// Edit a tweet; existence before ownership
async fn update_tweet(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(tweet_id): Path<String>,
    Json(body): Json<TweetBody>,
) -> ApiResult<ApiResponse<Tweet>> {
    let tweet = ctx.tweets.get(&tweet_id).await?;
    ensure_owner(&principal, &tweet.owner_id)?;

    let updated = ctx.tweets.update(&tweet_id, &body.content).await?;

    Ok(ApiResponse::ok(updated, "Tweet updated successfully"))
}

/// Delete a tweet; existence before ownership
async fn delete_tweet(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(tweet_id): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let tweet = ctx.tweets.get(&tweet_id).await?;
    ensure_owner(&principal, &tweet.owner_id)?;

    ctx.tweets.delete(&tweet_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Tweet deleted successfully",
    ))
}
