/// Health check endpoint
use crate::{context::AppContext, db, error::ApiResult, response::ApiResponse};
use axum::{extract::State, routing::get, Router};

/// Build health routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/", get(healthcheck))
}

/// Reports OK only when the database answers
async fn healthcheck(
    State(ctx): State<AppContext>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    db::test_connection(&ctx.db).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({ "status": "OK" }),
        "Server is running fine",
    ))
}
