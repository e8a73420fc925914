/// API routes and handlers
pub mod comments;
pub mod dashboard;
pub mod health;
pub mod likes;
pub mod middleware;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod users;
pub mod videos;

use crate::context::AppContext;
use axum::Router;
use serde::Deserialize;

/// Common page/limit query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub(crate) fn default_page() -> i64 {
    1
}

pub(crate) fn default_limit() -> i64 {
    10
}

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .nest("/api/v1/healthcheck", health::routes())
        .nest("/api/v1/users", users::routes())
        .nest("/api/v1/videos", videos::routes())
        .nest("/api/v1/comments", comments::routes())
        .nest("/api/v1/tweets", tweets::routes())
        .nest("/api/v1/playlists", playlists::routes())
        .nest("/api/v1/likes", likes::routes())
        .nest("/api/v1/subscriptions", subscriptions::routes())
        .nest("/api/v1/dashboard", dashboard::routes())
}
