/// vidtube - video sharing backend
///
/// Channels, videos, comments, likes, playlists, subscriptions, and tweets
/// behind a REST API, with media files offloaded to an external store.

mod account;
mod api;
mod auth;
mod config;
mod content;
mod context;
mod db;
mod error;
mod media_store;
mod rate_limit;
mod response;
mod server;
mod tokens;

use config::ServerConfig;
use context::AppContext;
use error::ApiResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ApiResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidtube=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let ctx = AppContext::new(config).await?;

    server::serve(ctx).await?;

    Ok(())
}
