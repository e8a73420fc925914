/// Application context and dependency injection
use crate::{
    account::AccountManager,
    config::ServerConfig,
    content::{
        CommentManager, DashboardManager, LikeManager, PlaylistManager, SubscriptionManager,
        TweetManager, VideoManager,
    },
    db,
    error::ApiResult,
    media_store::MediaStore,
    rate_limit::RateLimiter,
    tokens::TokenService,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub tokens: TokenService,
    pub accounts: Arc<AccountManager>,
    pub videos: Arc<VideoManager>,
    pub comments: Arc<CommentManager>,
    pub tweets: Arc<TweetManager>,
    pub playlists: Arc<PlaylistManager>,
    pub likes: Arc<LikeManager>,
    pub subscriptions: Arc<SubscriptionManager>,
    pub dashboard: Arc<DashboardManager>,
    pub media: MediaStore,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        config.validate()?;

        Self::ensure_directories(&config).await?;

        let pool = db::create_pool(&config.storage.database, db::DatabaseOptions::default()).await?;
        db::run_migrations(&pool).await?;
        db::test_connection(&pool).await?;

        let tokens = TokenService::new(&config.authentication);
        let accounts = Arc::new(AccountManager::new(pool.clone(), tokens.clone()));
        let videos = Arc::new(VideoManager::new(pool.clone()));
        let comments = Arc::new(CommentManager::new(pool.clone()));
        let tweets = Arc::new(TweetManager::new(pool.clone()));
        let playlists = Arc::new(PlaylistManager::new(pool.clone()));
        let likes = Arc::new(LikeManager::new(pool.clone()));
        let subscriptions = Arc::new(SubscriptionManager::new(pool.clone()));
        let dashboard = Arc::new(DashboardManager::new(pool.clone()));

        let media = MediaStore::new(&config.media, config.storage.temp_dir.clone());

        let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));

        Ok(Self {
            config: Arc::new(config),
            db: pool,
            tokens,
            accounts,
            videos,
            comments,
            tweets,
            playlists,
            likes,
            subscriptions,
            dashboard,
            media,
            rate_limiter,
        })
    }

    /// Ensure required directories exist
    async fn ensure_directories(config: &ServerConfig) -> ApiResult<()> {
        for dir in [&config.storage.data_directory, &config.storage.temp_dir] {
            if !dir.exists() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }

        Ok(())
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
