/// Content managers: videos, comments, tweets, playlists, likes,
/// subscriptions, and the channel dashboard.
///
/// One manager per concern, each owning its queries against the shared
/// pool. Ownership checks stay in the handlers, after the existence check.

pub mod comments;
pub mod dashboard;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod videos;

pub use comments::CommentManager;
pub use dashboard::DashboardManager;
pub use likes::LikeManager;
pub use playlists::PlaylistManager;
pub use subscriptions::SubscriptionManager;
pub use tweets::TweetManager;
pub use videos::VideoManager;
