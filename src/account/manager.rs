/// Account manager implementation using runtime queries
use crate::{
    account::{
        ChannelProfile, NewAccount, Principal, ProfileSummary, SessionResponse, TokenPair,
        WatchHistoryItem,
    },
    db::models::{Account, Video},
    error::{ApiError, ApiResult},
    tokens::TokenService,
};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use password_hash::{PasswordHash, SaltString};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Account manager service
pub struct AccountManager {
    db: SqlitePool,
    tokens: TokenService,
}

impl AccountManager {
    /// Create a new account manager
    pub fn new(db: SqlitePool, tokens: TokenService) -> Self {
        Self { db, tokens }
    }

    /// Register a new account
    ///
    /// The caller has already pushed avatar/cover files to the media store;
    /// this only persists the record. The returned `Principal` carries no
    /// secret fields.
    pub async fn register(&self, new_account: NewAccount) -> ApiResult<Principal> {
        let username = new_account.username.trim().to_lowercase();
        let email = new_account.email.trim().to_string();
        let full_name = new_account.full_name.trim().to_string();

        Self::validate_username(&username)?;
        Self::validate_email(&email)?;
        Self::validate_password(&new_account.password)?;
        if full_name.is_empty() {
            return Err(ApiError::Validation("Full name is required".to_string()));
        }

        if self.username_exists(&username).await? {
            return Err(ApiError::Conflict(format!(
                "Username {} already taken",
                username
            )));
        }
        if self.email_exists(&email).await? {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = Self::hash_password(&new_account.password)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO account (id, username, email, full_name, password_hash, avatar_url, cover_url, refresh_token, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?8)",
        )
        .bind(&id)
        .bind(&username)
        .bind(&email)
        .bind(&full_name)
        .bind(&password_hash)
        .bind(&new_account.avatar_url)
        .bind(&new_account.cover_url)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        tracing::info!(username = %username, "account registered");

        Ok(Principal {
            id,
            username,
            email,
            full_name,
            avatar_url: Some(new_account.avatar_url),
            cover_url: new_account.cover_url,
            created_at: now,
        })
    }

    /// Authenticate by username or email
    ///
    /// Unknown identifier and wrong password both map to the same
    /// `InvalidCredentials` kind; nothing about which one failed may reach
    /// the client.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> ApiResult<Account> {
        let account = match self.find_by_identifier(identifier).await? {
            Some(account) => account,
            None => return Err(ApiError::InvalidCredentials),
        };

        if !Self::verify_password(password, &account.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Authenticate and open a session: issue both tokens and persist the
    /// refresh token onto the account row
    pub async fn login(&self, identifier: &str, password: &str) -> ApiResult<SessionResponse> {
        let account = self.authenticate(identifier, password).await?;
        let pair = self.issue_session(&account.id).await?;

        Ok(SessionResponse {
            user: Principal::from(account),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Issue a fresh token pair and store the refresh token
    ///
    /// Each call overwrites the previous stored refresh token, so only the
    /// newest session stays valid.
    pub async fn issue_session(&self, account_id: &str) -> ApiResult<TokenPair> {
        let access_token = self.tokens.issue_access_token(account_id)?;
        let refresh_token = self.tokens.issue_refresh_token(account_id)?;

        sqlx::query("UPDATE account SET refresh_token = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(&refresh_token)
            .bind(Utc::now())
            .bind(account_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Rotate a refresh token
    ///
    /// The presented token must verify cryptographically AND equal the
    /// stored copy. Both a forged token and a previously rotated one fail
    /// the same way. On success the old token is dead: a new pair is
    /// issued and the stored copy overwritten (single-use chain).
    pub async fn refresh_session(&self, presented: &str) -> ApiResult<SessionResponse> {
        let claims = self.tokens.verify_refresh(presented)?;

        let account = self
            .find_account(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::Unauthenticated("account no longer exists".to_string()))?;

        if account.refresh_token.as_deref() != Some(presented) {
            return Err(ApiError::Unauthenticated(
                "refresh token is not the current one".to_string(),
            ));
        }

        let pair = self.issue_session(&account.id).await?;

        tracing::debug!(account = %account.id, "refresh token rotated");

        Ok(SessionResponse {
            user: Principal::from(account),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Log out: clear the stored refresh token unconditionally
    ///
    /// This is the revocation mechanism; every previously issued refresh
    /// token stops working immediately.
    pub async fn logout(&self, account_id: &str) -> ApiResult<()> {
        sqlx::query("UPDATE account SET refresh_token = NULL, updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(account_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Change password; the old password must verify first
    pub async fn change_password(
        &self,
        account_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> ApiResult<()> {
        let account = self.get_account(account_id).await?;

        if !Self::verify_password(old_password, &account.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }

        Self::validate_password(new_password)?;
        let password_hash = Self::hash_password(new_password)?;

        sqlx::query("UPDATE account SET password_hash = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(&password_hash)
            .bind(Utc::now())
            .bind(account_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Get account by id
    pub async fn get_account(&self, id: &str) -> ApiResult<Account> {
        self.find_account(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))
    }

    /// Update full name and/or email
    pub async fn update_profile(
        &self,
        account_id: &str,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> ApiResult<Principal> {
        let account = self.get_account(account_id).await?;

        let full_name = match full_name.map(str::trim) {
            Some("") => {
                return Err(ApiError::Validation("Full name cannot be empty".to_string()));
            }
            Some(name) => name.to_string(),
            None => account.full_name.clone(),
        };

        let email = match email.map(str::trim) {
            Some(new_email) => {
                Self::validate_email(new_email)?;
                if new_email != account.email && self.email_exists(new_email).await? {
                    return Err(ApiError::Conflict("Email already registered".to_string()));
                }
                new_email.to_string()
            }
            None => account.email.clone(),
        };

        sqlx::query(
            "UPDATE account SET full_name = ?1, email = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(&full_name)
        .bind(&email)
        .bind(Utc::now())
        .bind(account_id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        let updated = self.get_account(account_id).await?;
        Ok(Principal::from(updated))
    }

    /// Replace the avatar URL
    pub async fn set_avatar(&self, account_id: &str, url: &str) -> ApiResult<Principal> {
        self.set_image_column(account_id, "avatar_url", url).await
    }

    /// Replace the cover image URL
    pub async fn set_cover(&self, account_id: &str, url: &str) -> ApiResult<Principal> {
        self.set_image_column(account_id, "cover_url", url).await
    }

    async fn set_image_column(
        &self,
        account_id: &str,
        column: &str,
        url: &str,
    ) -> ApiResult<Principal> {
        // Column name comes from the two callers above, never from input
        let sql = format!(
            "UPDATE account SET {} = ?1, updated_at = ?2 WHERE id = ?3",
            column
        );
        let result = sqlx::query(&sql)
            .bind(url)
            .bind(Utc::now())
            .bind(account_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Account not found".to_string()));
        }

        let updated = self.get_account(account_id).await?;
        Ok(Principal::from(updated))
    }

    /// Channel page for a username: profile plus subscription counts and
    /// whether the viewer already subscribes. Counting is delegated to the
    /// database.
    pub async fn channel_profile(
        &self,
        username: &str,
        viewer_id: &str,
    ) -> ApiResult<ChannelProfile> {
        let row = sqlx::query(
            "SELECT a.id, a.username, a.full_name, a.avatar_url, a.cover_url,
                    (SELECT COUNT(*) FROM subscription s WHERE s.channel_id = a.id) AS subscriber_count,
                    (SELECT COUNT(*) FROM subscription s WHERE s.subscriber_id = a.id) AS subscribed_to_count,
                    EXISTS(SELECT 1 FROM subscription s
                           WHERE s.channel_id = a.id AND s.subscriber_id = ?2) AS is_subscribed
             FROM account a WHERE a.username = ?1",
        )
        .bind(username.trim().to_lowercase())
        .bind(viewer_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

        Ok(ChannelProfile {
            id: row.get("id"),
            username: row.get("username"),
            full_name: row.get("full_name"),
            avatar_url: row.get("avatar_url"),
            cover_url: row.get("cover_url"),
            subscriber_count: row.get("subscriber_count"),
            subscribed_to_count: row.get("subscribed_to_count"),
            is_subscribed: row.get("is_subscribed"),
        })
    }

    /// Append to watch history
    ///
    /// Re-watching appends again; the history keeps repeats in order.
    pub async fn record_watch(&self, account_id: &str, video_id: &str) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO watch_history (account_id, video_id, watched_at) VALUES (?1, ?2, ?3)",
        )
        .bind(account_id)
        .bind(video_id)
        .bind(Utc::now())
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Watch history, most recent first, with the video and its owner
    pub async fn watch_history(
        &self,
        account_id: &str,
        page: i64,
        limit: i64,
    ) -> ApiResult<Vec<WatchHistoryItem>> {
        let offset = (page.max(1) - 1) * limit;

        let rows = sqlx::query(
            "SELECT w.watched_at,
                    v.id AS v_id, v.owner_id, v.title, v.description, v.video_url,
                    v.thumbnail_url, v.duration_secs, v.views, v.published,
                    v.created_at AS v_created_at, v.updated_at AS v_updated_at,
                    a.id AS owner_account_id, a.username, a.full_name,
                    a.avatar_url AS owner_avatar_url
             FROM watch_history w
             JOIN video v ON v.id = w.video_id
             JOIN account a ON a.id = v.owner_id
             WHERE w.account_id = ?1
             ORDER BY w.watched_at DESC, w.id DESC
             LIMIT ?2 OFFSET ?3",
        )
        .bind(account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(WatchHistoryItem {
                watched_at: row.get("watched_at"),
                video: Video {
                    id: row.get("v_id"),
                    owner_id: row.get("owner_id"),
                    title: row.get("title"),
                    description: row.get("description"),
                    video_url: row.get("video_url"),
                    thumbnail_url: row.get("thumbnail_url"),
                    duration_secs: row.get("duration_secs"),
                    views: row.get("views"),
                    published: row.get("published"),
                    created_at: row.get("v_created_at"),
                    updated_at: row.get("v_updated_at"),
                },
                owner: ProfileSummary {
                    id: row.get("owner_account_id"),
                    username: row.get("username"),
                    full_name: row.get("full_name"),
                    avatar_url: row.get("owner_avatar_url"),
                },
            });
        }

        Ok(items)
    }

    async fn find_account(&self, id: &str) -> ApiResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM account WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)
    }

    /// Find by username (lowercased) first, then by email as given
    async fn find_by_identifier(&self, identifier: &str) -> ApiResult<Option<Account>> {
        let identifier = identifier.trim();

        let by_username =
            sqlx::query_as::<_, Account>("SELECT * FROM account WHERE username = ?1")
                .bind(identifier.to_lowercase())
                .fetch_optional(&self.db)
                .await
                .map_err(ApiError::Database)?;

        if by_username.is_some() {
            return Ok(by_username);
        }

        sqlx::query_as::<_, Account>("SELECT * FROM account WHERE email = ?1")
            .bind(identifier)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)
    }

    async fn username_exists(&self, username: &str) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM account WHERE username = ?1")
            .bind(username)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM account WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(count > 0)
    }

    fn hash_password(password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Validate username format
    fn validate_username(username: &str) -> ApiResult<()> {
        if username.is_empty() {
            return Err(ApiError::Validation("Username cannot be empty".to_string()));
        }

        if username.len() < 3 {
            return Err(ApiError::Validation(
                "Username must be at least 3 characters".to_string(),
            ));
        }

        if username.len() > 30 {
            return Err(ApiError::Validation("Username too long".to_string()));
        }

        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(ApiError::Validation(
                "Username contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate email format
    fn validate_email(email: &str) -> ApiResult<()> {
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }

        Ok(())
    }

    fn validate_password(password: &str) -> ApiResult<()> {
        if password.len() < 8 {
            return Err(ApiError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AuthConfig, db};

    fn token_service() -> TokenService {
        TokenService::new(&AuthConfig {
            access_token_secret: "access-secret-for-tests-0123456789ab".to_string(),
            refresh_token_secret: "refresh-secret-for-tests-0123456789a".to_string(),
            access_token_ttl_secs: 3600,
            refresh_token_ttl_secs: 864000,
            cookie_secure: false,
        })
    }

    async fn create_test_manager() -> AccountManager {
        AccountManager::new(db::test_pool().await, token_service())
    }

    fn ana() -> NewAccount {
        NewAccount {
            username: "ana".to_string(),
            email: "ana@x.com".to_string(),
            full_name: "Ana".to_string(),
            password: "p@ss1234".to_string(),
            avatar_url: "https://media.example/ana.png".to_string(),
            cover_url: None,
        }
    }

    #[tokio::test]
    async fn register_returns_no_secret_fields() {
        let manager = create_test_manager().await;
        let principal = manager.register(ana()).await.unwrap();

        assert_eq!(principal.username, "ana");

        let value = serde_json::to_value(&principal).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(!keys.iter().any(|k| k.contains("password")));
        assert!(!keys.iter().any(|k| k.contains("refresh")));
    }

    #[tokio::test]
    async fn register_normalizes_username_case() {
        let manager = create_test_manager().await;
        let principal = manager
            .register(NewAccount {
                username: "AnaBanana".to_string(),
                ..ana()
            })
            .await
            .unwrap();

        assert_eq!(principal.username, "anabanana");

        // Lookup by any casing resolves to the same account
        let account = manager
            .authenticate("ANABANANA", "p@ss1234")
            .await
            .unwrap();
        assert_eq!(account.id, principal.id);
    }

    #[tokio::test]
    async fn duplicate_username_and_email_conflict() {
        let manager = create_test_manager().await;
        manager.register(ana()).await.unwrap();

        let same_username = manager
            .register(NewAccount {
                email: "other@x.com".to_string(),
                ..ana()
            })
            .await;
        assert!(matches!(same_username, Err(ApiError::Conflict(_))));

        let same_email = manager
            .register(NewAccount {
                username: "bea".to_string(),
                ..ana()
            })
            .await;
        assert!(matches!(same_email, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn authenticate_failure_is_indistinguishable() {
        let manager = create_test_manager().await;
        manager.register(ana()).await.unwrap();

        // Wrong password on a real account and a lookup of a missing
        // account must produce the identical error kind
        let wrong_password = manager.authenticate("ana", "wrong-password").await;
        let missing_account = manager.authenticate("nobody", "p@ss1234").await;

        assert!(matches!(wrong_password, Err(ApiError::InvalidCredentials)));
        assert!(matches!(missing_account, Err(ApiError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn authenticate_by_email_works() {
        let manager = create_test_manager().await;
        manager.register(ana()).await.unwrap();

        let account = manager.authenticate("ana@x.com", "p@ss1234").await.unwrap();
        assert_eq!(account.username, "ana");
    }

    #[tokio::test]
    async fn login_persists_refresh_token() {
        let manager = create_test_manager().await;
        manager.register(ana()).await.unwrap();

        let session = manager.login("ana", "p@ss1234").await.unwrap();

        let account = manager.get_account(&session.user.id).await.unwrap();
        assert_eq!(account.refresh_token.as_deref(), Some(session.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn refresh_rotation_is_single_use() {
        let manager = create_test_manager().await;
        manager.register(ana()).await.unwrap();
        let session = manager.login("ana", "p@ss1234").await.unwrap();
        let t1 = session.refresh_token;

        // Rotate T1 -> T2
        let rotated = manager.refresh_session(&t1).await.unwrap();
        let t2 = rotated.refresh_token;
        assert_ne!(t1, t2);

        // T1 still verifies cryptographically but no longer matches the
        // stored copy; it must be dead
        assert!(matches!(
            manager.refresh_session(&t1).await,
            Err(ApiError::Unauthenticated(_))
        ));

        // T2 is the live one
        assert!(manager.refresh_session(&t2).await.is_ok());
    }

    #[tokio::test]
    async fn logout_revokes_refresh_token() {
        let manager = create_test_manager().await;
        manager.register(ana()).await.unwrap();
        let session = manager.login("ana", "p@ss1234").await.unwrap();

        manager.logout(&session.user.id).await.unwrap();

        let account = manager.get_account(&session.user.id).await.unwrap();
        assert!(account.refresh_token.is_none());

        assert!(matches!(
            manager.refresh_session(&session.refresh_token).await,
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn new_login_invalidates_previous_session() {
        let manager = create_test_manager().await;
        manager.register(ana()).await.unwrap();

        let first = manager.login("ana", "p@ss1234").await.unwrap();
        let second = manager.login("ana", "p@ss1234").await.unwrap();

        // Single-active-session: the first refresh token stopped matching
        assert!(manager.refresh_session(&first.refresh_token).await.is_err());
        assert!(manager.refresh_session(&second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn change_password_requires_old_password() {
        let manager = create_test_manager().await;
        let principal = manager.register(ana()).await.unwrap();

        let wrong_old = manager
            .change_password(&principal.id, "not-the-password", "newp@ss99")
            .await;
        assert!(matches!(wrong_old, Err(ApiError::InvalidCredentials)));

        manager
            .change_password(&principal.id, "p@ss1234", "newp@ss99")
            .await
            .unwrap();

        assert!(manager.authenticate("ana", "p@ss1234").await.is_err());
        assert!(manager.authenticate("ana", "newp@ss99").await.is_ok());
    }

    #[tokio::test]
    async fn update_profile_checks_email_conflict() {
        let manager = create_test_manager().await;
        let first = manager.register(ana()).await.unwrap();
        manager
            .register(NewAccount {
                username: "bea".to_string(),
                email: "bea@x.com".to_string(),
                ..ana()
            })
            .await
            .unwrap();

        let taken = manager
            .update_profile(&first.id, None, Some("bea@x.com"))
            .await;
        assert!(matches!(taken, Err(ApiError::Conflict(_))));

        let updated = manager
            .update_profile(&first.id, Some("Ana Maria"), None)
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Ana Maria");
    }

    #[tokio::test]
    async fn watch_history_keeps_repeats_newest_first() {
        let manager = create_test_manager().await;
        let principal = manager.register(ana()).await.unwrap();

        // Seed two videos owned by ana
        for (id, title) in [("v1", "first"), ("v2", "second")] {
            sqlx::query(
                "INSERT INTO video (id, owner_id, title, description, video_url, created_at, updated_at)
                 VALUES (?1, ?2, ?3, '', 'https://media.example/v.mp4', ?4, ?4)",
            )
            .bind(id)
            .bind(&principal.id)
            .bind(title)
            .bind(Utc::now())
            .execute(&manager.db)
            .await
            .unwrap();
        }

        manager.record_watch(&principal.id, "v1").await.unwrap();
        manager.record_watch(&principal.id, "v2").await.unwrap();
        manager.record_watch(&principal.id, "v1").await.unwrap();

        let history = manager.watch_history(&principal.id, 1, 10).await.unwrap();
        let ids: Vec<&str> = history.iter().map(|h| h.video.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2", "v1"]);
        assert_eq!(history[0].owner.username, "ana");
    }

    #[tokio::test]
    async fn channel_profile_counts_subscriptions() {
        let manager = create_test_manager().await;
        let ana = manager.register(ana()).await.unwrap();
        let bea = manager
            .register(NewAccount {
                username: "bea".to_string(),
                email: "bea@x.com".to_string(),
                ..self::ana()
            })
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO subscription (id, subscriber_id, channel_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&bea.id)
        .bind(&ana.id)
        .bind(Utc::now())
        .execute(&manager.db)
        .await
        .unwrap();

        let profile = manager.channel_profile("ana", &bea.id).await.unwrap();
        assert_eq!(profile.subscriber_count, 1);
        assert_eq!(profile.subscribed_to_count, 0);
        assert!(profile.is_subscribed);

        let own_view = manager.channel_profile("ana", &ana.id).await.unwrap();
        assert!(!own_view.is_subscribed);

        let missing = manager.channel_profile("nobody", &ana.id).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }
}
