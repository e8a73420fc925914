/// Token service: issues and verifies the session credentials
///
/// Access tokens are short-lived and purely cryptographic. Refresh tokens
/// are longer-lived and additionally mirrored onto the account row by the
/// caller; the stored copy is what makes revocation possible. The two kinds
/// are signed with distinct secrets, so a token minted in one namespace
/// never verifies in the other.
use crate::{
    config::AuthConfig,
    error::{ApiError, ApiResult},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by both token kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies access/refresh tokens
#[derive(Clone)]
pub struct TokenService {
    access_secret: String,
    refresh_secret: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_secret: config.access_token_secret.clone(),
            refresh_secret: config.refresh_token_secret.clone(),
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        }
    }

    /// Issue a short-lived access token
    pub fn issue_access_token(&self, account_id: &str) -> ApiResult<String> {
        Self::issue(account_id, &self.access_secret, self.access_ttl_secs)
    }

    /// Issue a long-lived refresh token
    ///
    /// The caller must persist the returned value onto the account row as
    /// part of the same logical operation; a token that verifies but does
    /// not match the stored copy is rejected on next use.
    pub fn issue_refresh_token(&self, account_id: &str) -> ApiResult<String> {
        Self::issue(account_id, &self.refresh_secret, self.refresh_ttl_secs)
    }

    /// Verify an access token
    pub fn verify_access(&self, token: &str) -> ApiResult<Claims> {
        Self::verify(token, &self.access_secret)
    }

    /// Verify a refresh token (signature + expiry only; the stored-copy
    /// equality check lives in the account manager)
    pub fn verify_refresh(&self, token: &str) -> ApiResult<Claims> {
        Self::verify(token, &self.refresh_secret)
    }

    fn issue(account_id: &str, secret: &str, ttl_secs: i64) -> ApiResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now,
            exp: now + ttl_secs,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }

    fn verify(token: &str, secret: &str) -> ApiResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Allow some clock skew
        validation.leeway = 30;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| ApiError::Unauthenticated(format!("token verification failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService {
            access_secret: "access-secret-for-tests-0123456789ab".to_string(),
            refresh_secret: "refresh-secret-for-tests-0123456789a".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 864000,
        }
    }

    #[test]
    fn access_token_round_trips() {
        let svc = service();
        let token = svc.issue_access_token("acct-1").unwrap();
        let claims = svc.verify_access(&token).unwrap();
        assert_eq!(claims.sub, "acct-1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn secrets_are_namespaced() {
        let svc = service();

        // An access token must never verify against the refresh secret,
        // and vice versa
        let access = svc.issue_access_token("acct-1").unwrap();
        assert!(matches!(
            svc.verify_refresh(&access),
            Err(ApiError::Unauthenticated(_))
        ));

        let refresh = svc.issue_refresh_token("acct-1").unwrap();
        assert!(matches!(
            svc.verify_access(&refresh),
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let svc = TokenService {
            access_ttl_secs: -3600,
            ..service()
        };
        let token = svc.issue_access_token("acct-1").unwrap();
        assert!(matches!(
            svc.verify_access(&token),
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[test]
    fn garbage_token_rejected() {
        let svc = service();
        for junk in ["", "not-a-jwt", "aaaa.bbbb.cccc"] {
            assert!(matches!(
                svc.verify_access(junk),
                Err(ApiError::Unauthenticated(_))
            ));
        }
    }

    #[test]
    fn tampered_token_rejected() {
        let svc = service();
        let token = svc.issue_access_token("acct-1").unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(svc.verify_access(&tampered).is_err());
    }
}
