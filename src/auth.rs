/// Authentication extractors and the ownership guard
use crate::{
    account::Principal,
    api::middleware::extract_token,
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Per-request state machine: extract a token (cookie first, then bearer
/// header), verify it, resolve the account. Any failure along the way is
/// rejected uniformly before the handler runs. The resolved `Principal`
/// lives for this request only.
#[async_trait]
impl FromRequestParts<AppContext> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthenticated("missing token".to_string()))?;

        let claims = state.tokens.verify_access(&token)?;

        // The account may have disappeared since the token was minted
        let account = state
            .accounts
            .get_account(&claims.sub)
            .await
            .map_err(|_| ApiError::Unauthenticated("account no longer exists".to_string()))?;

        Ok(Principal::from(account))
    }
}

/// Ownership Guard: may `principal` mutate a resource owned by `owner_id`?
///
/// Pure decision, no side effects; identical across video, comment, tweet,
/// and playlist mutation paths.
pub fn can_mutate(principal: &Principal, owner_id: &str) -> bool {
    principal.id == owner_id
}

/// Enforce the ownership guard, turning a mismatch into `Forbidden`.
///
/// Callers must have established that the resource exists first, so that a
/// missing resource reads as `NotFound` rather than `Forbidden`.
pub fn ensure_owner(principal: &Principal, owner_id: &str) -> ApiResult<()> {
    if can_mutate(principal, owner_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You do not own this resource".to_string(),
        ))
    }
}
