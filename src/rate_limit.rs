/// Rate limiting
use crate::{
    api::middleware::extract_token,
    config::RateLimitSettings,
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorLimiter,
};
use std::{num::NonZeroU32, sync::Arc};

/// Rate limiter manager
///
/// Requests that carry a token get the full quota; anonymous requests get
/// a fifth of it. Token presence, not validity, is what is checked here;
/// verification happens later in the pipeline.
#[derive(Clone)]
pub struct RateLimiter {
    enabled: bool,
    authenticated: Arc<GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    unauthenticated: Arc<GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimiter {
    pub fn new(settings: &RateLimitSettings) -> Self {
        let rps = NonZeroU32::new(settings.requests_per_second.max(1))
            .unwrap_or(NonZeroU32::new(50).unwrap());
        let burst =
            NonZeroU32::new(settings.burst_size.max(1)).unwrap_or(NonZeroU32::new(100).unwrap());

        let anon_rps = NonZeroU32::new((settings.requests_per_second / 5).max(1))
            .unwrap_or(NonZeroU32::new(10).unwrap());
        let anon_burst = NonZeroU32::new((settings.burst_size / 5).max(1))
            .unwrap_or(NonZeroU32::new(20).unwrap());

        Self {
            enabled: settings.enabled,
            authenticated: Arc::new(GovernorLimiter::direct(
                Quota::per_second(rps).allow_burst(burst),
            )),
            unauthenticated: Arc::new(GovernorLimiter::direct(
                Quota::per_second(anon_rps).allow_burst(anon_burst),
            )),
        }
    }

    /// Check the applicable quota
    pub fn check(&self, authenticated: bool) -> ApiResult<()> {
        if !self.enabled {
            return Ok(());
        }

        let limiter = if authenticated {
            &self.authenticated
        } else {
            &self.unauthenticated
        };

        limiter.check().map_err(|_| ApiError::RateLimited)
    }
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(ctx): State<AppContext>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authenticated = extract_token(req.headers()).is_some();
    ctx.rate_limiter.check(authenticated)?;

    Ok(next.run(req).await)
}
