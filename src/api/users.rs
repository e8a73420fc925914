/// Account and session endpoints
use crate::{
    account::{
        ChangePasswordRequest, LoginRequest, NewAccount, Principal, RefreshRequest,
        SessionResponse, UpdateAccountRequest,
    },
    api::{middleware, Pagination},
    context::AppContext,
    error::{ApiError, ApiResult},
    response::ApiResponse,
};
use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;

/// Build user routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-token", post(refresh_token))
        .route("/password", patch(change_password))
        .route("/current-user", get(current_user))
        .route("/update-account", patch(update_account))
        .route("/avatar", patch(update_avatar))
        .route("/cover-image", patch(update_cover))
        .route("/channel/:username", get(channel_profile))
        .route("/watch-history", get(watch_history))
}

/// Fields collected from the registration multipart form
#[derive(Default)]
struct RegisterForm {
    username: Option<String>,
    email: Option<String>,
    full_name: Option<String>,
    password: Option<String>,
    avatar: Option<(String, Bytes)>,
    cover_image: Option<(String, Bytes)>,
}

async fn read_register_form(mut multipart: Multipart) -> ApiResult<RegisterForm> {
    let mut form = RegisterForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "username" => form.username = Some(read_text(field).await?),
            "email" => form.email = Some(read_text(field).await?),
            "fullName" => form.full_name = Some(read_text(field).await?),
            "password" => form.password = Some(read_text(field).await?),
            "avatar" => form.avatar = Some(read_file(field).await?),
            "coverImage" => form.cover_image = Some(read_file(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart field: {}", e)))
}

async fn read_file(field: axum::extract::multipart::Field<'_>) -> ApiResult<(String, Bytes)> {
    let file_name = field.file_name().unwrap_or("upload.bin").to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart file: {}", e)))?;
    Ok((file_name, data))
}

/// Register a new account
///
/// Multipart: username, email, fullName, password, avatar (file, required),
/// coverImage (file, optional). The response never carries the password
/// hash or a refresh token.
async fn register(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> ApiResult<ApiResponse<Principal>> {
    let form = read_register_form(multipart).await?;

    let required = |name: &str, value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Validation(format!("{} is required", name)))
    };

    let username = required("username", form.username)?;
    let email = required("email", form.email)?;
    let full_name = required("fullName", form.full_name)?;
    let password = required("password", form.password)?;

    let (avatar_name, avatar_data) = form
        .avatar
        .ok_or_else(|| ApiError::Validation("Avatar file is required".to_string()))?;

    let avatar = ctx
        .media
        .stage_and_upload(&avatar_name, &avatar_data)
        .await?;

    let cover_url = match form.cover_image {
        Some((cover_name, cover_data)) => Some(
            ctx.media
                .stage_and_upload(&cover_name, &cover_data)
                .await?
                .url,
        ),
        None => None,
    };

    let principal = ctx
        .accounts
        .register(NewAccount {
            username,
            email,
            full_name,
            password,
            avatar_url: avatar.url,
            cover_url,
        })
        .await?;

    Ok(ApiResponse::created(
        principal,
        "Account registered successfully",
    ))
}

/// Log in with username or email
///
/// The token pair goes out both in the envelope and as httpOnly cookies.
async fn login(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(CookieJar, ApiResponse<SessionResponse>)> {
    let session = ctx.accounts.login(&req.identifier, &req.password).await?;

    let jar = middleware::set_auth_cookies(
        jar,
        &crate::account::TokenPair {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
        },
        ctx.config.authentication.cookie_secure,
    );

    Ok((jar, ApiResponse::ok(session, "Logged in successfully")))
}

/// Log out: revoke the stored refresh token and drop both cookies
async fn logout(
    State(ctx): State<AppContext>,
    principal: Principal,
    jar: CookieJar,
) -> ApiResult<(CookieJar, ApiResponse<serde_json::Value>)> {
    ctx.accounts.logout(&principal.id).await?;

    let jar = middleware::clear_auth_cookies(jar);

    Ok((
        jar,
        ApiResponse::ok(serde_json::json!({}), "Logged out successfully"),
    ))
}

/// Rotate the refresh token: cookie preferred, body as fallback
async fn refresh_token(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> ApiResult<(CookieJar, ApiResponse<SessionResponse>)> {
    let presented = middleware::extract_refresh_cookie(&jar)
        .or_else(|| body.and_then(|Json(req)| req.refresh_token))
        .ok_or_else(|| ApiError::Unauthenticated("missing refresh token".to_string()))?;

    let session = ctx.accounts.refresh_session(&presented).await?;

    let jar = middleware::set_auth_cookies(
        jar,
        &crate::account::TokenPair {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
        },
        ctx.config.authentication.cookie_secure,
    );

    Ok((jar, ApiResponse::ok(session, "Session refreshed")))
}

/// Change password; requires the old one
async fn change_password(
    State(ctx): State<AppContext>,
    principal: Principal,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    ctx.accounts
        .change_password(&principal.id, &req.old_password, &req.new_password)
        .await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

/// The authenticated account
async fn current_user(principal: Principal) -> ApiResult<ApiResponse<Principal>> {
    Ok(ApiResponse::ok(principal, "Current user fetched"))
}

/// Update full name and/or email
async fn update_account(
    State(ctx): State<AppContext>,
    principal: Principal,
    Json(req): Json<UpdateAccountRequest>,
) -> ApiResult<ApiResponse<Principal>> {
    if req.full_name.is_none() && req.email.is_none() {
        return Err(ApiError::Validation(
            "At least one field must be updated".to_string(),
        ));
    }

    let updated = ctx
        .accounts
        .update_profile(&principal.id, req.full_name.as_deref(), req.email.as_deref())
        .await?;

    Ok(ApiResponse::ok(updated, "Account updated successfully"))
}

/// Pull the first file out of a single-file multipart request
async fn read_single_file(mut multipart: Multipart) -> ApiResult<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart request: {}", e)))?
    {
        if field.file_name().is_some() {
            return read_file(field).await;
        }
    }

    Err(ApiError::Validation("A file is required".to_string()))
}

/// Replace the avatar
async fn update_avatar(
    State(ctx): State<AppContext>,
    principal: Principal,
    multipart: Multipart,
) -> ApiResult<ApiResponse<Principal>> {
    let (file_name, data) = read_single_file(multipart).await?;
    let asset = ctx.media.stage_and_upload(&file_name, &data).await?;

    let updated = ctx.accounts.set_avatar(&principal.id, &asset.url).await?;

    Ok(ApiResponse::ok(updated, "Avatar updated successfully"))
}

/// Replace the cover image
async fn update_cover(
    State(ctx): State<AppContext>,
    principal: Principal,
    multipart: Multipart,
) -> ApiResult<ApiResponse<Principal>> {
    let (file_name, data) = read_single_file(multipart).await?;
    let asset = ctx.media.stage_and_upload(&file_name, &data).await?;

    let updated = ctx.accounts.set_cover(&principal.id, &asset.url).await?;

    Ok(ApiResponse::ok(updated, "Cover image updated successfully"))
}

/// Channel page for a username, personalized for the viewer
async fn channel_profile(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(username): Path<String>,
) -> ApiResult<ApiResponse<crate::account::ChannelProfile>> {
    let profile = ctx
        .accounts
        .channel_profile(&username, &principal.id)
        .await?;

    Ok(ApiResponse::ok(profile, "Channel profile fetched"))
}

/// The viewer's watch history, most recent first
async fn watch_history(
    State(ctx): State<AppContext>,
    principal: Principal,
    Query(pagination): Query<Pagination>,
) -> ApiResult<ApiResponse<Vec<crate::account::WatchHistoryItem>>> {
    let history = ctx
        .accounts
        .watch_history(&principal.id, pagination.page, pagination.limit)
        .await?;

    Ok(ApiResponse::ok(history, "Watch history fetched"))
}
