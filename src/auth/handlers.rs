use axum::{
    extract::{FromRef, Path, State},
    Json,
};
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{
            AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, PublicUser,
            RefreshRequest, ResetPasswordRequest, SignupRequest, UserResponse, VerifyEmailRequest,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

const VERIFICATION_CODE_TTL_HOURS: i64 = 24;
const RESET_TOKEN_TTL_HOURS: i64 = 1;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn token_pair(state: &AppState, user_id: Uuid) -> Result<(String, String), ApiError> {
    let keys = JwtKeys::from_ref(state);
    let access = keys.sign_access(user_id)?;
    let refresh = keys.sign_refresh(user_id)?;
    Ok((access, refresh))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::validation("Password too short"));
    }
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let code = rand::thread_rng().gen_range(100_000..1_000_000).to_string();
    let code_expires = OffsetDateTime::now_utc() + Duration::hours(VERIFICATION_CODE_TTL_HOURS);

    let user = User::create(
        &state.db,
        &payload.email,
        &hash,
        payload.name.trim(),
        &code,
        code_expires,
    )
    .await?;

    state
        .mailer
        .send_verification_email(&user.email, &code)
        .await?;

    let (access_token, refresh_token) = token_pair(&state, user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }

    let mut user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    User::touch_last_login(&state.db, user.id).await?;
    user.last_login = OffsetDateTime::now_utc();

    let (access_token, refresh_token) = token_pair(&state, user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    let (access_token, refresh_token) = token_pair(&state, user.id)?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::verify_email(&state.db, payload.code.trim())
        .await?
        .ok_or_else(|| ApiError::validation("Invalid or expired verification code"))?;

    state
        .mailer
        .send_welcome_email(&user.email, &user.name)
        .await?;

    info!(user_id = %user.id, "email verified");
    Ok(Json(UserResponse {
        message: "Email verified successfully".into(),
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(mut payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| ApiError::validation("User not found"))?;

    let token = Uuid::new_v4().simple().to_string();
    let expires = OffsetDateTime::now_utc() + Duration::hours(RESET_TOKEN_TTL_HOURS);
    User::set_reset_token(&state.db, user.id, &token, expires).await?;

    let reset_url = format!("{}/reset-password/{}", state.config.client_url, token);
    state
        .mailer
        .send_password_reset_email(&user.email, &reset_url)
        .await?;

    info!(user_id = %user.id, "password reset requested");
    Ok(Json(MessageResponse {
        message: "Password reset link sent to your email".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.password.len() < 8 {
        return Err(ApiError::validation("Password too short"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::reset_password(&state.db, &token, &hash)
        .await?
        .ok_or_else(|| ApiError::validation("Invalid or expired reset token"))?;

    state.mailer.send_reset_success_email(&user.email).await?;

    info!(user_id = %user.id, "password reset");
    Ok(Json(MessageResponse {
        message: "Password reset successful".into(),
    }))
}

#[instrument(skip(state))]
pub async fn check_auth(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;
    Ok(Json(PublicUser::from(&user)))
}
