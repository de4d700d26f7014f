use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::api::extract::ApiBody;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::api::Ack;
use crate::crypto::{generate_salt, hash_password, verify_password};
use crate::db::{Post, PostRepository, SessionRepository, User, UserRepository};
use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_EMAIL_LEN: usize = 254;
const MAX_NAME_LEN: usize = 64;
const UNKNOWN_USER_SALT: [u8; 32] = [0x5a; 32];

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: User,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate and normalize an email address
fn validate_email(email: &str) -> Result<String, AppError> {
    let email = normalize_email(email);

    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(AppError::Validation("Email must be 1-254 characters".to_string()));
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !well_formed {
        return Err(AppError::Validation("Email address is invalid".to_string()));
    }

    Ok(email)
}

fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "Password must be {}-{} characters",
            MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn validate_name(name: Option<String>) -> Result<Option<String>, AppError> {
    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    if let Some(n) = &name {
        if n.chars().count() > MAX_NAME_LEN {
            return Err(AppError::Validation("Name must be at most 64 characters".to_string()));
        }
    }
    Ok(name)
}

/// Verify `password` for a possibly unknown user. An unknown email still pays
/// for a full hash so both failures take the same time.
fn check_password(password: &str, user: Option<&User>) -> Result<bool, AppError> {
    match user {
        Some(user) => verify_password(password, &user.password_hash, &user.password_salt),
        None => {
            hash_password(password, &UNKNOWN_USER_SALT)?;
            Ok(false)
        }
    }
}

/// POST /api/user/
pub async fn register(
    State(state): State<AppState>,
    ApiBody(req): ApiBody<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let email = validate_email(&req.email)?;
    validate_password(&req.password)?;
    let name = validate_name(req.name)?;

    if UserRepository::get_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::DuplicateUser);
    }

    // Hashing runs on the blocking pool
    let password = req.password;
    let (password_hash, salt) = tokio::task::spawn_blocking(move || {
        let salt = generate_salt();
        hash_password(&password, &salt).map(|hash| (hash, salt))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

    let user = UserRepository::create(&state.db, email, name, &password_hash, &salt).await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/user/login
pub async fn login(
    State(state): State<AppState>,
    ApiBody(req): ApiBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = normalize_email(&req.email);

    let user = UserRepository::get_by_email(&state.db, &email).await?;

    let password = req.password;
    let candidate = user.clone();
    let valid = tokio::task::spawn_blocking(move || check_password(&password, candidate.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))??;

    let user = match user {
        Some(user) if valid => user,
        _ => return Err(AppError::InvalidCredentials),
    };

    let purged = SessionRepository::delete_expired_for_user(&state.db, &user.id).await?;
    if purged > 0 {
        tracing::debug!(user_id = %user.id, purged, "expired sessions removed");
    }

    let session = SessionRepository::create(
        &state.db,
        &user.id,
        state.config.session_expiry_hours,
    ).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user,
    }))
}

/// POST /api/user/logout (requires auth)
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Ack>, AppError> {
    SessionRepository::delete(&state.db, &current.token).await?;

    tracing::info!(user_id = %current.user_id, "user logged out");

    Ok(Json(Ack::ok()))
}

/// GET /api/user/myPosts (requires auth)
pub async fn my_posts(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<Post>>, AppError> {
    let posts = PostRepository::list_by_user(&state.db, &current.user_id).await?;
    Ok(Json(posts))
}
