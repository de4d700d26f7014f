use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::extract::ApiJson;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::api::Ack;
use crate::db::{Post, PostRepository};
use crate::error::AppError;

const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeletePostRequest {
    pub id: String,
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::Validation("Title must be 1-200 characters".to_string()));
    }
    Ok(title.to_string())
}

fn validate_body(body: String) -> Result<String, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::Validation("Body must not be empty".to_string()));
    }
    Ok(body)
}

fn post_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Post {} not found", id))
}

/// POST /api/post/create (requires auth)
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let title = validate_title(&req.title)?;
    let body = validate_body(req.body)?;

    let post = PostRepository::create(&state.db, &current.user_id, title, body).await?;

    tracing::info!(post_id = %post.id, user_id = %current.user_id, "post created");

    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/post/update (requires auth)
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(req): ApiJson<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    if req.title.is_none() && req.body.is_none() {
        return Err(AppError::Validation("Nothing to update".to_string()));
    }

    let title = req.title.as_deref().map(validate_title).transpose()?;
    let body = req.body.map(validate_body).transpose()?;

    let post = PostRepository::update(&state.db, &req.id, &current.user_id, title, body)
        .await?
        .ok_or_else(|| post_not_found(&req.id))?;

    tracing::info!(post_id = %post.id, "post updated");

    Ok(Json(post))
}

/// DELETE /api/post/delete (requires auth)
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(req): ApiJson<DeletePostRequest>,
) -> Result<Json<Ack>, AppError> {
    if !PostRepository::delete(&state.db, &req.id, &current.user_id).await? {
        return Err(post_not_found(&req.id));
    }

    tracing::info!(post_id = %req.id, "post deleted");

    Ok(Json(Ack::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_trimmed() {
        assert_eq!(validate_title("  Hello  ").unwrap(), "Hello");
    }

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"t".repeat(MAX_TITLE_LEN)).is_ok());
        assert!(validate_title(&"t".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn test_blank_body() {
        assert!(matches!(validate_body(" \n".into()), Err(AppError::Validation(_))));
        assert_eq!(validate_body("text".into()).unwrap(), "text");
    }
}
