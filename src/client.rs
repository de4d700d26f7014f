//! Endpoint URLs consumed by the front-end.
//!
//! The route paths are shared with the router so both sides agree on them.

use crate::error::AppError;

pub const REGISTER_PATH: &str = "/api/user/";
pub const LOGIN_PATH: &str = "/api/user/login";
pub const LOGOUT_PATH: &str = "/api/user/logout";
pub const MY_POSTS_PATH: &str = "/api/user/myPosts";
pub const CREATE_POST_PATH: &str = "/api/post/create";
pub const UPDATE_POST_PATH: &str = "/api/post/update";
pub const DELETE_POST_PATH: &str = "/api/post/delete";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub register: String,
    pub login: String,
    pub logout: String,
    pub my_posts: String,
    pub create_post: String,
    pub update_post: String,
    pub delete_post: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let url = |path: &str| format!("{}{}", base, path);

        Endpoints {
            base_url: base.to_string(),
            register: url(REGISTER_PATH),
            login: url(LOGIN_PATH),
            logout: url(LOGOUT_PATH),
            my_posts: url(MY_POSTS_PATH),
            create_post: url(CREATE_POST_PATH),
            update_post: url(UPDATE_POST_PATH),
            delete_post: url(DELETE_POST_PATH),
        }
    }

    /// Reads the base URL from `API_BASE_URL`.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("API_BASE_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::Config("API_BASE_URL is not set".to_string()))?;
        Ok(Self::new(&base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_base() {
        let endpoints = Endpoints::new("https://blog.example.com");
        assert_eq!(endpoints.register, "https://blog.example.com/api/user/");
        assert_eq!(endpoints.login, "https://blog.example.com/api/user/login");
        assert_eq!(endpoints.my_posts, "https://blog.example.com/api/user/myPosts");
        assert_eq!(endpoints.create_post, "https://blog.example.com/api/post/create");
        assert_eq!(endpoints.update_post, "https://blog.example.com/api/post/update");
        assert_eq!(endpoints.delete_post, "https://blog.example.com/api/post/delete");
    }

    #[test]
    fn test_base_url_from_lookup() {
        let endpoints = Endpoints::from_vars(|key| match key {
            "API_BASE_URL" => Some("http://localhost:4000".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(endpoints, Endpoints::new("http://localhost:4000"));
    }

    #[test]
    fn test_missing_base_url() {
        let err = Endpoints::from_vars(|_| None).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("API_BASE_URL")));

        let err = Endpoints::from_vars(|_| Some("   ".to_string())).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_trailing_slash_is_dropped() {
        let endpoints = Endpoints::new("http://localhost:4000/");
        assert_eq!(endpoints.base_url, "http://localhost:4000");
        assert_eq!(endpoints.login, "http://localhost:4000/api/user/login");
    }
}
