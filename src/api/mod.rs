pub mod extract;
pub mod middleware;
pub mod posts;
pub mod state;
pub mod users;

pub use middleware::CurrentUser;
pub use state::AppState;

use axum::{
    Json, Router,
    routing::{delete, get, post, put},
    middleware as axum_middleware,
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};
use serde::Serialize;

use crate::client::{
    CREATE_POST_PATH, DELETE_POST_PATH, HEALTH_PATH, LOGIN_PATH, LOGOUT_PATH, MY_POSTS_PATH,
    REGISTER_PATH, UPDATE_POST_PATH,
};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Minimal success acknowledgment.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Ack { success: true }
    }
}

/// Build the application router.
///
/// Requests pass through, outermost first: tracing, CORS, method-mismatch
/// normalization, then (protected routes only) session authentication and
/// finally the handler. Any stage may short-circuit with an `AppError`.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route(HEALTH_PATH, get(health))
        .route(REGISTER_PATH, post(users::register))
        .route(REGISTER_PATH.trim_end_matches('/'), post(users::register))
        .route(LOGIN_PATH, post(users::login));

    let protected = Router::new()
        .route(LOGOUT_PATH, post(users::logout))
        .route(MY_POSTS_PATH, get(users::my_posts))
        .route(CREATE_POST_PATH, post(posts::create))
        .route(UPDATE_POST_PATH, put(posts::update))
        .route(DELETE_POST_PATH, delete(posts::delete))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    public
        .merge(protected)
        .fallback(middleware::not_found)
        .layer(axum_middleware::from_fn(middleware::normalize_method_not_allowed))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}
