use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postboard::{
    api::{create_router, AppState},
    client::{
        CREATE_POST_PATH, DELETE_POST_PATH, HEALTH_PATH, LOGIN_PATH, LOGOUT_PATH, MY_POSTS_PATH,
        REGISTER_PATH, UPDATE_POST_PATH,
    },
    config::Config,
    db,
    error::AppError,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,postboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting postboard server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::connect(&config).await?;
    tracing::info!("Database connected: {}", config.database_url);

    db::init_schema(&pool).await?;
    tracing::info!("Database initialized (users, posts, sessions)");

    let addr = config.server_address();
    let app = create_router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Health check: http://{}{}", addr, HEALTH_PATH);
    tracing::info!("API Endpoints:");
    tracing::info!("  POST   {:<20} - Register new user", REGISTER_PATH);
    tracing::info!("  POST   {:<20} - Login", LOGIN_PATH);
    tracing::info!("  POST   {:<20} - Logout (requires auth)", LOGOUT_PATH);
    tracing::info!("  GET    {:<20} - List my posts (requires auth)", MY_POSTS_PATH);
    tracing::info!("  POST   {:<20} - Create post (requires auth)", CREATE_POST_PATH);
    tracing::info!("  PUT    {:<20} - Update post (requires auth)", UPDATE_POST_PATH);
    tracing::info!("  DELETE {:<20} - Delete post (requires auth)", DELETE_POST_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
