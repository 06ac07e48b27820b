//! Quill - A small publishing platform

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxBlogRepository, SqlxCommentRepository, SqlxSessionRepository},
    },
    services::{BlogService, CommentService, InteractionService, SessionIdentityResolver},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Quill...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    let applied = db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed ({} applied)", applied);

    // Repositories and services
    let blog_repo = SqlxBlogRepository::boxed(pool.clone());
    let comment_repo = SqlxCommentRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());

    let identity = Arc::new(SessionIdentityResolver::new(session_repo));

    let state = AppState {
        pool: pool.clone(),
        blog_service: Arc::new(BlogService::new(blog_repo.clone())),
        comment_service: Arc::new(CommentService::new(comment_repo, blog_repo.clone())),
        interaction_service: Arc::new(InteractionService::new(blog_repo)),
        identity: identity.clone(),
    };

    // Expired session cleanup
    {
        let identity = identity.clone();
        let period = Duration::from_secs(config.session.cleanup_interval_secs.max(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match identity.cleanup_expired().await {
                    Ok(0) => {}
                    Ok(removed) => tracing::info!("Removed {} expired sessions", removed),
                    Err(e) => tracing::warn!("Session cleanup failed: {:#}", e),
                }
            }
        });
    }

    // Build router
    let app = api::build_router(state, &config.server)?;

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    pool.close().await;
    Ok(())
}
