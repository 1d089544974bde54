//! Pressnote - a news board with comments and a personal notes area

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pressnote::{
    config::Config,
    db::{
        self,
        repositories::{
            SqlxCommentRepository, SqlxNewsRepository, SqlxNoteRepository, SqlxSessionRepository,
            SqlxUserRepository,
        },
    },
    services::{CommentService, NewsService, NoteService, UserService},
    web::{self, AppState, RequestStats, Templates},
};

/// How often expired sessions are swept and request stats logged.
const MAINTENANCE_INTERVAL_SECS: u64 = 3600;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pressnote=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pressnote...");

    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let news_repo = SqlxNewsRepository::boxed(pool.clone());
    let comment_repo = SqlxCommentRepository::boxed(pool.clone());
    let note_repo = SqlxNoteRepository::boxed(pool.clone());

    // Services
    let user_service = Arc::new(UserService::new(user_repo, session_repo));
    let news_service = Arc::new(NewsService::new(news_repo.clone()));
    let comment_service = Arc::new(CommentService::new(comment_repo, news_repo));
    let note_service = Arc::new(NoteService::new(note_repo));

    let templates = Arc::new(Templates::new()?);
    tracing::info!("Templates compiled");

    let request_stats = Arc::new(RequestStats::new());

    let state = AppState {
        user_service: user_service.clone(),
        news_service,
        comment_service,
        note_service,
        templates,
        content: Arc::new(config.content.clone()),
        request_stats: request_stats.clone(),
    };

    // Hourly maintenance: sweep expired sessions, log request stats.
    {
        let users = user_service.clone();
        let stats = request_stats.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(
                MAINTENANCE_INTERVAL_SECS,
            ));
            interval.tick().await; // first tick fires immediately
            loop {
                interval.tick().await;
                match users.sweep_sessions().await {
                    Ok(swept) if swept > 0 => tracing::info!(swept, "Swept expired sessions"),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Session sweep failed: {}", e),
                }
                tracing::debug!(
                    requests = stats.total_requests(),
                    avg_us = stats.avg_response_time_us(),
                    uptime_s = stats.uptime_seconds(),
                    "Request stats"
                );
            }
        });
    }

    let app = web::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
