use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gymlog::auth_provider::AuthProvider;
use gymlog::config::Config;
use gymlog::db;
use gymlog::handlers::{api, auth, history, logger};
use gymlog::migrations::run_migrations;
use gymlog::repositories::{DraftRepository, SessionRepository, UserRepository, WorkoutRepository};
use gymlog::routes;
use gymlog::version::GIT_VERSION;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymlog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    tracing::info!("gymlog {} connecting to database: {}", GIT_VERSION, config.database_url);

    let pool = db::create_pool(&config.database_url)?;
    run_migrations(&pool)?;

    // Create repositories
    let user_repo = UserRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let draft_repo = DraftRepository::new(pool.clone());

    let expired = session_repo.cleanup_expired().await?;
    tracing::info!("Removed {} expired sessions", expired);

    // Create handler states
    let auth_state = auth::AuthState {
        auth: AuthProvider::new(user_repo, session_repo),
    };
    let logger_state = logger::LoggerState {
        workout_repo: workout_repo.clone(),
        draft_repo: draft_repo.clone(),
    };
    let history_state = history::HistoryState {
        workout_repo: workout_repo.clone(),
        draft_repo,
    };
    let api_state = api::ApiState { workout_repo };

    let app = routes::create_router(auth_state, logger_state, history_state, api_state);

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

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
