//! Carbot web view entry point.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use carbot_api::error::AppError;
use carbot_api::{routes, state};
use carbot_core::clock::SystemClock;
use carbot_core::repository::PromptRepository;
use carbot_core::rng::ThreadRngSource;
use carbot_prompts::PromptStore;
use carbot_store_json::JsonPromptRepository;
use carbot_store_pg::PgPromptRepository;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Carbot web view");

    // Read configuration from environment.
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // Pick the persistence backend: Postgres when DATABASE_URL is set,
    // otherwise the JSON file next to the bot.
    let repository: Arc<dyn PromptRepository> = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await?;
            sqlx::migrate!("../../migrations").run(&pool).await?;
            tracing::info!("Using PostgreSQL prompt store");
            Arc::new(PgPromptRepository::new(pool))
        }
        Err(_) => {
            let path =
                std::env::var("PROMPTS_PATH").unwrap_or_else(|_| "prompts.json".to_string());
            tracing::info!(path = %path, "Using JSON file prompt store");
            Arc::new(JsonPromptRepository::open(path).await?)
        }
    };

    let store = Arc::new(PromptStore::new(
        repository,
        Arc::new(SystemClock),
        Arc::new(Mutex::new(ThreadRngSource)),
    ));

    // Build application state and router.
    let app_state = state::AppState::new(store);
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::home::router())
        .merge(routes::prompts::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
