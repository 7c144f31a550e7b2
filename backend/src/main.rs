use std::sync::Arc;

use kissrug::{
    db::{self, MemorySwipeStore, PgSwipeStore, SwipeStore},
    get_db_pool,
    handlers::AppState,
    router::create_router,
    services::{MatchEvents, SwipeService},
    utils::{self, StorageBackend, TokenVerifier},
    Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();

    let config = Config::from_env()?;

    let store: Arc<dyn SwipeStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_config = db::DatabaseConfig::from_env()?;
            let pool = get_db_pool(&db_config).await?;

            // Run migrations
            db::migrations::run_migrations(&pool).await?;

            Arc::new(PgSwipeStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; swipes and matches are lost on restart");
            Arc::new(MemorySwipeStore::new())
        }
    };

    let service = SwipeService::new(store, MatchEvents::new(config.event_buffer), config.storage_timeout);
    let verifier = TokenVerifier::new(&config.jwt_secret, config.jwt_audience.as_deref());

    let port = config.port;
    let app = create_router(AppState::new(service, verifier), &config);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
