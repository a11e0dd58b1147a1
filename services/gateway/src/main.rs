use gateway::{create_router, AppState};
use matching_engine::MatchingEngine;
use persistence::{DatabaseConfig, MySqlSink};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting order matching engine");

    let config = DatabaseConfig::from_env();
    let sink = MySqlSink::connect(&config).await?;
    sink.init_schema().await?;

    let engine = Arc::new(MatchingEngine::new(Arc::new(sink)));
    let state = AppState::new(engine);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
