use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use meetbot_api::routes;
use meetbot_api::state::{AppState, AppStateInner};
use meetbot_storage::AudioStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "meetbot_server=debug,meetbot_api=debug,meetbot_db=debug,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let db_path = std::env::var("MEETBOT_DB_PATH").unwrap_or_else(|_| "meetbot.db".into());
    let host = std::env::var("MEETBOT_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("MEETBOT_PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()?;

    // Init database
    let db = meetbot_db::Database::open(&PathBuf::from(&db_path))?;

    // Audio storage is optional; without a bucket the download-link
    // endpoint serves placeholders.
    let storage = match std::env::var("AWS_BUCKET_NAME") {
        Ok(bucket) => Some(AudioStorage::connect(bucket).await),
        Err(_) => {
            info!("AWS_BUCKET_NAME not set, audio download links will be placeholders");
            None
        }
    };

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db, storage });

    let app = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("meetbot server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
