use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use stashr::{app, config::Config, storage::LocalStorage, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stashr=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // The storage layout must exist before the first request; an
    // unrecoverable filesystem failure here aborts startup.
    let storage = LocalStorage::new(config.upload_path.as_str());
    storage.initialize().await?;

    let server_address = config.server_address.clone();
    let state = Arc::new(AppState::new(config, storage));

    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    info!("stashr listening on {}", server_address);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
