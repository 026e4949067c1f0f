use clap::Parser;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ga4ghr::{
    Backend, Config,
    config::BackendKind,
    handlers::{AppState, create_router},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let backend = match config.backend {
        BackendKind::Empty => Backend::empty(&config),
        BackendKind::Simulate => Backend::simulated(&config),
        BackendKind::File => Backend::from_data_dir(&config)?,
        BackendKind::Graph => Backend::with_graph(&config)?,
    };

    let state = AppState {
        backend: Arc::new(backend),
    };

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let app = if config.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    let addr = config.bind_addr();
    tracing::info!("Starting ga4ghr server on {}", addr);
    tracing::info!("Backend: {:?}", config.backend);
    if matches!(config.backend, BackendKind::File | BackendKind::Graph) {
        tracing::info!("Data directory: {:?}", config.data_dir);
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
