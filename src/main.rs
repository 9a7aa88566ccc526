use rust_hacienda_api::catalog::ReferenceCatalog;
use rust_hacienda_api::config::ServerConfig;
use rust_hacienda_api::handlers::{self, AppState};
use rust_hacienda_api::reconciler::ReferenceResolvers;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration and the optional reference
/// catalog, builds the registry clients and starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_hacienda_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let resolvers = match config.reference_catalog_path {
        Some(ref path) => ReferenceCatalog::from_file(path)?.into_resolvers(),
        None => {
            tracing::warn!("No reference catalog configured; reference ids will not be resolved");
            ReferenceResolvers::none()
        }
    };

    let app_state = Arc::new(AppState::new(&config.lookup, resolvers)?);

    // Both registry phases together stay well under this bound
    let app = handlers::router(app_state)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
