use maganghub_web::{router, AppState, WebConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match WebConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };
    let addr = config.bind_addr;

    tracing::info!(path = %config.snapshot_path.display(), "loading snapshot...");
    let state = match AppState::load(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to load snapshot");
            std::process::exit(1);
        }
    };
    tracing::info!(vacancies = state.catalog.len(), "snapshot loaded");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to bind on {addr}");
            std::process::exit(1);
        });
    tracing::info!("listening on {addr}");

    if let Err(e) = axum::serve(listener, router(state)).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
