//! MagangHub web UI.
//!
//! Serves the vacancy catalog (`/lowongan`), the email status lookup
//! (`/status`) and their JSON counterparts under `/api`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod templates;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::WebConfig;
pub use error::WebError;
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/vacancies", get(handlers::api_vacancies))
        .route("/api/status", get(handlers::api_status));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/lowongan", get(handlers::list_vacancies))
        .route("/status", get(handlers::status))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
