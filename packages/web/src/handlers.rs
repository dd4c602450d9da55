use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::Json;
use serde::Deserialize;

use maganghub_core::catalog::{CatalogPage, ListingQuery};
use maganghub_core::status::StatusReport;
use maganghub_core::MagangError;

use crate::error::WebError;
use crate::state::AppState;
use crate::templates::listing::listing_page;
use crate::templates::status::{status_page, StatusView};
use crate::templates::Theme;

pub async fn index() -> Redirect {
    Redirect::to("/lowongan")
}

pub async fn health() -> &'static str {
    "OK"
}

/// Filter and page the snapshot, then refresh the visible page with live counters.
async fn catalog_page(state: &AppState, query: &ListingQuery) -> CatalogPage {
    let mut page = state.catalog.query(query, state.config.page_size);
    let records = std::mem::take(&mut page.records);
    page.records = state.enricher.enrich(records).await;
    page
}

fn theme_param(pairs: &[(String, String)]) -> Theme {
    Theme::from_param(
        pairs
            .iter()
            .find(|(k, _)| k == "theme")
            .map(|(_, v)| v.as_str()),
    )
}

pub async fn list_vacancies(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Html<String> {
    let query = ListingQuery::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let page = catalog_page(&state, &query).await;
    Html(listing_page(&page, &query, theme_param(&pairs)).into_string())
}

pub async fn api_vacancies(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<CatalogPage> {
    let query = ListingQuery::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    Json(catalog_page(&state, &query).await)
}

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub email: Option<String>,
    pub theme: Option<String>,
}

pub async fn status(State(state): State<AppState>, Query(params): Query<StatusParams>) -> Html<String> {
    let theme = Theme::from_param(params.theme.as_deref());
    let email = params.email.as_deref().map(str::trim);

    let view = match email {
        None => StatusView::Form,
        Some("") => StatusView::MissingEmail,
        Some(email) => match state.status.lookup_status(email).await {
            Ok(report) => StatusView::Report(report),
            Err(MagangError::NotFound(_)) => StatusView::NotFound,
            Err(MagangError::InvalidInput(_)) => StatusView::MissingEmail,
            Err(MagangError::RemoteService { status, body }) => {
                tracing::warn!(status, "status lookup rejected by the API");
                StatusView::RemoteError { status, body }
            }
            Err(e) => {
                tracing::error!(error = %e, "status lookup failed");
                StatusView::Failed(e.to_string())
            }
        },
    };

    Html(status_page(email, &view, theme).into_string())
}

pub async fn api_status(
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> Result<Json<StatusReport>, WebError> {
    let email = params
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| WebError::BadRequest("email is required".into()))?;

    Ok(Json(state.status.lookup_status(email).await?))
}
