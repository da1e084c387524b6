//! Read-only HTTP endpoint for the assembled catalog.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::domain::models::CatalogEntry;

pub const MOVIES_ROUTE: &str = "/api/v0/movies";

const ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";
const ALLOW_HEADERS: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization";

#[derive(Clone)]
struct AppState {
    catalog: Arc<Vec<CatalogEntry>>,
}

pub fn router(catalog: Vec<CatalogEntry>) -> Router {
    Router::new()
        .route(MOVIES_ROUTE, get(list_movies).options(preflight))
        .with_state(AppState {
            catalog: Arc::new(catalog),
        })
}

pub async fn serve(catalog: Vec<CatalogEntry>, port: u16) -> Result<()> {
    let app = router(catalog);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding port {port}"))?;
    info!("Starting listener on port {port}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// CORS headers echoing the caller's `Origin`. Requests without one get none.
fn cors_headers(request: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(origin) = request.get(header::ORIGIN).filter(|o| !o.is_empty()) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
    }
    headers
}

async fn list_movies(State(state): State<AppState>, request: HeaderMap) -> Response {
    (cors_headers(&request), Json(state.catalog.as_slice())).into_response()
}

async fn preflight(request: HeaderMap) -> impl IntoResponse {
    (StatusCode::OK, cors_headers(&request))
}
