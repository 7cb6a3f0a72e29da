pub mod auth;
pub mod error;
pub mod health;
pub mod routes;

use crate::scrapers::PageFetcher;
use crate::store::ListingStore;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ListingStore>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(
        store: Arc<ListingStore>,
        fetcher: Arc<dyn PageFetcher>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            store,
            fetcher,
            api_key,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Mutations need the API key when one is configured
    let protected = Router::new()
        .route("/api/listings", post(routes::create_listing))
        .route("/api/listings/import", post(routes::import_listing))
        .route(
            "/api/listings/:id",
            patch(routes::update_listing).delete(routes::delete_listing),
        )
        .route("/api/listings/:id/discard", post(routes::discard_listing))
        .route("/api/scrape", post(routes::scrape_preview))
        .route("/api/neighborhoods", post(routes::create_neighborhood))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    let public = Router::new()
        .route("/api/listings", get(routes::list_listings))
        .route("/api/listings/:id", get(routes::get_listing))
        .route("/api/listings/:id/score", get(routes::get_listing_score))
        .route("/api/stats", get(routes::get_stats))
        .route("/api/neighborhoods", get(routes::list_neighborhoods))
        .merge(health::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
