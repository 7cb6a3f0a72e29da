use crate::api::{error::ApiError, AppState};
use crate::models::{Listing, ListingCreate, ListingUpdate, Neighborhood};
use crate::scoring::{self, ScoreBreakdown};
use crate::scrapers::{scrape_listing, ExtractedFields};
use crate::store::{IngestStatus, ListingPage, ListingQuery, Stats};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

#[derive(Deserialize)]
pub struct DiscardParams {
    pub reason: String,
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub status: IngestStatus,
    pub listing: Listing,
}

impl IngestResponse {
    fn into_reply(self) -> (StatusCode, Json<Self>) {
        let code = match self.status {
            IngestStatus::Created => StatusCode::CREATED,
            IngestStatus::Updated => StatusCode::OK,
        };
        (code, Json(self))
    }
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingPage>, ApiError> {
    Ok(Json(state.store.list(&query).await?))
}

pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Listing>, ApiError> {
    Ok(Json(state.store.get(id).await?))
}

pub async fn get_listing_score(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ScoreBreakdown>, ApiError> {
    let listing = state.store.get(id).await?;
    Ok(Json(scoring::breakdown(&listing)))
}

pub async fn create_listing(
    State(state): State<AppState>,
    Json(input): Json<ListingCreate>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let (status, listing) = state.store.ingest(input).await?;
    Ok(IngestResponse { status, listing }.into_reply())
}

pub async fn update_listing(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(update): Json<ListingUpdate>,
) -> Result<Json<Listing>, ApiError> {
    Ok(Json(state.store.update(id, update).await?))
}

pub async fn delete_listing(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete(id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

pub async fn discard_listing(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<DiscardParams>,
) -> Result<Json<Listing>, ApiError> {
    Ok(Json(state.store.discard(id, &params.reason).await?))
}

// ---------------------------------------------------------------------------
// Scraping
// ---------------------------------------------------------------------------

fn require_http_url(raw: &str) -> Result<String, ApiError> {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(raw.to_string()),
        _ => Err(ApiError::Invalid(format!("'{raw}' is not an http(s) URL"))),
    }
}

/// Fetch and extract without saving anything
pub async fn scrape_preview(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ExtractedFields>, ApiError> {
    let url = require_http_url(&request.url)?;
    let fields = scrape_listing(state.fetcher.as_ref(), &url)
        .await
        .map_err(ApiError::Fetch)?;
    Ok(Json(fields))
}

/// Fetch, extract, then ingest like a manual create
pub async fn import_listing(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let url = require_http_url(&request.url)?;
    let fields = scrape_listing(state.fetcher.as_ref(), &url)
        .await
        .map_err(ApiError::Fetch)?;

    let (status, listing) = state.store.ingest(fields.into_create(&url)).await?;
    info!(id = listing.id, status = ?status, score = listing.score, "Imported {}", url);
    Ok(IngestResponse { status, listing }.into_reply())
}

// ---------------------------------------------------------------------------
// Stats & neighborhoods
// ---------------------------------------------------------------------------

pub async fn get_stats(State(state): State<AppState>) -> Json<Stats> {
    Json(state.store.stats().await)
}

pub async fn list_neighborhoods(State(state): State<AppState>) -> Json<Vec<Neighborhood>> {
    Json(state.store.neighborhoods().await)
}

pub async fn create_neighborhood(
    State(state): State<AppState>,
    Json(neighborhood): Json<Neighborhood>,
) -> Result<(StatusCode, Json<Neighborhood>), ApiError> {
    let created = state.store.add_neighborhood(neighborhood).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
