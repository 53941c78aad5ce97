// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Offer routes: sync trigger, latest run, geo stats and geo lookup.

use crate::error::{AppError, Result};
use crate::models::{GeoStat, NormalizedOffer};
use crate::services::offers::{GeoOfferQuery, GeoOffersResponse, DEFAULT_PAGE_SIZE};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Offer routes, mounted under `/api`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/offers/sync", post(sync_offers))
        .route("/offers/all", get(get_all))
        .route("/offers/geo-stats", get(get_geo_stats))
        .route("/offers/{geo}", get(get_offers))
}

// ─── Sync ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SyncStartedResponse {
    pub message: String,
}

/// Start a sync with the offer source in the background.
///
/// Returns 409 if a sync is already running; the running sync is unaffected.
async fn sync_offers(State(state): State<Arc<AppState>>) -> Result<Json<SyncStartedResponse>> {
    state.sync_service.trigger()?;

    Ok(Json(SyncStartedResponse {
        message: "Synchronization started successfully".to_string(),
    }))
}

/// Offers normalized by the most recent completed sync.
///
/// This is not the stored corpus: offers stored by earlier runs are only
/// listed if the latest run saw them again.
async fn get_all(State(state): State<Arc<AppState>>) -> Json<Vec<NormalizedOffer>> {
    let offers = state
        .sync_service
        .last_report()
        .await
        .map(|report| report.offers.clone())
        .unwrap_or_default();

    Json(offers)
}

// ─── Geo ─────────────────────────────────────────────────────

/// Offer counts per geo code.
async fn get_geo_stats(State(state): State<Arc<AppState>>) -> Result<Json<Vec<GeoStat>>> {
    Ok(Json(state.query_service.get_geo_stats().await?))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OffersPageQuery {
    /// Offers per page (max 20)
    #[serde(rename = "pageSize", default = "default_page_size")]
    page_size: u32,
    /// Zero-based page number
    #[serde(default)]
    page: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Get one page of stored offers for a geo.
async fn get_offers(
    State(state): State<Arc<AppState>>,
    Path(geo): Path<String>,
    params: std::result::Result<Query<OffersPageQuery>, QueryRejection>,
) -> Result<Json<GeoOffersResponse>> {
    // Malformed or unknown parameters get the same JSON error body as validation.
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = GeoOfferQuery {
        geo,
        page_size: params.page_size,
        page: params.page,
    };

    Ok(Json(state.query_service.get_offers_by_geo(&query).await?))
}
