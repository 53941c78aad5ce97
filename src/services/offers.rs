// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read side: paged offers by geo and per-geo counts.

use crate::db::OfferStore;
use crate::error::{AppError, Result};
use crate::models::{GeoStat, StoredOffer};
use serde::Serialize;
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const MAX_PAGE_SIZE: u32 = 20;

/// Static field kept from the legacy response shape.
pub const ADDITIONAL_DATA: &str = "Additional data";

/// Parameters of a geo offer lookup.
#[derive(Debug, Clone, Validate)]
pub struct GeoOfferQuery {
    #[validate(length(min = 1, message = "geo must not be empty"))]
    pub geo: String,
    #[validate(range(max = 20, message = "The maximum value for pageSize is 20"))]
    pub page_size: u32,
    /// Zero-based page index
    pub page: u32,
}

impl GeoOfferQuery {
    pub fn new(geo: impl Into<String>) -> Self {
        Self {
            geo: geo.into(),
            page_size: DEFAULT_PAGE_SIZE,
            page: 0,
        }
    }
}

/// One page of offers for a geo.
#[derive(Debug, Clone, Serialize)]
pub struct GeoOffersResponse {
    pub offers: Vec<StoredOffer>,
    /// Matches across all pages
    #[serde(rename = "totalOffers")]
    pub total_offers: u64,
    #[serde(rename = "additionalData")]
    pub additional_data: String,
}

/// Query service over the offer store.
#[derive(Clone)]
pub struct OfferQueryService {
    store: Arc<dyn OfferStore>,
    quiet: bool,
}

impl OfferQueryService {
    pub fn new(store: Arc<dyn OfferStore>, quiet: bool) -> Self {
        Self { store, quiet }
    }

    /// Get one page of offers listing `query.geo`.
    ///
    /// Validation runs before any storage access. A page with no matches is
    /// not found, even when earlier pages have offers.
    pub async fn get_offers_by_geo(&self, query: &GeoOfferQuery) -> Result<GeoOffersResponse> {
        let result = self.lookup(query).await;
        if let Err(e) = &result {
            if !self.quiet {
                tracing::error!(geo = %query.geo, page = query.page, error = %e, "Geo offer lookup failed");
            }
        }
        result
    }

    async fn lookup(&self, query: &GeoOfferQuery) -> Result<GeoOffersResponse> {
        query.validate().map_err(validation_error)?;
        if query.page_size == 0 {
            return Err(AppError::BadRequest(
                "pageSize must be at least 1".to_string(),
            ));
        }

        let skip = query.page.checked_mul(query.page_size).ok_or_else(|| {
            AppError::BadRequest("Page number causes overflow".to_string())
        })?;

        let offers = self
            .store
            .find_by_geo(&query.geo, skip, query.page_size)
            .await?;

        if offers.is_empty() {
            return Err(AppError::NotFound(format!(
                "Offers with current {} not found",
                query.geo
            )));
        }

        let total_offers = self.store.count_by_geo(&query.geo).await?;

        tracing::debug!(
            geo = %query.geo,
            page = query.page,
            page_size = query.page_size,
            returned = offers.len(),
            total_offers,
            "Geo offers fetched"
        );

        Ok(GeoOffersResponse {
            offers,
            total_offers,
            additional_data: ADDITIONAL_DATA.to_string(),
        })
    }

    /// Offer counts per geo code.
    pub async fn get_geo_stats(&self) -> Result<Vec<GeoStat>> {
        self.store.geo_stats().await.inspect_err(|e| {
            if !self.quiet {
                tracing::error!(error = %e, "Geo stats lookup failed");
            }
        })
    }
}

/// First validation message, as a client error.
fn validation_error(errors: ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| errors.to_string());
    AppError::BadRequest(message)
}
