// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Geo Offers: affiliate offers, scored and served by geo
//!
//! This crate ingests the paged offer list of an affiliate network, scores
//! and stores each offer once, and serves the stored offers page by page
//! for a requested geo.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::OfferStore;
use error::AppError;
use services::{IngestService, OfferQueryService, OfferSourceClient, SyncService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sync_service: Arc<SyncService>,
    pub query_service: OfferQueryService,
}

impl AppState {
    /// Wire the services around an offer store.
    pub fn new(config: Config, store: Arc<dyn OfferStore>) -> Result<Self, AppError> {
        let source = OfferSourceClient::new(config.offer_source_url.clone(), config.source_timeout)?;
        let ingest = IngestService::new(
            source,
            Arc::clone(&store),
            config.store_timeout,
            config.quiet_errors,
        );
        let query_service = OfferQueryService::new(store, config.quiet_errors);

        Ok(Self {
            config,
            sync_service: Arc::new(SyncService::new(ingest)),
            query_service,
        })
    }
}
