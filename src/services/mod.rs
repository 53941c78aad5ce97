// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod ingest;
pub mod offers;
pub mod scoring;
pub mod source;
pub mod sync;

pub use ingest::IngestService;
pub use offers::{GeoOfferQuery, GeoOffersResponse, OfferQueryService};
pub use source::OfferSourceClient;
pub use sync::SyncService;
