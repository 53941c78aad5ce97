// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod offer;
pub mod stats;
pub mod sync;

pub use offer::{
    GeoEntry, NormalizedOffer, OfferCurrency, OfferPage, RawCurrency, RawGeo, RawOffer, RawStat,
    StoredOffer,
};
pub use stats::{GeoStat, GeoStats};
pub use sync::SyncReport;
