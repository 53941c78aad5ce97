// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Outcome of one ingestion run.

use serde::Serialize;

use crate::models::NormalizedOffer;

/// Summary of a sync run.
///
/// `offers` holds only what this run normalized, not the stored corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub offers: Vec<NormalizedOffer>,
    /// Pages fetched and written completely
    pub pages_processed: u32,
    /// Records created by this run
    pub inserted: u32,
    /// Records whose offerId was already stored
    pub already_present: u32,
    /// Source records that could not be decoded
    pub skipped_records: u32,
    pub started_at: String,
    pub finished_at: String,
    /// Error that ended the run early, if any
    pub stopped_by: Option<String>,
}

impl SyncReport {
    /// True if the run drained the source up to an empty page.
    pub fn is_complete(&self) -> bool {
        self.stopped_by.is_none()
    }
}
