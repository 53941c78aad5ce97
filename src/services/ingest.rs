// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Offer ingestion: drain the affiliate source into the offer store.
//!
//! Handles the core workflow, page by page:
//! 1. Fetch the page from the source (pages start at 1, 500 offers each)
//! 2. Normalize and score it
//! 3. Write every offer with insert-only semantics keyed by offerId
//!
//! The run ends on the first empty page. A fetch or write failure also ends
//! it; pages already written stay written and nothing is retried.

use crate::db::OfferStore;
use crate::error::{AppError, Result};
use crate::models::{NormalizedOffer, StoredOffer, SyncReport};
use crate::services::scoring::{generate_offer_id, map_offers};
use crate::services::source::OfferSourceClient;
use crate::time_utils::now_rfc3339;
use std::sync::Arc;
use std::time::Duration;

/// Offers requested per source page.
pub const SOURCE_PAGE_SIZE: u32 = 500;

/// Runs paginated ingestion against an `OfferStore`.
#[derive(Clone)]
pub struct IngestService {
    source: OfferSourceClient,
    store: Arc<dyn OfferStore>,
    store_timeout: Duration,
    quiet: bool,
}

impl IngestService {
    pub fn new(
        source: OfferSourceClient,
        store: Arc<dyn OfferStore>,
        store_timeout: Duration,
        quiet: bool,
    ) -> Self {
        Self {
            source,
            store,
            store_timeout,
            quiet,
        }
    }

    /// Run ingestion and return the offers normalized by this run.
    ///
    /// Offers stored by earlier runs are not included.
    pub async fn fetch_offers(&self) -> Vec<NormalizedOffer> {
        self.run().await.offers
    }

    /// Run ingestion to completion or first failure.
    pub async fn run(&self) -> SyncReport {
        let mut report = SyncReport {
            started_at: now_rfc3339(),
            ..SyncReport::default()
        };

        tracing::info!(source = %self.source.base_url(), "Starting offer ingestion");

        let mut page = 1u32;
        loop {
            let fetched = match self.source.fetch_page(page, SOURCE_PAGE_SIZE).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    self.stop(&mut report, page, "Offer fetch failed, stopping ingestion", e);
                    break;
                }
            };

            if fetched.is_end() {
                tracing::debug!(page, "Empty page, offer source drained");
                break;
            }

            report.skipped_records += fetched.skipped;

            let mapped = map_offers(&fetched.offers);
            tracing::debug!(
                page,
                received = fetched.raw_count,
                kept = mapped.len(),
                "Fetched offer page"
            );

            // Offers count as ingested once normalized, even if a write below fails.
            report.offers.extend(mapped.iter().cloned());

            if let Err(e) = self.write_page(mapped, &mut report).await {
                self.stop(&mut report, page, "Offer write failed, stopping ingestion", e);
                break;
            }

            report.pages_processed += 1;
            page = match page.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }

        report.finished_at = now_rfc3339();

        tracing::info!(
            pages = report.pages_processed,
            offers = report.offers.len(),
            inserted = report.inserted,
            already_present = report.already_present,
            skipped_records = report.skipped_records,
            complete = report.is_complete(),
            "Offer ingestion finished"
        );

        report
    }

    /// Insert every offer of a page, in order, unless already stored.
    async fn write_page(&self, offers: Vec<NormalizedOffer>, report: &mut SyncReport) -> Result<()> {
        let now = now_rfc3339();

        for offer in offers {
            let offer_id = generate_offer_id(&offer);
            let record = StoredOffer::new(offer, offer_id, &now);

            let created = tokio::time::timeout(
                self.store_timeout,
                self.store.insert_if_absent(&record),
            )
            .await
            .map_err(|_| {
                AppError::Database(format!(
                    "Write of {} timed out after {:?}",
                    record.offer_id, self.store_timeout
                ))
            })??;

            if created {
                report.inserted += 1;
            } else {
                report.already_present += 1;
            }
        }

        Ok(())
    }

    fn stop(&self, report: &mut SyncReport, page: u32, message: &str, error: AppError) {
        if !self.quiet {
            tracing::error!(page, error = %error, "{}", message);
        }
        report.stopped_by = Some(error.to_string());
    }
}
