// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync coordination: at most one ingestion run per process.
//!
//! State moves idle → running → idle. Entering `running` is a single
//! compare-and-swap; a caller that loses it gets a conflict instead of
//! waiting in line. The returned permit puts the state back to idle when
//! dropped, including when the run panics.

use crate::error::{AppError, Result};
use crate::models::SyncReport;
use crate::services::ingest::IngestService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Coordinates sync runs and keeps the latest report.
pub struct SyncService {
    ingest: IngestService,
    running: AtomicBool,
    last_report: RwLock<Option<Arc<SyncReport>>>,
}

/// Proof that the caller holds the running state.
pub struct SyncPermit {
    service: Arc<SyncService>,
}

impl Drop for SyncPermit {
    fn drop(&mut self) {
        self.service.running.store(false, Ordering::Release);
    }
}

impl SyncService {
    pub fn new(ingest: IngestService) -> Self {
        Self {
            ingest,
            running: AtomicBool::new(false),
            last_report: RwLock::new(None),
        }
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Enter the running state, or fail with a conflict if already there.
    pub fn begin(self: &Arc<Self>) -> Result<SyncPermit> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::sync_in_progress())?;

        Ok(SyncPermit {
            service: Arc::clone(self),
        })
    }

    /// Start a run in the background and return once it is started.
    pub fn trigger(self: &Arc<Self>) -> Result<()> {
        let permit = self.begin()?;
        let service = Arc::clone(self);

        tokio::spawn(async move {
            service.execute(permit).await;
        });

        tracing::info!("Offer synchronization started");
        Ok(())
    }

    /// Run a sync to completion.
    pub async fn run(self: &Arc<Self>) -> Result<Arc<SyncReport>> {
        let permit = self.begin()?;
        Ok(self.execute(permit).await)
    }

    async fn execute(&self, permit: SyncPermit) -> Arc<SyncReport> {
        let report = Arc::new(self.ingest.run().await);
        *self.last_report.write().await = Some(Arc::clone(&report));
        drop(permit);
        report
    }

    /// Report of the most recently completed run.
    pub async fn last_report(&self) -> Option<Arc<SyncReport>> {
        self.last_report.read().await.clone()
    }
}
