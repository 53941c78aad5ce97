//! In-process `OfferStore` for tests and local runs without Firestore.
//!
//! Records are kept in insertion order, so paging is stable.

use crate::db::OfferStore;
use crate::error::AppError;
use crate::models::{GeoStat, GeoStats, StoredOffer};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    offers: Vec<StoredOffer>,
    ids: HashSet<String>,
}

/// Offer store held in memory.
#[derive(Default)]
pub struct MemoryDb {
    inner: RwLock<Inner>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored offers.
    pub async fn len(&self) -> usize {
        self.inner.read().await.offers.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Get an offer by its offerId.
    pub async fn get_offer(&self, offer_id: &str) -> Option<StoredOffer> {
        self.inner
            .read()
            .await
            .offers
            .iter()
            .find(|o| o.offer_id == offer_id)
            .cloned()
    }
}

#[async_trait]
impl OfferStore for MemoryDb {
    async fn insert_if_absent(&self, offer: &StoredOffer) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        if !inner.ids.insert(offer.offer_id.clone()) {
            return Ok(false);
        }
        inner.offers.push(offer.clone());
        Ok(true)
    }

    async fn find_by_geo(
        &self,
        geo: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<StoredOffer>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .offers
            .iter()
            .filter(|o| o.has_geo(geo))
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_by_geo(&self, geo: &str) -> Result<u64, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.offers.iter().filter(|o| o.has_geo(geo)).count() as u64)
    }

    async fn geo_stats(&self) -> Result<Vec<GeoStat>, AppError> {
        let inner = self.inner.read().await;
        let mut stats = GeoStats::default();
        for offer in &inner.offers {
            stats.add_offer(offer);
        }
        Ok(stats.into_sorted())
    }
}
