//! Database layer: the `OfferStore` seam and its implementations.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{GeoStat, StoredOffer};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const OFFERS: &str = "offers";
}

/// Document store operations the service relies on.
#[async_trait]
pub trait OfferStore: Send + Sync {
    /// Create the offer unless a record with the same `offer_id` exists.
    ///
    /// Returns `true` if the record was created, `false` if it was already
    /// present (the stored record is left untouched).
    async fn insert_if_absent(&self, offer: &StoredOffer) -> Result<bool, AppError>;

    /// Offers listing `geo`, skipping `skip` matches and returning at most `limit`.
    async fn find_by_geo(
        &self,
        geo: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<StoredOffer>, AppError>;

    /// Number of offers listing `geo`.
    async fn count_by_geo(&self, geo: &str) -> Result<u64, AppError>;

    /// Offer counts per geo code over the whole collection.
    async fn geo_stats(&self) -> Result<Vec<GeoStat>, AppError>;
}
