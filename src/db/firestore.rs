// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing `OfferStore`.
//!
//! Offers live in one collection, keyed by the URL-encoded `offerId`.
//! Insert-only writes use document creation, which Firestore rejects with a
//! conflict when the document already exists.

use crate::db::OfferStore;
use crate::error::AppError;
use crate::models::{GeoStat, GeoStats, StoredOffer};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde::Deserialize;

/// Field holding the flat list of geo codes.
const GEO_CODES_FIELD: &str = "geo_codes";

/// Result row of a count aggregation.
#[derive(Debug, Deserialize)]
struct CountAggregate {
    count: usize,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    collection: String,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, collection: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id, collection).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, collection, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            collection: collection.to_string(),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Dummy token; the emulator does not verify it.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            collection,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            collection: collection.to_string(),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            collection: crate::db::collections::OFFERS.to_string(),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Document ID for an offer. Offer IDs are free text and may contain `/`.
    fn document_id(offer_id: &str) -> String {
        urlencoding::encode(offer_id).into_owned()
    }

    /// Get an offer by its offerId.
    pub async fn get_offer(&self, offer_id: &str) -> Result<Option<StoredOffer>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(&self.collection)
            .obj()
            .one(&Self::document_id(offer_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl OfferStore for FirestoreDb {
    async fn insert_if_absent(&self, offer: &StoredOffer) -> Result<bool, AppError> {
        let result: firestore::FirestoreResult<()> = self
            .get_client()?
            .fluent()
            .insert()
            .into(&self.collection)
            .document_id(Self::document_id(&offer.offer_id))
            .object(offer)
            .execute()
            .await;

        match result {
            Ok(()) => Ok(true),
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => {
                tracing::debug!(offer_id = %offer.offer_id, "Offer already stored");
                Ok(false)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn find_by_geo(
        &self,
        geo: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<StoredOffer>, AppError> {
        let geo = geo.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(self.collection.as_str())
            .filter(move |q| q.field(GEO_CODES_FIELD).array_contains(geo.clone()))
            .offset(skip)
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn count_by_geo(&self, geo: &str) -> Result<u64, AppError> {
        let geo = geo.to_string();

        let rows: Vec<CountAggregate> = self
            .get_client()?
            .fluent()
            .select()
            .from(self.collection.as_str())
            .filter(move |q| q.field(GEO_CODES_FIELD).array_contains(geo.clone()))
            .aggregate(|a| a.fields([a.field("count").count()]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.first().map_or(0, |row| row.count as u64))
    }

    async fn geo_stats(&self) -> Result<Vec<GeoStat>, AppError> {
        // Firestore has no group-by; stream the collection and count locally.
        let stream = self
            .get_client()?
            .fluent()
            .select()
            .from(self.collection.as_str())
            .obj::<StoredOffer>()
            .stream_query_with_errors()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let stats = stream
            .try_fold(GeoStats::default(), |mut stats, offer| async move {
                stats.add_offer(&offer);
                Ok(stats)
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(stats.into_sorted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_escapes_slashes() {
        assert_eq!(
            FirestoreDb::document_id("Shop/EU-30-USD"),
            "Shop%2FEU-30-USD"
        );
        assert_eq!(FirestoreDb::document_id("Test Offer-30-USD"), "Test%20Offer-30-USD");
    }

    #[tokio::test]
    async fn test_offline_mode_returns_database_error() {
        let db = FirestoreDb::new_mock();
        let err = db.count_by_geo("US").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
