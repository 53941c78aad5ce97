// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Affiliate network client for the paged offer list.
//!
//! Handles:
//! - Page requests (`?page=N&perpage=M`) with a request timeout
//! - Status checks and JSON decoding of the page envelope
//! - Per-record decoding, skipping records that do not parse

use crate::error::AppError;
use crate::models::{OfferPage, RawOffer};
use std::time::Duration;

/// One decoded page of source offers.
#[derive(Debug, Default)]
pub struct SourcePage {
    pub offers: Vec<RawOffer>,
    /// Records present in the payload but not decodable
    pub skipped: u32,
    /// Number of records in the payload, decodable or not
    pub raw_count: usize,
}

impl SourcePage {
    /// The source signals the end of data with an empty offer list.
    pub fn is_end(&self) -> bool {
        self.raw_count == 0
    }
}

/// Offer source API client.
#[derive(Clone)]
pub struct OfferSourceClient {
    http: reqwest::Client,
    base_url: String,
}

impl OfferSourceClient {
    /// Create a client for the given offer list URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of offers (pages start at 1).
    pub async fn fetch_page(&self, page: u32, per_page: u32) -> Result<SourcePage, AppError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("page", page.to_string()), ("perpage", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::Source(e.to_string()))?;

        let envelope: OfferPage = self.check_response_json(response).await?;
        Ok(decode_page(envelope, page))
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> serde::Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Offer source rate limit hit (429)");
            }

            return Err(AppError::Source(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("JSON parse error: {}", e)))
    }
}

/// Decode each record of a page on its own.
fn decode_page(envelope: OfferPage, page: u32) -> SourcePage {
    let raw_count = envelope.offers.len();
    let mut offers = Vec::with_capacity(raw_count);
    let mut skipped = 0;

    for (index, value) in envelope.offers.into_iter().enumerate() {
        match serde_json::from_value::<RawOffer>(value) {
            Ok(offer) => offers.push(offer),
            Err(e) => {
                skipped += 1;
                tracing::warn!(page, index, error = %e, "Skipping malformed offer record");
            }
        }
    }

    SourcePage {
        offers,
        skipped,
        raw_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_page_skips_bad_records() {
        let envelope: OfferPage = serde_json::from_value(json!({
            "offers": [
                { "name": "Good", "approval_time": 10, "payment_time": 20 },
                { "name": "No days" },
                "not an object"
            ]
        }))
        .unwrap();

        let page = decode_page(envelope, 1);
        assert_eq!(page.raw_count, 3);
        assert_eq!(page.skipped, 2);
        assert_eq!(page.offers.len(), 1);
        assert_eq!(page.offers[0].name, "Good");
        assert!(!page.is_end());
    }

    #[test]
    fn test_empty_page_is_end() {
        let envelope: OfferPage = serde_json::from_value(json!({ "offers": [] })).unwrap();
        assert!(decode_page(envelope, 3).is_end());
    }

    #[test]
    fn test_page_with_only_bad_records_is_not_end() {
        let envelope: OfferPage =
            serde_json::from_value(json!({ "offers": [{ "bogus": true }] })).unwrap();
        let page = decode_page(envelope, 1);
        assert!(!page.is_end());
        assert!(page.offers.is_empty());
    }
}
