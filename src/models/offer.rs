// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Offer models: raw affiliate payloads, normalized offers and stored records.

use serde::{Deserialize, Deserializer, Serialize};

// ─── Raw Source Payloads ─────────────────────────────────────

/// One page of the affiliate offer list endpoint.
///
/// Offers are kept as raw JSON so that each record can be decoded on its own;
/// one malformed record must not take the whole page down with it.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferPage {
    pub offers: Vec<serde_json::Value>,
}

/// Offer record as published by the affiliate network (untrusted).
#[derive(Debug, Clone, Deserialize)]
pub struct RawOffer {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "currency")]
    pub offer_currency: RawCurrency,
    /// Days until a conversion is approved
    #[serde(deserialize_with = "number_or_string")]
    pub approval_time: f64,
    /// Days until an approved conversion is paid out
    #[serde(deserialize_with = "number_or_string")]
    pub payment_time: f64,
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub stat: RawStat,
    #[serde(default)]
    pub geo: Vec<RawGeo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCurrency {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Conversion statistics. The network publishes these as numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStat {
    #[serde(default, deserialize_with = "string_or_number")]
    pub cr: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ar: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ecpc: String,
    /// Effective cost per lead
    #[serde(default, deserialize_with = "string_or_number")]
    pub ecpl: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeo {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub parent_id: String,
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children_ids: Vec<serde_json::Value>,
}

// ─── Normalized / Stored Offers ──────────────────────────────

/// Currency reduced to its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferCurrency {
    pub name: String,
}

/// Geo entry stripped of ids and hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEntry {
    pub code: String,
    pub name: String,
}

/// Scored offer in its canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedOffer {
    pub name: String,
    pub offer_currency: OfferCurrency,
    pub approval_time: f64,
    pub site_url: String,
    pub logo: String,
    pub geo: Vec<GeoEntry>,
    pub rating: f64,
}

/// Persisted offer record (document in the `offers` collection).
///
/// Written once per `offer_id` and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOffer {
    #[serde(rename = "offerId")]
    pub offer_id: String,
    pub name: String,
    pub offer_currency: OfferCurrency,
    pub approval_time: f64,
    pub site_url: String,
    pub logo: String,
    pub geo: Vec<GeoEntry>,
    /// Flat list of geo codes, queried with array membership
    #[serde(default)]
    pub geo_codes: Vec<String>,
    pub rating: f64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl StoredOffer {
    /// Build the stored record for a normalized offer.
    pub fn new(offer: NormalizedOffer, offer_id: String, now: &str) -> Self {
        let geo_codes = offer.geo.iter().map(|g| g.code.clone()).collect();
        Self {
            offer_id,
            name: offer.name,
            offer_currency: offer.offer_currency,
            approval_time: offer.approval_time,
            site_url: offer.site_url,
            logo: offer.logo,
            geo: offer.geo,
            geo_codes,
            rating: offer.rating,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn has_geo(&self, code: &str) -> bool {
        self.geo.iter().any(|g| g.code == code)
    }
}

// ─── Lenient Field Decoding ──────────────────────────────────

/// Accept a string, a number or null and keep the textual form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Accept a number or a numeric string.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("number out of range")),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid number: {s:?}"))),
        other => Err(D::Error::custom(format!("expected number, got {other}"))),
    }
}
