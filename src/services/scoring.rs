// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Offer scoring and identity.
//!
//! Pure functions, no I/O:
//! - `map_offers` drops worldwide listings, computes the rating and projects
//!   raw offers to their normalized shape
//! - `generate_offer_id` derives the dedup key used for insert-only writes

use crate::models::{GeoEntry, NormalizedOffer, OfferCurrency, RawOffer};

/// Geo code of worldwide listings. They cannot be geo-filtered and are dropped.
pub const WORLDWIDE_GEO_CODE: &str = "Wrld";

/// Day horizon of the time-decay coefficients.
const DECAY_HORIZON_DAYS: f64 = 90.0;
const APPROVAL_WEIGHT: f64 = 10.0;
const PAYMENT_WEIGHT: f64 = 100.0;

/// Normalize and score a page of raw offers, preserving input order.
pub fn map_offers(offers: &[RawOffer]) -> Vec<NormalizedOffer> {
    offers
        .iter()
        .filter(|offer| !is_worldwide(offer))
        .map(normalize_offer)
        .collect()
}

/// True if any geo entry of the offer is the worldwide code.
pub fn is_worldwide(offer: &RawOffer) -> bool {
    offer.geo.iter().any(|g| g.code == WORLDWIDE_GEO_CODE)
}

fn normalize_offer(offer: &RawOffer) -> NormalizedOffer {
    NormalizedOffer {
        name: offer.name.clone(),
        offer_currency: OfferCurrency {
            name: offer.offer_currency.name.clone(),
        },
        approval_time: offer.approval_time,
        site_url: offer.site_url.clone(),
        logo: offer.logo.clone(),
        geo: offer
            .geo
            .iter()
            .map(|g| GeoEntry {
                code: g.code.clone(),
                name: g.name.clone(),
            })
            .collect(),
        rating: rate_offer(offer),
    }
}

/// Rating of an offer: ecpl scaled by the approval and payment coefficients.
///
/// A coefficient that is not positive (time at or beyond 90 days) is skipped,
/// so long waits leave ecpl unscaled instead of turning the rating negative.
pub fn rate_offer(offer: &RawOffer) -> f64 {
    let first_coeff = APPROVAL_WEIGHT * (1.0 - offer.approval_time / DECAY_HORIZON_DAYS);
    let second_coeff = PAYMENT_WEIGHT * (1.0 - offer.payment_time / DECAY_HORIZON_DAYS);

    let mut rating = parse_ecpl(&offer.stat.ecpl);

    if first_coeff > 0.0 {
        rating *= first_coeff;
    }

    if second_coeff > 0.0 {
        rating *= second_coeff;
    }

    rating
}

/// Parse the published ecpl, falling back to 0.
fn parse_ecpl(raw: &str) -> f64 {
    parse_float_prefix(raw)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse the longest decimal prefix of `raw` after leading whitespace.
///
/// `"2.5"` and `"2.5 USD"` both give 2.5; `"n/a"` gives `None`.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let mut frac_end = end + 1;
        while is_digit(frac_end) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Dedup key of a normalized offer: `"{name}-{approval_time}-{currency}"`.
///
/// Separators are not escaped; distinct offers whose fields happen to join
/// into the same string collapse into one record.
pub fn generate_offer_id(offer: &NormalizedOffer) -> String {
    format!(
        "{}-{}-{}",
        offer.name,
        format_days(offer.approval_time),
        offer.offer_currency.name
    )
}

/// Render a day count the way the source publishes it (`30`, not `30.0`).
fn format_days(days: f64) -> String {
    if days == 0.0 {
        // Also covers -0.0
        return "0".to_string();
    }
    days.to_string()
}
