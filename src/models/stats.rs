// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-geo offer counts for the geo stats endpoint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::StoredOffer;

/// Number of stored offers available in one geo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoStat {
    pub code: String,
    pub name: String,
    pub count: u64,
}

/// Accumulator for geo counts over a scan of stored offers.
#[derive(Debug, Clone, Default)]
pub struct GeoStats {
    counts: HashMap<String, GeoStat>,
}

impl GeoStats {
    /// Count one offer towards every geo it lists.
    ///
    /// An offer listing the same code twice is counted once for that code.
    pub fn add_offer(&mut self, offer: &StoredOffer) {
        let mut seen: Vec<&str> = Vec::with_capacity(offer.geo.len());
        for geo in &offer.geo {
            if seen.contains(&geo.code.as_str()) {
                continue;
            }
            seen.push(&geo.code);

            self.counts
                .entry(geo.code.clone())
                .or_insert_with(|| GeoStat {
                    code: geo.code.clone(),
                    name: geo.name.clone(),
                    count: 0,
                })
                .count += 1;
        }
    }

    /// Finish the scan: most offers first, ties broken by code.
    pub fn into_sorted(self) -> Vec<GeoStat> {
        let mut stats: Vec<GeoStat> = self.counts.into_values().collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoEntry, OfferCurrency};

    fn offer(id: &str, codes: &[&str]) -> StoredOffer {
        StoredOffer {
            offer_id: id.to_string(),
            name: id.to_string(),
            offer_currency: OfferCurrency {
                name: "USD".to_string(),
            },
            approval_time: 10.0,
            site_url: String::new(),
            logo: String::new(),
            geo: codes
                .iter()
                .map(|c| GeoEntry {
                    code: c.to_string(),
                    name: format!("{c} name"),
                })
                .collect(),
            geo_codes: codes.iter().map(|c| c.to_string()).collect(),
            rating: 0.0,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_counts_sorted_by_count_then_code() {
        let mut stats = GeoStats::default();
        stats.add_offer(&offer("a", &["US", "DE"]));
        stats.add_offer(&offer("b", &["DE"]));
        stats.add_offer(&offer("c", &["AT", "US"]));

        let sorted = stats.into_sorted();
        let codes: Vec<(&str, u64)> = sorted.iter().map(|s| (s.code.as_str(), s.count)).collect();
        assert_eq!(codes, vec![("DE", 2), ("US", 2), ("AT", 1)]);
        assert_eq!(sorted[0].name, "DE name");
    }

    #[test]
    fn test_duplicate_code_in_one_offer_counted_once() {
        let mut stats = GeoStats::default();
        stats.add_offer(&offer("a", &["US", "US"]));

        let sorted = stats.into_sorted();
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].count, 1);
    }

    #[test]
    fn test_empty_scan() {
        assert!(GeoStats::default().into_sorted().is_empty());
    }
}
