// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore store tests. Run against the emulator:
//!
//! ```sh
//! FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test --test firestore_integration
//! ```

mod common;

use geo_offers::db::OfferStore;
use geo_offers::models::{GeoEntry, OfferCurrency, StoredOffer};

fn offer(id: &str, codes: &[&str]) -> StoredOffer {
    StoredOffer {
        offer_id: id.to_string(),
        name: id.to_string(),
        offer_currency: OfferCurrency {
            name: "USD".to_string(),
        },
        approval_time: 30.0,
        site_url: "https://example.com".to_string(),
        logo: String::new(),
        geo: codes
            .iter()
            .map(|c| GeoEntry {
                code: c.to_string(),
                name: format!("{c} name"),
            })
            .collect(),
        geo_codes: codes.iter().map(|c| c.to_string()).collect(),
        rating: 1.5,
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
        updated_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
}

/// Collection name unique to one test run.
fn collection(test: &str) -> String {
    format!("offers_{}_{}", test, std::process::id())
}

#[tokio::test]
async fn test_insert_if_absent() {
    require_emulator!();
    let db = common::test_firestore(&collection("insert")).await;

    assert!(db.insert_if_absent(&offer("Alpha/1-30-USD", &["US"])).await.unwrap());

    let mut changed = offer("Alpha/1-30-USD", &["US", "CA"]);
    changed.rating = 99.0;
    assert!(!db.insert_if_absent(&changed).await.unwrap());

    let stored = db.get_offer("Alpha/1-30-USD").await.unwrap().unwrap();
    assert_eq!(stored.rating, 1.5);
    assert_eq!(stored.geo_codes, vec!["US".to_string()]);
}

#[tokio::test]
async fn test_find_and_count_by_geo() {
    require_emulator!();
    let db = common::test_firestore(&collection("find")).await;

    for i in 0..3 {
        db.insert_if_absent(&offer(&format!("us{i}"), &["US"])).await.unwrap();
    }
    db.insert_if_absent(&offer("de0", &["DE", "US"])).await.unwrap();
    db.insert_if_absent(&offer("fr0", &["FR"])).await.unwrap();

    assert_eq!(db.count_by_geo("US").await.unwrap(), 4);
    assert_eq!(db.count_by_geo("IT").await.unwrap(), 0);

    let first = db.find_by_geo("US", 0, 3).await.unwrap();
    let second = db.find_by_geo("US", 3, 3).await.unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 1);
    assert!(first.iter().chain(&second).all(|o| o.has_geo("US")));
}

#[tokio::test]
async fn test_geo_stats() {
    require_emulator!();
    let db = common::test_firestore(&collection("stats")).await;

    db.insert_if_absent(&offer("a", &["US", "DE"])).await.unwrap();
    db.insert_if_absent(&offer("b", &["US"])).await.unwrap();

    let stats = db.geo_stats().await.unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].code, "US");
    assert_eq!(stats[0].count, 2);
    assert_eq!(stats[1].code, "DE");
}
