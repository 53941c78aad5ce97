// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use geo_offers::config::Config;
use geo_offers::db::{FirestoreDb, MemoryDb};
use geo_offers::routes::create_router;
use geo_offers::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the mocked offer list endpoint.
pub const SOURCE_PATH: &str = "/offers";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a Firestore connection against the emulator, in its own collection.
#[allow(dead_code)]
pub async fn test_firestore(collection: &str) -> FirestoreDb {
    FirestoreDb::new("test-project", collection)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Offer list URL served by the mock server.
#[allow(dead_code)]
pub fn source_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), SOURCE_PATH)
}

/// Create a test app backed by an in-memory store.
/// Returns the router, the shared state and the store.
#[allow(dead_code)]
pub fn create_test_app(source_url: &str) -> (axum::Router, Arc<AppState>, Arc<MemoryDb>) {
    let config = Config {
        offer_source_url: source_url.to_string(),
        ..Config::test_default()
    };
    let db = Arc::new(MemoryDb::new());
    let state = Arc::new(AppState::new(config, db.clone()).expect("Failed to build app state"));

    (create_router(state.clone()), state, db)
}

/// Raw offer as the affiliate network publishes it.
#[allow(dead_code)]
pub fn raw_offer(name: &str, geo_codes: &[&str], approval_time: u32, ecpl: &str) -> Value {
    let geo: Vec<Value> = geo_codes
        .iter()
        .enumerate()
        .map(|(i, code)| {
            json!({
                "id": format!("{}", i + 1),
                "parent_id": "0",
                "code": code,
                "name": format!("{code} name"),
                "children_ids": []
            })
        })
        .collect();

    json!({
        "id": format!("src-{name}"),
        "name": name,
        "offer_currency": { "id": "1", "name": "USD" },
        "approval_time": approval_time,
        "payment_time": 30,
        "site_url": format!("https://{}.example", name.to_lowercase().replace(' ', "-")),
        "logo": "https://cdn.example/logo.png",
        "stat": { "cr": "0.5", "ar": "80", "ecpc": "0.1", "ecpl": ecpl },
        "geo": geo
    })
}

/// Serve `offers` as page `page` of the offer list.
#[allow(dead_code)]
pub async fn mount_page(server: &MockServer, page: u32, offers: Vec<Value>) {
    mount_page_with_delay(server, page, offers, Duration::ZERO).await;
}

/// Serve `offers` as page `page`, answering after `delay`.
#[allow(dead_code)]
pub async fn mount_page_with_delay(
    server: &MockServer,
    page: u32,
    offers: Vec<Value>,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(SOURCE_PATH))
        .and(query_param("page", page.to_string()))
        .and(query_param("perpage", "500"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "offers": offers }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Wait until no sync is running.
#[allow(dead_code)]
pub async fn wait_for_sync(state: &AppState) {
    for _ in 0..200 {
        if !state.sync_service.is_running() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("sync did not finish in time");
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
