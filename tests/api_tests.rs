//! HTTP API tests
//!
//! Requests go straight to the router with `tower::ServiceExt::oneshot`, so no
//! socket is bound. Rate limiting is layered on in `run` and is not exercised
//! here.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use combo_finder::catalog::card_data::CardDataStore;
use combo_finder::web::server::{create_router, AppState};
use combo_finder::ComboCatalog;

const CARD_DATA: &str = r#"{
    "Kiki-Jiki, Mirror Breaker": { "i": "r", "p": { "c": 24.99, "t": 22.5 } },
    "Zealous Conscripts": { "i": "r", "p": { "c": 6.49, "t": 5.4 } },
    "Sol Ring": { "i": "c", "p": { "c": 1.99, "t": 1.5 } },
    "Basalt Monolith": { "i": "c" }
}"#;

fn app(with_card_data: bool) -> Router {
    let catalog = ComboCatalog::load_embedded().unwrap();
    let card_data = with_card_data.then(|| CardDataStore::from_json(CARD_DATA).unwrap());
    create_router(Arc::new(AppState::new(catalog, card_data)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_find(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/find-my-combos")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn ids(section: &Value) -> Vec<u64> {
    section
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| {
            entry
                .get("combo")
                .unwrap_or(entry)
                .get("id")
                .and_then(Value::as_u64)
                .unwrap()
        })
        .collect()
}

#[tokio::test]
async fn test_find_exact_combo() {
    let (status, body) = send(
        app(false),
        post_find(&json!({
            "decklist": "1 Thassa's Oracle\n1 Demonic Consultation\n1 Island"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["exact"]), [3]);
    assert_eq!(body["deck"]["distinct_cards"], 3);
}

#[tokio::test]
async fn test_security_headers_present() {
    let response = app(false).oneshot(get("/api/catalog")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn test_card_data_drives_deck_identity() {
    let (status, body) = send(
        app(true),
        post_find(&json!({
            "decklist": "1 Kiki-Jiki, Mirror Breaker\n1 Sol Ring",
            "sort": "id"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deck"]["color_identity"], "r");

    let within = body["potential_within"].as_array().unwrap();
    let kiki = within
        .iter()
        .find(|p| p["combo"]["id"] == 1)
        .expect("Kiki-Jiki combo should be within red");
    assert_eq!(kiki["missing"][0]["card"], "Zealous Conscripts");

    assert!(body["missing_cards"]
        .as_array()
        .unwrap()
        .contains(&json!("Zealous Conscripts")));
}

#[tokio::test]
async fn test_stated_colors_add_to_card_identity() {
    let (status, body) = send(
        app(true),
        post_find(&json!({
            "decklist": "1 Kiki-Jiki, Mirror Breaker\n1 Sol Ring",
            "deck_colors": "u"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deck"]["color_identity"], "r");
    assert_eq!(body["deck_identity"], "ur");
    assert!(ids(&body["potential_within"]).contains(&1));
    assert!(!ids(&body["potential_outside"]).contains(&1));
}

#[tokio::test]
async fn test_color_selection_narrows_outside() {
    let (status, body) = send(
        app(false),
        post_find(&json!({
            "decklist": "1 Heliod, Sun-Crowned\n1 Sol Ring\n1 Basalt Monolith",
            "deck_colors": "r",
            "colors": "w"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    for entry in body["potential_outside"].as_array().unwrap() {
        assert_eq!(entry["combo"]["color_identity"], "w");
    }
    assert!(ids(&body["potential_outside"]).contains(&5));
    assert!(body["hidden_outside"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_single_card_deck_returns_empty_sections() {
    let (status, body) = send(
        app(false),
        post_find(&json!({ "decklist": "4 Relentless Rats" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["exact"].as_array().unwrap().is_empty());
    assert!(body["potential_within"].as_array().unwrap().is_empty());
    assert!(body["potential_outside"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_max_missing_limits_potential() {
    let (_, body) = send(
        app(false),
        post_find(&json!({
            "decklist": "1 Dramatic Reversal\n1 Sol Ring",
            "max_missing": 1
        })),
    )
    .await;

    for section in ["potential_within", "potential_outside"] {
        for entry in body[section].as_array().unwrap() {
            assert!(entry["missing"].as_array().unwrap().len() <= 1);
        }
    }
}

#[tokio::test]
async fn test_descending_price_sort() {
    let (status, body) = send(
        app(false),
        post_find(&json!({
            "decklist": "1 Sol Ring\n1 Basalt Monolith",
            "sort": "price",
            "order": "desc",
            "vendor": "tcgplayer"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let prices: Vec<f64> = body["potential_outside"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["combo"]["prices"]["tcg_player"].as_f64().unwrap_or(0.0))
        .collect();
    assert!(prices.windows(2).all(|w| w[0] >= w[1]), "{prices:?}");
}

#[tokio::test]
async fn test_bad_inputs_are_rejected() {
    let cases = [
        (json!({ "decklist": "1 Sol Ring\n1 Island", "sort": "popularity" }), "invalid_sort"),
        (json!({ "decklist": "1 Sol Ring\n1 Island", "order": "sideways" }), "invalid_sort"),
        (json!({ "decklist": "1 Sol Ring\n1 Island", "colors": "wq" }), "invalid_colors"),
        (json!({ "decklist": "1 Sol Ring\n1 Island", "vendor": "ebay" }), "invalid_vendor"),
        (json!({ "decklist": "0 Sol Ring\n1 Island" }), "invalid_decklist"),
        (json!({ "decklist": "1 Sol Ring\u{0}" }), "invalid_decklist"),
    ];

    for (request, error_type) in cases {
        let (status, body) = send(app(false), post_find(&request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{request}");
        assert_eq!(body["error_type"], error_type, "{request}");
        assert!(body["details"].is_null());
    }
}

#[tokio::test]
async fn test_catalog_summary() {
    let catalog = ComboCatalog::load_embedded().unwrap();
    let (status, body) = send(app(true), get("/api/catalog")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], catalog.len());
    assert_eq!(body["skipped"], 0);
    assert_eq!(body["card_data"], 4);
}

#[tokio::test]
async fn test_combo_by_id() {
    let (status, body) = send(app(false), get("/api/combos/4")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 4);
    assert_eq!(body["color_identity"], "c");
    assert_eq!(body["cards"][1]["card"], "Rings of Brighthearth");

    let (status, body) = send(app(false), get("/api/combos/999999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");
}
