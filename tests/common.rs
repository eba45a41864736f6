//! Common test utilities
//!
//! A local stand-in for the wiki API, shared by every integration test binary.
//! The server runs on its own thread and runtime so it outlives the runtime of
//! any single `#[tokio::test]`.
//!
//! Routes:
//!
//! - `/characters`: envelope, two records per page, honours all four filters;
//!   a name filter of `Slow` answers after [`SLOW_DELAY`]
//! - `/characters/{id}`: single record, 404 for unknown ids
//! - `/titans`: bare array
//! - `/organizations`: envelope without `info`
//! - `/episodes`: always 500
//! - `/locations`: JSON of the wrong shape
//! - `/images/*`: an image, a 404 and a non-image body
//!
//! Eren's portrait 404s and Mikasa's loads, both behind a `/revision/` suffix.

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
    time::Duration,
};
use titanwiki::prelude::*;

#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);
#[allow(dead_code)]
pub const SLOW_DELAY: Duration = Duration::from_millis(400);
#[allow(dead_code)]
pub const PER_PAGE: usize = 2;

static SERVER_URL: OnceLock<String> = OnceLock::new();

fn roster() -> Vec<Value> {
    let base = SERVER_URL.get().map(String::as_str).unwrap_or_default();
    vec![
        json!({"id": 1, "name": "Eren Yeager", "gender": "Male", "status": "Deceased", "occupation": "Soldier",
               "img": format!("{base}/images/missing.png/revision/latest?cb=1")}),
        json!({"id": 2, "name": "Mikasa Ackerman", "gender": "Female", "status": "Alive", "occupation": "Soldier",
               "img": format!("{base}/images/ok.png/revision/latest/scale-to-width-down/350")}),
        json!({"id": 3, "name": "Armin Arlert", "gender": "Male", "status": "Alive", "occupation": "Commander"}),
        json!({"id": 4, "name": "Levi Ackerman", "gender": "Male", "status": "Alive", "occupation": "Captain"}),
        json!({"id": 5, "name": "Hange Zoë", "gender": "Female", "status": "Deceased", "occupation": "Commander"}),
        json!({"id": 6, "name": "Sasha Blouse", "gender": "Female", "status": "Deceased", "occupation": "Soldier"}),
    ]
}

fn field_matches(record: &Value, key: &str, wanted: Option<&String>, partial: bool) -> bool {
    let Some(wanted) = wanted else {
        return true;
    };
    let actual = record[key].as_str().unwrap_or_default().to_lowercase();
    let wanted = wanted.to_lowercase();
    if partial {
        actual.contains(&wanted)
    } else {
        actual == wanted
    }
}

async fn characters(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("name").map(String::as_str) == Some("Slow") {
        tokio::time::sleep(SLOW_DELAY).await;
    }

    let matching: Vec<Value> = roster()
        .into_iter()
        .filter(|c| field_matches(c, "name", params.get("name"), true))
        .filter(|c| field_matches(c, "status", params.get("status"), false))
        .filter(|c| field_matches(c, "gender", params.get("gender"), false))
        .filter(|c| field_matches(c, "occupation", params.get("occupation"), true))
        .collect();

    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let pages = matching.len().div_ceil(PER_PAGE);
    let results: Vec<Value> = matching
        .iter()
        .skip((page.max(1) - 1) * PER_PAGE)
        .take(PER_PAGE)
        .cloned()
        .collect();

    Json(json!({
        "info": {
            "count": matching.len(),
            "pages": pages,
            "next_page": (page < pages).then(|| format!("/characters?page={}", page + 1)),
            "prev_page": (page > 1).then(|| format!("/characters?page={}", page - 1)),
        },
        "results": results,
    }))
}

async fn character(Path(id): Path<u32>) -> impl IntoResponse {
    match roster().into_iter().find(|c| c["id"] == json!(id)) {
        Some(record) => (StatusCode::OK, Json(record)),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "Character not found"}))),
    }
}

async fn titans() -> Json<Value> {
    Json(json!([
        {"id": 1, "name": "Attack Titan", "height": "15 meters", "abilities": ["Future memory manipulation"]},
        {"id": 2, "name": "Armored Titan", "height": "15 meters", "allegiance": "Marley"},
        {"id": 3, "name": "Colossal Titan", "height": "60 meters"},
    ]))
}

async fn organizations() -> Json<Value> {
    Json(json!({
        "results": [
            {"id": 1, "name": "Survey Corps", "affiliation": "Paradis Island"},
        ]
    }))
}

async fn episodes() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream unavailable")
}

async fn locations() -> Json<Value> {
    Json(json!({"data": [{"id": 1, "name": "Shiganshina District"}]}))
}

async fn image_ok() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], vec![0x89u8, b'P', b'N', b'G'])
}

async fn image_text() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html")], "<html></html>")
}

fn router() -> Router {
    Router::new()
        .route("/characters", get(characters))
        .route("/characters/{id}", get(character))
        .route("/titans", get(titans))
        .route("/organizations", get(organizations))
        .route("/episodes", get(episodes))
        .route("/locations", get(locations))
        .route("/images/ok.png", get(image_ok))
        .route("/images/page.html", get(image_text))
}

/// Starts the stub server once per test binary and returns its base URL.
#[allow(dead_code)]
pub fn ensure_server() -> &'static str {
    SERVER_URL.get_or_init(|| {
        let published = Arc::new(OnceLock::<String>::new());
        let published_thread = Arc::clone(&published);

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_thread.set(format!("http://{}", addr));
                axum::serve(listener, router()).await.expect("stub server failed");
            });
        });

        loop {
            if let Some(url) = published.get() {
                break url.clone();
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    })
}

/// Config pointing at the stub server.
#[allow(dead_code)]
pub fn test_config() -> Config {
    Config {
        api_base: ensure_server().to_string(),
        timeout_secs: 5,
        ..Config::default()
    }
}

#[allow(dead_code)]
pub fn test_client() -> WikiClient {
    WikiClient::new(&test_config()).expect("client for stub server")
}
