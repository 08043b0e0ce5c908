// Store-backed end-to-end tests.
//
// These need a live PostgreSQL reachable through DATABASE_URL, so they are
// ignored by default and run explicitly:
//
//     DATABASE_URL=postgres://... cargo test --test store -- --ignored
//
// Client names are uniqued per run, so the suite can share a database with
// existing data and with itself.

mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use common::{body_json, post_json};
use crossing_api::config::AppConfig;
use crossing_api::database::ensure_schema;
use crossing_api::{app, AppState};

async fn live_app() -> Result<Router> {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set to run the store-backed tests");

    let mut config = AppConfig::from_env();
    config.database.url = url;

    let state = AppState::new(config);
    ensure_schema(&state.pool).await?;
    Ok(app(state))
}

fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Session-Token", token)
        .body(Body::empty())
        .unwrap()
}

fn post_json_auth(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-Session-Token", token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Register (or log in) by name and return the response body.
async fn login(app: &Router, name: &str) -> Result<Value> {
    let response = app
        .clone()
        .oneshot(post_json("/auth/login-or-register", json!({ "name": name })))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
#[ignore = "needs a live PostgreSQL via DATABASE_URL"]
async fn repeat_login_any_case_returns_same_client() -> Result<()> {
    let app = live_app().await?;
    let name = unique_name("Ana");

    let first = login(&app, &name).await?;
    assert_eq!(first["isNew"], true);

    let second = login(&app, &name.to_uppercase()).await?;
    assert_eq!(second["isNew"], false);
    assert_eq!(second["clientId"], first["clientId"]);
    // Canonical stored casing comes back, not the caller's
    assert_eq!(second["name"], first["name"]);
    Ok(())
}

#[tokio::test]
#[ignore = "needs a live PostgreSQL via DATABASE_URL"]
async fn sequential_starts_number_sessions_one_to_n() -> Result<()> {
    let app = live_app().await?;
    let auth = login(&app, &unique_name("counter")).await?;
    let token = auth["token"].as_str().unwrap();

    for expected in 1..=3i64 {
        let response = app
            .clone()
            .oneshot(post_json_auth("/sessions/start", token, json!({})))
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await?;
        assert_eq!(body["sessionNumber"], expected);
    }
    Ok(())
}

#[tokio::test]
#[ignore = "needs a live PostgreSQL via DATABASE_URL"]
async fn ecosystem_double_save_leaves_exactly_one_set() -> Result<()> {
    let app = live_app().await?;
    let auth = login(&app, &unique_name("web")).await?;
    let token = auth["token"].as_str().unwrap();

    let people = json!({
        "people": [
            { "name": "Maria", "type": "family", "needsProvided": ["belonging"] },
            { "name": "Sam", "type": "friend", "needsProvided": ["play", "safety"] }
        ]
    });

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json_auth("/data/ecosystem", token, people.clone()))
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(get_auth("/data/load", token)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = body_json(response).await?;
    let ecosystem = snapshot["ecosystem"].as_array().unwrap();
    assert_eq!(ecosystem.len(), 2, "replacement must not duplicate the set");

    let names: Vec<&str> = ecosystem.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert!(names.contains(&"Maria"));
    assert!(names.contains(&"Sam"));
    Ok(())
}

#[tokio::test]
#[ignore = "needs a live PostgreSQL via DATABASE_URL"]
async fn affect_total_round_trips_through_load() -> Result<()> {
    let app = live_app().await?;
    let auth = login(&app, &unique_name("affect")).await?;
    let token = auth["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(post_json_auth("/sessions/start", token, json!({})))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let session = body_json(response).await?;

    // q1..q5 sum to 15; that total must come back from the snapshot
    let response = app
        .clone()
        .oneshot(post_json_auth(
            "/data/affect",
            token,
            json!({
                "sessionId": session["sessionId"],
                "phase": "pre",
                "q1": 3, "q2": 4, "q3": 5, "q4": 2, "q5": 1
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get_auth("/data/load", token)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = body_json(response).await?;
    let affect = snapshot["affect"].as_array().unwrap();
    assert!(!affect.is_empty());
    assert_eq!(affect[0]["total"], 15);
    assert_eq!(affect[0]["phase"], "pre");
    Ok(())
}
