//! Integration tests for the REST API.
//!
//! Each test spins up an Axum server on a random port backed by an in-memory
//! database and exercises the real HTTP contract with reqwest. No test ever
//! reaches the OpenAI API: the character generator is configured without a key.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;

use keepgoing::character::{CharacterGenerator, CharacterState, character_routes};
use keepgoing::config::OpenAiConfig;
use keepgoing::routines::{RoutineState, routine_routes};
use keepgoing::store::{LibSqlBackend, Store};

/// Start a server on a random port, return its base URL.
async fn start_server() -> String {
    let store: Arc<dyn Store> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
    let generator = Arc::new(CharacterGenerator::new(OpenAiConfig::without_key()));

    let app = routine_routes(RoutineState { store })
        .merge(character_routes(CharacterState { generator }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

async fn create_routine(client: &reqwest::Client, base: &str, title: &str) -> Value {
    let res = client
        .post(format!("{base}/routines"))
        .json(&json!({ "title": title }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let base = start_server().await;
    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn created_routine_has_default_counters() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let routine = create_routine(&client, &base, "morning run").await;
    assert_eq!(routine["title"], "morning run");
    assert_eq!(routine["done"], false);
    assert_eq!(routine["streak"], 0);
    assert_eq!(routine["best_streak"], 0);
    assert_eq!(routine["last_done_date"], Value::Null);
    assert!(routine["id"].as_i64().unwrap() >= 1);
    assert!(routine["created_at"].is_string());
}

#[tokio::test]
async fn create_with_empty_title_is_400() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    for title in ["", "   "] {
        let res = client
            .post(format!("{base}/routines"))
            .json(&json!({ "title": title }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("title"));
    }
}

#[tokio::test]
async fn list_returns_routines_in_id_order() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    create_routine(&client, &base, "first").await;
    create_routine(&client, &base, "second").await;
    create_routine(&client, &base, "third").await;

    let list: Vec<Value> = client
        .get(format!("{base}/routines"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(list.len(), 3);
    let ids: Vec<i64> = list.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(list[0]["title"], "first");
    assert_eq!(list[2]["title"], "third");
}

#[tokio::test]
async fn rename_updates_title() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let routine = create_routine(&client, &base, "old").await;
    let id = routine["id"].as_i64().unwrap();

    let res = client
        .patch(format!("{base}/routines/{id}"))
        .json(&json!({ "title": "new" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let renamed: Value = res.json().await.unwrap();
    assert_eq!(renamed["title"], "new");
    assert_eq!(renamed["id"], id);
}

#[tokio::test]
async fn rename_unknown_id_is_404_and_mutates_nothing() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    create_routine(&client, &base, "untouched").await;

    let res = client
        .patch(format!("{base}/routines/999"))
        .json(&json!({ "title": "hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let list: Vec<Value> = client
        .get(format!("{base}/routines"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "untouched");
}

#[tokio::test]
async fn toggle_unknown_id_is_404() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/routines/42/toggle"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn toggle_on_then_off_round_trips() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let routine = create_routine(&client, &base, "stretch").await;
    let id = routine["id"].as_i64().unwrap();
    let toggle_url = format!("{base}/routines/{id}/toggle");

    // ON: first completion today
    let on: Value = client
        .post(&toggle_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(on["done"], true);
    assert_eq!(on["streak"], 1);
    assert_eq!(on["best_streak"], 1);
    assert!(on["last_done_date"].is_string());

    // OFF: same day, streak of 1 resets entirely, best stays
    let off: Value = client
        .post(&toggle_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(off["done"], false);
    assert_eq!(off["streak"], 0);
    assert_eq!(off["best_streak"], 1);
    assert_eq!(off["last_done_date"], Value::Null);
}

#[tokio::test]
async fn character_generate_validates_before_any_upstream_call() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    // No API key is configured, so a 400 here proves validation runs first.
    let res = client
        .post(format!("{base}/api/character/generate"))
        .json(&json!({ "assistant_name": "몽이", "character_description": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn character_generate_without_api_key_is_500() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/api/character/generate"))
        .json(&json!({
            "assistant_name": "몽이",
            "character_description": "하얀 강아지 수행비서"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
}
