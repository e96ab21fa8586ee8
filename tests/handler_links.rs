mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

// ─── POST /links ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_with_custom_code() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/links")
        .json(&json!({ "target_url": "https://example.com/page", "code": "mycode1" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(body["code"], "mycode1");
    assert_eq!(body["target_url"], "https://example.com/page");
    assert_eq!(body["short_url"], "https://s.example.com/mycode1");
    assert_eq!(body["click_count"], 0);
    assert!(body["last_clicked_at"].is_null());
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_create_link_generates_code() {
    let (server, repo) = common::create_test_server();

    let response = server
        .post("/links")
        .json(&json!({ "target_url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_create_link_empty_code_is_generated() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/links")
        .json(&json!({ "target_url": "https://example.com", "code": "" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["code"].as_str().unwrap().len(), 6);
}

#[tokio::test]
async fn test_create_link_without_scheme() {
    let (server, repo) = common::create_test_server();

    let response = server
        .post("/links")
        .json(&json!({ "target_url": "example.com" }))
        .await;

    response.assert_status_bad_request();

    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_create_link_invalid_codes() {
    let (server, repo) = common::create_test_server();

    for code in ["ab", "has space", "waytoolong", "dash-es", "health"] {
        let response = server
            .post("/links")
            .json(&json!({ "target_url": "https://example.com", "code": code }))
            .await;

        response.assert_status_bad_request();
    }

    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_create_link_duplicate_code() {
    let (server, repo) = common::create_test_server();
    common::seed_link(&repo, "taken12", "https://first.com").await;

    let response = server
        .post("/links")
        .json(&json!({ "target_url": "https://second.com", "code": "taken12" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "conflict");
    assert_eq!(body["error"]["details"]["code"], "taken12");
}

#[tokio::test]
async fn test_create_link_missing_target_url() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/links")
        .json(&json!({ "code": "abc123" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "validation_error"
    );
}

#[tokio::test]
async fn test_create_link_non_json_body() {
    let (server, _repo) = common::create_test_server();

    let response = server.post("/links").text("target_url=https://a.com").await;

    response.assert_status_bad_request();
}

// ─── GET /links ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_links_empty() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/links").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_list_links_newest_first() {
    let (server, _repo) = common::create_test_server();

    for code in ["oldest1", "middle1", "newest1"] {
        server
            .post("/links")
            .json(&json!({ "target_url": "https://example.com", "code": code }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server.get("/links").await;
    response.assert_status_ok();

    let body = response.json::<Vec<Value>>();
    let codes: Vec<_> = body.iter().map(|l| l["code"].as_str().unwrap()).collect();
    assert_eq!(codes, vec!["newest1", "middle1", "oldest1"]);

    for item in &body {
        assert!(item.get("target_url").is_some());
        assert!(item.get("click_count").is_some());
        assert!(item.get("last_clicked_at").is_some());
        assert!(item.get("created_at").is_some());
    }
}

// ─── GET /links/{code} ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_link() {
    let (server, repo) = common::create_test_server();
    common::seed_link(&repo, "stats01", "https://example.com/stats").await;

    let response = server.get("/links/stats01").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["code"], "stats01");
    assert_eq!(body["target_url"], "https://example.com/stats");
    assert_eq!(body["click_count"], 0);
}

#[tokio::test]
async fn test_get_link_not_found() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/links/missing1").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_get_link_is_case_sensitive() {
    let (server, repo) = common::create_test_server();
    common::seed_link(&repo, "CaseCode", "https://example.com").await;

    server.get("/links/CaseCode").await.assert_status_ok();
    server.get("/links/casecode").await.assert_status_not_found();
}

// ─── DELETE /links/{code} ────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_link() {
    let (server, repo) = common::create_test_server();
    common::seed_link(&repo, "del001a", "https://example.com").await;

    let response = server.delete("/links/del001a").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["message"], "Link deleted successfully");
    assert_eq!(body["code"], "del001a");

    server.get("/links/del001a").await.assert_status_not_found();
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_delete_link_not_found() {
    let (server, _repo) = common::create_test_server();

    server.delete("/links/nothere").await.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_twice() {
    let (server, repo) = common::create_test_server();
    common::seed_link(&repo, "twice12", "https://example.com").await;

    server.delete("/links/twice12").await.assert_status_ok();
    server.delete("/links/twice12").await.assert_status_not_found();
}
