//! Integration tests for the authenticated feed surface.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn seed_session(home: &TempDir, token: &str) {
    fs::write(
        home.path().join("state.json"),
        serde_json::to_string_pretty(&serde_json::json!({
            "token": token,
            "user": {
                "id": 1,
                "name": "A",
                "email": "a@x.com",
                "created_at": "2024-07-12T13:00:00Z",
                "updated_at": "2024-07-12T13:00:00Z"
            }
        }))
        .unwrap(),
    )
    .unwrap();
}

/// Test: posts without a session is gated, and no request goes out.
#[tokio::test(flavor = "multi_thread")]
async fn test_posts_without_session_redirects_to_login() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    cargo_bin_cmd!("feedr")
        .env("FEEDR_HOME", home.path())
        .env("FEEDR_API_URL", server.uri())
        .arg("posts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Test: posts carries the persisted bearer token and the page size.
#[tokio::test(flavor = "multi_thread")]
async fn test_posts_carries_persisted_credential() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();
    seed_session(&home, "tok1");

    Mock::given(method("GET"))
        .and(path("/v1/posts"))
        .and(query_param("pageSize", "30"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "title": "First post", "url": "http://p.example/1", "name": "A blog"},
            {"id": 2, "title": "Second post", "url": "http://p.example/2", "name": "A blog"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("feedr")
        .env("FEEDR_HOME", home.path())
        .env("FEEDR_API_URL", server.uri())
        .arg("posts")
        .assert()
        .success()
        .stdout(predicate::str::contains("First post — A blog"))
        .stdout(predicate::str::contains("http://p.example/2"));
}

/// Test: an explicit page size overrides the configured default.
#[tokio::test(flavor = "multi_thread")]
async fn test_posts_respects_page_size_flag() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();
    seed_session(&home, "tok1");

    Mock::given(method("GET"))
        .and(path("/v1/posts"))
        .and(query_param("pageSize", "5"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("feedr")
        .env("FEEDR_HOME", home.path())
        .env("FEEDR_API_URL", server.uri())
        .args(["posts", "--page-size", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No posts found."));
}

/// Test: the public feed listing sends no Authorization header when no
/// credential is persisted.
#[tokio::test(flavor = "multi_thread")]
async fn test_feeds_list_without_credential_sends_no_auth_header() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/feeds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 3, "name": "A blog", "url": "http://blog.example/rss"}
        ])))
        .mount(&server)
        .await;

    cargo_bin_cmd!("feedr")
        .env("FEEDR_HOME", home.path())
        .env("FEEDR_API_URL", server.uri())
        .args(["feeds", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A blog"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(
        !requests[0].headers.contains_key("authorization"),
        "Unauthenticated call must carry no Authorization header"
    );
}

/// Test: registering a feed posts the URL with the bearer token attached.
#[tokio::test(flavor = "multi_thread")]
async fn test_feeds_add_posts_url() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();
    seed_session(&home, "tok1");

    Mock::given(method("POST"))
        .and(path("/v1/feeds"))
        .and(header("authorization", "Bearer tok1"))
        .and(body_json(
            serde_json::json!({"url": "http://blog.example/rss"}),
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 7, "name": "A blog", "url": "http://blog.example/rss"
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("feedr")
        .env("FEEDR_HOME", home.path())
        .env("FEEDR_API_URL", server.uri())
        .args(["feeds", "add", "http://blog.example/rss"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feed registered"));
}

/// Test: feeds add is a protected operation.
#[tokio::test(flavor = "multi_thread")]
async fn test_feeds_add_without_session_redirects() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    cargo_bin_cmd!("feedr")
        .env("FEEDR_HOME", home.path())
        .env("FEEDR_API_URL", server.uri())
        .args(["feeds", "add", "http://blog.example/rss"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Test: the API base URL can come from config.toml instead of the flag.
#[tokio::test(flavor = "multi_thread")]
async fn test_api_url_read_from_config_file() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();
    seed_session(&home, "tok1");

    fs::write(
        home.path().join("config.toml"),
        format!("api_url = \"{}/\"\npage_size = 2\n", server.uri()),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/posts"))
        .and(query_param("pageSize", "2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("feedr")
        .env("FEEDR_HOME", home.path())
        .arg("posts")
        .assert()
        .success()
        .stdout(predicate::str::contains("No posts found."));
}
