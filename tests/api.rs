// tests/api.rs
//! Route-level tests against an in-memory database. Auth is configured with
//! no public keys, so every bearer token fails verification and the
//! unauthenticated paths are what gets exercised here.

use resume_builder::auth::AuthConfig;
use resume_builder::config::ConfigManager;
use resume_builder::database::{run_migrations, DatabaseConfig};
use resume_builder::web::build_rocket;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use sqlx::sqlite::SqlitePoolOptions;

async fn test_client() -> Client {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");

    let config = ConfigManager::load().expect("config");
    let auth_config = AuthConfig::new("test-project".to_string());
    let db_config = DatabaseConfig::from_pool(pool);

    Client::tracked(build_rocket(config, auth_config, db_config))
        .await
        .expect("rocket client")
}

#[rocket::async_test]
async fn health_endpoint_responds() {
    let client = test_client().await;
    let response = client.get("/api/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
}

#[rocket::async_test]
async fn docx_export_is_gone_regardless_of_body() {
    let client = test_client().await;

    let response = client.post("/api/export/docx").dispatch().await;
    assert_eq!(response.status(), Status::Gone);

    let response = client
        .post("/api/export/docx")
        .header(ContentType::JSON)
        .body(r#"{"document":{"contact":{"name":"Ada"}}}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Gone);

    let body: serde_json::Value = response.into_json().await.expect("json body");
    assert!(body["error"].is_string());
}

#[rocket::async_test]
async fn unauthenticated_usage_is_null_with_200() {
    let client = test_client().await;
    let response = client.get("/api/ai/usage").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let body: serde_json::Value = response.into_json().await.expect("json body");
    assert!(body["usage"].is_null());
}

#[rocket::async_test]
async fn unauthenticated_track_usage_is_401() {
    let client = test_client().await;
    let response = client
        .post("/api/ai/track")
        .header(ContentType::JSON)
        .body(r#"{"usdCost":0.05}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn invalid_download_format_is_400_and_writes_nothing() {
    let client = test_client().await;

    let response = client
        .post("/api/track-download")
        .header(ContentType::JSON)
        .body(r#"{"format":"html","resumeId":"r1","template":"classic"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let body: serde_json::Value = response.into_json().await.expect("json body");
    assert!(body["error"].as_str().unwrap().contains("html"));

    let stats = client.get("/api/download-stats").dispatch().await;
    let body: serde_json::Value = stats.into_json().await.expect("json body");
    assert_eq!(body["total"], 0);
}

#[rocket::async_test]
async fn type_mismatched_download_body_gets_json_error() {
    let client = test_client().await;

    let response = client
        .post("/api/track-download")
        .header(ContentType::JSON)
        .body(r#"{"format":123}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);

    let body: serde_json::Value = response.into_json().await.expect("json error body");
    assert!(body["error"].is_string());

    let stats = client.get("/api/download-stats").dispatch().await;
    let body: serde_json::Value = stats.into_json().await.expect("json body");
    assert_eq!(body["total"], 0);
}

#[rocket::async_test]
async fn valid_download_is_recorded() {
    let client = test_client().await;

    let response = client
        .post("/api/track-download")
        .header(ContentType::JSON)
        .body(r#"{"format":"pdf","resumeId":"r1","template":"modern"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body: serde_json::Value = response.into_json().await.expect("json body");
    assert_eq!(body["ok"], true);

    let stats = client.get("/api/download-stats").dispatch().await;
    let body: serde_json::Value = stats.into_json().await.expect("json body");
    assert_eq!(body["total"], 1);
    assert_eq!(body["byFormat"][0]["format"], "pdf");
}

#[rocket::async_test]
async fn review_feedback_counters_accumulate() {
    let client = test_client().await;

    client.post("/api/reviews/rev-9/helpful").dispatch().await;
    client.post("/api/reviews/rev-9/helpful").dispatch().await;
    let response = client.post("/api/reviews/rev-9/report").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let body: serde_json::Value = response.into_json().await.expect("json body");
    assert_eq!(body["helpfulCount"], 2);
    assert_eq!(body["reportCount"], 1);

    let stats = client.get("/api/review-stats").dispatch().await;
    let body: serde_json::Value = stats.into_json().await.expect("json body");
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[rocket::async_test]
async fn pdf_export_requires_auth() {
    let client = test_client().await;
    let response = client
        .post("/api/export/pdf")
        .header(ContentType::JSON)
        .body(r#"{"document":{}}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn templates_are_listed() {
    let client = test_client().await;
    let response = client.get("/api/templates").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let body: serde_json::Value = response.into_json().await.expect("json body");
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"classic"));
}
