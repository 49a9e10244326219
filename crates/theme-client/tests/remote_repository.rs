//! Integration tests for the remote theme repository
//!
//! These tests use wiremock to stand in for the dashboard backend and
//! exercise the full request/response cycle, the error envelope and retries.

use serde_json::json;
use std::time::Duration;
use storage::{SaveThemeRequest, StorageError, ThemeRepository};
use theme_client::{ClientConfig, RemoteThemeRepository, RestClient, RetryConfig};
use theme_core::{Theme, UseCaseValue};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repository(server: &MockServer) -> RemoteThemeRepository {
    let retry = RetryConfig::new(2).with_initial_delay(Duration::from_millis(5));
    let config = ClientConfig::new(server.uri()).with_retry(retry);
    RemoteThemeRepository::new(RestClient::new(config).unwrap())
}

fn sample(name: &str) -> Theme {
    Theme::new(name)
        .with_color("red", "#ff0000")
        .with_use_case("kills", UseCaseValue::color_ref("red"))
}

// =============================================================================
// Fetch Tests
// =============================================================================

#[tokio::test]
async fn test_get_theme() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/theme"))
        .and(query_param("theme", "dark blue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample("dark blue")))
        .mount(&server)
        .await;

    let theme = repository(&server).get("dark blue").await.unwrap();
    assert_eq!(theme, Some(sample("dark blue")));
}

#[tokio::test]
async fn test_get_missing_theme_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/theme"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": {"message": "No such theme"}})),
        )
        .mount(&server)
        .await;

    assert_eq!(repository(&server).get("ghost").await.unwrap(), None);
}

#[tokio::test]
async fn test_list_themes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/themes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"themes": ["default", "dark"]})))
        .mount(&server)
        .await;

    let names = repository(&server).list().await.unwrap();
    assert_eq!(names, vec!["default".to_string(), "dark".to_string()]);
}

// =============================================================================
// Save / Delete Tests
// =============================================================================

#[tokio::test]
async fn test_save_sends_previous_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/saveTheme"))
        .and(body_partial_json(json!({"previousName": "old", "theme": {"name": "new"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    repository(&server)
        .save(&SaveThemeRequest::renamed_from(sample("new"), "old"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_save_error_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/saveTheme"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": {"message": "Theme name taken"}})),
        )
        .mount(&server)
        .await;

    let err = repository(&server).save(&SaveThemeRequest::new(sample("mine"))).await.unwrap_err();
    match err {
        StorageError::Remote { status, message } => {
            assert_eq!(status, Some(400));
            assert!(message.contains("Theme name taken"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_save_not_acknowledged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/saveTheme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let err = repository(&server).save(&SaveThemeRequest::new(sample("mine"))).await.unwrap_err();
    assert!(matches!(err, StorageError::Remote { status: None, .. }));
}

#[tokio::test]
async fn test_save_ok_status_with_error_envelope_keeps_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/saveTheme"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"error": {"message": "Theme name is reserved"}})),
        )
        .mount(&server)
        .await;

    let err = repository(&server).save(&SaveThemeRequest::new(sample("mine"))).await.unwrap_err();
    match err {
        StorageError::Remote { status: None, message } => {
            assert!(message.contains("Theme name is reserved"));
            assert!(!message.contains("not acknowledged"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_delete_requires_permission() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/deleteTheme"))
        .and(query_param("theme", "mine"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"error": {"message": "Missing permission manage.themes"}})),
        )
        .mount(&server)
        .await;

    let err = repository(&server).delete("mine").await.unwrap_err();
    assert!(matches!(err, StorageError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_delete_success() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/deleteTheme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    assert!(repository(&server).delete("mine").await.unwrap());
}

// =============================================================================
// Retry Tests
// =============================================================================

#[tokio::test]
async fn test_retries_service_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/themes"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/themes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"themes": ["default"]})))
        .mount(&server)
        .await;

    let names = repository(&server).list().await.unwrap();
    assert_eq!(names, vec!["default".to_string()]);
}

#[tokio::test]
async fn test_does_not_retry_client_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/themes"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let err = repository(&server).list().await.unwrap_err();
    assert!(matches!(err, StorageError::Remote { status: Some(400), .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_remote_error() {
    let retry = RetryConfig::new(0);
    let config = ClientConfig::new("http://127.0.0.1:9").with_retry(retry);
    let repo = RemoteThemeRepository::new(RestClient::new(config).unwrap());

    let err = repo.list().await.unwrap_err();
    assert!(matches!(err, StorageError::Remote { status: None, .. }));
}
