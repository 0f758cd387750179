//! Project client tests against a mock backend.

#![cfg(feature = "client")]

use std::time::Duration;

use sphere_link_sdk::client::{ClientError, ProjectClient};
use sphere_link_sdk::{LinkKind, Platform};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn redirect_body() -> serde_json::Value {
    serde_json::json!({
        "requestRedirectLink": {
            "url": "https://pay.example/r",
            "telegram_url": "https://t.me/sphere_bot/pay",
            "mobile_url": "sphere://pay",
            "project_api_key": "pk_test",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-01T10:00:00.000Z"
        },
        "sendLinkRedirect": {
            "url": "https://pay.example/s",
            "project_api_key": "pk_test",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-01T10:00:00.000Z"
        }
    })
}

fn client(server: &MockServer, key: Option<&str>) -> ProjectClient {
    let base = Url::parse(&server.uri()).unwrap();
    ProjectClient::new(base, key.map(str::to_string))
}

#[tokio::test]
async fn test_fetch_redirect_links() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/project/get-redirect-links"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "project_api_key": "pk_test" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(redirect_body()))
        .expect(1)
        .mount(&server)
        .await;

    let links = client(&server, Some("pk_test"))
        .get_redirect_links()
        .await
        .unwrap();

    assert_eq!(links.request_redirect_link.url, "https://pay.example/r");
    assert!(links.is_available(Platform::Telegram, LinkKind::RequestLink));
    assert!(!links.is_available(Platform::Telegram, LinkKind::SendLink));
    assert!(links.is_available(Platform::Mobile, LinkKind::SendLink));
}

#[tokio::test]
async fn test_missing_api_key_skips_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(redirect_body()))
        .expect(0)
        .mount(&server)
        .await;

    for key in [None, Some("")] {
        let err = client(&server, key).get_redirect_links().await.unwrap_err();
        assert!(matches!(err, ClientError::MissingApiKey));
        assert_eq!(
            err.user_message(),
            "Failed to load platform links. Please try again."
        );
    }
}

#[tokio::test]
async fn test_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/project/get-redirect-links"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid project key"))
        .mount(&server)
        .await;

    let err = client(&server, Some("pk_wrong"))
        .get_redirect_links()
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "invalid project key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/project/get-redirect-links"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server, Some("pk_test"))
        .get_redirect_links()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Json(_)));
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/project/get-redirect-links"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(redirect_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = client(&server, Some("pk_test"))
        .with_timeout(Duration::from_millis(50))
        .get_redirect_links()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}

#[tokio::test]
async fn test_partial_response_still_loads() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/project/get-redirect-links"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "requestRedirectLink": {
                "url": "https://pay.example/r",
                "telegram_url": null,
                "createdAt": "2024-05-01 10:00:00"
            }
        })))
        .mount(&server)
        .await;

    let links = client(&server, Some("pk_test"))
        .get_redirect_links()
        .await
        .unwrap();

    assert!(links.is_available(Platform::Web, LinkKind::RequestLink));
    assert!(!links.is_available(Platform::Telegram, LinkKind::RequestLink));
    assert!(!links.is_available(Platform::Web, LinkKind::SendLink));
    assert!(!links.is_available(Platform::Mobile, LinkKind::SendLink));
}
