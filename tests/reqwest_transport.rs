//! End-to-end tests for the reqwest-backed transport over a local mock
//! server. These cover what the scripted-factory tests cannot: real sockets,
//! real header serialization, and real transport failures.

use std::time::Duration;

use http::StatusCode;

use typed_rest::converter::TextConverter;
use typed_rest::transport::{ReqwestRequestFactory, TransportConfig};
use typed_rest::{MediaType, RestClient, RestError};

fn client() -> RestClient {
    RestClient::builder()
        .request_factory(ReqwestRequestFactory::with_config(TransportConfig {
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
            ..TransportConfig::default()
        }))
        .converter(TextConverter::new())
        .build()
}

#[tokio::test]
async fn get_for_entity_over_the_wire() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/greeting")
        .match_header("accept", "text/plain")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("Hello World")
        .create_async()
        .await;

    let entity = client()
        .get_for_entity::<String>(&format!("{}/greeting", server.url()))
        .await
        .unwrap();

    assert_eq!(entity.body(), Some(&"Hello World".to_string()));
    assert_eq!(entity.status(), StatusCode::OK);
    assert_eq!(entity.content_type(), Some(MediaType::text_plain()));
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_over_the_wire() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/things/1")
        .with_status(200)
        .create_async()
        .await;

    client()
        .delete(&format!("{}/things/1", server.url()))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn post_sends_encoded_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/things")
        .match_header("content-type", "text/plain; charset=utf-8")
        .match_body("payload")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("created")
        .create_async()
        .await;

    let entity = client()
        .post_for_entity::<String, String>(
            &format!("{}/things", server.url()),
            &"payload".to_string(),
            Some(&MediaType::text_plain()),
        )
        .await
        .unwrap();

    assert_eq!(entity.body(), Some(&"created".to_string()));
    mock.assert_async().await;
}

#[tokio::test]
async fn error_status_surfaces_with_headers() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/missing")
        .with_status(404)
        .with_header("content-type", "text/plain")
        .with_body("nope")
        .create_async()
        .await;

    let err = client()
        .get_for_entity::<String>(&format!("{}/missing", server.url()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Port 1 is reserved and nothing listens there.
    let err = client()
        .get_for_entity::<String>("http://127.0.0.1:1/unreachable")
        .await
        .unwrap_err();

    assert!(matches!(err, RestError::Transport { .. }));
}
