//! Integration tests for the transport pipeline: outcome classification and
//! conditional request compression against a mock HTTP server.

use std::net::TcpListener;
use std::time::Duration;

use lexiq_client::transport::Transport;
use lexiq_client::{CompressionAlgorithm, CompressionOptions, LexiqError};
use lexiq_common::compression::CompressionCodec;
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(compression: CompressionOptions) -> Transport {
    Transport::new(Duration::from_secs(5), compression).expect("transport")
}

fn plain_transport() -> Transport {
    transport(CompressionOptions::default())
}

#[tokio::test]
async fn success_response_passes_through_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = plain_transport();
    let response = transport
        .execute(transport.request(Method::GET, server.uri()), None)
        .await
        .expect("response");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn structured_error_body_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Index `movies` not found.",
            "code": "index_not_found",
            "type": "invalid_request",
            "link": "https://docs.lexiq.dev/errors#index_not_found"
        })))
        .mount(&server)
        .await;

    let transport = plain_transport();
    let result = transport.execute(transport.request(Method::GET, server.uri()), None).await;

    match result {
        Err(LexiqError::Api(details)) => {
            assert_eq!(details.code, "index_not_found");
            assert_eq!(details.error_type, "invalid_request");
            assert!(details.message.contains("movies"));
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let transport = plain_transport();
    let result = transport.execute(transport.request(Method::GET, server.uri()), None).await;

    match result {
        Err(LexiqError::Api(details)) => {
            assert_eq!(details.code, "503");
            assert_eq!(details.message, "Service Unavailable");
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn unparseable_error_body_keeps_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let transport = plain_transport();
    let result = transport.execute(transport.request(Method::GET, server.uri()), None).await;

    match result {
        Err(LexiqError::Api(details)) => {
            assert_eq!(details.code, "500");
            assert!(details.message.contains("boom"));
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn connection_refused_is_a_communication_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener); // release the port so that requests fail with ECONNREFUSED
    let url = format!("http://{}", addr);

    let transport = plain_transport();
    let result = transport.execute(transport.request(Method::GET, &url), None).await;

    match result {
        Err(LexiqError::Communication(message)) => {
            assert!(!message.is_empty());
        }
        other => panic!("expected communication error, got {:?}", other),
    }
}

#[tokio::test]
async fn body_above_threshold_is_gzip_compressed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents"))
        .and(header("content-encoding", "gzip"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let payload = vec![b'x'; 4096];
    let options = CompressionOptions::new(CompressionAlgorithm::Gzip);
    let transport = transport(options.clone());

    transport
        .execute(
            transport.request(Method::POST, format!("{}/documents", server.uri())),
            Some(payload.clone()),
        )
        .await
        .expect("response");

    // The wire body must decompress back to the original payload.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.len() < payload.len());
    let restored = CompressionCodec::new(options).decompress(&requests[0].body).unwrap();
    assert_eq!(restored, payload);
}

#[tokio::test]
async fn body_below_threshold_is_sent_uncompressed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let payload = br#"{"tiny":true}"#.to_vec();
    let transport = transport(CompressionOptions::new(CompressionAlgorithm::Gzip));

    transport
        .execute(transport.request(Method::POST, server.uri()), Some(payload.clone()))
        .await
        .expect("response");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("content-encoding").is_none());
    assert_eq!(requests[0].body, payload);
}

#[cfg(not(feature = "brotli"))]
#[tokio::test]
async fn unsupported_algorithm_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let transport = transport(CompressionOptions::new(CompressionAlgorithm::Brotli));
    let result = transport
        .execute(transport.request(Method::POST, server.uri()), Some(vec![0u8; 4096]))
        .await;

    match result {
        Err(LexiqError::UnsupportedAlgorithm { algorithm }) => assert_eq!(algorithm, "br"),
        other => panic!("expected unsupported algorithm error, got {:?}", other),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}
