use std::time::Duration;

use onboard_review::review::{
    fallback, ClientFetcher, FallbackRotation, FetchError, RecordOrigin,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(server: &MockServer, timeout: Duration) -> ClientFetcher {
    ClientFetcher::with_base_url(&format!("{}/api", server.uri()), timeout).expect("fetcher builds")
}

#[tokio::test]
async fn live_record_is_returned_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/next-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "full_name_description.txt": "Ada Lovelace",
            "decision": "Reject"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut rotation = FallbackRotation::new();
    let fetched = fetcher(&server, Duration::from_secs(5))
        .fetch_next_client(&mut rotation)
        .await;

    assert_eq!(fetched.origin, RecordOrigin::Live);
    assert_eq!(fetched.record.decision(), Some("Reject"));
    assert!(!fetched.record.is_fallback());

    // A success does not advance the rotation.
    assert_eq!(rotation.next_fallback(), fallback::primary());
}

#[tokio::test]
async fn server_errors_alternate_between_fallback_clients() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/next-client"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = fetcher(&server, Duration::from_secs(5));
    let mut rotation = FallbackRotation::new();

    let first = fetcher.fetch_next_client(&mut rotation).await;
    let second = fetcher.fetch_next_client(&mut rotation).await;
    let third = fetcher.fetch_next_client(&mut rotation).await;

    assert_eq!(first.origin, RecordOrigin::Fallback);
    assert_eq!(first.record, fallback::primary());
    assert_eq!(second.record, fallback::secondary());
    assert_eq!(third.record, fallback::primary());
    assert!(first.record.is_fallback());

    match fetcher.try_fetch().await {
        Err(FetchError::Status { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_responses_time_out_into_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/next-client"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "full_name_description.txt": "Late" }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let fetcher = fetcher(&server, Duration::from_millis(50));

    match fetcher.try_fetch().await {
        Err(error @ FetchError::Timeout { .. }) => assert_eq!(error.category(), "timeout"),
        other => panic!("expected timeout, got {other:?}"),
    }

    let mut rotation = FallbackRotation::new();
    let fetched = fetcher.fetch_next_client(&mut rotation).await;
    assert_eq!(fetched.origin, RecordOrigin::Fallback);
    assert_eq!(fetched.record, fallback::primary());
}

#[tokio::test]
async fn non_object_bodies_are_treated_as_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/next-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["not", "a", "record"])))
        .mount(&server)
        .await;

    let fetcher = fetcher(&server, Duration::from_secs(5));
    assert!(matches!(
        fetcher.try_fetch().await,
        Err(FetchError::Unknown { .. })
    ));

    let mut rotation = FallbackRotation::new();
    let fetched = fetcher.fetch_next_client(&mut rotation).await;
    assert_eq!(fetched.origin, RecordOrigin::Fallback);
}

#[tokio::test]
async fn unreachable_server_falls_back() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let addr = listener.local_addr().expect("free port addr");
    drop(listener);

    let fetcher = ClientFetcher::with_base_url(&format!("http://{addr}/api"), Duration::from_secs(2))
        .expect("fetcher builds");

    match fetcher.try_fetch().await {
        Err(error @ FetchError::NoResponse { .. }) => assert_eq!(error.category(), "no_response"),
        other => panic!("expected no response, got {other:?}"),
    }

    let mut rotation = FallbackRotation::new();
    let fetched = fetcher.fetch_next_client(&mut rotation).await;
    assert_eq!(fetched.record, fallback::primary());
}
