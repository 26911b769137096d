use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::{error, info};

use super::archive::{ArchiveError, ClientSource};
use super::record::ClientRecord;
use super::report::derive_report;

/// Router builder exposing the client feed and the report deriver over HTTP.
pub fn review_router<S>(source: Arc<S>) -> Router
where
    S: ClientSource + 'static,
{
    Router::new()
        .route("/api/next-client", get(next_client_handler::<S>))
        .route("/api/v1/review/report", post(report_handler))
        .with_state(source)
}

pub(crate) async fn next_client_handler<S>(State(source): State<Arc<S>>) -> Response
where
    S: ClientSource + 'static,
{
    match source.next_client() {
        Ok(record) => {
            info!(
                fields = record.len(),
                decision = record.decision().unwrap_or("none"),
                "serving next client"
            );
            (StatusCode::OK, axum::Json(record)).into_response()
        }
        Err(ArchiveError::Empty { dir }) => {
            let payload = json!({
                "error": format!("no client records found in {}", dir.display()),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "failed to load next client");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn report_handler(axum::Json(record): axum::Json<ClientRecord>) -> Response {
    let report = derive_report(&record);
    (StatusCode::OK, axum::Json(report)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct FixedSource {
        records: Mutex<Vec<ClientRecord>>,
    }

    impl ClientSource for FixedSource {
        fn next_client(&self) -> Result<ClientRecord, ArchiveError> {
            self.records
                .lock()
                .expect("source mutex poisoned")
                .pop()
                .ok_or_else(|| ArchiveError::Empty {
                    dir: PathBuf::from("fixtures"),
                })
        }
    }

    struct BrokenSource;

    impl ClientSource for BrokenSource {
        fn next_client(&self) -> Result<ClientRecord, ArchiveError> {
            Err(ArchiveError::NotAnObject {
                path: PathBuf::from("fixtures/list.json"),
            })
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn next_client_route_serves_record_then_not_found() {
        let source = Arc::new(FixedSource {
            records: Mutex::new(vec![ClientRecord::new()
                .with_field("full_name_description.txt", "Ada Lovelace")
                .with_decision("Accept")]),
        });
        let router = review_router(source);

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/next-client")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["full_name_description.txt"], "Ada Lovelace");
        assert_eq!(body["decision"], "Accept");

        let response = router
            .oneshot(
                Request::get("/api/next-client")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn next_client_handler_maps_archive_failures_to_server_error() {
        let response = next_client_handler::<BrokenSource>(State(Arc::new(BrokenSource))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("not a JSON object"));
    }

    #[tokio::test]
    async fn report_route_returns_derived_report() {
        let router = review_router(Arc::new(BrokenSource));
        let payload = json!({
            "is the client or associated person a politically exposed person as defined in the client acceptance policy?_profile.docx": "yes",
            "decision": "Accept"
        });

        let response = router
            .oneshot(
                Request::post("/api/v1/review/report")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&payload).expect("payload")))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let record = ClientRecord::from_value(payload).expect("object payload");
        let expected = serde_json::to_value(derive_report(&record)).expect("report serializes");
        assert_eq!(body, expected);
        assert_eq!(body["risk_level"], "high");
        assert_eq!(body["risk_label"], "High");
        assert_eq!(body["identity_score"], 70);
        assert_eq!(
            body["recommendation"],
            "Recommended for Approval with Enhanced Due Diligence"
        );
        assert_eq!(body["profile"]["politically_exposed"], "yes");
    }
}
