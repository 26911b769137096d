use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::fallback::FallbackRotation;
use super::record::ClientRecord;
use crate::config::ReviewConfig;

pub const NEXT_CLIENT_PATH: &str = "next-client";

/// Why a live fetch did not produce a record. Callers of
/// [`ClientFetcher::fetch_next_client`] never see these; they are logged and
/// replaced with fallback data.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {endpoint} timed out after {timeout_ms} ms")]
    Timeout { endpoint: String, timeout_ms: u64 },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("no response from {endpoint}: {detail}")]
    NoResponse { endpoint: String, detail: String },
    #[error("unexpected failure fetching {endpoint}: {detail}")]
    Unknown { endpoint: String, detail: String },
    #[error("failed to build HTTP client: {0}")]
    Setup(#[source] reqwest::Error),
}

impl FetchError {
    pub const fn category(&self) -> &'static str {
        match self {
            FetchError::Timeout { .. } => "timeout",
            FetchError::Status { .. } => "server_error",
            FetchError::NoResponse { .. } => "no_response",
            FetchError::Unknown { .. } | FetchError::Setup(_) => "unknown",
        }
    }

    fn fallback_notice(&self) -> String {
        match self {
            FetchError::Timeout { .. } => "Server request timed out. Using fallback data.".to_string(),
            FetchError::Status { status, .. } => {
                format!("Server error: {status}. Using fallback data.")
            }
            FetchError::NoResponse { .. } => "No response from server. Using fallback data.".to_string(),
            FetchError::Unknown { .. } | FetchError::Setup(_) => {
                "An unknown error occurred. Using fallback data.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    Live,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct FetchedClient {
    pub record: ClientRecord,
    pub origin: RecordOrigin,
}

/// HTTP client for the `next-client` endpoint.
#[derive(Debug, Clone)]
pub struct ClientFetcher {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl ClientFetcher {
    pub fn new(config: &ReviewConfig) -> Result<Self, FetchError> {
        Self::with_base_url(&config.api_base_url, config.timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(FetchError::Setup)?;

        let endpoint = format!("{}/{NEXT_CLIENT_PATH}", base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Always yields a record: the live one, or the next canned client from
    /// `rotation` when the request fails for any reason.
    pub async fn fetch_next_client(&self, rotation: &mut FallbackRotation) -> FetchedClient {
        info!(endpoint = %self.endpoint, "fetching next client");

        match self.try_fetch().await {
            Ok(record) => {
                info!(fields = record.len(), "fetched client from server");
                FetchedClient {
                    record,
                    origin: RecordOrigin::Live,
                }
            }
            Err(error) => {
                warn!(category = error.category(), %error, "{}", error.fallback_notice());
                FetchedClient {
                    record: rotation.next_fallback(),
                    origin: RecordOrigin::Fallback,
                }
            }
        }
    }

    pub async fn try_fetch(&self) -> Result<ClientRecord, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|err| self.classify(err))?;
        ClientRecord::from_value(body).ok_or_else(|| FetchError::Unknown {
            endpoint: self.endpoint.clone(),
            detail: "response body is not a JSON object".to_string(),
        })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        let endpoint = self.endpoint.clone();
        if err.is_timeout() {
            FetchError::Timeout {
                endpoint,
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if err.is_connect() || err.is_request() {
            FetchError::NoResponse {
                endpoint,
                detail: err.to_string(),
            }
        } else {
            FetchError::Unknown {
                endpoint,
                detail: err.to_string(),
            }
        }
    }
}
