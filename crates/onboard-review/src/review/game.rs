use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::assembly::{assemble_client, AssemblyError};
use super::judge::{self, Decision};
use crate::config::GameConfig;

pub const START_PATH: &str = "start";
pub const DECISION_PATH: &str = "decision";
pub const API_KEY_HEADER: &str = "x-api-key";
pub const GAME_OVER_STATUS: &str = "gameover";

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("GAME_API_KEY contains characters not allowed in an HTTP header")]
    InvalidApiKey,
    #[error("failed to build HTTP client: {0}")]
    Setup(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File type sniffed from a document's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Png,
    Docx,
    Pdf,
    Text,
    Unknown,
}

impl DocumentKind {
    const TEXT_SNIFF_LEN: usize = 100;

    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"\x89PNG") {
            Self::Png
        } else if bytes.starts_with(b"PK") && contains(bytes, b"word/") {
            Self::Docx
        } else if bytes.starts_with(b"%PDF") {
            Self::Pdf
        } else if bytes
            .iter()
            .take(Self::TEXT_SNIFF_LEN)
            .all(|byte| byte.is_ascii_graphic() || byte.is_ascii_whitespace() || *byte >= 0xa0)
        {
            Self::Text
        } else {
            Self::Unknown
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Docx => ".docx",
            Self::Pdf => ".pdf",
            Self::Text => ".txt",
            Self::Unknown => "",
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// One client document handed out by the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl GameDocument {
    pub fn decode(name: &str, encoded: &str) -> Result<Self, base64::DecodeError> {
        let bytes = BASE64.decode(encoded.trim())?;
        Ok(Self {
            name: name.to_string(),
            kind: DocumentKind::detect(&bytes),
            bytes,
        })
    }

    /// Document name with the sniffed extension appended unless present.
    pub fn file_name(&self) -> String {
        let extension = self.kind.extension();
        if self.name.ends_with(extension) {
            self.name.clone()
        } else {
            format!("{}{extension}", self.name)
        }
    }
}

/// Undecodable entries are logged and skipped.
fn decode_documents(encoded: BTreeMap<String, String>) -> Vec<GameDocument> {
    encoded
        .into_iter()
        .filter_map(|(name, content)| match GameDocument::decode(&name, &content) {
            Ok(document) => Some(document),
            Err(error) => {
                warn!(document = %name, %error, "skipping undecodable document");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    #[serde(default, deserialize_with = "id_text")]
    pub session_id: String,
    #[serde(default, deserialize_with = "id_text")]
    pub player_id: String,
    #[serde(default, deserialize_with = "id_text")]
    pub client_id: String,
}

/// Ids arrive as strings or numbers; both are kept as text.
fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct StartResponse {
    #[serde(flatten)]
    session: GameSession,
    #[serde(default)]
    client_data: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct DecisionResponse {
    #[serde(default)]
    status: String,
    #[serde(default, deserialize_with = "optional_id_text")]
    client_id: Option<String>,
    #[serde(default)]
    client_data: BTreeMap<String, String>,
}

fn optional_id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Some(id_text(deserializer)?).filter(|id| !id.is_empty()))
}

#[derive(Debug, Serialize)]
struct StartRequest<'a> {
    player_name: &'a str,
}

#[derive(Debug, Serialize)]
struct DecisionRequest<'a> {
    decision: Decision,
    session_id: &'a str,
    client_id: &'a str,
}

/// The first client of a freshly started game.
#[derive(Debug, Clone)]
pub struct GameStart {
    pub session: GameSession,
    pub documents: Vec<GameDocument>,
}

/// Server verdict on one decision, plus the next client when one follows.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub status: String,
    pub next_client_id: Option<String>,
    pub documents: Vec<GameDocument>,
}

impl DecisionOutcome {
    pub fn is_game_over(&self) -> bool {
        self.status == GAME_OVER_STATUS
    }
}

/// Client for the onboarding game server: start a session, then post one
/// decision per client until the server answers `gameover`.
#[derive(Debug, Clone)]
pub struct GameClient {
    client: reqwest::Client,
    base_url: String,
}

impl GameClient {
    pub fn new(config: &GameConfig, timeout: Duration) -> Result<Self, GameError> {
        let base_url = config
            .api_url
            .as_deref()
            .ok_or(GameError::NotConfigured("GAME_API_URL"))?;
        let api_key = config
            .api_key
            .as_deref()
            .ok_or(GameError::NotConfigured("GAME_API_KEY"))?;
        Self::with_base_url(base_url, api_key, timeout)
    }

    pub fn with_base_url(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, GameError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut key = reqwest::header::HeaderValue::from_str(api_key)
            .map_err(|_| GameError::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(GameError::Setup)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    pub async fn start(&self, player_name: &str) -> Result<GameStart, GameError> {
        let endpoint = self.endpoint(START_PATH);
        info!(%endpoint, player = player_name, "starting game session");

        let response: StartResponse = self
            .post_json(&endpoint, &StartRequest { player_name })
            .await?;
        let documents = decode_documents(response.client_data);
        info!(
            session = %response.session.session_id,
            client = %response.session.client_id,
            documents = documents.len(),
            "game session started"
        );

        Ok(GameStart {
            session: response.session,
            documents,
        })
    }

    pub async fn send_decision(
        &self,
        session: &GameSession,
        decision: Decision,
    ) -> Result<DecisionOutcome, GameError> {
        let endpoint = self.endpoint(DECISION_PATH);
        let request = DecisionRequest {
            decision,
            session_id: &session.session_id,
            client_id: &session.client_id,
        };

        let response: DecisionResponse = self.post_json(&endpoint, &request).await?;
        info!(
            client = %session.client_id,
            decision = decision.as_str(),
            status = %response.status,
            "decision sent"
        );

        Ok(DecisionOutcome {
            status: response.status,
            next_client_id: response.client_id,
            documents: decode_documents(response.client_data),
        })
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, GameError>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let transport = |source: reqwest::Error| GameError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = self
            .client
            .post(endpoint)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GameError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(transport)
    }
}

/// Writes each document under `dir`, creating it if needed.
pub fn save_documents(dir: &Path, documents: &[GameDocument]) -> Result<Vec<PathBuf>, GameError> {
    fs::create_dir_all(dir).map_err(|source| GameError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    documents
        .iter()
        .map(|document| {
            let path = dir.join(document.file_name());
            fs::write(&path, &document.bytes).map_err(|source| GameError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), kind = ?document.kind, "saved client document");
            Ok(path)
        })
        .collect()
}

/// Judges a client from its extracted features, when a feature folder for
/// `client_id` exists under `features_root`.
pub fn judge_extracted_client(
    features_root: &Path,
    client_id: &str,
) -> Result<Option<Decision>, AssemblyError> {
    let dir = features_root.join(client_id);
    if client_id.is_empty() || !dir.is_dir() {
        return Ok(None);
    }

    let record = assemble_client(&dir)?;
    Ok(Some(judge::decide(&record)))
}
