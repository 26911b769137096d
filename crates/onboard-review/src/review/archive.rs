use rand::seq::SliceRandom;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::judge;
use super::record::ClientRecord;

/// Source of clients for the `next-client` endpoint.
pub trait ClientSource: Send + Sync {
    fn next_client(&self) -> Result<ClientRecord, ArchiveError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("no client records found in {}", dir.display())]
    Empty { dir: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid client record in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("client record in {} is not a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

/// One judged record together with the file it came from.
#[derive(Debug, Clone)]
pub struct ArchivedClient {
    pub path: PathBuf,
    pub record: ClientRecord,
}

impl ArchivedClient {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Folder of `*.json` client records produced by document extraction.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record files, sorted by name.
    pub fn entries(&self) -> Result<Vec<PathBuf>, ArchiveError> {
        let read_dir = std::fs::read_dir(&self.root).map_err(|source| ArchiveError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| ArchiveError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            let is_json = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            if is_json && path.is_file() {
                entries.push(path);
            }
        }

        entries.sort();
        Ok(entries)
    }

    /// Reads one record and stamps it with the handcrafted decision.
    pub fn load(path: &Path) -> Result<ClientRecord, ArchiveError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|source| ArchiveError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let mut record = ClientRecord::from_value(value).ok_or_else(|| ArchiveError::NotAnObject {
            path: path.to_path_buf(),
        })?;

        let decision = judge::decide(&record);
        debug!(path = %path.display(), decision = decision.as_str(), "judged archived client");
        record.set_decision(decision.as_str());
        Ok(record)
    }

    pub fn load_all(&self) -> Result<Vec<ArchivedClient>, ArchiveError> {
        let entries = self.entries()?;
        if entries.is_empty() {
            return Err(ArchiveError::Empty {
                dir: self.root.clone(),
            });
        }

        entries
            .into_iter()
            .map(|path| {
                let record = Self::load(&path)?;
                Ok(ArchivedClient { path, record })
            })
            .collect()
    }
}

impl ClientSource for DirectoryArchive {
    fn next_client(&self) -> Result<ClientRecord, ArchiveError> {
        let entries = self.entries()?;
        let path = entries
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| ArchiveError::Empty {
                dir: self.root.clone(),
            })?;

        Self::load(path)
    }
}
