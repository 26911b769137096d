use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::record::ClientRecord;

pub const RECORD_FILE_PREFIX: &str = "client_data";

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("no feature files found in {}", dir.display())]
    NoFeatures { dir: PathBuf },
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid feature file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode client record {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One value pulled out of a client document by an extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub key: String,
    #[serde(default)]
    pub value: Value,
    /// Overrides the file-level source when a feature came from elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Extractor output for a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFile {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureFile {
    pub fn load(path: &Path) -> Result<Self, AssemblyError> {
        let raw = fs::read_to_string(path).map_err(|source| AssemblyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| AssemblyError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Record entries keyed `"<feature>_<document file name>"`.
    pub fn flatten(&self) -> impl Iterator<Item = (String, Value)> + '_ {
        self.features.iter().map(move |feature| {
            let source = feature.source.as_deref().unwrap_or(self.source.as_str());
            (record_key(&feature.key, source), feature.value.clone())
        })
    }
}

/// `source` may be a full path; only its file name is kept.
pub fn record_key(feature: &str, source: &str) -> String {
    let file_name = Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());
    format!("{feature}_{file_name}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledClient {
    pub client_id: String,
    pub path: PathBuf,
    pub fields: usize,
}

/// Merges every feature file in `dir` into one record. Files are read in
/// name order and a later file overwrites an earlier file's key.
pub fn assemble_client(dir: &Path) -> Result<ClientRecord, AssemblyError> {
    let files = json_files(dir)?;
    if files.is_empty() {
        return Err(AssemblyError::NoFeatures {
            dir: dir.to_path_buf(),
        });
    }

    let mut merged = Map::new();
    for path in files {
        let feature_file = FeatureFile::load(&path)?;
        debug!(
            path = %path.display(),
            features = feature_file.features.len(),
            "merging feature file"
        );
        merged.extend(feature_file.flatten());
    }

    Ok(ClientRecord::from(merged))
}

pub fn write_record(path: &Path, record: &ClientRecord) -> Result<(), AssemblyError> {
    let encoded = serde_json::to_string_pretty(record).map_err(|source| AssemblyError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, encoded).map_err(|source| AssemblyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Assembles one record per client folder under `input_root` into
/// `output_dir/client_data_<id>.json`. The id is the folder name after its
/// last underscore, so `client_1042` becomes `1042`.
pub fn assemble_archive(
    input_root: &Path,
    output_dir: &Path,
) -> Result<Vec<AssembledClient>, AssemblyError> {
    let mut folders = Vec::new();
    for entry in read_dir(input_root)? {
        let path = entry.path();
        if path.is_dir() {
            folders.push(path);
        }
    }
    folders.sort();

    fs::create_dir_all(output_dir).map_err(|source| AssemblyError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut assembled = Vec::with_capacity(folders.len());
    for folder in folders {
        let record = assemble_client(&folder)?;
        let client_id = client_id_from_folder(&folder);
        let path = output_dir.join(format!("{RECORD_FILE_PREFIX}_{client_id}.json"));
        write_record(&path, &record)?;
        info!(client_id = %client_id, fields = record.len(), path = %path.display(), "client record assembled");

        assembled.push(AssembledClient {
            client_id,
            path,
            fields: record.len(),
        });
    }

    Ok(assembled)
}

pub fn client_id_from_folder(folder: &Path) -> String {
    let name = folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.rsplit_once('_') {
        Some((_, id)) if !id.is_empty() => id.to_string(),
        _ => name,
    }
}

fn read_dir(dir: &Path) -> Result<Vec<fs::DirEntry>, AssemblyError> {
    let entries = fs::read_dir(dir).map_err(|source| AssemblyError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    entries
        .map(|entry| {
            entry.map_err(|source| AssemblyError::Io {
                path: dir.to_path_buf(),
                source,
            })
        })
        .collect()
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>, AssemblyError> {
    let mut files: Vec<PathBuf> = read_dir(dir)?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
