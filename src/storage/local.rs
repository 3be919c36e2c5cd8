//! Local filesystem store
//!
//! ## Layout
//! ```text
//! {storage.path}/
//! ├── download-info.txt     # name of the last fetched remote file
//! ├── data.csv              # last downloaded directory payload
//! └── providers.csv         # institution code,name table (read once)
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, instrument};

const MARKER_FILE: &str = "download-info.txt";
const PAYLOAD_FILE: &str = "data.csv";
const STAGING_SUFFIX: &str = ".part";

/// Errors that can occur while reading or writing the local store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable slots for the sync marker and the staged payload
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Store rooted at `root`; the directory is expected to exist
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the store rooted at `root`, creating the directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| StoreError::Write {
                path: root.clone(),
                source,
            })?;
        Ok(Self::new(root))
    }

    pub fn marker_path(&self) -> PathBuf {
        self.root.join(MARKER_FILE)
    }

    pub fn payload_path(&self) -> PathBuf {
        self.root.join(PAYLOAD_FILE)
    }

    /// Name of the last fetched remote file; `None` if never synced
    pub async fn read_marker(&self) -> Result<Option<String>, StoreError> {
        let marker = read_optional(&self.marker_path()).await?.and_then(|raw| {
            let name = String::from_utf8_lossy(&raw).trim().to_string();
            (!name.is_empty()).then_some(name)
        });
        Ok(marker)
    }

    #[instrument(skip(self))]
    pub async fn write_marker(&self, name: &str) -> Result<(), StoreError> {
        self.replace(&self.marker_path(), name.as_bytes()).await
    }

    /// Last staged directory payload, if any
    pub async fn read_payload(&self) -> Result<Option<Bytes>, StoreError> {
        Ok(read_optional(&self.payload_path()).await?.map(Bytes::from))
    }

    /// Overwrite the staged payload. The bytes land in a sibling file first
    /// and are renamed over the old payload, so readers see old or new only.
    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    pub async fn stage_payload(&self, payload: &[u8]) -> Result<(), StoreError> {
        self.replace(&self.payload_path(), payload).await
    }

    async fn replace(&self, target: &Path, contents: &[u8]) -> Result<(), StoreError> {
        let mut staging = target.as_os_str().to_owned();
        staging.push(STAGING_SUFFIX);
        let staging = PathBuf::from(staging);

        tokio::fs::write(&staging, contents)
            .await
            .map_err(|source| StoreError::Write {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, target)
            .await
            .map_err(|source| StoreError::Write {
                path: target.to_path_buf(),
                source,
            })?;

        debug!(path = %target.display(), "Replaced stored file");
        Ok(())
    }
}

/// Read a whole file that may legitimately be missing
async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
