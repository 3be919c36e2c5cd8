//! Sync orchestrator for the BSB directory
//!
//! One run walks these stages in order, stopping at the first failure:
//!
//! ```text
//! CheckingMarker → Listing → Deciding → Skipping | Downloading → Publishing
//! ```
//!
//! A downloaded file is decoded in memory first; only then is it cached,
//! published and recorded in the marker. A failed run leaves the published
//! snapshot, the cached payload and the stored marker as they were, and the
//! next scheduled run starts over.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{decode, DecodeError};
use crate::remote::{resolve_latest, FilePattern, RemoteError, RemoteSession, RemoteSource};
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::storage::{LocalStore, StoreError};

/// Errors that can end a sync run
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("No remote file matches {pattern}")]
    NoCandidate { pattern: String },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Remote file {file_name} holds no branch records")]
    EmptyDirectory { file_name: String },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("A sync run is already in progress")]
    AlreadyRunning,
}

/// Stage a run is in, or stopped at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncStage {
    CheckingMarker,
    Listing,
    Deciding,
    Skipping,
    Downloading,
    Publishing,
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStage::CheckingMarker => write!(f, "checking_marker"),
            SyncStage::Listing => write!(f, "listing"),
            SyncStage::Deciding => write!(f, "deciding"),
            SyncStage::Skipping => write!(f, "skipping"),
            SyncStage::Downloading => write!(f, "downloading"),
            SyncStage::Publishing => write!(f, "publishing"),
        }
    }
}

/// Status of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncRunStatus {
    Running,
    Published,
    Failed,
}

/// Record of one sync run
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub run_id: Uuid,
    pub status: SyncRunStatus,
    /// Last stage entered
    pub stage: SyncStage,
    /// Remote file selected for this run
    pub file_name: Option<String>,
    /// Whether the file was downloaded (false when the cached copy was reused)
    pub downloaded: bool,
    pub record_count: Option<usize>,
    pub snapshot_version: Option<u64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl SyncReport {
    fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: SyncRunStatus::Running,
            stage: SyncStage::CheckingMarker,
            file_name: None,
            downloaded: false,
            record_count: None,
            snapshot_version: None,
            started_at: Utc::now(),
            completed_at: None,
            error_message: None,
        }
    }

    fn enter(&mut self, stage: SyncStage) {
        debug!(run_id = %self.run_id, stage = %stage, "Sync stage");
        self.stage = stage;
    }

    fn complete(&mut self, snapshot: &Snapshot) {
        self.status = SyncRunStatus::Published;
        self.record_count = Some(snapshot.records().len());
        self.snapshot_version = Some(snapshot.version());
        self.completed_at = Some(Utc::now());
    }

    fn fail(&mut self, error: &SyncError) {
        self.status = SyncRunStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error_message = Some(error.to_string());
    }

    /// Get duration in milliseconds
    pub fn duration_ms(&self) -> Option<i64> {
        let end = self.completed_at?;
        Some((end - self.started_at).num_milliseconds())
    }
}

/// Directory payload chosen for publishing
struct Fetched {
    file_name: String,
    payload: Bytes,
    downloaded: bool,
}

/// Drives sync runs and publishes their results
pub struct SyncOrchestrator {
    remote: Arc<dyn RemoteSource>,
    store: LocalStore,
    snapshots: Arc<SnapshotStore>,
    pattern: FilePattern,
    /// Held for the whole of a run
    running: Mutex<()>,
    last_report: RwLock<Option<SyncReport>>,
}

impl SyncOrchestrator {
    pub fn new(
        remote: Arc<dyn RemoteSource>,
        store: LocalStore,
        snapshots: Arc<SnapshotStore>,
        pattern: FilePattern,
    ) -> Self {
        Self {
            remote,
            store,
            snapshots,
            pattern,
            running: Mutex::new(()),
            last_report: RwLock::new(None),
        }
    }

    /// Report of the latest (possibly still running) run
    pub fn last_report(&self) -> Option<SyncReport> {
        self.last_report.read().clone()
    }

    /// Run one sync cycle.
    ///
    /// Fails immediately with [`SyncError::AlreadyRunning`] if another run is
    /// in flight. Any other failure is logged and recorded in the report; the
    /// published snapshot is only replaced after a complete decode.
    pub async fn run_once(&self) -> Result<SyncReport, SyncError> {
        let _guard = self.running.try_lock().map_err(|_| SyncError::AlreadyRunning)?;

        let mut report = SyncReport::start();
        *self.last_report.write() = Some(report.clone());

        let result = self.execute(&mut report).await;
        match &result {
            Ok(snapshot) => {
                report.complete(snapshot);
                info!(
                    run_id = %report.run_id,
                    file = ?report.file_name,
                    downloaded = report.downloaded,
                    records = snapshot.records().len(),
                    duration_ms = ?report.duration_ms(),
                    "Sync run completed"
                );
            }
            Err(e) => {
                report.fail(e);
                match e {
                    SyncError::Decode(_)
                    | SyncError::EmptyDirectory { .. }
                    | SyncError::Store(_) => error!(
                        run_id = %report.run_id,
                        stage = %report.stage,
                        error = %e,
                        "Sync run failed; keeping current snapshot"
                    ),
                    _ => warn!(
                        run_id = %report.run_id,
                        stage = %report.stage,
                        error = %e,
                        "Sync run aborted; keeping current snapshot"
                    ),
                }
            }
        }

        *self.last_report.write() = Some(report.clone());
        result.map(|_| report)
    }

    #[instrument(skip(self, report), fields(run_id = %report.run_id))]
    async fn execute(&self, report: &mut SyncReport) -> Result<Arc<Snapshot>, SyncError> {
        report.enter(SyncStage::CheckingMarker);
        let marker = self.store.read_marker().await?;
        match &marker {
            Some(name) => debug!(marker = %name, "Found sync marker"),
            None => info!("No sync marker; treating as never synced"),
        }

        report.enter(SyncStage::Listing);
        debug!(source = %self.remote.describe(), "Connecting to remote source");
        let mut session = self.remote.connect().await?;
        let fetched = self.fetch_latest(session.as_mut(), marker.as_deref(), report).await;
        session.disconnect().await;
        let fetched = fetched?;

        report.enter(SyncStage::Publishing);
        let providers = self.snapshots.current().providers().clone();
        let records = decode(&fetched.payload, &providers)?;
        if records.is_empty() {
            return Err(SyncError::EmptyDirectory {
                file_name: fetched.file_name,
            });
        }

        // The cache and the marker only ever describe a file that decoded
        if fetched.downloaded {
            self.store.stage_payload(&fetched.payload).await?;
        }
        let snapshot = self.snapshots.publish(records, Some(fetched.file_name.clone()));
        if fetched.downloaded {
            self.store.write_marker(&fetched.file_name).await?;
        }

        Ok(snapshot)
    }

    async fn fetch_latest(
        &self,
        session: &mut dyn RemoteSession,
        marker: Option<&str>,
        report: &mut SyncReport,
    ) -> Result<Fetched, SyncError> {
        let files = session.list().await?;

        report.enter(SyncStage::Deciding);
        let latest = resolve_latest(&files, &self.pattern).ok_or_else(|| SyncError::NoCandidate {
            pattern: self.pattern.to_string(),
        })?;
        let file_name = latest.name.clone();
        report.file_name = Some(file_name.clone());

        if marker == Some(file_name.as_str()) {
            report.enter(SyncStage::Skipping);
            if let Some(payload) = self.store.read_payload().await? {
                info!(file = %file_name, "Already synced; reloading cached payload");
                return Ok(Fetched {
                    file_name,
                    payload,
                    downloaded: false,
                });
            }
            warn!(file = %file_name, "Marker matches but cached payload is missing; downloading again");
        }

        report.enter(SyncStage::Downloading);
        info!(file = %file_name, modified_at = %latest.modified_at, "Downloading");
        let payload = session.fetch(&file_name).await?;
        report.downloaded = true;
        info!(file = %file_name, bytes = payload.len(), "File downloaded successfully");

        Ok(Fetched {
            file_name,
            payload,
            downloaded: true,
        })
    }
}
