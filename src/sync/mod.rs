//! Sync module for the BSB directory
//!
//! Pulls the latest directory file from the remote source on a fixed
//! cadence and publishes it into the snapshot store.

mod orchestrator;
mod scheduler;

pub use orchestrator::{SyncOrchestrator, SyncReport, SyncRunStatus, SyncStage};
pub use scheduler::spawn_sync_loop;
