//! Recurring sync trigger

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::orchestrator::{SyncError, SyncOrchestrator};

/// Spawn the background sync loop.
///
/// The first tick fires immediately, so the initial sync happens at startup.
/// Runs never overlap: the loop awaits each run, and ticks missed while a
/// slow run was in flight are dropped rather than replayed.
pub fn spawn_sync_loop(orchestrator: Arc<SyncOrchestrator>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval_secs = every.as_secs(), "Sync schedule started");
        loop {
            ticker.tick().await;
            match orchestrator.run_once().await {
                Ok(_) => {}
                Err(SyncError::AlreadyRunning) => {
                    warn!("Skipping scheduled sync; previous run still in flight");
                }
                // already logged and recorded by the orchestrator
                Err(_) => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::ProviderTable;
    use crate::remote::mock::MockSource;
    use crate::remote::FilePattern;
    use crate::snapshot::SnapshotStore;
    use crate::storage::LocalStore;

    #[tokio::test]
    async fn test_first_tick_syncs_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).await.unwrap();
        let remote = MockSource::new();
        remote.put(
            "BSBDirectory_2024.csv",
            Utc::now(),
            b"062-000,062,Branch A,1 Main St,Sydney,NSW,2000\n",
        );
        let snapshots = Arc::new(SnapshotStore::new(ProviderTable::default()));
        let orchestrator = Arc::new(SyncOrchestrator::new(
            Arc::new(remote.clone()),
            store,
            snapshots.clone(),
            FilePattern::new("BSBDirectory", ".csv"),
        ));

        let handle = spawn_sync_loop(orchestrator, Duration::from_secs(3600));

        for _ in 0..200 {
            if snapshots.current().version() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert_eq!(snapshots.current().records().len(), 1);
        assert_eq!(remote.connects(), 1);
    }
}
