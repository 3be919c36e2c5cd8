//! HTTP request handlers

pub mod health;
pub mod bsb;
pub mod info;
pub mod sync;

use serde::Serialize;
use utoipa::ToSchema;

/// Error body shared by the lookup endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use actix_web::web;

    use crate::config::Settings;
    use crate::domain::{BranchRecord, ProviderTable};
    use crate::remote::mock::MockSource;
    use crate::snapshot::SnapshotStore;
    use crate::storage::LocalStore;
    use crate::sync::SyncOrchestrator;
    use crate::AppState;

    pub fn record(bsb: &str, name: &str) -> BranchRecord {
        BranchRecord {
            bsb: bsb.to_string(),
            institution_code: "062".to_string(),
            institution_name: "Commonwealth Bank".to_string(),
            name: name.to_string(),
            address: "1 Main St".to_string(),
            city: "Sydney".to_string(),
            state: "NSW".to_string(),
            postcode: "2000".to_string(),
        }
    }

    /// App state over an unsynced store; the orchestrator points at an
    /// empty mock source and a store directory that is never written.
    pub fn app_state(providers: ProviderTable) -> (web::Data<AppState>, MockSource) {
        let settings = Settings::default();
        let remote = MockSource::new();
        let snapshots = Arc::new(SnapshotStore::new(providers));
        let store = LocalStore::new(std::env::temp_dir().join("bsb-lookup-handler-tests"));
        let sync = Arc::new(SyncOrchestrator::new(
            Arc::new(remote.clone()),
            store,
            snapshots.clone(),
            settings.file_pattern(),
        ));

        let state = web::Data::new(AppState {
            snapshots,
            sync,
        });
        (state, remote)
    }

    pub fn providers() -> ProviderTable {
        [("062".to_string(), "Commonwealth Bank".to_string())]
            .into_iter()
            .collect()
    }
}
