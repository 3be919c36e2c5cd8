//! OpenAPI 3.0 specification definition

use utoipa::OpenApi;

use crate::api::handlers::{
    health::HealthResponse,
    info::ServiceInfo,
    ErrorResponse,
};
use crate::domain::BranchRecord;
use crate::sync::{SyncReport, SyncRunStatus, SyncStage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BSB Lookup API",
        version = "1.0.0",
        description = "Lookup service over the published Bank-State-Branch directory",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "bsb", description = "Branch lookup endpoints"),
        (name = "sync", description = "Directory sync status")
    ),
    paths(
        crate::api::handlers::info::service_info,
        crate::api::handlers::health::health_check,
        crate::api::handlers::bsb::list_branches,
        crate::api::handlers::bsb::get_branch,
        crate::api::handlers::sync::sync_status,
    ),
    components(
        schemas(
            ServiceInfo,
            HealthResponse,
            ErrorResponse,
            BranchRecord,
            SyncReport,
            SyncRunStatus,
            SyncStage,
        )
    )
)]
pub struct ApiDoc;
