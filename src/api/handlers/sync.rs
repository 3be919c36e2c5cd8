//! Sync status endpoint

use actix_web::{web, HttpResponse};

use crate::AppState;
use crate::sync::SyncReport;

use super::ErrorResponse;

/// GET /sync/status - Report of the latest sync run
#[utoipa::path(
    get,
    path = "/sync/status",
    tag = "sync",
    responses(
        (status = 200, description = "Latest sync run", body = SyncReport),
        (status = 404, description = "No sync has run yet", body = ErrorResponse)
    )
)]
pub async fn sync_status(state: web::Data<AppState>) -> HttpResponse {
    match state.sync.last_report() {
        Some(report) => HttpResponse::Ok().json(report),
        None => HttpResponse::NotFound().json(ErrorResponse::new("No sync has run yet")),
    }
}
