//! Branch lookup endpoints

use actix_web::{web, HttpResponse};
use tracing::debug;

use crate::AppState;
use crate::domain::BranchRecord;

use super::ErrorResponse;

/// GET /bsb - Every branch in the current snapshot, in directory order
#[utoipa::path(
    get,
    path = "/bsb",
    tag = "bsb",
    responses(
        (status = 200, description = "All branch records", body = Vec<BranchRecord>)
    )
)]
pub async fn list_branches(state: web::Data<AppState>) -> HttpResponse {
    let snapshot = state.snapshots.current();
    HttpResponse::Ok().json(snapshot.records())
}

/// GET /bsb/{bsb} - Look up a single branch by BSB
#[utoipa::path(
    get,
    path = "/bsb/{bsb}",
    tag = "bsb",
    params(
        ("bsb" = String, Path, description = "Bank-State-Branch code, e.g. 062-000")
    ),
    responses(
        (status = 200, description = "Branch found", body = BranchRecord),
        (status = 404, description = "No branch with this BSB", body = ErrorResponse)
    )
)]
pub async fn get_branch(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let bsb = path.into_inner();

    match state.snapshots.lookup(&bsb) {
        Some(record) => HttpResponse::Ok().json(record),
        None => {
            debug!(bsb = %bsb, "BSB not found");
            HttpResponse::NotFound().json(ErrorResponse::new("BSB not found"))
        }
    }
}
