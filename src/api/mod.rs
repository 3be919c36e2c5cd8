//! API module - HTTP routes and handlers

pub mod handlers;
pub mod openapi;

use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::ApiDoc;

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::info::service_info))
        .route("/health", web::get().to(handlers::health::health_check))
        .service(
            web::scope("/bsb")
                .route("", web::get().to(handlers::bsb::list_branches))
                .route("/{bsb}", web::get().to(handlers::bsb::get_branch))
        )
        .route("/sync/status", web::get().to(handlers::sync::sync_status))
        // Swagger UI and OpenAPI spec
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
        );
}
