//! Service information endpoint

use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: String,
}

/// Build number from the deployment, falling back to the crate version
fn service_version() -> String {
    std::env::var("BUILD_NUMBER").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string())
}

/// GET / - Service name and version
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    )
)]
pub async fn service_info() -> HttpResponse {
    HttpResponse::Ok().json(ServiceInfo {
        name: "BSB lookup service",
        version: service_version(),
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::Value;

    use super::*;

    #[actix_web::test]
    async fn test_service_info() {
        let app = test::init_service(App::new().route("/", web::get().to(service_info))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["name"], "BSB lookup service");
        assert!(body["version"].is_string());
    }
}
