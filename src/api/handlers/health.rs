//! Health check endpoint

use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub healthy: bool,
    pub count: usize,
    pub provider_count: usize,
}

/// GET /health - Readiness of the directory data
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Records and providers are loaded", body = HealthResponse),
        (status = 503, description = "No records or no providers loaded yet", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let health = state.snapshots.health();

    let response = HealthResponse {
        healthy: health.is_healthy(),
        count: health.record_count,
        provider_count: health.provider_count,
    };

    if response.healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::api;
    use crate::api::handlers::test_support::{app_state, providers, record};
    use crate::domain::ProviderTable;

    #[actix_web::test]
    async fn test_unhealthy_before_first_publish() {
        let (state, _) = app_state(providers());
        let app = test::init_service(App::new().app_data(state).configure(api::configure_routes)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"healthy": false, "count": 0, "providerCount": 1}));
    }

    #[actix_web::test]
    async fn test_healthy_after_publish() {
        let (state, _) = app_state(providers());
        state.snapshots.publish(vec![record("062-000", "Branch A")], None);
        let app = test::init_service(App::new().app_data(state).configure(api::configure_routes)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"healthy": true, "count": 1, "providerCount": 1}));
    }

    #[actix_web::test]
    async fn test_no_providers_is_unhealthy() {
        let (state, _) = app_state(ProviderTable::default());
        state.snapshots.publish(vec![record("062-000", "Branch A")], None);
        let app = test::init_service(App::new().app_data(state).configure(api::configure_routes)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
