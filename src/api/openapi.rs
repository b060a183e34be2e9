//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, dashboard, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LabTrack API",
        version = "0.1.0",
        description = "Lab Equipment Checkout Tracker REST API"
    ),
    paths(
        // Health
        health::index,
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::me,
        auth::logout,
        // Dashboard
        dashboard::view,
        dashboard::act,
        // Admin
        admin::view,
        admin::act,
    ),
    components(
        schemas(
            // Auth
            auth::UserInfo,
            auth::LoginResponse,
            crate::models::user::SignupRequest,
            crate::models::user::LoginRequest,
            crate::models::user::MemberType,
            // Inventory
            crate::models::equipment::Equipment,
            crate::models::equipment::DeviceType,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            dashboard::DashboardAction,
            dashboard::DashboardResponse,
            admin::ManageAction,
            // Health
            health::HealthResponse,
            health::IndexResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "dashboard", description = "Equipment checkout dashboard"),
        (name = "admin", description = "Inventory management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
