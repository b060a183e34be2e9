//! Dashboard endpoints: filtered inventory view plus pick/return actions

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::equipment::{Equipment, InventoryFilter},
};

use super::AuthenticatedUser;

/// Dashboard query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// "All Devices", "My Workbench" or a device type
    pub filter: Option<String>,
}

/// Pick/Return action submission. Field names match the original dashboard
/// form (`subbt`, `deviceid`); the long spellings are accepted as aliases.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DashboardAction {
    /// "Pick" or "Return"
    #[serde(alias = "subbt")]
    pub action: String,
    #[serde(alias = "deviceid")]
    pub device_id: i32,
    pub filter: Option<String>,
}

/// Dashboard response: the caller's identity and the filtered inventory
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub name: String,
    /// Whether the caller may manage the inventory
    pub permission: bool,
    pub filter: Option<String>,
    pub data: Vec<Equipment>,
}

/// View the equipment list, filtered
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    params(DashboardQuery),
    responses(
        (status = 200, description = "Filtered equipment list", body = DashboardResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn view(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let filter = InventoryFilter::parse(query.filter.as_deref());
    let data = state.services.inventory.list(filter, claims.user_id).await?;

    Ok(Json(DashboardResponse {
        name: claims.name,
        permission: claims.is_admin,
        filter: query.filter,
        data,
    }))
}

/// Pick or return a device, then return the re-filtered list
#[utoipa::path(
    post,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    request_body = DashboardAction,
    responses(
        (status = 200, description = "Action applied, filtered list returned", body = DashboardResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Item is not available")
    )
)]
pub async fn act(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<DashboardAction>,
) -> AppResult<Json<DashboardResponse>> {
    match request.action.to_lowercase().as_str() {
        "pick" => {
            state
                .services
                .inventory
                .pick(request.device_id, claims.user_id)
                .await?;
        }
        "return" => {
            state
                .services
                .inventory
                .return_equipment(request.device_id, claims.user_id)
                .await?;
        }
        other => {
            return Err(AppError::BadRequest(format!("Unknown action: {}", other)));
        }
    }

    let filter = InventoryFilter::parse(request.filter.as_deref());
    let data = state.services.inventory.list(filter, claims.user_id).await?;

    Ok(Json(DashboardResponse {
        name: claims.name,
        permission: claims.is_admin,
        filter: request.filter,
        data,
    }))
}
