//! Inventory management endpoints (admin only)

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, DeviceType, InventoryFilter, UpdateEquipment},
};

use super::{
    dashboard::{DashboardQuery, DashboardResponse},
    AuthenticatedUser,
};

/// Add/Edit/Remove submission. Field names follow the original management
/// form (`subbt`, `deviceid`, `type`); long spellings accepted as aliases.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ManageAction {
    /// "Add", "Edit" or "Remove"
    #[serde(alias = "subbt")]
    pub action: String,
    #[serde(alias = "deviceid")]
    pub device_id: Option<i32>,
    pub filter: Option<String>,
    pub device: Option<String>,
    #[serde(rename = "type", alias = "device_type")]
    pub device_type: Option<DeviceType>,
    pub serial: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl ManageAction {
    fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
        value.ok_or_else(|| AppError::Validation(format!("Field '{}' is required", field)))
    }

    fn into_create(self) -> AppResult<CreateEquipment> {
        Ok(CreateEquipment {
            device: Self::required(self.device, "device")?,
            device_type: Self::required(self.device_type, "type")?,
            serial: Self::required(self.serial, "serial")?,
            status: self.status,
            description: self.description,
        })
    }

    fn into_update(self) -> AppResult<(i32, UpdateEquipment)> {
        let id = Self::required(self.device_id, "deviceid")?;
        let update = UpdateEquipment {
            device: Self::required(self.device, "device")?,
            device_type: Self::required(self.device_type, "type")?,
            serial: Self::required(self.serial, "serial")?,
            status: Self::required(self.status, "status")?,
            description: self.description,
        };
        Ok((id, update))
    }
}

/// View the inventory for management, filtered
#[utoipa::path(
    get,
    path = "/dashboard/ad_manage",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(DashboardQuery),
    responses(
        (status = 200, description = "Filtered equipment list", body = DashboardResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn view(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    claims.require_admin()?;

    let filter = InventoryFilter::parse(query.filter.as_deref());
    let data = state.services.inventory.list(filter, claims.user_id).await?;

    Ok(Json(DashboardResponse {
        name: claims.name,
        permission: claims.is_admin,
        filter: query.filter,
        data,
    }))
}

/// Add, edit or remove an equipment record, then return the re-filtered list
#[utoipa::path(
    post,
    path = "/dashboard/ad_manage",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = ManageAction,
    responses(
        (status = 200, description = "Mutation applied, filtered list returned", body = DashboardResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Device or serial already exists")
    )
)]
pub async fn act(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ManageAction>,
) -> AppResult<Json<DashboardResponse>> {
    claims.require_admin()?;

    let filter_raw = request.filter.clone();

    match request.action.to_lowercase().as_str() {
        "add" => {
            state.services.inventory.add(request.into_create()?).await?;
        }
        "edit" => {
            let (id, update) = request.into_update()?;
            state.services.inventory.edit(id, update).await?;
        }
        "remove" => {
            let id = ManageAction::required(request.device_id, "deviceid")?;
            state.services.inventory.remove(id).await?;
        }
        other => {
            return Err(AppError::BadRequest(format!("Unknown action: {}", other)));
        }
    }

    let filter = InventoryFilter::parse(filter_raw.as_deref());
    let data = state.services.inventory.list(filter, claims.user_id).await?;

    Ok(Json(DashboardResponse {
        name: claims.name,
        permission: claims.is_admin,
        filter: filter_raw,
        data,
    }))
}
