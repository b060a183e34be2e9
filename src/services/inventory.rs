//! Inventory service: reservation engine, filtered views and admin CRUD

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, InventoryFilter, UpdateEquipment},
    repository::Repository,
};

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
}

impl InventoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List equipment for the given filter
    pub async fn list(&self, filter: InventoryFilter, caller_id: i32) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list(filter, caller_id).await
    }

    /// Get a single equipment record
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    /// Reserve an available item for the acting user
    pub async fn pick(&self, equipment_id: i32, user_id: i32) -> AppResult<Equipment> {
        let equipment = self.repository.equipment.pick(equipment_id, user_id).await?;
        tracing::info!(equipment_id, user_id, "Equipment picked");
        Ok(equipment)
    }

    /// Release a held item back to Available. Any authenticated user may
    /// return any held item, matching the original checkout policy.
    pub async fn return_equipment(&self, equipment_id: i32, user_id: i32) -> AppResult<Equipment> {
        let equipment = self.repository.equipment.release(equipment_id).await?;
        tracing::info!(equipment_id, user_id, "Equipment returned");
        Ok(equipment)
    }

    /// Add an equipment record (admin)
    pub async fn add(&self, data: CreateEquipment) -> AppResult<Equipment> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.equipment.device_exists(&data.device, None).await? {
            return Err(AppError::Conflict("Device name already exists".to_string()));
        }
        if self.repository.equipment.serial_exists(&data.serial, None).await? {
            return Err(AppError::Conflict("Serial already exists".to_string()));
        }

        let held_by = match data.status.as_deref() {
            None => None,
            Some(status) => self.resolve_holder(status).await?,
        };

        self.repository.equipment.create(&data, held_by).await
    }

    /// Overwrite an equipment record (admin). Bypasses the reservation
    /// transition guard: an admin may reassign or clear a hold directly.
    pub async fn edit(&self, id: i32, data: UpdateEquipment) -> AppResult<Equipment> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // Explicit existence check so an unknown id is NotFound, not a
        // validation failure on the status field
        self.repository.equipment.get_by_id(id).await?;

        if self.repository.equipment.device_exists(&data.device, Some(id)).await? {
            return Err(AppError::Conflict("Device name already exists".to_string()));
        }
        if self.repository.equipment.serial_exists(&data.serial, Some(id)).await? {
            return Err(AppError::Conflict("Serial already exists".to_string()));
        }

        let held_by = self.resolve_holder(&data.status).await?;

        self.repository.equipment.update(id, &data, held_by).await
    }

    /// Remove an equipment record (admin)
    pub async fn remove(&self, id: i32) -> AppResult<()> {
        self.repository.equipment.delete(id).await?;
        tracing::info!(equipment_id = id, "Equipment removed");
        Ok(())
    }

    /// Resolve a status string to a holder reference: "Available" means no
    /// holder, anything else must be the name of an existing user.
    async fn resolve_holder(&self, status: &str) -> AppResult<Option<i32>> {
        if status.trim().is_empty() {
            return Err(AppError::Validation("Status is required".to_string()));
        }
        if status == Equipment::STATUS_AVAILABLE {
            return Ok(None);
        }
        match self.repository.users.get_by_name(status).await? {
            Some(user) => Ok(Some(user.id)),
            None => Err(AppError::Validation(format!(
                "Status '{}' does not match any registered user",
                status
            ))),
        }
    }
}
