//! Equipment repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentRow, InventoryFilter, UpdateEquipment},
};

use super::map_unique_violation;

/// Base SELECT resolving the holder's name through the users table
const SELECT_EQUIPMENT: &str = r#"
    SELECT e.id, e.device, e.device_type, e.serial, e.held_by,
           u.name AS holder_name, e.description, e.created_at
    FROM equipment e
    LEFT JOIN users u ON u.id = e.held_by
"#;

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List equipment for the given filter, ordered by id
    pub async fn list(&self, filter: InventoryFilter, caller_id: i32) -> AppResult<Vec<Equipment>> {
        let rows = match filter {
            InventoryFilter::All => {
                sqlx::query_as::<_, EquipmentRow>(&format!("{} ORDER BY e.id", SELECT_EQUIPMENT))
                    .fetch_all(&self.pool)
                    .await?
            }
            InventoryFilter::Mine => {
                sqlx::query_as::<_, EquipmentRow>(&format!(
                    "{} WHERE e.held_by = $1 ORDER BY e.id",
                    SELECT_EQUIPMENT
                ))
                .bind(caller_id)
                .fetch_all(&self.pool)
                .await?
            }
            InventoryFilter::Type(device_type) => {
                sqlx::query_as::<_, EquipmentRow>(&format!(
                    "{} WHERE e.device_type = $1 ORDER BY e.id",
                    SELECT_EQUIPMENT
                ))
                .bind(device_type)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows.into_iter().map(Equipment::from).collect())
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, EquipmentRow>(&format!("{} WHERE e.id = $1", SELECT_EQUIPMENT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Equipment::from)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Pick an item for a user. The conditional update is the atomic
    /// check-then-write: of two concurrent picks only one can match the
    /// `held_by IS NULL` predicate, the other fails the transition.
    pub async fn pick(&self, id: i32, user_id: i32) -> AppResult<Equipment> {
        let result =
            sqlx::query("UPDATE equipment SET held_by = $1 WHERE id = $2 AND held_by IS NULL")
                .bind(user_id)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing record from an item someone already holds
            let current = self.get_by_id(id).await?;
            return Err(AppError::InvalidTransition(format!(
                "Equipment {} is not available (held by {})",
                id, current.status
            )));
        }

        self.get_by_id(id).await
    }

    /// Release an item back to Available, regardless of the current holder.
    /// Releasing an already available item is a no-op.
    pub async fn release(&self, id: i32) -> AppResult<Equipment> {
        let result = sqlx::query("UPDATE equipment SET held_by = NULL WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }

        self.get_by_id(id).await
    }

    /// Create an equipment record
    pub async fn create(&self, data: &CreateEquipment, held_by: Option<i32>) -> AppResult<Equipment> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO equipment (device, device_type, serial, held_by, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&data.device)
        .bind(data.device_type)
        .bind(&data.serial)
        .bind(held_by)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Device or serial already exists"))?;

        self.get_by_id(id).await
    }

    /// Full overwrite of an equipment record (admin edit)
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateEquipment,
        held_by: Option<i32>,
    ) -> AppResult<Equipment> {
        let result = sqlx::query(
            r#"
            UPDATE equipment
            SET device = $1, device_type = $2, serial = $3, held_by = $4, description = $5
            WHERE id = $6
            "#,
        )
        .bind(&data.device)
        .bind(data.device_type)
        .bind(&data.serial)
        .bind(held_by)
        .bind(&data.description)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Device or serial already exists"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }

        self.get_by_id(id).await
    }

    /// Delete an equipment record
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Check whether a device name is taken by a different record
    pub async fn device_exists(&self, device: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM equipment WHERE device = $1 AND id != COALESCE($2, -1))",
        )
        .bind(device)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Check whether a serial number is taken by a different record
    pub async fn serial_exists(&self, serial: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM equipment WHERE serial = $1 AND id != COALESCE($2, -1))",
        )
        .bind(serial)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
