//! Staff methods on Repository

use tracing::instrument;
use validator::Validate;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::staff::{Staff, StaffInput},
};

const STAFF_SELECT: &str = r#"
    SELECT StaffID AS staff_id, FirstName AS first_name, LastName AS last_name,
           Email AS email, Phone AS phone, Position AS position,
           HireDate AS hire_date, Salary AS salary
    FROM Staff
"#;

impl Repository {
    #[instrument(skip(self, data), fields(email = %data.email), err)]
    pub async fn create_staff(&self, data: &StaffInput) -> AppResult<i64> {
        let pool = self.pool()?;
        data.validate()?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO Staff (FirstName, LastName, Email, Phone, Position, Salary)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING StaffID
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.position)
        .bind(data.salary)
        .fetch_one(pool)
        .await?;

        tracing::info!("Staff created: {} {}", data.first_name, data.last_name);
        Ok(id)
    }

    /// List all staff ordered by last name, then first name
    #[instrument(skip(self), err)]
    pub async fn list_staff(&self) -> AppResult<Vec<Staff>> {
        let pool = self.pool()?;
        let staff =
            sqlx::query_as::<_, Staff>(&format!("{} ORDER BY LastName, FirstName", STAFF_SELECT))
                .fetch_all(pool)
                .await?;

        tracing::info!("Retrieved {} staff members", staff.len());
        Ok(staff)
    }

    #[instrument(skip(self), err)]
    pub async fn get_staff(&self, staff_id: i64) -> AppResult<Staff> {
        let pool = self.pool()?;
        sqlx::query_as::<_, Staff>(&format!("{} WHERE StaffID = ?", STAFF_SELECT))
            .bind(staff_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff member {} not found", staff_id)))
    }

    #[instrument(skip(self, data), err)]
    pub async fn update_staff(&self, staff_id: i64, data: &StaffInput) -> AppResult<()> {
        let pool = self.pool()?;
        data.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE Staff
            SET FirstName = ?, LastName = ?, Email = ?, Phone = ?, Position = ?, Salary = ?
            WHERE StaffID = ?
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.position)
        .bind(data.salary)
        .bind(staff_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Staff member {} not found", staff_id)));
        }
        tracing::info!("Staff updated: StaffID {}", staff_id);
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn delete_staff(&self, staff_id: i64) -> AppResult<()> {
        let pool = self.pool()?;
        let result = sqlx::query("DELETE FROM Staff WHERE StaffID = ?")
            .bind(staff_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Staff member {} not found", staff_id)));
        }
        tracing::info!("Staff deleted: StaffID {}", staff_id);
        Ok(())
    }
}
