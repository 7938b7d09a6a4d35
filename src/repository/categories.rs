//! Category domain methods on Repository

use tracing::instrument;
use validator::Validate;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CategoryInput},
};

const CATEGORY_COLUMNS: &str = r#"
    CategoryID AS category_id,
    CategoryName AS category_name,
    Description AS description
"#;

impl Repository {
    /// Create a category, returning its id
    #[instrument(skip(self, data), fields(name = %data.name), err)]
    pub async fn create_category(&self, data: &CategoryInput) -> AppResult<i64> {
        let pool = self.pool()?;
        data.validate()?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO Categories (CategoryName, Description) VALUES (?, ?) RETURNING CategoryID",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(pool)
        .await?;

        tracing::info!("Category created: {}", data.name);
        Ok(id)
    }

    /// List all categories ordered by name
    #[instrument(skip(self), err)]
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let pool = self.pool()?;
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM Categories ORDER BY CategoryName",
            CATEGORY_COLUMNS
        ))
        .fetch_all(pool)
        .await?;

        tracing::info!("Retrieved {} categories", categories.len());
        Ok(categories)
    }

    /// Get category by ID
    #[instrument(skip(self), err)]
    pub async fn get_category(&self, category_id: i64) -> AppResult<Category> {
        let pool = self.pool()?;
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM Categories WHERE CategoryID = ?",
            CATEGORY_COLUMNS
        ))
        .bind(category_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", category_id)))
    }

    /// Replace a category's name and description
    #[instrument(skip(self, data), err)]
    pub async fn update_category(&self, category_id: i64, data: &CategoryInput) -> AppResult<()> {
        let pool = self.pool()?;
        data.validate()?;

        let result =
            sqlx::query("UPDATE Categories SET CategoryName = ?, Description = ? WHERE CategoryID = ?")
                .bind(&data.name)
                .bind(&data.description)
                .bind(category_id)
                .execute(pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", category_id)));
        }
        tracing::info!("Category updated: CategoryID {}", category_id);
        Ok(())
    }

    /// Delete a category. Fails at the engine while books still reference it.
    #[instrument(skip(self), err)]
    pub async fn delete_category(&self, category_id: i64) -> AppResult<()> {
        let pool = self.pool()?;
        let result = sqlx::query("DELETE FROM Categories WHERE CategoryID = ?")
            .bind(category_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", category_id)));
        }
        tracing::info!("Category deleted: CategoryID {}", category_id);
        Ok(())
    }
}
