//! Category model

use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    pub description: Option<String>,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.category_id, self.category_name)?;
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            write!(f, " - {}", description)?;
        }
        Ok(())
    }
}

/// Create or replace category request
#[derive(Debug, Clone, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100, message = "Category name is required"))]
    pub name: String,
    pub description: Option<String>,
}
