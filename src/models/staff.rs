//! Staff model

use chrono::NaiveDate;
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Staff {
    pub staff_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub hire_date: NaiveDate,
    pub salary: f64,
}

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl std::fmt::Display for Staff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "========================================")?;
        writeln!(f, "Staff ID: {}", self.staff_id)?;
        writeln!(f, "Name: {}", self.full_name())?;
        writeln!(f, "Email: {}", self.email)?;
        writeln!(f, "Phone: {}", self.phone.as_deref().unwrap_or(""))?;
        writeln!(f, "Position: {}", self.position.as_deref().unwrap_or(""))?;
        writeln!(f, "Hire Date: {}", self.hire_date)?;
        writeln!(f, "Salary: ${:.2}", self.salary)?;
        write!(f, "========================================")
    }
}

/// Create or replace staff member details
#[derive(Debug, Clone, Validate)]
pub struct StaffInput {
    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 20, message = "Phone number is too long"))]
    pub phone: Option<String>,
    pub position: Option<String>,
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub salary: f64,
}
