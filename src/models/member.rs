//! Library member model

use chrono::NaiveDate;
use sqlx::FromRow;
use validator::Validate;

use super::enums::MembershipStatus;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Member {
    pub member_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Assigned by the engine on insert
    pub membership_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub membership_status: MembershipStatus,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.membership_status == MembershipStatus::Active
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "========================================")?;
        writeln!(f, "Member ID: {}", self.member_id)?;
        writeln!(f, "Name: {}", self.full_name())?;
        writeln!(f, "Email: {}", self.email)?;
        writeln!(f, "Phone: {}", self.phone.as_deref().unwrap_or(""))?;
        writeln!(f, "Address: {}", self.address.as_deref().unwrap_or(""))?;
        writeln!(f, "Member Since: {}", self.membership_date)?;
        writeln!(f, "Status: {}", self.membership_status)?;
        write!(f, "========================================")
    }
}

/// Create or replace member contact details
#[derive(Debug, Clone, Validate)]
pub struct MemberInput {
    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 20, message = "Phone number is too long"))]
    pub phone: Option<String>,
    pub address: Option<String>,
}
