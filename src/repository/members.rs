//! Membership methods on Repository

use tracing::instrument;
use validator::Validate;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::MembershipStatus,
        member::{Member, MemberInput},
    },
};

const MEMBER_SELECT: &str = r#"
    SELECT MemberID AS member_id, FirstName AS first_name, LastName AS last_name,
           Email AS email, Phone AS phone, Address AS address,
           MembershipDate AS membership_date, MembershipStatus AS membership_status
    FROM Members
"#;

impl Repository {
    /// Register a member. Membership date and status are set by the engine.
    #[instrument(skip(self, data), fields(email = %data.email), err)]
    pub async fn create_member(&self, data: &MemberInput) -> AppResult<i64> {
        let pool = self.pool()?;
        data.validate()?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO Members (FirstName, LastName, Email, Phone, Address)
            VALUES (?, ?, ?, ?, ?)
            RETURNING MemberID
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.address)
        .fetch_one(pool)
        .await?;

        tracing::info!("Member created: {} {}", data.first_name, data.last_name);
        Ok(id)
    }

    /// List all members ordered by last name, then first name
    #[instrument(skip(self), err)]
    pub async fn list_members(&self) -> AppResult<Vec<Member>> {
        let pool = self.pool()?;
        let members =
            sqlx::query_as::<_, Member>(&format!("{} ORDER BY LastName, FirstName", MEMBER_SELECT))
                .fetch_all(pool)
                .await?;

        tracing::info!("Retrieved {} members", members.len());
        Ok(members)
    }

    /// Get member by ID
    #[instrument(skip(self), err)]
    pub async fn get_member(&self, member_id: i64) -> AppResult<Member> {
        let pool = self.pool()?;
        sqlx::query_as::<_, Member>(&format!("{} WHERE MemberID = ?", MEMBER_SELECT))
            .bind(member_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))
    }

    /// Replace a member's contact details
    #[instrument(skip(self, data), err)]
    pub async fn update_member(&self, member_id: i64, data: &MemberInput) -> AppResult<()> {
        let pool = self.pool()?;
        data.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE Members
            SET FirstName = ?, LastName = ?, Email = ?, Phone = ?, Address = ?
            WHERE MemberID = ?
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(member_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member {} not found", member_id)));
        }
        tracing::info!("Member updated: MemberID {}", member_id);
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn update_member_status(&self, member_id: i64, status: MembershipStatus) -> AppResult<()> {
        let pool = self.pool()?;
        if status == MembershipStatus::Unknown {
            return Err(AppError::Validation(
                "status: must be Active, Inactive or Suspended".to_string(),
            ));
        }

        let result = sqlx::query("UPDATE Members SET MembershipStatus = ? WHERE MemberID = ?")
            .bind(status.as_str())
            .bind(member_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member {} not found", member_id)));
        }
        tracing::info!("Member status updated: MemberID {}, Status: {}", member_id, status);
        Ok(())
    }

    /// Delete a member. Fails at the engine while borrowings, reservations
    /// or fines reference them.
    #[instrument(skip(self), err)]
    pub async fn delete_member(&self, member_id: i64) -> AppResult<()> {
        let pool = self.pool()?;
        let result = sqlx::query("DELETE FROM Members WHERE MemberID = ?")
            .bind(member_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member {} not found", member_id)));
        }
        tracing::info!("Member deleted: MemberID {}", member_id);
        Ok(())
    }
}
