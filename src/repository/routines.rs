//! Overdue and fine routines on Repository
//!
//! SQLite has no stored procedures, so the engine-side routines
//! (`UpdateOverdueBooks`, `CalculateOverdueFines`) run here as plain SQL.
//! "Overdue" means: not returned and the due date is before today.

use tracing::instrument;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::fine::Fine,
};

impl Repository {
    /// Flag every open borrowing past its due date as `Overdue`. Returns the
    /// number of borrowings newly flagged.
    #[instrument(skip(self), err)]
    pub async fn update_overdue_books(&self) -> AppResult<u64> {
        let pool = self.pool()?;
        let result = self
            .bounded("update overdue books", async {
                Ok::<_, AppError>(sqlx::query(
                    r#"
                    UPDATE Borrowings SET Status = 'Overdue'
                    WHERE Status = 'Borrowed' AND ReturnDate IS NULL AND DueDate < date('now')
                    "#,
                )
                .execute(pool)
                .await?)
            })
            .await?;

        tracing::info!("Updated {} overdue books", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Write an unpaid fine of `days overdue * daily_rate` for every open
    /// borrowing past its due date. Existing unpaid fines are recalculated,
    /// paid ones are left alone. Returns the number of fines written.
    #[instrument(skip(self), err)]
    pub async fn calculate_overdue_fines(&self, daily_rate: f64) -> AppResult<u64> {
        let pool = self.pool()?;
        if !daily_rate.is_finite() || daily_rate < 0.0 {
            return Err(AppError::Validation(format!(
                "daily_rate: {} is not a valid non-negative amount",
                daily_rate
            )));
        }

        let result = self
            .bounded("calculate overdue fines", async {
                Ok::<_, AppError>(sqlx::query(
                    r#"
                    INSERT INTO Fines (BorrowingID, MemberID, DaysOverdue, Amount, CalculatedAt, Status)
                    SELECT overdue.BorrowingID, overdue.MemberID, overdue.Days,
                           overdue.Days * ?, datetime('now'), 'Unpaid'
                    FROM (
                        SELECT BorrowingID, MemberID,
                               CAST(julianday(date('now')) - julianday(DueDate) AS INTEGER) AS Days
                        FROM Borrowings
                        WHERE ReturnDate IS NULL AND DueDate < date('now')
                    ) AS overdue
                    WHERE overdue.Days > 0
                    ON CONFLICT (BorrowingID) DO UPDATE SET
                        DaysOverdue = excluded.DaysOverdue,
                        Amount = excluded.Amount,
                        CalculatedAt = excluded.CalculatedAt
                    WHERE Fines.Status = 'Unpaid'
                    "#,
                )
                .bind(daily_rate)
                .execute(pool)
                .await?)
            })
            .await?;

        tracing::info!(
            "Calculated fines for {} borrowings at {:.2} per day",
            result.rows_affected(),
            daily_rate
        );
        Ok(result.rows_affected())
    }

    /// List fines, largest first
    #[instrument(skip(self), err)]
    pub async fn list_fines(&self) -> AppResult<Vec<Fine>> {
        let pool = self.pool()?;
        let fines = sqlx::query_as::<_, Fine>(
            r#"
            SELECT f.FineID AS fine_id, f.BorrowingID AS borrowing_id, f.MemberID AS member_id,
                   m.FirstName || ' ' || m.LastName AS member_name, b.Title AS book_title,
                   f.DaysOverdue AS days_overdue, f.Amount AS amount,
                   f.CalculatedAt AS calculated_at, f.Status AS status
            FROM Fines f
            INNER JOIN Members m ON f.MemberID = m.MemberID
            INNER JOIN Borrowings br ON f.BorrowingID = br.BorrowingID
            INNER JOIN Books b ON br.BookID = b.BookID
            ORDER BY f.Amount DESC, f.FineID
            "#,
        )
        .fetch_all(pool)
        .await?;

        tracing::info!("Retrieved {} fines", fines.len());
        Ok(fines)
    }

    /// Settle a fine. Paying an already paid fine is a no-op error.
    #[instrument(skip(self), err)]
    pub async fn pay_fine(&self, fine_id: i64) -> AppResult<()> {
        let pool = self.pool()?;
        let result = sqlx::query("UPDATE Fines SET Status = 'Paid' WHERE FineID = ? AND Status = 'Unpaid'")
            .bind(fine_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            let exists: Option<i64> = sqlx::query_scalar("SELECT FineID FROM Fines WHERE FineID = ?")
                .bind(fine_id)
                .fetch_optional(pool)
                .await?;
            return Err(match exists {
                Some(_) => AppError::BusinessRule(format!("Fine {} is already paid", fine_id)),
                None => AppError::NotFound(format!("Fine {} not found", fine_id)),
            });
        }
        tracing::info!("Fine paid: FineID {}", fine_id);
        Ok(())
    }
}
