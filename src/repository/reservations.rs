//! Reservation methods on Repository

use tracing::instrument;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::reservation::{Reservation, RESERVATION_HOLD_DAYS},
};

impl Repository {
    /// Place a reservation; the engine stamps the date and a 7-day expiry
    #[instrument(skip(self), err)]
    pub async fn create_reservation(&self, book_id: i64, member_id: i64) -> AppResult<i64> {
        let pool = self.pool()?;
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO Reservations (BookID, MemberID, ExpiryDate)
            VALUES (?, ?, datetime('now', '+' || ? || ' days'))
            RETURNING ReservationID
            "#,
        )
        .bind(book_id)
        .bind(member_id)
        .bind(RESERVATION_HOLD_DAYS)
        .fetch_one(pool)
        .await?;

        tracing::info!("Reservation created: BookID {}, MemberID {}", book_id, member_id);
        Ok(id)
    }

    /// List every reservation, most recent first
    #[instrument(skip(self), err)]
    pub async fn list_reservations(&self) -> AppResult<Vec<Reservation>> {
        let pool = self.pool()?;
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT r.ReservationID AS reservation_id, r.BookID AS book_id, b.Title AS book_title,
                   r.MemberID AS member_id, m.FirstName || ' ' || m.LastName AS member_name,
                   r.ReservationDate AS reservation_date, r.ExpiryDate AS expiry_date,
                   r.Status AS status
            FROM Reservations r
            INNER JOIN Books b ON r.BookID = b.BookID
            INNER JOIN Members m ON r.MemberID = m.MemberID
            ORDER BY r.ReservationDate DESC, r.ReservationID DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        tracing::info!("Retrieved {} reservations", reservations.len());
        Ok(reservations)
    }

    /// Cancel a pending reservation
    #[instrument(skip(self), err)]
    pub async fn cancel_reservation(&self, reservation_id: i64) -> AppResult<()> {
        let pool = self.pool()?;
        let result = sqlx::query(
            "UPDATE Reservations SET Status = 'Cancelled' WHERE ReservationID = ? AND Status = 'Pending'",
        )
        .bind(reservation_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            let status: Option<String> =
                sqlx::query_scalar("SELECT Status FROM Reservations WHERE ReservationID = ?")
                    .bind(reservation_id)
                    .fetch_optional(pool)
                    .await?;
            return Err(match status {
                Some(status) => AppError::BusinessRule(format!(
                    "Reservation {} is {} and cannot be cancelled",
                    reservation_id, status
                )),
                None => AppError::NotFound(format!("Reservation {} not found", reservation_id)),
            });
        }

        tracing::info!("Reservation cancelled: ReservationID {}", reservation_id);
        Ok(())
    }
}
