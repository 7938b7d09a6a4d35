//! Reservation model

use chrono::NaiveDateTime;
use sqlx::FromRow;

use super::enums::ReservationStatus;

/// Reservations expire this many days after they are placed
pub const RESERVATION_HOLD_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Reservation {
    pub reservation_id: i64,
    pub book_id: i64,
    pub book_title: String,
    pub member_id: i64,
    pub member_name: String,
    pub reservation_date: NaiveDateTime,
    pub expiry_date: Option<NaiveDateTime>,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn is_pending(&self) -> bool {
        self.status == ReservationStatus::Pending
    }
}

impl std::fmt::Display for Reservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "========================================")?;
        writeln!(f, "Reservation ID: {}", self.reservation_id)?;
        writeln!(f, "Member: {} (ID: {})", self.member_name, self.member_id)?;
        writeln!(f, "Book: {} (ID: {})", self.book_title, self.book_id)?;
        writeln!(
            f,
            "Reserved On: {}",
            self.reservation_date.format("%Y-%m-%d %H:%M:%S")
        )?;
        match self.expiry_date {
            Some(date) => writeln!(f, "Expires On: {}", date.format("%Y-%m-%d %H:%M:%S"))?,
            None => writeln!(f, "Expires On: ")?,
        }
        writeln!(f, "Status: {}", self.status)?;
        write!(f, "========================================")
    }
}
