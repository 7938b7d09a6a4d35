//! Overdue fine model

use chrono::NaiveDateTime;
use sqlx::FromRow;

use super::enums::FineStatus;

/// Fine attached to an overdue borrowing, joined with member and book
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Fine {
    pub fine_id: i64,
    pub borrowing_id: i64,
    pub member_id: i64,
    pub member_name: String,
    pub book_title: String,
    pub days_overdue: i64,
    /// `days_overdue * daily rate` at the time of the last calculation
    pub amount: f64,
    pub calculated_at: NaiveDateTime,
    #[sqlx(try_from = "String")]
    pub status: FineStatus,
}

impl Fine {
    pub fn is_paid(&self) -> bool {
        self.status == FineStatus::Paid
    }
}
