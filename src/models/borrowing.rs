//! Borrowing (loan) model and related types

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;

use super::enums::BorrowingStatus;

/// Borrowing joined with book title and member name
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Borrowing {
    pub borrowing_id: i64,
    pub book_id: i64,
    pub book_title: String,
    pub member_id: i64,
    pub member_name: String,
    /// Issuing staff member
    pub staff_id: i64,
    pub borrow_date: NaiveDateTime,
    pub due_date: NaiveDate,
    /// Set exactly when `status` is `Returned`
    pub return_date: Option<NaiveDateTime>,
    #[sqlx(try_from = "String")]
    pub status: BorrowingStatus,
}

impl Borrowing {
    pub fn is_overdue(&self) -> bool {
        self.status == BorrowingStatus::Overdue
    }

    pub fn is_returned(&self) -> bool {
        self.status == BorrowingStatus::Returned
    }
}

impl std::fmt::Display for Borrowing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "========================================")?;
        writeln!(f, "Borrowing ID: {}", self.borrowing_id)?;
        writeln!(f, "Member: {} (ID: {})", self.member_name, self.member_id)?;
        writeln!(f, "Book: {} (ID: {})", self.book_title, self.book_id)?;
        writeln!(f, "Borrow Date: {}", self.borrow_date.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Due Date: {}", self.due_date)?;
        match self.return_date {
            Some(date) => writeln!(f, "Return Date: {}", date.format("%Y-%m-%d %H:%M:%S"))?,
            None => writeln!(f, "Return Date: Not returned yet")?,
        }
        write!(f, "Status: {}", self.status)?;
        if self.is_overdue() {
            write!(f, " (OVERDUE!)")?;
        }
        write!(f, "\n========================================")
    }
}

/// Row of the `CurrentBorrowings` view (unreturned borrowings)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CurrentBorrowing {
    pub borrowing_id: i64,
    pub member_name: String,
    pub email: String,
    pub book_title: String,
    pub isbn: String,
    pub borrow_date: NaiveDateTime,
    pub due_date: NaiveDate,
    /// Whole days past the due date, 0 when not yet due
    pub days_overdue: i64,
    #[sqlx(try_from = "String")]
    pub status: BorrowingStatus,
}

/// Create borrowing request
#[derive(Debug, Clone)]
pub struct CreateBorrowing {
    pub book_id: i64,
    pub member_id: i64,
    pub staff_id: i64,
    pub due_date: NaiveDate,
}
