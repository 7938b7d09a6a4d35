//! Borrowing methods on Repository
//!
//! `create_borrowing` and `return_book` each touch Borrowings and Books and
//! run inside one transaction. Invariant: `0 <= AvailableCopies <=
//! TotalCopies`, and every open borrowing holds exactly one copy.

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::instrument;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        borrowing::{Borrowing, CreateBorrowing, CurrentBorrowing},
        enums::MembershipStatus,
    },
};

const BORROWING_SELECT: &str = r#"
    SELECT br.BorrowingID AS borrowing_id, br.BookID AS book_id, b.Title AS book_title,
           br.MemberID AS member_id, m.FirstName || ' ' || m.LastName AS member_name,
           br.StaffID AS staff_id, br.BorrowDate AS borrow_date, br.DueDate AS due_date,
           br.ReturnDate AS return_date, br.Status AS status
    FROM Borrowings br
    INNER JOIN Books b ON br.BookID = b.BookID
    INNER JOIN Members m ON br.MemberID = m.MemberID
"#;

/// Engine faults inside a compound operation surface as `Transaction`
/// errors; domain rejections keep their own kind.
fn rolled_back(operation: &str, err: AppError) -> AppError {
    match err {
        AppError::Database(e) => AppError::Transaction(format!("{} rolled back: {}", operation, e)),
        other => other,
    }
}

/// Commit on success, otherwise roll back and hand the error on.
async fn finish<T>(
    tx: Transaction<'_, Sqlite>,
    operation: &str,
    outcome: AppResult<T>,
) -> AppResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| AppError::Transaction(format!("{} commit failed: {}", operation, e)))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("{}: rollback failed: {}", operation, rollback_err);
            }
            Err(rolled_back(operation, err))
        }
    }
}

/// Take one copy off the shelf and record the borrowing.
///
/// The conditional decrement runs first so the transaction asks for the
/// write lock before reading anything. A concurrent borrower then waits on
/// `busy_timeout` and sees the committed count instead of failing with
/// "database is locked".
async fn borrow_copy(conn: &mut SqliteConnection, data: &CreateBorrowing) -> AppResult<i64> {
    let decremented = sqlx::query(
        r#"
        UPDATE Books SET AvailableCopies = AvailableCopies - 1, UpdatedAt = datetime('now')
        WHERE BookID = ? AND AvailableCopies > 0
        "#,
    )
    .bind(data.book_id)
    .execute(&mut *conn)
    .await?;

    let status: Option<String> =
        sqlx::query_scalar("SELECT MembershipStatus FROM Members WHERE MemberID = ?")
            .bind(data.member_id)
            .fetch_optional(&mut *conn)
            .await?;

    match status.map(MembershipStatus::from) {
        None => {
            return Err(AppError::NotFound(format!("Member {} not found", data.member_id)));
        }
        Some(MembershipStatus::Active) => {}
        Some(other) => {
            return Err(AppError::BusinessRule(format!(
                "Member {} is {} and cannot borrow",
                data.member_id, other
            )));
        }
    }

    if decremented.rows_affected() == 0 {
        let exists: Option<i64> = sqlx::query_scalar("SELECT BookID FROM Books WHERE BookID = ?")
            .bind(data.book_id)
            .fetch_optional(&mut *conn)
            .await?;
        return Err(match exists {
            Some(_) => AppError::Unavailable(format!("Book {} has no copies available", data.book_id)),
            None => AppError::NotFound(format!("Book {} not found", data.book_id)),
        });
    }

    let borrowing_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO Borrowings (BookID, MemberID, StaffID, DueDate)
        VALUES (?, ?, ?, ?)
        RETURNING BorrowingID
        "#,
    )
    .bind(data.book_id)
    .bind(data.member_id)
    .bind(data.staff_id)
    .bind(data.due_date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(borrowing_id)
}

/// Close an open borrowing and put its copy back on the shelf. Returns the
/// book id.
///
/// Closing the borrowing is the first statement, for the same locking reason
/// as in [`borrow_copy`].
async fn return_copy(conn: &mut SqliteConnection, borrowing_id: i64) -> AppResult<i64> {
    let closed: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE Borrowings SET ReturnDate = datetime('now'), Status = 'Returned'
        WHERE BorrowingID = ? AND ReturnDate IS NULL
        RETURNING BookID
        "#,
    )
    .bind(borrowing_id)
    .fetch_optional(&mut *conn)
    .await?;

    let book_id = match closed {
        Some(book_id) => book_id,
        None => {
            let exists: Option<i64> =
                sqlx::query_scalar("SELECT BorrowingID FROM Borrowings WHERE BorrowingID = ?")
                    .bind(borrowing_id)
                    .fetch_optional(&mut *conn)
                    .await?;
            return Err(match exists {
                Some(_) => AppError::AlreadyReturned(borrowing_id),
                None => AppError::NotFound(format!("Borrowing {} not found", borrowing_id)),
            });
        }
    };

    sqlx::query(
        r#"
        UPDATE Books SET AvailableCopies = MIN(AvailableCopies + 1, TotalCopies),
                         UpdatedAt = datetime('now')
        WHERE BookID = ?
        "#,
    )
    .bind(book_id)
    .execute(&mut *conn)
    .await?;

    Ok(book_id)
}

impl Repository {
    /// Lend one copy of a book.
    ///
    /// Atomically decrements the book's available copies and inserts a
    /// `Borrowed` row. Nothing is written when the member is missing or not
    /// active, the book is missing or has no copy left, or the engine rejects
    /// either statement. Returns the new borrowing id.
    #[instrument(
        skip(self, data),
        fields(book_id = data.book_id, member_id = data.member_id, staff_id = data.staff_id),
        err
    )]
    pub async fn create_borrowing(&self, data: &CreateBorrowing) -> AppResult<i64> {
        let pool = self.pool()?;
        let borrowing_id = self
            .bounded("create borrowing", async {
                let mut tx = pool.begin().await?;
                let outcome = borrow_copy(&mut tx, data).await;
                finish(tx, "create borrowing", outcome).await
            })
            .await?;

        tracing::info!(
            "Borrowing created: BorrowingID {}, BookID {}, MemberID {}",
            borrowing_id,
            data.book_id,
            data.member_id
        );
        Ok(borrowing_id)
    }

    /// Return a borrowed book.
    ///
    /// Atomically marks the borrowing `Returned` and gives the copy back,
    /// never exceeding the book's total. A borrowing that was already
    /// returned is rejected with `AlreadyReturned` and changes nothing.
    #[instrument(skip(self), err)]
    pub async fn return_book(&self, borrowing_id: i64) -> AppResult<()> {
        let pool = self.pool()?;
        let book_id = self
            .bounded("return book", async {
                let mut tx = pool.begin().await?;
                let outcome = return_copy(&mut tx, borrowing_id).await;
                finish(tx, "return book", outcome).await
            })
            .await?;

        tracing::info!("Book returned: BorrowingID {}, BookID {}", borrowing_id, book_id);
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn get_borrowing(&self, borrowing_id: i64) -> AppResult<Borrowing> {
        let pool = self.pool()?;
        sqlx::query_as::<_, Borrowing>(&format!("{} WHERE br.BorrowingID = ?", BORROWING_SELECT))
            .bind(borrowing_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowing {} not found", borrowing_id)))
    }

    /// List every borrowing, most recent first
    #[instrument(skip(self), err)]
    pub async fn list_borrowings(&self) -> AppResult<Vec<Borrowing>> {
        let pool = self.pool()?;
        let borrowings = sqlx::query_as::<_, Borrowing>(&format!(
            "{} ORDER BY br.BorrowDate DESC, br.BorrowingID DESC",
            BORROWING_SELECT
        ))
        .fetch_all(pool)
        .await?;

        tracing::info!("Retrieved {} borrowings", borrowings.len());
        Ok(borrowings)
    }

    /// Unreturned borrowings from the `CurrentBorrowings` view, most overdue
    /// first
    #[instrument(skip(self), err)]
    pub async fn list_current_borrowings(&self) -> AppResult<Vec<CurrentBorrowing>> {
        let pool = self.pool()?;
        let borrowings = sqlx::query_as::<_, CurrentBorrowing>(
            r#"
            SELECT BorrowingID AS borrowing_id, MemberName AS member_name, Email AS email,
                   BookTitle AS book_title, ISBN AS isbn, BorrowDate AS borrow_date,
                   DueDate AS due_date, DaysOverdue AS days_overdue, Status AS status
            FROM CurrentBorrowings
            ORDER BY DaysOverdue DESC, DueDate, BorrowingID
            "#,
        )
        .fetch_all(pool)
        .await?;

        tracing::info!("Retrieved {} current borrowings", borrowings.len());
        Ok(borrowings)
    }

    /// Full borrowing history of one member, most recent first
    #[instrument(skip(self), err)]
    pub async fn list_member_borrowings(&self, member_id: i64) -> AppResult<Vec<Borrowing>> {
        // Verify member exists
        self.get_member(member_id).await?;

        let pool = self.pool()?;
        let borrowings = sqlx::query_as::<_, Borrowing>(&format!(
            "{} WHERE br.MemberID = ? ORDER BY br.BorrowDate DESC, br.BorrowingID DESC",
            BORROWING_SELECT
        ))
        .bind(member_id)
        .fetch_all(pool)
        .await?;

        tracing::info!("Retrieved {} borrowings for MemberID {}", borrowings.len(), member_id);
        Ok(borrowings)
    }
}
