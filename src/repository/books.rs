//! Book catalog methods on Repository

use tracing::instrument;
use validator::Validate;

use super::{contains_pattern, Repository};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
};

/// Books joined with Categories, aliased to `Book` field names
const BOOK_SELECT: &str = r#"
    SELECT b.BookID AS book_id, b.ISBN AS isbn, b.Title AS title, b.Author AS author,
           b.Publisher AS publisher, b.PublicationYear AS publication_year,
           b.CategoryID AS category_id, c.CategoryName AS category_name,
           b.TotalCopies AS total_copies, b.AvailableCopies AS available_copies,
           b.Price AS price, b.ShelfLocation AS shelf_location
    FROM Books b
    INNER JOIN Categories c ON b.CategoryID = c.CategoryID
"#;

impl Repository {
    /// Add a book to the catalog; all copies start available
    #[instrument(skip(self, data), fields(isbn = %data.isbn), err)]
    pub async fn create_book(&self, data: &CreateBook) -> AppResult<i64> {
        let pool = self.pool()?;
        data.validate()?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO Books (ISBN, Title, Author, Publisher, PublicationYear,
                               CategoryID, TotalCopies, AvailableCopies, Price, ShelfLocation)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING BookID
            "#,
        )
        .bind(&data.isbn)
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.publisher)
        .bind(data.publication_year)
        .bind(data.category_id)
        .bind(data.total_copies)
        .bind(data.total_copies)
        .bind(data.price)
        .bind(&data.shelf_location)
        .fetch_one(pool)
        .await?;

        tracing::info!("Book created: {} (ISBN: {})", data.title, data.isbn);
        Ok(id)
    }

    /// List every book ordered by title
    #[instrument(skip(self), err)]
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let pool = self.pool()?;
        let books = sqlx::query_as::<_, Book>(&format!("{} ORDER BY b.Title", BOOK_SELECT))
            .fetch_all(pool)
            .await?;

        tracing::info!("Retrieved {} books", books.len());
        Ok(books)
    }

    /// List books with at least one copy on the shelf (`AvailableBooks` view)
    #[instrument(skip(self), err)]
    pub async fn list_available_books(&self) -> AppResult<Vec<Book>> {
        let pool = self.pool()?;
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT BookID AS book_id, ISBN AS isbn, Title AS title, Author AS author,
                   Publisher AS publisher, PublicationYear AS publication_year,
                   CategoryID AS category_id, CategoryName AS category_name,
                   TotalCopies AS total_copies, AvailableCopies AS available_copies,
                   Price AS price, ShelfLocation AS shelf_location
            FROM AvailableBooks
            ORDER BY Title
            "#,
        )
        .fetch_all(pool)
        .await?;

        tracing::info!("Retrieved {} available books", books.len());
        Ok(books)
    }

    /// Case-insensitive "title contains" search. The term is matched
    /// literally, wildcard characters included.
    ///
    /// SQLite's `lower()` only folds ASCII, so a term with any non-ASCII
    /// character is folded and matched in Rust instead of in `LIKE`.
    #[instrument(skip(self), err)]
    pub async fn search_books_by_title(&self, term: &str) -> AppResult<Vec<Book>> {
        let pool = self.pool()?;
        let books = if term.is_ascii() {
            sqlx::query_as::<_, Book>(&format!(
                "{} WHERE lower(b.Title) LIKE lower(?) ESCAPE '\\' ORDER BY b.Title",
                BOOK_SELECT
            ))
            .bind(contains_pattern(term))
            .fetch_all(pool)
            .await?
        } else {
            let needle = term.to_lowercase();
            sqlx::query_as::<_, Book>(&format!("{} ORDER BY b.Title", BOOK_SELECT))
                .fetch_all(pool)
                .await?
                .into_iter()
                .filter(|book| book.title.to_lowercase().contains(&needle))
                .collect()
        };

        tracing::info!("Search found {} books for: {}", books.len(), term);
        Ok(books)
    }

    /// Get book by ID
    #[instrument(skip(self), err)]
    pub async fn get_book(&self, book_id: i64) -> AppResult<Book> {
        let pool = self.pool()?;
        sqlx::query_as::<_, Book>(&format!("{} WHERE b.BookID = ?", BOOK_SELECT))
            .bind(book_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))
    }

    /// Update descriptive fields and/or the number of copies owned.
    ///
    /// Changing `total_copies` shifts `available_copies` by the same amount,
    /// so copies on loan stay on loan; a total below the number currently
    /// borrowed is rejected.
    #[instrument(skip(self, data), err)]
    pub async fn update_book(&self, book_id: i64, data: &UpdateBook) -> AppResult<()> {
        let pool = self.pool()?;
        data.validate()?;

        let mut sets = vec!["UpdatedAt = datetime('now')".to_string()];

        macro_rules! add_field {
            ($field:expr, $column:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ?", $column));
                }
            };
        }

        add_field!(data.title, "Title");
        add_field!(data.author, "Author");
        add_field!(data.publisher, "Publisher");
        add_field!(data.publication_year, "PublicationYear");
        add_field!(data.category_id, "CategoryID");
        add_field!(data.price, "Price");
        add_field!(data.shelf_location, "ShelfLocation");
        if data.total_copies.is_some() {
            // Both right-hand sides see the pre-update TotalCopies
            sets.push("AvailableCopies = AvailableCopies + (? - TotalCopies)".to_string());
            sets.push("TotalCopies = ?".to_string());
        }

        let mut query = format!("UPDATE Books SET {} WHERE BookID = ?", sets.join(", "));
        if data.total_copies.is_some() {
            query.push_str(" AND TotalCopies - AvailableCopies <= ?");
        }

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.title);
        bind_field!(data.author);
        bind_field!(data.publisher);
        bind_field!(data.publication_year);
        bind_field!(data.category_id);
        bind_field!(data.price);
        bind_field!(data.shelf_location);
        bind_field!(data.total_copies);
        bind_field!(data.total_copies);
        builder = builder.bind(book_id);
        bind_field!(data.total_copies);

        let result = builder.execute(pool).await?;
        if result.rows_affected() == 0 {
            // Distinguish a missing book from a rejected copy count
            let book = self.get_book(book_id).await?;
            return Err(AppError::BusinessRule(format!(
                "Book {} has {} copies on loan; total copies cannot drop below that",
                book_id,
                book.borrowed_copies()
            )));
        }

        tracing::info!("Book updated: BookID {}", book_id);
        Ok(())
    }

    /// Directly set the number of available copies.
    ///
    /// Only values within `0..=TotalCopies` are accepted.
    #[instrument(skip(self), err)]
    pub async fn update_book_availability(&self, book_id: i64, available_copies: i32) -> AppResult<()> {
        let pool = self.pool()?;
        if available_copies < 0 {
            return Err(AppError::Validation(
                "available_copies: cannot be negative".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            UPDATE Books SET AvailableCopies = ?, UpdatedAt = datetime('now')
            WHERE BookID = ? AND ? <= TotalCopies
            "#,
        )
        .bind(available_copies)
        .bind(book_id)
        .bind(available_copies)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            let book = self.get_book(book_id).await?;
            return Err(AppError::Validation(format!(
                "available_copies: {} exceeds total copies ({})",
                available_copies, book.total_copies
            )));
        }

        tracing::info!(
            "Book availability updated: BookID {}, Available: {}",
            book_id,
            available_copies
        );
        Ok(())
    }

    /// Delete a book. Fails at the engine while borrowings or reservations
    /// reference it.
    #[instrument(skip(self), err)]
    pub async fn delete_book(&self, book_id: i64) -> AppResult<()> {
        let pool = self.pool()?;
        let result = sqlx::query("DELETE FROM Books WHERE BookID = ?")
            .bind(book_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", book_id)));
        }
        tracing::info!("Book deleted: BookID {}", book_id);
        Ok(())
    }
}
