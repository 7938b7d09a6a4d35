//! Book model and catalog inputs

use sqlx::FromRow;
use validator::Validate;

/// Book row joined with its category name
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Book {
    pub book_id: i64,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub category_id: i64,
    /// Denormalized from Categories for display
    pub category_name: String,
    pub total_copies: i32,
    /// Always within `0..=total_copies`
    pub available_copies: i32,
    pub price: f64,
    pub shelf_location: Option<String>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Number of copies currently out on loan
    pub fn borrowed_copies(&self) -> i32 {
        self.total_copies - self.available_copies
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "========================================")?;
        writeln!(f, "Book ID: {}", self.book_id)?;
        writeln!(f, "ISBN: {}", self.isbn)?;
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Publisher: {}", self.publisher.as_deref().unwrap_or(""))?;
        match self.publication_year {
            Some(year) => writeln!(f, "Year: {}", year)?,
            None => writeln!(f, "Year: ")?,
        }
        writeln!(f, "Category: {}", self.category_name)?;
        writeln!(f, "Available: {}/{}", self.available_copies, self.total_copies)?;
        writeln!(f, "Price: ${:.2}", self.price)?;
        writeln!(f, "Location: {}", self.shelf_location.as_deref().unwrap_or(""))?;
        writeln!(
            f,
            "Status: {}",
            if self.is_available() { "Available" } else { "Not Available" }
        )?;
        write!(f, "========================================")
    }
}

/// Create book request
#[derive(Debug, Clone, Validate)]
pub struct CreateBook {
    #[validate(length(min = 10, max = 20, message = "ISBN must be 10-20 characters"))]
    pub isbn: String,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    pub author: String,
    pub publisher: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Publication year is out of range"))]
    pub publication_year: Option<i32>,
    pub category_id: i64,
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: i32,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    pub shelf_location: Option<String>,
}

/// Update book request; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author must not be empty"))]
    pub author: Option<String>,
    pub publisher: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Publication year is out of range"))]
    pub publication_year: Option<i32>,
    pub category_id: Option<i64>,
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: Option<i32>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    pub shelf_location: Option<String>,
}
