//! Seed helpers shared by the integration tests

use std::path::PathBuf;

use chrono::{Days, NaiveDate, Utc};
use library_console::{
    config::DatabaseConfig,
    models::{CategoryInput, CreateBook, CreateBorrowing, MemberInput, StaffInput},
    Repository,
};

pub struct Seed {
    pub category_id: i64,
    pub member_id: i64,
    pub staff_id: i64,
}

pub async fn gateway() -> Repository {
    Repository::connect_in_memory()
        .await
        .expect("in-memory database should open")
}

/// Database file under the temp dir, removed with its WAL files on drop
pub struct FileDatabase {
    path: PathBuf,
    pub url: String,
}

impl FileDatabase {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("library-console-{}-{}.db", name, std::process::id()));
        let url = format!("sqlite://{}", path.display());
        let database = Self { path, url };
        database.remove();
        database
    }

    /// A second, independent session on the same file
    pub async fn open(&self) -> Repository {
        let mut repository = Repository::new(DatabaseConfig::default());
        repository.connect(&self.url).await.unwrap();
        repository
    }

    fn remove(&self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

impl Drop for FileDatabase {
    fn drop(&mut self) {
        self.remove();
    }
}

/// One category, one active member and one staff member
pub async fn seed(repository: &Repository) -> Seed {
    let category_id = repository
        .create_category(&CategoryInput {
            name: "Science Fiction".to_string(),
            description: Some("Speculative fiction".to_string()),
        })
        .await
        .unwrap();
    let member_id = add_member(repository, "ada@example.org").await;
    let staff_id = repository
        .create_staff(&StaffInput {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@library.test".to_string(),
            phone: None,
            position: Some("Librarian".to_string()),
            salary: 42000.0,
        })
        .await
        .unwrap();

    Seed {
        category_id,
        member_id,
        staff_id,
    }
}

pub async fn add_member(repository: &Repository, email: &str) -> i64 {
    repository
        .create_member(&MemberInput {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: Some("555-0100".to_string()),
            address: None,
        })
        .await
        .unwrap()
}

pub fn new_book(category_id: i64, isbn: &str, title: &str, copies: i32) -> CreateBook {
    CreateBook {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author: "Frank Herbert".to_string(),
        publisher: Some("Chilton".to_string()),
        publication_year: Some(1965),
        category_id,
        total_copies: copies,
        price: 9.99,
        shelf_location: Some("SF-H-01".to_string()),
    }
}

pub async fn add_book(repository: &Repository, category_id: i64, isbn: &str, title: &str, copies: i32) -> i64 {
    repository
        .create_book(&new_book(category_id, isbn, title, copies))
        .await
        .unwrap()
}

/// `(available, total)` for a book
pub async fn copies(repository: &Repository, book_id: i64) -> (i32, i32) {
    let book = repository.get_book(book_id).await.unwrap();
    (book.available_copies, book.total_copies)
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_ago(days: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(days)).unwrap()
}

pub fn in_days(days: u64) -> NaiveDate {
    today().checked_add_days(Days::new(days)).unwrap()
}

pub fn borrowing(book_id: i64, seed: &Seed, due_date: NaiveDate) -> CreateBorrowing {
    CreateBorrowing {
        book_id,
        member_id: seed.member_id,
        staff_id: seed.staff_id,
        due_date,
    }
}
