//! Interactive menu over the repository
//!
//! The shell is generic over its reader and writer so tests can drive it
//! with byte buffers. Repository failures are printed and the menu carries
//! on; only I/O errors end the session.

pub mod display;
pub mod prompt;

use std::io::{self, BufRead, Write};

use chrono::{Days, Utc};

use crate::{
    config::LibraryConfig,
    error::AppResult,
    models::{CategoryInput, CreateBook, CreateBorrowing, MemberInput, MembershipStatus, StaffInput},
    repository::Repository,
};
use prompt::{Console, INVALID_NUMBER};

pub const BANNER: &str = "\
╔═════════════════════════════════════════════╗
║      LIBRARY MANAGEMENT SYSTEM - SQLITE     ║
╚═════════════════════════════════════════════╝
";

const MENU: &str = "
╔════════════════════════════════════════╗
║    LIBRARY MANAGEMENT SYSTEM - MENU    ║
╚════════════════════════════════════════╝
1.  Display All Books
2.  Display Available Books
3.  Search Books by Title
4.  Add New Book
5.  Display All Members
6.  Add New Member
7.  Display All Staff
8.  Display All Categories
9.  Create Borrowing
10. Display All Borrowings
11. Display Current Borrowings
12. Return Book
13. Create Reservation
14. Display All Reservations
15. Update Overdue Books
16. Calculate Overdue Fines
17. Test Connection
18. Display Member Borrowings
19. Cancel Reservation
20. Update Member Status
21. Add New Category
22. Add New Staff Member
23. Delete Book
24. Display All Fines
0.  Exit
════════════════════════════════════════
";

const GOODBYE: &str = "\nExiting... Goodbye!";

pub struct Shell<R, W> {
    repository: Repository,
    library: LibraryConfig,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(repository: Repository, library: LibraryConfig, input: R, output: W) -> Self {
        Self {
            repository,
            library,
            console: Console::new(input, output),
        }
    }

    /// Hand back the repository (to disconnect it) and the writer
    pub fn into_parts(self) -> (Repository, W) {
        (self.repository, self.console.into_output())
    }

    /// Run the menu loop until the user picks 0 or input ends
    pub async fn run(&mut self) -> io::Result<()> {
        match self.menu_loop().await {
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::info!("Input closed, leaving the menu");
                writeln!(self.out(), "{}", GOODBYE)
            }
            other => other,
        }
    }

    async fn menu_loop(&mut self) -> io::Result<()> {
        loop {
            write!(self.out(), "{}", MENU)?;
            let Ok(choice) = self.console.line("Enter choice: ")?.trim().parse::<i64>() else {
                writeln!(self.out(), "{}", INVALID_NUMBER)?;
                continue;
            };

            if choice == 0 {
                return writeln!(self.out(), "{}", GOODBYE);
            }
            self.dispatch(choice).await?;
            self.console.pause()?;
        }
    }

    async fn dispatch(&mut self, choice: i64) -> io::Result<()> {
        match choice {
            1 => self.display_all_books().await,
            2 => self.display_available_books().await,
            3 => self.search_books().await,
            4 => self.add_new_book().await,
            5 => self.display_all_members().await,
            6 => self.add_new_member().await,
            7 => self.display_all_staff().await,
            8 => self.display_all_categories().await,
            9 => self.create_borrowing().await,
            10 => self.display_all_borrowings().await,
            11 => self.display_current_borrowings().await,
            12 => self.return_book().await,
            13 => self.create_reservation().await,
            14 => self.display_all_reservations().await,
            15 => self.update_overdue_books().await,
            16 => self.calculate_overdue_fines().await,
            17 => self.test_connection().await,
            18 => self.display_member_borrowings().await,
            19 => self.cancel_reservation().await,
            20 => self.update_member_status().await,
            21 => self.add_new_category().await,
            22 => self.add_new_staff().await,
            23 => self.delete_book().await,
            24 => self.display_all_fines().await,
            _ => writeln!(self.out(), "Invalid choice. Try again."),
        }
    }

    fn out(&mut self) -> &mut W {
        &mut self.console.output
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out(), "\n=== {} ===", title)
    }

    /// Print `✓ message` or `✗ failure: error`
    fn report(&mut self, result: AppResult<String>, failure: &str) -> io::Result<()> {
        match result {
            Ok(message) => writeln!(self.out(), "✓ {}", message),
            Err(e) => writeln!(self.out(), "✗ {}: {}", failure, e),
        }
    }

    /// Print a loaded list with `render`, or the empty/failure line, then
    /// the total.
    fn listing<T>(
        &mut self,
        result: AppResult<Vec<T>>,
        noun: &str,
        empty: &str,
        render: impl FnOnce(&[T]) -> String,
    ) -> io::Result<()> {
        match result {
            Err(e) => writeln!(self.out(), "✗ Failed to load {}: {}", noun, e),
            Ok(items) if items.is_empty() => writeln!(self.out(), "{}", empty),
            Ok(items) => {
                write!(self.out(), "{}", render(&items))?;
                writeln!(self.out(), "\nTotal: {} {}", items.len(), noun)
            }
        }
    }

    async fn display_all_books(&mut self) -> io::Result<()> {
        self.heading("ALL BOOKS")?;
        let books = self.repository.list_books().await;
        self.listing(books, "books", "No books found.", display::books_table)
    }

    async fn display_available_books(&mut self) -> io::Result<()> {
        self.heading("AVAILABLE BOOKS")?;
        let books = self.repository.list_available_books().await;
        self.listing(books, "available books", "No available books.", records)
    }

    async fn search_books(&mut self) -> io::Result<()> {
        let title = self.console.line("Enter book title to search: ")?;
        self.heading("SEARCH RESULTS")?;
        let books = self.repository.search_books_by_title(&title).await;
        let empty = format!("No books found matching: {}", title);
        self.listing(books, "books found", &empty, records)
    }

    async fn add_new_book(&mut self) -> io::Result<()> {
        self.heading("ADD NEW BOOK")?;
        let categories = match self.repository.list_categories().await {
            Ok(categories) => categories,
            Err(e) => return writeln!(self.out(), "✗ Failed to load categories: {}", e),
        };
        if categories.is_empty() {
            return writeln!(self.out(), "No categories available. Please add categories first.");
        }

        writeln!(self.out(), "Available Categories:")?;
        for category in &categories {
            writeln!(self.out(), "{}. {}", category.category_id, category.category_name)?;
        }

        let data = CreateBook {
            isbn: self.console.line("ISBN: ")?.trim().to_string(),
            title: self.console.line("Title: ")?.trim().to_string(),
            author: self.console.line("Author: ")?.trim().to_string(),
            publisher: self.console.optional_line("Publisher: ")?,
            publication_year: Some(self.console.small_integer("Publication Year: ")?),
            category_id: self.console.integer("Category ID: ")?,
            total_copies: self.console.small_integer("Total Copies: ")?,
            price: self.console.decimal("Price: ")?,
            shelf_location: self.console.optional_line("Shelf Location: ")?,
        };

        let result = self
            .repository
            .create_book(&data)
            .await
            .map(|id| format!("Book added successfully! (Book ID: {})", id));
        self.report(result, "Failed to add book")
    }

    async fn display_all_members(&mut self) -> io::Result<()> {
        self.heading("ALL MEMBERS")?;
        let members = self.repository.list_members().await;
        self.listing(members, "members", "No members found.", display::members_table)
    }

    async fn add_new_member(&mut self) -> io::Result<()> {
        self.heading("ADD NEW MEMBER")?;
        let data = MemberInput {
            first_name: self.console.line("First Name: ")?.trim().to_string(),
            last_name: self.console.line("Last Name: ")?.trim().to_string(),
            email: self.console.line("Email: ")?.trim().to_string(),
            phone: self.console.optional_line("Phone: ")?,
            address: self.console.optional_line("Address: ")?,
        };

        let result = self
            .repository
            .create_member(&data)
            .await
            .map(|id| format!("Member added successfully! (Member ID: {})", id));
        self.report(result, "Failed to add member")
    }

    async fn display_all_staff(&mut self) -> io::Result<()> {
        self.heading("ALL STAFF")?;
        let staff = self.repository.list_staff().await;
        self.listing(staff, "staff members", "No staff found.", records)
    }

    async fn display_all_categories(&mut self) -> io::Result<()> {
        self.heading("ALL CATEGORIES")?;
        let categories = self.repository.list_categories().await;
        self.listing(categories, "categories", "No categories found.", records)
    }

    async fn create_borrowing(&mut self) -> io::Result<()> {
        self.heading("CREATE BORROWING")?;
        let book_id = self.console.integer("Book ID: ")?;
        let member_id = self.console.integer("Member ID: ")?;
        let staff_id = self.console.integer("Staff ID: ")?;

        let today = Utc::now().date_naive();
        let suggested = u64::try_from(self.library.loan_period_days)
            .ok()
            .and_then(|days| today.checked_add_days(Days::new(days)))
            .unwrap_or(today);
        let due_date = self
            .console
            .date_or_default(&format!("Due Date (YYYY-MM-DD) [{}]: ", suggested), suggested)?;

        let data = CreateBorrowing {
            book_id,
            member_id,
            staff_id,
            due_date,
        };
        let result = self
            .repository
            .create_borrowing(&data)
            .await
            .map(|id| format!("Borrowing created successfully! (Borrowing ID: {})", id));
        self.report(result, "Failed to create borrowing")
    }

    async fn display_all_borrowings(&mut self) -> io::Result<()> {
        self.heading("ALL BORROWINGS")?;
        let borrowings = self.repository.list_borrowings().await;
        self.listing(borrowings, "borrowings", "No borrowings found.", records)
    }

    async fn display_current_borrowings(&mut self) -> io::Result<()> {
        self.heading("CURRENT BORROWINGS")?;
        let borrowings = self.repository.list_current_borrowings().await;
        self.listing(
            borrowings,
            "current borrowings",
            "No current borrowings.",
            display::current_borrowings_table,
        )
    }

    async fn return_book(&mut self) -> io::Result<()> {
        self.heading("RETURN BOOK")?;
        let borrowing_id = self.console.integer("Borrowing ID: ")?;
        let result = self
            .repository
            .return_book(borrowing_id)
            .await
            .map(|()| "Book returned successfully!".to_string());
        self.report(result, "Failed to return book")
    }

    async fn create_reservation(&mut self) -> io::Result<()> {
        self.heading("CREATE RESERVATION")?;
        let book_id = self.console.integer("Book ID: ")?;
        let member_id = self.console.integer("Member ID: ")?;
        let result = self
            .repository
            .create_reservation(book_id, member_id)
            .await
            .map(|id| format!("Reservation created successfully! (Reservation ID: {})", id));
        self.report(result, "Failed to create reservation")
    }

    async fn display_all_reservations(&mut self) -> io::Result<()> {
        self.heading("ALL RESERVATIONS")?;
        let reservations = self.repository.list_reservations().await;
        self.listing(reservations, "reservations", "No reservations found.", records)
    }

    async fn update_overdue_books(&mut self) -> io::Result<()> {
        self.heading("UPDATE OVERDUE BOOKS")?;
        let result = self
            .repository
            .update_overdue_books()
            .await
            .map(|count| format!("Updated {} overdue books.", count));
        self.report(result, "Failed to update overdue books")
    }

    async fn calculate_overdue_fines(&mut self) -> io::Result<()> {
        self.heading("CALCULATE OVERDUE FINES")?;
        let default_rate = self.library.default_daily_fine_rate;
        let daily_rate = self.console.decimal_or_default(
            &format!("Daily Fine Rate (default {:.2}): ", default_rate),
            default_rate,
        )?;
        let result = self
            .repository
            .calculate_overdue_fines(daily_rate)
            .await
            .map(|count| format!("Calculated fines for {} borrowings.", count));
        self.report(result, "Failed to calculate fines")
    }

    async fn test_connection(&mut self) -> io::Result<()> {
        self.heading("TEST CONNECTION")?;
        let result = self
            .repository
            .test_connection()
            .await
            .map(|()| "Connection is active and working!".to_string());
        self.report(result, "Connection test failed")
    }

    async fn display_member_borrowings(&mut self) -> io::Result<()> {
        self.heading("MEMBER BORROWINGS")?;
        let member_id = self.console.integer("Member ID: ")?;
        let borrowings = self.repository.list_member_borrowings(member_id).await;
        self.listing(
            borrowings,
            "borrowings",
            "No borrowings found for this member.",
            records,
        )
    }

    async fn cancel_reservation(&mut self) -> io::Result<()> {
        self.heading("CANCEL RESERVATION")?;
        let reservation_id = self.console.integer("Reservation ID: ")?;
        let result = self
            .repository
            .cancel_reservation(reservation_id)
            .await
            .map(|()| "Reservation cancelled.".to_string());
        self.report(result, "Failed to cancel reservation")
    }

    async fn update_member_status(&mut self) -> io::Result<()> {
        self.heading("UPDATE MEMBER STATUS")?;
        let member_id = self.console.integer("Member ID: ")?;
        let status = loop {
            let raw = self
                .console
                .line("New Status (Active/Inactive/Suspended): ")?;
            match MembershipStatus::parse(&raw) {
                Some(status) => break status,
                None => writeln!(self.out(), "Invalid status. Try again.")?,
            }
        };

        let result = self
            .repository
            .update_member_status(member_id, status)
            .await
            .map(|()| format!("Member {} is now {}.", member_id, status));
        self.report(result, "Failed to update member status")
    }

    async fn add_new_category(&mut self) -> io::Result<()> {
        self.heading("ADD NEW CATEGORY")?;
        let data = CategoryInput {
            name: self.console.line("Category Name: ")?.trim().to_string(),
            description: self.console.optional_line("Description: ")?,
        };
        let result = self
            .repository
            .create_category(&data)
            .await
            .map(|id| format!("Category added successfully! (Category ID: {})", id));
        self.report(result, "Failed to add category")
    }

    async fn add_new_staff(&mut self) -> io::Result<()> {
        self.heading("ADD NEW STAFF MEMBER")?;
        let data = StaffInput {
            first_name: self.console.line("First Name: ")?.trim().to_string(),
            last_name: self.console.line("Last Name: ")?.trim().to_string(),
            email: self.console.line("Email: ")?.trim().to_string(),
            phone: self.console.optional_line("Phone: ")?,
            position: self.console.optional_line("Position: ")?,
            salary: self.console.decimal("Salary: ")?,
        };
        let result = self
            .repository
            .create_staff(&data)
            .await
            .map(|id| format!("Staff member added successfully! (Staff ID: {})", id));
        self.report(result, "Failed to add staff member")
    }

    async fn delete_book(&mut self) -> io::Result<()> {
        self.heading("DELETE BOOK")?;
        let book_id = self.console.integer("Book ID: ")?;
        let result = self
            .repository
            .delete_book(book_id)
            .await
            .map(|()| format!("Book {} deleted.", book_id));
        self.report(result, "Failed to delete book")
    }

    async fn display_all_fines(&mut self) -> io::Result<()> {
        self.heading("ALL FINES")?;
        let fines = self.repository.list_fines().await;
        self.listing(fines, "fines", "No fines found.", display::fines_table)
    }
}

/// Each record's `Display` form on its own line(s)
fn records<T: std::fmt::Display>(items: &[T]) -> String {
    items.iter().map(|item| format!("{}\n", item)).collect()
}
