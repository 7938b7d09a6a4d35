//! Menu sessions driven through byte buffers

use library_console::{config::LibraryConfig, shell::Shell, Repository};

use crate::common::{add_book, gateway, seed};

async fn session(repository: Repository, script: &str) -> (Repository, String) {
    let mut shell = Shell::new(repository, LibraryConfig::default(), script.as_bytes(), Vec::new());
    shell.run().await.unwrap();
    let (repository, output) = shell.into_parts();
    (repository, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn test_catalog_setup_through_the_menu() {
    let repository = gateway().await;
    let script = "\
21\nScience Fiction\nSpeculative fiction\n\n\
4\n9780441013593\nDune\nFrank Herbert\n\n1965\n1\nthree\n3\n9.99\nSF-H-01\n\n\
1\n\n\
0\n";
    let (repository, out) = session(repository, script).await;

    assert!(out.contains("✓ Category added successfully!"));
    assert!(out.contains("1. Science Fiction"));
    assert!(out.contains("Invalid input. Please enter a number."));
    assert!(out.contains("✓ Book added successfully!"));
    assert!(out.contains("Total: 1 books"));

    let book = &repository.list_books().await.unwrap()[0];
    assert_eq!(book.title, "Dune");
    assert_eq!(book.publisher, None);
    assert_eq!((book.available_copies, book.total_copies), (3, 3));
}

#[tokio::test]
async fn test_borrow_and_return_through_the_menu() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780441013593", "Dune", 1).await;

    // Blank due date takes the suggested one
    let script = format!(
        "9\n{book}\n{member}\n{staff}\n\n\n\
         9\n{book}\n{member}\n{staff}\n2030-01-31\n\n\
         11\n\n\
         12\n1\n\n\
         12\n1\n\n\
         0\n",
        book = book_id,
        member = seed.member_id,
        staff = seed.staff_id
    );
    let (repository, out) = session(repository, &script).await;

    assert!(out.contains("✓ Borrowing created successfully! (Borrowing ID: 1)"));
    assert!(out.contains("✗ Failed to create borrowing: Not available"));
    assert!(out.contains("Total: 1 current borrowings"));
    assert!(out.contains("✓ Book returned successfully!"));
    assert!(out.contains("✗ Failed to return book: Borrowing 1 has already been returned"));

    let book = repository.get_book(book_id).await.unwrap();
    assert_eq!(book.available_copies, 1);
}

#[tokio::test]
async fn test_fines_default_rate_from_config() {
    let repository = gateway().await;
    let script = "16\n\n\n24\n\n0\n";
    let (_, out) = session(repository, script).await;

    assert!(out.contains("Daily Fine Rate (default 1.00): "));
    assert!(out.contains("✓ Calculated fines for 0 borrowings."));
    assert!(out.contains("No fines found."));
}

#[tokio::test]
async fn test_failures_are_reported_and_the_menu_continues() {
    let mut repository = gateway().await;
    repository.disconnect().await;
    let (_, out) = session(repository, "1\n\n17\n\n0\n").await;

    assert!(out.contains("✗ Failed to load books: Not connected to database"));
    assert!(out.contains("✗ Connection test failed: Not connected to database"));
    assert!(out.ends_with("Goodbye!\n"));
}

#[tokio::test]
async fn test_member_status_prompt_reprompts() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let script = format!("20\n{}\nbanned\nsuspended\n\n0\n", seed.member_id);
    let (repository, out) = session(repository, &script).await;

    assert!(out.contains("Invalid status. Try again."));
    assert!(out.contains("is now Suspended."));
    let member = repository.get_member(seed.member_id).await.unwrap();
    assert!(!member.is_active());
}
