//! Fixed-width table rendering for list screens

use crate::models::{Book, CurrentBorrowing, Fine, Member};

/// Cut `text` to fit a column of `width` characters, leaving one space of
/// padding.
pub fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width.saturating_sub(1)).collect()
}

pub fn books_table(books: &[Book]) -> String {
    let mut out = format!(
        "{:<5}{:<18}{:<30}{:<20}{:<15}{:<10}\n{}\n",
        "ID",
        "ISBN",
        "Title",
        "Author",
        "Category",
        "Available",
        "-".repeat(98)
    );
    for book in books {
        out.push_str(&format!(
            "{:<5}{:<18}{:<30}{:<20}{:<15}{:<10}\n",
            book.book_id,
            truncate(&book.isbn, 18),
            truncate(&book.title, 30),
            truncate(&book.author, 20),
            truncate(&book.category_name, 15),
            format!("{}/{}", book.available_copies, book.total_copies)
        ));
    }
    out
}

pub fn members_table(members: &[Member]) -> String {
    let mut out = format!(
        "{:<5}{:<25}{:<30}{:<15}\n{}\n",
        "ID",
        "Name",
        "Email",
        "Status",
        "-".repeat(75)
    );
    for member in members {
        out.push_str(&format!(
            "{:<5}{:<25}{:<30}{:<15}\n",
            member.member_id,
            truncate(&member.full_name(), 25),
            truncate(&member.email, 30),
            member.membership_status.as_str()
        ));
    }
    out
}

pub fn current_borrowings_table(borrowings: &[CurrentBorrowing]) -> String {
    let mut out = format!(
        "{:<5}{:<25}{:<30}{:<12}{:<8}{:<10}\n{}\n",
        "ID",
        "Member",
        "Book",
        "Due Date",
        "Late",
        "Status",
        "-".repeat(90)
    );
    for borrowing in borrowings {
        out.push_str(&format!(
            "{:<5}{:<25}{:<30}{:<12}{:<8}{:<10}\n",
            borrowing.borrowing_id,
            truncate(&borrowing.member_name, 25),
            truncate(&borrowing.book_title, 30),
            borrowing.due_date.to_string(),
            borrowing.days_overdue,
            borrowing.status.as_str()
        ));
    }
    out
}

pub fn fines_table(fines: &[Fine]) -> String {
    let mut out = format!(
        "{:<5}{:<25}{:<30}{:<8}{:<10}{:<8}\n{}\n",
        "ID",
        "Member",
        "Book",
        "Days",
        "Amount",
        "Status",
        "-".repeat(86)
    );
    for fine in fines {
        out.push_str(&format!(
            "{:<5}{:<25}{:<30}{:<8}{:<10}{:<8}\n",
            fine.fine_id,
            truncate(&fine.member_name, 25),
            truncate(&fine.book_title, 30),
            fine.days_overdue,
            format!("${:.2}", fine.amount),
            fine.status.as_str()
        ));
    }
    out
}
