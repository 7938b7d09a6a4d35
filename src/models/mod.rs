//! Data models for the library catalog

pub mod book;
pub mod borrowing;
pub mod category;
pub mod enums;
pub mod fine;
pub mod member;
pub mod reservation;
pub mod staff;

// Re-export commonly used types
pub use book::{Book, CreateBook, UpdateBook};
pub use borrowing::{Borrowing, CreateBorrowing, CurrentBorrowing};
pub use category::{Category, CategoryInput};
pub use enums::{BorrowingStatus, FineStatus, MembershipStatus, ReservationStatus};
pub use fine::Fine;
pub use member::{Member, MemberInput};
pub use reservation::Reservation;
pub use staff::{Staff, StaffInput};
