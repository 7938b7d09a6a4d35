//! Library Management System
//!
//! An interactive console over a relational library catalog: books,
//! categories, members, staff, borrowings, reservations and fines. All
//! database access goes through [`Repository`].

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod shell;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
pub use repository::Repository;
