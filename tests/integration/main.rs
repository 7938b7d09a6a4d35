//! Integration tests against an in-memory SQLite catalog

mod borrowing_tests;
mod common;
mod membership_tests;
mod shell_tests;
