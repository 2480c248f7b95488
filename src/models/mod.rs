//! Data models for the LibCat server

pub mod author;
pub mod book;
pub mod genre;
pub mod instance;
pub mod language;
pub mod user;

pub use author::Author;
pub use book::Book;
pub use genre::Genre;
pub use instance::{BookInstance, LoanStatus};
pub use language::Language;
pub use user::User;
