pub mod configs;
pub mod item;
pub mod library;

pub use item::{Author, Book, ItemError, Loan, Member};
pub use library::{Library, LibrarySummary, LoanError};
