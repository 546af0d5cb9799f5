//! `bookshelf-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod book;
pub mod error;
pub mod id;

pub use book::{Book, BookUpdate, NewBook};
pub use error::{DomainError, DomainResult};
pub use id::{BookId, UserId};
