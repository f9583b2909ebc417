//! Abstract repository interface and error types.

pub mod board;
pub mod error;

pub use board::{BoardRepository, FullRepository};
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
