use error_stack::Report;
use thiserror::Error;

use crate::database::{self, ErrorExt2};
use crate::validation::ValidationError;

pub mod author;
pub mod post;

pub use self::author::{Author, AuthorChanges, NewAuthor};
pub use self::post::{Category, NewPost, Post, PostChanges};

/// Errors from creating, changing or looking up records.
#[derive(Debug, Error)]
pub enum Error {
    /// One of the assigned values did not pass its validator.
    #[error(transparent)]
    Invalid(ValidationError),
    /// The record store failed to carry out the operation.
    #[error("could not access the record store")]
    Store,
}

impl Error {
    #[must_use]
    pub const fn invalid(error: ValidationError) -> Self {
        Self::Invalid(error)
    }
}

pub type Result<T> = error_stack::Result<T, Error>;

pub trait ErrorExt {
    /// Gets the validation failure behind this report, if there's any.
    fn validation_error(&self) -> Option<&ValidationError>;
}

impl ErrorExt for Report<Error> {
    fn validation_error(&self) -> Option<&ValidationError> {
        match self.current_context() {
            Error::Invalid(error) => Some(error),
            Error::Store => None,
        }
    }
}

/// Turns a store failure into a model error. A unique violation is
/// reported as `conflict` since it can only come from one column.
fn from_store(report: Report<database::Error>, conflict: Option<ValidationError>) -> Report<Error> {
    match conflict {
        Some(error) if report.is_unique_violation() => report.change_context(Error::invalid(error)),
        _ => report.change_context(Error::Store),
    }
}
