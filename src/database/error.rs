use error_stack::Report;
use thiserror::Error;

/// Record store related errors
#[derive(Debug, Error)]
pub enum Error {
    /// An error caused by an invalid Postgres connection url.
    #[error("invalid connection url")]
    InvalidUrl,
    /// An error caused by an [`sqlx`] error.
    #[error("received a pool error: {0}")]
    Internal(sqlx::Error),
    /// The database pool does not have reliable connection to
    /// transact to the database.
    #[error("unhealthy database pool")]
    UnhealthyPool,
    /// The write conflicts with an existing record over a
    /// column that must be unique.
    #[error("unique constraint violated")]
    UniqueViolation,
}

/// Converts from a generic [sqlx] result into a [database compatible error](Error).
pub trait ErrorExt<T> {
    fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
    fn into_db_error(self) -> Result<T> {
        self.map_err(|e| match &e {
            sqlx::Error::Database(err) if err.is_unique_violation() => {
                let constraint = err.constraint().map(ToString::to_string);
                let report = Report::new(e).change_context(Error::UniqueViolation);
                match constraint {
                    Some(constraint) => report.attach_printable(format!("constraint: {constraint}")),
                    None => report,
                }
            }
            _ => Report::new(Error::Internal(e)),
        })
    }
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a database error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

/// Checks the kind of [`Error`] inside of a report without matching
/// against it by hand.
pub trait ErrorExt2 {
    fn is_unhealthy(&self) -> bool;
    fn is_unique_violation(&self) -> bool;
}

impl ErrorExt2 for Report<Error> {
    fn is_unhealthy(&self) -> bool {
        matches!(self.current_context(), Error::UnhealthyPool)
    }

    fn is_unique_violation(&self) -> bool {
        matches!(self.current_context(), Error::UniqueViolation)
    }
}
