//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. A failed build always surfaces as
//! either [`ErrorKind::Open`] (the snapshot could not be used at all) or
//! [`ErrorKind::Loader`] (one table loader failed), with the underlying cause
//! attached beneath it in the error tree.

use derive_more::{Display, Error};
use exn::ResultExt;
use std::path::PathBuf;

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every kind is fatal to the build it occurs in. Malformed repository URLs
/// are not errors: they are logged and skipped by the repository
/// loader instead.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The snapshot file is missing, unreadable, not SQLite, or lacks a
    /// required table.
    #[display("unable to open snapshot: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// A table the loaders depend on does not exist in the snapshot.
    #[display("snapshot is missing table: {_0}")]
    IncompatibleSchema(#[error(not(source))] String),
    /// A statement against the named table failed.
    #[display("query failed on table: {_0}")]
    Query(#[error(not(source))] &'static str),
    /// A row from the named table did not match the expected projection.
    #[display("unable to decode row from table: {_0}")]
    RowDecode(#[error(not(source))] &'static str),
    /// A relation that must contain exactly one row is empty.
    #[display("required table is empty: {_0}")]
    EmptyTable(#[error(not(source))] &'static str),
    /// A relation that must contain exactly one row contains several.
    #[display("expected a single row in table: {_0}")]
    TooManyRows(#[error(not(source))] &'static str),
    /// A unique key (or the value side of a bidirectional map) repeats.
    #[display("duplicate key in {index}: {key}")]
    DuplicateKey { index: &'static str, key: String },
    /// A `module:stream` value is missing its separator.
    #[display("malformed module stream: {_0:?}")]
    MalformedModuleStream(#[error(not(source))] String),
    /// The named table loader failed; the cause is attached as a child.
    #[display("loader failed: {_0}")]
    Loader(#[error(not(source))] &'static str),
    /// A loader task could not be admitted or joined.
    #[display("loader task did not complete")]
    Coordinator,
    /// No fragment was produced for the named cache index.
    #[display("index was never loaded: {_0}")]
    MissingIndex(#[error(not(source))] &'static str),
    /// Two fragments were produced for the named cache index.
    #[display("index was loaded twice: {_0}")]
    DuplicateIndex(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Only a failure to open the snapshot is worth retrying (for example,
    /// when the file is being swapped in by a refresh). Everything else is
    /// a property of the snapshot's contents.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Classify a driver error raised while working with `table`.
    fn from_sqlx(err: &sqlx::Error, table: &'static str) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. } => Self::RowDecode(table),
            _ => Self::Query(table),
        }
    }
}

/// Attach the right [`ErrorKind`] to a driver error.
pub(crate) trait SqlxResultExt<T> {
    fn or_classify(self, table: &'static str) -> Result<T>;
}

impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn or_classify(self, table: &'static str) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let kind = ErrorKind::from_sqlx(&err, table);
                Err(err).or_raise(|| kind)
            },
        }
    }
}
