//! Error types for the course index and the catalog loader.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`CourseIndex`][crate::index::CourseIndex] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// The index uses [`DuplicatePolicy::Reject`][crate::index::DuplicatePolicy::Reject] and
    /// already holds a course with this id.
    #[error("duplicate course id: {0}")]
    DuplicateKey(String),
}

/// Reasons a single catalog row is skipped. None of these stop a load.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    /// A row needs at least an id and a title.
    #[error("expected an id and a title, found {0} field(s)")]
    TooFewFields(usize),

    /// A row has more prerequisite columns than a course can hold.
    #[error("expected at most {max} fields, found {found}")]
    TooManyFields {
        /// Fields found in the row.
        found: usize,
        /// Most fields a row may have.
        max: usize,
    },

    /// The id column is blank.
    #[error("missing course id")]
    EmptyId,

    /// The title column is blank.
    #[error("missing title for {0}")]
    EmptyTitle(String),

    /// A prerequisite column is blank but a later one isn't.
    #[error("blank prerequisite before a later one for {0}")]
    PrerequisiteGap(String),

    /// A quoted field never closes.
    #[error("unterminated quoted field")]
    UnterminatedQuote,

    /// The row isn't UTF-8. Holds how many leading bytes were.
    #[error("row is not valid UTF-8 after byte {0}")]
    InvalidUtf8(usize),

    /// The index refused the course.
    #[error(transparent)]
    Rejected(#[from] IndexError),
}

/// Errors that stop a catalog load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The catalog file couldn't be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// The path we tried to open.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// Reading from the catalog failed part way through.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
