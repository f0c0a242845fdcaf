//! Error type shared by the object model, the reader and the writer.

use std::cell::RefCell;

use crate::schema::ValueType;

/// Errors that can occur while building, reading or writing SO documents
#[derive(Debug, thiserror::Error)]
pub enum SoError {
    /// A buffer could not be grown
    #[error("Memory allocation failed while growing {what}")]
    Allocation {
        /// Which buffer was being grown
        what: &'static str,
    },

    /// A value was appended to a column of a different value type
    #[error("Type mismatch in column '{column}': column holds {expected}, got {found}")]
    TypeMismatch {
        /// Column identifier
        column: String,
        /// Declared value type of the column
        expected: ValueType,
        /// Value type implied by the call or element
        found: ValueType,
    },

    /// The document is not well-formed or does not have the expected shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Error from the XML tokenizer or writer
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading or writing a delimited external file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// UTF-8 encoding error in names or text content
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Index outside the valid range of a table or matrix
    #[error("{what} index {index} out of range (size {len})")]
    IndexOutOfRange {
        /// What was being indexed
        what: &'static str,
        /// Requested index
        index: usize,
        /// Current size
        len: usize,
    },

    /// `Matrix::set_size` was called on a matrix that already has a size
    #[error("Matrix has already been sized; resizing is not supported")]
    MatrixAlreadySized,

    /// A column with the same columnId already exists in the table
    #[error("Duplicate columnId: {0}")]
    DuplicateColumn(String),

    /// Column data does not have the table's row count
    #[error("Column '{column}' has {found} rows, table has {expected}")]
    RowCountMismatch {
        /// Column identifier
        column: String,
        /// Row count of the table
        expected: usize,
        /// Length of the supplied data
        found: usize,
    },

    /// The requested element is not allowed at this place in an SO document
    #[error("Invalid SO structure: {0}")]
    InvalidStructure(String),

    /// A finished temp file could not be moved to its destination
    #[error("Failed to persist {path}: {source}")]
    Persist {
        /// Destination path
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl From<quick_xml::events::attributes::AttrError> for SoError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        SoError::Xml(quick_xml::Error::from(e))
    }
}

impl From<tempfile::PersistError> for SoError {
    fn from(e: tempfile::PersistError) -> Self {
        SoError::Persist {
            path: e.file.path().display().to_string(),
            source: e.error,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SoError>;

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Message of the most recent failed document read or write on this thread.
///
/// Kept for callers that were written against a "get last error" interface;
/// new code should use the `Result` returned by each call instead.
pub fn last_error() -> Option<String> {
    LAST_ERROR.with(|e| e.borrow().clone())
}

pub(crate) fn record_error<T>(result: Result<T>) -> Result<T> {
    if let Err(ref e) = result {
        let message = e.to_string();
        LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
    }
    result
}
