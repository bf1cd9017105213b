//! Book Storage Layer Abstraction
//!
//! This module defines the operations the book log needs from a record
//! store, so the console works the same against SQLite or the in-memory
//! mock used by tests.

pub mod sqlite_store;
pub mod mock_store;


use std::path::PathBuf;
use thiserror::Error;

use crate::record::{BookRecord, NewBook, RecordId};

/// Failure of a storage operation, tagged with the operation name
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{operation}: {source}")]
    Sqlite {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{operation}: {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn sqlite(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StorageError::Sqlite { operation, source }
    }

    /// Name of the store operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            StorageError::Sqlite { operation, .. } | StorageError::Io { operation, .. } => operation,
        }
    }
}

/// Outcome of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotFound,
}

/// Trait defining the book store interface
pub trait BookStorage {
    /// Ensure the backing table exists. Safe to call repeatedly.
    fn initialize(&self) -> Result<(), StorageError>;

    /// Insert a book and return it with its assigned id
    fn add_record(&self, book: &NewBook) -> Result<BookRecord, StorageError>;

    /// Look up a single record
    fn find_by_id(&self, id: RecordId) -> Result<Option<BookRecord>, StorageError>;

    /// Delete a record. Deleting a missing id changes nothing.
    fn remove(&self, id: RecordId) -> Result<Removal, StorageError>;

    /// All records, title descending
    fn list_all(&self) -> Result<Vec<BookRecord>, StorageError>;

    /// Records whose stored title equals `title` exactly
    fn search_by_title(&self, title: &str) -> Result<Vec<BookRecord>, StorageError>;

    /// Records whose stored author equals `author` exactly
    fn search_by_author(&self, author: &str) -> Result<Vec<BookRecord>, StorageError>;

    /// Records completed on exactly `date`
    fn search_by_date(&self, date: &str) -> Result<Vec<BookRecord>, StorageError>;

    /// Number of stored records
    fn count(&self) -> Result<usize, StorageError>;
}
