//! SQLite implementation of the BookStorage trait

use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::path::Path;

use crate::record::{BookRecord, NewBook, RecordId};
use crate::store::{BookStorage, Removal, StorageError};

const SELECT_BOOKS: &str = "SELECT book_id, title, author, date FROM books";

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<BookRecord> {
    Ok(BookRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        date: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

/// Book store backed by a single SQLite file
pub struct SQLiteBookStore {
    conn: Connection,
}

impl SQLiteBookStore {
    /// Open (creating if absent) the database at `path` and ensure the schema exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                operation: "open",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path).map_err(StorageError::sqlite("open"))?;
        info!("Opened book log database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::sqlite("open"))?;
        debug!("Opened in-memory book log database");
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn query_books<P: Params>(
        &self,
        operation: &'static str,
        sql: &str,
        params: P,
    ) -> Result<Vec<BookRecord>, StorageError> {
        debug!("{}: {}", operation, sql);
        let mut stmt = self.conn.prepare(sql).map_err(StorageError::sqlite(operation))?;
        let rows = stmt
            .query_map(params, book_from_row)
            .map_err(StorageError::sqlite(operation))?;

        let mut books = Vec::new();
        for row in rows {
            books.push(row.map_err(StorageError::sqlite(operation))?);
        }
        Ok(books)
    }
}

impl BookStorage for SQLiteBookStore {
    fn initialize(&self) -> Result<(), StorageError> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS books (
                    book_id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    author TEXT NOT NULL,
                    date TEXT
                )",
                [],
            )
            .map_err(StorageError::sqlite("initialize"))?;
        Ok(())
    }

    fn add_record(&self, book: &NewBook) -> Result<BookRecord, StorageError> {
        self.conn
            .execute(
                "INSERT INTO books (title, author, date) VALUES (?1, ?2, ?3)",
                params![book.title, book.author, book.date],
            )
            .map_err(StorageError::sqlite("add_record"))?;

        let id = self.conn.last_insert_rowid();
        info!("Added book {} ({})", id, book.title);
        Ok(book.clone().into_record(id))
    }

    fn find_by_id(&self, id: RecordId) -> Result<Option<BookRecord>, StorageError> {
        self.conn
            .query_row(
                &format!("{SELECT_BOOKS} WHERE book_id = ?1"),
                params![id],
                book_from_row,
            )
            .optional()
            .map_err(StorageError::sqlite("find_by_id"))
    }

    fn remove(&self, id: RecordId) -> Result<Removal, StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM books WHERE book_id = ?1", params![id])
            .map_err(StorageError::sqlite("remove"))?;

        if deleted == 0 {
            debug!("remove: no book with id {}", id);
            Ok(Removal::NotFound)
        } else {
            info!("Removed book {}", id);
            Ok(Removal::Removed)
        }
    }

    fn list_all(&self) -> Result<Vec<BookRecord>, StorageError> {
        self.query_books(
            "list_all",
            &format!("{SELECT_BOOKS} ORDER BY title DESC, book_id"),
            [],
        )
    }

    fn search_by_title(&self, title: &str) -> Result<Vec<BookRecord>, StorageError> {
        self.query_books(
            "search_by_title",
            &format!("{SELECT_BOOKS} WHERE title = ?1 ORDER BY book_id"),
            params![title],
        )
    }

    fn search_by_author(&self, author: &str) -> Result<Vec<BookRecord>, StorageError> {
        self.query_books(
            "search_by_author",
            &format!("{SELECT_BOOKS} WHERE author = ?1 ORDER BY book_id"),
            params![author],
        )
    }

    fn search_by_date(&self, date: &str) -> Result<Vec<BookRecord>, StorageError> {
        self.query_books(
            "search_by_date",
            &format!("{SELECT_BOOKS} WHERE date = ?1 ORDER BY book_id"),
            params![date],
        )
    }

    fn count(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .map_err(StorageError::sqlite("count"))?;
        Ok(count as usize)
    }
}
