//! Mock implementation of BookStorage trait for testing

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::record::{BookRecord, NewBook, RecordId};
use crate::store::{BookStorage, Removal, StorageError};

/// In-memory book store with the same ordering rules as the SQLite store
pub struct MockBookStore {
    books: RefCell<BTreeMap<RecordId, BookRecord>>,
}

impl MockBookStore {
    /// Create a new, empty mock store
    pub fn new() -> Self {
        Self {
            books: RefCell::new(BTreeMap::new()),
        }
    }

    /// Clear all data from the store (useful for test cleanup)
    pub fn clear(&self) {
        self.books.borrow_mut().clear();
    }

    fn filter<F>(&self, predicate: F) -> Vec<BookRecord>
    where
        F: Fn(&BookRecord) -> bool,
    {
        self.books
            .borrow()
            .values()
            .filter(|book| predicate(book))
            .cloned()
            .collect()
    }
}

impl Default for MockBookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookStorage for MockBookStore {
    fn initialize(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn add_record(&self, book: &NewBook) -> Result<BookRecord, StorageError> {
        let mut books = self.books.borrow_mut();
        // Same rule as an SQLite rowid: one past the current maximum
        let id = books.keys().next_back().map_or(1, |last| last + 1);
        let record = book.clone().into_record(id);
        books.insert(id, record.clone());
        Ok(record)
    }

    fn find_by_id(&self, id: RecordId) -> Result<Option<BookRecord>, StorageError> {
        Ok(self.books.borrow().get(&id).cloned())
    }

    fn remove(&self, id: RecordId) -> Result<Removal, StorageError> {
        match self.books.borrow_mut().remove(&id) {
            Some(_) => Ok(Removal::Removed),
            None => Ok(Removal::NotFound),
        }
    }

    fn list_all(&self) -> Result<Vec<BookRecord>, StorageError> {
        let mut books = self.filter(|_| true);
        books.sort_by(|a, b| b.title.cmp(&a.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    fn search_by_title(&self, title: &str) -> Result<Vec<BookRecord>, StorageError> {
        Ok(self.filter(|book| book.title == title))
    }

    fn search_by_author(&self, author: &str) -> Result<Vec<BookRecord>, StorageError> {
        Ok(self.filter(|book| book.author == author))
    }

    fn search_by_date(&self, date: &str) -> Result<Vec<BookRecord>, StorageError> {
        Ok(self.filter(|book| book.date == date))
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.books.borrow().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_store_ids_follow_maximum() {
        let store = MockBookStore::new();
        let book = NewBook::parse("emma", "jane austen", "03/03/1815").unwrap();

        let first = store.add_record(&book).unwrap();
        let second = store.add_record(&book).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        store.remove(first.id).unwrap();
        assert_eq!(store.add_record(&book).unwrap().id, 3);
    }

    #[test]
    fn test_mock_store_clear() {
        let store = MockBookStore::new();
        let book = NewBook::parse("emma", "jane austen", "03/03/1815").unwrap();
        store.add_record(&book).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        store.clear();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.list_all().unwrap().is_empty());
    }
}
