//! Book record types

use std::fmt;

use crate::validate::{validate_author, validate_date, validate_title, ValidationError};

/// Record identifier type, assigned by the store
pub type RecordId = i64;

/// One completed book as stored in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    /// Primary key, never changes once assigned
    pub id: RecordId,
    /// Title-cased book title
    pub title: String,
    /// Title-cased author name
    pub author: String,
    /// Completion date, `MM/DD/YYYY` as entered
    pub date: String,
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} by {}, completed {}", self.id, self.title, self.author, self.date)
    }
}

/// A book waiting to be added to the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub date: String,
}

impl NewBook {
    /// Validate raw input and build a book ready for storage
    pub fn parse(title: &str, author: &str, date: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            title: validate_title(title)?,
            author: validate_author(author)?,
            date: validate_date(date)?,
        })
    }

    /// Attach the id assigned by the store
    pub fn into_record(self, id: RecordId) -> BookRecord {
        BookRecord {
            id,
            title: self.title,
            author: self.author,
            date: self.date,
        }
    }
}

impl fmt::Display for NewBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} completed on {}.", self.title, self.author, self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_parse() {
        let book = NewBook::parse("dune", "frank herbert", "01/01/1965").unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.date, "01/01/1965");

        assert!(NewBook::parse("dune", "frank herbert", "1965").is_err());
        assert!(NewBook::parse("dune 2", "frank herbert", "01/01/1965").is_err());
    }

    #[test]
    fn test_record_display() {
        let record = NewBook::parse("circe", "madeline miller", "02/02/2018")
            .unwrap()
            .into_record(3);
        assert_eq!(record.to_string(), "#3 Circe by Madeline Miller, completed 02/02/2018");
    }
}
