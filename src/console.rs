//! Interactive console session
//!
//! Collects input with re-prompting loops and hands validated values to a
//! [`BookStorage`]. Input and output are generic so sessions can be driven
//! from tests without a terminal.

use log::{debug, error, info};
use std::io::{self, BufRead, Write};

use crate::record::{BookRecord, NewBook};
use crate::store::{BookStorage, Removal, StorageError};
use crate::validate::{
    is_confirmation, parse_record_id, validate_author, validate_date, validate_title, ValidationError,
};

const MENU: &str = "\
Book Log
1. Add a book
2. Delete a book
3. View all books
4. Search by title
5. Search by author
6. Search by date
7. Exit";

const TITLE_HINT: &str = "Enter a Book Title.\n\
    Must only use A(a)-Z(z). Can include spaces.\n\
    Must be 200 characters or less.";

const AUTHOR_HINT: &str = "Enter an Author's name.\n\
    Must only use A(a)-Z(z). Can include spaces.\n\
    Must be less than 100 characters.";

const DATE_HINT: &str = "Enter the date the book was completed.\n\
    Must be in the following format: MM/DD/YYYY.";

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Delete,
    ViewAll,
    SearchTitle,
    SearchAuthor,
    SearchDate,
    Exit,
}

impl Command {
    /// Map a menu selection to a command
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Command::Add),
            "2" => Some(Command::Delete),
            "3" => Some(Command::ViewAll),
            "4" => Some(Command::SearchTitle),
            "5" => Some(Command::SearchAuthor),
            "6" => Some(Command::SearchDate),
            "7" => Some(Command::Exit),
            _ => None,
        }
    }
}

/// Whether the session keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One interactive run of the book log
pub struct Session<'a, R, W> {
    store: &'a dyn BookStorage,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(store: &'a dyn BookStorage, input: R, output: W) -> Self {
        Self { store, input, output }
    }

    /// Give back the output sink, e.g. to inspect what a test session printed
    pub fn into_output(self) -> W {
        self.output
    }

    /// Show the menu and run commands until Exit or end of input
    pub fn run(&mut self) -> io::Result<()> {
        match self.store.count() {
            Ok(count) => info!("Session started with {} books on record", count),
            Err(e) => self.report(&e)?,
        }

        loop {
            writeln!(self.output, "\n{}", MENU)?;
            let Some(choice) = self.ask("Your input: ")? else {
                break;
            };
            let Some(command) = Command::from_choice(&choice) else {
                debug!("Ignoring menu input {:?}", choice);
                continue;
            };
            if self.execute(command)? == Flow::Quit {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        info!("Session ended");
        Ok(())
    }

    /// Run a single command
    fn execute(&mut self, command: Command) -> io::Result<Flow> {
        debug!("Executing {:?}", command);
        match command {
            Command::Add => self.add(),
            Command::Delete => self.delete(),
            Command::ViewAll => self.view_all(),
            Command::SearchTitle => {
                let Some(title) = self.prompt_valid(TITLE_HINT, "Book Title: ", validate_title)? else {
                    return Ok(Flow::Quit);
                };
                let found = self.store.search_by_title(&title);
                self.show_matches(found, &format!("the Book Title {}", title))
            }
            Command::SearchAuthor => {
                let Some(author) = self.prompt_valid(AUTHOR_HINT, "Author Name: ", validate_author)? else {
                    return Ok(Flow::Quit);
                };
                let found = self.store.search_by_author(&author);
                self.show_matches(found, &format!("the Author Name {}", author))
            }
            Command::SearchDate => {
                let Some(date) = self.prompt_valid(DATE_HINT, "Date Completed: ", validate_date)? else {
                    return Ok(Flow::Quit);
                };
                let found = self.store.search_by_date(&date);
                self.show_matches(found, &format!("the Completion Date {}", date))
            }
            Command::Exit => Ok(Flow::Quit),
        }
    }

    fn add(&mut self) -> io::Result<Flow> {
        let Some(title) = self.prompt_valid(TITLE_HINT, "Book Title: ", validate_title)? else {
            return Ok(Flow::Quit);
        };
        let Some(author) = self.prompt_valid(AUTHOR_HINT, "Author Name: ", validate_author)? else {
            return Ok(Flow::Quit);
        };
        let Some(date) = self.prompt_valid(DATE_HINT, "Date Completed: ", validate_date)? else {
            return Ok(Flow::Quit);
        };

        let book = NewBook { title, author, date };
        match self.store.add_record(&book) {
            Ok(_) => writeln!(self.output, "Book successfully added!\n{}", book)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "Enter a Book ID to delete.")?;
        writeln!(self.output, "Input a number and press ENTER to select an option.")?;
        let Some(id) = self.prompt_valid("", "Your input: ", parse_record_id)? else {
            return Ok(Flow::Quit);
        };

        let record = match self.store.find_by_id(id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                writeln!(self.output, "No records found with Book ID {}.", id)?;
                return Ok(Flow::Continue);
            }
            Err(e) => {
                self.report(&e)?;
                return Ok(Flow::Continue);
            }
        };

        writeln!(self.output, "Are you sure you want to delete this from your records?")?;
        writeln!(self.output, "{}", record)?;
        writeln!(self.output, "Type 'yes' to continue or press ENTER to cancel.")?;
        let Some(answer) = self.ask("Your input: ")? else {
            return Ok(Flow::Quit);
        };
        if !is_confirmation(&answer) {
            writeln!(self.output, "Canceling delete request.")?;
            return Ok(Flow::Continue);
        }

        match self.store.remove(id) {
            Ok(Removal::Removed) => writeln!(self.output, "Book successfully deleted!")?,
            Ok(Removal::NotFound) => writeln!(self.output, "No records found with Book ID {}.", id)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn view_all(&mut self) -> io::Result<Flow> {
        match self.store.list_all() {
            Ok(books) if books.is_empty() => writeln!(self.output, "No books recorded yet.")?,
            Ok(books) => self.print_books(&books)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn show_matches(
        &mut self,
        found: Result<Vec<BookRecord>, StorageError>,
        criterion: &str,
    ) -> io::Result<Flow> {
        match found {
            Ok(books) if books.is_empty() => writeln!(self.output, "No results found with {}", criterion)?,
            Ok(books) => self.print_books(&books)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn print_books(&mut self, books: &[BookRecord]) -> io::Result<()> {
        for book in books {
            writeln!(self.output, "{}", book)?;
        }
        Ok(())
    }

    fn report(&mut self, err: &StorageError) -> io::Result<()> {
        error!("{}", err);
        let cause = std::error::Error::source(err)
            .map(|source| source.to_string())
            .unwrap_or_else(|| err.to_string());
        writeln!(self.output, "Error during {}: {}", err.operation(), cause)
    }

    /// Print `hint`, then ask for a value until `validate` accepts it.
    /// `None` means input ran out.
    fn prompt_valid<T>(
        &mut self,
        hint: &str,
        label: &str,
        validate: fn(&str) -> Result<T, ValidationError>,
    ) -> io::Result<Option<T>> {
        loop {
            if !hint.is_empty() {
                writeln!(self.output, "{}", hint)?;
            }
            let Some(line) = self.ask(label)? else {
                return Ok(None);
            };
            match validate(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => {
                    debug!("Rejected input {:?}: {}", line, e);
                    writeln!(self.output, "Invalid input: {}", e)?;
                }
            }
        }
    }

    /// Print a prompt and read one line without its line ending
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock_store::MockBookStore;
    use std::io::Cursor;

    fn run_session(store: &MockBookStore, input: &str) -> String {
        let mut session = Session::new(store, Cursor::new(input.as_bytes().to_vec()), Vec::new());
        session.run().unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn test_command_from_choice() {
        assert_eq!(Command::from_choice("1"), Some(Command::Add));
        assert_eq!(Command::from_choice(" 7 "), Some(Command::Exit));
        assert_eq!(Command::from_choice("8"), None);
        assert_eq!(Command::from_choice("add"), None);
    }

    #[test]
    fn test_add_reprompts_until_valid() {
        let store = MockBookStore::new();
        let output = run_session(&store, "1\ndune 2\ndune\nfrank herbert\n1965\n01/01/1965\n7\n");

        assert!(output.contains("Book successfully added!\nDune by Frank Herbert completed on 01/01/1965."));
        assert_eq!(output.matches("Invalid input").count(), 2);
        let books = store.list_all().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
    }

    #[test]
    fn test_unknown_menu_choice_shows_menu_again() {
        let store = MockBookStore::new();
        let output = run_session(&store, "9\n7\n");
        assert_eq!(output.matches("6. Search by date").count(), 2);
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let store = MockBookStore::new();
        let output = run_session(&store, "1\ndune\n");
        assert!(output.ends_with("Goodbye!\n"));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_crlf_line_endings() {
        let store = MockBookStore::new();
        run_session(&store, "1\r\ncirce\r\nmadeline miller\r\n02/02/2018\r\n7\r\n");
        let books = store.search_by_date("02/02/2018").unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author, "Madeline Miller");
    }
}
