use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{create_writer, field, raw_field, read_records};
use crate::domain::loan::same_title;
use crate::ports::inventory::{Book, InventoryGateway, Result};

pub const HEADER: [&str; 2] = ["Titre", "Quantite"];

/// CSV implementation of InventoryGateway
///
/// Holds the book catalog file `Titre;Quantite` in memory and writes it back
/// on `save`. Title lookup is case-insensitive.
pub struct CsvInventory {
    path: PathBuf,
    books: Mutex<Vec<Book>>,
}

impl CsvInventory {
    /// Empty inventory that will be saved to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            books: Mutex::new(Vec::new()),
        }
    }

    /// Load the inventory file
    ///
    /// Records that are short or carry a non-numeric quantity are skipped
    /// with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut books = Vec::new();

        for record in read_records(&path)? {
            let parsed = raw_field(&record, 0).zip(field(&record, 1)).and_then(
                |(title, quantity)| {
                    quantity.parse::<u32>().ok().map(|available_quantity| Book {
                        title: title.to_string(),
                        available_quantity,
                    })
                },
            );

            match parsed {
                Some(book) => books.push(book),
                None => tracing::warn!(
                    "Skipping malformed book record at line {} in {}",
                    record
                        .position()
                        .map(|position| position.line())
                        .unwrap_or_default(),
                    path.display()
                ),
            }
        }

        tracing::info!("Loaded {} books from {}", books.len(), path.display());

        Ok(Self {
            path,
            books: Mutex::new(books),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a book (replacing the quantity of an existing title)
    pub fn upsert_book(&self, title: &str, available_quantity: u32) {
        let mut books = self.books.lock().unwrap();
        match books.iter_mut().find(|book| same_title(&book.title, title)) {
            Some(book) => book.available_quantity = available_quantity,
            None => books.push(Book {
                title: title.to_string(),
                available_quantity,
            }),
        }
    }

    /// Snapshot of all books
    pub fn books(&self) -> Vec<Book> {
        self.books.lock().unwrap().clone()
    }
}

impl InventoryGateway for CsvInventory {
    fn find_by_title(&self, title: &str) -> Option<Book> {
        self.books
            .lock()
            .unwrap()
            .iter()
            .find(|book| same_title(&book.title, title))
            .cloned()
    }

    fn quantity(&self, book: &Book) -> u32 {
        self.find_by_title(&book.title)
            .map(|book| book.available_quantity)
            .unwrap_or(0)
    }

    fn set_quantity(&self, book: &Book, quantity: u32) {
        let mut books = self.books.lock().unwrap();
        if let Some(entry) = books
            .iter_mut()
            .find(|entry| same_title(&entry.title, &book.title))
        {
            entry.available_quantity = quantity;
        }
    }

    /// Overwrite the inventory file
    fn save(&self) -> Result<()> {
        let books = self.books();
        let mut writer = create_writer(&self.path, &HEADER)?;
        for book in &books {
            writer.write_record([book.title.clone(), book.available_quantity.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }
}
