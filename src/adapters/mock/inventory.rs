use crate::domain::loan::same_title;
use crate::ports::inventory::{Book, InventoryGateway, Result};
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory implementation of InventoryGateway
///
/// Supports stateful testing: books can be registered with a quantity,
/// saves are counted, and saving can be made to fail.
pub struct Inventory {
    books: Mutex<Vec<Book>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(Vec::new()),
            saves: AtomicUsize::new(0),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Register a book for testing purposes
    pub fn add_book(&self, title: &str, available_quantity: u32) {
        self.books.lock().unwrap().push(Book {
            title: title.to_string(),
            available_quantity,
        });
    }

    /// Remove a book, simulating a catalog deletion
    pub fn remove_book(&self, title: &str) {
        self.books
            .lock()
            .unwrap()
            .retain(|book| !same_title(&book.title, title));
    }

    /// Current quantity of a registered book
    pub fn quantity_of(&self, title: &str) -> Option<u32> {
        self.find_by_title(title).map(|book| book.available_quantity)
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every subsequent save fail
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryGateway for Inventory {
    /// Case-insensitive title lookup
    fn find_by_title(&self, title: &str) -> Option<Book> {
        self.books
            .lock()
            .unwrap()
            .iter()
            .find(|book| same_title(&book.title, title))
            .cloned()
    }

    fn quantity(&self, book: &Book) -> u32 {
        self.quantity_of(&book.title).unwrap_or(0)
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

    fn save(&self) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Box::new(io::Error::other("inventory save disabled")));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
