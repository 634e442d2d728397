use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::models::Book;

/// Insertion-ordered sequence of books.
///
/// Indexes returned by [`Shelf::position`] are only meaningful while the
/// guard they were obtained through is held.
#[derive(Debug, Default)]
pub struct Shelf {
    books: Vec<Book>,
}

impl Shelf {
    pub fn append(&mut self, book: Book) {
        self.books.push(book);
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Book> {
        self.books.get_mut(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Book {
        self.books.remove(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Process-lifetime book storage. Every operation holds one guard for its
/// whole duration, so lookups and the mutations that follow are atomic.
#[derive(Debug, Default)]
pub struct BookStore {
    shelf: RwLock<Shelf>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Shelf> {
        self.shelf.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Shelf> {
        self.shelf.write().await
    }

    pub async fn len(&self) -> usize {
        self.shelf.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::BookFields;
    use time::OffsetDateTime;

    fn book(id: &str) -> Book {
        Book::new(
            id.to_string(),
            BookFields {
                name: format!("book {id}"),
                year: None,
                author: None,
                summary: None,
                publisher: None,
                page_count: 10,
                read_page: 0,
                reading: false,
            },
            OffsetDateTime::now_utc(),
        )
    }

    #[test]
    fn preserves_insertion_order() {
        let mut shelf = Shelf::default();
        for id in ["c", "a", "b"] {
            shelf.append(book(id));
        }

        let ids: Vec<_> = shelf.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(shelf.position("a"), Some(1));
        assert_eq!(shelf.position("z"), None);
    }

    #[test]
    fn mutate_and_remove_by_index() {
        let mut shelf = Shelf::default();
        shelf.append(book("a"));
        shelf.append(book("c"));

        if let Some(entry) = shelf.get_mut(1) {
            entry.name = "renamed".to_string();
        }
        assert_eq!(shelf.get(1).map(|b| b.name.as_str()), Some("renamed"));

        let removed = shelf.remove_at(0);
        assert_eq!(removed.id, "a");
        assert_eq!(shelf.len(), 1);
        assert_eq!(shelf.position("c"), Some(0));
    }

    #[tokio::test]
    async fn store_guards_share_state() {
        let store = BookStore::new();
        store.write().await.append(book("a"));

        assert_eq!(store.len().await, 1);
        assert!(store.read().await.position("a").is_some());
    }
}
