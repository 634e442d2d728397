//! The five catalog operations.
//!
//! Each operation validates its input, takes a single guard on the store and
//! reports failures as [`BookError`]. Nothing here knows about HTTP.

use std::sync::Arc;

use bookshelf_kernel::settings::FilterMode;
use time::OffsetDateTime;

use super::errors::{BookError, Operation};
use super::id::IdGenerator;
use super::models::{Book, BookFields, BookPayload, BookSummary, ListQuery};
use super::store::BookStore;

pub type BookResult<T> = Result<T, BookError>;

pub struct BookService {
    store: BookStore,
    ids: Arc<dyn IdGenerator>,
    filter_mode: FilterMode,
}

impl BookService {
    pub fn new(ids: Arc<dyn IdGenerator>, filter_mode: FilterMode) -> Self {
        Self {
            store: BookStore::new(),
            ids,
            filter_mode,
        }
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }

    /// Create a book and return its generated id.
    pub async fn create(&self, payload: BookPayload) -> BookResult<String> {
        let fields = validate(payload, Operation::Create)?;
        let id = self.ids.generate();
        let book = Book::new(id.clone(), fields, OffsetDateTime::now_utc());

        let mut shelf = self.store.write().await;
        shelf.append(book);

        if shelf.position(&id).is_none() {
            tracing::error!(book_id = %id, "appended book missing from store");
            return Err(BookError::NotPersisted);
        }

        tracing::info!(book_id = %id, "book created");
        Ok(id)
    }

    /// Summaries of the books matching `query`, in store order.
    pub async fn list(&self, query: &ListQuery) -> Vec<BookSummary> {
        let filters = query.filters();
        let shelf = self.store.read().await;

        let matches = |book: &Book| match self.filter_mode {
            // Each filter re-derives from the full shelf, so the last one wins.
            FilterMode::LastWins => filters.last().map_or(true, |f| f.matches(book)),
            FilterMode::All => filters.iter().all(|f| f.matches(book)),
        };

        shelf
            .iter()
            .filter(|book| matches(*book))
            .map(Book::summary_view)
            .collect()
    }

    pub async fn get(&self, id: &str) -> BookResult<Book> {
        let shelf = self.store.read().await;
        shelf
            .position(id)
            .and_then(|index| shelf.get(index))
            .cloned()
            .ok_or(BookError::NotFound { op: Operation::Get })
    }

    /// Replace every mutable field of an existing book.
    ///
    /// `payload` is only inspected once the id is known to exist, so an
    /// unknown id reports `NotFound` even when the body was unreadable.
    pub async fn update(&self, id: &str, payload: BookResult<BookPayload>) -> BookResult<()> {
        let mut shelf = self.store.write().await;

        let book = shelf
            .position(id)
            .and_then(|index| shelf.get_mut(index))
            .ok_or(BookError::NotFound {
                op: Operation::Update,
            })?;
        let fields = validate(payload?, Operation::Update)?;
        book.apply(fields, OffsetDateTime::now_utc());

        tracing::info!(book_id = %id, "book updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> BookResult<Book> {
        let mut shelf = self.store.write().await;
        let index = shelf.position(id).ok_or(BookError::NotFound {
            op: Operation::Delete,
        })?;

        let removed = shelf.remove_at(index);
        tracing::info!(book_id = %id, "book deleted");
        Ok(removed)
    }
}

/// Apply the two business rules: a name is required and `readPage` may not
/// exceed `pageCount`.
fn validate(payload: BookPayload, op: Operation) -> BookResult<BookFields> {
    let name = payload.name.ok_or(BookError::MissingName { op })?;

    let page_count = payload.page_count.unwrap_or(0);
    let read_page = payload.read_page.unwrap_or(0);
    if read_page > page_count {
        return Err(BookError::ReadPageExceedsPageCount { op });
    }

    Ok(BookFields {
        name,
        year: payload.year,
        author: payload.author,
        summary: payload.summary,
        publisher: payload.publisher,
        page_count,
        read_page,
        reading: payload.reading.unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::id::NanoIdGenerator;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct SequentialIds(AtomicUsize);

    impl IdGenerator for SequentialIds {
        fn generate(&self) -> String {
            format!("book-{:011}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    fn service(mode: FilterMode) -> BookService {
        BookService::new(Arc::new(SequentialIds(AtomicUsize::new(0))), mode)
    }

    fn payload(name: &str, page_count: u32, read_page: u32, reading: bool) -> BookPayload {
        BookPayload {
            name: Some(name.to_string()),
            year: Some(2010),
            author: Some("John Doe".to_string()),
            summary: Some("Lorem ipsum dolor sit amet".to_string()),
            publisher: Some("Dicoding Indonesia".to_string()),
            page_count: Some(page_count),
            read_page: Some(read_page),
            reading: Some(reading),
        }
    }

    /// Four books covering every combination the filters care about.
    async fn seeded(mode: FilterMode) -> BookService {
        let service = service(mode);
        for p in [
            payload("Dunia Sophie", 100, 100, false),
            payload("Laskar Pelangi", 200, 50, true),
            payload("Sang DUNIA Kecil", 80, 10, true),
            payload("Bumi Manusia", 300, 300, true),
        ] {
            service.create(p).await.unwrap();
        }
        service
    }

    fn names(summaries: &[BookSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn create_appends_one_record() {
        let service = BookService::new(Arc::new(NanoIdGenerator::new(16)), FilterMode::LastWins);

        let id = service.create(payload("Dunia Sophie", 100, 25, true)).await.unwrap();
        assert_eq!(id.len(), 16);
        assert_eq!(service.store().len().await, 1);

        let book = service.get(&id).await.unwrap();
        assert!(!book.finished());
        assert_eq!(book.inserted_at, book.updated_at);
    }

    #[tokio::test]
    async fn create_marks_finished_when_fully_read() {
        let service = service(FilterMode::LastWins);
        let id = service.create(payload("Dunia Sophie", 100, 100, false)).await.unwrap();
        assert!(service.get(&id).await.unwrap().finished());
    }

    #[tokio::test]
    async fn create_without_name_leaves_store_unchanged() {
        let service = service(FilterMode::LastWins);
        let mut p = payload("x", 10, 5, false);
        p.name = None;

        let err = service.create(p).await.unwrap_err();
        assert_eq!(
            err,
            BookError::MissingName {
                op: Operation::Create
            }
        );
        assert_eq!(service.store().len().await, 0);
    }

    #[tokio::test]
    async fn create_with_read_page_over_page_count_is_rejected() {
        let service = service(FilterMode::LastWins);

        let err = service
            .create(payload("Dunia Sophie", 100, 150, false))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BookError::ReadPageExceedsPageCount {
                op: Operation::Create
            }
        );
        assert_eq!(service.store().len().await, 0);
    }

    #[tokio::test]
    async fn create_with_missing_counts_defaults_to_zero() {
        let service = service(FilterMode::LastWins);
        let id = service
            .create(BookPayload {
                name: Some("Catatan".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let book = service.get(&id).await.unwrap();
        assert_eq!(book.page_count, 0);
        assert_eq!(book.read_page, 0);
        assert!(book.finished());
        assert!(!book.reading);
    }

    #[tokio::test]
    async fn list_without_filters_returns_all_in_insertion_order() {
        let service = seeded(FilterMode::LastWins).await;
        let books = service.list(&ListQuery::default()).await;

        assert_eq!(
            names(&books),
            vec!["Dunia Sophie", "Laskar Pelangi", "Sang DUNIA Kecil", "Bumi Manusia"]
        );
        assert_eq!(books[0].id, "book-00000000000");
        assert_eq!(books[0].publisher.as_deref(), Some("Dicoding Indonesia"));
    }

    #[tokio::test]
    async fn list_by_name_is_case_insensitive() {
        let service = seeded(FilterMode::LastWins).await;
        let query = ListQuery {
            name: Some("dunia".to_string()),
            ..Default::default()
        };

        let books = service.list(&query).await;
        assert_eq!(names(&books), vec!["Dunia Sophie", "Sang DUNIA Kecil"]);
    }

    #[tokio::test]
    async fn list_flags_treat_only_one_as_true() {
        let service = seeded(FilterMode::LastWins).await;

        let reading = service
            .list(&ListQuery {
                reading: Some("1".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(
            names(&reading),
            vec!["Laskar Pelangi", "Sang DUNIA Kecil", "Bumi Manusia"]
        );

        let unfinished = service
            .list(&ListQuery {
                finished: Some("true".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(names(&unfinished), vec!["Laskar Pelangi", "Sang DUNIA Kecil"]);
    }

    #[tokio::test]
    async fn last_wins_mode_applies_only_the_finished_filter() {
        let service = seeded(FilterMode::LastWins).await;
        let query = ListQuery {
            name: Some("dunia".to_string()),
            reading: Some("0".to_string()),
            finished: Some("1".to_string()),
        };

        let books = service.list(&query).await;
        assert_eq!(names(&books), vec!["Dunia Sophie", "Bumi Manusia"]);
    }

    #[tokio::test]
    async fn all_mode_composes_filters() {
        let service = seeded(FilterMode::All).await;
        let query = ListQuery {
            name: Some("dunia".to_string()),
            reading: Some("1".to_string()),
            finished: None,
        };

        let books = service.list(&query).await;
        assert_eq!(names(&books), vec!["Sang DUNIA Kecil"]);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let service = seeded(FilterMode::LastWins).await;
        let err = service.get("missing").await.unwrap_err();
        assert_eq!(err.to_string(), "Buku tidak ditemukan");
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_identity() {
        let service = service(FilterMode::LastWins);
        let id = service.create(payload("Dunia Sophie", 100, 25, true)).await.unwrap();
        let before = service.get(&id).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let mut p = payload("Dunia Sophie (Revisi)", 120, 120, false);
        p.publisher = None;
        service.update(&id, Ok(p)).await.unwrap();

        let after = service.get(&id).await.unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.inserted_at, before.inserted_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.name, "Dunia Sophie (Revisi)");
        assert_eq!(after.publisher, None);
        assert!(after.finished());
        assert!(!after.reading);
    }

    #[tokio::test]
    async fn update_checks_id_before_payload() {
        let service = seeded(FilterMode::LastWins).await;
        let mut p = payload("x", 1, 2, false);
        p.name = None;

        let err = service.update("missing", Ok(p)).await.unwrap_err();
        assert_eq!(
            err,
            BookError::NotFound {
                op: Operation::Update
            }
        );
        assert_eq!(service.store().len().await, 4);
    }

    #[tokio::test]
    async fn update_reports_unknown_id_before_unreadable_body() {
        let service = seeded(FilterMode::LastWins).await;
        let unreadable = || -> BookResult<BookPayload> {
            Err(BookError::InvalidBody {
                op: Operation::Update,
                reason: "invalid type: string \"2010\", expected i32".to_string(),
            })
        };

        assert_eq!(
            service.update("missing", unreadable()).await.unwrap_err(),
            BookError::NotFound {
                op: Operation::Update
            }
        );

        let id = "book-00000000001";
        let before = service.get(id).await.unwrap();
        assert!(matches!(
            service.update(id, unreadable()).await.unwrap_err(),
            BookError::InvalidBody { .. }
        ));
        assert_eq!(service.get(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn update_rejects_invalid_payload_without_mutating() {
        let service = service(FilterMode::LastWins);
        let id = service.create(payload("Dunia Sophie", 100, 25, true)).await.unwrap();
        let before = service.get(&id).await.unwrap();

        let mut nameless = payload("x", 100, 50, true);
        nameless.name = None;
        assert_eq!(
            service.update(&id, Ok(nameless)).await.unwrap_err(),
            BookError::MissingName {
                op: Operation::Update
            }
        );

        assert_eq!(
            service
                .update(&id, Ok(payload("Dunia Sophie", 100, 101, true)))
                .await
                .unwrap_err(),
            BookError::ReadPageExceedsPageCount {
                op: Operation::Update
            }
        );

        assert_eq!(service.get(&id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let service = seeded(FilterMode::LastWins).await;
        let id = "book-00000000001";

        let removed = service.delete(id).await.unwrap();
        assert_eq!(removed.name, "Laskar Pelangi");
        assert_eq!(service.store().len().await, 3);
        assert!(service.get(id).await.is_err());

        let err = service.delete(id).await.unwrap_err();
        assert_eq!(
            err,
            BookError::NotFound {
                op: Operation::Delete
            }
        );
        assert_eq!(service.store().len().await, 3);
    }
}
