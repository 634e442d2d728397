use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A catalog record.
///
/// `finished` is not settable: it is recomputed from `read_page` and
/// `page_count` whenever the record is built or updated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    finished: bool,
    pub reading: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    /// Build a new record from a validated payload. Both timestamps are `now`.
    pub fn new(id: String, fields: BookFields, now: OffsetDateTime) -> Self {
        let mut book = Self {
            id,
            name: String::new(),
            year: None,
            author: None,
            summary: None,
            publisher: None,
            page_count: 0,
            read_page: 0,
            finished: false,
            reading: false,
            inserted_at: now,
            updated_at: now,
        };
        book.apply(fields, now);
        book
    }

    /// Replace every mutable field, keeping `id` and `inserted_at`.
    pub fn apply(&mut self, fields: BookFields, now: OffsetDateTime) {
        self.name = fields.name;
        self.year = fields.year;
        self.author = fields.author;
        self.summary = fields.summary;
        self.publisher = fields.publisher;
        self.page_count = fields.page_count;
        self.read_page = fields.read_page;
        self.reading = fields.reading;
        self.finished = self.read_page == self.page_count;
        self.updated_at = now;
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn summary_view(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Request body for create and update.
///
/// Every key is optional on the wire so that a missing `name` can be
/// reported with the catalog message instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: Option<u32>,
    pub read_page: Option<u32>,
    pub reading: Option<bool>,
}

/// Payload that passed validation.
#[derive(Debug, Clone)]
pub struct BookFields {
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

/// `{id, name, publisher}` projection returned by the list operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<String>,
}

/// Raw list query. Boolean flags use `"1"` for true, anything else for false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

/// A single list predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    /// Case-insensitive substring of `name`
    Name(String),
    Reading(bool),
    Finished(bool),
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::Name(needle) => book.name.to_lowercase().contains(needle),
            BookFilter::Reading(reading) => book.reading == *reading,
            BookFilter::Finished(finished) => book.finished == *finished,
        }
    }
}

impl ListQuery {
    /// Build from raw query pairs. A repeated key keeps its last value and
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => query.name = Some(value),
                "reading" => query.reading = Some(value),
                "finished" => query.finished = Some(value),
                _ => {}
            }
        }
        query
    }

    /// Filters in application order: name, reading, finished.
    pub fn filters(&self) -> Vec<BookFilter> {
        let mut filters = Vec::new();
        if let Some(name) = &self.name {
            filters.push(BookFilter::Name(name.to_lowercase()));
        }
        if let Some(reading) = &self.reading {
            filters.push(BookFilter::Reading(reading == "1"));
        }
        if let Some(finished) = &self.finished {
            filters.push(BookFilter::Finished(finished == "1"));
        }
        filters
    }
}
