use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use bookshelf_http::{error::AppError, response::ApiResponse};
use serde::Serialize;

use super::errors::{BookError, Operation};
use super::models::{Book, BookPayload, BookSummary, ListQuery};
use super::service::BookService;

type SharedService = Arc<BookService>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBook {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
}

/// HTTP routes for the books module, relative to its mount point.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

fn parse_body(
    payload: Result<Json<BookPayload>, JsonRejection>,
    op: Operation,
) -> Result<BookPayload, BookError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| BookError::InvalidBody {
            op,
            reason: rejection.body_text(),
        })
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn create_book(
    State(service): State<SharedService>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<CreatedBook>, AppError> {
    let book_id = service
        .create(parse_body(payload, Operation::Create)?)
        .await?;
    Ok(ApiResponse::created(CreatedBook { book_id }).message("Buku berhasil ditambahkan"))
}

async fn list_books(
    State(service): State<SharedService>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResponse<BookList> {
    let books = service.list(&ListQuery::from_pairs(pairs)).await;
    ApiResponse::ok(BookList { books })
}

async fn get_book(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<ApiResponse<BookDetail>, AppError> {
    let book = service.get(&id).await?;
    Ok(ApiResponse::ok(BookDetail { book }))
}

async fn update_book(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<()>, AppError> {
    service
        .update(&id, parse_body(payload, Operation::Update))
        .await?;
    Ok(ApiResponse::ok_message("Buku berhasil diperbarui"))
}

async fn delete_book(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    service.delete(&id).await?;
    Ok(ApiResponse::ok_message("Buku berhasil dihapus"))
}
