pub mod errors;
pub mod id;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{settings::BooksSettings, InitCtx, Module};
use serde_json::{json, Value};

use id::NanoIdGenerator;
use service::BookService;

/// Books module: owns the catalog and exposes it under `/books`
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(settings: &BooksSettings) -> Self {
        let ids = Arc::new(NanoIdGenerator::new(settings.id_length));
        Self {
            service: Arc::new(BookService::new(ids, settings.filter_mode)),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            filter_mode = ?ctx.settings.books.filter_mode,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let books = self.service.store().len().await;
        tracing::info!(
            module = self.name(),
            books,
            "books module stopped; catalog discarded"
        );
        Ok(())
    }
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn success_response(description: &str, data: Option<Value>) -> Value {
    let mut properties = json!({
        "status": { "type": "string", "enum": ["success"] },
        "message": { "type": "string" }
    });
    if let Some(data) = data {
        properties["data"] = data;
    }
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "type": "object", "properties": properties }
            }
        }
    })
}

fn book_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookPayload" }
            }
        }
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn flag_parameter(name: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "description": "\"1\" selects true, any other value selects false",
        "schema": { "type": "string" }
    })
}

fn openapi_fragment() -> Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [
                        {
                            "name": "name",
                            "in": "query",
                            "required": false,
                            "description": "Case-insensitive substring of the book name",
                            "schema": { "type": "string" }
                        },
                        flag_parameter("reading"),
                        flag_parameter("finished")
                    ],
                    "responses": {
                        "200": success_response("Book summaries", Some(json!({
                            "type": "object",
                            "properties": {
                                "books": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/BookSummary" }
                                }
                            }
                        })))
                    }
                },
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": book_body(),
                    "responses": {
                        "201": success_response("Book added", Some(json!({
                            "type": "object",
                            "properties": { "bookId": { "type": "string" } }
                        }))),
                        "400": error_response("Missing name or readPage exceeds pageCount"),
                        "500": error_response("Book could not be stored")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": success_response("Full book record", Some(json!({
                            "type": "object",
                            "properties": {
                                "book": { "$ref": "#/components/schemas/Book" }
                            }
                        }))),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Update a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "requestBody": book_body(),
                    "responses": {
                        "200": success_response("Book updated", None),
                        "400": error_response("Missing name or readPage exceeds pageCount"),
                        "404": error_response("Book not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": success_response("Book deleted", None),
                        "404": error_response("Book not found")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "text/plain": { "schema": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "year": { "type": "integer" },
                        "author": { "type": "string" },
                        "summary": { "type": "string" },
                        "publisher": { "type": "string" },
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "finished": { "type": "boolean" },
                        "reading": { "type": "boolean" },
                        "insertedAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" }
                    },
                    "required": [
                        "id", "name", "pageCount", "readPage",
                        "finished", "reading", "insertedAt", "updatedAt"
                    ]
                },
                "BookPayload": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "year": { "type": "integer" },
                        "author": { "type": "string" },
                        "summary": { "type": "string" },
                        "publisher": { "type": "string" },
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "reading": { "type": "boolean" }
                    },
                    "required": ["name"]
                },
                "BookSummary": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "publisher": { "type": "string" }
                    },
                    "required": ["id", "name"]
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module(settings: &BooksSettings) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(settings))
}
