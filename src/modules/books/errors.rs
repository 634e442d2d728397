use bookshelf_http::error::AppError;
use thiserror::Error;

/// Which operation produced a failure; selects the catalog wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    Update,
    Delete,
}

impl Operation {
    fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Create => "Gagal menambahkan buku",
            Operation::Update => "Gagal memperbarui buku",
            Operation::Delete => "Buku gagal dihapus",
            Operation::Get => "Buku tidak ditemukan",
        }
    }

    fn not_found_message(self) -> String {
        match self {
            Operation::Get => "Buku tidak ditemukan".to_string(),
            other => format!("{}. Id tidak ditemukan", other.failure_prefix()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("{}. Mohon isi nama buku", .op.failure_prefix())]
    MissingName { op: Operation },

    #[error(
        "{}. readPage tidak boleh lebih besar dari pageCount",
        .op.failure_prefix()
    )]
    ReadPageExceedsPageCount { op: Operation },

    #[error("{}", .op.not_found_message())]
    NotFound { op: Operation },

    /// The request body could not be read as a book payload.
    #[error("{}. {reason}", .op.failure_prefix())]
    InvalidBody { op: Operation, reason: String },

    /// A freshly appended record could not be found again.
    #[error("Buku gagal ditambahkan")]
    NotPersisted,
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::MissingName { .. } | BookError::ReadPageExceedsPageCount { .. } => {
                AppError::validation(err.to_string())
            }
            BookError::NotFound { .. } => AppError::not_found(err.to_string()),
            BookError::InvalidBody { .. } => AppError::bad_request(err.to_string()),
            BookError::NotPersisted => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}
