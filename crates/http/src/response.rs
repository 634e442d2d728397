//! Response envelope shared by every module

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Outcome label carried in every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    /// Client-side failure (4xx)
    Fail,
    /// Server-side failure (5xx)
    Error,
}

/// `{status, message?, data?}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Successful reply with an explicit status code.
#[derive(Debug)]
pub struct ApiResponse<T> {
    code: StatusCode,
    body: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with a data payload
    pub fn ok(data: T) -> Self {
        Self::with_code(StatusCode::OK, data)
    }

    /// 201 with a data payload
    pub fn created(data: T) -> Self {
        Self::with_code(StatusCode::CREATED, data)
    }

    pub fn with_code(code: StatusCode, data: T) -> Self {
        Self {
            code,
            body: Envelope {
                status: Status::Success,
                message: None,
                data: Some(data),
            },
        }
    }

    /// Attach a human readable message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.body.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// 200 carrying only a message
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::OK,
            body: Envelope {
                status: Status::Success,
                message: Some(message.into()),
                data: None,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self.body)).into_response()
    }
}
