//! Shared response envelope types for API handlers.
//!
//! All successful responses use a `{ "data": ..., "message": ... }`
//! envelope; `message` carries a user-facing confirmation line for the UI
//! to surface and is omitted when there is nothing to say.

use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: Some(message.into()),
        }
    }
}
