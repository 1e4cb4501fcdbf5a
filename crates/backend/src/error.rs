//! Backend error types.

use thiserror::Error;

/// Errors from the hosted relational store or the auth service.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The backend answered with a shape the declared schema does not allow.
    #[error("unexpected response shape: {0}")]
    Schema(String),

    #[error("row not found")]
    NotFound,
}

impl BackendError {
    /// Build an `Api` error from a non-success response, pulling the
    /// human-readable message out of the JSON body when one is present.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                ["message", "msg", "error_description"]
                    .iter()
                    .find_map(|key| value.get(key).and_then(|m| m.as_str()).map(String::from))
            })
            .unwrap_or(body);
        BackendError::Api { status, message }
    }
}
