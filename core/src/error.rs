//! Error types for the profile API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the profile does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging. A 401 on the current-user lookup is
//! not an error at all — it surfaces as `CurrentUserOutcome::Unauthorized`.

use std::fmt;

/// Errors returned by `ProfileClient` methods.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 404 — the requested profile does not exist.
    NotFound,

    /// The server returned a non-2xx status other than 404.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// A required environment variable was not set.
    EnvError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "profile not found"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::EnvError(name) => {
                write!(f, "environment variable {name} is not set")
            }
        }
    }
}

impl std::error::Error for ApiError {}
