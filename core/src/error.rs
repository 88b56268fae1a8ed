//! Error types for the request helpers.
//!
//! # Design
//! `NotFound` keeps a dedicated variant because callers of the strict
//! `fetch_json` path frequently distinguish "the resource does not exist"
//! from "the server returned an unexpected status." All other non-2xx
//! responses land in `HttpError` with the raw status code and body.
//!
//! The lenient surfaces (`send_request`, `edit_resource`, form submission)
//! never hand these to the caller: they log and fall back to `None`.

use thiserror::Error;

/// Errors produced while building, executing, or interpreting a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The network call itself failed (DNS, connect, reset, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// No form with the given id exists in the document.
    #[error("no form with id {0:?}")]
    FormNotFound(String),
}
