//! Error types for the records API client, the session and the exporter.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the
//! record does not exist" from "the server returned an unexpected status."
//! All other unexpected responses land in `HttpError` with the raw status
//! code and body for debugging. `Transport` covers failures that never
//! produced a response at all.

use thiserror::Error;

/// Errors returned by `RecordsClient` parse methods and `RecordService`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 for the addressed record.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one (and not 404).
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never completed (connection refused, DNS, TLS, ...).
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Errors returned by `Session` transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("login required")]
    NotAuthenticated,
}

/// Errors returned by the PDF report exporter.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no records to export")]
    Empty,

    #[error("failed to render PDF: {0}")]
    Pdf(String),
}
