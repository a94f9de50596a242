//! Error types for the page client.

/// Errors that can occur when fetching a page from the source.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The HTTP request failed (connection error or unreadable body).
    #[error("Request failed")]
    RequestFailed,
    /// The request did not complete within the client timeout.
    #[error("Request timed out")]
    Timeout,
    /// The source returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}
