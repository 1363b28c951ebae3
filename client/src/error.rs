use thiserror::Error;

use crate::session::SessionError;

/// Failures below the HTTP status level: the request never produced a
/// response, or the response could not be read.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] hyper_util::client::legacy::Error),

    #[error("Failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("Invalid request: {0}")]
    Request(#[from] http::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] rustls::Error),

    #[error("Invalid URI: {0}")]
    Uri(#[from] http::uri::InvalidUri),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),
}
