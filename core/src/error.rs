//! Error types for the fetch client.
//!
//! # Design
//! The pipeline recognizes two failure kinds of its own: a status code outside
//! the accepted range (`Status`) and a response whose `Content-Type` cannot be
//! decoded (`Decode`). Both carry the method and resolved URL of the request
//! that produced them. Transport failures are passed through untouched, and
//! JSON failures (unparsable error payload, unparsable success body, request
//! serialization) surface as `Json`. Callers branch on `ClientError::kind`.

use serde_json::Value;
use thiserror::Error;

use crate::http::{HttpMethod, TransportError};

/// Coarse classification of a `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Status,
    Decode,
    Transport,
    Json,
    Form,
}

/// Errors returned by `Client` verb methods and the pipeline functions.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a status outside `[200, 310)`.
    #[error("HTTP {status} when making a {method} on resource {url}")]
    Status {
        method: HttpMethod,
        url: String,
        status: u16,
        /// Error body sent by the server, parsed as JSON.
        payload: Value,
    },

    /// The response `Content-Type` is missing or not one we know how to read.
    #[error("couldn't parse Content-Type: {} ({method} {url})", .content_type.as_deref().unwrap_or("<none>"))]
    Decode {
        method: HttpMethod,
        url: String,
        content_type: Option<String>,
    },

    /// The injected transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A form body (multipart or url-encoded) could not be parsed.
    #[error("form data error: {0}")]
    Form(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Status { .. } => ErrorKind::Status,
            ClientError::Decode { .. } => ErrorKind::Decode,
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Json(_) => ErrorKind::Json,
            ClientError::Form(_) => ErrorKind::Form,
        }
    }

    /// HTTP status of a `Status` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error payload of a `Status` error.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ClientError::Status { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// The `error_code` field of a `Status` error payload, if the server sent one.
    pub fn error_code(&self) -> Option<&str> {
        self.payload()?.get("error_code")?.as_str()
    }

    /// The `display_message` field of a `Status` error payload, if the server sent one.
    pub fn display_message(&self) -> Option<&str> {
        self.payload()?.get("display_message")?.as_str()
    }

    /// Resolved URL of the failing request, for the kinds that record it.
    pub fn url(&self) -> Option<&str> {
        match self {
            ClientError::Status { url, .. } | ClientError::Decode { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Method of the failing request, for the kinds that record it.
    pub fn method(&self) -> Option<HttpMethod> {
        match self {
            ClientError::Status { method, .. } | ClientError::Decode { method, .. } => Some(*method),
            _ => None,
        }
    }
}
