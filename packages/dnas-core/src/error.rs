//! Error types for the DNA Spaces client.
//!
//! API failures are classified into a small fixed set of [`ApiErrorKind`]s,
//! one per error status the service documents. Everything else (transport,
//! decoding, misuse) gets its own variant and is never folded into a kind.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The error statuses DNA Spaces documents for its location API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    InternalError,
    /// Any other status in the error range
    Unknown,
}

impl ApiErrorKind {
    /// Classify an HTTP status that has already been judged an error.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            500 => ApiErrorKind::InternalError,
            _ => ApiErrorKind::Unknown,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::BadRequest => write!(f, "bad request"),
            ApiErrorKind::Unauthorized => write!(f, "unauthorized request"),
            ApiErrorKind::Forbidden => write!(f, "forbidden"),
            ApiErrorKind::InternalError => write!(f, "internal error"),
            ApiErrorKind::Unknown => write!(f, "unexpected error occurred"),
        }
    }
}

/// An error response from the API, optionally carrying the vendor's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ApiErrorKind,
    message: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// Vendor supplied detail, present when the error body was JSON.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.kind, message),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ApiError {}

impl PartialEq<ApiErrorKind> for ApiError {
    fn eq(&self, other: &ApiErrorKind) -> bool {
        self.kind == *other
    }
}

/// Body of an error response. Both fields are optional on the wire.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[allow(dead_code)]
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Connection, DNS or timeout failure from the HTTP client
    #[error(transparent)]
    Transport(reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Response was text/csv but a JSON destination was supplied; use a table destination for CSV endpoints")]
    DestinationMismatch,

    #[error("History row {row} has {found} columns, expected {expected}")]
    HistoryRowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("API key required")]
    MissingApiKey,

    #[error("Valid region required, either io or eu (got {0:?})")]
    InvalidRegion(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

impl Error {
    /// The API error kind, if this is an API error response.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// True when this is an API error of the given kind, message or not.
    pub fn is(&self, kind: ApiErrorKind) -> bool {
        self.api_kind() == Some(kind)
    }
}
