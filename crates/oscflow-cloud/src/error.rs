//! Cloud provider error types
//!
//! The control plane reports failures as free text. [`classify`] turns that
//! text into an [`ErrorKind`] once, at the API boundary, so retry and polling
//! logic never has to look at message contents.

use std::time::Duration;
use thiserror::Error;

/// Coarse classification of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rate limiting or throttling; expected to clear on retry
    Throttled,
    /// The addressed resource does not exist
    NotFound,
    /// The resource is still referenced by another resource
    DependencyViolation,
    /// A concurrent modification is in progress
    Conflict,
    /// Anything else
    Other,
}

impl ErrorKind {
    /// Whether the poller may retry this kind without counting a state transition.
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::Throttled)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Throttled => write!(f, "throttled"),
            ErrorKind::NotFound => write!(f, "not-found"),
            ErrorKind::DependencyViolation => write!(f, "dependency-violation"),
            ErrorKind::Conflict => write!(f, "conflict"),
            ErrorKind::Other => write!(f, "other"),
        }
    }
}

const THROTTLE_MARKERS: &[&str] = &[
    "RequestLimitExceeded",
    "Throttling",
    "TooManyRequests",
    "Too Many Requests",
];

/// Classify vendor error text into an [`ErrorKind`].
///
/// Throttling wins over every other marker: a throttled request says nothing
/// about the resource itself.
pub fn classify(text: &str) -> ErrorKind {
    if THROTTLE_MARKERS.iter().any(|m| text.contains(m)) {
        ErrorKind::Throttled
    } else if text.contains("DependencyViolation") {
        ErrorKind::DependencyViolation
    } else if text.contains("NotFound") {
        ErrorKind::NotFound
    } else if text.contains("Conflict") {
        ErrorKind::Conflict
    } else {
        ErrorKind::Other
    }
}

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Your query returned no results. Please change your search criteria and try again")]
    NoResults,

    #[error(
        "Your query returned more than one result ({0}). Please try a more specific search criteria"
    )]
    TooManyResults(usize),

    #[error("Failed to reach target state. Reason: {state}")]
    FailState { state: String },

    #[error("Unexpected state '{state}', wanted target '{expected}'")]
    UnexpectedState { state: String, expected: String },

    #[error("Timeout after {timeout:?} waiting for {resource_id} (last state: '{last_state}')")]
    Timeout {
        resource_id: String,
        last_state: String,
        timeout: Duration,
    },

    #[error("{operation} did not succeed after {attempts} attempts: {last_error}")]
    RetryExhausted {
        operation: String,
        attempts: u32,
        last_error: Box<CloudError>,
    },

    #[error("{operation} failed ({kind}): {message}")]
    Api {
        operation: String,
        kind: ErrorKind,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid attribute {attribute}: {reason}")]
    InvalidAttribute { attribute: String, reason: String },

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("State file error: {0}")]
    StateError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Build an API error, classifying the message.
    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        CloudError::Api {
            operation: operation.into(),
            kind: classify(&message),
            message,
        }
    }

    pub fn invalid_attribute(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        CloudError::InvalidAttribute {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Classification of this error; only API errors carry a vendor kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CloudError::Api { kind, .. } => *kind,
            CloudError::ResourceNotFound(_) => ErrorKind::NotFound,
            CloudError::RetryExhausted { last_error, .. } => last_error.kind(),
            _ => ErrorKind::Other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
