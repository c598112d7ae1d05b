//! # Errors
//!
//! Every helper in the toolkit reports failures through [`ToolkitError`].
//! Core goals:
//! - a stable, closed set of kinds callers can match on
//! - human-readable messages that are safe to send back to clients
//! - transport-agnostic (the server crate decides how to serialize)
//!
//! [`ErrorKind`] carries the HTTP status each kind maps to by default.

use thiserror::Error;

/// A convenience result type for toolkit APIs.
pub type ToolkitResult<T> = std::result::Result<T, ToolkitError>;

/// Boxed error used for failures coming from pluggable backends (HTTP clients).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Stable error classes + default status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TooLarge,         // 413
    TypeNotAllowed,   // 415
    Io,               // 500
    MalformedJson,    // 400
    TypeMismatchJson, // 400
    UnexpectedEof,    // 400
    EmptyBody,        // 400
    UnknownField,     // 400
    MultipleValues,   // 400
    EmptyInput,       // 400
    EmptyResult,      // 400
    NoFileProvided,   // 400
    Multipart,        // 400
    InvalidHeader,    // 400
    Serialization,    // 500
    Entropy,          // 500
    Config,           // 500
    Remote,           // 502
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::TooLarge => 413,
            ErrorKind::TypeNotAllowed => 415,
            ErrorKind::MalformedJson
            | ErrorKind::TypeMismatchJson
            | ErrorKind::UnexpectedEof
            | ErrorKind::EmptyBody
            | ErrorKind::UnknownField
            | ErrorKind::MultipleValues
            | ErrorKind::EmptyInput
            | ErrorKind::EmptyResult
            | ErrorKind::NoFileProvided
            | ErrorKind::Multipart
            | ErrorKind::InvalidHeader => 400,
            ErrorKind::Io | ErrorKind::Serialization | ErrorKind::Entropy | ErrorKind::Config => {
                500
            }
            ErrorKind::Remote => 502,
        }
    }

    /// Kind name (e.g. "TooLarge"), handy for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::TooLarge => "TooLarge",
            ErrorKind::TypeNotAllowed => "TypeNotAllowed",
            ErrorKind::Io => "Io",
            ErrorKind::MalformedJson => "MalformedJson",
            ErrorKind::TypeMismatchJson => "TypeMismatchJson",
            ErrorKind::UnexpectedEof => "UnexpectedEof",
            ErrorKind::EmptyBody => "EmptyBody",
            ErrorKind::UnknownField => "UnknownField",
            ErrorKind::MultipleValues => "MultipleValues",
            ErrorKind::EmptyInput => "EmptyInput",
            ErrorKind::EmptyResult => "EmptyResult",
            ErrorKind::NoFileProvided => "NoFileProvided",
            ErrorKind::Multipart => "Multipart",
            ErrorKind::InvalidHeader => "InvalidHeader",
            ErrorKind::Serialization => "Serialization",
            ErrorKind::Entropy => "Entropy",
            ErrorKind::Config => "Config",
            ErrorKind::Remote => "Remote",
        }
    }
}

/// Errors that can occur in any toolkit operation
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("{subject} must not be larger than {limit} bytes")]
    TooLarge { subject: &'static str, limit: u64 },

    #[error("the uploaded file type {content_type} is not permitted")]
    TypeNotAllowed { content_type: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("body contains badly-formed JSON (at character {offset})")]
    MalformedJson { offset: usize },

    #[error("body contains incorrect JSON type {}", mismatch_location(.field, .offset))]
    TypeMismatchJson { field: Option<String>, offset: usize },

    #[error("body contains badly-formed JSON")]
    UnexpectedEof,

    #[error("body must not be empty")]
    EmptyBody,

    #[error("body contains unknown key \"{field}\"")]
    UnknownField { field: String },

    #[error("body must contain only one JSON value")]
    MultipleValues,

    #[error("empty string not permitted")]
    EmptyInput,

    #[error("after removing characters, slug is zero length")]
    EmptyResult,

    #[error("no file was provided in the request")]
    NoFileProvided,

    #[error("failed to parse multipart form: {message}")]
    Multipart { message: String },

    #[error("invalid value for header {name}")]
    InvalidHeader { name: &'static str },

    #[error("JSON serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("system randomness source failed: {source}")]
    Entropy {
        #[from]
        source: rand::Error,
    },

    #[error("invalid configuration value for {key}: {message}")]
    Config { key: String, message: String },

    #[error("remote request failed: {source}")]
    Remote {
        #[source]
        source: BoxError,
    },
}

fn mismatch_location(field: &Option<String>, offset: &usize) -> String {
    match field {
        Some(field) => format!("for field \"{field}\""),
        None => format!("(at character {offset})"),
    }
}

impl ToolkitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolkitError::TooLarge { .. } => ErrorKind::TooLarge,
            ToolkitError::TypeNotAllowed { .. } => ErrorKind::TypeNotAllowed,
            ToolkitError::Io { .. } => ErrorKind::Io,
            ToolkitError::MalformedJson { .. } => ErrorKind::MalformedJson,
            ToolkitError::TypeMismatchJson { .. } => ErrorKind::TypeMismatchJson,
            ToolkitError::UnexpectedEof => ErrorKind::UnexpectedEof,
            ToolkitError::EmptyBody => ErrorKind::EmptyBody,
            ToolkitError::UnknownField { .. } => ErrorKind::UnknownField,
            ToolkitError::MultipleValues => ErrorKind::MultipleValues,
            ToolkitError::EmptyInput => ErrorKind::EmptyInput,
            ToolkitError::EmptyResult => ErrorKind::EmptyResult,
            ToolkitError::NoFileProvided => ErrorKind::NoFileProvided,
            ToolkitError::Multipart { .. } => ErrorKind::Multipart,
            ToolkitError::InvalidHeader { .. } => ErrorKind::InvalidHeader,
            ToolkitError::Serialization { .. } => ErrorKind::Serialization,
            ToolkitError::Entropy { .. } => ErrorKind::Entropy,
            ToolkitError::Config { .. } => ErrorKind::Config,
            ToolkitError::Remote { .. } => ErrorKind::Remote,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Create a too-large error for the given subject ("body", "upload")
    pub fn too_large(subject: &'static str, limit: u64) -> Self {
        Self::TooLarge { subject, limit }
    }

    /// Create a multipart parse error
    pub fn multipart<S: Into<String>>(message: S) -> Self {
        Self::Multipart {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<K: Into<String>, M: Into<String>>(key: K, message: M) -> Self {
        Self::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a remote error from any error type
    pub fn remote<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Remote {
            source: Box::new(error),
        }
    }
}
