use std::fmt;

use serde::Serialize;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error reported by the remote serverless client.
///
/// The adapter never rewrites these: they travel to the caller inside
/// [`SqlAdapterError::Client`] with the message and source chain intact.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClientError {
    message: String,
    code: Option<u16>,
    #[source]
    source: Option<BoxedSource>,
}

impl ClientError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Attach the server-side error number (e.g. 1062 for a duplicate key).
    #[must_use]
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn code(&self) -> Option<u16> {
        self.code
    }
}

#[derive(Debug, Error)]
pub enum SqlAdapterError {
    #[error("Unsupported column type: {0}")]
    UnsupportedColumnType(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("Value decoding error: {0}")]
    DecodeError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}

/// Coarse classification of [`SqlAdapterError`], stable enough to hand across the
/// tagged contract boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedColumnType,
    Client,
    Config,
    Parameter,
    Decode,
    Execution,
    Unimplemented,
}

impl SqlAdapterError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedColumnType(_) => ErrorKind::UnsupportedColumnType,
            Self::Client(_) => ErrorKind::Client,
            Self::ConfigError(_) => ErrorKind::Config,
            Self::ParameterError(_) => ErrorKind::Parameter,
            Self::DecodeError(_) => ErrorKind::Decode,
            Self::ExecutionError(_) => ErrorKind::Execution,
            Self::Unimplemented(_) => ErrorKind::Unimplemented,
        }
    }

    /// The remote client's error, if this failure came from a statement dispatch.
    #[must_use]
    pub fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Client(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<url::ParseError> for SqlAdapterError {
    fn from(err: url::ParseError) -> Self {
        SqlAdapterError::ConfigError(format!("invalid connection url: {err}"))
    }
}
