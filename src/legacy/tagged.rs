use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{ErrorKind, SqlAdapterError};

/// What the tagged contract carries for a failed call.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl From<&SqlAdapterError> for ErrorInfo {
    fn from(err: &SqlAdapterError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            code: err.as_client_error().and_then(|e| e.code()),
        }
    }
}

/// Success/error envelope used by the older consumer contract.
///
/// Serializes as `{"ok":true,"value":..}` or `{"ok":false,"error":{..}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Tagged<T> {
    Ok(T),
    Err(ErrorInfo),
}

impl<T> Tagged<T> {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Tagged::Ok(_))
    }

    #[must_use]
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Convert back into a `Result`, keeping only the error summary.
    ///
    /// # Errors
    /// Returns the carried `ErrorInfo` for the error variant.
    pub fn into_result(self) -> Result<T, ErrorInfo> {
        match self {
            Tagged::Ok(value) => Ok(value),
            Tagged::Err(info) => Err(info),
        }
    }

    #[must_use]
    pub fn ok(self) -> Option<T> {
        self.into_result().ok()
    }

    #[must_use]
    pub fn err(&self) -> Option<&ErrorInfo> {
        match self {
            Tagged::Ok(_) => None,
            Tagged::Err(info) => Some(info),
        }
    }
}

impl<T> From<Result<T, SqlAdapterError>> for Tagged<T> {
    fn from(result: Result<T, SqlAdapterError>) -> Self {
        match result {
            Ok(value) => Tagged::Ok(value),
            Err(err) => Tagged::Err(ErrorInfo::from(&err)),
        }
    }
}

impl<T: Serialize> Serialize for Tagged<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Tagged", 2)?;
        match self {
            Tagged::Ok(value) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("value", value)?;
            }
            Tagged::Err(info) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", info)?;
            }
        }
        state.end()
    }
}
