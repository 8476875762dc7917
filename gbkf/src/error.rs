use std::fmt::{Display, Formatter};

use gbkf_core::GbkfError;

/// Error returned across the FFI boundary.
///
/// Foreign callers receive the message of the wrapped codec error.
#[derive(uniffi::Error, Debug)]
#[uniffi(flat_error)]
pub enum GbkfFfiError {
    /// Any codec failure.
    E(GbkfError),
}

impl From<GbkfError> for GbkfFfiError {
    fn from(e: GbkfError) -> Self {
        Self::E(e)
    }
}

impl Display for GbkfFfiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::E(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for GbkfFfiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::E(e) => Some(e),
        }
    }
}

/// Result type for exported functions.
pub type GbkfFfiResult<T> = Result<T, GbkfFfiError>;
