//! Error types for Windows platform operations

use thiserror::Error;
use winstatus_core::{CollectError, OwnerLookupError};

/// HRESULT for ERROR_ACCESS_DENIED
#[cfg(windows)]
pub(crate) const E_ACCESS_DENIED: u32 = 0x80070005;
/// HRESULT for ERROR_INVALID_PARAMETER (returned for PIDs that no longer exist)
#[cfg(windows)]
pub(crate) const E_INVALID_PARAMETER: u32 = 0x80070057;
/// HRESULT for ERROR_INSUFFICIENT_BUFFER
#[cfg(windows)]
pub(crate) const E_INSUFFICIENT_BUFFER: u32 = 0x8007007A;

/// Errors that can occur during Windows API calls
#[derive(Debug, Error)]
pub enum WinError {
    /// Process not found
    #[error("Process {pid} not found")]
    ProcessNotFound { pid: u32 },

    /// Access denied to process
    #[error("Access denied to process {pid}")]
    AccessDenied { pid: u32 },

    /// Windows API call failed
    #[error("Windows API {api} failed: {message}")]
    ApiError { api: &'static str, message: String },

    /// Failed to create process snapshot
    #[error("Failed to create process snapshot: {0}")]
    SnapshotFailed(String),
}

impl WinError {
    /// Map a failed `OpenProcess`-style call for `pid`
    #[cfg(windows)]
    pub(crate) fn from_open(api: &'static str, pid: u32, err: &windows::core::Error) -> Self {
        match err.code().0 as u32 {
            E_ACCESS_DENIED => WinError::AccessDenied { pid },
            E_INVALID_PARAMETER => WinError::ProcessNotFound { pid },
            _ => WinError::ApiError {
                api,
                message: err.message().to_string(),
            },
        }
    }

    /// Check if this is an access denied error
    pub fn is_access_denied(&self) -> bool {
        matches!(self, WinError::AccessDenied { .. })
    }
}

impl From<WinError> for OwnerLookupError {
    fn from(err: WinError) -> Self {
        match err {
            WinError::ProcessNotFound { pid } => OwnerLookupError::ProcessNotFound { pid },
            WinError::ApiError { api, message } => OwnerLookupError::Api { api, message },
            other => OwnerLookupError::Api {
                api: "owner lookup",
                message: other.to_string(),
            },
        }
    }
}

impl From<WinError> for CollectError {
    fn from(err: WinError) -> Self {
        match err {
            WinError::ApiError { api, message } => CollectError::Enumeration { api, message },
            WinError::SnapshotFailed(message) => CollectError::Enumeration {
                api: "CreateToolhelp32Snapshot",
                message,
            },
            other => CollectError::Enumeration {
                api: "process enumeration",
                message: other.to_string(),
            },
        }
    }
}

/// Result type for Windows operations
pub type WinResult<T> = Result<T, WinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_failure_maps_to_enumeration() {
        let err: CollectError = WinError::SnapshotFailed("Access is denied.".to_string()).into();
        assert!(matches!(
            err,
            CollectError::Enumeration {
                api: "CreateToolhelp32Snapshot",
                ..
            }
        ));
    }

    #[test]
    fn test_not_found_maps_to_owner_error() {
        let err: OwnerLookupError = WinError::ProcessNotFound { pid: 42 }.into();
        assert_eq!(err, OwnerLookupError::ProcessNotFound { pid: 42 });
    }

    #[test]
    fn test_is_access_denied() {
        assert!(WinError::AccessDenied { pid: 4 }.is_access_denied());
        assert!(!WinError::ProcessNotFound { pid: 4 }.is_access_denied());
    }
}
