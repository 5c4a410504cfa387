//! Error types for the status collector

use crate::models::OwnerStatus;
use thiserror::Error;

/// Why the status module cannot be used on this host
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unavailable {
    /// Host OS is not Windows
    #[error("unsupported host OS `{os}`; the status module only works on Windows")]
    UnsupportedOs { os: String },

    /// A native library or entry point could not be loaded
    #[error("{0}")]
    MissingBinding(MissingBinding),
}

/// A native dependency that failed to load
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required binding {symbol} from {library} is not available: {message}")]
pub struct MissingBinding {
    pub library: String,
    pub symbol: String,
    pub message: String,
}

/// Errors that fail a whole collector call
#[derive(Debug, Error)]
pub enum CollectError {
    /// The module was not registered because its environment is unavailable
    #[error("status module unavailable: {0}")]
    Unavailable(#[from] Unavailable),

    /// The enumeration context could not be acquired or walked
    #[error("process enumeration failed in {api}: {message}")]
    Enumeration { api: &'static str, message: String },

    /// No function with this name is exposed by the module
    #[error("function `{0}` is not exposed by the status module")]
    UnknownFunction(String),

    /// The snapshot could not be converted to a payload
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CollectError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CollectError::Unavailable(_))
    }
}

/// Failure of a single owner lookup
///
/// Contained to the record of the affected process; never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnerLookupError {
    /// The process exited before it could be inspected
    #[error("process {pid} not found")]
    ProcessNotFound { pid: u32 },

    /// A platform call failed
    #[error("{api} failed: {message}")]
    Api { api: &'static str, message: String },

    /// The lookup completed with a non-success return code
    #[error("owner lookup returned {0}")]
    Status(OwnerStatus),

    /// The lookup reported success without an account name or domain
    #[error("owner lookup returned no account name")]
    MissingName,
}

/// Result type for collector operations
pub type CollectResult<T> = Result<T, CollectError>;
