//! The seam between the collector and an OS enumeration facility
//!
//! A [`ProcessSource`] hands out an [`EnumerationContext`] per call. The
//! context owns whatever native handles the platform needs and releases them
//! in `Drop`, so every exit path of the collector closes them.

use crate::error::{CollectResult, OwnerLookupError};
use crate::models::{OwnerReply, RawProcess};

/// A facility that can enumerate the host's processes
pub trait ProcessSource {
    type Context: EnumerationContext;

    /// Acquire a fresh enumeration context
    ///
    /// Fails with [`CollectError::Enumeration`](crate::CollectError::Enumeration)
    /// when the facility cannot be opened at all.
    fn acquire(&self) -> CollectResult<Self::Context>;
}

/// A scoped, exclusively owned enumeration handle
pub trait EnumerationContext {
    /// All processes that existed when the context was acquired
    fn processes(&mut self) -> CollectResult<Vec<RawProcess>>;

    /// Resolve the account owning `process`
    fn owner(&mut self, process: &RawProcess) -> Result<OwnerReply, OwnerLookupError>;
}
