//! Process source for hosts without Win32
//!
//! Lets the workspace build and test on other platforms. Acquiring it always
//! fails with the unsupported-OS reason the capability gate would give.

use winstatus_core::{
    CollectResult, EnumerationContext, HostOs, OwnerLookupError, OwnerReply, ProcessSource,
    RawProcess, Unavailable,
};

#[derive(Debug, Clone, Default)]
pub struct UnsupportedSource;

/// Context of a source that can never be acquired
pub enum NoContext {}

impl ProcessSource for UnsupportedSource {
    type Context = NoContext;

    fn acquire(&self) -> CollectResult<NoContext> {
        Err(Unavailable::UnsupportedOs {
            os: HostOs::current().to_string(),
        }
        .into())
    }
}

impl EnumerationContext for NoContext {
    fn processes(&mut self) -> CollectResult<Vec<RawProcess>> {
        match *self {}
    }

    fn owner(&mut self, _process: &RawProcess) -> Result<OwnerReply, OwnerLookupError> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winstatus_core::{take_snapshot, CollectError};

    #[test]
    fn test_snapshot_fails_as_unavailable() {
        let err = take_snapshot(&UnsupportedSource).unwrap_err();
        assert!(matches!(
            err,
            CollectError::Unavailable(Unavailable::UnsupportedOs { .. })
        ));
    }
}
