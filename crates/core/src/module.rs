//! The `status` module as seen by a plugin host
//!
//! Registration goes through the capability gate; once loaded, functions are
//! called by name with no arguments.

use crate::capability::{Capabilities, VIRTUAL_NAME};
use crate::collector::take_snapshot;
use crate::error::{CollectError, CollectResult};
use crate::models::ProcessSnapshot;
use crate::source::ProcessSource;
use serde_json::Value;
use tracing::debug;

/// Names of the functions [`StatusModule::call`] dispatches
pub const FUNCTIONS: &[&str] = &["procs"];

/// A registered status module backed by a process source
#[derive(Debug)]
pub struct StatusModule<S> {
    source: S,
}

impl<S: ProcessSource> StatusModule<S> {
    /// Register the module if the environment allows it
    ///
    /// A refusal is only traced at debug level; the probe that built
    /// `capabilities` has already reported a missing binding.
    pub fn load(capabilities: &Capabilities, source: S) -> CollectResult<Self> {
        if let Err(reason) = capabilities.check() {
            debug!(module = VIRTUAL_NAME, "module not loaded: {}", reason);
            return Err(CollectError::Unavailable(reason));
        }
        Ok(Self { source })
    }

    pub fn name(&self) -> &'static str {
        VIRTUAL_NAME
    }

    pub fn functions(&self) -> &'static [&'static str] {
        FUNCTIONS
    }

    /// Return the process data
    pub fn procs(&self) -> CollectResult<ProcessSnapshot> {
        take_snapshot(&self.source)
    }

    /// Call a zero-argument function by name and return its payload
    ///
    /// Accepts both `procs` and the qualified `status.procs`.
    pub fn call(&self, function: &str) -> CollectResult<Value> {
        let local = function
            .strip_prefix(VIRTUAL_NAME)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(function);

        match local {
            "procs" => Ok(serde_json::to_value(self.procs()?)?),
            other => Err(CollectError::UnknownFunction(other.to_string())),
        }
    }
}
