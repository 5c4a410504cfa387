//! winstatus-platform-windows: Windows process source for winstatus
//!
//! This crate provides the Win32 side of the status collector: a Toolhelp
//! snapshot as the enumeration context, token-based owner lookup, PEB-based
//! command line reads, and the load-time binding probe.

pub mod error;
pub mod probe;

#[cfg(windows)]
pub mod command_line;
#[cfg(windows)]
mod handle;
#[cfg(windows)]
pub mod owner;
#[cfg(windows)]
pub mod privilege;
#[cfg(windows)]
pub mod process_snapshot;
#[cfg(not(windows))]
pub mod unsupported;

pub use error::*;
pub use probe::{check_bindings, probe, probe_with, Binding, REQUIRED_BINDINGS};

#[cfg(windows)]
pub use command_line::*;
#[cfg(windows)]
pub use owner::*;
#[cfg(windows)]
pub use privilege::*;
#[cfg(windows)]
pub use process_snapshot::*;
#[cfg(not(windows))]
pub use unsupported::*;

use winstatus_core::{Capabilities, CollectResult, ProcessSnapshot, StatusModule};

/// The process source for the platform this crate was built for
#[cfg(windows)]
pub type PlatformSource = ToolhelpSource;
#[cfg(not(windows))]
pub type PlatformSource = UnsupportedSource;

/// Return the process data for this host
pub fn procs() -> CollectResult<ProcessSnapshot> {
    winstatus_core::take_snapshot(&PlatformSource::default())
}

/// Register the status module against this platform's source
pub fn load_status_module(
    capabilities: &Capabilities,
) -> CollectResult<StatusModule<PlatformSource>> {
    StatusModule::load(capabilities, PlatformSource::default())
}
