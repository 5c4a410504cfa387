//! winstatus-core: OS-agnostic process snapshot collector for winstatus
//!
//! This crate contains the collector algorithm, its domain models, the
//! registration gate and the output renderers. Platform crates plug in by
//! implementing [`ProcessSource`].
//!
//! # Modules
//!
//! - [`models`] - Snapshot data structures (ProcessRecord, Owner, OwnerReply, etc.)
//! - [`collector`] - Snapshot collection and per-process field extraction
//! - [`capability`] - Load-time environment probe result
//! - [`module`] - The `status` module and its named functions
//! - [`render`] - Output formatters (JSON, table)

pub mod capability;
pub mod collector;
pub mod encoding;
pub mod error;
pub mod models;
pub mod module;
pub mod render;
pub mod source;

// Re-export commonly used types at crate root
pub use capability::{Capabilities, HostOs, VIRTUAL_NAME};
pub use collector::{extract_fields, resolve_owner, take_snapshot};
pub use error::{CollectError, CollectResult, MissingBinding, OwnerLookupError, Unavailable};
pub use models::{Owner, OwnerReply, OwnerStatus, ProcessRecord, ProcessSnapshot, RawProcess};
pub use module::StatusModule;
pub use source::{EnumerationContext, ProcessSource};
