//! Process snapshot collection
//!
//! Walks every process the source reports and maps it to a [`ProcessRecord`].
//! Only a failure to enumerate fails the call; anything that goes wrong while
//! inspecting one process degrades that process's record and is logged.

use crate::error::{CollectResult, OwnerLookupError};
use crate::models::{Owner, OwnerReply, OwnerStatus, ProcessRecord, ProcessSnapshot, RawProcess};
use crate::source::{EnumerationContext, ProcessSource};
use tracing::{debug, warn};

/// PID of the System Idle Process
pub const IDLE_PID: u32 = 0;
/// PID of the kernel System process
pub const SYSTEM_PID: u32 = 4;

/// Whether `pid` is one of the two kernel-level processes whose owner can
/// never be queried
pub fn is_system_pid(pid: u32) -> bool {
    pid == IDLE_PID || pid == SYSTEM_PID
}

/// Take a snapshot of all processes the source can see
///
/// The enumeration context lives for the duration of this call only and is
/// dropped on every return path.
pub fn take_snapshot<S: ProcessSource>(source: &S) -> CollectResult<ProcessSnapshot> {
    let mut context = source.acquire()?;
    let processes = context.processes()?;

    let mut snapshot = ProcessSnapshot::with_capacity(processes.len());
    for raw in &processes {
        let owner = context.owner(raw);
        snapshot.insert(raw.pid, extract_fields(raw, owner));
    }

    debug!(
        processes = snapshot.len(),
        unowned = snapshot.unowned_count(),
        "collected process snapshot"
    );

    Ok(snapshot)
}

/// Build the record for one process from its raw attributes and owner lookup
pub fn extract_fields(
    raw: &RawProcess,
    owner_lookup: Result<OwnerReply, OwnerLookupError>,
) -> ProcessRecord {
    let owner = match resolve_owner(raw.pid, owner_lookup) {
        Ok(owner) => Some(owner),
        Err(e) => {
            warn!(
                pid = raw.pid,
                "Error getting owner of process; PID={}; Error: {}",
                raw.pid,
                e
            );
            None
        }
    };

    ProcessRecord {
        command_line: raw.command_line.clone().unwrap_or_default(),
        name: raw.name.clone(),
        owner,
    }
}

/// Turn an owner lookup result into an [`Owner`]
///
/// The idle and System processes always deny owner queries; for them an
/// access-denied status maps to `NT AUTHORITY\SYSTEM` whatever partial names
/// came back.
pub fn resolve_owner(
    pid: u32,
    owner_lookup: Result<OwnerReply, OwnerLookupError>,
) -> Result<Owner, OwnerLookupError> {
    let reply = owner_lookup?;

    if is_system_pid(pid) && reply.status == OwnerStatus::AccessDenied {
        return Ok(Owner::system());
    }

    if !reply.status.is_success() {
        return Err(OwnerLookupError::Status(reply.status));
    }

    match (reply.user, reply.domain) {
        (Some(user), Some(user_domain)) => Ok(Owner { user, user_domain }),
        _ => Err(OwnerLookupError::MissingName),
    }
}
