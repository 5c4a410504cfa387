//! Process enumeration using CreateToolhelp32Snapshot
//!
//! The snapshot handle is the enumeration context: it is taken when the
//! context is acquired, so every process walked belongs to the same instant.

use crate::command_line::read_command_line;
use crate::error::WinError;
use crate::handle::SafeHandle;
use crate::owner::lookup_owner;
use tracing::debug;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};
use winstatus_core::collector::is_system_pid;
use winstatus_core::encoding::from_wide;
use winstatus_core::{
    CollectError, CollectResult, EnumerationContext, OwnerLookupError, OwnerReply, ProcessSource,
    RawProcess,
};

/// Process source backed by the Toolhelp API
#[derive(Debug, Clone, Default)]
pub struct ToolhelpSource;

impl ToolhelpSource {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessSource for ToolhelpSource {
    type Context = ToolhelpContext;

    fn acquire(&self) -> CollectResult<ToolhelpContext> {
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map_err(|e| WinError::SnapshotFailed(e.message().to_string()))?;

        Ok(ToolhelpContext {
            snapshot: SafeHandle::new(snapshot),
        })
    }
}

/// An open process snapshot; closed on drop
pub struct ToolhelpContext {
    snapshot: SafeHandle,
}

impl EnumerationContext for ToolhelpContext {
    fn processes(&mut self) -> CollectResult<Vec<RawProcess>> {
        let mut processes = Vec::new();

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        unsafe {
            Process32FirstW(self.snapshot.raw(), &mut entry).map_err(|e| {
                CollectError::Enumeration {
                    api: "Process32FirstW",
                    message: e.message().to_string(),
                }
            })?;

            loop {
                let pid = entry.th32ProcessID;
                processes.push(RawProcess {
                    pid,
                    name: from_wide(&entry.szExeFile),
                    command_line: command_line_of(pid),
                });

                if Process32NextW(self.snapshot.raw(), &mut entry).is_err() {
                    break;
                }
            }
        }

        Ok(processes)
    }

    fn owner(&mut self, process: &RawProcess) -> Result<OwnerReply, OwnerLookupError> {
        lookup_owner(process.pid)
    }
}

/// Command line of `pid`, or `None` when it cannot be read
fn command_line_of(pid: u32) -> Option<String> {
    // The idle and System processes have no user-mode PEB
    if is_system_pid(pid) {
        return None;
    }

    match read_command_line(pid) {
        Ok(cmdline) if !cmdline.is_empty() => Some(cmdline),
        Ok(_) => None,
        Err(e) => {
            debug!(pid, error = %e, "command line unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winstatus_core::take_snapshot;

    #[test]
    fn test_enumerates_current_process() {
        let mut context = ToolhelpSource::new().acquire().expect("snapshot");
        let processes = context.processes().expect("walk");

        assert!(!processes.is_empty());
        assert!(processes.iter().any(|p| p.pid == std::process::id()));
        assert!(processes.iter().any(|p| p.pid == 0 || p.pid == 4));
    }

    #[test]
    fn test_snapshot_contains_current_process() {
        let snapshot = take_snapshot(&ToolhelpSource::new()).expect("snapshot");
        let me = snapshot.get(std::process::id()).expect("current process");

        assert!(!me.name.is_empty());
        assert!(!me.command_line.is_empty());
        assert!(me.owner.is_some());
    }

    #[test]
    fn test_system_process_owner() {
        let snapshot = take_snapshot(&ToolhelpSource::new()).expect("snapshot");
        if let Some(system) = snapshot.get(4) {
            assert_eq!(system.user(), Some("SYSTEM"));
            assert_eq!(system.command_line, "");
        }
    }
}
