//! Core domain models for winstatus
//!
//! These types are OS-agnostic. The collector produces [`ProcessSnapshot`]s
//! from the [`RawProcess`] and [`OwnerReply`] values a platform source hands it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Account that owns a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Account name (e.g., "alice", "SYSTEM")
    pub user: String,
    /// Account domain (e.g., "CORP", "NT AUTHORITY")
    pub user_domain: String,
}

impl Owner {
    /// The account reported for the idle and kernel processes
    pub fn system() -> Self {
        Self {
            user: "SYSTEM".to_string(),
            user_domain: "NT AUTHORITY".to_string(),
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.user_domain.is_empty() {
            write!(f, "{}", self.user)
        } else {
            write!(f, "{}\\{}", self.user_domain, self.user)
        }
    }
}

/// Metadata collected for one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Full command line, empty when it could not be read
    #[serde(rename = "cmd")]
    pub command_line: String,
    /// Executable name (not full path)
    pub name: String,
    /// Owning account; absent when the owner lookup failed
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl ProcessRecord {
    pub fn user(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.user.as_str())
    }

    pub fn user_domain(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.user_domain.as_str())
    }
}

/// Point-in-time mapping of PID -> process record
///
/// A fresh snapshot is built on every call; nothing is cached or shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessSnapshot(HashMap<u32, ProcessRecord>);

impl ProcessSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity(capacity))
    }

    /// Insert a record, returning the previous one for this PID if any
    pub fn insert(&mut self, pid: u32, record: ProcessRecord) -> Option<ProcessRecord> {
        self.0.insert(pid, record)
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessRecord> {
        self.0.get(&pid)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pids(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &ProcessRecord)> {
        self.0.iter().map(|(pid, record)| (*pid, record))
    }

    /// Records sorted by PID, for stable display
    pub fn sorted(&self) -> Vec<(u32, &ProcessRecord)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|(pid, _)| *pid);
        entries
    }

    /// Number of records whose owner could not be resolved
    pub fn unowned_count(&self) -> usize {
        self.0.values().filter(|r| r.owner.is_none()).count()
    }
}

/// A process as reported by the enumeration facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProcess {
    /// Process ID
    pub pid: u32,
    /// Executable name
    pub name: String,
    /// Command line, `None` when the facility could not provide one
    pub command_line: Option<String>,
}

/// Return code of an owner lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerStatus {
    Success,
    AccessDenied,
    InsufficientPrivilege,
    UnknownFailure,
    PathNotFound,
    InvalidParameter,
    Other(u32),
}

impl OwnerStatus {
    pub fn is_success(&self) -> bool {
        *self == OwnerStatus::Success
    }
}

impl std::fmt::Display for OwnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwnerStatus::Success => write!(f, "success"),
            OwnerStatus::AccessDenied => write!(f, "access denied (2)"),
            OwnerStatus::InsufficientPrivilege => write!(f, "insufficient privilege (3)"),
            OwnerStatus::UnknownFailure => write!(f, "unknown failure (8)"),
            OwnerStatus::PathNotFound => write!(f, "path not found (9)"),
            OwnerStatus::InvalidParameter => write!(f, "invalid parameter (21)"),
            OwnerStatus::Other(code) => write!(f, "status {}", code),
        }
    }
}

/// The (domain, status, user) triple an owner lookup returns
///
/// Names may be missing or partial when the status is not success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerReply {
    pub domain: Option<String>,
    pub status: OwnerStatus,
    pub user: Option<String>,
}

impl OwnerReply {
    pub fn resolved(domain: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            status: OwnerStatus::Success,
            user: Some(user.into()),
        }
    }

    pub fn failed(status: OwnerStatus) -> Self {
        Self {
            domain: None,
            status,
            user: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: Option<Owner>) -> ProcessRecord {
        ProcessRecord {
            command_line: String::new(),
            name: "svchost.exe".to_string(),
            owner,
        }
    }

    #[test]
    fn test_absent_owner_omits_both_keys() {
        let value = serde_json::to_value(record(None)).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["cmd"], "");
        assert!(!obj.contains_key("user"));
        assert!(!obj.contains_key("user_domain"));
    }

    #[test]
    fn test_owner_is_flattened() {
        let value = serde_json::to_value(record(Some(Owner::system()))).unwrap();
        assert_eq!(value["user"], "SYSTEM");
        assert_eq!(value["user_domain"], "NT AUTHORITY");
    }

    #[test]
    fn test_snapshot_serializes_as_pid_keyed_object() {
        let mut snapshot = ProcessSnapshot::new();
        snapshot.insert(4, record(Some(Owner::system())));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["4"]["name"], "svchost.exe");
    }

    #[test]
    fn test_owner_status_display() {
        assert_eq!(OwnerStatus::AccessDenied.to_string(), "access denied (2)");
        assert_eq!(OwnerStatus::Other(1326).to_string(), "status 1326");
        assert!(OwnerStatus::Success.is_success());
        assert!(!OwnerStatus::InvalidParameter.is_success());
    }

    #[test]
    fn test_owner_display() {
        assert_eq!(Owner::system().to_string(), "NT AUTHORITY\\SYSTEM");
    }

    #[test]
    fn test_sorted_and_unowned_count() {
        let mut snapshot = ProcessSnapshot::new();
        snapshot.insert(1234, record(None));
        snapshot.insert(4, record(Some(Owner::system())));
        let pids: Vec<u32> = snapshot.sorted().iter().map(|(pid, _)| *pid).collect();
        assert_eq!(pids, vec![4, 1234]);
        assert_eq!(snapshot.unowned_count(), 1);
    }
}
