//! JSON rendering for snapshots

use crate::models::ProcessSnapshot;
use serde_json::Value;

/// Render the snapshot as a JSON value keyed by PID
pub fn render_json(snapshot: &ProcessSnapshot) -> serde_json::Result<Value> {
    serde_json::to_value(snapshot)
}

/// Render the snapshot as a pretty-printed JSON string
pub fn render_json_string(snapshot: &ProcessSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

/// Render the snapshot as a compact JSON string (no whitespace)
pub fn render_json_compact(snapshot: &ProcessSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Owner, ProcessRecord};

    fn sample() -> ProcessSnapshot {
        let mut snapshot = ProcessSnapshot::new();
        snapshot.insert(
            1234,
            ProcessRecord {
                command_line: "notepad.exe test.txt".to_string(),
                name: "notepad.exe".to_string(),
                owner: Some(Owner {
                    user: "alice".to_string(),
                    user_domain: "CORP".to_string(),
                }),
            },
        );
        snapshot.insert(
            9000,
            ProcessRecord {
                command_line: String::new(),
                name: "lsass.exe".to_string(),
                owner: None,
            },
        );
        snapshot
    }

    #[test]
    fn test_render_json_shape() {
        let value = render_json(&sample()).unwrap();
        assert_eq!(value["1234"]["cmd"], "notepad.exe test.txt");
        assert_eq!(value["1234"]["user_domain"], "CORP");
        assert!(value["9000"].get("user").is_none());
    }

    #[test]
    fn test_render_json_roundtrip() {
        let json_str = render_json_string(&sample()).unwrap();
        let parsed: ProcessSnapshot = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_render_json_compact_has_no_newlines() {
        let json_str = render_json_compact(&sample()).unwrap();
        assert!(!json_str.contains('\n'));
    }
}
