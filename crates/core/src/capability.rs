//! Registration-time capability gate
//!
//! The plugin host probes the environment once at load time and passes the
//! resulting [`Capabilities`] to whoever registers the status module.

use crate::error::{MissingBinding, Unavailable};

/// Name the module registers under when it is usable
pub const VIRTUAL_NAME: &str = "status";

/// Host operating system family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Other(String),
}

impl HostOs {
    /// The OS this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else {
            HostOs::Other(std::env::consts::OS.to_string())
        }
    }
}

impl std::fmt::Display for HostOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostOs::Windows => write!(f, "windows"),
            HostOs::Other(os) => write!(f, "{}", os),
        }
    }
}

/// Result of the load-time environment probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub os: HostOs,
    pub bindings: Result<(), MissingBinding>,
}

impl Capabilities {
    pub fn new(os: HostOs, bindings: Result<(), MissingBinding>) -> Self {
        Self { os, bindings }
    }

    /// Whether the status module may be registered
    pub fn check(&self) -> Result<(), Unavailable> {
        if let HostOs::Other(os) = &self.os {
            return Err(Unavailable::UnsupportedOs { os: os.clone() });
        }
        self.bindings.clone().map_err(Unavailable::MissingBinding)
    }

    pub fn is_available(&self) -> bool {
        self.check().is_ok()
    }

    /// The name to register under, or `None` when the module must stay hidden
    pub fn virtual_name(&self) -> Option<&'static str> {
        self.is_available().then_some(VIRTUAL_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing() -> MissingBinding {
        MissingBinding {
            library: "advapi32.dll".to_string(),
            symbol: "LookupAccountSidW".to_string(),
            message: "The specified module could not be found.".to_string(),
        }
    }

    #[test]
    fn test_windows_with_bindings_is_available() {
        let caps = Capabilities::new(HostOs::Windows, Ok(()));
        assert!(caps.check().is_ok());
        assert_eq!(caps.virtual_name(), Some("status"));
    }

    #[test]
    fn test_other_os_is_unavailable() {
        let caps = Capabilities::new(HostOs::Other("linux".to_string()), Ok(()));
        assert_eq!(
            caps.check(),
            Err(Unavailable::UnsupportedOs {
                os: "linux".to_string()
            })
        );
        assert_eq!(caps.virtual_name(), None);
    }

    #[test]
    fn test_missing_binding_is_unavailable() {
        let caps = Capabilities::new(HostOs::Windows, Err(missing()));
        assert_eq!(caps.check(), Err(Unavailable::MissingBinding(missing())));
        assert!(!caps.is_available());
        assert!(caps
            .check()
            .unwrap_err()
            .to_string()
            .contains("LookupAccountSidW"));
    }

    #[test]
    fn test_os_is_checked_before_bindings() {
        let caps = Capabilities::new(HostOs::Other("macos".to_string()), Err(missing()));
        assert!(matches!(caps.check(), Err(Unavailable::UnsupportedOs { .. })));
    }

    #[test]
    fn test_current_os() {
        assert_eq!(HostOs::current() == HostOs::Windows, cfg!(windows));
    }
}
