//! Load-time probe for the native bindings the collector calls

use tracing::error;
use winstatus_core::{Capabilities, HostOs, MissingBinding};

/// A native entry point the collector depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub library: &'static str,
    pub symbol: &'static str,
}

/// Everything the snapshot, owner and command-line paths call into
pub const REQUIRED_BINDINGS: &[Binding] = &[
    Binding {
        library: "kernel32.dll",
        symbol: "CreateToolhelp32Snapshot",
    },
    Binding {
        library: "kernel32.dll",
        symbol: "Process32FirstW",
    },
    Binding {
        library: "kernel32.dll",
        symbol: "ReadProcessMemory",
    },
    Binding {
        library: "advapi32.dll",
        symbol: "OpenProcessToken",
    },
    Binding {
        library: "advapi32.dll",
        symbol: "GetTokenInformation",
    },
    Binding {
        library: "advapi32.dll",
        symbol: "LookupAccountSidW",
    },
    Binding {
        library: "ntdll.dll",
        symbol: "NtQueryInformationProcess",
    },
];

/// Probe the host once and describe whether the status module can run
pub fn probe() -> Capabilities {
    probe_with(HostOs::current(), REQUIRED_BINDINGS)
}

/// Build the capabilities of `os` given the bindings the collector needs
///
/// Bindings are only resolved on Windows. A missing one is logged at error
/// level, naming the library and symbol; other hosts are refused silently.
pub fn probe_with(os: HostOs, required: &[Binding]) -> Capabilities {
    let bindings = if os == HostOs::Windows {
        check_bindings(required)
    } else {
        Ok(())
    };

    if let Err(missing) = &bindings {
        error!(
            library = %missing.library,
            symbol = %missing.symbol,
            "{} is required in order to use the status module",
            missing.library
        );
    }

    Capabilities::new(os, bindings)
}

/// Check that every binding can be resolved, stopping at the first miss
pub fn check_bindings(bindings: &[Binding]) -> Result<(), MissingBinding> {
    bindings.iter().try_for_each(|b| resolve(*b))
}

#[cfg(windows)]
fn resolve(binding: Binding) -> Result<(), MissingBinding> {
    use windows::core::{PCSTR, PCWSTR};
    use windows::Win32::Foundation::FreeLibrary;
    use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

    let missing = |message: String| MissingBinding {
        library: binding.library.to_string(),
        symbol: binding.symbol.to_string(),
        message,
    };

    let library: Vec<u16> = binding
        .library
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect();
    let symbol = format!("{}\0", binding.symbol);

    unsafe {
        let module = LoadLibraryW(PCWSTR(library.as_ptr()))
            .map_err(|e| missing(e.message().to_string()))?;

        // Read the last error before FreeLibrary can overwrite it
        let resolved = match GetProcAddress(module, PCSTR(symbol.as_ptr())) {
            Some(_) => Ok(()),
            None => Err(missing(
                windows::core::Error::from_win32().message().to_string(),
            )),
        };
        let _ = FreeLibrary(module);

        resolved
    }
}

#[cfg(not(windows))]
fn resolve(binding: Binding) -> Result<(), MissingBinding> {
    Err(MissingBinding {
        library: binding.library.to_string(),
        symbol: binding.symbol.to_string(),
        message: "Win32 libraries are not available on this platform".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Shared buffer that captures formatted tracing output
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn probe_logged(os: HostOs, required: &[Binding]) -> (Capabilities, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let caps = tracing::subscriber::with_default(subscriber, || probe_with(os, required));
        let output = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
        (caps, output)
    }

    const BOGUS: Binding = Binding {
        library: "kernel32.dll",
        symbol: "NoSuchExportForWinstatus",
    };

    #[test]
    fn test_probe_matches_platform() {
        let caps = probe();
        assert_eq!(caps.is_available(), cfg!(windows));
        assert_eq!(caps.virtual_name().is_some(), cfg!(windows));
    }

    #[test]
    fn test_missing_binding_on_windows_is_logged() {
        let (caps, logs) = probe_logged(HostOs::Windows, &[BOGUS]);

        assert!(!caps.is_available());
        assert!(logs.contains("ERROR"), "expected an error, got: {logs}");
        assert!(logs.contains("kernel32.dll"), "error should name the library: {logs}");
        assert!(
            logs.contains("NoSuchExportForWinstatus"),
            "error should name the symbol: {logs}"
        );
    }

    #[test]
    fn test_other_os_is_refused_silently() {
        let (caps, logs) = probe_logged(HostOs::Other("linux".to_string()), &[BOGUS]);

        assert_eq!(caps.virtual_name(), None);
        assert_eq!(caps.bindings, Ok(()));
        assert!(logs.is_empty(), "unexpected log output: {logs}");
    }

    #[test]
    fn test_empty_binding_list_is_satisfied() {
        assert!(check_bindings(&[]).is_ok());
    }

    #[test]
    fn test_unknown_symbol_is_reported() {
        let err = check_bindings(&[BOGUS]).unwrap_err();
        assert_eq!(err.library, "kernel32.dll");
        assert_eq!(err.symbol, "NoSuchExportForWinstatus");
    }

    #[cfg(windows)]
    #[test]
    fn test_unknown_symbol_keeps_lookup_error() {
        let err = check_bindings(&[BOGUS]).unwrap_err();
        let success = windows::core::HRESULT(0).message().to_string();
        assert!(!err.message.is_empty());
        assert_ne!(err.message, success, "last error was overwritten");
    }

    #[cfg(windows)]
    #[test]
    fn test_required_bindings_resolve() {
        assert_eq!(check_bindings(REQUIRED_BINDINGS), Ok(()));
    }
}
