//! RAII wrapper for Win32 handles

use windows::Win32::Foundation::{CloseHandle, HANDLE};

/// Closes the wrapped process, token or snapshot handle on drop
pub(crate) struct SafeHandle(HANDLE);

impl SafeHandle {
    pub(crate) fn new(handle: HANDLE) -> Self {
        Self(handle)
    }

    pub(crate) fn raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for SafeHandle {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }
}
