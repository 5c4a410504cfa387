//! SeDebugPrivilege handling
//!
//! With SeDebugPrivilege enabled, an elevated collector can open the tokens
//! and PEBs of services running under other accounts, so fewer records come
//! back without an owner or command line.

use crate::error::{WinError, WinResult};
use crate::handle::SafeHandle;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{HANDLE, LUID};
use windows::Win32::Security::{
    AdjustTokenPrivileges, LookupPrivilegeValueW, LUID_AND_ATTRIBUTES, SE_DEBUG_NAME,
    SE_PRIVILEGE_ENABLED, TOKEN_ADJUST_PRIVILEGES, TOKEN_PRIVILEGES, TOKEN_QUERY,
};
use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

/// Try to enable SeDebugPrivilege for the current process
///
/// Returns Ok(true) if enabled, Ok(false) if the account does not hold the
/// privilege, or Err on API failure.
pub fn try_enable_debug_privilege() -> WinResult<bool> {
    unsafe {
        let mut token_handle = HANDLE::default();
        OpenProcessToken(
            GetCurrentProcess(),
            TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY,
            &mut token_handle,
        )
        .map_err(|e| WinError::ApiError {
            api: "OpenProcessToken",
            message: e.message().to_string(),
        })?;
        let token = SafeHandle::new(token_handle);

        let mut luid = LUID::default();
        LookupPrivilegeValueW(PCWSTR::null(), SE_DEBUG_NAME, &mut luid).map_err(|e| {
            WinError::ApiError {
                api: "LookupPrivilegeValueW",
                message: e.message().to_string(),
            }
        })?;

        let privileges = TOKEN_PRIVILEGES {
            PrivilegeCount: 1,
            Privileges: [LUID_AND_ATTRIBUTES {
                Luid: luid,
                Attributes: SE_PRIVILEGE_ENABLED,
            }],
        };

        if AdjustTokenPrivileges(token.raw(), false, Some(&privileges), 0, None, None).is_err() {
            return Ok(false);
        }

        // AdjustTokenPrivileges succeeds with ERROR_NOT_ALL_ASSIGNED when the
        // privilege is not held
        let last_error = windows::core::Error::from_win32();
        Ok(last_error.code().0 == 0)
    }
}
