//! Owner lookup for a process
//!
//! Opens the process token, reads its `TokenUser` SID and resolves it to an
//! account name and domain. Access-denied failures are reported as an
//! [`OwnerStatus`] rather than an error, the way WMI's `GetOwner` does.

use crate::error::{WinError, E_INSUFFICIENT_BUFFER};
use crate::handle::SafeHandle;
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::{HANDLE, PSID};
use windows::Win32::Security::{
    GetTokenInformation, LookupAccountSidW, TokenUser, SID_NAME_USE, TOKEN_QUERY, TOKEN_USER,
};
use windows::Win32::System::Threading::{
    OpenProcess, OpenProcessToken, PROCESS_QUERY_LIMITED_INFORMATION,
};
use winstatus_core::collector::IDLE_PID;
use winstatus_core::encoding::from_wide;
use winstatus_core::{OwnerLookupError, OwnerReply, OwnerStatus};

/// Initial name and domain buffer size, in UTF-16 units
const ACCOUNT_BUF_LEN: u32 = 256;

/// Query the owning account of a process
pub fn lookup_owner(pid: u32) -> Result<OwnerReply, OwnerLookupError> {
    // PID 0 has no process object to open
    if pid == IDLE_PID {
        return Ok(OwnerReply::failed(OwnerStatus::AccessDenied));
    }

    match query_token_owner(pid) {
        Ok((domain, user)) => Ok(OwnerReply::resolved(domain, user)),
        Err(e) if e.is_access_denied() => Ok(OwnerReply::failed(OwnerStatus::AccessDenied)),
        Err(e) => Err(e.into()),
    }
}

/// Resolve the token user of `pid` to (domain, name)
fn query_token_owner(pid: u32) -> Result<(String, String), WinError> {
    let token_info = token_user(pid)?;
    // SAFETY: token_info holds a TOKEN_USER written by GetTokenInformation
    let sid = unsafe { (*(token_info.as_ptr() as *const TOKEN_USER)).User.Sid };
    lookup_account(sid, ACCOUNT_BUF_LEN, ACCOUNT_BUF_LEN)
}

/// Read the `TokenUser` information of `pid`'s primary token
fn token_user(pid: u32) -> Result<Vec<u8>, WinError> {
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid)
            .map_err(|e| WinError::from_open("OpenProcess", pid, &e))?;
        let process = SafeHandle::new(handle);

        let mut token_handle = HANDLE::default();
        OpenProcessToken(process.raw(), TOKEN_QUERY, &mut token_handle)
            .map_err(|e| WinError::from_open("OpenProcessToken", pid, &e))?;
        let token = SafeHandle::new(token_handle);

        // Get token user info size
        let mut token_info_len = 0u32;
        let _ = GetTokenInformation(token.raw(), TokenUser, None, 0, &mut token_info_len);

        if token_info_len == 0 {
            return Err(WinError::ApiError {
                api: "GetTokenInformation",
                message: "Failed to get token info size".to_string(),
            });
        }

        let mut token_info: Vec<u8> = vec![0; token_info_len as usize];
        GetTokenInformation(
            token.raw(),
            TokenUser,
            Some(token_info.as_mut_ptr() as *mut _),
            token_info_len,
            &mut token_info_len,
        )
        .map_err(|e| WinError::ApiError {
            api: "GetTokenInformation",
            message: e.message().to_string(),
        })?;

        Ok(token_info)
    }
}

/// Resolve `sid` to (domain, name)
///
/// Starts with buffers of the given sizes. If they are too small the call is
/// retried once with the sizes `LookupAccountSidW` reports back.
fn lookup_account(sid: PSID, name_cap: u32, domain_cap: u32) -> Result<(String, String), WinError> {
    let (mut name_cap, mut domain_cap) = (name_cap, domain_cap);

    for _ in 0..2 {
        let mut name_buf = vec![0u16; name_cap as usize];
        let mut domain_buf = vec![0u16; domain_cap as usize];
        let mut name_len = name_cap;
        let mut domain_len = domain_cap;
        let mut sid_type = SID_NAME_USE::default();

        let result = unsafe {
            LookupAccountSidW(
                PCWSTR::null(),
                sid,
                PWSTR(name_buf.as_mut_ptr()),
                &mut name_len,
                PWSTR(domain_buf.as_mut_ptr()),
                &mut domain_len,
                &mut sid_type,
            )
        };

        match result {
            Ok(()) => {
                let domain = from_wide(&domain_buf[..domain_len as usize]);
                let name = from_wide(&name_buf[..name_len as usize]);
                return Ok((domain, name));
            }
            Err(e) if e.code().0 as u32 == E_INSUFFICIENT_BUFFER => {
                // On this error the lengths hold the required sizes
                name_cap = name_len.max(name_cap);
                domain_cap = domain_len.max(domain_cap);
            }
            Err(e) => {
                return Err(WinError::ApiError {
                    api: "LookupAccountSidW",
                    message: e.message().to_string(),
                });
            }
        }
    }

    Err(WinError::ApiError {
        api: "LookupAccountSidW",
        message: format!(
            "account name still does not fit in {} / {} characters",
            name_cap, domain_cap
        ),
    })
}
