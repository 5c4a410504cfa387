//! Command line of a foreign process
//!
//! Reads `RTL_USER_PROCESS_PARAMETERS.CommandLine` out of the target's PEB.
//! Protected processes refuse `PROCESS_VM_READ`; callers treat any error as
//! "no command line".

use crate::error::{WinError, WinResult};
use crate::handle::SafeHandle;
use std::ffi::c_void;
use windows::Win32::Foundation::{HANDLE, NTSTATUS};
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};

// FFI for NtQueryInformationProcess (not exposed in windows crate)
#[link(name = "ntdll")]
extern "system" {
    fn NtQueryInformationProcess(
        ProcessHandle: HANDLE,
        ProcessInformationClass: u32,
        ProcessInformation: *mut c_void,
        ProcessInformationLength: u32,
        ReturnLength: *mut u32,
    ) -> NTSTATUS;
}

const PROCESS_BASIC_INFORMATION_CLASS: u32 = 0;

#[cfg(target_pointer_width = "64")]
const PROCESS_PARAMETERS_OFFSET: usize = 0x20;
#[cfg(target_pointer_width = "32")]
const PROCESS_PARAMETERS_OFFSET: usize = 0x10;

#[cfg(target_pointer_width = "64")]
const COMMAND_LINE_OFFSET: usize = 0x70;
#[cfg(target_pointer_width = "32")]
const COMMAND_LINE_OFFSET: usize = 0x40;

/// PROCESS_BASIC_INFORMATION as returned by NtQueryInformationProcess
#[repr(C)]
struct ProcessBasicInformation {
    reserved1: *mut c_void,
    peb_base_address: *mut c_void,
    reserved2: [*mut c_void; 2],
    unique_process_id: usize,
    reserved3: *mut c_void,
}

#[repr(C)]
struct UnicodeString {
    length: u16,
    maximum_length: u16,
    buffer: *mut u16,
}

/// Read `size_of::<T>()` bytes at `address` in the target process
unsafe fn read_remote<T>(handle: HANDLE, address: usize, what: &'static str) -> WinResult<T> {
    let mut value: T = std::mem::zeroed();
    ReadProcessMemory(
        handle,
        address as *const c_void,
        &mut value as *mut T as *mut c_void,
        std::mem::size_of::<T>(),
        None,
    )
    .map_err(|e| WinError::ApiError {
        api: what,
        message: e.message().to_string(),
    })?;
    Ok(value)
}

/// Get the command line of a process
///
/// Returns an empty string when the process has no command line.
pub fn read_command_line(pid: u32) -> WinResult<String> {
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid)
            .map_err(|e| WinError::from_open("OpenProcess", pid, &e))?;
        let handle = SafeHandle::new(handle);

        let mut pbi: ProcessBasicInformation = std::mem::zeroed();
        let mut return_length: u32 = 0;
        let status = NtQueryInformationProcess(
            handle.raw(),
            PROCESS_BASIC_INFORMATION_CLASS,
            &mut pbi as *mut _ as *mut c_void,
            std::mem::size_of::<ProcessBasicInformation>() as u32,
            &mut return_length,
        );

        if status.0 != 0 {
            return Err(WinError::ApiError {
                api: "NtQueryInformationProcess",
                message: format!("NTSTATUS: 0x{:08X}", status.0),
            });
        }

        if pbi.peb_base_address.is_null() {
            return Err(WinError::ApiError {
                api: "NtQueryInformationProcess",
                message: "PEB address is null".to_string(),
            });
        }

        let params: *mut c_void = read_remote(
            handle.raw(),
            pbi.peb_base_address as usize + PROCESS_PARAMETERS_OFFSET,
            "ReadProcessMemory (ProcessParameters ptr)",
        )?;

        if params.is_null() {
            return Err(WinError::ApiError {
                api: "ReadProcessMemory",
                message: "ProcessParameters is null".to_string(),
            });
        }

        let cmdline_us: UnicodeString = read_remote(
            handle.raw(),
            params as usize + COMMAND_LINE_OFFSET,
            "ReadProcessMemory (CommandLine)",
        )?;

        if cmdline_us.buffer.is_null() || cmdline_us.length == 0 {
            return Ok(String::new());
        }

        // length is in bytes
        let mut buffer: Vec<u16> = vec![0; (cmdline_us.length / 2) as usize];
        ReadProcessMemory(
            handle.raw(),
            cmdline_us.buffer as *const c_void,
            buffer.as_mut_ptr() as *mut c_void,
            cmdline_us.length as usize,
            None,
        )
        .map_err(|e| WinError::ApiError {
            api: "ReadProcessMemory (cmdline string)",
            message: e.message().to_string(),
        })?;

        Ok(winstatus_core::encoding::from_wide(&buffer).trim().to_string())
    }
}
