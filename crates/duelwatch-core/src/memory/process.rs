//! Process discovery and read-only handle management.

use crate::error::Result;

/// An open, read-only handle to the target process.
///
/// The handle is opened once at startup and closed exactly once when the
/// value is dropped; callers keep it alive for the whole monitoring
/// lifetime and drop it only after the monitor thread has been joined.
pub struct ProcessHandle {
    #[cfg(target_os = "windows")]
    handle: windows::Win32::Foundation::HANDLE,
    /// Target process ID.
    pub pid: u32,
    /// Load address of the anchor module inside the target process.
    pub module_base: u64,
}

// SAFETY: the handle grants read-only access and the Win32 read APIs are
// thread-safe; the wrapper is only ever shared immutably between threads.
#[cfg(target_os = "windows")]
unsafe impl Send for ProcessHandle {}
#[cfg(target_os = "windows")]
unsafe impl Sync for ProcessHandle {}

#[cfg(target_os = "windows")]
mod imp {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, Module32NextW,
        PROCESSENTRY32W, Process32FirstW, Process32NextW, TH32CS_SNAPMODULE,
        TH32CS_SNAPMODULE32, TH32CS_SNAPPROCESS,
    };
    use windows::Win32::System::Threading::{
        OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
    };

    use super::ProcessHandle;
    use crate::config::target;
    use crate::error::{Error, Result};

    impl ProcessHandle {
        /// Find the target process and open it for reading.
        ///
        /// Discovery resolves the process ID by executable name and the
        /// anchor module's load address by module name. Either lookup
        /// failing is fatal to startup; there is nothing to monitor
        /// without a live target.
        pub fn find_and_open() -> Result<Self> {
            let pid = find_process_id(target::PROCESS_NAME)?;
            let module_base = find_module_base(pid, target::MODULE_NAME)?;

            // SAFETY: OpenProcess returns an owned handle; it is closed in Drop.
            let handle =
                unsafe { OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid) }
                    .map_err(|e| Error::ProcessOpenFailed(e.to_string()))?;

            Ok(Self {
                handle,
                pid,
                module_base,
            })
        }

        pub(crate) fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
            let mut buffer = vec![0u8; len];
            let mut bytes_read = 0usize;

            // SAFETY: the buffer outlives the call and is exactly `len` bytes.
            unsafe {
                ReadProcessMemory(
                    self.handle,
                    address as *const core::ffi::c_void,
                    buffer.as_mut_ptr().cast(),
                    len,
                    Some(&mut bytes_read),
                )
            }
            .map_err(|e| Error::MemoryReadFailed {
                address,
                message: e.to_string(),
            })?;

            if bytes_read != len {
                return Err(Error::MemoryReadFailed {
                    address,
                    message: format!("short read: {bytes_read} of {len} bytes"),
                });
            }

            Ok(buffer)
        }
    }

    impl Drop for ProcessHandle {
        fn drop(&mut self) {
            // SAFETY: the handle was opened by find_and_open and is closed
            // only here.
            unsafe {
                let _ = CloseHandle(self.handle);
            }
        }
    }

    fn utf16_to_string(raw: &[u16]) -> String {
        let len = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
        String::from_utf16_lossy(&raw[..len])
    }

    /// Resolve a process ID from an executable name via a Toolhelp snapshot.
    fn find_process_id(name: &str) -> Result<u32> {
        // SAFETY: the snapshot handle is closed before returning.
        unsafe {
            let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)
                .map_err(|e| Error::ProcessOpenFailed(e.to_string()))?;

            let mut entry = PROCESSENTRY32W {
                dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
                ..Default::default()
            };

            let mut found = None;
            if Process32FirstW(snapshot, &mut entry).is_ok() {
                loop {
                    if utf16_to_string(&entry.szExeFile).eq_ignore_ascii_case(name) {
                        found = Some(entry.th32ProcessID);
                        break;
                    }
                    if Process32NextW(snapshot, &mut entry).is_err() {
                        break;
                    }
                }
            }

            let _ = CloseHandle(snapshot);
            found.ok_or_else(|| Error::ProcessNotFound(name.to_string()))
        }
    }

    /// Resolve a module's load address inside `pid` via a module snapshot.
    ///
    /// The module snapshot carries both the name and the base address, so
    /// no extra handle or psapi call is needed.
    fn find_module_base(pid: u32, module_name: &str) -> Result<u64> {
        // SAFETY: the snapshot handle is closed before returning.
        unsafe {
            let snapshot =
                CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid)
                    .map_err(|e| Error::ProcessOpenFailed(e.to_string()))?;

            let mut entry = MODULEENTRY32W {
                dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
                ..Default::default()
            };

            let mut found = None;
            if Module32FirstW(snapshot, &mut entry).is_ok() {
                loop {
                    if utf16_to_string(&entry.szModule).eq_ignore_ascii_case(module_name) {
                        found = Some(entry.modBaseAddr as u64);
                        break;
                    }
                    if Module32NextW(snapshot, &mut entry).is_err() {
                        break;
                    }
                }
            }

            let _ = CloseHandle(snapshot);
            found.ok_or_else(|| Error::ModuleNotFound(module_name.to_string()))
        }
    }
}

#[cfg(not(target_os = "windows"))]
impl ProcessHandle {
    /// Stub so the workspace builds and tests run on non-Windows hosts.
    pub fn find_and_open() -> Result<Self> {
        Err(crate::error::Error::Unsupported(
            "process attach is only supported on Windows",
        ))
    }

    pub(crate) fn read_bytes(&self, _address: u64, _len: usize) -> Result<Vec<u8>> {
        Err(crate::error::Error::Unsupported(
            "process attach is only supported on Windows",
        ))
    }
}
