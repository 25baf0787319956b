// Window discovery: visible top-level windows by title or owning process

use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use windows::core::BOOL;
use windows::Win32::Foundation::{CloseHandle, HANDLE, HWND, LPARAM};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W, TH32CS_SNAPPROCESS,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId, IsWindowVisible,
};

use super::to_handle;
use crate::capture::WindowHandle;

/// A visible top-level window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
    pub process_id: u32,
}

/// All visible top-level windows that have a title, in Z order.
pub fn list_windows() -> Vec<WindowInfo> {
    enumerate_visible(|_| true)
}

/// Visible windows whose title contains `title_substring` (case-insensitive).
pub fn find_windows_by_title(title_substring: &str) -> Vec<WindowInfo> {
    let needle = title_substring.to_lowercase();
    enumerate_visible(|info| info.title.to_lowercase().contains(&needle))
}

/// The `index`-th visible window (Z order, default 0) owned by a process
/// whose executable name is `process_name` (case-insensitive).
///
/// # Examples
/// ```no_run
/// # use windowshot::find_window;
/// let first = find_window("notepad.exe", None).unwrap();
/// let second = find_window("notepad.exe", Some(1)).unwrap();
/// ```
pub fn find_window(process_name: &str, index: Option<usize>) -> Result<WindowHandle> {
    let owners = ProcessSnapshot::take()?.ids_named(process_name);
    if owners.is_empty() {
        bail!("no running process named \"{process_name}\"");
    }

    let index = index.unwrap_or(0);
    let mut owned = enumerate_visible(|info| owners.contains(&info.process_id));
    let found = owned.len();
    if index >= found {
        bail!("\"{process_name}\" has {found} visible window(s); index {index} requested");
    }
    Ok(owned.swap_remove(index).handle)
}

/// Toolhelp process snapshot, closed on drop.
struct ProcessSnapshot(HANDLE);

impl ProcessSnapshot {
    fn take() -> Result<Self> {
        // SAFETY: plain Win32 call; ownership of the handle moves into Self
        let handle = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .context("CreateToolhelp32Snapshot failed")?;
        Ok(Self(handle))
    }

    /// Ids of every process in the snapshot whose image name equals `name`.
    fn ids_named(&self, name: &str) -> HashSet<u32> {
        let mut ids = HashSet::new();
        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        // SAFETY: self.0 is a live snapshot and entry.dwSize is initialized
        let mut more = unsafe { Process32FirstW(self.0, &mut entry) }.is_ok();
        while more {
            let len = entry
                .szExeFile
                .iter()
                .position(|&c| c == 0)
                .unwrap_or(entry.szExeFile.len());
            if String::from_utf16_lossy(&entry.szExeFile[..len]).eq_ignore_ascii_case(name) {
                ids.insert(entry.th32ProcessID);
            }
            more = unsafe { Process32NextW(self.0, &mut entry) }.is_ok();
        }
        ids
    }
}

impl Drop for ProcessSnapshot {
    fn drop(&mut self) {
        // SAFETY: the handle came from CreateToolhelp32Snapshot and is closed once
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

// --- Window enumeration ---

fn enumerate_visible(filter: impl Fn(&WindowInfo) -> bool) -> Vec<WindowInfo> {
    let mut ctx = EnumCtx {
        filter: &filter,
        results: Vec::new(),
    };

    // SAFETY: ctx outlives the synchronous EnumWindows call
    unsafe {
        let _ = EnumWindows(Some(enum_window_proc), LPARAM(&mut ctx as *mut _ as isize));
    }

    ctx.results
}

struct EnumCtx<'a> {
    filter: &'a dyn Fn(&WindowInfo) -> bool,
    results: Vec<WindowInfo>,
}

unsafe extern "system" fn enum_window_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam points to an EnumCtx on the caller's stack in enumerate_visible().
    // The callback executes synchronously on the same thread.
    let ctx = &mut *(lparam.0 as *mut EnumCtx);

    if !IsWindowVisible(hwnd).as_bool() {
        return BOOL(1);
    }

    let title = window_title(hwnd);
    if title.is_empty() {
        return BOOL(1);
    }

    let mut pid = 0u32;
    GetWindowThreadProcessId(hwnd, Some(&mut pid));
    if pid == 0 {
        return BOOL(1);
    }

    let info = WindowInfo {
        handle: to_handle(hwnd),
        title,
        process_id: pid,
    };
    if (ctx.filter)(&info) {
        ctx.results.push(info);
    }

    BOOL(1)
}

unsafe fn window_title(hwnd: HWND) -> String {
    let len = GetWindowTextLengthW(hwnd);
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; len as usize + 1];
    let copied = GetWindowTextW(hwnd, &mut buf);
    String::from_utf16_lossy(&buf[..copied.max(0) as usize])
}
