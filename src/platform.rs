// OS backends for the capture engine

#[cfg(windows)]
pub mod win32;
