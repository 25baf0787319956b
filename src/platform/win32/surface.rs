// GDI drawing-surface bundle: window DC + compatible memory DC + bitmap

use std::ffi::c_void;
use std::mem::size_of;

use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDIBits,
    GetWindowDC, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS,
    HBITMAP, HDC, HGDIOBJ, SRCCOPY,
};
use windows::Win32::Storage::Xps::{PrintWindow, PRINT_WINDOW_FLAGS};
use windows::Win32::UI::WindowsAndMessaging::{SendMessageW, WM_PRINT};

use crate::capture::{CapturedImage, DrawingSurface};
use crate::error::{CaptureError, CaptureResult};

/// `PW_RENDERFULLCONTENT`: include DirectComposition / DirectX content.
const PW_RENDERFULLCONTENT: PRINT_WINDOW_FLAGS = PRINT_WINDOW_FLAGS(2);

// WM_PRINT drawing options
const PRF_NONCLIENT: u32 = 0x0000_0002;
const PRF_CLIENT: u32 = 0x0000_0004;
const PRF_CHILDREN: u32 = 0x0000_0010;

/// Scoped GDI resources for one capture attempt.
///
/// Built step by step in [`GdiSurface::acquire`]; if any step fails, the
/// partially built value is dropped and releases what it already holds.
pub struct GdiSurface {
    hwnd: HWND,
    window_dc: HDC,
    mem_dc: HDC,
    bitmap: HBITMAP,
    previous: HGDIOBJ,
    width: i32,
    height: i32,
    released: bool,
}

impl GdiSurface {
    pub fn acquire(hwnd: HWND, width: i32, height: i32) -> CaptureResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(CaptureError::surface(
                "size",
                format!("invalid surface size {width}x{height}"),
            ));
        }

        // SAFETY: hwnd is borrowed from the caller; a stale handle yields a null DC
        let window_dc = unsafe { GetWindowDC(Some(hwnd)) };
        if window_dc.0.is_null() {
            return Err(CaptureError::surface("window dc", "GetWindowDC returned null"));
        }

        let mut surface = Self {
            hwnd,
            window_dc,
            mem_dc: HDC::default(),
            bitmap: HBITMAP::default(),
            previous: HGDIOBJ::default(),
            width,
            height,
            released: false,
        };

        // SAFETY: window_dc is a valid DC owned by `surface` until release()
        surface.mem_dc = unsafe { CreateCompatibleDC(Some(window_dc)) };
        if surface.mem_dc.0.is_null() {
            return Err(CaptureError::surface("memory dc", "CreateCompatibleDC failed"));
        }

        surface.bitmap = unsafe { CreateCompatibleBitmap(window_dc, width, height) };
        if surface.bitmap.0.is_null() {
            return Err(CaptureError::surface(
                "bitmap",
                format!("CreateCompatibleBitmap failed for {width}x{height}"),
            ));
        }

        surface.previous = unsafe { SelectObject(surface.mem_dc, surface.bitmap.into()) };
        if surface.previous.0.is_null() {
            return Err(CaptureError::surface("select", "SelectObject failed"));
        }

        Ok(surface)
    }
}

impl DrawingSurface for GdiSurface {
    fn copy_from_window(&mut self) -> bool {
        // SAFETY: both DCs are live while the surface is not released
        unsafe {
            BitBlt(
                self.mem_dc,
                0,
                0,
                self.width,
                self.height,
                Some(self.window_dc),
                0,
                0,
                SRCCOPY,
            )
        }
        .is_ok()
    }

    fn request_render(&mut self) -> bool {
        unsafe { PrintWindow(self.hwnd, self.mem_dc, PW_RENDERFULLCONTENT) }.as_bool()
    }

    fn request_paint(&mut self) -> bool {
        // The return value of WM_PRINT is unspecified; the message is synchronous
        unsafe {
            let _ = SendMessageW(
                self.hwnd,
                WM_PRINT,
                Some(WPARAM(self.mem_dc.0 as usize)),
                Some(LPARAM((PRF_CLIENT | PRF_NONCLIENT | PRF_CHILDREN) as isize)),
            );
        }
        true
    }

    fn extract_pixels(&self) -> CaptureResult<CapturedImage> {
        let mut info = BITMAPINFO::default();
        info.bmiHeader.biSize = size_of::<BITMAPINFOHEADER>() as u32;
        info.bmiHeader.biWidth = self.width;
        // Negative height: top-down rows
        info.bmiHeader.biHeight = -self.height;
        info.bmiHeader.biPlanes = 1;
        info.bmiHeader.biBitCount = 32;
        info.bmiHeader.biCompression = BI_RGB.0;

        let stride = self.width as usize * 4;
        let mut buffer = vec![0u8; stride * self.height as usize];

        // GetDIBits requires the bitmap not to be selected into a DC
        let lines = unsafe {
            let _ = SelectObject(self.mem_dc, self.previous);
            let lines = GetDIBits(
                self.mem_dc,
                self.bitmap,
                0,
                self.height as u32,
                Some(buffer.as_mut_ptr() as *mut c_void),
                &mut info,
                DIB_RGB_COLORS,
            );
            let _ = SelectObject(self.mem_dc, self.bitmap.into());
            lines
        };

        if lines != self.height {
            return Err(CaptureError::Readback(format!(
                "GetDIBits copied {lines} of {} scan lines",
                self.height
            )));
        }

        CapturedImage::from_bgrx(self.width as u32, self.height as u32, stride, &buffer)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        // SAFETY: each handle is released at most once, in reverse order of creation
        unsafe {
            if !self.previous.0.is_null() {
                let _ = SelectObject(self.mem_dc, self.previous);
            }
            if !self.bitmap.0.is_null() {
                let _ = DeleteObject(self.bitmap.into());
            }
            if !self.mem_dc.0.is_null() {
                let _ = DeleteDC(self.mem_dc);
            }
            if !self.window_dc.0.is_null() {
                let _ = ReleaseDC(Some(self.hwnd), self.window_dc);
            }
        }
    }
}

impl Drop for GdiSurface {
    fn drop(&mut self) {
        self.release();
    }
}
