// Capture data model: window identity, geometry and owned pixel buffers

use std::fmt;
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{CaptureError, CaptureResult};

/// Opaque identifier of a live OS window.
///
/// Stored as the raw handle value so it can cross thread boundaries; the
/// window itself is never owned by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowHandle {
    raw: isize,
}

impl WindowHandle {
    pub const fn from_raw(raw: isize) -> Self {
        Self { raw }
    }

    pub const fn raw(&self) -> isize {
        self.raw
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.raw as usize as u64)
    }
}

/// Window bounds at the moment of a capture attempt.
///
/// Re-read for every attempt: the window may move or resize in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowGeometry {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowGeometry {
    /// Build from a `left, top, right, bottom` bounding rectangle.
    pub fn from_bounds(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Owned, immutable 3-channel (RGB) pixel buffer in top-down row order.
///
/// Pixels are copied out of the OS drawing surface before that surface is
/// released, so an image never aliases OS memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedImage {
    buffer: RgbImage,
}

impl CapturedImage {
    /// Wrap packed RGB bytes (`width * height * 3`).
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> CaptureResult<Self> {
        let expected = width as usize * height as usize * 3;
        let actual = data.len();
        RgbImage::from_raw(width, height, data)
            .map(|buffer| Self { buffer })
            .ok_or(CaptureError::InvalidBuffer { expected, actual })
    }

    /// Re-pack a device-native 32-bit BGRX buffer into RGB.
    ///
    /// `stride` is the byte length of one source row and may include
    /// padding past `width * 4`.
    pub fn from_bgrx(width: u32, height: u32, stride: usize, data: &[u8]) -> CaptureResult<Self> {
        let row_bytes = width as usize * 4;
        let expected = stride * height as usize;
        if stride < row_bytes || data.len() < expected {
            return Err(CaptureError::InvalidBuffer {
                expected: expected.max(row_bytes * height as usize),
                actual: data.len(),
            });
        }

        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for row in data.chunks_exact(stride.max(1)).take(height as usize) {
            for px in row[..row_bytes].chunks_exact(4) {
                rgb.extend_from_slice(&[px[2], px[1], px[0]]);
            }
        }
        Self::from_rgb(width, height, rgb)
    }

    /// Uniform single-color image.
    pub fn solid(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            buffer: RgbImage::from_pixel(width, height, Rgb(color)),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Packed RGB bytes, row-major, top row first.
    pub fn as_raw(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.buffer
    }

    pub fn into_rgb_image(self) -> RgbImage {
        self.buffer
    }

    /// Encode to `path`; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        crate::image::save(path.as_ref(), self)
    }
}
