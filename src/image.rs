// Image encoding for captured windows.
//
// Format is chosen by file extension, via the `image` crate:
// - PNG  (lossless)
// - BMP  (lossless)
// - JPEG (lossy)
// - TIFF (lossless)

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat};

use crate::capture::CapturedImage;

/// Formats handled by the `image` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Png,
    Bmp,
    Jpeg,
    Tiff,
}

fn output_format(path: &Path) -> Result<OutputFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    Ok(match ext.as_str() {
        "png" => OutputFormat::Png,
        "bmp" => OutputFormat::Bmp,
        "jpg" | "jpeg" => OutputFormat::Jpeg,
        "tiff" | "tif" => OutputFormat::Tiff,
        _ => bail!(
            "unsupported extension '.{}'; supported: .png .bmp .jpg .tiff",
            ext
        ),
    })
}

/// Save a captured image. The format is inferred from the file extension.
pub fn save(path: &Path, image: &CapturedImage) -> Result<()> {
    let format = output_format(path)?;
    if image.is_empty() {
        bail!("refusing to encode an empty {}x{} image", image.width(), image.height());
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);

    let (width, height) = (image.width(), image.height());
    match format {
        OutputFormat::Png => {
            let encoder =
                PngEncoder::new_with_quality(writer, CompressionType::Fast, FilterType::Sub);
            encoder.write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)?;
        }
        OutputFormat::Bmp | OutputFormat::Jpeg | OutputFormat::Tiff => {
            let img_fmt = match format {
                OutputFormat::Bmp => ImageFormat::Bmp,
                OutputFormat::Jpeg => ImageFormat::Jpeg,
                _ => ImageFormat::Tiff,
            };
            image::write_buffer_with_format(
                &mut writer,
                image.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
                img_fmt,
            )?;
        }
    }

    Ok(())
}
