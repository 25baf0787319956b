// Blank-capture detection
//
// A window that ignores a render request usually leaves the memory surface
// as a single solid fill. Averaging the per-channel intensity variance is
// enough to tell that apart from real content without reference images.

use super::types::CapturedImage;

/// Mean channel variance at or below which a capture is considered blank.
pub const DEFAULT_BLANK_THRESHOLD: f64 = 100.0;

/// Population variance of the R, G and B channels.
///
/// Returns `None` for an image without pixels.
pub fn channel_variances(image: &CapturedImage) -> Option<[f64; 3]> {
    let count = image.pixel_count();
    if count == 0 {
        return None;
    }

    let mut sum = [0u64; 3];
    let mut sum_sq = [0u64; 3];
    for px in image.as_raw().chunks_exact(3) {
        for c in 0..3 {
            let v = px[c] as u64;
            sum[c] += v;
            sum_sq[c] += v * v;
        }
    }

    let n = count as f64;
    let mut variances = [0.0; 3];
    for c in 0..3 {
        let mean = sum[c] as f64 / n;
        // E[x^2] - E[x]^2 can dip just below zero through rounding
        variances[c] = (sum_sq[c] as f64 / n - mean * mean).max(0.0);
    }
    Some(variances)
}

/// Average of the three channel variances; `0.0` for an empty image.
pub fn mean_variance(image: &CapturedImage) -> f64 {
    channel_variances(image)
        .map(|v| (v[0] + v[1] + v[2]) / 3.0)
        .unwrap_or(0.0)
}

/// Whether `image` carries no meaningful content.
///
/// Empty images are always blank. Otherwise blank when the mean channel
/// variance is `<= threshold`, so the result is monotonic in `threshold`.
pub fn is_blank(image: &CapturedImage, threshold: f64) -> bool {
    match channel_variances(image) {
        None => true,
        Some(v) => (v[0] + v[1] + v[2]) / 3.0 <= threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> CapturedImage {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        CapturedImage::from_rgb(width, height, data).unwrap()
    }

    #[test]
    fn test_empty_image_is_blank() {
        let empty = CapturedImage::solid(0, 10, [255, 0, 0]);
        assert!(is_blank(&empty, DEFAULT_BLANK_THRESHOLD));
        assert!(is_blank(&empty, -1.0));
        assert_eq!(channel_variances(&empty), None);
    }

    #[test]
    fn test_solid_color_is_blank() {
        for color in [[0, 0, 0], [255, 255, 255], [30, 144, 255]] {
            let image = CapturedImage::solid(64, 48, color);
            assert_eq!(mean_variance(&image), 0.0);
            assert!(is_blank(&image, DEFAULT_BLANK_THRESHOLD));
            // Zero variance is still blank at a zero threshold
            assert!(is_blank(&image, 0.0));
        }
    }

    #[test]
    fn test_checkerboard_is_not_blank() {
        let image = checkerboard(16, 16);
        // Half 0, half 255 -> variance 127.5^2 on every channel
        let variances = channel_variances(&image).unwrap();
        for v in variances {
            assert!((v - 16256.25).abs() < 1e-6);
        }
        assert!(!is_blank(&image, DEFAULT_BLANK_THRESHOLD));
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        // Two pixels, red channel 0 and 20: variance 100, other channels 0
        let image = CapturedImage::from_rgb(2, 1, vec![0, 0, 0, 20, 0, 0]).unwrap();
        let mean = mean_variance(&image);
        assert!((mean - 100.0 / 3.0).abs() < 1e-9);
        assert!(is_blank(&image, mean));
        assert!(!is_blank(&image, mean - 0.001));
    }

    #[test]
    fn test_monotonic_in_threshold() {
        let image = CapturedImage::from_rgb(3, 1, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]).unwrap();
        let thresholds = [0.0, 10.0, 100.0, 599.0, 600.0, 1000.0, 1e9];
        let mut seen_blank = false;
        for t in thresholds {
            let blank = is_blank(&image, t);
            assert!(!(seen_blank && !blank), "blank at lower threshold but not at {t}");
            seen_blank |= blank;
        }
        assert!(seen_blank);
    }
}
