//! Isolates the foot as the single largest skin-coloured region of a photo.

use std::path::Path;

use image::imageops::flip_horizontal;
use image::{GrayImage, Luma, Rgb, RgbImage};
use tracing::debug;

use crate::config::SegmentationSettings;
use crate::contour::{ContourPoints, external_contours, fill_contour_region, largest_contour};
use crate::mask::{apply_mask, apply_operations, ellipse_roi, operations_from_settings};
use crate::{FootprintError, FootprintResult};

/// Output of the region segmenter.
///
/// All three parts are in the mirrored frame when mirroring is enabled.
#[derive(Debug, Clone)]
pub struct Segmentation {
    foreground: RgbImage,
    mask: GrayImage,
    contour: ContourPoints,
}

impl Segmentation {
    /// The input image with everything outside the region zeroed.
    pub fn foreground(&self) -> &RgbImage {
        &self.foreground
    }

    /// Binary mask of the selected region, holes filled.
    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    /// Outer boundary of the selected region.
    pub fn contour(&self) -> &ContourPoints {
        &self.contour
    }

    /// Save the refined mask to the specified path.
    pub fn save_mask(&self, path: impl AsRef<Path>) -> FootprintResult<()> {
        self.mask.save(path)?;
        Ok(())
    }

    /// Save the zeroed-background foreground to the specified path.
    pub fn save_foreground(&self, path: impl AsRef<Path>) -> FootprintResult<()> {
        self.foreground.save(path)?;
        Ok(())
    }
}

/// Segment the foot out of a raw photo.
///
/// Fails with [`FootprintError::NoRegionFound`] when nothing survives cleanup.
pub fn segment(image: &RgbImage, settings: &SegmentationSettings) -> FootprintResult<Segmentation> {
    let oriented = if settings.mirror {
        flip_horizontal(image)
    } else {
        image.clone()
    };

    let (w, h) = oriented.dimensions();
    let roi = ellipse_roi(w, h, settings.roi_axes);
    let cropped = apply_mask(&oriented, &roi)?;

    let candidate = skin_mask(&cropped, settings.hsv_lower, settings.hsv_upper);
    let cleaned = apply_operations(&candidate, &operations_from_settings(settings));
    let binary = binarize(&cleaned);

    let contours = external_contours(&binary);
    debug!(candidates = contours.len(), "external contours found");
    let contour = largest_contour(contours).ok_or(FootprintError::NoRegionFound)?;
    debug!(
        points = contour.len(),
        area = contour.area(),
        "selected largest contour"
    );

    let mask = fill_contour_region(&binary, &contour);
    let foreground = apply_mask(&cropped, &mask)?;

    Ok(Segmentation {
        foreground,
        mask,
        contour,
    })
}

/// Convert one pixel to 8-bit HSV: hue in half-degrees (0..180), saturation and value in 0..=255.
pub fn rgb_to_hsv(px: Rgb<u8>) -> [u8; 3] {
    let [r, g, b] = px.0.map(f32::from);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { diff * 255.0 / v } else { 0.0 };
    let mut hue = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    let h = (hue / 2.0).round() as u8 % 180;
    [h, s.round() as u8, v as u8]
}

/// 255 where the pixel's HSV triple lies inside the inclusive band, else 0.
pub fn skin_mask(rgb: &RgbImage, lower: [u8; 3], upper: [u8; 3]) -> GrayImage {
    let (w, h) = rgb.dimensions();
    let mut out = GrayImage::new(w, h);
    for (px, out_px) in rgb.pixels().zip(out.pixels_mut()) {
        let hsv = rgb_to_hsv(*px);
        let inside = (0..3).all(|c| lower[c] <= hsv[c] && hsv[c] <= upper[c]);
        if inside {
            *out_px = Luma([255]);
        }
    }
    out
}

/// Any non-zero value becomes foreground.
fn binarize(mask: &GrayImage) -> GrayImage {
    let mut out = mask.clone();
    for px in out.pixels_mut() {
        if px[0] != 0 {
            px[0] = 255;
        }
    }
    out
}
