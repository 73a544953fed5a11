use std::collections::VecDeque;

use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::draw_filled_ellipse_mut;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode};

use crate::config::SegmentationSettings;
use crate::{FootprintError, FootprintResult};

/// A single transformation step applied to a grayscale candidate mask.
#[derive(Debug, Clone)]
pub enum MaskOperation {
    Blur { sigma: f32 },
    Close { kernel: u32, iterations: u32 },
    FillHoles { threshold: u8 },
}

impl MaskOperation {
    pub fn apply(&self, input: &GrayImage) -> GrayImage {
        match self {
            MaskOperation::Blur { sigma } => gaussian_blur_f32(input, *sigma),
            MaskOperation::Close { kernel, iterations } => close_mask(input, *kernel, *iterations),
            MaskOperation::FillHoles { threshold } => fill_mask_holes(input, *threshold),
        }
    }
}

/// Run a list of operations against the provided source image, returning the transformed mask.
pub fn apply_operations(source: &GrayImage, operations: &[MaskOperation]) -> GrayImage {
    let mut current = source.clone();
    for op in operations {
        current = op.apply(&current);
    }
    current
}

/// The cleanup sequence run on the thresholded candidate mask: soften, then close.
pub fn operations_from_settings(settings: &SegmentationSettings) -> Vec<MaskOperation> {
    let mut operations = Vec::new();
    if settings.blur_kernel > 1 {
        operations.push(MaskOperation::Blur {
            sigma: settings.blur_sigma(),
        });
    }
    if settings.closing_iterations > 0 && settings.closing_kernel > 0 {
        operations.push(MaskOperation::Close {
            kernel: settings.closing_kernel,
            iterations: settings.closing_iterations,
        });
    }
    operations
}

/// Elliptical structuring element inscribed in a `size`×`size` square.
///
/// Row extents follow the usual rasterisation of an ellipse kernel: a 5×5 element
/// has single-pixel caps on the first and last rows and full middle rows.
pub fn elliptical_kernel(size: u32) -> Mask {
    let size = size.clamp(1, 255);
    let r = (size / 2) as i32;
    let mut image = GrayImage::new(size, size);
    for row in 0..size as i32 {
        let dy = row - r;
        let dx = if r == 0 {
            0
        } else {
            let ratio = ((r * r - dy * dy) as f32 / (r * r) as f32).max(0.0);
            (r as f32 * ratio.sqrt()).round() as i32
        };
        let start = (r - dx).max(0);
        let end = (r + dx + 1).min(size as i32);
        for col in start..end {
            image.put_pixel(col as u32, row as u32, Luma([255]));
        }
    }
    Mask::from_image(&image, r as u8, r as u8)
}

/// Morphological closing: `iterations` dilations followed by as many erosions.
pub fn close_mask(mask: &GrayImage, kernel: u32, iterations: u32) -> GrayImage {
    let element = elliptical_kernel(kernel);
    let mut current = mask.clone();
    for _ in 0..iterations {
        current = grayscale_dilate(&current, &element);
    }
    for _ in 0..iterations {
        current = grayscale_erode(&current, &element);
    }
    current
}

/// Filled ellipse centered on the image with semi-axes scaled from its size.
pub fn ellipse_roi(width: u32, height: u32, axes: (f32, f32)) -> GrayImage {
    let mut roi = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return roi;
    }
    let center = ((width / 2) as i32, (height / 2) as i32);
    let semi_x = (width as f32 * axes.0) as i32;
    let semi_y = (height as f32 * axes.1) as i32;
    draw_filled_ellipse_mut(&mut roi, center, semi_x, semi_y, Luma([255]));
    roi
}

/// Zero every pixel of `rgb` whose mask value is zero.
pub fn apply_mask(rgb: &RgbImage, mask: &GrayImage) -> FootprintResult<RgbImage> {
    let expected = rgb.dimensions();
    let found = mask.dimensions();
    if expected != found {
        return Err(FootprintError::SizeMismatch { expected, found });
    }

    let mut out = rgb.clone();
    for (px, mask_px) in out.pixels_mut().zip(mask.pixels()) {
        if mask_px[0] == 0 {
            px.0 = [0, 0, 0];
        }
    }
    Ok(out)
}

/// Fill holes in a binary mask using a flood-fill algorithm from the borders.
pub fn fill_mask_holes(mask: &GrayImage, threshold: u8) -> GrayImage {
    let (w, h) = mask.dimensions();
    if w == 0 || h == 0 {
        return mask.clone();
    }
    let (w_usize, h_usize) = (w as usize, h as usize);
    let mut visited = vec![false; w_usize * h_usize];
    let mut queue = VecDeque::new();

    let idx = |x: u32, y: u32| -> usize { (y as usize) * w_usize + x as usize };
    let mask_raw = mask.as_raw();

    // Seed from every dark border pixel
    for x in 0..w {
        if mask_raw[idx(x, 0)] < threshold {
            queue.push_back((x, 0));
        }
        if mask_raw[idx(x, h - 1)] < threshold {
            queue.push_back((x, h - 1));
        }
    }

    for y in 0..h {
        if mask_raw[idx(0, y)] < threshold {
            queue.push_back((0, y));
        }
        if mask_raw[idx(w - 1, y)] < threshold {
            queue.push_back((w - 1, y));
        }
    }

    // 4-connected background walk
    while let Some((x, y)) = queue.pop_front() {
        let id = idx(x, y);
        if visited[id] {
            continue;
        }
        visited[id] = true;

        let mut push = |nx: u32, ny: u32| {
            let nid = idx(nx, ny);
            if !visited[nid] && mask_raw[nid] < threshold {
                queue.push_back((nx, ny));
            }
        };
        if x > 0 {
            push(x - 1, y);
        }
        if x + 1 < w {
            push(x + 1, y);
        }
        if y > 0 {
            push(x, y - 1);
        }
        if y + 1 < h {
            push(x, y + 1);
        }
    }

    let mut out = GrayImage::new(w, h);
    for ((x, y, out_pixel), mask_pixel) in out.enumerate_pixels_mut().zip(mask.pixels()) {
        // Dark pixels the border walk never reached are holes
        let filled = if mask_pixel[0] >= threshold || !visited[idx(x, y)] {
            255
        } else {
            0
        };
        *out_pixel = Luma([filled]);
    }

    out
}
