//! Skin-tone cut-outs and false-color heatmaps on a white backdrop.

use std::fmt;

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::FootprintResult;
use crate::compose::flatten_onto_white;

/// Rendering applied to the segmented region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecolorMode {
    /// Original colors inside the mask.
    Skin,
    /// Normalized luminance mapped through a blue-green-red ramp.
    #[default]
    Heatmap,
}

impl RecolorMode {
    pub fn from_flag(apply_heatmap: bool) -> Self {
        if apply_heatmap {
            RecolorMode::Heatmap
        } else {
            RecolorMode::Skin
        }
    }

    pub fn is_heatmap(self) -> bool {
        matches!(self, RecolorMode::Heatmap)
    }
}

impl fmt::Display for RecolorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecolorMode::Skin => f.write_str("skin"),
            RecolorMode::Heatmap => f.write_str("heatmap"),
        }
    }
}

/// Render the region on white, optionally as a heatmap.
///
/// The heatmap stretch is computed per call from the pixels inside `mask`, so
/// colors are not comparable between photos taken under different exposure.
pub fn recolor(
    foreground: &RgbImage,
    mask: &GrayImage,
    apply_heatmap: bool,
) -> FootprintResult<RgbImage> {
    let skin = flatten_onto_white(foreground, mask)?;
    if !apply_heatmap {
        return Ok(skin);
    }

    let luminance = luma_bt601(&skin);
    let stretched = normalize_within(&luminance, mask);
    let colored = apply_false_color(&stretched);
    flatten_onto_white(&colored, mask)
}

/// Min-max stretch of the pixels selected by `mask` to the full 0..=255 range.
///
/// A zero range leaves values untouched, as does an empty mask. Pixels outside
/// the mask are copied as-is.
pub fn normalize_within(gray: &GrayImage, mask: &GrayImage) -> GrayImage {
    let selected = gray
        .pixels()
        .zip(mask.pixels())
        .filter(|(_, m)| m[0] != 0)
        .map(|(g, _)| g[0]);
    let (min, max) = selected.fold((u8::MAX, u8::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min >= max {
        return gray.clone();
    }

    let range = f32::from(max - min);
    let mut out = gray.clone();
    for (px, m) in out.pixels_mut().zip(mask.pixels()) {
        if m[0] != 0 {
            let scaled = f32::from(px[0] - min) * 255.0 / range;
            *px = Luma([scaled.round() as u8]);
        }
    }
    out
}

/// Luminance with BT.601 weights (0.299, 0.587, 0.114), rounded to nearest.
pub fn luma_bt601(rgb: &RgbImage) -> GrayImage {
    let (w, h) = rgb.dimensions();
    let mut out = GrayImage::new(w, h);
    for (src, dst) in rgb.pixels().zip(out.pixels_mut()) {
        let [r, g, b] = src.0.map(f32::from);
        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        *dst = Luma([y.round().clamp(0.0, 255.0) as u8]);
    }
    out
}

/// Map every gray level through [`jet`].
pub fn apply_false_color(gray: &GrayImage) -> RgbImage {
    let lut: Vec<Rgb<u8>> = (0..=255u8).map(jet).collect();
    let (w, h) = gray.dimensions();
    let mut out = RgbImage::new(w, h);
    for (src, dst) in gray.pixels().zip(out.pixels_mut()) {
        *dst = lut[src[0] as usize];
    }
    out
}

/// Blue → cyan → green → yellow → red ramp.
pub fn jet(value: u8) -> Rgb<u8> {
    let t = f32::from(value) / 255.0;
    let channel = |offset: f32| {
        let v = (1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}
