use std::path::Path;

use image::imageops::{self, overlay, replace};
use image::{DynamicImage, RgbImage};
use tracing::warn;

use crate::config::{Corner, LogoSettings};
use crate::{FootprintError, FootprintResult};

/// Decode a logo asset, keeping any alpha channel.
pub fn load_logo(path: &Path) -> FootprintResult<DynamicImage> {
    image::open(path).map_err(|source| FootprintError::LogoUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Composite the logo at `path` onto a copy of `image`.
///
/// A logo that cannot be loaded is logged and skipped; the image comes back unchanged.
pub fn composite_logo(image: &RgbImage, path: &Path, settings: &LogoSettings) -> RgbImage {
    match load_logo(path) {
        Ok(logo) => overlay_logo(image, &logo, settings),
        Err(err) => {
            warn!(%err, "skipping logo");
            image.clone()
        }
    }
}

/// Scale `logo` to fit the target and place it in the configured corner.
///
/// Logos with an alpha channel are blended; opaque logos overwrite the destination.
pub fn overlay_logo(image: &RgbImage, logo: &DynamicImage, settings: &LogoSettings) -> RgbImage {
    let (w, h) = image.dimensions();
    let Some((logo_w, logo_h)) = fitted_size(logo.width(), logo.height(), w, h, settings.max_fraction)
    else {
        return image.clone();
    };
    let (x, y) = corner_offset((w, h), (logo_w, logo_h), settings.corner, settings.inset);

    if logo.color().has_alpha() {
        let scaled = imageops::resize(&logo.to_rgba8(), logo_w, logo_h, settings.resize_filter);
        let mut canvas = DynamicImage::ImageRgb8(image.clone()).to_rgba8();
        overlay(&mut canvas, &scaled, x, y);
        DynamicImage::ImageRgba8(canvas).to_rgb8()
    } else {
        let scaled = imageops::resize(&logo.to_rgb8(), logo_w, logo_h, settings.resize_filter);
        let mut canvas = image.clone();
        replace(&mut canvas, &scaled, x, y);
        canvas
    }
}

/// Largest aspect-preserving size within `max_fraction` of the target in both directions.
///
/// `None` when either side would collapse to zero.
pub fn fitted_size(
    logo_w: u32,
    logo_h: u32,
    target_w: u32,
    target_h: u32,
    max_fraction: f32,
) -> Option<(u32, u32)> {
    if logo_w == 0 || logo_h == 0 {
        return None;
    }
    let max_w = (target_w as f32 * max_fraction).floor();
    let max_h = (target_h as f32 * max_fraction).floor();
    let scale = (max_w / logo_w as f32).min(max_h / logo_h as f32);
    let new_w = (logo_w as f32 * scale) as u32;
    let new_h = (logo_h as f32 * scale) as u32;
    (new_w > 0 && new_h > 0).then_some((new_w, new_h))
}

/// Top-left position of a `size` rectangle inset from `corner` of `target`.
pub fn corner_offset(target: (u32, u32), size: (u32, u32), corner: Corner, inset: u32) -> (i64, i64) {
    let (tw, th) = (i64::from(target.0), i64::from(target.1));
    let (sw, sh) = (i64::from(size.0), i64::from(size.1));
    let inset = i64::from(inset);
    let left = inset;
    let right = tw - sw - inset;
    let top = inset;
    let bottom = th - sh - inset;
    match corner {
        Corner::TopLeft => (left, top),
        Corner::TopRight => (right, top),
        Corner::BottomLeft => (left, bottom),
        Corner::BottomRight => (right, bottom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    const GRAY: Rgb<u8> = Rgb([90, 90, 90]);

    fn target() -> RgbImage {
        RgbImage::from_pixel(100, 80, GRAY)
    }

    mod fitted_size {
        use super::*;

        #[test]
        fn width_binds_for_wide_logo() {
            assert_eq!(fitted_size(200, 50, 100, 80, 0.5), Some((50, 12)));
        }

        #[test]
        fn height_binds_for_tall_logo() {
            assert_eq!(fitted_size(20, 100, 100, 80, 0.5), Some((8, 40)));
        }

        #[test]
        fn small_logo_is_upscaled() {
            assert_eq!(fitted_size(10, 10, 100, 80, 0.5), Some((40, 40)));
        }

        #[test]
        fn degenerate_sizes_are_rejected() {
            assert_eq!(fitted_size(0, 10, 100, 80, 0.5), None);
            assert_eq!(fitted_size(10, 10, 1, 1, 0.5), None);
        }
    }

    mod corner_offset {
        use super::*;

        #[test]
        fn every_corner_honors_inset() {
            let t = (100, 80);
            let s = (20, 10);
            assert_eq!(corner_offset(t, s, Corner::TopLeft, 10), (10, 10));
            assert_eq!(corner_offset(t, s, Corner::TopRight, 10), (70, 10));
            assert_eq!(corner_offset(t, s, Corner::BottomLeft, 10), (10, 60));
            assert_eq!(corner_offset(t, s, Corner::BottomRight, 10), (70, 60));
        }
    }

    mod overlay_logo {
        use super::*;

        #[test]
        fn opaque_logo_overwrites_bottom_right() {
            let logo = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 0, 0])));
            let out = overlay_logo(&target(), &logo, &LogoSettings::default());
            // 40×40 logo at (50, 30)
            assert_eq!(*out.get_pixel(50, 30), Rgb([255, 0, 0]));
            assert_eq!(*out.get_pixel(89, 69), Rgb([255, 0, 0]));
            assert_eq!(*out.get_pixel(90, 70), GRAY);
            assert_eq!(*out.get_pixel(49, 30), GRAY);
        }

        #[test]
        fn corner_parameter_is_honored() {
            let logo = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([0, 0, 255])));
            let settings = LogoSettings::default().with_corner(Corner::TopLeft);
            let out = overlay_logo(&target(), &logo, &settings);
            assert_eq!(*out.get_pixel(10, 10), Rgb([0, 0, 255]));
            assert_eq!(*out.get_pixel(89, 69), GRAY);
        }

        #[test]
        fn transparent_logo_leaves_image_unchanged() {
            let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 0])));
            let out = overlay_logo(&target(), &logo, &LogoSettings::default());
            assert_eq!(out, target());
        }

        #[test]
        fn opaque_alpha_logo_replaces_pixels() {
            let logo =
                DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 255])));
            let out = overlay_logo(&target(), &logo, &LogoSettings::default());
            assert_eq!(*out.get_pixel(60, 50), Rgb([0, 255, 0]));
        }
    }

    mod composite_logo {
        use super::*;

        #[test]
        fn missing_file_returns_input_unchanged() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("absent.png");
            let out = composite_logo(&target(), &path, &LogoSettings::default());
            assert_eq!(out, target());
        }

        #[test]
        fn load_logo_reports_unavailable() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("absent.png");
            let err = load_logo(&path).unwrap_err();
            assert!(matches!(err, FootprintError::LogoUnavailable { .. }));
        }

        #[test]
        fn logo_on_disk_is_composited() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("logo.png");
            RgbaImage::from_pixel(8, 8, Rgba([255, 255, 0, 255]))
                .save(&path)
                .unwrap();
            let out = composite_logo(&target(), &path, &LogoSettings::default());
            assert_eq!(*out.get_pixel(60, 50), Rgb([255, 255, 0]));
        }
    }
}
