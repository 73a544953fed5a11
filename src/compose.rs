use image::{GrayImage, Rgb, RgbImage, Rgba, RgbaImage};

use crate::{FootprintError, FootprintResult};

/// Compose an RGBA image from an RGB image and a grayscale mask used as alpha.
pub fn compose_foreground(rgb: &RgbImage, mask: &GrayImage) -> FootprintResult<RgbaImage> {
    let expected = rgb.dimensions();
    let found = mask.dimensions();
    if expected != found {
        return Err(FootprintError::SizeMismatch { expected, found });
    }

    let (w, h) = rgb.dimensions();
    let mut rgba = RgbaImage::new(w, h);
    for ((rgb_px, mask_px), out_px) in rgb.pixels().zip(mask.pixels()).zip(rgba.pixels_mut()) {
        *out_px = Rgba([rgb_px[0], rgb_px[1], rgb_px[2], mask_px[0]]);
    }

    Ok(rgba)
}

/// Alpha composite `top` over `bottom` (RGBA over operator).
pub fn alpha_composite(bottom: &RgbaImage, top: &RgbaImage) -> RgbaImage {
    let (w, h) = bottom.dimensions();
    let mut out = RgbaImage::new(w, h);

    for ((bg_px, fg_px), out_px) in bottom.pixels().zip(top.pixels()).zip(out.pixels_mut()) {
        let fg_a = fg_px[3] as f32 / 255.0;
        let bg_a = bg_px[3] as f32 / 255.0;
        let out_a = fg_a + bg_a * (1.0 - fg_a);

        let mut rgba = [0u8; 4];
        if out_a > 0.0 {
            let fg_weight = fg_a / out_a;
            let bg_weight = (bg_a * (1.0 - fg_a)) / out_a;
            for c in 0..3 {
                let blended = fg_px[c] as f32 * fg_weight + bg_px[c] as f32 * bg_weight;
                rgba[c] = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
        rgba[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        *out_px = Rgba(rgba);
    }

    out
}

/// Place `rgb` over an opaque white canvas, using `mask` as the selector.
///
/// Pixels with mask 0 come out pure white; pixels with mask 255 keep their color.
pub fn flatten_onto_white(rgb: &RgbImage, mask: &GrayImage) -> FootprintResult<RgbImage> {
    let foreground = compose_foreground(rgb, mask)?;
    let (w, h) = rgb.dimensions();
    let canvas = RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]));
    let flat = alpha_composite(&canvas, &foreground);

    let mut out = RgbImage::new(w, h);
    for (src, dst) in flat.pixels().zip(out.pixels_mut()) {
        *dst = Rgb([src[0], src[1], src[2]]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn rgb_image(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(color))
    }

    fn gray_image(w: u32, h: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(w, h, Luma([value]))
    }

    mod compose_foreground {
        use super::*;

        #[test]
        fn per_pixel_values_correct() {
            let mut rgb = RgbImage::new(2, 1);
            rgb.put_pixel(0, 0, Rgb([10, 20, 30]));
            rgb.put_pixel(1, 0, Rgb([40, 50, 60]));
            let mut mask = GrayImage::new(2, 1);
            mask.put_pixel(1, 0, Luma([255]));

            let result = compose_foreground(&rgb, &mask).unwrap();
            assert_eq!(result.get_pixel(0, 0).0, [10, 20, 30, 0]);
            assert_eq!(result.get_pixel(1, 0).0, [40, 50, 60, 255]);
        }

        #[test]
        fn mask_size_mismatch_returns_error() {
            let rgb = rgb_image(4, 4, [255, 0, 0]);
            let mask = gray_image(2, 2, 128);

            match compose_foreground(&rgb, &mask).unwrap_err() {
                FootprintError::SizeMismatch { expected, found } => {
                    assert_eq!(expected, (4, 4));
                    assert_eq!(found, (2, 2));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    mod alpha_composite {
        use super::*;

        #[test]
        fn opaque_top_replaces_bottom() {
            let bottom = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255]));
            let top = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
            assert_eq!(alpha_composite(&bottom, &top).get_pixel(0, 0).0, [255, 0, 0, 255]);
        }

        #[test]
        fn transparent_top_shows_bottom() {
            let bottom = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255]));
            let top = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 0]));
            assert_eq!(alpha_composite(&bottom, &top).get_pixel(0, 0).0, [0, 0, 255, 255]);
        }

        #[test]
        fn half_transparent_blends_over_opaque() {
            let bottom = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
            let top = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 128]));
            let px = alpha_composite(&bottom, &top).get_pixel(0, 0).0;
            assert_eq!(px[3], 255);
            assert_eq!(px[0], 100);
            assert_eq!(px[1], 50);
            assert_eq!(px[2], 25);
        }
    }

    mod flatten_onto_white {
        use super::*;

        #[test]
        fn outside_is_white_inside_is_source() {
            let rgb = rgb_image(2, 1, [12, 34, 56]);
            let mut mask = GrayImage::new(2, 1);
            mask.put_pixel(0, 0, Luma([255]));

            let out = flatten_onto_white(&rgb, &mask).unwrap();
            assert_eq!(out.get_pixel(0, 0).0, [12, 34, 56]);
            assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255]);
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// flatten_onto_white: binary masks select exactly source or white
                #[test]
                fn binary_mask_selects_exactly(
                    r in proptest::num::u8::ANY,
                    g in proptest::num::u8::ANY,
                    b in proptest::num::u8::ANY,
                    inside in proptest::bool::ANY
                ) {
                    let rgb = RgbImage::from_pixel(1, 1, Rgb([r, g, b]));
                    let mask = GrayImage::from_pixel(1, 1, Luma([if inside { 255 } else { 0 }]));
                    let out = flatten_onto_white(&rgb, &mask).unwrap();
                    let expected = if inside { [r, g, b] } else { [255, 255, 255] };
                    prop_assert_eq!(out.get_pixel(0, 0).0, expected);
                }
            }
        }
    }
}
