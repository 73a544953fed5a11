use image::{Rgb, RgbImage};
use imageproc::drawing::{BresenhamLineIter, draw_filled_circle_mut, draw_line_segment_mut};
use imageproc::point::Point;

use crate::config::{AnnotationStyle, LandmarkSettings};
use crate::contour::ContourPoints;
use crate::landmarks::{FootSide, Landmarks, extract_landmarks};

/// Extract landmarks from `contour` and draw them onto a copy of `image`.
///
/// An empty contour produces an unmodified copy.
pub fn annotate(
    image: &RgbImage,
    contour: &ContourPoints,
    side: FootSide,
    settings: &LandmarkSettings,
    style: &AnnotationStyle,
) -> RgbImage {
    match extract_landmarks(contour, side, image.height(), settings) {
        Some(landmarks) => draw_landmarks(image, &landmarks, style),
        None => image.clone(),
    }
}

/// Draw the construction lines, then a cross at every line endpoint.
pub fn draw_landmarks(image: &RgbImage, landmarks: &Landmarks, style: &AnnotationStyle) -> RgbImage {
    let mut canvas = image.clone();
    for line in landmarks.lines() {
        draw_thick_line(
            &mut canvas,
            line.start,
            line.end,
            style.line_thickness,
            style.line_color,
        );
    }
    for point in landmarks.marker_points() {
        draw_cross(&mut canvas, point, style);
    }
    canvas
}

/// Plus-shaped marker centered on `center`, clamped into the image first.
pub fn draw_cross(canvas: &mut RgbImage, center: Point<i32>, style: &AnnotationStyle) {
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    let x = center.x.clamp(0, w as i32 - 1);
    let y = center.y.clamp(0, h as i32 - 1);
    let arm = (style.marker_size / 2) as i32;

    draw_thick_line(
        canvas,
        Point::new(x - arm, y),
        Point::new(x + arm, y),
        style.marker_thickness,
        style.marker_color,
    );
    draw_thick_line(
        canvas,
        Point::new(x, y - arm),
        Point::new(x, y + arm),
        style.marker_thickness,
        style.marker_color,
    );
}

/// Line with round caps: a disc of radius `thickness / 2` stamped along the path.
pub fn draw_thick_line(
    canvas: &mut RgbImage,
    start: Point<i32>,
    end: Point<i32>,
    thickness: u32,
    color: Rgb<u8>,
) {
    let from = (start.x as f32, start.y as f32);
    let to = (end.x as f32, end.y as f32);
    let radius = (thickness / 2) as i32;
    if radius == 0 {
        draw_line_segment_mut(canvas, from, to, color);
        return;
    }
    for (x, y) in BresenhamLineIter::new(from, to) {
        draw_filled_circle_mut(canvas, (x, y), radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Segment;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn style() -> AnnotationStyle {
        AnnotationStyle::default()
    }

    fn sample_landmarks() -> Landmarks {
        Landmarks {
            heel: Point::new(50, 90),
            big_toe: Point::new(30, 10),
            little_toe: Point::new(70, 10),
            heel_line: Segment::new(Point::new(35, 80), Point::new(65, 80)),
            metatarsal: Segment::new(Point::new(20, 40), Point::new(80, 40)),
        }
    }

    mod draw_thick_line {
        use super::*;

        #[test]
        fn covers_line_with_requested_width() {
            let mut canvas = RgbImage::from_pixel(40, 40, BLACK);
            let white = Rgb([255, 255, 255]);
            draw_thick_line(&mut canvas, Point::new(5, 20), Point::new(35, 20), 5, white);
            for dy in -2..=2 {
                assert_eq!(*canvas.get_pixel(20, (20 + dy) as u32), white);
            }
            assert_eq!(*canvas.get_pixel(20, 24), BLACK);
            assert_eq!(*canvas.get_pixel(20, 16), BLACK);
        }

        #[test]
        fn hairline_for_thickness_one() {
            let mut canvas = RgbImage::from_pixel(10, 10, BLACK);
            let red = Rgb([255, 0, 0]);
            draw_thick_line(&mut canvas, Point::new(0, 5), Point::new(9, 5), 1, red);
            assert_eq!(*canvas.get_pixel(4, 5), red);
            assert_eq!(*canvas.get_pixel(4, 4), BLACK);
        }

        #[test]
        fn off_canvas_segments_do_not_panic() {
            let mut canvas = RgbImage::from_pixel(10, 10, BLACK);
            draw_thick_line(&mut canvas, Point::new(-50, -50), Point::new(60, 60), 5, BLACK);
        }
    }

    mod draw_cross {
        use super::*;

        #[test]
        fn marker_centered_on_point() {
            let mut canvas = RgbImage::from_pixel(60, 60, BLACK);
            let s = style();
            draw_cross(&mut canvas, Point::new(30, 30), &s);
            assert_eq!(*canvas.get_pixel(30, 30), s.marker_color);
            assert_eq!(*canvas.get_pixel(40, 30), s.marker_color);
            assert_eq!(*canvas.get_pixel(30, 20), s.marker_color);
            assert_eq!(*canvas.get_pixel(40, 40), BLACK);
        }

        #[test]
        fn out_of_bounds_center_is_clamped() {
            let mut canvas = RgbImage::from_pixel(30, 30, BLACK);
            let s = style();
            draw_cross(&mut canvas, Point::new(500, -20), &s);
            assert_eq!(*canvas.get_pixel(29, 0), s.marker_color);
        }
    }

    mod draw_landmarks {
        use super::*;

        #[test]
        fn source_image_is_untouched() {
            let image = RgbImage::from_pixel(100, 100, BLACK);
            let out = draw_landmarks(&image, &sample_landmarks(), &style());
            assert!(image.pixels().all(|p| *p == BLACK));
            assert_ne!(out, image);
        }

        #[test]
        fn endpoints_carry_markers_and_lines_are_drawn() {
            let image = RgbImage::from_pixel(100, 100, BLACK);
            let s = style();
            let lm = sample_landmarks();
            let out = draw_landmarks(&image, &lm, &s);
            for p in lm.marker_points() {
                assert_eq!(*out.get_pixel(p.x as u32, p.y as u32), s.marker_color);
            }
            // Midpoint of the metatarsal line, away from any marker
            assert_eq!(*out.get_pixel(50, 40), s.line_color);
        }
    }

    mod annotate {
        use super::*;

        #[test]
        fn empty_contour_returns_copy() {
            let image = RgbImage::from_pixel(20, 20, BLACK);
            let out = annotate(
                &image,
                &ContourPoints::default(),
                FootSide::Left,
                &LandmarkSettings::default(),
                &style(),
            );
            assert_eq!(out, image);
        }
    }
}
