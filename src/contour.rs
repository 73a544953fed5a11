use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::point::Point;
use imageproc::region_labelling::{Connectivity, connected_components};

use crate::mask::MaskOperation;

/// Boundary pixels of one mask region, in border-following order.
///
/// Landmark code only looks at coordinate extrema, never at the order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContourPoints {
    points: Vec<Point<i32>>,
}

impl ContourPoints {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point<i32>> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min_y(&self) -> Option<i32> {
        self.points.iter().map(|p| p.y).min()
    }

    pub fn max_y(&self) -> Option<i32> {
        self.points.iter().map(|p| p.y).max()
    }

    /// Smallest and largest x over the whole contour.
    pub fn x_extent(&self) -> Option<(i32, i32)> {
        let min = self.points.iter().map(|p| p.x).min()?;
        let max = self.points.iter().map(|p| p.x).max()?;
        Some((min, max))
    }

    /// Area enclosed by the polygon through the contour points (shoelace formula).
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }
}

impl From<Vec<Point<i32>>> for ContourPoints {
    fn from(points: Vec<Point<i32>>) -> Self {
        Self::new(points)
    }
}

/// Absolute area of the closed polygon through `points`.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    (twice as f64 / 2.0).abs()
}

/// Outer borders of the mask that are not nested inside another region.
pub fn external_contours(binary: &GrayImage) -> Vec<Contour<i32>> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .collect()
}

/// Pick the contour enclosing the largest area.
///
/// Equal areas keep the contour that `find_contours` reported first, i.e. the one
/// whose starting pixel comes first in row-major scan order.
pub fn largest_contour(contours: Vec<Contour<i32>>) -> Option<ContourPoints> {
    let mut best: Option<(f64, Vec<Point<i32>>)> = None;
    for contour in contours {
        let area = polygon_area(&contour.points);
        match &best {
            Some((best_area, _)) if area <= *best_area => {}
            _ => best = Some((area, contour.points)),
        }
    }
    best.map(|(_, points)| ContourPoints::new(points))
}

/// Filled mask of the region bounded by `contour`, holes included.
///
/// `binary` must be the mask the contour was traced from.
pub fn fill_contour_region(binary: &GrayImage, contour: &ContourPoints) -> GrayImage {
    let (w, h) = binary.dimensions();
    let mut region = GrayImage::new(w, h);
    let Some(seed) = contour.points().first() else {
        return region;
    };

    let labels = connected_components(binary, Connectivity::Eight, Luma([0u8]));
    let target = labels.get_pixel(seed.x as u32, seed.y as u32)[0];
    if target == 0 {
        return region;
    }
    for (label, out) in labels.pixels().zip(region.pixels_mut()) {
        if label[0] == target {
            *out = Luma([255]);
        }
    }
    MaskOperation::FillHoles { threshold: 128 }.apply(&region)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_mask(w: u32, h: u32, rects: &[(u32, u32, u32, u32)]) -> GrayImage {
        let mut mask = GrayImage::new(w, h);
        for &(x0, y0, x1, y1) in rects {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        mask
    }

    fn count_set(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p[0] == 255).count()
    }

    mod polygon_area {
        use super::*;

        #[test]
        fn square_area() {
            let pts = vec![
                Point::new(0, 0),
                Point::new(4, 0),
                Point::new(4, 4),
                Point::new(0, 4),
            ];
            assert_eq!(polygon_area(&pts), 16.0);
        }

        #[test]
        fn orientation_does_not_matter() {
            let pts = vec![
                Point::new(0, 0),
                Point::new(0, 3),
                Point::new(2, 3),
                Point::new(2, 0),
            ];
            assert_eq!(polygon_area(&pts), 6.0);
        }

        #[test]
        fn degenerate_inputs_have_zero_area() {
            assert_eq!(polygon_area(&[]), 0.0);
            assert_eq!(polygon_area(&[Point::new(1, 1), Point::new(5, 5)]), 0.0);
        }
    }

    mod largest_contour {
        use super::*;

        #[test]
        fn picks_bigger_blob() {
            let mask = rect_mask(40, 20, &[(2, 2, 5, 5), (20, 2, 35, 15)]);
            let contour = largest_contour(external_contours(&mask)).unwrap();
            let (min_x, max_x) = contour.x_extent().unwrap();
            assert_eq!((min_x, max_x), (20, 35));
        }

        #[test]
        fn equal_areas_keep_first_reported() {
            let mask = rect_mask(40, 20, &[(2, 2, 6, 6), (20, 10, 24, 14)]);
            let contour = largest_contour(external_contours(&mask)).unwrap();
            assert_eq!(contour.min_y(), Some(2));
        }

        #[test]
        fn empty_mask_has_no_contour() {
            let mask = GrayImage::new(10, 10);
            assert!(largest_contour(external_contours(&mask)).is_none());
        }

        #[test]
        fn hole_borders_are_not_candidates() {
            let mut mask = rect_mask(30, 30, &[(2, 2, 27, 27)]);
            for y in 8..=21 {
                for x in 8..=21 {
                    mask.put_pixel(x, y, Luma([0]));
                }
            }
            let contours = external_contours(&mask);
            assert_eq!(contours.len(), 1);
            assert_eq!(contours[0].border_type, BorderType::Outer);
        }
    }

    mod fill_contour_region {
        use super::*;

        #[test]
        fn keeps_only_selected_component() {
            let mask = rect_mask(40, 20, &[(2, 2, 5, 5), (20, 2, 35, 15)]);
            let contour = largest_contour(external_contours(&mask)).unwrap();
            let region = fill_contour_region(&mask, &contour);
            assert_eq!(count_set(&region), 16 * 14);
            assert_eq!(region.get_pixel(3, 3)[0], 0);
        }

        #[test]
        fn fills_interior_holes() {
            let mut mask = rect_mask(30, 30, &[(2, 2, 27, 27)]);
            for y in 10..=12 {
                for x in 10..=12 {
                    mask.put_pixel(x, y, Luma([0]));
                }
            }
            let contour = largest_contour(external_contours(&mask)).unwrap();
            let region = fill_contour_region(&mask, &contour);
            assert_eq!(region.get_pixel(11, 11)[0], 255);
            assert_eq!(count_set(&region), 26 * 26);
        }

        #[test]
        fn empty_contour_yields_empty_region() {
            let mask = rect_mask(10, 10, &[(1, 1, 4, 4)]);
            let region = fill_contour_region(&mask, &ContourPoints::default());
            assert_eq!(count_set(&region), 0);
        }
    }
}
