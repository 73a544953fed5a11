//! Anatomical reference points derived from a foot silhouette.
//!
//! Everything here is a heuristic on contour coordinates: the heel is the
//! bottommost boundary point, the toes are the horizontal extremes of a thin band
//! under the topmost point, and the two transverse lines are cut through narrow
//! bands of boundary points around a chosen row.

use std::fmt;
use std::str::FromStr;

use imageproc::point::Point;

use crate::config::LandmarkSettings;
use crate::contour::ContourPoints;

/// Which foot the photo shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FootSide {
    Left,
    #[default]
    Right,
}

impl fmt::Display for FootSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FootSide::Left => f.write_str("left"),
            FootSide::Right => f.write_str("right"),
        }
    }
}

impl FromStr for FootSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(FootSide::Left),
            "right" | "r" => Ok(FootSide::Right),
            other => Err(format!("unknown foot side `{other}`, expected left or right")),
        }
    }
}

/// A straight line between two pixel positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: Point<i32>,
    pub end: Point<i32>,
}

impl Segment {
    pub fn new(start: Point<i32>, end: Point<i32>) -> Self {
        Self { start, end }
    }

    /// Horizontal length of the segment.
    pub fn width(&self) -> i32 {
        (self.end.x - self.start.x).abs()
    }
}

/// Landmarks of one foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmarks {
    pub heel: Point<i32>,
    pub big_toe: Point<i32>,
    pub little_toe: Point<i32>,
    /// Transverse line a short way above the heel.
    pub heel_line: Segment,
    /// Transverse line across the widest part of the forefoot.
    pub metatarsal: Segment,
}

impl Landmarks {
    /// Heel-to-big-toe reference line.
    pub fn arch_line(&self) -> Segment {
        Segment::new(self.heel, self.big_toe)
    }

    /// The three construction lines in drawing order.
    pub fn lines(&self) -> [Segment; 3] {
        [self.arch_line(), self.heel_line, self.metatarsal]
    }

    /// Endpoints of all construction lines, where the cross markers go.
    pub fn marker_points(&self) -> [Point<i32>; 6] {
        [
            self.heel,
            self.big_toe,
            self.heel_line.start,
            self.heel_line.end,
            self.metatarsal.start,
            self.metatarsal.end,
        ]
    }
}

/// Derive landmarks from a region contour.
///
/// Returns `None` for an empty contour. When several points share an extreme
/// coordinate, the one met first in contour order wins.
pub fn extract_landmarks(
    contour: &ContourPoints,
    side: FootSide,
    image_height: u32,
    settings: &LandmarkSettings,
) -> Option<Landmarks> {
    let points = contour.points();
    let heel = first_max_by_key(points, |p| p.y)?;
    let min_y = contour.min_y()?;

    let toe_limit = min_y as f32 + settings.toe_band_ratio * image_height as f32;
    let toe_row: Vec<Point<i32>> = points
        .iter()
        .copied()
        .filter(|p| p.y as f32 <= toe_limit)
        .collect();
    let leftmost = first_min_by_key(&toe_row, |p| p.x)?;
    let rightmost = first_max_by_key(&toe_row, |p| p.x)?;
    let (big_toe, little_toe) = match side {
        FootSide::Right => (leftmost, rightmost),
        FootSide::Left => (rightmost, leftmost),
    };

    let foot_height = heel.y - min_y;
    let heel_line_y = heel.y - (settings.heel_line_ratio * foot_height as f32) as i32;
    let heel_line = match band_extremes(points, heel_line_y, settings.band_tolerance) {
        Some((start, end)) => Segment::new(start, end),
        None => global_span(contour, heel_line_y)?,
    };

    let metatarsal_y = widest_row(points, big_toe.y, heel.y, settings);
    let metatarsal = match band_extremes(points, metatarsal_y, settings.band_tolerance) {
        Some((start, end)) => Segment::new(
            Point::new(start.x, metatarsal_y),
            Point::new(end.x, metatarsal_y),
        ),
        None => global_span(contour, metatarsal_y)?,
    };

    Some(Landmarks {
        heel,
        big_toe,
        little_toe,
        heel_line,
        metatarsal,
    })
}

/// Scan rows from `from_y` (inclusive) towards `to_y` (exclusive) and return the row
/// whose tolerance band is widest. Ties keep the first row scanned, the one nearest
/// the toes; with no qualifying band the scan start is returned.
pub fn widest_row(points: &[Point<i32>], from_y: i32, to_y: i32, settings: &LandmarkSettings) -> i32 {
    let step = settings.scan_step.max(1) as usize;
    let mut best_y = from_y;
    let mut best_width = 0;
    for y in (from_y..to_y).step_by(step) {
        if let Some((left, right)) = band_extremes(points, y, settings.band_tolerance) {
            let width = right.x - left.x;
            if width > best_width {
                best_width = width;
                best_y = y;
            }
        }
    }
    best_y
}

/// Leftmost and rightmost contour points within `tolerance` rows of `y`.
///
/// `None` when fewer than two points fall in the band.
pub fn band_extremes(
    points: &[Point<i32>],
    y: i32,
    tolerance: i32,
) -> Option<(Point<i32>, Point<i32>)> {
    let band: Vec<Point<i32>> = points
        .iter()
        .copied()
        .filter(|p| (p.y - y).abs() <= tolerance)
        .collect();
    if band.len() < 2 {
        return None;
    }
    let left = first_min_by_key(&band, |p| p.x)?;
    let right = first_max_by_key(&band, |p| p.x)?;
    Some((left, right))
}

/// Horizontal line at `y` spanning the contour's global x range.
fn global_span(contour: &ContourPoints, y: i32) -> Option<Segment> {
    let (min_x, max_x) = contour.x_extent()?;
    Some(Segment::new(Point::new(min_x, y), Point::new(max_x, y)))
}

fn first_max_by_key(points: &[Point<i32>], key: impl Fn(&Point<i32>) -> i32) -> Option<Point<i32>> {
    let mut best: Option<Point<i32>> = None;
    for p in points {
        if best.is_none_or(|b| key(p) > key(&b)) {
            best = Some(*p);
        }
    }
    best
}

fn first_min_by_key(points: &[Point<i32>], key: impl Fn(&Point<i32>) -> i32) -> Option<Point<i32>> {
    first_max_by_key(points, |p| -key(p))
}
