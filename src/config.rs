use image::Rgb;
use image::imageops::FilterType;

/// Calibration for the region segmenter.
///
/// The defaults are tuned for the original capture setup; override them when the
/// camera or lighting differs.
#[derive(Debug, Clone)]
pub struct SegmentationSettings {
    /// Mirror the photo horizontally before anything else.
    pub mirror: bool,
    /// Region-of-interest ellipse semi-axes as fractions of (width, height).
    pub roi_axes: (f32, f32),
    /// Inclusive lower HSV bound (hue in half-degrees, 0..180).
    pub hsv_lower: [u8; 3],
    /// Inclusive upper HSV bound.
    pub hsv_upper: [u8; 3],
    /// Side of the square Gaussian kernel used to soften the candidate mask.
    pub blur_kernel: u32,
    /// Side of the elliptical structuring element used for closing.
    pub closing_kernel: u32,
    /// Number of dilate passes followed by the same number of erode passes.
    pub closing_iterations: u32,
}

impl Default for SegmentationSettings {
    fn default() -> Self {
        Self {
            mirror: true,
            roi_axes: (1.0 / 3.0, 1.0),
            hsv_lower: [0, 100, 100],
            hsv_upper: [140, 255, 255],
            blur_kernel: 7,
            closing_kernel: 5,
            closing_iterations: 35,
        }
    }
}

impl SegmentationSettings {
    /// Set whether the input is mirrored before segmentation.
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Set the inclusive HSV threshold band.
    pub fn with_hsv_range(mut self, lower: [u8; 3], upper: [u8; 3]) -> Self {
        self.hsv_lower = lower;
        self.hsv_upper = upper;
        self
    }

    /// Set the number of closing iterations.
    pub fn with_closing_iterations(mut self, iterations: u32) -> Self {
        self.closing_iterations = iterations;
        self
    }

    /// Gaussian sigma matching a square kernel of `blur_kernel` pixels.
    pub fn blur_sigma(&self) -> f32 {
        let k = self.blur_kernel.max(1) as f32;
        0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
    }
}

/// Ratios and tolerances used to place landmarks on a contour.
#[derive(Debug, Clone, Copy)]
pub struct LandmarkSettings {
    /// Height of the toe band below the topmost contour point, as a fraction of image height.
    pub toe_band_ratio: f32,
    /// Offset of the transverse heel line above the heel, as a fraction of foot height.
    pub heel_line_ratio: f32,
    /// Half-height in pixels of the band used to collect contour points around a row.
    pub band_tolerance: i32,
    /// Row step of the metatarsal width scan.
    pub scan_step: i32,
}

impl Default for LandmarkSettings {
    fn default() -> Self {
        Self {
            toe_band_ratio: 0.05,
            heel_line_ratio: 0.10,
            band_tolerance: 5,
            scan_step: 5,
        }
    }
}

/// Colors and stroke sizes for construction lines and markers.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationStyle {
    pub line_thickness: u32,
    pub line_color: Rgb<u8>,
    /// Full arm-to-arm span of a cross marker.
    pub marker_size: u32,
    pub marker_thickness: u32,
    pub marker_color: Rgb<u8>,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            line_thickness: 5,
            line_color: Rgb([255, 255, 255]),
            marker_size: 20,
            marker_thickness: 2,
            marker_color: Rgb([255, 0, 0]),
        }
    }
}

/// Image corner used to anchor the logo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// Placement and scaling of the corner logo.
#[derive(Debug, Clone, Copy)]
pub struct LogoSettings {
    /// Largest fraction of the target width and height the logo may cover.
    pub max_fraction: f32,
    /// Distance in pixels from the anchoring corner.
    pub inset: u32,
    pub corner: Corner,
    pub resize_filter: FilterType,
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            max_fraction: 0.5,
            inset: 10,
            corner: Corner::BottomRight,
            resize_filter: FilterType::Triangle,
        }
    }
}

impl LogoSettings {
    /// Set the anchoring corner.
    pub fn with_corner(mut self, corner: Corner) -> Self {
        self.corner = corner;
        self
    }
}

/// All tunables of one pipeline invocation.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub segmentation: SegmentationSettings,
    pub landmarks: LandmarkSettings,
    pub annotation: AnnotationStyle,
    pub logo: LogoSettings,
}
