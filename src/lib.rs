pub mod annotate;
pub mod compose;
pub mod config;
pub mod contour;
pub mod error;
pub mod landmarks;
pub mod logo;
pub mod mask;
pub mod recolor;
pub mod segment;

pub use annotate::{annotate, draw_landmarks};
pub use compose::flatten_onto_white;
pub use config::{
    AnnotationStyle, Corner, LandmarkSettings, LogoSettings, PipelineConfig, SegmentationSettings,
};
pub use contour::ContourPoints;
pub use error::{FootprintError, FootprintResult};
pub use landmarks::{FootSide, Landmarks, Segment, extract_landmarks};
pub use logo::{composite_logo, load_logo, overlay_logo};
pub use recolor::{RecolorMode, apply_false_color, recolor};
pub use segment::{Segmentation, segment};

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::debug;

/// Where the photo to process comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Image(RgbImage),
    Path(PathBuf),
}

impl ImageSource {
    /// Decode the source into an RGB raster.
    pub fn load(self) -> FootprintResult<RgbImage> {
        match self {
            ImageSource::Image(image) => Ok(image),
            ImageSource::Path(path) => match image::open(&path) {
                Ok(image) => Ok(image.to_rgb8()),
                Err(source) => Err(FootprintError::ImageLoad { path, source }),
            },
        }
    }
}

impl From<RgbImage> for ImageSource {
    fn from(image: RgbImage) -> Self {
        ImageSource::Image(image)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

/// Entry point for configuring and running the foot pipeline.
///
/// One instance can serve any number of photos; each call owns its rasters, so
/// left and right feet may be processed from separate threads.
#[derive(Debug, Clone, Default)]
pub struct Footprint {
    config: PipelineConfig,
}

impl Footprint {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Set the segmentation calibration.
    pub fn with_segmentation(mut self, settings: SegmentationSettings) -> Self {
        self.config.segmentation = settings;
        self
    }

    /// Set the landmark ratios and tolerances.
    pub fn with_landmarks(mut self, settings: LandmarkSettings) -> Self {
        self.config.landmarks = settings;
        self
    }

    /// Set the annotation colors and stroke sizes.
    pub fn with_annotation_style(mut self, style: AnnotationStyle) -> Self {
        self.config.annotation = style;
        self
    }

    /// Set the logo placement.
    pub fn with_logo_settings(mut self, settings: LogoSettings) -> Self {
        self.config.logo = settings;
        self
    }

    /// Get a reference to the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load and segment a photo.
    pub fn segment(&self, source: impl Into<ImageSource>) -> FootprintResult<Segmentation> {
        let image = source.into().load()?;
        segment(&image, &self.config.segmentation)
    }

    /// Landmarks of the foot in a photo, in the mirrored frame used for rendering.
    pub fn landmarks(
        &self,
        source: impl Into<ImageSource>,
        side: FootSide,
    ) -> FootprintResult<Landmarks> {
        let segmentation = self.segment(source)?;
        let height = segmentation.mask().height();
        extract_landmarks(segmentation.contour(), side, height, &self.config.landmarks)
            .ok_or(FootprintError::NoRegionFound)
    }

    /// Run segmentation, recoloring, annotation and the optional logo on one photo.
    pub fn process(
        &self,
        source: impl Into<ImageSource>,
        logo: Option<&Path>,
        mode: RecolorMode,
        side: FootSide,
    ) -> FootprintResult<RgbImage> {
        let segmentation = self.segment(source)?;
        self.render(&segmentation, logo, mode, side)
    }

    /// Render an existing segmentation; lets one segmentation feed several modes.
    pub fn render(
        &self,
        segmentation: &Segmentation,
        logo: Option<&Path>,
        mode: RecolorMode,
        side: FootSide,
    ) -> FootprintResult<RgbImage> {
        let recolored = recolor(
            segmentation.foreground(),
            segmentation.mask(),
            mode.is_heatmap(),
        )?;
        let annotated = annotate(
            &recolored,
            segmentation.contour(),
            side,
            &self.config.landmarks,
            &self.config.annotation,
        );
        debug!(%side, %mode, "rendered foot");

        Ok(match logo {
            Some(path) => composite_logo(&annotated, path, &self.config.logo),
            None => annotated,
        })
    }
}

/// Process one photo with the default calibration.
pub fn process(
    source: impl Into<ImageSource>,
    logo: Option<&Path>,
    recolor: bool,
    side: FootSide,
) -> FootprintResult<RgbImage> {
    Footprint::default().process(source, logo, RecolorMode::from_flag(recolor), side)
}
