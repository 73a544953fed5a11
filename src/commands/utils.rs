use std::path::{Path, PathBuf};

use footprint::{FootSide, Footprint, LogoSettings, RecolorMode, SegmentationSettings};

use crate::cli::{GlobalOptions, LogoArgs};

/// Build a pipeline from the global calibration flags.
pub fn build_footprint(global: &GlobalOptions) -> Footprint {
    let segmentation: SegmentationSettings = global.into();
    Footprint::default().with_segmentation(segmentation)
}

/// Same as [`build_footprint`], with the logo corner applied.
pub fn build_footprint_with_logo(global: &GlobalOptions, logo: &LogoArgs) -> Footprint {
    build_footprint(global)
        .with_logo_settings(LogoSettings::default().with_corner(logo.corner.into()))
}

/// Derive a variant file path by appending a suffix before the extension.
pub fn derive_variant_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut derived = input.to_path_buf();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| suffix.to_string());
    derived.set_file_name(format!("{stem}-{suffix}.{extension}"));
    derived
}

/// Resolve an optional export flag: absent, present without a value, or an explicit path.
pub fn resolve_export_path(
    flag: &Option<Option<PathBuf>>,
    input: &Path,
    suffix: &str,
) -> Option<PathBuf> {
    flag.as_ref().map(|value| {
        value
            .clone()
            .unwrap_or_else(|| derive_variant_path(input, suffix, "png"))
    })
}

/// Path of one paired rendering, `<stem>-<side>-<mode>.png`.
///
/// Goes inside `dir` when given, otherwise next to `input`.
pub fn pair_output_path(
    dir: Option<&Path>,
    input: &Path,
    side: FootSide,
    mode: RecolorMode,
) -> PathBuf {
    let derived = derive_variant_path(input, &format!("{side}-{mode}"), "png");
    match (dir, derived.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => derived,
    }
}
