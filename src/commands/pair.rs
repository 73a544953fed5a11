use std::path::{Path, PathBuf};
use std::thread;

use footprint::{FootSide, Footprint, FootprintError, FootprintResult, RecolorMode};
use tracing::info;

use crate::cli::{GlobalOptions, PairCommand};

use super::utils::{build_footprint_with_logo, pair_output_path};

/// The main function to run the pair command.
///
/// Both feet are segmented on their own threads; each segmentation feeds a skin
/// and a heatmap rendering.
pub fn run(global: &GlobalOptions, cmd: PairCommand) -> FootprintResult<()> {
    let footprint = build_footprint_with_logo(global, &cmd.logo);
    let logo = cmd.logo.logo.as_deref();
    let out_dir = cmd.out_dir.as_deref();

    let (left, right) = thread::scope(|scope| {
        let left = scope.spawn(|| render_foot(&footprint, &cmd.left, FootSide::Left, logo, out_dir));
        let right =
            scope.spawn(|| render_foot(&footprint, &cmd.right, FootSide::Right, logo, out_dir));
        (join(left), join(right))
    });

    for path in left?.into_iter().chain(right?) {
        println!("Saved {}", path.display());
    }
    Ok(())
}

fn render_foot(
    footprint: &Footprint,
    input: &Path,
    side: FootSide,
    logo: Option<&Path>,
    out_dir: Option<&Path>,
) -> FootprintResult<Vec<PathBuf>> {
    let segmentation = footprint.segment(input)?;
    let mut saved = Vec::with_capacity(2);
    for mode in [RecolorMode::Skin, RecolorMode::Heatmap] {
        let rendered = footprint.render(&segmentation, logo, mode, side)?;
        let path = pair_output_path(out_dir, input, side, mode);
        rendered.save(&path)?;
        info!(%side, %mode, path = %path.display(), "rendered foot");
        saved.push(path);
    }
    Ok(saved)
}

fn join(
    handle: thread::ScopedJoinHandle<'_, FootprintResult<Vec<PathBuf>>>,
) -> FootprintResult<Vec<PathBuf>> {
    handle.join().unwrap_or_else(|_| {
        Err(FootprintError::Io(std::io::Error::other(
            "foot rendering thread panicked",
        )))
    })
}
