use footprint::FootprintResult;

use crate::cli::{GlobalOptions, MaskCommand};

use super::utils::{build_footprint, derive_variant_path, resolve_export_path};

/// The main function to run the mask command.
pub fn run(global: &GlobalOptions, cmd: MaskCommand) -> FootprintResult<()> {
    let footprint = build_footprint(global);
    let segmentation = footprint.segment(cmd.input.as_path())?;
    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_variant_path(&cmd.input, "mask", "png"));

    segmentation.save_mask(&output_path)?;
    println!("Mask PNG saved to {}", output_path.display());

    if let Some(path) = resolve_export_path(&cmd.export_foreground, &cmd.input, "foreground") {
        segmentation.save_foreground(&path)?;
        println!("Foreground PNG saved to {}", path.display());
    }

    Ok(())
}
