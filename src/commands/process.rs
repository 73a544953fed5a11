use footprint::{FootprintResult, RecolorMode};

use crate::cli::{GlobalOptions, ProcessCommand};

use super::utils::{build_footprint_with_logo, derive_variant_path};

/// The main function to run the process command.
pub fn run(global: &GlobalOptions, cmd: ProcessCommand) -> FootprintResult<()> {
    let footprint = build_footprint_with_logo(global, &cmd.logo);
    let mode: RecolorMode = cmd.mode.into();
    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_variant_path(&cmd.input, &mode.to_string(), "png"));

    let rendered = footprint.process(
        cmd.input.as_path(),
        cmd.logo.logo.as_deref(),
        mode,
        cmd.side.into(),
    )?;
    rendered.save(&output_path)?;
    println!("Foot {mode} PNG saved to {}", output_path.display());

    Ok(())
}
