use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use footprint::{Corner, FootSide, RecolorMode, SegmentationSettings};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Do not mirror the photo before segmentation
    #[arg(long = "no-mirror", global = true)]
    pub no_mirror: bool,
    /// Closing iterations used to fill holes in the candidate mask
    #[arg(long = "closing-iterations", global = true, default_value_t = 35)]
    pub closing_iterations: u32,
    /// Inclusive lower HSV bound as `h,s,v` (hue 0-180)
    #[arg(long = "hsv-lower", global = true, default_value = "0,100,100", value_parser = parse_hsv)]
    pub hsv_lower: [u8; 3],
    /// Inclusive upper HSV bound as `h,s,v` (hue 0-180)
    #[arg(long = "hsv-upper", global = true, default_value = "140,255,255", value_parser = parse_hsv)]
    pub hsv_upper: [u8; 3],
}

impl From<&GlobalOptions> for SegmentationSettings {
    fn from(global: &GlobalOptions) -> Self {
        SegmentationSettings::default()
            .with_mirror(!global.no_mirror)
            .with_closing_iterations(global.closing_iterations)
            .with_hsv_range(global.hsv_lower, global.hsv_upper)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one foot as a skin cut-out or heatmap with landmarks
    Process(ProcessCommand),
    /// Export the refined foot mask as a PNG
    Mask(MaskCommand),
    /// Print the landmarks found in a photo
    Landmarks(LandmarksCommand),
    /// Render skin and heatmap images for a left and a right foot
    Pair(PairCommand),
}

/// Foot side argument.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SideArg {
    Left,
    Right,
}

impl From<SideArg> for FootSide {
    fn from(value: SideArg) -> Self {
        match value {
            SideArg::Left => FootSide::Left,
            SideArg::Right => FootSide::Right,
        }
    }
}

/// Rendering mode argument.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Skin,
    Heatmap,
}

impl From<ModeArg> for RecolorMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Skin => RecolorMode::Skin,
            ModeArg::Heatmap => RecolorMode::Heatmap,
        }
    }
}

/// Logo corner argument.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CornerArg {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl From<CornerArg> for Corner {
    fn from(value: CornerArg) -> Self {
        match value {
            CornerArg::TopLeft => Corner::TopLeft,
            CornerArg::TopRight => Corner::TopRight,
            CornerArg::BottomLeft => Corner::BottomLeft,
            CornerArg::BottomRight => Corner::BottomRight,
        }
    }
}

#[derive(Args, Debug)]
pub struct LogoArgs {
    /// Logo image composited onto the output
    #[arg(long, env = "FOOTPRINT_LOGO")]
    pub logo: Option<PathBuf>,
    /// Corner the logo is anchored to
    #[arg(long, value_enum, default_value_t = CornerArg::BottomRight)]
    pub corner: CornerArg,
}

#[derive(Args, Debug)]
pub struct ProcessCommand {
    /// Input photo path
    pub input: PathBuf,
    /// Output path (defaults to `<name>-<mode>.png`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Which foot the photo shows
    #[arg(long, value_enum, default_value_t = SideArg::Right)]
    pub side: SideArg,
    /// Rendering mode
    #[arg(long, value_enum, default_value_t = ModeArg::Heatmap)]
    pub mode: ModeArg,
    #[command(flatten)]
    pub logo: LogoArgs,
}

#[derive(Args, Debug)]
pub struct MaskCommand {
    /// Input photo path
    pub input: PathBuf,
    /// Output path (defaults to `<name>-mask.png`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also save the zeroed-background foreground
    #[arg(long = "export-foreground", value_name = "PATH", num_args = 0..=1)]
    pub export_foreground: Option<Option<PathBuf>>,
}

#[derive(Args, Debug)]
pub struct LandmarksCommand {
    /// Input photo path
    pub input: PathBuf,
    /// Which foot the photo shows
    #[arg(long, value_enum, default_value_t = SideArg::Right)]
    pub side: SideArg,
}

#[derive(Args, Debug)]
pub struct PairCommand {
    /// Left foot photo
    #[arg(long)]
    pub left: PathBuf,
    /// Right foot photo
    #[arg(long)]
    pub right: PathBuf,
    /// Directory receiving the four renderings (defaults to each photo's own directory)
    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,
    #[command(flatten)]
    pub logo: LogoArgs,
}

fn parse_hsv(value: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected three comma-separated values, got `{value}`"));
    }
    let mut out = [0u8; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse::<u8>()
            .map_err(|_| format!("HSV component must be 0-255, got `{part}`"))?;
    }
    if out[0] > 180 {
        return Err(format!("hue must be 0-180, got {}", out[0]));
    }
    Ok(out)
}
