mod landmarks;
mod mask;
mod pair;
mod process;
mod utils;

use crate::cli::{Cli, Commands, GlobalOptions};
use footprint::FootprintResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> FootprintResult<()> {
    let Cli { global, command } = cli;
    dispatch(&global, command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(global: &GlobalOptions, command: Commands) -> FootprintResult<()> {
    match command {
        Commands::Process(cmd) => process::run(global, cmd),
        Commands::Mask(cmd) => mask::run(global, cmd),
        Commands::Landmarks(cmd) => landmarks::run(global, cmd),
        Commands::Pair(cmd) => pair::run(global, cmd),
    }
}
