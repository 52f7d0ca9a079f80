use clap::Parser;
use pixveil_core::SteganoError;

mod cli;
mod commands;

use crate::cli::{CliArgs, Commands};

pub type CliResult<T> = std::result::Result<T, SteganoError>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    match args.command {
        Commands::Hide(hide) => hide.run(),
        Commands::Unveil(unveil) => unveil.run(),
        Commands::Capacity(capacity) => capacity.run(),
    }
}
