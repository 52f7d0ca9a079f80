use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::Confirm;
use pixveil_core::{PayloadKind, SteganoError};

use crate::commands::*;
use crate::CliResult;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Hide(hide::HideArgs),
    Unveil(unveil::UnveilArgs),
    Capacity(capacity::CapacityArgs),
}

/// The kind of secret, as named on the command line
#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SecretKind {
    /// a text message
    Text,
    /// a single file
    File,
    /// a whole image
    Image,
}

impl From<SecretKind> for PayloadKind {
    fn from(kind: SecretKind) -> Self {
        match kind {
            SecretKind::Text => PayloadKind::Text,
            SecretKind::File => PayloadKind::Blob,
            SecretKind::Image => PayloadKind::Image,
        }
    }
}

/// Asks a yes/no question on the terminal, `false` unless confirmed
pub fn confirm(prompt: &str) -> CliResult<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| SteganoError::IoError(std::io::Error::other(e)))
}
