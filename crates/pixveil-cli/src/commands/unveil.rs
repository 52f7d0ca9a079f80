use std::path::PathBuf;

use clap::Args;
use pixveil_core::api;

use crate::cli::SecretKind;
use crate::CliResult;

/// Unveils a message, a file or an image from a PNG image
#[derive(Args, Debug)]
pub struct UnveilArgs {
    /// Source image that contains secret data
    #[arg(
        short = 'i',
        long = "in",
        value_name = "media source file",
        required = true
    )]
    pub media: PathBuf,

    /// Final data will be stored in that folder
    #[arg(
        short = 'o',
        long = "out",
        value_name = "output folder",
        required = true
    )]
    pub output_folder: PathBuf,

    /// What kind of secret is hidden, the image does not tell
    #[arg(short, long, value_enum, default_value_t = SecretKind::Text)]
    pub kind: SecretKind,
}

impl UnveilArgs {
    pub fn run(self) -> CliResult<()> {
        let unveiled = api::unveil::prepare()
            .from_secret_file(&self.media)
            .expecting(self.kind.into())
            .into_output_folder(&self.output_folder)
            .execute()?;
        println!("{}", unveiled.display());

        Ok(())
    }
}
