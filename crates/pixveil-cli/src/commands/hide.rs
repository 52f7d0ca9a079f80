use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args};
use log::{info, warn};
use pixveil_core::capacity::Capacity;
use pixveil_core::media::CHANNELS_PER_PIXEL;
use pixveil_core::{
    api, AdaptiveOptions, BitDepth, CodecOptions, PayloadKind, PixelBuffer, SteganoError,
};

use crate::cli::confirm;
use crate::CliResult;

/// Hides a message, a file or an image in a PNG image
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("secret").required(true).args(["message", "data_file", "secret_image"])))]
pub struct HideArgs {
    /// Carrier image, used readonly
    #[arg(short = 'i', long = "in", value_name = "carrier image", required = true)]
    pub media: PathBuf,

    /// Final image will be stored as PNG file
    #[arg(
        short = 'o',
        long = "out",
        value_name = "output image file",
        required = true
    )]
    pub write_to_file: PathBuf,

    /// A text message that will be hidden
    #[arg(short, long, value_name = "text message")]
    pub message: Option<String>,

    /// File to hide in the image
    #[arg(short = 'd', long = "data", value_name = "data file")]
    pub data_file: Option<PathBuf>,

    /// Image to hide in the image
    #[arg(short = 's', long = "secret-image", value_name = "secret image")]
    pub secret_image: Option<PathBuf>,

    /// Carrier bits used per color channel when hiding an image
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8), requires = "secret_image")]
    pub lsb: Option<u8>,

    /// Bits kept of every color channel of a hidden image
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8), requires = "secret_image")]
    pub msb: Option<u8>,

    /// Distance between written pixel groups, spread evenly if not given
    #[arg(long, requires = "secret_image")]
    pub stride: Option<f64>,

    /// Picks the least visible lsb and the best msb that fit
    #[arg(long, requires = "secret_image", conflicts_with_all = ["lsb", "msb"])]
    pub auto: bool,

    /// Do not ask before hiding a file that might become visible
    #[arg(short, long)]
    pub yes: bool,
}

impl HideArgs {
    pub fn run(self) -> CliResult<()> {
        let options = self.options()?;

        if let Some(data_file) = &self.data_file {
            if !self.yes && !self.confirm_visible_file(data_file, &options)? {
                warn!("hiding {data_file:?} was cancelled");
                return Ok(());
            }
        }

        let mut hide = api::hide::prepare()
            .with_image(&self.media)
            .with_output(&self.write_to_file)
            .with_options(options);
        if let Some(message) = &self.message {
            hide = hide.with_message(message);
        }
        if let Some(data_file) = &self.data_file {
            hide = hide.with_file(data_file);
        }
        if let Some(secret_image) = &self.secret_image {
            hide = hide.with_secret_image(secret_image);
        }

        hide.execute()
    }

    fn options(&self) -> CliResult<CodecOptions> {
        let options = CodecOptions::default();
        let mut adaptive = options.adaptive;

        if let Some(lsb) = self.lsb {
            adaptive.lsb = BitDepth::try_from(lsb)?;
        }
        if let Some(msb) = self.msb {
            adaptive.msb = BitDepth::try_from(msb)?;
        }
        if self.auto {
            if let Some(secret_image) = &self.secret_image {
                adaptive = self.optimal(secret_image, options.image_header_bits)?;
            }
        }
        adaptive.stride = self.stride;

        Ok(options.with_adaptive(adaptive))
    }

    fn optimal(&self, secret_image: &Path, reserved: usize) -> CliResult<AdaptiveOptions> {
        let (width, height) = PixelBuffer::open(&self.media)?.dimensions();
        let payload = PixelBuffer::open(secret_image)?.dimensions();

        let adaptive = AdaptiveOptions::optimal((width, height), payload, reserved).ok_or_else(
            || SteganoError::CapacityExceeded {
                required: payload.0 as usize * payload.1 as usize * CHANNELS_PER_PIXEL,
                available: Capacity::of(width, height, reserved, BitDepth::MAX)
                    .in_groups_of(CHANNELS_PER_PIXEL)
                    .available_bits(),
            },
        )?;
        info!("picked lsb={} msb={}", adaptive.lsb, adaptive.msb);

        Ok(adaptive)
    }

    /// asks the user if a file uses more than the safe share of the carrier
    fn confirm_visible_file(&self, data_file: &Path, options: &CodecOptions) -> CliResult<bool> {
        let size = fs::metadata(data_file)
            .map_err(|source| SteganoError::ReadError { source })?
            .len() as usize;
        let capacity = api::capacity::prepare()
            .for_image(&self.media)
            .of_kind(PayloadKind::Blob)
            .with_options(options.clone())
            .execute()?;
        let report = capacity.report;

        if !report.exceeds_safe_usage(size) {
            return Ok(true);
        }

        confirm(&format!(
            "{data_file:?} takes {:.1}% of the carrier, above {} bytes changes might become visible. Continue?",
            report.usage_percent(size),
            report.safe_bytes
        ))
    }
}
