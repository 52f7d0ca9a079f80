use std::path::PathBuf;

use clap::Args;
use pixveil_core::api::capacity::CarrierCapacity;
use pixveil_core::{api, PayloadKind};

use crate::cli::SecretKind;
use crate::CliResult;

/// Shows how much a PNG image can hide
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// Carrier image
    #[arg(short = 'i', long = "in", value_name = "carrier image", required = true)]
    pub media: PathBuf,

    /// Only show the capacity for this kind of secret
    #[arg(short, long, value_enum)]
    pub kind: Option<SecretKind>,
}

impl CapacityArgs {
    pub fn run(self) -> CliResult<()> {
        let kinds = match self.kind {
            Some(kind) => vec![kind.into()],
            None => vec![PayloadKind::Text, PayloadKind::Blob, PayloadKind::Image],
        };

        for kind in kinds {
            let capacity = api::capacity::prepare()
                .for_image(&self.media)
                .of_kind(kind)
                .execute()?;
            print_capacity(&capacity);
        }

        Ok(())
    }
}

fn print_capacity(capacity: &CarrierCapacity) {
    let report = &capacity.report;
    println!(
        "{} in {}x{}: {} bytes available at {} bit per channel, {} bytes stay invisible",
        capacity.kind,
        capacity.width,
        capacity.height,
        report.available_bytes,
        report.depth,
        report.safe_bytes
    );

    for row in &capacity.image_table {
        println!(
            "  lsb={}: {} bits, up to {} pixels at msb=8, about {}x{}",
            row.lsb, row.available_bits, row.max_hidden_pixels, row.max_square_side, row.max_square_side
        );
    }
}
