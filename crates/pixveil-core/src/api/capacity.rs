use std::path::{Path, PathBuf};

use crate::capacity::{image_capacity_table, CapacityReport, ImageCapacityRow};
use crate::media::payload::{Codec, Concealer, PayloadKind};
use crate::media::PixelBuffer;
use crate::{CodecOptions, SteganoError};

pub fn prepare() -> CapacityApi {
    CapacityApi::default()
}

/// How much a carrier can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierCapacity {
    pub width: u32,
    pub height: u32,
    pub kind: PayloadKind,
    pub report: CapacityReport,
    /// one row per `lsb`, only filled for images
    pub image_table: Vec<ImageCapacityRow>,
}

#[derive(Default, Debug)]
pub struct CapacityApi {
    image: Option<PathBuf>,
    kind: PayloadKind,
    options: CodecOptions,
}

impl CapacityApi {
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn for_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    pub fn of_kind(mut self, kind: PayloadKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn execute(self) -> Result<CarrierCapacity, SteganoError> {
        let Some(image) = &self.image else {
            return Err(SteganoError::CarrierNotSet);
        };
        let (width, height) = PixelBuffer::open(image)?.dimensions();

        Ok(self.for_dimensions(width, height))
    }

    /// the same figures for a carrier that is not on disk
    pub fn for_dimensions(&self, width: u32, height: u32) -> CarrierCapacity {
        let report = Codec::new(self.kind, &self.options)
            .capacity(width, height)
            .report();
        let image_table = match self.kind {
            PayloadKind::Image => image_capacity_table(width, height, self.options.image_header_bits),
            _ => Vec::new(),
        };

        CarrierCapacity {
            width,
            height,
            kind: self.kind,
            report,
            image_table,
        }
    }
}
