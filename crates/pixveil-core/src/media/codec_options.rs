use crate::bit_plane::BitDepth;
use crate::capacity::optimal_depths;
use crate::media::header::{BLOB_HEADER_RESERVED_BITS, IMAGE_HEADER_RESERVED_BITS};

/// bits withheld from a text carrier for the terminating zero bytes
pub const TEXT_TERMINATOR_BITS: usize = 16;

/// Codec configuration, frozen into a codec when it gets created
///
/// The reserved regions are counted in carrier channels, the header uses one bit of each.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecOptions {
    /// channels reserved in front of a hidden file for its header
    pub blob_header_bits: usize,

    /// channels reserved in front of a hidden image for its header
    pub image_header_bits: usize,

    /// bits needed to terminate a hidden text message
    pub text_terminator_bits: usize,

    pub adaptive: AdaptiveOptions,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            blob_header_bits: BLOB_HEADER_RESERVED_BITS,
            image_header_bits: IMAGE_HEADER_RESERVED_BITS,
            text_terminator_bits: TEXT_TERMINATOR_BITS,
            adaptive: AdaptiveOptions::default(),
        }
    }
}

impl CodecOptions {
    pub fn with_adaptive(mut self, adaptive: AdaptiveOptions) -> Self {
        self.adaptive = adaptive;
        self
    }
}

/// Options for hiding an image inside an image
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AdaptiveOptions {
    /// bits taken from every carrier channel
    pub lsb: BitDepth,

    /// bits kept of every payload channel, the rest is lost
    pub msb: BitDepth,

    /// Distance between write groups in pixels.
    /// `None` spreads the payload evenly over the whole carrier.
    pub stride: Option<f64>,
}

impl Default for AdaptiveOptions {
    fn default() -> Self {
        Self {
            lsb: BitDepth::HALF,
            msb: BitDepth::HALF,
            stride: None,
        }
    }
}

impl AdaptiveOptions {
    pub fn new(lsb: BitDepth, msb: BitDepth) -> Self {
        Self {
            lsb,
            msb,
            stride: None,
        }
    }

    pub fn with_stride(mut self, stride: f64) -> Self {
        self.stride = Some(stride);
        self
    }

    /// The least carrier distortion that still fits the payload.
    ///
    /// Smallest `lsb` first, then the largest `msb` for it. `None` if nothing fits.
    pub fn optimal(carrier: (u32, u32), payload: (u32, u32), reserved: usize) -> Option<Self> {
        optimal_depths(carrier, payload, reserved).map(|(lsb, msb)| Self::new(lsb, msb))
    }
}
