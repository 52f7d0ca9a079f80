use log::debug;

use crate::capacity::Capacity;
use crate::error::SteganoError;
use crate::media::codec_options::AdaptiveOptions;
use crate::media::header::{HeaderCodec, ImageHeader};
use crate::media::image::{embed, extract, EmbeddingPlan};
use crate::media::{PixelBuffer, CHANNELS_PER_PIXEL};
use crate::result::Result;

use super::{kind_mismatch, Concealer, Payload, PayloadKind};

/// Hides a whole image with adaptive bit depths, see [`crate::media::image::adaptive`]
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCodec {
    header: HeaderCodec,
    options: AdaptiveOptions,
}

impl ImageCodec {
    pub fn new(reserved_bits: usize, options: AdaptiveOptions) -> Self {
        Self {
            header: HeaderCodec::new(reserved_bits),
            options,
        }
    }

    pub fn options(&self) -> &AdaptiveOptions {
        &self.options
    }

    /// the embedding `secret` would get in `carrier`, without touching either
    pub fn plan(&self, carrier: &PixelBuffer, secret: &PixelBuffer) -> Result<EmbeddingPlan> {
        let carrier_slots = carrier.channels().len();
        let offset = self.header.reserved_bits();
        let payload_slots = secret.channels().len();
        let AdaptiveOptions { lsb, msb, stride } = self.options;

        match stride {
            Some(stride) => {
                EmbeddingPlan::with_stride(carrier_slots, offset, payload_slots, lsb, msb, stride)
            }
            None => EmbeddingPlan::spread(carrier_slots, offset, payload_slots, lsb, msb),
        }
    }

    /// Refuses headers that promise more payload than the carrier can hold
    /// before anything gets allocated for it.
    fn ensure_plausible(&self, header: &ImageHeader, carrier_slots: usize) -> Result<()> {
        let payload_slots = (header.width as u64)
            .checked_mul(header.height as u64)
            .and_then(|p| p.checked_mul(CHANNELS_PER_PIXEL as u64));
        let available =
            carrier_slots.saturating_sub(self.header.reserved_bits()) as u64 * header.lsb.bits() as u64;
        let plausible = payload_slots
            .and_then(|p| p.checked_mul(header.msb.bits() as u64))
            .is_some_and(|required| required <= available);

        if !plausible {
            return Err(SteganoError::CorruptPayload {
                expected: payload_slots
                    .and_then(|p| usize::try_from(p).ok())
                    .unwrap_or(usize::MAX),
                recovered: 0,
            });
        }

        Ok(())
    }
}

impl Concealer for ImageCodec {
    fn kind(&self) -> PayloadKind {
        PayloadKind::Image
    }

    fn capacity(&self, width: u32, height: u32) -> Capacity {
        Capacity::of(width, height, self.header.reserved_bits(), self.options.lsb)
            .in_groups_of(CHANNELS_PER_PIXEL)
    }

    fn conceal(&self, carrier: &PixelBuffer, payload: &Payload) -> Result<PixelBuffer> {
        let Payload::Image(secret) = payload else {
            return Err(kind_mismatch(self.kind(), payload));
        };
        let plan = self.plan(carrier, secret)?;
        let header = plan.header(secret.width(), secret.height());

        let mut stego = carrier.clone();
        embed(&plan, stego.channels_mut(), secret.channels())?;
        self.header.write_record(stego.channels_mut(), &header)?;
        debug!(
            "image of {}x{} hidden with lsb={} msb={} stride={}",
            header.width, header.height, header.lsb, header.msb, header.stride
        );

        Ok(stego)
    }

    fn unveil(&self, carrier: &PixelBuffer) -> Result<Payload> {
        let header: ImageHeader = self.header.read_record(carrier.channels())?;
        self.ensure_plausible(&header, carrier.channels().len())?;
        debug!("unveiling with {header:?}");

        let plan = EmbeddingPlan::from_header(&header, self.header.reserved_bits());
        let channels = extract(&plan, carrier.channels())?;

        Ok(Payload::Image(PixelBuffer::new(
            header.width,
            header.height,
            channels,
        )?))
    }
}
