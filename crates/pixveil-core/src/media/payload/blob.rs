use std::io::{Read, Write};
use std::path::Path;

use log::debug;

use crate::bit_plane::BitDepth;
use crate::capacity::Capacity;
use crate::error::SteganoError;
use crate::media::header::{BlobHeader, HeaderCodec};
use crate::media::lsb_stream::{LsbReader, LsbWriter};
use crate::media::PixelBuffer;
use crate::result::Result;

use super::{kind_mismatch, BlobPayload, Concealer, Payload, PayloadKind};

/// Hides one named file, one bit per channel.
///
/// The header `name,size` sits in the reserved region, the data follows right behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobCodec {
    header: HeaderCodec,
}

impl BlobCodec {
    pub fn new(reserved_bits: usize) -> Self {
        Self {
            header: HeaderCodec::new(reserved_bits),
        }
    }

    fn data_offset(&self) -> usize {
        self.header.reserved_bits()
    }
}

/// The bare file name, without any directories. Commas would break the header.
pub(crate) fn file_name(name: &str) -> Result<String> {
    let name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(SteganoError::InvalidFileName)?;
    if name.is_empty() || name.contains(',') {
        return Err(SteganoError::InvalidFileName);
    }

    Ok(name.to_owned())
}

impl Concealer for BlobCodec {
    fn kind(&self) -> PayloadKind {
        PayloadKind::Blob
    }

    fn capacity(&self, width: u32, height: u32) -> Capacity {
        Capacity::of(width, height, self.data_offset(), BitDepth::MIN)
    }

    fn conceal(&self, carrier: &PixelBuffer, payload: &Payload) -> Result<PixelBuffer> {
        let Payload::Blob(blob) = payload else {
            return Err(kind_mismatch(self.kind(), payload));
        };
        let record = BlobHeader {
            name: file_name(&blob.name)?,
            size: blob.data.len() as u64,
        };
        self.capacity(carrier.width(), carrier.height())
            .ensure_fits(blob.data.len() * 8)?;

        let mut stego = carrier.clone();
        self.header.write_record(stego.channels_mut(), &record)?;
        LsbWriter::at(stego.channels_mut(), self.data_offset()).write_all(&blob.data)?;
        debug!("file {:?} of {} bytes hidden", record.name, record.size);

        Ok(stego)
    }

    fn unveil(&self, carrier: &PixelBuffer) -> Result<Payload> {
        let channels = carrier.channels();
        let record: BlobHeader = self.header.read_record(channels)?;
        let name = file_name(&record.name)?;

        let available = channels.len().saturating_sub(self.data_offset()) / 8;
        let size = usize::try_from(record.size)
            .ok()
            .filter(|size| *size <= available)
            .ok_or_else(|| SteganoError::CorruptPayload {
                expected: record.size.try_into().unwrap_or(usize::MAX),
                recovered: available,
            })?;

        let mut data = vec![0; size];
        LsbReader::at(channels, self.data_offset()).read_exact(&mut data)?;
        debug!("file {name:?} of {size} bytes unveiled");

        Ok(Payload::Blob(BlobPayload { name, data }))
    }
}
