use std::io::{ErrorKind, Write};

use byteorder::ReadBytesExt;
use log::debug;

use crate::bit_plane::BitDepth;
use crate::capacity::Capacity;
use crate::error::SteganoError;
use crate::media::lsb_stream::{LsbReader, LsbWriter};
use crate::media::PixelBuffer;
use crate::result::Result;

use super::{kind_mismatch, Concealer, Payload, PayloadKind};

/// Hides UTF-8 text one bit per channel, starting at the first channel.
///
/// The text is followed by zero bytes as terminator, so it must not contain
/// such a run itself and must not end with a zero byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCodec {
    terminator_bits: usize,
}

impl TextCodec {
    pub fn new(terminator_bits: usize) -> Self {
        Self { terminator_bits }
    }

    fn terminator_len(&self) -> usize {
        self.terminator_bits.div_ceil(8).max(1)
    }

    fn ensure_unambiguous(&self, text: &[u8]) -> Result<()> {
        let n = self.terminator_len();
        if text.last() == Some(&0) || text.windows(n).any(|w| w.iter().all(|b| *b == 0)) {
            return Err(SteganoError::AmbiguousTerminator);
        }

        Ok(())
    }
}

impl Concealer for TextCodec {
    fn kind(&self) -> PayloadKind {
        PayloadKind::Text
    }

    fn capacity(&self, width: u32, height: u32) -> Capacity {
        Capacity::of(width, height, self.terminator_len() * 8, BitDepth::MIN)
    }

    fn conceal(&self, carrier: &PixelBuffer, payload: &Payload) -> Result<PixelBuffer> {
        let Payload::Text(text) = payload else {
            return Err(kind_mismatch(self.kind(), payload));
        };
        let bytes = text.as_bytes();
        self.ensure_unambiguous(bytes)?;
        // text and terminator together against the whole carrier
        Capacity::of(carrier.width(), carrier.height(), 0, BitDepth::MIN)
            .ensure_fits((bytes.len() + self.terminator_len()) * 8)?;

        let mut stego = carrier.clone();
        let mut writer = LsbWriter::new(stego.channels_mut());
        writer.write_all(bytes)?;
        writer.write_all(&vec![0; self.terminator_len()])?;
        debug!("text of {} bytes hidden", bytes.len());

        Ok(stego)
    }

    fn unveil(&self, carrier: &PixelBuffer) -> Result<Payload> {
        let n = self.terminator_len();
        let mut reader = LsbReader::new(carrier.channels());
        let mut bytes = Vec::new();

        loop {
            let byte = match reader.read_u8() {
                Ok(byte) => byte,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Err(SteganoError::TerminatorNotFound {
                        scanned_bits: reader.consumed(),
                    })
                }
                Err(e) => return Err(e.into()),
            };
            bytes.push(byte);

            if bytes.len() >= n && bytes[bytes.len() - n..].iter().all(|b| *b == 0) {
                bytes.truncate(bytes.len() - n);
                break;
            }
        }
        debug!("text of {} bytes unveiled", bytes.len());

        Ok(Payload::Text(String::from_utf8(bytes)?))
    }
}
