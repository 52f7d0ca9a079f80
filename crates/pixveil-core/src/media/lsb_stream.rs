//! Byte streams on top of the lowest bit-plane of a channel buffer.
//!
//! Every byte occupies 8 consecutive channels, most significant bit first.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io::{Cursor, Read, Result, Write};
use std::slice::{Iter, IterMut};

use crate::bit_plane::{set_low_bits, BitDepth};

/// Writes bytes into bit 0 of the channels, one bit per channel.
///
/// When the channels are exhausted `write` returns `Ok(0)`, which
/// `write_all` turns into `ErrorKind::WriteZero`.
pub struct LsbWriter<'c> {
    channels: IterMut<'c, u8>,
}

impl<'c> LsbWriter<'c> {
    pub fn new(channels: &'c mut [u8]) -> Self {
        Self {
            channels: channels.iter_mut(),
        }
    }

    /// starts writing at channel index `offset`
    pub fn at(channels: &'c mut [u8], offset: usize) -> Self {
        Self::new(channels.get_mut(offset..).unwrap_or_default())
    }

    /// number of channels still writable
    pub fn remaining(&self) -> usize {
        self.channels.len()
    }
}

impl Write for LsbWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let bytes = buf.len().min(self.channels.len() >> 3);
        let mut bits = BitReader::endian(Cursor::new(&buf[..bytes]), BigEndian);

        for channel in self.channels.by_ref().take(bytes << 3) {
            let bit = bits.read_bit()?;
            *channel = set_low_bits(*channel, bit as u8, BitDepth::MIN);
        }

        Ok(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Reads bytes from bit 0 of the channels, one bit per channel.
///
/// Trailing channels that do not make up a full byte are never returned.
pub struct LsbReader<'c> {
    channels: Iter<'c, u8>,
    consumed: usize,
}

impl<'c> LsbReader<'c> {
    pub fn new(channels: &'c [u8]) -> Self {
        Self {
            channels: channels.iter(),
            consumed: 0,
        }
    }

    /// starts reading at channel index `offset`
    pub fn at(channels: &'c [u8], offset: usize) -> Self {
        Self::new(channels.get(offset..).unwrap_or_default())
    }

    /// number of channels read so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl Read for LsbReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let bytes = buf.len().min(self.channels.len() >> 3);
        let mut bits = BitWriter::endian(Cursor::new(&mut buf[..bytes]), BigEndian);

        for channel in self.channels.by_ref().take(bytes << 3) {
            bits.write_bit(channel & 1 == 1)?;
        }
        self.consumed += bytes << 3;

        Ok(bytes)
    }
}
