//! Self-describing metadata stored at the very start of a carrier.
//!
//! Layout, one bit per channel in bit 0, most significant bit first:
//!
//! ```text
//! [ length L: u16 big endian ][ L bytes UTF-8: field,field,... ]
//! ```
//!
//! The region is reserved up front with a fixed size per payload kind, so the
//! payload that follows never overlaps with the header regardless of `L`.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use std::str::FromStr;

use crate::bit_plane::BitDepth;
use crate::error::{HeaderFault, SteganoError};
use crate::media::lsb_stream::{LsbReader, LsbWriter};
use crate::result::Result;

/// bits of the length prefix
pub const LENGTH_PREFIX_BITS: usize = 16;
/// room for long file names
pub const BLOB_HEADER_RESERVED_BITS: usize = 8192;
pub const IMAGE_HEADER_RESERVED_BITS: usize = 4096;

const FIELD_SEPARATOR: char = ',';

/// A typed header, converted from and to its textual fields
pub trait HeaderRecord: Sized {
    const FIELD_COUNT: usize;

    fn to_fields(&self) -> Vec<String>;

    /// `fields` is guaranteed to hold exactly `FIELD_COUNT` entries
    fn from_fields(fields: &[String]) -> std::result::Result<Self, HeaderFault>;
}

/// Reads and writes headers within a reserved region of `reserved_bits` channels
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HeaderCodec {
    reserved_bits: usize,
}

impl HeaderCodec {
    pub fn new(reserved_bits: usize) -> Self {
        Self { reserved_bits }
    }

    pub fn reserved_bits(&self) -> usize {
        self.reserved_bits
    }

    /// Writes `fields` into the header region and returns the number of channels used.
    ///
    /// Nothing is written if the header does not fit.
    pub fn write<S: AsRef<str>>(&self, channels: &mut [u8], fields: &[S]) -> Result<usize> {
        let mut text = String::new();
        for (i, field) in fields.iter().map(AsRef::as_ref).enumerate() {
            if field.contains(FIELD_SEPARATOR) {
                return Err(SteganoError::InvalidHeaderField(field.to_owned()));
            }
            if i > 0 {
                text.push(FIELD_SEPARATOR);
            }
            text.push_str(field);
        }

        let size = LENGTH_PREFIX_BITS + text.len() * 8;
        let limit = self.reserved_bits.min(channels.len());
        if size > limit || text.len() > u16::MAX as usize {
            return Err(SteganoError::HeaderTooLarge { size, limit });
        }

        let mut writer = LsbWriter::new(channels);
        writer.write_u16::<BigEndian>(text.len() as u16)?;
        writer.write_all(text.as_bytes())?;
        log::debug!("header of {size} bits written: {text:?}");

        Ok(size)
    }

    pub fn read(&self, channels: &[u8]) -> Result<Vec<String>> {
        if channels.len() < LENGTH_PREFIX_BITS {
            return Err(HeaderFault::Truncated {
                needed: LENGTH_PREFIX_BITS,
                available: channels.len(),
            }
            .into());
        }

        let mut reader = LsbReader::new(channels);
        let len = reader.read_u16::<BigEndian>()? as usize;
        if len == 0 {
            return Err(HeaderFault::EmptyLength.into());
        }

        let declared_bits = LENGTH_PREFIX_BITS + len * 8;
        if declared_bits > self.reserved_bits {
            return Err(HeaderFault::LengthOutOfBounds {
                declared_bits,
                limit_bits: self.reserved_bits,
            }
            .into());
        }
        if declared_bits > channels.len() {
            return Err(HeaderFault::Truncated {
                needed: declared_bits,
                available: channels.len(),
            }
            .into());
        }

        let mut buf = vec![0; len];
        reader.read_exact(&mut buf)?;
        let text = String::from_utf8(buf).map_err(|_| HeaderFault::InvalidUtf8)?;

        Ok(text.split(FIELD_SEPARATOR).map(str::to_owned).collect())
    }

    pub fn write_record<R: HeaderRecord>(&self, channels: &mut [u8], record: &R) -> Result<usize> {
        self.write(channels, record.to_fields().as_slice())
    }

    pub fn read_record<R: HeaderRecord>(&self, channels: &[u8]) -> Result<R> {
        let fields = self.read(channels)?;
        if fields.len() != R::FIELD_COUNT {
            return Err(HeaderFault::FieldCount {
                expected: R::FIELD_COUNT,
                found: fields.len(),
            }
            .into());
        }

        Ok(R::from_fields(&fields)?)
    }
}

fn parse_field<T: FromStr>(fields: &[String], index: usize) -> std::result::Result<T, HeaderFault> {
    fields[index]
        .parse()
        .map_err(|_| field_type_fault(fields, index))
}

fn parse_depth(fields: &[String], index: usize) -> std::result::Result<BitDepth, HeaderFault> {
    BitDepth::new(parse_field(fields, index)?).ok_or_else(|| field_type_fault(fields, index))
}

fn field_type_fault(fields: &[String], index: usize) -> HeaderFault {
    HeaderFault::FieldType {
        index,
        value: fields[index].clone(),
    }
}

/// Metadata of a hidden file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobHeader {
    pub name: String,
    pub size: u64,
}

impl HeaderRecord for BlobHeader {
    const FIELD_COUNT: usize = 2;

    fn to_fields(&self) -> Vec<String> {
        vec![self.name.clone(), self.size.to_string()]
    }

    fn from_fields(fields: &[String]) -> std::result::Result<Self, HeaderFault> {
        Ok(Self {
            name: fields[0].clone(),
            size: parse_field(fields, 1)?,
        })
    }
}

/// Everything needed to walk the carrier again when unveiling a hidden image.
///
/// `stride` is stored as the shortest decimal that parses back to the very
/// same `f64`, unveil must never recompute it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub lsb: BitDepth,
    pub msb: BitDepth,
    pub stride: f64,
}

impl HeaderRecord for ImageHeader {
    const FIELD_COUNT: usize = 5;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.width.to_string(),
            self.height.to_string(),
            self.lsb.to_string(),
            self.msb.to_string(),
            self.stride.to_string(),
        ]
    }

    fn from_fields(fields: &[String]) -> std::result::Result<Self, HeaderFault> {
        let stride: f64 = parse_field(fields, 4)?;
        if !stride.is_finite() || stride <= 0.0 {
            return Err(field_type_fault(fields, 4));
        }

        Ok(Self {
            width: parse_field(fields, 0)?,
            height: parse_field(fields, 1)?,
            lsb: parse_depth(fields, 2)?,
            msb: parse_depth(fields, 3)?,
            stride,
        })
    }
}
