//! The three kinds of payload and the codecs that hide them.
//!
//! Text and files are stored one bit per channel, images use the adaptive
//! engine in [`crate::media::image`]. A carrier does not record which kind it
//! holds, so the kind has to be known when unveiling.

mod blob;
mod image;
mod text;

use std::fmt;
use std::fs;
use std::path::Path;

use enum_dispatch::enum_dispatch;
use log::error;

use crate::capacity::Capacity;
use crate::error::SteganoError;
use crate::media::{CodecOptions, PixelBuffer};
use crate::result::Result;

pub use blob::BlobCodec;
pub use image::ImageCodec;
pub use text::TextCodec;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    #[default]
    Text,
    Blob,
    Image,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadKind::Text => "text",
            PayloadKind::Blob => "file",
            PayloadKind::Image => "image",
        };
        f.write_str(name)
    }
}

/// A named chunk of bytes, usually a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobPayload {
    pub name: String,
    pub data: Vec<u8>,
}

impl BlobPayload {
    pub fn new<S: Into<String>>(name: S, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// reads a whole file, the name is its last path component
    pub fn from_file(file: &Path) -> Result<Self> {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(SteganoError::InvalidFileName)?;
        let data = fs::read(file).map_err(|e| {
            error!("Error reading file {file:?}: {e}");
            SteganoError::ReadError { source: e }
        })?;

        Ok(Self::new(name, data))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Blob(BlobPayload),
    Image(PixelBuffer),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Text(_) => PayloadKind::Text,
            Payload::Blob(_) => PayloadKind::Blob,
            Payload::Image(_) => PayloadKind::Image,
        }
    }

    /// bytes handed in by the user, before any framing
    pub fn len(&self) -> usize {
        match self {
            Payload::Text(text) => text.len(),
            Payload::Blob(blob) => blob.data.len(),
            Payload::Image(image) => image.channels().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<BlobPayload> for Payload {
    fn from(blob: BlobPayload) -> Self {
        Payload::Blob(blob)
    }
}

impl From<PixelBuffer> for Payload {
    fn from(image: PixelBuffer) -> Self {
        Payload::Image(image)
    }
}

/// Hides a payload of one kind in a carrier and gets it back out
#[enum_dispatch]
pub trait Concealer {
    fn kind(&self) -> PayloadKind;

    /// capacity of a `width` x `height` carrier for this kind of payload
    fn capacity(&self, width: u32, height: u32) -> Capacity;

    /// Returns a copy of `carrier` with `payload` hidden inside.
    ///
    /// All checks happen before the copy is modified, on error `carrier` is untouched anyway.
    fn conceal(&self, carrier: &PixelBuffer, payload: &Payload) -> Result<PixelBuffer>;

    fn unveil(&self, carrier: &PixelBuffer) -> Result<Payload>;
}

#[enum_dispatch(Concealer)]
#[derive(Debug, Clone, PartialEq)]
pub enum Codec {
    TextCodec,
    BlobCodec,
    ImageCodec,
}

impl Codec {
    pub fn new(kind: PayloadKind, options: &CodecOptions) -> Self {
        match kind {
            PayloadKind::Text => TextCodec::new(options.text_terminator_bits).into(),
            PayloadKind::Blob => BlobCodec::new(options.blob_header_bits).into(),
            PayloadKind::Image => {
                ImageCodec::new(options.image_header_bits, options.adaptive).into()
            }
        }
    }

    /// the codec for the kind of `payload`
    pub fn for_payload(payload: &Payload, options: &CodecOptions) -> Self {
        Self::new(payload.kind(), options)
    }
}

pub(crate) fn kind_mismatch(expected: PayloadKind, payload: &Payload) -> SteganoError {
    SteganoError::PayloadKindMismatch {
        expected,
        given: payload.kind(),
    }
}
