//! # Pixveil Core API
//!
//! Hides a text message, a file or a whole image in the low bit-planes of an
//! RGB carrier image, and gets it back out of that image alone.
//!
//! - text and files take 1 bit of every color channel
//! - images take `lsb` bits of every carrier channel and keep `msb` bits of
//!   every payload channel, spread evenly over the carrier
//!
//! The carrier describes itself, everything needed for unveiling is stored in a
//! header inside the image. What it does not store is the kind of payload, the
//! caller has to know it.
//!
//! # Usage Examples
//!
//! ## Hide an image inside an image
//!
//! ```rust
//! use pixveil_core::media::payload::{Payload, PayloadKind};
//! use pixveil_core::media::{CodecOptions, PixelBuffer};
//!
//! let carrier = PixelBuffer::from_fn(128, 128, |x, y| [x as u8, y as u8, 200]);
//! let secret = PixelBuffer::from_fn(16, 16, |x, y| [x as u8 * 16, y as u8 * 16, 0]);
//!
//! let options = CodecOptions::default();
//! let stego = pixveil_core::hide(&carrier, &Payload::Image(secret), &options)
//!     .expect("Failed to hide image");
//!
//! let unveiled = pixveil_core::unveil(&stego, PayloadKind::Image, &options)
//!     .expect("Failed to unveil image");
//! assert_eq!(unveiled.kind(), PayloadKind::Image);
//! ```
//!
//! ## Hide a file inside an image on disk
//!
//! ```rust
//! use pixveil_core::media::PixelBuffer;
//! use pixveil_core::PayloadKind;
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//! let carrier = temp_dir.path().join("carrier.png");
//! PixelBuffer::from_fn(128, 128, |x, y| [x as u8, y as u8, 42])
//!     .save_png(&carrier)
//!     .expect("Failed to write carrier");
//!
//! pixveil_core::api::hide::prepare()
//!     .with_file("Cargo.toml")        // will hide this file inside the image
//!     .with_image(&carrier)
//!     .with_output(temp_dir.path().join("image-with-a-file-inside.png"))
//!     .execute()
//!     .expect("Failed to hide file in image");
//!
//! let unveiled = pixveil_core::api::unveil::prepare()
//!     .from_secret_file(temp_dir.path().join("image-with-a-file-inside.png"))
//!     .expecting(PayloadKind::Blob)
//!     .into_output_folder(temp_dir.path())
//!     .execute()
//!     .expect("Failed to unveil file from image");
//!
//! assert_eq!(unveiled, temp_dir.path().join("Cargo.toml"));
//! ```

#![warn(
    // clippy::unwrap_used,
    // clippy::expect_used,
// clippy::cargo_common_metadata,
// clippy::branches_sharing_code,
// clippy::cast_lossless,
// clippy::inefficient_to_string,
// clippy::match_bool,
// clippy::missing_panics_doc,
// clippy::redundant_closure,
    clippy::redundant_else,
// clippy::unnested_or_patterns,
// clippy::use_self,
)]

pub mod api;
pub mod bit_plane;
pub mod capacity;
pub mod error;
pub mod media;
pub mod result;

pub use crate::bit_plane::BitDepth;
pub use crate::error::SteganoError;
pub use crate::media::payload::{BlobPayload, Payload, PayloadKind};
pub use crate::media::{AdaptiveOptions, CodecOptions, Persist, PixelBuffer};
pub use crate::result::Result;

use crate::media::payload::{Codec, Concealer};

/// Returns a copy of `carrier` with `payload` hidden inside, `carrier` itself stays as it is
pub fn hide(carrier: &PixelBuffer, payload: &Payload, options: &CodecOptions) -> Result<PixelBuffer> {
    Codec::for_payload(payload, options).conceal(carrier, payload)
}

/// Recovers a payload of the given kind from `carrier`
pub fn unveil(carrier: &PixelBuffer, kind: PayloadKind, options: &CodecOptions) -> Result<Payload> {
    Codec::new(kind, options).unveil(carrier)
}
