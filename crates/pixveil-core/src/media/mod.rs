pub mod codec_options;
pub mod header;
pub mod image;
pub mod lsb_stream;
pub mod payload;
mod types;

use std::path::Path;

pub use codec_options::{AdaptiveOptions, CodecOptions};
pub use types::*;

pub trait Persist {
    fn save_as(&mut self, _: &Path) -> crate::Result<()>;
}
