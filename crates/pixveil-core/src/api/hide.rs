use std::path::{Path, PathBuf};

use log::info;

use crate::media::payload::{BlobPayload, Codec, Concealer, Payload};
use crate::media::PixelBuffer;
use crate::{CodecOptions, SteganoError};

pub fn prepare() -> HideApi {
    HideApi::default()
}

/// What gets hidden, only read from disk on `execute`
#[derive(Debug, Clone, PartialEq, Eq)]
enum Secret {
    Message(String),
    File(PathBuf),
    Image(PathBuf),
}

#[derive(Default, Debug)]
pub struct HideApi {
    secret: Option<Secret>,
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    options: CodecOptions,
}

impl HideApi {
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// Hides a text message, replaces any other secret
    pub fn with_message(mut self, message: &str) -> Self {
        self.secret = Some(Secret::Message(message.to_string()));
        self
    }

    /// Hides a file by its name and content, replaces any other secret
    pub fn with_file<A: AsRef<Path>>(mut self, data_file: A) -> Self {
        self.secret = Some(Secret::File(data_file.as_ref().to_path_buf()));
        self
    }

    /// Hides a whole image, replaces any other secret
    pub fn with_secret_image<A: AsRef<Path>>(mut self, secret_image: A) -> Self {
        self.secret = Some(Secret::Image(secret_image.as_ref().to_path_buf()));
        self
    }

    /// The carrier image, used readonly
    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// Where the carrier with the secret inside is stored, always as PNG
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn execute(self) -> Result<(), SteganoError> {
        let Some(image) = self.image else {
            return Err(SteganoError::CarrierNotSet);
        };
        let Some(output) = self.output else {
            return Err(SteganoError::TargetNotSet);
        };
        let Some(secret) = self.secret else {
            return Err(SteganoError::MissingPayload);
        };

        let carrier = PixelBuffer::open(&image)?;
        let payload = match secret {
            Secret::Message(message) => Payload::Text(message),
            Secret::File(file) => Payload::Blob(BlobPayload::from_file(&file)?),
            Secret::Image(file) => Payload::Image(PixelBuffer::open(&file)?),
        };

        let codec = Codec::for_payload(&payload, &self.options);
        codec.conceal(&carrier, &payload)?.save_png(&output)?;
        info!("{} hidden in {output:?}", payload.kind());

        Ok(())
    }
}
