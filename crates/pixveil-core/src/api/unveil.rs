use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::media::payload::{Codec, Concealer, Payload, PayloadKind};
use crate::media::PixelBuffer;
use crate::{CodecOptions, SteganoError};

/// file name of an unveiled text message
pub const SECRET_MESSAGE_FILE: &str = "secret-message.txt";
/// file name of an unveiled image
pub const RECOVERED_IMAGE_FILE: &str = "recovered_image.png";

pub fn prepare() -> UnveilApi {
    UnveilApi::default()
}

#[derive(Default, Debug)]
pub struct UnveilApi {
    secret_media: Option<PathBuf>,
    output_folder: Option<PathBuf>,
    kind: PayloadKind,
    options: CodecOptions,
}

impl UnveilApi {
    /// Use the given codec options
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// This is the secret image that contains the data to be unveiled
    pub fn from_secret_file(mut self, secret_image: impl AsRef<Path>) -> Self {
        self.secret_media = Some(secret_image.as_ref().to_path_buf());
        self
    }

    /// The kind of payload hidden in the image, a text message if never called.
    /// The image itself does not tell.
    pub fn expecting(mut self, kind: PayloadKind) -> Self {
        self.kind = kind;
        self
    }

    /// This is the folder where the data will be saved to
    pub fn into_output_folder(mut self, output_folder: impl AsRef<Path>) -> Self {
        self.output_folder = Some(output_folder.as_ref().to_path_buf());
        self
    }

    /// Execute the unveil process and return the file the secret was written to
    pub fn execute(self) -> Result<PathBuf, SteganoError> {
        let Some(secret_media) = self.secret_media else {
            return Err(SteganoError::CarrierNotSet);
        };
        let Some(output_folder) = self.output_folder else {
            return Err(SteganoError::TargetNotSet);
        };

        let carrier = PixelBuffer::open(&secret_media)?;
        let payload = Codec::new(self.kind, &self.options).unveil(&carrier)?;

        let target = match payload {
            Payload::Text(text) => write_file(&output_folder, SECRET_MESSAGE_FILE, text.as_bytes())?,
            Payload::Blob(blob) => write_file(&output_folder, &blob.name, &blob.data)?,
            Payload::Image(image) => {
                let target = output_folder.join(RECOVERED_IMAGE_FILE);
                image.save_png(&target)?;
                target
            }
        };
        info!("{} unveiled into {target:?}", self.kind);

        Ok(target)
    }
}

fn write_file(folder: &Path, name: &str, data: &[u8]) -> Result<PathBuf, SteganoError> {
    let target = folder.join(name);
    fs::write(&target, data).map_err(|source| {
        error!("Error writing file {target:?}: {source}");
        SteganoError::WriteError { source }
    })?;

    Ok(target)
}
