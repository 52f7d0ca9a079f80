use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SteganoError {
    /// Represents a payload that does not fit into the carrier, reported before anything is written
    #[error("Capacity exceeded: {required} bits required but only {available} bits available")]
    CapacityExceeded { required: usize, available: usize },

    /// Represents serialized metadata that does not fit into the reserved header region
    #[error("Header too large: {size} bits do not fit into the reserved region of {limit} bits")]
    HeaderTooLarge { size: usize, limit: usize },

    /// Represents a header region that could not be read back, see [`HeaderFault`]
    #[error("Corrupt header: {0}")]
    CorruptHeader(HeaderFault),

    /// Represents a payload that could not be recovered completely from the carrier
    #[error("Corrupt payload: expected {expected} bytes but recovered only {recovered}")]
    CorruptPayload { expected: usize, recovered: usize },

    /// Represents a text carrier where no terminator was found
    #[error("No message terminator found within {scanned_bits} bits")]
    TerminatorNotFound { scanned_bits: usize },

    /// Represents a text message that would be cut short by its own terminator on unveil
    #[error("Text message contains the terminator sequence and cannot be recovered reliably")]
    AmbiguousTerminator,

    /// Represents a bit depth outside of 1..=8
    #[error("Invalid bit depth {0}, allowed is 1 to 8")]
    InvalidBitDepth(u8),

    /// Represents a stride that would overlap write groups or run past the carrier
    #[error("Invalid stride {stride}, allowed range is {min} to {max}")]
    InvalidStride { stride: f64, min: f64, max: f64 },

    /// Represents a header field that contains the field separator
    #[error("Header field {0:?} must not contain a comma")]
    InvalidHeaderField(String),

    /// Represents a channel buffer that does not match the given dimensions
    #[error("Channel buffer of length {actual} does not match the expected length {expected}")]
    InvalidCarrierLength { expected: usize, actual: usize },

    /// Represents an error caused by an invalid filename, for example an empty filename or one with a comma
    #[error("A file with an invalid file name was provided")]
    InvalidFileName,

    /// Represents the error of invalid UTF-8 text data found inside of a text message
    #[error("Invalid text data found inside a message")]
    InvalidTextData(#[from] FromUtf8Error),

    /// Represents a payload that was handed to the codec of another payload kind
    #[error("Payload of kind {given} cannot be handled by the {expected} codec")]
    PayloadKindMismatch {
        expected: crate::PayloadKind,
        given: crate::PayloadKind,
    },

    /// Represents an invalid carrier image media. For example, a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia,

    /// Represents a failure when encoding an image file.
    #[error("Image encoding error")]
    ImageEncodingError,

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("No carrier media set")]
    CarrierNotSet,

    #[error("No target file set")]
    TargetNotSet,

    #[error("API Error: Missing payload, provide a message, a file or an image")]
    MissingPayload,
}

/// The ways a header region can fail to decode.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HeaderFault {
    #[error("declared length is zero")]
    EmptyLength,

    #[error("declared length of {declared_bits} bits exceeds the reserved region of {limit_bits} bits")]
    LengthOutOfBounds {
        declared_bits: usize,
        limit_bits: usize,
    },

    #[error("carrier has {available} channels but the header region needs {needed}")]
    Truncated { needed: usize, available: usize },

    #[error("metadata is not valid UTF-8")]
    InvalidUtf8,

    #[error("expected {expected} fields but found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field #{index} has an unexpected value {value:?}")]
    FieldType { index: usize, value: String },
}

impl From<HeaderFault> for SteganoError {
    fn from(fault: HeaderFault) -> Self {
        SteganoError::CorruptHeader(fault)
    }
}
