//! Error types for frame decoding, joining and table output

use thiserror::Error;

/// Field of a feature report being decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameField {
    /// Argument count byte
    Argc,
    /// Two-byte command code
    Command,
    /// Argument byte at the given index
    Argument(usize),
}

impl std::fmt::Display for FrameField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameField::Argc => write!(f, "argc"),
            FrameField::Command => write!(f, "cmd"),
            FrameField::Argument(i) => write!(f, "arg{}", i),
        }
    }
}

/// Errors that can occur while decoding a raw frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Frame has no hex digits at all
    #[error("empty frame")]
    Empty,

    /// Frame is shorter than its layout requires
    #[error("frame too short: need {needed} hex digits, got {actual}")]
    TooShort { needed: usize, actual: usize },

    /// A field contains characters that are not hex digits
    #[error("invalid hex in {field} at offset {offset}")]
    InvalidHex { field: FrameField, offset: usize },

    /// A field does not have the width its slot in the frame requires
    #[error("{field} must be {expected} hex digits, got {actual}")]
    FieldWidth {
        field: FrameField,
        expected: usize,
        actual: usize,
    },
}

/// Errors that can occur while reading an annotation record
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    /// Record has no timestamp field
    #[error("missing timestamp")]
    MissingTimestamp,

    /// Timestamp is not a whole number of seconds
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
}

/// Errors that can occur while joining annotations with captured frames
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// An annotation has no captured frame at its timestamp
    #[error("no captured frame at t={timestamp}s for annotation \"{description}\"")]
    UnmatchedAnnotation { timestamp: u64, description: String },

    /// A frame matched by an annotation could not be decoded
    #[error("failed to decode frame at t={timestamp}s for \"{description}\": {source}")]
    Decode {
        timestamp: u64,
        description: String,
        #[source]
        source: DecodeError,
    },
}

/// Error reported by a table sink
#[derive(Debug, Error)]
#[error("{sink} sink failed: {reason}")]
pub struct SinkError {
    /// Name of the sink that failed
    pub sink: String,
    /// Human readable cause
    pub reason: String,
}

impl SinkError {
    pub fn new(sink: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self {
            sink: sink.into(),
            reason: reason.to_string(),
        }
    }
}
