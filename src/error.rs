//! Error types for document, image and dialog operations.

use thiserror::Error;

use crate::model::{MAX_BUTTON_SIZE, MIN_BUTTON_SIZE};

/// Errors surfaced to the user by the overlay editor.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Malformed document bytes or text. No partial document is installed.
    #[error("Failed to parse {format} document: {message}")]
    Parse {
        /// Format the parser was attempting ("JSON", "property list")
        format: &'static str,
        /// Underlying decoder message
        message: String,
    },

    /// The background image could not be read or decoded.
    #[error("Failed to decode image: {message}")]
    ImageDecode {
        /// Underlying decoder message
        message: String,
    },

    /// A dialog value was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Document could not be serialized into the requested format.
    #[error("Failed to encode {format} document: {message}")]
    Encode {
        /// Target format
        format: &'static str,
        /// Underlying encoder message
        message: String,
    },

    /// I/O error while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// Create a parse error for the given format.
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    /// Create an image decode error.
    pub fn image_decode(message: impl Into<String>) -> Self {
        Self::ImageDecode {
            message: message.into(),
        }
    }

    /// Create an encode error for the given format.
    pub fn encode(format: &'static str, message: impl Into<String>) -> Self {
        Self::Encode {
            format,
            message: message.into(),
        }
    }

    /// Short title for a notification showing this error.
    pub fn title(&self) -> &'static str {
        match self {
            EditorError::Parse { .. } => "Invalid document",
            EditorError::ImageDecode { .. } => "Invalid image",
            EditorError::Validation(_) => "Invalid value",
            EditorError::Encode { .. } => "Save failed",
            EditorError::Io(_) => "File error",
        }
    }
}

/// Rejected user input in an edit dialog. The dialog stays open.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Input could not be read as a number
    #[error("'{input}' is not a number")]
    NotANumber {
        /// The raw dialog input
        input: String,
    },

    /// Number outside the accepted range
    #[error("Size {value} is outside {min}..={max}")]
    OutOfRange {
        /// The parsed value
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
}

impl ValidationError {
    /// Out-of-range error for a button size.
    pub fn size_out_of_range(value: f64) -> Self {
        Self::OutOfRange {
            value,
            min: MIN_BUTTON_SIZE,
            max: MAX_BUTTON_SIZE,
        }
    }
}
