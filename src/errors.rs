//! Error types for rendering and configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::span::SpanRef;

/// Why a span was rejected during validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSpanReason {
    /// `start >= end`
    #[error("start must be before end")]
    Empty,

    /// A negative offset arrived on the wire.
    #[error("offset {offset} is negative")]
    Negative { offset: i64 },

    /// `end` runs past the end of the text.
    #[error("end exceeds text length {text_len}")]
    OutOfBounds { text_len: usize },

    /// A constituent is not inside its combined span.
    #[error("constituent {constituent} lies outside the combined range")]
    ConstituentOutside { constituent: SpanRef },

    /// The two constituents overlap or are not ordered left to right.
    #[error("constituents {first} and {second} overlap or are out of order")]
    ConstituentsOverlap { first: SpanRef, second: SpanRef },
}

/// Errors that fail a render call as a whole.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A span's offsets are out of bounds or inverted.
    #[error("invalid span {span}: {reason}")]
    InvalidSpan {
        span: SpanRef,
        reason: InvalidSpanReason,
    },

    /// Two independent spans overlap.
    #[error("spans {first} and {second} overlap")]
    OverlapViolation { first: SpanRef, second: SpanRef },

    /// A record could not be turned into a span.
    #[error("malformed entity {label:?}: {message}")]
    MalformedEntity { label: String, message: String },

    /// The service response could not be decoded.
    #[error("failed to decode entities: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors loading a color table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse color table: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configured value is not a `#RGB` or `#RRGGBB` hex color.
    #[error("invalid color {value:?} for {key}")]
    InvalidColor { key: String, value: String },
}
