//! Error types for index construction and coordinate validation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TzError>;

/// Errors raised while building the index or validating query input.
///
/// A lookup that simply matches no timezone is not an error; it is reported
/// as `None` by the query methods.
#[derive(Debug, Error)]
pub enum TzError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("error no features found")]
    NoFeatures,

    #[error("unexpected end of document after {decoded} features")]
    UnexpectedEof { decoded: usize },

    #[error("malformed feature at index {index}: {source}")]
    MalformedFeature {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid point data for {tzid} (feature {index}), expected 2 values, got {got}")]
    InvalidCoordinate {
        tzid: String,
        index: usize,
        got: usize,
    },

    #[error("shape without tzid at feature {index}")]
    MissingTzid { index: usize },

    #[error("index contains no polygons")]
    EmptyIndex,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
