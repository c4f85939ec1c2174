//! Error types for binmatch.

use thiserror::Error;

/// Result alias for binmatch operations.
pub type BinMatchResult<T> = std::result::Result<T, BinMatchError>;

/// Errors that can occur while preparing, matching, or merging images.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BinMatchError {
    /// Width or height is zero, or the pixel count overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Region of interest does not fit inside the image.
    #[error(
        "roi ({x}, {y}, {width}x{height}) out of bounds for {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A binary image buffer holds a value other than 0 or 1.
    #[error("pixel {index} has non-binary value {value}")]
    NonBinaryPixel { index: usize, value: u8 },
    /// A parameter failed validation before reaching the matcher.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },
    /// Source pixel data could not be loaded or decoded.
    #[error("image decode failed: {reason}")]
    ImageDecode { reason: String },
    /// Output pixel data could not be encoded or written.
    #[error("image encode failed: {reason}")]
    ImageEncode { reason: String },
    /// Two images that must share a shape do not.
    #[error(
        "shape mismatch: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .got.0, .got.1
    )]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// A template-matching job failed; the whole run is aborted.
    #[error("match job {job} failed: {source}")]
    MatchJob {
        job: usize,
        #[source]
        source: Box<BinMatchError>,
    },
    /// A scan ran past its time budget.
    #[error("timed out after {elapsed_ms} ms (limit {limit_ms} ms)")]
    Timeout { elapsed_ms: u128, limit_ms: u128 },
    /// The worker pool for parallel dispatch could not be created.
    #[error("worker pool unavailable: {reason}")]
    WorkerPool { reason: String },
}

impl BinMatchError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
