//! Conversion of raw grayscale scans into binary foreground masks.
//!
//! Preparation runs four fixed steps: a contrast boost (`min(255, 3 * v)`),
//! a Gaussian blur of the configured odd kernel size, a binary threshold, and
//! an inversion so that dark ink becomes foreground (1) and the light page
//! becomes background (0).

mod blur;

use crate::image::{BinaryImage, ImageView, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::{BinMatchError, BinMatchResult};

/// Linear gain applied before blurring so faint marks survive thresholding.
pub const CONTRAST_GAIN: u16 = 3;

/// Validated preparation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrepareParams {
    blur_kernel_size: usize,
    threshold: u8,
}

impl PrepareParams {
    /// Default blur kernel size (no blur).
    pub const DEFAULT_BLUR_KERNEL_SIZE: usize = 1;
    /// Default binarization threshold.
    pub const DEFAULT_THRESHOLD: u8 = 180;

    /// Validates a blur kernel size (odd, positive) and a threshold in `[0, 255]`.
    pub fn new(blur_kernel_size: i64, threshold: i64) -> BinMatchResult<Self> {
        if blur_kernel_size <= 0 || blur_kernel_size % 2 == 0 {
            return Err(BinMatchError::config(format!(
                "blur kernel size must be an odd positive number, got {blur_kernel_size}"
            )));
        }
        let blur_kernel_size = usize::try_from(blur_kernel_size).map_err(|_| {
            BinMatchError::config(format!("blur kernel size {blur_kernel_size} is too large"))
        })?;
        let threshold = u8::try_from(threshold).map_err(|_| {
            BinMatchError::config(format!(
                "threshold must be between 0 and 255 inclusive, got {threshold}"
            ))
        })?;
        Ok(Self {
            blur_kernel_size,
            threshold,
        })
    }

    /// Returns the blur kernel size.
    pub fn blur_kernel_size(&self) -> usize {
        self.blur_kernel_size
    }

    /// Returns the binarization threshold.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

impl Default for PrepareParams {
    fn default() -> Self {
        Self {
            blur_kernel_size: Self::DEFAULT_BLUR_KERNEL_SIZE,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

/// Turns a raw grayscale image into a binary foreground mask.
///
/// A pixel becomes foreground when its boosted, blurred value is at or below
/// the threshold.
pub fn prepare(raw: ImageView<'_, u8>, params: &PrepareParams) -> BinaryImage {
    let _span = trace_span!(
        "prepare",
        width = raw.width(),
        height = raw.height(),
        blur = params.blur_kernel_size
    )
    .entered();

    let width = raw.width();
    let height = raw.height();
    let mut boosted = Vec::with_capacity(width * height);
    for y in 0..height {
        if let Some(row) = raw.row(y) {
            boosted.extend(row.iter().map(|&v| boost_contrast(v)));
        }
    }
    let boosted = OwnedImage::from_vec_unchecked(boosted, width, height);

    let blurred = blur::gaussian_blur(boosted.view(), params.blur_kernel_size);
    let mask: Vec<u8> = blurred
        .data()
        .iter()
        .map(|&v| u8::from(v <= params.threshold))
        .collect();

    let prepared = BinaryImage::from_vec_unchecked(mask, width, height);
    trace_event!("prepared", foreground = prepared.count_ones());
    prepared
}

fn boost_contrast(value: u8) -> u8 {
    (u16::from(value) * CONTRAST_GAIN).min(255) as u8
}
