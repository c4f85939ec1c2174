//! Union of per-template composites and rendering to grayscale.

use crate::image::{pixel_count, BinaryImage, OwnedImage};
use crate::search::Composite;
use crate::trace::{trace_event, trace_span};
use crate::util::{BinMatchError, BinMatchResult};

/// Output value for matched pixels.
pub const MATCH_VALUE: u8 = 0;
/// Output value for unmatched pixels.
pub const BACKGROUND_VALUE: u8 = 255;

/// Pixel-wise OR of all composites; an empty input gives an all-zero mask.
///
/// Every composite must be `width x height`.
pub fn merge_composites<I>(
    width: usize,
    height: usize,
    composites: I,
) -> BinMatchResult<BinaryImage>
where
    I: IntoIterator<Item = Composite>,
{
    let _span = trace_span!("merge", width = width, height = height).entered();
    let mut merged = vec![0u8; pixel_count(width, height)?];
    let mut count = 0usize;
    for composite in composites {
        if composite.shape() != (width, height) {
            return Err(BinMatchError::ShapeMismatch {
                expected: (width, height),
                got: composite.shape(),
            });
        }
        for (dst, &src) in merged.iter_mut().zip(composite.mask().as_slice()) {
            *dst |= src;
        }
        count += 1;
    }
    let merged = BinaryImage::from_vec_unchecked(merged, width, height);
    trace_event!("merged", composites = count, foreground = merged.count_ones());
    Ok(merged)
}

/// Renders a mask as grayscale: foreground becomes 0, background 255.
pub fn render_mask(mask: &BinaryImage) -> OwnedImage {
    let data = mask
        .as_slice()
        .iter()
        .map(|&v| if v == 1 { MATCH_VALUE } else { BACKGROUND_VALUE })
        .collect();
    OwnedImage::from_vec_unchecked(data, mask.width(), mask.height())
}
