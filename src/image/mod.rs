//! Image views and owned pixel buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! window taken with [`ImageView::roi`] shares the parent buffer and keeps the
//! parent stride. `OwnedImage` holds raw 8-bit grayscale data and
//! [`BinaryImage`] holds the prepared {0, 1} representation.

use crate::util::{BinMatchError, BinMatchResult};

mod binary;
#[cfg(feature = "image-io")]
pub mod io;

pub use binary::BinaryImage;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> BinMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> BinMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(BinMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y.checked_mul(self.stride)?.checked_add(x)?)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        self.data.get(start..start.checked_add(self.width)?)
    }

    /// Returns a zero-copy window into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> BinMatchResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(BinMatchError::InvalidDimensions { width, height });
        }
        let out_of_bounds = BinMatchError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let fits = matches!(
            (x.checked_add(width), y.checked_add(height)),
            (Some(end_x), Some(end_y)) if end_x <= self.width && end_y <= self.height
        );
        if !fits {
            return Err(out_of_bounds);
        }

        let start = y * self.stride + x;
        let data = self.data.get(start..).ok_or(BinMatchError::BufferTooSmall {
            needed: start + 1,
            got: self.data.len(),
        })?;
        ImageView::new(data, width, height, self.stride)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> BinMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(BinMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(BinMatchError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(BinMatchError::InvalidDimensions { width, height })
}

/// Checks that `width * height` is a non-empty, representable pixel count.
pub(crate) fn pixel_count(width: usize, height: usize) -> BinMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(BinMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(BinMatchError::InvalidDimensions { width, height })
}

/// Owned contiguous 8-bit grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a row-major grayscale buffer of exactly `width * height` pixels.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> BinMatchResult<Self> {
        let needed = pixel_count(width, height)?;
        if data.len() < needed {
            return Err(BinMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(BinMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a possibly strided view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, u8>) -> BinMatchResult<Self> {
        let mut data = Vec::with_capacity(pixel_count(view.width(), view.height())?);
        for y in 0..view.height() {
            let row = view.row(y).ok_or(BinMatchError::BufferTooSmall {
                needed: y * view.stride() + view.width(),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, view.width(), view.height())
    }

    pub(crate) fn from_vec_unchecked(data: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its pixel buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
