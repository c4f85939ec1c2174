//! Binary foreground/background images.

use crate::image::{pixel_count, ImageView};
use crate::util::{BinMatchError, BinMatchResult};

/// Row-major image whose pixels are all 0 (background) or 1 (foreground).
///
/// The {0, 1} invariant is checked once at construction, so kernels can use
/// the pixels directly as XOR operands and weight multipliers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl BinaryImage {
    /// Wraps a buffer of exactly `width * height` binary pixels.
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
        if let Some(index) = data.iter().position(|&v| v > 1) {
            return Err(BinMatchError::NonBinaryPixel {
                index,
                value: data[index],
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds an image from equally sized rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> BinMatchResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut data = Vec::with_capacity(pixel_count(width, height)?);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(BinMatchError::ShapeMismatch {
                    expected: (width, 1),
                    got: (row.len(), 1),
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Creates an all-background image.
    pub fn zeros(width: usize, height: usize) -> BinMatchResult<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self::from_vec_unchecked(vec![0; len], width, height))
    }

    pub(crate) fn from_vec_unchecked(data: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        debug_assert!(data.iter().all(|&v| v <= 1));
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns a borrowed view of the pixels.
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

    /// Returns `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns row `y`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Returns the row-major pixel buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Number of foreground pixels.
    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image and returns its pixel buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
