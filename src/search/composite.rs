//! Union masks of accepted template placements.

use crate::image::BinaryImage;
use crate::kernel::Placement;
use crate::util::{BinMatchError, BinMatchResult};

/// Union of every accepted placement of one template over one base image.
///
/// The mask has the base image's shape. Stamping only ORs pixels in, so the
/// result does not depend on the order placements are applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composite {
    mask: BinaryImage,
    accepted: usize,
}

impl Composite {
    /// Creates an all-zero composite.
    pub fn empty(width: usize, height: usize) -> BinMatchResult<Self> {
        Ok(Self {
            mask: BinaryImage::zeros(width, height)?,
            accepted: 0,
        })
    }

    pub(crate) fn empty_like(base: &BinaryImage) -> Self {
        Self {
            mask: BinaryImage::from_vec_unchecked(
                vec![0; base.as_slice().len()],
                base.width(),
                base.height(),
            ),
            accepted: 0,
        }
    }

    /// Builds the composite of kernel placements over `base`.
    ///
    /// Kernel placements come from the offset grid of `template` over `base`,
    /// so every window fits and no bounds check is needed.
    pub(crate) fn from_placements(
        base: &BinaryImage,
        template: &BinaryImage,
        placements: &[Placement],
    ) -> Self {
        let mut composite = Self::empty_like(base);
        for placement in placements {
            composite.or_window(template, placement.x, placement.y);
        }
        composite
    }

    /// ORs `template` into the mask with its top-left corner at `(x, y)`.
    pub fn stamp(&mut self, template: &BinaryImage, x: usize, y: usize) -> BinMatchResult<()> {
        let fits = x
            .checked_add(template.width())
            .is_some_and(|end| end <= self.mask.width())
            && y
                .checked_add(template.height())
                .is_some_and(|end| end <= self.mask.height());
        if !fits {
            return Err(BinMatchError::RoiOutOfBounds {
                x,
                y,
                width: template.width(),
                height: template.height(),
                img_width: self.mask.width(),
                img_height: self.mask.height(),
            });
        }
        self.or_window(template, x, y);
        Ok(())
    }

    fn or_window(&mut self, template: &BinaryImage, x: usize, y: usize) {
        let width = self.mask.width();
        let tpl_width = template.width();
        let tpl = template.as_slice();
        let dst = self.mask.data_mut();
        for ty in 0..template.height() {
            let start = (y + ty) * width + x;
            let src_row = &tpl[ty * tpl_width..(ty + 1) * tpl_width];
            for (d, &s) in dst[start..start + tpl_width].iter_mut().zip(src_row) {
                *d |= s;
            }
        }
        self.accepted += 1;
    }

    /// Stamps every placement reported by a kernel.
    pub fn stamp_all(
        &mut self,
        template: &BinaryImage,
        placements: &[Placement],
    ) -> BinMatchResult<()> {
        for placement in placements {
            self.stamp(template, placement.x, placement.y)?;
        }
        Ok(())
    }

    /// Returns the union mask.
    pub fn mask(&self) -> &BinaryImage {
        &self.mask
    }

    /// Consumes the composite and returns its mask.
    pub fn into_mask(self) -> BinaryImage {
        self.mask
    }

    /// Number of placements stamped, counting overlaps separately.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Returns `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        self.mask.shape()
    }
}
