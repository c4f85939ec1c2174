//! Loading and saving grayscale images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{BinaryImage, ImageView, OwnedImage};
use crate::prepare::{prepare, PrepareParams};
use crate::util::{BinMatchError, BinMatchResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> BinMatchResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Converts a decoded image of any color type to an owned 8-bit grayscale image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> BinMatchResult<OwnedImage> {
    let gray = img.to_luma8();
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk as 8-bit grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> BinMatchResult<OwnedImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| BinMatchError::ImageDecode {
        reason: format!("{}: {err}", path.display()),
    })?;
    owned_from_dynamic_image(&img)
}

/// Loads an image from disk and runs it through [`prepare`].
pub fn load_and_prepare<P: AsRef<Path>>(
    path: P,
    params: &PrepareParams,
) -> BinMatchResult<BinaryImage> {
    let raw = load_gray_image(path)?;
    Ok(prepare(raw.view(), params))
}

/// Writes a grayscale image; the format follows the path extension.
pub fn save_gray_image<P: AsRef<Path>>(path: P, img: &OwnedImage) -> BinMatchResult<()> {
    let path = path.as_ref();
    let width = u32::try_from(img.width()).map_err(|_| BinMatchError::ImageEncode {
        reason: format!("width {} does not fit in u32", img.width()),
    })?;
    let height = u32::try_from(img.height()).map_err(|_| BinMatchError::ImageEncode {
        reason: format!("height {} does not fit in u32", img.height()),
    })?;
    let gray = image::GrayImage::from_raw(width, height, img.data().to_vec()).ok_or(
        BinMatchError::ImageEncode {
            reason: "pixel buffer does not match dimensions".to_string(),
        },
    )?;
    gray.save(path).map_err(|err| BinMatchError::ImageEncode {
        reason: format!("{}: {err}", path.display()),
    })
}
