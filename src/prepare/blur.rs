//! Separable Gaussian blur for 8-bit images.
//!
//! Every kernel size samples a Gaussian of fixed `sigma = 4`; the size only
//! sets how many taps are kept. Borders are reflected without repeating the
//! edge pixel (`dcb|abcd|cba`).

use crate::image::{ImageView, OwnedImage};

/// Standard deviation used for every blur kernel size.
pub(crate) const BLUR_SIGMA: f64 = 4.0;

/// Builds the normalized 1D kernel for an odd `size`.
pub(crate) fn gaussian_kernel(size: usize) -> Vec<f32> {
    debug_assert!(size % 2 == 1);
    if size <= 1 {
        return vec![1.0];
    }
    let scale = -0.5 / (BLUR_SIGMA * BLUR_SIGMA);
    let center = (size / 2) as f64;
    let taps: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    taps.into_iter().map(|t| (t / sum) as f32).collect()
}

/// Maps a possibly out-of-range index into `[0, len)` by mirror reflection.
pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let mut i = index.rem_euclid(period);
    if i >= len as isize {
        i = period - i;
    }
    i as usize
}

/// Blurs `src` with a `size x size` Gaussian; `size == 1` returns a copy.
pub(crate) fn gaussian_blur(src: ImageView<'_, u8>, size: usize) -> OwnedImage {
    let width = src.width();
    let height = src.height();
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        if let Some(row) = src.row(y) {
            out.extend_from_slice(row);
        }
    }
    if size <= 1 {
        return OwnedImage::from_vec_unchecked(out, width, height);
    }

    let kernel = gaussian_kernel(size);
    let radius = (size / 2) as isize;

    let mut horizontal = vec![0.0f32; width * height];
    for y in 0..height {
        let row = &out[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, &tap) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - radius, width);
                acc += tap * row[sx] as f32;
            }
            horizontal[y * width + x] = acc;
        }
    }

    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, &tap) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - radius, height);
                acc += tap * horizontal[sy * width + x];
            }
            out[y * width + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }

    OwnedImage::from_vec_unchecked(out, width, height)
}
