//! Rayon-parallel scan (feature-gated).
//!
//! Rows of the offset grid are scanned in parallel; each row uses the scalar
//! kernel, so the accepted set and its row-major order are identical to
//! [`scan_rows`](crate::kernel::scalar::scan_rows).

use crate::image::ImageView;
use crate::kernel::scalar::{offset_range, scan_row};
use crate::kernel::Placement;
use crate::template::XorTemplatePlan;
use rayon::prelude::*;

/// Row-parallel scan over offset rows `y0..y1` (clamped to the valid range).
pub fn scan_rows_par(
    base: ImageView<'_, u8>,
    plan: &XorTemplatePlan,
    y0: usize,
    y1: usize,
) -> Vec<Placement> {
    let Some((_, rows)) = offset_range(base, plan) else {
        return Vec::new();
    };
    let row_results: Vec<Vec<Placement>> = (y0..y1.min(rows))
        .into_par_iter()
        .map(|y| scan_row(base, plan, y))
        .collect();
    row_results.into_iter().flatten().collect()
}

/// Row-parallel scan over every valid offset.
pub fn scan_full_par(base: ImageView<'_, u8>, plan: &XorTemplatePlan) -> Vec<Placement> {
    scan_rows_par(base, plan, 0, usize::MAX)
}
