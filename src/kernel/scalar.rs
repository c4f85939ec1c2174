//! Scalar reference kernel.

use crate::image::ImageView;
use crate::kernel::Placement;
use crate::template::XorTemplatePlan;

/// Number of valid offsets along each axis, or `None` if the template does
/// not fit inside the base.
pub fn offset_range(base: ImageView<'_, u8>, plan: &XorTemplatePlan) -> Option<(usize, usize)> {
    if plan.width() > base.width() || plan.height() > base.height() {
        return None;
    }
    Some((
        base.width() - plan.width() + 1,
        base.height() - plan.height() + 1,
    ))
}

/// Full weighted XOR error of the window at `(x, y)`, or `None` when the
/// window does not lie inside `base`.
pub fn weighted_error_at(
    base: ImageView<'_, u8>,
    plan: &XorTemplatePlan,
    x: usize,
    y: usize,
) -> Option<u64> {
    let (cols, rows) = offset_range(base, plan)?;
    if x >= cols || y >= rows {
        return None;
    }
    Some(window_error(base, plan, x, y, u64::MAX))
}

/// Sums the weighted disagreement, stopping once it reaches `stop_at`.
#[inline]
fn window_error(
    base: ImageView<'_, u8>,
    plan: &XorTemplatePlan,
    x: usize,
    y: usize,
    stop_at: u64,
) -> u64 {
    let tpl_width = plan.width();
    let data = base.as_slice();
    let stride = base.stride();
    let tpl = plan.template().as_slice();
    let weights = plan.weights();

    let mut error = 0u64;
    for ty in 0..plan.height() {
        let start = (y + ty) * stride + x;
        let window_row = &data[start..start + tpl_width];
        let off = ty * tpl_width;
        let tpl_row = &tpl[off..off + tpl_width];
        let weight_row = &weights[off..off + tpl_width];
        for ((&b, &t), &w) in window_row.iter().zip(tpl_row).zip(weight_row) {
            error += u64::from((b ^ t) as u32 * w);
        }
        if error >= stop_at {
            break;
        }
    }
    error
}

/// Accepted placements in row `y` of the offset grid.
pub fn scan_row(base: ImageView<'_, u8>, plan: &XorTemplatePlan, y: usize) -> Vec<Placement> {
    let Some((cols, rows)) = offset_range(base, plan) else {
        return Vec::new();
    };
    if y >= rows {
        return Vec::new();
    }
    let limit = plan.limit();
    let mut accepted = Vec::new();
    for x in 0..cols {
        let error = window_error(base, plan, x, y, limit);
        if plan.accepts(error) {
            accepted.push(Placement { x, y, error });
        }
    }
    accepted
}

/// Accepted placements for offset rows `y0..y1` (clamped to the valid range).
pub fn scan_rows(
    base: ImageView<'_, u8>,
    plan: &XorTemplatePlan,
    y0: usize,
    y1: usize,
) -> Vec<Placement> {
    let Some((_, rows)) = offset_range(base, plan) else {
        return Vec::new();
    };
    (y0..y1.min(rows))
        .flat_map(|y| scan_row(base, plan, y))
        .collect()
}

/// Accepted placements over every valid offset, in row-major order.
pub fn scan_full(base: ImageView<'_, u8>, plan: &XorTemplatePlan) -> Vec<Placement> {
    scan_rows(base, plan, 0, usize::MAX)
}
