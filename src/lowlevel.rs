//! Low-level building blocks for custom scan loops.
//!
//! These expose the template plan and the window kernels behind
//! [`Matcher`](crate::Matcher), for callers that want to score individual
//! offsets or drive the scan themselves.

pub use crate::kernel::scalar::{offset_range, scan_full, scan_row, scan_rows, weighted_error_at};
pub use crate::kernel::Placement;
pub use crate::template::XorTemplatePlan;

#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::{scan_full_par, scan_rows_par};
