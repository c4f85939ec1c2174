//! Weighted XOR window kernels.
//!
//! Kernels walk every top-left offset `(x, y)` with the template fully inside
//! the base image and report the offsets the plan accepts. Windows are read by
//! direct index arithmetic over the base buffer; nothing is materialized.

/// An accepted template placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Column of the window's top-left pixel.
    pub x: usize,
    /// Row of the window's top-left pixel.
    pub y: usize,
    /// Weighted disagreement of the window.
    pub error: u64,
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;
