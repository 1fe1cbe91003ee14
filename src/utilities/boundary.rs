//! Neighbor index normalization for the extrema kernels.
//!
//! Both evaluators probe `order` neighbors on each side of a position. Offsets
//! that leave `[0, n)` are mapped back in by [`normalize_forward`] (overshoot
//! past `n - 1`) or [`normalize_backward`] (undershoot below 0).
//!
//! Under `Clip` an edge sample ends up compared against itself, which matters
//! for the strict forward comparison. Under `Wrap` the data is circular; an
//! order larger than `n` simply revisits samples.

use crate::utilities::enums::BoundaryMode;

/// Maps a forward neighbor index back into `[0, n)`.
///
/// Identity for `index < n`. `n` must be non-zero.
#[inline(always)]
pub fn normalize_forward(mode: BoundaryMode, n: usize, index: usize) -> usize {
    if index < n {
        return index;
    }
    match mode {
        BoundaryMode::Clip => n - 1,
        // equals `index - n` whenever `index < 2n`
        BoundaryMode::Wrap => index % n,
    }
}

/// Maps a backward neighbor index back into `[0, n)`.
///
/// Identity for `0 <= index < n`. `n` must be non-zero.
#[inline(always)]
pub fn normalize_backward(mode: BoundaryMode, n: usize, index: isize) -> usize {
    if index >= 0 {
        return index as usize;
    }
    match mode {
        BoundaryMode::Clip => 0,
        BoundaryMode::Wrap => index.rem_euclid(n as isize) as usize,
    }
}
