#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]

pub mod extrema;
pub mod utilities;

pub use utilities::enums::{Axis, BoundaryMode, Extremum, Kernel};
