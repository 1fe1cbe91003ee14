#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kernel {
	Auto,
	Scalar,
	Parallel,
}

impl Default for Kernel {
	fn default() -> Self {
		Kernel::Auto
	}
}

impl Kernel {
	#[inline(always)]
	pub const fn is_parallel(self) -> bool {
		matches!(self, Kernel::Parallel)
	}
}

/// How neighbor offsets that fall outside the data are brought back in range.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoundaryMode {
	/// Saturate to the nearest edge index (0 or n - 1).
	Clip,
	/// Treat the data as circular.
	Wrap,
}

impl Default for BoundaryMode {
	fn default() -> Self {
		BoundaryMode::Clip
	}
}

/// Grid dimension the neighborhood slides along.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
	/// Vary the row at a fixed column (compares across the y-dimension).
	Row,
	/// Vary the column at a fixed row (compares across the x-dimension).
	Column,
}

impl Default for Axis {
	fn default() -> Self {
		Axis::Row
	}
}

/// Which side of the neighborhood a flagged sample must sit on.
///
/// Maxima use `>` against forward neighbors and `>=` against backward ones;
/// minima mirror that with `<` and `<=`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Extremum {
	Maxima,
	Minima,
}

impl Default for Extremum {
	fn default() -> Self {
		Extremum::Maxima
	}
}

impl Extremum {
	#[inline(always)]
	pub fn beats_forward<T: PartialOrd>(self, center: T, neighbor: T) -> bool {
		match self {
			Extremum::Maxima => center > neighbor,
			Extremum::Minima => center < neighbor,
		}
	}

	#[inline(always)]
	pub fn beats_backward<T: PartialOrd>(self, center: T, neighbor: T) -> bool {
		match self {
			Extremum::Maxima => center >= neighbor,
			Extremum::Minima => center <= neighbor,
		}
	}
}
