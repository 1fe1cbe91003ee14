//! # Argrel 2D (Relative Extrema on a Grid)
//!
//! Row-major grid of `in_x` columns by `in_y` rows. Each cell is compared with the
//! `order` cells before and after it along one axis while the other coordinate stays
//! fixed, using the same asymmetric rule as the 1-D evaluator (`>` forward, `>=`
//! backward for maxima).
//!
//! ## Parameters
//! - **order**: Neighborhood half-width (defaults to 1). May exceed the grid extent.
//! - **mode**: Boundary handling along the scan axis, `Clip` or `Wrap` (defaults to `Clip`).
//! - **axis**: `Row` scans down a column (neighbors are other rows), `Column` scans
//!   along a row (defaults to `Row`).
//! - **extremum**: `Maxima` or `Minima` (defaults to `Maxima`).
//!
//! ## Returns
//! - **`Ok(Argrel2dOutput)`** on success, containing a row-major mask.
//! - **`Err(Argrel2dError)`** on failure
//!
//! ## Developer Notes / Decision Log
//! - Scalar kernel walks `(row, col)` in nested loops and resolves each neighbor per axis.
//! - Parallel kernel maps each linear slot to a `(base, stride, pos, extent)` line and
//!   evaluates it independently on rayon. No diagonal or mixed-axis neighborhoods.
//! - Batch: one full grid per order, grids spread across rayon workers.

use crate::utilities::boundary::{normalize_backward, normalize_forward};
use crate::utilities::enums::{Axis, BoundaryMode, Extremum, Kernel};
use crate::utilities::helpers::{expand_usize_range, resolve_kernel};
use crate::utilities::sample::Sample;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- DATA TYPES ---

#[derive(Debug, Clone)]
pub struct Argrel2dOutput {
    pub mask: Vec<bool>,
    pub in_x: usize,
    pub in_y: usize,
}

impl Argrel2dOutput {
    /// Flagged cells as `(row, col)`, in row-major order.
    pub fn indices(&self) -> Vec<(usize, usize)> {
        self.mask
            .iter()
            .enumerate()
            .filter_map(|(tid, &m)| m.then(|| (tid / self.in_x, tid % self.in_x)))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    pub fn row(&self, row: usize) -> Option<&[bool]> {
        (row < self.in_y).then(|| &self.mask[row * self.in_x..(row + 1) * self.in_x])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Argrel2dParams {
    pub order: Option<usize>,
    pub mode: Option<BoundaryMode>,
    pub axis: Option<Axis>,
    pub extremum: Option<Extremum>,
}

impl Default for Argrel2dParams {
    fn default() -> Self {
        Self {
            order: Some(1),
            mode: Some(BoundaryMode::Clip),
            axis: Some(Axis::Row),
            extremum: Some(Extremum::Maxima),
        }
    }
}

impl Argrel2dParams {
    pub fn get_order(&self) -> usize {
        self.order.unwrap_or(1)
    }
    pub fn get_mode(&self) -> BoundaryMode {
        self.mode.unwrap_or_default()
    }
    pub fn get_axis(&self) -> Axis {
        self.axis.unwrap_or_default()
    }
    pub fn get_extremum(&self) -> Extremum {
        self.extremum.unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct Argrel2dInput<'a, T: Sample> {
    pub data: &'a [T],
    pub in_x: usize,
    pub in_y: usize,
    pub params: Argrel2dParams,
}

impl<'a, T: Sample> Argrel2dInput<'a, T> {
    pub fn from_grid(data: &'a [T], in_x: usize, in_y: usize, params: Argrel2dParams) -> Self {
        Self {
            data,
            in_x,
            in_y,
            params,
        }
    }
    pub fn with_default_grid(data: &'a [T], in_x: usize, in_y: usize) -> Self {
        Self::from_grid(data, in_x, in_y, Argrel2dParams::default())
    }
}

// --- BUILDER ---

#[derive(Copy, Clone, Debug, Default)]
pub struct Argrel2dBuilder {
    order: Option<usize>,
    mode: Option<BoundaryMode>,
    axis: Option<Axis>,
    extremum: Option<Extremum>,
    kernel: Kernel,
}

impl Argrel2dBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn order(mut self, n: usize) -> Self {
        self.order = Some(n);
        self
    }
    pub fn mode(mut self, m: BoundaryMode) -> Self {
        self.mode = Some(m);
        self
    }
    pub fn axis(mut self, a: Axis) -> Self {
        self.axis = Some(a);
        self
    }
    pub fn extremum(mut self, e: Extremum) -> Self {
        self.extremum = Some(e);
        self
    }
    pub fn kernel(mut self, k: Kernel) -> Self {
        self.kernel = k;
        self
    }
    pub fn apply_grid<T: Sample>(
        self,
        data: &[T],
        in_x: usize,
        in_y: usize,
    ) -> Result<Argrel2dOutput, Argrel2dError> {
        let params = Argrel2dParams {
            order: self.order,
            mode: self.mode,
            axis: self.axis,
            extremum: self.extremum,
        };
        let input = Argrel2dInput::from_grid(data, in_x, in_y, params);
        argrel_2d_with_kernel(&input, self.kernel)
    }
}

// --- ERRORS ---

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Argrel2dError {
    #[error("argrel_2d: Empty data provided.")]
    EmptyInputData,
    #[error("argrel_2d: Invalid dimensions: in_x = {in_x}, in_y = {in_y}")]
    InvalidDimensions { in_x: usize, in_y: usize },
    #[error("argrel_2d: Grid {in_x}x{in_y} overflows usize")]
    DimensionOverflow { in_x: usize, in_y: usize },
    #[error("argrel_2d: Grid {in_x}x{in_y} needs {} samples, got {got}", .in_x * .in_y)]
    GridSizeMismatch { in_x: usize, in_y: usize, got: usize },
    #[error("argrel_2d: Invalid order: order = {order}")]
    InvalidOrder { order: usize },
    #[error("argrel_2d: Output length mismatch: expected {expected}, got {got}")]
    OutputLengthMismatch { expected: usize, got: usize },
    #[error("argrel_2d: Invalid range: start={start}, end={end}, step={step}")]
    InvalidRange { start: usize, end: usize, step: usize },
    #[error("argrel_2d: Invalid kernel: {0:?}")]
    InvalidKernel(Kernel),
}

// --- KERNEL API ---

#[inline]
pub fn argrel_2d<T: Sample>(input: &Argrel2dInput<T>) -> Result<Argrel2dOutput, Argrel2dError> {
    argrel_2d_with_kernel(input, Kernel::Auto)
}

fn validate_grid<T: Sample>(data: &[T], in_x: usize, in_y: usize) -> Result<usize, Argrel2dError> {
    if data.is_empty() {
        return Err(Argrel2dError::EmptyInputData);
    }
    if in_x == 0 || in_y == 0 {
        return Err(Argrel2dError::InvalidDimensions { in_x, in_y });
    }
    let total = in_x
        .checked_mul(in_y)
        .ok_or(Argrel2dError::DimensionOverflow { in_x, in_y })?;
    if total != data.len() {
        return Err(Argrel2dError::GridSizeMismatch {
            in_x,
            in_y,
            got: data.len(),
        });
    }
    Ok(total)
}

#[inline]
fn argrel_2d_prepare<T: Sample>(input: &Argrel2dInput<T>) -> Result<usize, Argrel2dError> {
    let total = validate_grid(input.data, input.in_x, input.in_y)?;
    let order = input.params.get_order();
    if order == 0 {
        return Err(Argrel2dError::InvalidOrder { order });
    }
    Ok(total)
}

#[inline]
fn argrel_2d_compute_into<T: Sample>(input: &Argrel2dInput<T>, kernel: Kernel, out: &mut [bool]) {
    let p = &input.params;
    let (order, mode, axis, extremum) = (p.get_order(), p.get_mode(), p.get_axis(), p.get_extremum());
    match resolve_kernel(kernel) {
        Kernel::Parallel => argrel_2d_par(
            input.data, input.in_x, input.in_y, order, mode, axis, extremum, out,
        ),
        _ => argrel_2d_scalar(
            input.data, input.in_x, input.in_y, order, mode, axis, extremum, out,
        ),
    }
}

pub fn argrel_2d_with_kernel<T: Sample>(
    input: &Argrel2dInput<T>,
    kernel: Kernel,
) -> Result<Argrel2dOutput, Argrel2dError> {
    let total = argrel_2d_prepare(input)?;
    let mut mask = vec![false; total];
    argrel_2d_compute_into(input, kernel, &mut mask);
    Ok(Argrel2dOutput {
        mask,
        in_x: input.in_x,
        in_y: input.in_y,
    })
}

/// Write directly to a caller-provided row-major mask - no allocations
#[inline]
pub fn argrel_2d_into_slice<T: Sample>(
    dst: &mut [bool],
    input: &Argrel2dInput<T>,
    kernel: Kernel,
) -> Result<(), Argrel2dError> {
    let total = argrel_2d_prepare(input)?;
    if dst.len() != total {
        return Err(Argrel2dError::OutputLengthMismatch {
            expected: total,
            got: dst.len(),
        });
    }
    argrel_2d_compute_into(input, kernel, dst);
    Ok(())
}

/// Contract entry point: maxima over an `in_x` by `in_y` grid, parallel evaluation.
pub fn evaluate_2d<T: Sample>(
    in_x: usize,
    in_y: usize,
    order: usize,
    mode: BoundaryMode,
    axis: Axis,
    input: &[T],
) -> Result<Vec<bool>, Argrel2dError> {
    evaluate_2d_with_kernel(in_x, in_y, order, mode, axis, input, Kernel::Parallel)
}

/// Sequential reference for [`evaluate_2d`].
pub fn evaluate_2d_sequential<T: Sample>(
    in_x: usize,
    in_y: usize,
    order: usize,
    mode: BoundaryMode,
    axis: Axis,
    input: &[T],
) -> Result<Vec<bool>, Argrel2dError> {
    evaluate_2d_with_kernel(in_x, in_y, order, mode, axis, input, Kernel::Scalar)
}

fn evaluate_2d_with_kernel<T: Sample>(
    in_x: usize,
    in_y: usize,
    order: usize,
    mode: BoundaryMode,
    axis: Axis,
    input: &[T],
    kernel: Kernel,
) -> Result<Vec<bool>, Argrel2dError> {
    let params = Argrel2dParams {
        order: Some(order),
        mode: Some(mode),
        axis: Some(axis),
        extremum: Some(Extremum::Maxima),
    };
    argrel_2d_with_kernel(&Argrel2dInput::from_grid(input, in_x, in_y, params), kernel)
        .map(|o| o.mask)
}

// --- SCALAR LOGIC ---

#[inline]
pub fn argrel_2d_scalar<T: Sample>(
    data: &[T],
    in_x: usize,
    in_y: usize,
    order: usize,
    mode: BoundaryMode,
    axis: Axis,
    extremum: Extremum,
    out: &mut [bool],
) {
    debug_assert_eq!(data.len(), in_x * in_y);
    debug_assert_eq!(out.len(), data.len());

    for row in 0..in_y {
        for col in 0..in_x {
            let tid = row * in_x + col;
            let center = data[tid];
            let mut is_extremum = true;
            for o in 1..=order {
                let (fwd, bwd) = match axis {
                    Axis::Row => {
                        let fwd_row = normalize_forward(mode, in_y, row + o);
                        let bwd_row = normalize_backward(mode, in_y, row as isize - o as isize);
                        (fwd_row * in_x + col, bwd_row * in_x + col)
                    }
                    Axis::Column => {
                        let fwd_col = normalize_forward(mode, in_x, col + o);
                        let bwd_col = normalize_backward(mode, in_x, col as isize - o as isize);
                        (row * in_x + fwd_col, row * in_x + bwd_col)
                    }
                };
                is_extremum &= extremum.beats_forward(center, data[fwd]);
                is_extremum &= extremum.beats_backward(center, data[bwd]);
            }
            out[tid] = is_extremum;
        }
    }
}

// --- PARALLEL LOGIC ---

#[inline]
pub fn argrel_2d_par<T: Sample>(
    data: &[T],
    in_x: usize,
    in_y: usize,
    order: usize,
    mode: BoundaryMode,
    axis: Axis,
    extremum: Extremum,
    out: &mut [bool],
) {
    debug_assert_eq!(data.len(), in_x * in_y);
    debug_assert_eq!(out.len(), data.len());

    // Each slot sits on one scan line: `base + k * stride` for k in [0, extent).
    let flag = |tid: usize| -> bool {
        let (row, col) = (tid / in_x, tid % in_x);
        let (base, stride, pos, extent) = match axis {
            Axis::Row => (col, in_x, row, in_y),
            Axis::Column => (row * in_x, 1, col, in_x),
        };
        let center = data[tid];
        (1..=order).all(|o| {
            let fwd = base + normalize_forward(mode, extent, pos + o) * stride;
            let bwd = base + normalize_backward(mode, extent, pos as isize - o as isize) * stride;
            extremum.beats_forward(center, data[fwd]) && extremum.beats_backward(center, data[bwd])
        })
    };

    #[cfg(not(target_arch = "wasm32"))]
    {
        out.par_iter_mut()
            .enumerate()
            .for_each(|(tid, slot)| *slot = flag(tid));
    }

    #[cfg(target_arch = "wasm32")]
    for (tid, slot) in out.iter_mut().enumerate() {
        *slot = flag(tid);
    }
}

// --- BATCH API ---

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Argrel2dBatchRange {
    pub order: (usize, usize, usize),
}

impl Default for Argrel2dBatchRange {
    fn default() -> Self {
        Self { order: (1, 8, 1) }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Argrel2dBatchBuilder {
    range: Argrel2dBatchRange,
    mode: BoundaryMode,
    axis: Axis,
    extremum: Extremum,
    kernel: Kernel,
}

impl Argrel2dBatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn kernel(mut self, k: Kernel) -> Self {
        self.kernel = k;
        self
    }
    pub fn mode(mut self, m: BoundaryMode) -> Self {
        self.mode = m;
        self
    }
    pub fn axis(mut self, a: Axis) -> Self {
        self.axis = a;
        self
    }
    pub fn extremum(mut self, e: Extremum) -> Self {
        self.extremum = e;
        self
    }
    pub fn order_range(mut self, start: usize, end: usize, step: usize) -> Self {
        self.range.order = (start, end, step);
        self
    }
    pub fn order_static(mut self, o: usize) -> Self {
        self.range.order = (o, o, 0);
        self
    }
    pub fn apply_grid<T: Sample>(
        self,
        data: &[T],
        in_x: usize,
        in_y: usize,
    ) -> Result<Argrel2dBatchOutput, Argrel2dError> {
        let template = Argrel2dParams {
            order: None,
            mode: Some(self.mode),
            axis: Some(self.axis),
            extremum: Some(self.extremum),
        };
        argrel_2d_batch_with_kernel(data, in_x, in_y, &self.range, template, self.kernel)
    }
}

#[derive(Clone, Debug)]
pub struct Argrel2dBatchOutput {
    /// One row-major grid mask per combo, concatenated.
    pub masks: Vec<bool>,
    pub combos: Vec<Argrel2dParams>,
    pub rows: usize,
    pub cols: usize,
    pub in_x: usize,
    pub in_y: usize,
}

impl Argrel2dBatchOutput {
    pub fn row_for_order(&self, order: usize) -> Option<usize> {
        self.combos.iter().position(|c| c.get_order() == order)
    }
    pub fn mask_for(&self, order: usize) -> Option<&[bool]> {
        self.row_for_order(order).map(|row| {
            let start = row * self.cols;
            &self.masks[start..start + self.cols]
        })
    }
}

#[inline(always)]
fn expand_grid(
    r: &Argrel2dBatchRange,
    template: Argrel2dParams,
) -> Result<Vec<Argrel2dParams>, Argrel2dError> {
    let (start, end, step) = r.order;
    let orders =
        expand_usize_range(r.order).ok_or(Argrel2dError::InvalidRange { start, end, step })?;
    let mut out = Vec::with_capacity(orders.len());
    for o in orders {
        if o == 0 {
            return Err(Argrel2dError::InvalidOrder { order: o });
        }
        out.push(Argrel2dParams {
            order: Some(o),
            ..template
        });
    }
    Ok(out)
}

pub fn argrel_2d_batch_with_kernel<T: Sample>(
    data: &[T],
    in_x: usize,
    in_y: usize,
    sweep: &Argrel2dBatchRange,
    template: Argrel2dParams,
    k: Kernel,
) -> Result<Argrel2dBatchOutput, Argrel2dError> {
    match resolve_kernel(k) {
        Kernel::Parallel => argrel_2d_batch_inner(data, in_x, in_y, sweep, template, true),
        Kernel::Scalar => argrel_2d_batch_inner(data, in_x, in_y, sweep, template, false),
        other => Err(Argrel2dError::InvalidKernel(other)),
    }
}

fn argrel_2d_batch_inner<T: Sample>(
    data: &[T],
    in_x: usize,
    in_y: usize,
    sweep: &Argrel2dBatchRange,
    template: Argrel2dParams,
    parallel: bool,
) -> Result<Argrel2dBatchOutput, Argrel2dError> {
    let cols = validate_grid(data, in_x, in_y)?;
    let combos = expand_grid(sweep, template)?;
    let rows = combos.len();
    let total = rows
        .checked_mul(cols)
        .ok_or(Argrel2dError::DimensionOverflow { in_x: cols, in_y: rows })?;
    log::trace!(
        "argrel_2d batch: grids={} cells={} parallel={}",
        rows,
        cols,
        parallel
    );

    let mut masks = vec![false; total];

    let do_grid = |row: usize, out: &mut [bool]| {
        let p = &combos[row];
        argrel_2d_scalar(
            data,
            in_x,
            in_y,
            p.get_order(),
            p.get_mode(),
            p.get_axis(),
            p.get_extremum(),
            out,
        )
    };

    if parallel {
        #[cfg(not(target_arch = "wasm32"))]
        {
            masks
                .par_chunks_mut(cols)
                .enumerate()
                .for_each(|(row, out)| do_grid(row, out));
        }

        #[cfg(target_arch = "wasm32")]
        for (row, out) in masks.chunks_mut(cols).enumerate() {
            do_grid(row, out);
        }
    } else {
        for (row, out) in masks.chunks_mut(cols).enumerate() {
            do_grid(row, out);
        }
    }

    Ok(Argrel2dBatchOutput {
        masks,
        combos,
        rows,
        cols,
        in_x,
        in_y,
    })
}
