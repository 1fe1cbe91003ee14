//! # Argrel (Relative Extrema, 1-D)
//!
//! Flags every sample that beats all samples within `order` positions on either
//! side. Forward neighbors must be beaten strictly (`>`), backward neighbors
//! non-strictly (`>=`); minima mirror this with `<` / `<=`. On a run of equal
//! values this flags at most the last member of the run, never all or several.
//!
//! ## Parameters
//! - **order**: Neighborhood half-width (defaults to 1). May exceed the data length.
//! - **mode**: Boundary handling, `Clip` or `Wrap` (defaults to `Clip`).
//! - **extremum**: `Maxima` or `Minima` (defaults to `Maxima`).
//!
//! ## Returns
//! - **`Ok(ArgrelOutput)`** on success, containing a mask aligned with the input.
//! - **`Err(ArgrelError)`** on failure
//!
//! ## Developer Notes / Decision Log
//! - Two independent kernels: `argrel_scalar` accumulates every comparison in a plain
//!   loop; `argrel_par` evaluates one output slot per rayon work item and short-circuits.
//!   They share only the boundary normalizer and the comparison predicate, so the
//!   equivalence tests compare two genuinely different derivations.
//! - NaN is not an error. Every comparison against NaN is false, so no window touching
//!   a NaN is flagged.
//! - Batch: one mask row per order, rows evaluated with the scalar kernel and spread
//!   across rayon workers with `par_chunks_mut`.

use crate::utilities::boundary::{normalize_backward, normalize_forward};
use crate::utilities::enums::{BoundaryMode, Extremum, Kernel};
use crate::utilities::helpers::{expand_usize_range, resolve_kernel};
use crate::utilities::sample::Sample;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- DATA TYPES ---

#[derive(Debug, Clone)]
pub struct ArgrelOutput {
    pub mask: Vec<bool>,
}

impl ArgrelOutput {
    /// Positions flagged as extrema, ascending.
    pub fn indices(&self) -> Vec<usize> {
        self.mask
            .iter()
            .enumerate()
            .filter_map(|(i, &m)| m.then_some(i))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArgrelParams {
    pub order: Option<usize>,
    pub mode: Option<BoundaryMode>,
    pub extremum: Option<Extremum>,
}

impl Default for ArgrelParams {
    fn default() -> Self {
        Self {
            order: Some(1),
            mode: Some(BoundaryMode::Clip),
            extremum: Some(Extremum::Maxima),
        }
    }
}

impl ArgrelParams {
    pub fn get_order(&self) -> usize {
        self.order.unwrap_or(1)
    }
    pub fn get_mode(&self) -> BoundaryMode {
        self.mode.unwrap_or_default()
    }
    pub fn get_extremum(&self) -> Extremum {
        self.extremum.unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ArgrelInput<'a, T: Sample> {
    pub data: &'a [T],
    pub params: ArgrelParams,
}

impl<'a, T: Sample> ArgrelInput<'a, T> {
    pub fn from_slice(data: &'a [T], params: ArgrelParams) -> Self {
        Self { data, params }
    }
    pub fn with_default_slice(data: &'a [T]) -> Self {
        Self::from_slice(data, ArgrelParams::default())
    }
}

// --- BUILDER ---

#[derive(Copy, Clone, Debug, Default)]
pub struct ArgrelBuilder {
    order: Option<usize>,
    mode: Option<BoundaryMode>,
    extremum: Option<Extremum>,
    kernel: Kernel,
}

impl ArgrelBuilder {
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
    pub fn extremum(mut self, e: Extremum) -> Self {
        self.extremum = Some(e);
        self
    }
    pub fn kernel(mut self, k: Kernel) -> Self {
        self.kernel = k;
        self
    }
    fn params(&self) -> ArgrelParams {
        ArgrelParams {
            order: self.order,
            mode: self.mode,
            extremum: self.extremum,
        }
    }
    pub fn apply_slice<T: Sample>(self, data: &[T]) -> Result<ArgrelOutput, ArgrelError> {
        let input = ArgrelInput::from_slice(data, self.params());
        argrel_with_kernel(&input, self.kernel)
    }
    pub fn apply_into_slice<T: Sample>(
        self,
        data: &[T],
        dst: &mut [bool],
    ) -> Result<(), ArgrelError> {
        let input = ArgrelInput::from_slice(data, self.params());
        argrel_into_slice(dst, &input, self.kernel)
    }
}

// --- ERRORS ---

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgrelError {
    #[error("argrel: Empty data provided.")]
    EmptyInputData,
    #[error("argrel: Invalid order: order = {order}, data length = {data_len}")]
    InvalidOrder { order: usize, data_len: usize },
    #[error("argrel: Declared length {expected} does not match buffer length {got}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("argrel: Output length mismatch: expected {expected}, got {got}")]
    OutputLengthMismatch { expected: usize, got: usize },
    #[error("argrel: Invalid range: start={start}, end={end}, step={step}")]
    InvalidRange { start: usize, end: usize, step: usize },
    #[error("argrel: Invalid kernel: {0:?}")]
    InvalidKernel(Kernel),
}

// --- KERNEL API ---

#[inline]
pub fn argrel<T: Sample>(input: &ArgrelInput<T>) -> Result<ArgrelOutput, ArgrelError> {
    argrel_with_kernel(input, Kernel::Auto)
}

#[inline]
fn argrel_prepare<T: Sample>(
    input: &ArgrelInput<T>,
) -> Result<(usize, BoundaryMode, Extremum), ArgrelError> {
    let data = input.data;
    if data.is_empty() {
        return Err(ArgrelError::EmptyInputData);
    }
    let order = input.params.get_order();
    if order == 0 {
        return Err(ArgrelError::InvalidOrder {
            order,
            data_len: data.len(),
        });
    }
    Ok((order, input.params.get_mode(), input.params.get_extremum()))
}

#[inline]
fn argrel_compute_into<T: Sample>(
    data: &[T],
    order: usize,
    mode: BoundaryMode,
    extremum: Extremum,
    kernel: Kernel,
    out: &mut [bool],
) {
    match resolve_kernel(kernel) {
        Kernel::Parallel => argrel_par(data, order, mode, extremum, out),
        _ => argrel_scalar(data, order, mode, extremum, out),
    }
}

pub fn argrel_with_kernel<T: Sample>(
    input: &ArgrelInput<T>,
    kernel: Kernel,
) -> Result<ArgrelOutput, ArgrelError> {
    let (order, mode, extremum) = argrel_prepare(input)?;
    let mut mask = vec![false; input.data.len()];
    argrel_compute_into(input.data, order, mode, extremum, kernel, &mut mask);
    Ok(ArgrelOutput { mask })
}

/// Write directly to a caller-provided mask - no allocations
#[inline]
pub fn argrel_into_slice<T: Sample>(
    dst: &mut [bool],
    input: &ArgrelInput<T>,
    kernel: Kernel,
) -> Result<(), ArgrelError> {
    let (order, mode, extremum) = argrel_prepare(input)?;
    if dst.len() != input.data.len() {
        return Err(ArgrelError::OutputLengthMismatch {
            expected: input.data.len(),
            got: dst.len(),
        });
    }
    argrel_compute_into(input.data, order, mode, extremum, kernel, dst);
    Ok(())
}

/// Contract entry point: `n` samples, maxima, parallel evaluation.
pub fn evaluate_1d<T: Sample>(
    n: usize,
    order: usize,
    mode: BoundaryMode,
    input: &[T],
) -> Result<Vec<bool>, ArgrelError> {
    evaluate_1d_with_kernel(n, order, mode, input, Kernel::Parallel)
}

/// Sequential reference for [`evaluate_1d`].
pub fn evaluate_1d_sequential<T: Sample>(
    n: usize,
    order: usize,
    mode: BoundaryMode,
    input: &[T],
) -> Result<Vec<bool>, ArgrelError> {
    evaluate_1d_with_kernel(n, order, mode, input, Kernel::Scalar)
}

fn evaluate_1d_with_kernel<T: Sample>(
    n: usize,
    order: usize,
    mode: BoundaryMode,
    input: &[T],
    kernel: Kernel,
) -> Result<Vec<bool>, ArgrelError> {
    if n == 0 {
        return Err(ArgrelError::EmptyInputData);
    }
    if input.len() != n {
        return Err(ArgrelError::LengthMismatch {
            expected: n,
            got: input.len(),
        });
    }
    let params = ArgrelParams {
        order: Some(order),
        mode: Some(mode),
        extremum: Some(Extremum::Maxima),
    };
    argrel_with_kernel(&ArgrelInput::from_slice(input, params), kernel).map(|o| o.mask)
}

// --- SCALAR LOGIC ---

/// Sequential kernel. Accumulates all `2 * order` comparisons per position.
#[inline]
pub fn argrel_scalar<T: Sample>(
    data: &[T],
    order: usize,
    mode: BoundaryMode,
    extremum: Extremum,
    out: &mut [bool],
) {
    let n = data.len();
    debug_assert_eq!(out.len(), n);

    for i in 0..n {
        let center = data[i];
        let mut is_extremum = true;
        for o in 1..=order {
            let fwd = normalize_forward(mode, n, i + o);
            let bwd = normalize_backward(mode, n, i as isize - o as isize);
            is_extremum &= extremum.beats_forward(center, data[fwd]);
            is_extremum &= extremum.beats_backward(center, data[bwd]);
        }
        out[i] = is_extremum;
    }
}

// --- PARALLEL LOGIC ---

/// Parallel kernel. One output slot per work item, no shared state between items.
#[inline]
pub fn argrel_par<T: Sample>(
    data: &[T],
    order: usize,
    mode: BoundaryMode,
    extremum: Extremum,
    out: &mut [bool],
) {
    let n = data.len();
    debug_assert_eq!(out.len(), n);

    let flag = |i: usize| -> bool {
        let center = data[i];
        (1..=order).all(|o| {
            extremum.beats_forward(center, data[normalize_forward(mode, n, i + o)])
                && extremum.beats_backward(
                    center,
                    data[normalize_backward(mode, n, i as isize - o as isize)],
                )
        })
    };

    #[cfg(not(target_arch = "wasm32"))]
    {
        out.par_iter_mut()
            .enumerate()
            .for_each(|(i, slot)| *slot = flag(i));
    }

    #[cfg(target_arch = "wasm32")]
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = flag(i);
    }
}

// --- BATCH API ---

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArgrelBatchRange {
    pub order: (usize, usize, usize),
}

impl Default for ArgrelBatchRange {
    fn default() -> Self {
        Self { order: (1, 8, 1) }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ArgrelBatchBuilder {
    range: ArgrelBatchRange,
    mode: BoundaryMode,
    extremum: Extremum,
    kernel: Kernel,
}

impl ArgrelBatchBuilder {
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
    pub fn apply_slice<T: Sample>(self, data: &[T]) -> Result<ArgrelBatchOutput, ArgrelError> {
        argrel_batch_with_kernel(data, &self.range, self.mode, self.extremum, self.kernel)
    }
}

#[derive(Clone, Debug)]
pub struct ArgrelBatchOutput {
    pub masks: Vec<bool>,
    pub combos: Vec<ArgrelParams>,
    pub rows: usize,
    pub cols: usize,
}

impl ArgrelBatchOutput {
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
    r: &ArgrelBatchRange,
    mode: BoundaryMode,
    extremum: Extremum,
    data_len: usize,
) -> Result<Vec<ArgrelParams>, ArgrelError> {
    let (start, end, step) = r.order;
    let orders =
        expand_usize_range(r.order).ok_or(ArgrelError::InvalidRange { start, end, step })?;
    let mut out = Vec::with_capacity(orders.len());
    for o in orders {
        if o == 0 {
            return Err(ArgrelError::InvalidOrder { order: o, data_len });
        }
        out.push(ArgrelParams {
            order: Some(o),
            mode: Some(mode),
            extremum: Some(extremum),
        });
    }
    Ok(out)
}

pub fn argrel_batch_with_kernel<T: Sample>(
    data: &[T],
    sweep: &ArgrelBatchRange,
    mode: BoundaryMode,
    extremum: Extremum,
    k: Kernel,
) -> Result<ArgrelBatchOutput, ArgrelError> {
    match resolve_kernel(k) {
        Kernel::Parallel => argrel_batch_par_slice(data, sweep, mode, extremum),
        Kernel::Scalar => argrel_batch_slice(data, sweep, mode, extremum),
        other => Err(ArgrelError::InvalidKernel(other)),
    }
}

#[inline(always)]
pub fn argrel_batch_slice<T: Sample>(
    data: &[T],
    sweep: &ArgrelBatchRange,
    mode: BoundaryMode,
    extremum: Extremum,
) -> Result<ArgrelBatchOutput, ArgrelError> {
    argrel_batch_inner(data, sweep, mode, extremum, false)
}

#[inline(always)]
pub fn argrel_batch_par_slice<T: Sample>(
    data: &[T],
    sweep: &ArgrelBatchRange,
    mode: BoundaryMode,
    extremum: Extremum,
) -> Result<ArgrelBatchOutput, ArgrelError> {
    argrel_batch_inner(data, sweep, mode, extremum, true)
}

#[inline(always)]
fn argrel_batch_inner<T: Sample>(
    data: &[T],
    sweep: &ArgrelBatchRange,
    mode: BoundaryMode,
    extremum: Extremum,
    parallel: bool,
) -> Result<ArgrelBatchOutput, ArgrelError> {
    if data.is_empty() {
        return Err(ArgrelError::EmptyInputData);
    }
    let combos = expand_grid(sweep, mode, extremum, data.len())?;

    let rows = combos.len();
    let cols = data.len();
    let total = rows.checked_mul(cols).ok_or(ArgrelError::InvalidRange {
        start: sweep.order.0,
        end: sweep.order.1,
        step: sweep.order.2,
    })?;
    log::trace!("argrel batch: rows={} cols={} parallel={}", rows, cols, parallel);

    let mut masks = vec![false; total];

    let do_row = |row: usize, out: &mut [bool]| {
        argrel_scalar(data, combos[row].get_order(), mode, extremum, out)
    };

    if parallel {
        #[cfg(not(target_arch = "wasm32"))]
        {
            masks
                .par_chunks_mut(cols)
                .enumerate()
                .for_each(|(row, out)| do_row(row, out));
        }

        #[cfg(target_arch = "wasm32")]
        for (row, out) in masks.chunks_mut(cols).enumerate() {
            do_row(row, out);
        }
    } else {
        for (row, out) in masks.chunks_mut(cols).enumerate() {
            do_row(row, out);
        }
    }

    Ok(ArgrelBatchOutput {
        masks,
        combos,
        rows,
        cols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn run<T: Sample>(
        data: &[T],
        order: usize,
        mode: BoundaryMode,
        extremum: Extremum,
        kernel: Kernel,
    ) -> Result<Vec<bool>, ArgrelError> {
        ArgrelBuilder::new()
            .order(order)
            .mode(mode)
            .extremum(extremum)
            .kernel(kernel)
            .apply_slice(data)
            .map(|o| o.mask)
    }

    fn check_argrel_plateau_flags_last(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data = [1.0, 5.0, 5.0, 5.0, 1.0];
        let mask = run(&data, 1, BoundaryMode::Clip, Extremum::Maxima, kernel)?;
        assert_eq!(
            mask,
            vec![false, false, false, true, false],
            "[{}] only the last plateau element may be flagged",
            test_name
        );
        Ok(())
    }

    fn check_argrel_flat_series(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data = [5, 5, 5, 5, 5];
        for mode in [BoundaryMode::Clip, BoundaryMode::Wrap] {
            let mask = run(&data, 1, mode, Extremum::Maxima, kernel)?;
            assert!(
                mask.iter().all(|&m| !m),
                "[{}] flat series flagged something under {:?}: {:?}",
                test_name,
                mode,
                mask
            );
        }
        Ok(())
    }

    fn check_argrel_edge_clip(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data = [1, 2, 3, 2, 1];
        let out = ArgrelBuilder::new()
            .order(2)
            .mode(BoundaryMode::Clip)
            .kernel(kernel)
            .apply_slice(&data)?;
        assert_eq!(out.indices(), vec![2], "[{}]", test_name);
        assert_eq!(out.count(), 1);
        Ok(())
    }

    fn check_argrel_edge_wrap(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data = [2.0f32, 1.0, 0.0, 1.0, 3.0];
        let clip = run(&data, 1, BoundaryMode::Clip, Extremum::Maxima, kernel)?;
        let wrap = run(&data, 1, BoundaryMode::Wrap, Extremum::Maxima, kernel)?;
        assert_eq!(clip, vec![true, false, false, false, false], "[{}] clip", test_name);
        assert_eq!(wrap, vec![false, false, false, false, true], "[{}] wrap", test_name);
        Ok(())
    }

    fn check_argrel_order_exceeds_length(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data = [3i64, 1, 5, 1, 4];
        let clip = run(&data, 12, BoundaryMode::Clip, Extremum::Maxima, kernel)?;
        assert_eq!(clip, vec![false, false, true, false, false], "[{}] clip", test_name);
        // every position meets itself once the window covers the whole ring
        let wrap = run(&data, 12, BoundaryMode::Wrap, Extremum::Maxima, kernel)?;
        assert_eq!(wrap, vec![false; 5], "[{}] wrap", test_name);
        Ok(())
    }

    fn check_argrel_single_sample(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        for mode in [BoundaryMode::Clip, BoundaryMode::Wrap] {
            let mask = run(&[7.0f64], 3, mode, Extremum::Maxima, kernel)?;
            assert_eq!(mask, vec![false], "[{}] {:?}", test_name, mode);
        }
        Ok(())
    }

    fn check_argrel_nan_handling(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data = [1.0, 5.0, 2.0, f64::NAN, 0.0, 3.0, 1.0];
        let out = ArgrelBuilder::new().kernel(kernel).apply_slice(&data)?;
        assert_eq!(out.indices(), vec![1, 5], "[{}]", test_name);
        Ok(())
    }

    fn check_argrel_minima(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data = [3, 1, 2, 0, 4];
        let mask = run(&data, 1, BoundaryMode::Clip, Extremum::Minima, kernel)?;
        assert_eq!(mask, vec![false, true, false, true, false], "[{}]", test_name);

        let plateau = [4, 1, 1, 4];
        let mask = run(&plateau, 1, BoundaryMode::Clip, Extremum::Minima, kernel)?;
        assert_eq!(mask, vec![false, false, true, false], "[{}] plateau", test_name);
        Ok(())
    }

    fn check_argrel_element_types(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let base: Vec<i32> = vec![4, 9, 2, 7, 7, 3, 8, 1, 6, 6, 6, 0, 5];
        let as_i64: Vec<i64> = base.iter().map(|&v| v as i64).collect();
        let as_f32: Vec<f32> = base.iter().map(|&v| v as f32).collect();
        let as_f64: Vec<f64> = base.iter().map(|&v| v as f64).collect();
        for mode in [BoundaryMode::Clip, BoundaryMode::Wrap] {
            for order in 1..=4 {
                let expected = run(&base, order, mode, Extremum::Maxima, kernel)?;
                assert_eq!(run(&as_i64, order, mode, Extremum::Maxima, kernel)?, expected, "[{}] i64", test_name);
                assert_eq!(run(&as_f32, order, mode, Extremum::Maxima, kernel)?, expected, "[{}] f32", test_name);
                assert_eq!(run(&as_f64, order, mode, Extremum::Maxima, kernel)?, expected, "[{}] f64", test_name);
            }
        }
        Ok(())
    }

    fn check_argrel_matches_reference(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data: Vec<f64> = (0..257)
            .map(|i| ((i as f64) * 0.37).sin() * 10.0 + ((i * 7) % 5) as f64)
            .collect();
        for mode in [BoundaryMode::Clip, BoundaryMode::Wrap] {
            for extremum in [Extremum::Maxima, Extremum::Minima] {
                for order in [1, 2, 3, 8, 100, 300] {
                    let mut reference = vec![false; data.len()];
                    argrel_scalar(&data, order, mode, extremum, &mut reference);
                    let got = run(&data, order, mode, extremum, kernel)?;
                    assert_eq!(
                        got, reference,
                        "[{}] order={} mode={:?} extremum={:?}",
                        test_name, order, mode, extremum
                    );
                }
            }
        }
        Ok(())
    }

    fn check_argrel_zero_order(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let res = run(&[1.0, 2.0, 3.0], 0, BoundaryMode::Clip, Extremum::Maxima, kernel);
        assert_eq!(
            res,
            Err(ArgrelError::InvalidOrder { order: 0, data_len: 3 }),
            "[{}] argrel should fail with zero order",
            test_name
        );
        Ok(())
    }

    fn check_argrel_empty_input(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let empty: [f64; 0] = [];
        let res = run(&empty, 1, BoundaryMode::Clip, Extremum::Maxima, kernel);
        assert_eq!(res, Err(ArgrelError::EmptyInputData), "[{}]", test_name);
        Ok(())
    }

    fn check_argrel_into_slice(test_name: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data = [0.5, 2.0, 1.0, 4.0, 3.0, 3.5, 0.0];
        let input = ArgrelInput::from_slice(
            &data,
            ArgrelParams {
                order: Some(2),
                ..ArgrelParams::default()
            },
        );
        let api = argrel_with_kernel(&input, kernel)?;
        let mut dst = vec![true; data.len()];
        argrel_into_slice(&mut dst, &input, kernel)?;
        assert_eq!(dst, api.mask, "[{}]", test_name);

        let mut short = vec![false; 3];
        assert_eq!(
            argrel_into_slice(&mut short, &input, kernel),
            Err(ArgrelError::OutputLengthMismatch { expected: 7, got: 3 })
        );
        Ok(())
    }

    macro_rules! generate_all_argrel_tests {
        ($($test_fn:ident),*) => {
            paste::paste! {
                $(
                    #[test]
                    fn [<$test_fn _scalar>]() {
                        $test_fn(stringify!([<$test_fn _scalar>]), Kernel::Scalar).unwrap();
                    }
                    #[test]
                    fn [<$test_fn _parallel>]() {
                        $test_fn(stringify!([<$test_fn _parallel>]), Kernel::Parallel).unwrap();
                    }
                    #[test]
                    fn [<$test_fn _auto>]() {
                        $test_fn(stringify!([<$test_fn _auto>]), Kernel::Auto).unwrap();
                    }
                )*
            }
        }
    }

    generate_all_argrel_tests!(
        check_argrel_plateau_flags_last,
        check_argrel_flat_series,
        check_argrel_edge_clip,
        check_argrel_edge_wrap,
        check_argrel_order_exceeds_length,
        check_argrel_single_sample,
        check_argrel_nan_handling,
        check_argrel_minima,
        check_argrel_element_types,
        check_argrel_matches_reference,
        check_argrel_zero_order,
        check_argrel_empty_input,
        check_argrel_into_slice
    );

    #[test]
    fn test_evaluate_1d_contract() {
        let data = [1, 2, 3, 2, 1];
        let par = evaluate_1d(5, 2, BoundaryMode::Clip, &data).unwrap();
        let seq = evaluate_1d_sequential(5, 2, BoundaryMode::Clip, &data).unwrap();
        assert_eq!(par, vec![false, false, true, false, false]);
        assert_eq!(par, seq);

        assert_eq!(
            evaluate_1d(6, 2, BoundaryMode::Clip, &data),
            Err(ArgrelError::LengthMismatch { expected: 6, got: 5 })
        );
        assert_eq!(
            evaluate_1d::<i32>(0, 1, BoundaryMode::Wrap, &[]),
            Err(ArgrelError::EmptyInputData)
        );
        assert!(evaluate_1d_sequential(5, 0, BoundaryMode::Clip, &data).is_err());
    }

    #[test]
    fn test_error_messages_carry_prefix() {
        let e = ArgrelError::InvalidOrder { order: 0, data_len: 4 };
        assert_eq!(e.to_string(), "argrel: Invalid order: order = 0, data length = 4");
    }

    fn check_batch_rows_match_single(test: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data: Vec<i32> = (0..200).map(|i| ((i * 37) % 23) - ((i * 11) % 7)).collect();
        for mode in [BoundaryMode::Clip, BoundaryMode::Wrap] {
            let out = ArgrelBatchBuilder::new()
                .order_range(1, 9, 2)
                .mode(mode)
                .kernel(kernel)
                .apply_slice(&data)?;
            assert_eq!(out.rows, 5, "[{}]", test);
            assert_eq!(out.cols, data.len());
            for order in [1, 3, 5, 7, 9] {
                let single = run(&data, order, mode, Extremum::Maxima, Kernel::Scalar)?;
                let row = out.mask_for(order).expect("row missing");
                assert_eq!(row, &single[..], "[{}] order={} mode={:?}", test, order, mode);
            }
            assert!(out.mask_for(2).is_none());
        }
        Ok(())
    }

    fn check_batch_default_row(test: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 0.0];
        let out = ArgrelBatchBuilder::new().kernel(kernel).apply_slice(&data)?;
        let def = ArgrelParams::default();
        let row = out.mask_for(def.get_order()).expect("default row missing");
        assert_eq!(row.len(), data.len(), "[{}]", test);
        assert_eq!(row, &run(&data, 1, BoundaryMode::Clip, Extremum::Maxima, Kernel::Scalar)?[..]);
        Ok(())
    }

    fn check_batch_rejects_zero_order(test: &str, kernel: Kernel) -> Result<(), Box<dyn Error>> {
        let data = [1.0, 2.0, 1.0];
        let res = ArgrelBatchBuilder::new()
            .order_range(0, 2, 1)
            .kernel(kernel)
            .apply_slice(&data);
        assert!(
            matches!(res, Err(ArgrelError::InvalidOrder { order: 0, .. })),
            "[{}]",
            test
        );
        Ok(())
    }

    macro_rules! gen_batch_tests {
        ($fn_name:ident) => {
            paste::paste! {
                #[test] fn [<$fn_name _scalar>]() {
                    $fn_name(stringify!([<$fn_name _scalar>]), Kernel::Scalar).unwrap();
                }
                #[test] fn [<$fn_name _parallel>]() {
                    $fn_name(stringify!([<$fn_name _parallel>]), Kernel::Parallel).unwrap();
                }
                #[test] fn [<$fn_name _auto_detect>]() {
                    $fn_name(stringify!([<$fn_name _auto_detect>]), Kernel::Auto).unwrap();
                }
            }
        };
    }
    gen_batch_tests!(check_batch_rows_match_single);
    gen_batch_tests!(check_batch_default_row);
    gen_batch_tests!(check_batch_rejects_zero_order);

    #[cfg(feature = "proptest")]
    #[test]
    fn test_argrel_kernels_agree_property() {
        use proptest::prelude::*;

        let strat = (
            prop::collection::vec(-50i32..50, 1..300),
            1usize..64,
            prop::bool::ANY,
            prop::bool::ANY,
        );

        proptest::test_runner::TestRunner::default()
            .run(&strat, |(data, order, wrap, minima)| {
                let mode = if wrap { BoundaryMode::Wrap } else { BoundaryMode::Clip };
                let extremum = if minima { Extremum::Minima } else { Extremum::Maxima };

                let mut seq = vec![false; data.len()];
                let mut par = vec![false; data.len()];
                argrel_scalar(&data, order, mode, extremum, &mut seq);
                argrel_par(&data, order, mode, extremum, &mut par);
                prop_assert_eq!(&seq, &par);

                // a flagged maximum beats its immediate clipped neighbors
                if extremum == Extremum::Maxima && mode == BoundaryMode::Clip {
                    for (i, &m) in seq.iter().enumerate() {
                        if m {
                            prop_assert!(i + 1 < data.len());
                            prop_assert!(data[i] > data[i + 1]);
                            if i > 0 {
                                prop_assert!(data[i] >= data[i - 1]);
                            }
                        }
                    }
                }
                Ok(())
            })
            .unwrap();
    }
}
