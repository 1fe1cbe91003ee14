use std::sync::OnceLock;
use crate::utilities::enums::Kernel;

static BEST_KERNEL : OnceLock<Kernel> = OnceLock::new();

#[inline(always)]
pub fn detect_best_kernel() -> Kernel {
    *BEST_KERNEL.get_or_init(|| {
        let k = if cfg!(target_arch = "wasm32") {
            Kernel::Scalar
        } else {
            Kernel::Parallel
        };
        log::debug!("auto kernel resolved to {:?}", k);
        k
    })
}

#[inline(always)]
pub fn resolve_kernel(kernel: Kernel) -> Kernel {
    match kernel {
        Kernel::Auto => detect_best_kernel(),
        other        => other,
    }
}

/// Expands an inclusive `(start, end, step)` sweep. A zero step or equal bounds
/// yields the single value `start`; a descending range walks down from `start`.
pub fn expand_usize_range((start, end, step): (usize, usize, usize)) -> Option<Vec<usize>> {
    if step == 0 || start == end {
        return Some(vec![start]);
    }
    let mut out = Vec::new();
    if start < end {
        let mut v = start;
        while v <= end {
            out.push(v);
            match v.checked_add(step) {
                Some(next) => v = next,
                None       => break,
            }
        }
    } else {
        let mut v = start;
        loop {
            if v < end {
                break;
            }
            out.push(v);
            match v.checked_sub(step) {
                Some(next) => v = next,
                None       => break,
            }
        }
    }
    if out.is_empty() { None } else { Some(out) }
}
