/// Element types the extrema kernels run over.
///
/// Only ordering is needed. Floats are allowed even though they are not
/// totally ordered: every comparison against NaN is false, so any window
/// that touches a NaN is never flagged.
pub trait Sample: Copy + PartialOrd + Send + Sync + std::fmt::Debug + 'static {}

macro_rules! impl_sample {
    ($($t:ty),* $(,)?) => {
        $(impl Sample for $t {})*
    };
}

impl_sample!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize, f32, f64);
