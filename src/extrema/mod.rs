pub mod argrel;
pub use argrel::{
    argrel, argrel_batch_par_slice, argrel_batch_slice, argrel_batch_with_kernel,
    argrel_into_slice, argrel_with_kernel, evaluate_1d, evaluate_1d_sequential, ArgrelBatchBuilder,
    ArgrelBatchOutput, ArgrelBatchRange, ArgrelBuilder, ArgrelError, ArgrelInput, ArgrelOutput,
    ArgrelParams,
};
pub mod argrel_2d;
pub use argrel_2d::{
    argrel_2d, argrel_2d_batch_with_kernel, argrel_2d_into_slice, argrel_2d_with_kernel,
    evaluate_2d, evaluate_2d_sequential, Argrel2dBatchBuilder, Argrel2dBatchOutput,
    Argrel2dBatchRange, Argrel2dBuilder, Argrel2dError, Argrel2dInput, Argrel2dOutput,
    Argrel2dParams,
};
