//! Validated kernel entry point with backend dispatch

use std::time::Duration;

use tracing::trace;

use crate::backends::{NativeF32x4, ScalarF32x4};
use crate::elementwise::{add_with, scale_with, ElementwiseVariant};
use crate::reduce::{min_max_with, partitioned_lanes_phased, MinMax, ReduceStrategy};
use crate::{partition, Backend, KernelError, Result};

/// Kernel front-end bound to one lane backend
///
/// Checks operand lengths, then dispatches to the scalar or native lane type.
///
/// # Examples
///
/// ```
/// use lanework::{Backend, ElementwiseVariant, Kernels};
///
/// let kernels = Kernels::with_backend(Backend::Scalar).unwrap();
/// let doubled = kernels
///     .scale_vec(&[1.0, 2.0, 3.0], 2.0, ElementwiseVariant::ParallelVectorized)
///     .unwrap();
/// assert_eq!(doubled, vec![2.0, 4.0, 6.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernels {
    backend: Backend,
}

impl Default for Kernels {
    fn default() -> Self {
        Self::new()
    }
}

/// Call a generic kernel with the lane type matching `$backend`
macro_rules! dispatch {
    ($backend:expr, $f:ident :: <_> ( $($arg:expr),* $(,)? )) => {
        match $backend {
            Backend::Scalar => $f::<ScalarF32x4>($($arg),*),
            _ => $f::<NativeF32x4>($($arg),*),
        }
    };
}

impl Kernels {
    /// Kernels on the best backend for this build
    pub fn new() -> Self {
        Self {
            backend: crate::select_best_available_backend(),
        }
    }

    /// Kernels on a specific backend (`Auto` resolves to the best one)
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::UnsupportedBackend`] if `backend` is not
    /// compiled for this target.
    pub fn with_backend(backend: Backend) -> Result<Self> {
        let backend = backend.resolve();
        if !backend.is_available() {
            return Err(KernelError::UnsupportedBackend(backend));
        }
        Ok(Self { backend })
    }

    /// Backend in use
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// `out[i] = a[i] + b[i]`
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::SizeMismatch`] if `b` or `out` differ in length from `a`.
    pub fn add(
        &self,
        a: &[f32],
        b: &[f32],
        out: &mut [f32],
        variant: ElementwiseVariant,
    ) -> Result<()> {
        check_len(a.len(), b.len())?;
        check_len(a.len(), out.len())?;
        trace!(len = a.len(), ?variant, backend = %self.backend, "add");
        dispatch!(self.backend, add_with::<_>(variant, a, b, out));
        Ok(())
    }

    /// `a + b` into a new vector
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::SizeMismatch`] if `a` and `b` differ in length.
    pub fn add_vec(&self, a: &[f32], b: &[f32], variant: ElementwiseVariant) -> Result<Vec<f32>> {
        let mut out = vec![0.0; a.len()];
        self.add(a, b, &mut out, variant)?;
        Ok(out)
    }

    /// `out[i] = a[i] * factor`
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::SizeMismatch`] if `out` differs in length from `a`.
    pub fn scale(
        &self,
        a: &[f32],
        factor: f32,
        out: &mut [f32],
        variant: ElementwiseVariant,
    ) -> Result<()> {
        check_len(a.len(), out.len())?;
        trace!(len = a.len(), factor, ?variant, backend = %self.backend, "scale");
        dispatch!(self.backend, scale_with::<_>(variant, a, factor, out));
        Ok(())
    }

    /// `a * factor` into a new vector
    ///
    /// # Errors
    ///
    /// Does not fail in practice: the output is allocated with `a.len()`
    /// elements, so the length check in [`Kernels::scale`] always passes.
    pub fn scale_vec(
        &self,
        a: &[f32],
        factor: f32,
        variant: ElementwiseVariant,
    ) -> Result<Vec<f32>> {
        let mut out = vec![0.0; a.len()];
        self.scale(a, factor, &mut out, variant)?;
        Ok(out)
    }

    /// Minimum and maximum of `data`
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::EmptyInput`] if `data` is empty.
    pub fn min_max(&self, data: &[f32], strategy: ReduceStrategy) -> Result<MinMax> {
        if data.is_empty() {
            return Err(KernelError::EmptyInput);
        }
        trace!(len = data.len(), ?strategy, backend = %self.backend, "min_max");
        Ok(dispatch!(self.backend, min_max_with::<_>(strategy, data)))
    }

    /// Partitioned lane reduction, also returning the parallel-phase time
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::EmptyInput`] if `data` is empty.
    pub fn min_max_phased(&self, data: &[f32]) -> Result<(MinMax, Duration)> {
        if data.is_empty() {
            return Err(KernelError::EmptyInput);
        }
        let parts = partition::default_parts();
        trace!(len = data.len(), parts, backend = %self.backend, "min_max_phased");
        Ok(dispatch!(
            self.backend,
            partitioned_lanes_phased::<_>(data, parts)
        ))
    }
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(KernelError::SizeMismatch { expected, actual });
    }
    Ok(())
}
