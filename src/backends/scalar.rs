//! Scalar (non-SIMD) lane backend
//!
//! This is the portable baseline implementation that works on all platforms.
//! A "vector" is a plain `[f32; 4]` and every operation is a loop over lanes.
//!
//! # Performance
//!
//! This backend provides the correctness reference. The compiler may still
//! auto-vectorize the lane loops.

use super::LaneVector;
use crate::Backend;

/// Scalar 4-lane vector (portable, no SIMD)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarF32x4(pub [f32; 4]);

impl ScalarF32x4 {
    #[inline(always)]
    fn zip_with(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut out = [0.0; 4];
        for (o, (&a, &b)) in out.iter_mut().zip(self.0.iter().zip(rhs.0.iter())) {
            *o = f(a, b);
        }
        Self(out)
    }
}

impl LaneVector for ScalarF32x4 {
    type Elem = f32;
    const LANES: usize = 4;
    const BACKEND: Backend = Backend::Scalar;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self([value; 4])
    }

    // SAFETY: caller guarantees `ptr` is valid for 4 reads;
    // `read_unaligned` places no alignment requirement on it.
    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        Self(ptr.cast::<[f32; 4]>().read_unaligned())
    }

    // SAFETY: caller guarantees `ptr` is valid for 4 writes.
    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        ptr.cast::<[f32; 4]>().write_unaligned(self.0);
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a * b)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        self.zip_with(rhs, f32::min)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        self.zip_with(rhs, f32::max)
    }

    // Pairwise, same shape as the SIMD horizontal reductions
    #[inline(always)]
    fn reduce_min(self) -> f32 {
        let [a, b, c, d] = self.0;
        a.min(b).min(c.min(d))
    }

    #[inline(always)]
    fn reduce_max(self) -> f32 {
        let [a, b, c, d] = self.0;
        a.max(b).max(c.max(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store_unaligned() {
        let data = [0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0];
        // Offset by one element to break 16-byte alignment
        let v = unsafe { ScalarF32x4::load(data.as_ptr().add(1)) };
        assert_eq!(v.0, [1.0, 2.0, 3.0, 4.0]);

        let mut out = [0.0f32; 6];
        unsafe { v.store(out.as_mut_ptr().add(2)) };
        assert_eq!(out, [0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_splat() {
        assert_eq!(ScalarF32x4::splat(2.5).0, [2.5; 4]);
    }

    #[test]
    fn test_min_max_ignore_nan_lane() {
        // f32::min/max return the non-NaN operand
        let a = ScalarF32x4([f32::NAN, 1.0, 2.0, 3.0]);
        let b = ScalarF32x4::splat(0.0);
        assert_eq!(a.max(b).0, [0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_reduce_infinities() {
        let v = ScalarF32x4([f32::NEG_INFINITY, 0.0, f32::INFINITY, 1.0]);
        assert_eq!(v.reduce_min(), f32::NEG_INFINITY);
        assert_eq!(v.reduce_max(), f32::INFINITY);
    }
}
