//! SSE2 lane backend (x86_64 baseline SIMD)
//!
//! This backend uses SSE2 intrinsics for 128-bit SIMD operations.
//! SSE2 is available on all x86_64 CPUs as a baseline requirement, so no
//! runtime feature detection is needed.
//!
//! # Performance
//!
//! Expected speedup: up to 4x for f32 kernels (4 elements per register),
//! less for memory-bound loops.
//!
//! # Safety
//!
//! Loads and stores use the unaligned forms (`_mm_loadu_ps`, `_mm_storeu_ps`).

use std::arch::x86_64::*;

use super::LaneVector;
use crate::Backend;

/// SSE2 4-lane vector (128-bit)
#[derive(Debug, Clone, Copy)]
pub struct Sse2F32x4(__m128);

impl LaneVector for Sse2F32x4 {
    type Elem = f32;
    const LANES: usize = 4;
    const BACKEND: Backend = Backend::SSE2;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        // SAFETY: SSE2 is part of the x86_64 baseline
        Self(unsafe { _mm_set1_ps(value) })
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        Self(_mm_loadu_ps(ptr))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        _mm_storeu_ps(ptr, self.0);
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is part of the x86_64 baseline
        Self(unsafe { _mm_add_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is part of the x86_64 baseline
        Self(unsafe { _mm_mul_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is part of the x86_64 baseline
        Self(unsafe { _mm_min_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is part of the x86_64 baseline
        Self(unsafe { _mm_max_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn reduce_min(self) -> f32 {
        // SAFETY: SSE2 is part of the x86_64 baseline
        unsafe {
            // [a, b, c, d] -> [min(a,c), min(b,d), ..] -> min of the two
            let hi = _mm_movehl_ps(self.0, self.0);
            let m2 = _mm_min_ps(self.0, hi);
            let shuf = _mm_shuffle_ps::<0b01>(m2, m2);
            _mm_cvtss_f32(_mm_min_ss(m2, shuf))
        }
    }

    #[inline(always)]
    fn reduce_max(self) -> f32 {
        // SAFETY: SSE2 is part of the x86_64 baseline
        unsafe {
            let hi = _mm_movehl_ps(self.0, self.0);
            let m2 = _mm_max_ps(self.0, hi);
            let shuf = _mm_shuffle_ps::<0b01>(m2, m2);
            _mm_cvtss_f32(_mm_max_ss(m2, shuf))
        }
    }
}
