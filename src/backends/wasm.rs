//! WebAssembly SIMD128 lane backend
//!
//! This backend uses WebAssembly SIMD128 intrinsics for 128-bit SIMD operations.
//! SIMD128 is supported in modern browsers and wasm runtimes; the module is
//! only compiled when the target enables `simd128`.

use std::arch::wasm32::*;

use super::LaneVector;
use crate::Backend;

/// WebAssembly SIMD128 4-lane vector
#[derive(Debug, Clone, Copy)]
pub struct WasmF32x4(v128);

impl LaneVector for WasmF32x4 {
    type Elem = f32;
    const LANES: usize = 4;
    const BACKEND: Backend = Backend::WasmSIMD;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self(f32x4_splat(value))
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        Self(v128_load(ptr as *const v128))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        v128_store(ptr as *mut v128, self.0);
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(f32x4_add(self.0, rhs.0))
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(f32x4_mul(self.0, rhs.0))
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(f32x4_min(self.0, rhs.0))
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self(f32x4_max(self.0, rhs.0))
    }

    #[inline(always)]
    fn reduce_min(self) -> f32 {
        let v = self.0;
        let lo = f32x4_extract_lane::<0>(v).min(f32x4_extract_lane::<1>(v));
        let hi = f32x4_extract_lane::<2>(v).min(f32x4_extract_lane::<3>(v));
        lo.min(hi)
    }

    #[inline(always)]
    fn reduce_max(self) -> f32 {
        let v = self.0;
        let lo = f32x4_extract_lane::<0>(v).max(f32x4_extract_lane::<1>(v));
        let hi = f32x4_extract_lane::<2>(v).max(f32x4_extract_lane::<3>(v));
        lo.max(hi)
    }
}
