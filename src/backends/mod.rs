//! Lane-vector backends for different SIMD instruction sets
//!
//! Kernels are written once against the [`LaneVector`] trait. Each backend
//! provides a 4-lane `f32` vector type backed by its native register.
//!
//! # Safety
//!
//! All `unsafe` code is isolated within the backend `load`/`store`
//! implementations. Arithmetic on lane vectors is safe.
//!
//! # Backends
//!
//! - `scalar`: Portable baseline implementation (`[f32; 4]`, no SIMD)
//! - `sse2`: x86_64 baseline SIMD (128-bit)
//! - `neon`: ARM SIMD (128-bit)
//! - `wasm`: WebAssembly SIMD128

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod sse2;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub mod neon;

#[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
pub mod wasm;

use crate::Backend;

pub use scalar::ScalarF32x4;

/// Native 4-lane `f32` vector for the build target
#[cfg(target_arch = "x86_64")]
pub type NativeF32x4 = sse2::Sse2F32x4;

/// Native 4-lane `f32` vector for the build target
#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub type NativeF32x4 = neon::NeonF32x4;

/// Native 4-lane `f32` vector for the build target
#[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
pub type NativeF32x4 = wasm::WasmF32x4;

/// Native 4-lane `f32` vector for the build target
#[cfg(not(any(
    target_arch = "x86_64",
    all(target_arch = "aarch64", target_feature = "neon"),
    all(target_arch = "wasm32", target_feature = "simd128")
)))]
pub type NativeF32x4 = scalar::ScalarF32x4;

/// Fixed-width vector of `LANES` elements of type `Elem`
///
/// Every backend must produce the same per-lane results as [`ScalarF32x4`]
/// for finite inputs. NaN handling in `min`/`max` follows the hardware
/// instruction and is not specified.
pub trait LaneVector: Copy + Send + Sync + 'static {
    /// Element type held in each lane
    type Elem: Copy + Send + Sync;

    /// Number of lanes
    const LANES: usize;

    /// Backend this lane type belongs to
    const BACKEND: Backend;

    /// Broadcast `value` to every lane
    fn splat(value: Self::Elem) -> Self;

    /// Load `LANES` consecutive elements
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANES` elements. No alignment is required.
    unsafe fn load(ptr: *const Self::Elem) -> Self;

    /// Store all lanes to `LANES` consecutive elements
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `LANES` elements. No alignment is required.
    unsafe fn store(self, ptr: *mut Self::Elem);

    /// Lane-wise addition
    fn add(self, rhs: Self) -> Self;

    /// Lane-wise multiplication
    fn mul(self, rhs: Self) -> Self;

    /// Lane-wise minimum
    fn min(self, rhs: Self) -> Self;

    /// Lane-wise maximum
    fn max(self, rhs: Self) -> Self;

    /// Horizontal minimum across all lanes
    fn reduce_min(self) -> Self::Elem;

    /// Horizontal maximum across all lanes
    fn reduce_max(self) -> Self::Elem;

    /// Load from the front of a slice
    ///
    /// # Panics
    ///
    /// Panics if `src` holds fewer than `LANES` elements.
    #[inline]
    fn from_slice(src: &[Self::Elem]) -> Self {
        assert!(src.len() >= Self::LANES, "slice shorter than lane width");
        // SAFETY: length checked above
        unsafe { Self::load(src.as_ptr()) }
    }

    /// Store to the front of a slice
    ///
    /// # Panics
    ///
    /// Panics if `dst` holds fewer than `LANES` elements.
    #[inline]
    fn write_to_slice(self, dst: &mut [Self::Elem]) {
        assert!(dst.len() >= Self::LANES, "slice shorter than lane width");
        // SAFETY: length checked above
        unsafe { self.store(dst.as_mut_ptr()) }
    }
}
