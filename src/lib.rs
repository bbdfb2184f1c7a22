//! lanework: scalar, SIMD and multi-threaded array kernels
//!
//! **lanework** compares three ways of running the same primitive array
//! operation over `f32` data:
//!
//! 1. **Scalar** - a plain loop, used as the reference
//! 2. **SIMD** - 4-lane vector loops (SSE2, NEON, WASM SIMD128) with a scalar tail
//! 3. **Multi-threaded** - fork-join over the rayon pool, with or without SIMD
//!
//! for three operations: element-wise addition, scaled copy and min/max
//! reduction.
//!
//! # Design Principles
//!
//! - **One lane abstraction**: kernels are written once against [`backends::LaneVector`]
//! - **Build-time backends**: the native 4-lane type is chosen per target architecture
//! - **Explicit partitioning**: parallel reductions return task-local partials that are
//!   merged after the join
//! - **Safe public API**: `unsafe` is isolated in the backends and the lane loops
//!
//! # Quick Start
//!
//! ```rust
//! use lanework::{ElementwiseVariant, Kernels, ReduceStrategy};
//!
//! let kernels = Kernels::new();
//! let a = [3.0, -1.0, 7.0, 2.0];
//! let b = [1.0, 1.0, 1.0, 1.0];
//!
//! let mut out = [0.0; 4];
//! kernels.add(&a, &b, &mut out, ElementwiseVariant::Vectorized).unwrap();
//! assert_eq!(out, [4.0, 0.0, 8.0, 3.0]);
//!
//! let extremes = kernels.min_max(&a, ReduceStrategy::PartitionedVectorized).unwrap();
//! assert_eq!((extremes.min, extremes.max), (-1.0, 7.0));
//! ```

pub mod backends;
pub mod config;
pub mod data;
pub mod elementwise;
pub mod error;
pub mod kernels;
pub mod output;
pub mod partition;
pub mod race;
pub mod reduce;
pub mod suite;
pub mod timing;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub use config::BenchConfig;
pub use elementwise::ElementwiseVariant;
pub use error::{KernelError, Result};
pub use kernels::Kernels;
pub use reduce::{MinMax, ReduceStrategy};
pub use timing::Timing;

/// Number of `f32` elements processed per vector operation
pub const LANE_WIDTH: usize = 4;

/// Backend execution target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Scalar lanes (no SIMD)
    Scalar,
    /// SSE2 (x86_64 baseline, 128-bit)
    SSE2,
    /// ARM NEON (128-bit)
    NEON,
    /// WebAssembly SIMD128
    #[serde(rename = "wasm-simd")]
    WasmSIMD,
    /// Auto-select best available
    Auto,
}

impl Backend {
    /// Resolve `Auto` to a concrete backend, leaving other values untouched
    pub fn resolve(self) -> Self {
        match self {
            Backend::Auto => select_best_available_backend(),
            other => other,
        }
    }

    /// Whether kernels can run on this backend in the current build
    pub fn is_available(self) -> bool {
        match self {
            Backend::Scalar | Backend::Auto => true,
            other => other == select_best_available_backend(),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Scalar => "scalar",
            Backend::SSE2 => "sse2",
            Backend::NEON => "neon",
            Backend::WasmSIMD => "wasm-simd",
            Backend::Auto => "auto",
        };
        f.write_str(name)
    }
}

impl FromStr for Backend {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(Backend::Scalar),
            "sse2" => Ok(Backend::SSE2),
            "neon" => Ok(Backend::NEON),
            "wasm-simd" | "wasm" | "simd128" => Ok(Backend::WasmSIMD),
            "auto" => Ok(Backend::Auto),
            other => Err(KernelError::InvalidConfig(format!(
                "unknown backend '{other}'"
            ))),
        }
    }
}

/// Detect best SIMD backend for x86_64 platforms
#[cfg(target_arch = "x86_64")]
fn detect_x86_backend() -> Backend {
    // SSE2 is part of the x86_64 baseline, so the 4-lane type is always native
    Backend::SSE2
}

/// Detect best SIMD backend for ARM platforms
#[cfg(target_arch = "aarch64")]
fn detect_arm_backend() -> Backend {
    #[cfg(target_feature = "neon")]
    {
        Backend::NEON
    }
    #[cfg(not(target_feature = "neon"))]
    {
        Backend::Scalar
    }
}

/// Detect best SIMD backend for WebAssembly
#[cfg(target_arch = "wasm32")]
fn detect_wasm_backend() -> Backend {
    #[cfg(target_feature = "simd128")]
    {
        Backend::WasmSIMD
    }
    #[cfg(not(target_feature = "simd128"))]
    {
        Backend::Scalar
    }
}

/// Select the best available backend for the current platform
///
/// The choice matches the lane type compiled in as
/// [`backends::NativeF32x4`]:
///
/// - **x86_64**: SSE2
/// - **aarch64**: NEON (if the target enables it)
/// - **wasm32**: SIMD128 (if the target enables it)
/// - **Other platforms**: Scalar
///
/// # Examples
///
/// ```
/// use lanework::select_best_available_backend;
///
/// let backend = select_best_available_backend();
/// println!("Using backend: {:?}", backend);
/// ```
pub fn select_best_available_backend() -> Backend {
    #[cfg(target_arch = "x86_64")]
    {
        detect_x86_backend()
    }

    #[cfg(target_arch = "aarch64")]
    {
        detect_arm_backend()
    }

    #[cfg(target_arch = "wasm32")]
    {
        detect_wasm_backend()
    }

    #[cfg(not(any(
        target_arch = "x86_64",
        target_arch = "aarch64",
        target_arch = "wasm32"
    )))]
    {
        Backend::Scalar
    }
}
