//! Benchmark run configuration
//!
//! # Examples
//!
//! ```
//! use lanework::{Backend, BenchConfig};
//!
//! // Defaults: 4M elements, ambient thread pool
//! let config = BenchConfig::default();
//! assert_eq!(config.len, 4_000_000);
//! assert_eq!(config.threads, None);
//!
//! // Builder
//! let custom = BenchConfig::new()
//!     .with_len(1 << 16)
//!     .with_seed(7)
//!     .with_threads(2)
//!     .with_repeats(5)
//!     .with_backend(Backend::Scalar)
//!     .build();
//! assert!(custom.validate().is_ok());
//! ```

use crate::{Backend, KernelError, Result};

/// Environment variable overriding [`BenchConfig::len`]
pub const ENV_LEN: &str = "LANEWORK_LEN";
/// Environment variable overriding [`BenchConfig::seed`]
pub const ENV_SEED: &str = "LANEWORK_SEED";
/// Environment variable overriding [`BenchConfig::threads`]
pub const ENV_THREADS: &str = "LANEWORK_THREADS";
/// Environment variable overriding [`BenchConfig::repeats`]
pub const ENV_REPEATS: &str = "LANEWORK_REPEATS";

/// Settings for one benchmark run
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Array length
    pub len: usize,
    /// Seed for input generation
    pub seed: u64,
    /// Worker threads; `None` uses the ambient rayon pool (`RAYON_NUM_THREADS`)
    pub threads: Option<usize>,
    /// Timed calls per variant, fastest is reported
    pub repeats: usize,
    /// Lane backend for vectorized variants
    pub backend: Backend,
    /// Constant for the scaled-copy experiment
    pub scale_factor: f32,
    /// Also run the unsynchronized min/max fixture
    pub include_racy: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            len: 4_000_000,
            seed: 42,
            threads: None,
            repeats: 1,
            backend: Backend::Auto,
            scale_factor: 2.0,
            include_racy: false,
        }
    }
}

impl BenchConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Small preset for smoke tests and CI (64K elements)
    pub fn quick() -> Self {
        Self::new().with_len(1 << 16)
    }

    /// Set array length
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    /// Set input seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Use a dedicated pool of `threads` workers
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set timed calls per variant
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    /// Set lane backend
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set scaled-copy constant
    pub fn with_scale_factor(mut self, factor: f32) -> Self {
        self.scale_factor = factor;
        self
    }

    /// Enable/disable the unsynchronized min/max fixture
    pub fn with_racy(mut self, enabled: bool) -> Self {
        self.include_racy = enabled;
        self
    }

    /// Finalize configuration (no-op, for builder pattern consistency)
    pub fn build(self) -> Self {
        self
    }

    /// Check the configuration can be run
    ///
    /// # Errors
    ///
    /// [`KernelError::InvalidConfig`] for a zero length, zero repeats, zero
    /// threads or a non-finite scale factor; [`KernelError::UnsupportedBackend`]
    /// for a backend not compiled for this target.
    pub fn validate(&self) -> Result<()> {
        if self.len == 0 {
            return Err(KernelError::InvalidConfig("len must be > 0".to_string()));
        }
        if self.repeats == 0 {
            return Err(KernelError::InvalidConfig(
                "repeats must be > 0".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(KernelError::InvalidConfig(
                "threads must be > 0".to_string(),
            ));
        }
        if !self.scale_factor.is_finite() {
            return Err(KernelError::InvalidConfig(
                "scale factor must be finite".to_string(),
            ));
        }
        if !self.backend.is_available() {
            return Err(KernelError::UnsupportedBackend(self.backend));
        }
        Ok(())
    }

    /// Defaults overlaid with `LANEWORK_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new().with_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup` (an environment-like source)
    ///
    /// # Errors
    ///
    /// [`KernelError::InvalidConfig`] if a present value does not parse.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(len) = parse_var(&lookup, ENV_LEN)? {
            self.len = len;
        }
        if let Some(seed) = parse_var(&lookup, ENV_SEED)? {
            self.seed = seed;
        }
        if let Some(threads) = parse_var(&lookup, ENV_THREADS)? {
            self.threads = Some(threads);
        }
        if let Some(repeats) = parse_var(&lookup, ENV_REPEATS)? {
            self.repeats = repeats;
        }
        Ok(self)
    }

    /// Dedicated pool when `threads` is set, `None` for the ambient pool
    ///
    /// # Errors
    ///
    /// [`KernelError::ThreadPool`] if rayon fails to spawn the workers.
    pub fn thread_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        self.threads
            .map(|n| {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("lanework-{i}"))
                    .build()
                    .map_err(|e| KernelError::ThreadPool(e.to_string()))
            })
            .transpose()
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .replace('_', "")
            .parse()
            .map(Some)
            .map_err(|_| {
                KernelError::InvalidConfig(format!("{key}={raw:?} is not a valid number"))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.len, 4_000_000);
        assert_eq!(config.seed, 42);
        assert_eq!(config.threads, None);
        assert_eq!(config.repeats, 1);
        assert_eq!(config.backend, Backend::Auto);
        assert_eq!(config.scale_factor, 2.0);
        assert!(!config.include_racy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = BenchConfig::new()
            .with_len(1024)
            .with_seed(9)
            .with_threads(3)
            .with_repeats(2)
            .with_backend(Backend::Scalar)
            .with_scale_factor(0.5)
            .with_racy(true)
            .build();

        assert_eq!(config.len, 1024);
        assert_eq!(config.seed, 9);
        assert_eq!(config.threads, Some(3));
        assert_eq!(config.repeats, 2);
        assert_eq!(config.backend, Backend::Scalar);
        assert_eq!(config.scale_factor, 0.5);
        assert!(config.include_racy);
    }

    #[test]
    fn test_quick_preset() {
        assert_eq!(BenchConfig::quick().len, 65_536);
    }

    #[test]
    fn test_validate_rejects_zero_len() {
        let err = BenchConfig::new().with_len(0).validate().unwrap_err();
        assert_eq!(err, KernelError::InvalidConfig("len must be > 0".to_string()));
    }

    #[test]
    fn test_validate_rejects_zero_repeats_and_threads() {
        assert!(BenchConfig::new().with_repeats(0).validate().is_err());
        assert!(BenchConfig::new().with_threads(0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_factor() {
        assert!(BenchConfig::new()
            .with_scale_factor(f32::NAN)
            .validate()
            .is_err());
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_validate_rejects_foreign_backend() {
        let err = BenchConfig::new()
            .with_backend(Backend::NEON)
            .validate()
            .unwrap_err();
        assert_eq!(err, KernelError::UnsupportedBackend(Backend::NEON));
    }

    #[test]
    fn test_env_overrides() {
        let config = BenchConfig::new()
            .with_env(env(&[
                (ENV_LEN, "1_000"),
                (ENV_SEED, "5"),
                (ENV_THREADS, " 2 "),
                (ENV_REPEATS, "3"),
            ]))
            .unwrap();
        assert_eq!(config.len, 1000);
        assert_eq!(config.seed, 5);
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.repeats, 3);
    }

    #[test]
    fn test_env_absent_keeps_defaults() {
        let config = BenchConfig::new().with_env(env(&[])).unwrap();
        assert_eq!(config, BenchConfig::default());
    }

    #[test]
    fn test_env_rejects_garbage() {
        let err = BenchConfig::new()
            .with_env(env(&[(ENV_LEN, "lots")]))
            .unwrap_err();
        assert!(matches!(err, KernelError::InvalidConfig(msg) if msg.contains(ENV_LEN)));
    }

    #[test]
    fn test_thread_pool() {
        assert!(BenchConfig::new().thread_pool().unwrap().is_none());

        let pool = BenchConfig::new().with_threads(2).thread_pool().unwrap().unwrap();
        assert_eq!(pool.current_num_threads(), 2);
        assert_eq!(pool.install(crate::partition::default_parts), 2);
    }
}
