//! Scoped wall-clock timing
//!
//! [`measure`] runs a closure and returns its value together with a
//! [`Timing`] record instead of printing as a side effect. Rendering is left
//! to [`crate::output`].
//!
//! # Examples
//!
//! ```
//! use lanework::timing::measure;
//!
//! let (sum, timing) = measure("sum", || (0..1000u64).sum::<u64>());
//! assert_eq!(sum, 499_500);
//! assert_eq!(timing.label, "sum");
//! ```

use std::fmt;
use std::time::{Duration, Instant};

/// Elapsed wall-clock time of one labelled call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    /// What was timed
    pub label: String,
    /// Wall-clock duration
    pub elapsed: Duration,
}

impl Timing {
    /// Elapsed time in seconds
    pub fn secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// `<elapsed_seconds>    <label>`, six decimals
impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}    {}", self.secs(), self.label)
    }
}

/// Time a single call
pub fn measure<T>(label: impl Into<String>, f: impl FnOnce() -> T) -> (T, Timing) {
    let start = Instant::now();
    let value = f();
    let elapsed = start.elapsed();
    (
        value,
        Timing {
            label: label.into(),
            elapsed,
        },
    )
}

/// Time `repeats` calls and keep the fastest
///
/// Returns the value and timing of the fastest call. `repeats == 0` is
/// treated as 1.
pub fn measure_best<T>(
    label: impl Into<String>,
    repeats: usize,
    mut f: impl FnMut() -> T,
) -> (T, Timing) {
    let label = label.into();
    let mut best = measure(label.clone(), &mut f);
    for _ in 1..repeats.max(1) {
        let run = measure(label.clone(), &mut f);
        if run.1.elapsed < best.1.elapsed {
            best = run;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_returns_value_and_label() {
        let (v, t) = measure("answer", || 42);
        assert_eq!(v, 42);
        assert_eq!(t.label, "answer");
    }

    #[test]
    fn test_measure_covers_the_call() {
        let (_, t) = measure("sleep", || std::thread::sleep(Duration::from_millis(5)));
        assert!(t.elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn test_display_format() {
        let t = Timing {
            label: "add::vectorized".to_string(),
            elapsed: Duration::from_micros(1500),
        };
        assert_eq!(t.to_string(), "0.001500    add::vectorized");
    }

    #[test]
    fn test_measure_best_runs_repeats() {
        let mut calls = 0;
        let (_, t) = measure_best("count", 4, || calls += 1);
        assert_eq!(calls, 4);
        assert_eq!(t.label, "count");
    }

    #[test]
    fn test_measure_best_keeps_fastest_value() {
        let mut calls = 0;
        let (value, t) = measure_best("slow-first", 3, || {
            calls += 1;
            if calls == 1 {
                std::thread::sleep(Duration::from_millis(30));
            }
            calls
        });
        assert_ne!(value, 1);
        assert!(t.elapsed < Duration::from_millis(30));
    }

    #[test]
    fn test_measure_best_zero_repeats_runs_once() {
        let mut calls = 0;
        let _ = measure_best("once", 0, || calls += 1);
        assert_eq!(calls, 1);
    }
}
