//! Benchmark experiments
//!
//! Each [`Experiment`] generates seeded input, runs every kernel variant of
//! one operation under [`timing::measure_best`], checks each result against
//! the scalar reference, and returns a [`Report`]. Nothing is printed here;
//! see [`crate::output`].

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::elementwise::{self, ElementwiseVariant};
use crate::reduce::{self, MinMax, ReduceStrategy};
use crate::timing::{self, Timing};
use crate::{data, partition, race, BenchConfig, Kernels, Result};

/// Operation under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Experiment {
    /// `c[i] = a[i] + b[i]`
    Add,
    /// `b[i] = a[i] * factor`
    Scale,
    /// min and max of `a`
    MinMax,
}

impl Experiment {
    /// All experiments, in run order
    pub const ALL: [Experiment; 3] = [Experiment::Add, Experiment::Scale, Experiment::MinMax];

    /// Short name used in labels
    pub fn name(self) -> &'static str {
        match self {
            Experiment::Add => "add",
            Experiment::Scale => "scale",
            Experiment::MinMax => "min_max",
        }
    }
}

/// One timed variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// `<experiment>::<variant>`
    pub label: String,
    /// Fastest wall-clock time over the configured repeats, in seconds
    pub elapsed_secs: f64,
    /// Reduction result (min-max experiment only)
    pub result: Option<MinMax>,
    /// Output matched the scalar reference
    pub verified: bool,
    /// Time spent in the parallel phase before the merge (partitioned lanes only)
    pub parallel_secs: Option<f64>,
    /// Unsynchronized fixture; excluded from [`Report::all_verified`]
    pub racy: bool,
}

impl Record {
    fn new(timing: Timing, result: Option<MinMax>, verified: bool) -> Self {
        Self {
            elapsed_secs: timing.secs(),
            label: timing.label,
            result,
            verified,
            parallel_secs: None,
            racy: false,
        }
    }

    fn with_parallel_secs(mut self, secs: f64) -> Self {
        self.parallel_secs = Some(secs);
        self
    }

    fn racy(mut self) -> Self {
        self.racy = true;
        self
    }
}

/// Outcome of one experiment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Operation under test
    pub experiment: Experiment,
    /// Lane backend used by vectorized variants
    pub backend: crate::Backend,
    /// Array length
    pub len: usize,
    /// Workers in the pool the experiment ran on
    pub threads: usize,
    /// Sequential reference (min-max experiment only)
    pub reference: Option<MinMax>,
    /// One entry per variant, in run order
    pub records: Vec<Record>,
}

impl Report {
    /// True when every non-racy variant matched the reference
    pub fn all_verified(&self) -> bool {
        self.records
            .iter()
            .filter(|r| !r.racy)
            .all(|r| r.verified)
    }
}

/// Run one experiment
///
/// Runs on a dedicated pool when `config.threads` is set, otherwise on the
/// ambient rayon pool.
///
/// # Errors
///
/// Configuration errors from [`BenchConfig::validate`], backend errors from
/// [`Kernels::with_backend`], and pool construction errors.
#[instrument(skip(config), fields(len = config.len, seed = config.seed))]
pub fn run(experiment: Experiment, config: &BenchConfig) -> Result<Report> {
    config.validate()?;
    let kernels = Kernels::with_backend(config.backend)?;

    let body = || match experiment {
        Experiment::Add => run_add(config, &kernels),
        Experiment::Scale => run_scale(config, &kernels),
        Experiment::MinMax => run_min_max(config, &kernels),
    };

    let report = match config.thread_pool()? {
        Some(pool) => pool.install(body)?,
        None => body()?,
    };

    info!(
        experiment = experiment.name(),
        backend = %report.backend,
        threads = report.threads,
        verified = report.all_verified(),
        "experiment finished"
    );
    Ok(report)
}

/// Run every experiment in order
pub fn run_all(config: &BenchConfig) -> Result<Vec<Report>> {
    Experiment::ALL
        .iter()
        .map(|&experiment| run(experiment, config))
        .collect()
}

fn label(experiment: Experiment, variant: &str) -> String {
    format!("{}::{}", experiment.name(), variant)
}

fn empty_report(experiment: Experiment, config: &BenchConfig, kernels: &Kernels) -> Report {
    Report {
        experiment,
        backend: kernels.backend(),
        len: config.len,
        threads: partition::default_parts(),
        reference: None,
        records: Vec::new(),
    }
}

fn record(report: &mut Report, record: Record) {
    if record.verified {
        debug!(label = %record.label, secs = record.elapsed_secs, "variant verified");
    } else {
        warn!(label = %record.label, "variant output differs from reference");
    }
    report.records.push(record);
}

fn run_add(config: &BenchConfig, kernels: &Kernels) -> Result<Report> {
    let (a, b) = data::uniform_pair(config.len, config.seed);
    let mut expected = vec![0.0; config.len];
    elementwise::add_scalar(&a, &b, &mut expected);

    let mut report = empty_report(Experiment::Add, config, kernels);
    for variant in ElementwiseVariant::ALL {
        let mut out = vec![0.0; config.len];
        let (result, timing) = timing::measure_best(
            label(Experiment::Add, variant.name()),
            config.repeats,
            || kernels.add(&a, &b, &mut out, variant),
        );
        result?;
        record(&mut report, Record::new(timing, None, out == expected));
    }
    Ok(report)
}

fn run_scale(config: &BenchConfig, kernels: &Kernels) -> Result<Report> {
    let a = data::uniform(config.len, config.seed);
    let factor = config.scale_factor;
    let mut expected = vec![0.0; config.len];
    elementwise::scale_scalar(&a, factor, &mut expected);

    let mut report = empty_report(Experiment::Scale, config, kernels);
    for variant in ElementwiseVariant::ALL {
        let mut out = vec![0.0; config.len];
        let (result, timing) = timing::measure_best(
            label(Experiment::Scale, variant.name()),
            config.repeats,
            || kernels.scale(&a, factor, &mut out, variant),
        );
        result?;
        record(&mut report, Record::new(timing, None, out == expected));
    }
    Ok(report)
}

fn run_min_max(config: &BenchConfig, kernels: &Kernels) -> Result<Report> {
    let a = data::uniform(config.len, config.seed);
    let reference = reduce::sequential(&a);

    let mut report = empty_report(Experiment::MinMax, config, kernels);
    report.reference = Some(reference);

    for strategy in ReduceStrategy::ALL {
        let name = label(Experiment::MinMax, strategy.name());
        let entry = if strategy == ReduceStrategy::PartitionedVectorized {
            let (result, timing) =
                timing::measure_best(name, config.repeats, || kernels.min_max_phased(&a));
            let (result, parallel) = result?;
            Record::new(timing, Some(result), result == reference)
                .with_parallel_secs(parallel.as_secs_f64())
        } else {
            let (result, timing) =
                timing::measure_best(name, config.repeats, || kernels.min_max(&a, strategy));
            let result = result?;
            Record::new(timing, Some(result), result == reference)
        };
        record(&mut report, entry);
    }

    if config.include_racy {
        let (result, timing) = timing::measure_best(
            label(Experiment::MinMax, "unsynchronized"),
            config.repeats,
            || race::unsynchronized_min_max(&a),
        );
        let matched = result == reference;
        if !matched {
            info!(?result, ?reference, "unsynchronized fixture lost updates");
        }
        report
            .records
            .push(Record::new(timing, Some(result), matched).racy());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Backend;

    fn small() -> BenchConfig {
        BenchConfig::new().with_len(1_003).with_threads(2)
    }

    #[test]
    fn test_add_report() {
        let report = run(Experiment::Add, &small()).unwrap();
        assert_eq!(report.experiment, Experiment::Add);
        assert_eq!(report.len, 1_003);
        assert_eq!(report.threads, 2);
        assert_eq!(report.records.len(), ElementwiseVariant::ALL.len());
        assert!(report.all_verified());
        assert!(report.records.iter().all(|r| r.result.is_none()));
        assert_eq!(report.records[0].label, "add::vectorized");
    }

    #[test]
    fn test_scale_report() {
        let report = run(Experiment::Scale, &small().with_backend(Backend::Scalar)).unwrap();
        assert_eq!(report.backend, Backend::Scalar);
        assert!(report.all_verified());
    }

    #[test]
    fn test_min_max_report() {
        let report = run(Experiment::MinMax, &small().with_repeats(2)).unwrap();
        let reference = report.reference.unwrap();
        assert_eq!(report.records.len(), ReduceStrategy::ALL.len());
        for r in &report.records {
            assert_eq!(r.result, Some(reference), "{}", r.label);
        }
        assert!((0.0..1.0).contains(&reference.min));
        assert!((0.0..1.0).contains(&reference.max));
    }

    #[test]
    fn test_min_max_with_racy_fixture() {
        let report = run(Experiment::MinMax, &small().with_racy(true)).unwrap();
        let last = report.records.last().unwrap();
        assert_eq!(last.label, "min_max::unsynchronized");
        assert!(last.racy);
        assert!(report.records.iter().rev().skip(1).all(|r| !r.racy));
        // Racy record is excluded from the verdict either way
        assert!(report.all_verified());
    }

    #[test]
    fn test_run_all() {
        let reports = run_all(&small()).unwrap();
        let kinds: Vec<_> = reports.iter().map(|r| r.experiment).collect();
        assert_eq!(kinds, Experiment::ALL.to_vec());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(run(Experiment::Add, &small().with_len(0)).is_err());
    }

    #[test]
    fn test_racy_flag_not_label_decides_verdict() {
        let mut report = run(Experiment::MinMax, &small().with_racy(true)).unwrap();
        let last = report.records.len() - 1;
        report.records[last].verified = false;
        assert!(report.all_verified());

        report.records[last].racy = false;
        assert!(!report.all_verified());

        report.records[last].racy = true;
        report.records[0].label = "min_max::unsynchronized".to_string();
        report.records[0].verified = false;
        assert!(!report.all_verified());
    }

    #[test]
    fn test_partitioned_lanes_reports_parallel_phase() {
        let report = run(Experiment::MinMax, &small()).unwrap();
        for r in &report.records {
            if r.label == "min_max::partitioned_vectorized" {
                let parallel = r.parallel_secs.unwrap();
                assert!(parallel >= 0.0 && parallel <= r.elapsed_secs);
            } else {
                assert!(r.parallel_secs.is_none(), "{}", r.label);
            }
        }
    }

    #[test]
    fn test_all_verified_detects_failure() {
        let mut report = run(Experiment::Add, &small()).unwrap();
        report.records[1].verified = false;
        assert!(!report.all_verified());
    }
}
