//! Measurement harness comparing the finder implementations
//!
//! Each case generates synthetic data, drives a freshly built finder and
//! checks the outcome against what the generator promised (the hit rate for
//! membership queries, the unique count for dedupe). Wall-clock timings are
//! recorded alongside so sweeps over sizes and rates show where the linear
//! scan stops being competitive with hashing.

use crate::dedup::dedupe;
use crate::finder::{Finder, FinderKind};
use crate::generate::{floor_count, generate_elems, generate_elems_with_dups, whole_count};
use crate::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Query set length used when running in short mode
pub const SHORT_MAX_LEN: usize = 100;

/// Outcome of a single measured case
pub trait CaseOutcome {
    /// Whether the finder behaved as the generated data requires
    fn passed(&self) -> bool;
}

/// One membership-query measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainsCase {
    pub finder: FinderKind,
    pub num_elems: usize,
    pub hit_rate: f64,
    pub str_len: usize,
    pub test_set_len: usize,
}

/// Result of a [`ContainsCase`]
#[derive(Debug, Clone, Serialize)]
pub struct ContainsReport {
    #[serde(flatten)]
    pub case: ContainsCase,
    /// Number of queries issued
    pub queries: usize,
    /// Number of queries answered `true`
    pub hits: usize,
    pub observed_hit_rate: f64,
    /// Time spent adding the add set
    pub add_ns: u64,
    /// Time spent answering the query set
    pub contains_ns: u64,
}

impl ContainsReport {
    /// Average cost of one membership query in nanoseconds
    pub fn ns_per_contains(&self) -> f64 {
        if self.queries == 0 {
            0.0
        } else {
            self.contains_ns as f64 / self.queries as f64
        }
    }
}

impl CaseOutcome for ContainsReport {
    fn passed(&self) -> bool {
        // Queries past the last whole template come from a partial copy
        let slack = self.case.test_set_len.checked_rem(self.case.num_elems).unwrap_or(0) as f64;
        let expected = self.case.hit_rate * self.queries as f64;
        (self.hits as f64 - expected).abs() <= slack + 1e-9
    }
}

/// One dedupe measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DedupeCase {
    pub finder: FinderKind,
    pub num_elems: usize,
    pub dup_rate: f64,
}

/// Result of a [`DedupeCase`]
#[derive(Debug, Clone, Serialize)]
pub struct DedupeReport {
    #[serde(flatten)]
    pub case: DedupeCase,
    pub expected_unique: usize,
    pub output_len: usize,
    /// No value appears twice in the output
    pub duplicate_free: bool,
    pub dedupe_ns: u64,
}

impl DedupeReport {
    /// Average cost per input element in nanoseconds
    pub fn ns_per_elem(&self) -> f64 {
        if self.case.num_elems == 0 {
            0.0
        } else {
            self.dedupe_ns as f64 / self.case.num_elems as f64
        }
    }
}

impl CaseOutcome for DedupeReport {
    fn passed(&self) -> bool {
        self.duplicate_free && self.output_len == self.expected_unique
    }
}

fn as_nanos(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}

/// Add a generated add set to an empty finder, then time the query set
pub fn run_contains_case<R: Rng>(case: &ContainsCase, rng: &mut R) -> Result<ContainsReport> {
    let (add_set, test_set) = generate_elems(
        case.num_elems,
        case.test_set_len,
        case.str_len,
        case.hit_rate,
        rng,
    )?;

    let mut finder = case.finder.build(Vec::<String>::new());

    let start = Instant::now();
    for elem in add_set {
        finder.add(elem);
    }
    let add_ns = as_nanos(start.elapsed());

    let start = Instant::now();
    let mut hits = 0;
    for elem in &test_set {
        if black_box(finder.contains(elem)) {
            hits += 1;
        }
    }
    let contains_ns = as_nanos(start.elapsed());

    let queries = test_set.len();
    let report = ContainsReport {
        case: *case,
        queries,
        hits,
        observed_hit_rate: hits as f64 / queries as f64,
        add_ns,
        contains_ns,
    };

    debug!(
        "{} num_elems={} hit_rate={:.2} str_len={}: {}/{} hits, {:.1} ns/op",
        case.finder,
        case.num_elems,
        case.hit_rate,
        case.str_len,
        hits,
        queries,
        report.ns_per_contains()
    );

    Ok(report)
}

/// Time `dedupe` over generated input with an empty finder
pub fn run_dedupe_case<R: Rng>(case: &DedupeCase, rng: &mut R) -> Result<DedupeReport> {
    let input = generate_elems_with_dups(case.num_elems, case.dup_rate, rng)?;
    let expected_unique = case.num_elems - floor_count(case.num_elems, case.dup_rate);

    let mut finder = case.finder.build(Vec::<String>::new());

    let start = Instant::now();
    let output = black_box(dedupe(input, &mut finder));
    let dedupe_ns = as_nanos(start.elapsed());

    let distinct: HashSet<&String> = output.iter().collect();
    let report = DedupeReport {
        case: *case,
        expected_unique,
        output_len: output.len(),
        duplicate_free: distinct.len() == output.len(),
        dedupe_ns,
    };

    debug!(
        "{} num_elems={} dup_rate={:.2}: {} of {} expected unique",
        case.finder, case.num_elems, case.dup_rate, report.output_len, expected_unique
    );

    Ok(report)
}

/// Grid of membership-query cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainsSweep {
    pub finders: Vec<FinderKind>,
    pub num_elems: Vec<usize>,
    pub hit_rates: Vec<f64>,
    pub str_lens: Vec<usize>,
    pub test_set_len: usize,
}

impl Default for ContainsSweep {
    fn default() -> Self {
        Self {
            finders: FinderKind::ALL.to_vec(),
            num_elems: vec![1, 2, 4, 5, 10, 20, 50, 100, 200, 500, 1000],
            hit_rates: vec![1.0, 0.5, 0.25, 0.2, 0.0],
            str_lens: vec![1, 2, 5, 10, 20, 30, 50, 100],
            test_set_len: 1000,
        }
    }
}

impl ContainsSweep {
    /// Expand the grid, returning runnable cases and how many were skipped.
    ///
    /// A case is skipped when `num_elems * (1 - hit_rate)` is fractional, or
    /// in short mode when `num_elems` exceeds [`SHORT_MAX_LEN`].
    pub fn cases(&self, short: bool) -> (Vec<ContainsCase>, usize) {
        let test_set_len = if short {
            self.test_set_len.min(SHORT_MAX_LEN)
        } else {
            self.test_set_len
        };

        let mut cases = Vec::new();
        let mut skipped = 0;

        for &finder in &self.finders {
            for &num_elems in &self.num_elems {
                for &hit_rate in &self.hit_rates {
                    for &str_len in &self.str_lens {
                        if (short && num_elems > SHORT_MAX_LEN)
                            || whole_count(num_elems, 1.0 - hit_rate).is_none()
                        {
                            skipped += 1;
                            continue;
                        }
                        cases.push(ContainsCase {
                            finder,
                            num_elems,
                            hit_rate,
                            str_len,
                            test_set_len,
                        });
                    }
                }
            }
        }

        (cases, skipped)
    }
}

/// Grid of dedupe cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupeSweep {
    pub finders: Vec<FinderKind>,
    pub num_elems: Vec<usize>,
    pub dup_rates: Vec<f64>,
}

impl Default for DedupeSweep {
    fn default() -> Self {
        Self {
            finders: FinderKind::ALL.to_vec(),
            num_elems: vec![1, 2, 3, 4, 5, 10, 20, 50, 100, 200, 500, 1000],
            dup_rates: vec![0.8, 0.6, 0.4, 0.2, 0.0],
        }
    }
}

impl DedupeSweep {
    /// Expand the grid, returning runnable cases and how many were skipped.
    ///
    /// A case is skipped when `num_elems * dup_rate` is fractional, or in
    /// short mode when `num_elems` exceeds [`SHORT_MAX_LEN`].
    pub fn cases(&self, short: bool) -> (Vec<DedupeCase>, usize) {
        let mut cases = Vec::new();
        let mut skipped = 0;

        for &finder in &self.finders {
            for &num_elems in &self.num_elems {
                for &dup_rate in &self.dup_rates {
                    if (short && num_elems > SHORT_MAX_LEN)
                        || whole_count(num_elems, dup_rate).is_none()
                    {
                        skipped += 1;
                        continue;
                    }
                    cases.push(DedupeCase {
                        finder,
                        num_elems,
                        dup_rate,
                    });
                }
            }
        }

        (cases, skipped)
    }
}

/// Reports from a sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport<R> {
    pub reports: Vec<R>,
    /// Grid points that were not run
    pub skipped: usize,
}

impl<R: CaseOutcome> SweepReport<R> {
    /// Reports whose check failed
    pub fn failures(&self) -> Vec<&R> {
        self.reports.iter().filter(|r| !r.passed()).collect()
    }

    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(|r| r.passed())
    }
}

/// Run every case of a contains sweep, calling `on_case` after each one
pub fn run_contains_sweep<R, F>(
    sweep: &ContainsSweep,
    short: bool,
    rng: &mut R,
    mut on_case: F,
) -> Result<SweepReport<ContainsReport>>
where
    R: Rng,
    F: FnMut(&ContainsReport),
{
    let (cases, skipped) = sweep.cases(short);
    info!(
        "Running {} contains cases ({} skipped, short={})",
        cases.len(),
        skipped,
        short
    );

    let mut reports = Vec::with_capacity(cases.len());
    for case in &cases {
        let report = run_contains_case(case, rng)?;
        on_case(&report);
        reports.push(report);
    }

    Ok(SweepReport { reports, skipped })
}

/// Run every case of a dedupe sweep, calling `on_case` after each one
pub fn run_dedupe_sweep<R, F>(
    sweep: &DedupeSweep,
    short: bool,
    rng: &mut R,
    mut on_case: F,
) -> Result<SweepReport<DedupeReport>>
where
    R: Rng,
    F: FnMut(&DedupeReport),
{
    let (cases, skipped) = sweep.cases(short);
    info!(
        "Running {} dedupe cases ({} skipped, short={})",
        cases.len(),
        skipped,
        short
    );

    let mut reports = Vec::with_capacity(cases.len());
    for case in &cases {
        let report = run_dedupe_case(case, rng)?;
        on_case(&report);
        reports.push(report);
    }

    Ok(SweepReport { reports, skipped })
}
