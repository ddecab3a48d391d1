//! Progress reporting and result tables for the CLI

use std::path::Path;

use finder_core::measure::{CaseOutcome, ContainsReport, DedupeReport, SweepReport};
use finder_core::DedupStats;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar over the cases of a sweep
pub struct ProgressReporter {
    bar: ProgressBar,
    failures: usize,
}

impl ProgressReporter {
    /// Create a reporter for `total_cases` cases; draws nothing when `hidden`
    pub fn new(label: &str, total_cases: usize, hidden: bool) -> Self {
        let bar = ProgressBar::new(total_cases as u64);
        if hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {human_pos}/{human_len} {prefix} {msg}")
        {
            bar.set_style(style.progress_chars("█▓▒░-"));
        }
        bar.set_prefix(label.to_string());

        Self { bar, failures: 0 }
    }

    /// Record one finished case
    pub fn update<R: CaseOutcome>(&mut self, report: &R) {
        if !report.passed() {
            self.failures += 1;
            self.bar
                .set_message(format!("{} failed", format_number(self.failures)));
        }
        self.bar.inc(1);
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if self.failures == 0 {
            self.bar.finish_with_message("Complete!");
        } else {
            self.bar.finish_with_message(format!("{} failed", self.failures));
        }
    }
}

/// Format large numbers with a K/M suffix
fn format_number(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn status(passed: bool) -> &'static str {
    if passed {
        "ok"
    } else {
        "FAIL"
    }
}

/// Print a table of membership-query results
pub fn print_contains_report(sweep: &SweepReport<ContainsReport>) {
    println!("\n{}", "═".repeat(78));
    println!("Membership Queries");
    println!("{}", "═".repeat(78));
    println!(
        "{:<14} {:>9} {:>8} {:>7} {:>8} {:>9} {:>12}  {}",
        "finder", "num_elems", "hit_rate", "str_len", "queries", "observed", "ns/contains", "check"
    );

    for report in &sweep.reports {
        println!(
            "{:<14} {:>9} {:>8.2} {:>7} {:>8} {:>9.2} {:>12.1}  {}",
            report.case.finder.name(),
            report.case.num_elems,
            report.case.hit_rate,
            report.case.str_len,
            report.queries,
            report.observed_hit_rate,
            report.ns_per_contains(),
            status(report.passed()),
        );
    }

    print_sweep_footer(sweep.reports.len(), sweep.skipped, sweep.failures().len());
}

/// Print a table of dedupe results
pub fn print_dedupe_report(sweep: &SweepReport<DedupeReport>) {
    println!("\n{}", "═".repeat(78));
    println!("Dedupe");
    println!("{}", "═".repeat(78));
    println!(
        "{:<14} {:>9} {:>8} {:>9} {:>8} {:>12}  {}",
        "finder", "num_elems", "dup_rate", "expected", "output", "ns/elem", "check"
    );

    for report in &sweep.reports {
        println!(
            "{:<14} {:>9} {:>8.2} {:>9} {:>8} {:>12.1}  {}",
            report.case.finder.name(),
            report.case.num_elems,
            report.case.dup_rate,
            report.expected_unique,
            report.output_len,
            report.ns_per_elem(),
            status(report.passed()),
        );
    }

    print_sweep_footer(sweep.reports.len(), sweep.skipped, sweep.failures().len());
}

fn print_sweep_footer(run: usize, skipped: usize, failed: usize) {
    println!("{}", "─".repeat(78));
    println!(
        "Cases run: {} | skipped: {} | failed: {}",
        format_with_commas(run),
        format_with_commas(skipped),
        format_with_commas(failed)
    );
    println!("{}", "═".repeat(78));
}

/// Print a formatted summary of a file dedupe
pub fn print_summary_report(input: &Path, output: Option<&Path>, stats: &DedupStats) {
    println!("\n{}", "═".repeat(60));
    println!("Line Deduplication Complete");
    println!("{}", "═".repeat(60));
    println!("Input:              {}", input.display());

    if let Some(output_path) = output {
        println!("Output:             {}", output_path.display());
    } else {
        println!("Output:             (dry run - no output written)");
    }

    println!("Total lines:        {}", format_with_commas(stats.total_seen));

    if stats.duplicates_found > 0 {
        println!(
            "Duplicates removed: {} ({:.1}%)",
            format_with_commas(stats.duplicates_found),
            stats.dedup_rate()
        );
    }

    let kept = if stats.total_seen == 0 {
        0.0
    } else {
        (stats.unique_count as f64 / stats.total_seen as f64) * 100.0
    };
    println!(
        "Unique lines:       {} ({:.1}%)",
        format_with_commas(stats.unique_count),
        kept
    );

    println!("{}", "═".repeat(60));
}

/// Format number with thousand separators
fn format_with_commas(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
