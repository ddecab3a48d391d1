//! finder CLI
//!
//! Measures the slice- and map-backed finders against each other and
//! deduplicates text files with either one

mod config;
mod progress;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use finder_core::measure::{
    run_contains_sweep, run_dedupe_sweep, ContainsReport, ContainsSweep, DedupeReport,
    DedupeSweep, SweepReport,
};
use finder_core::{dedupe_with_stats, FinderKind};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::BenchConfig;
use progress::ProgressReporter;

#[derive(Parser)]
#[command(name = "finder")]
#[command(version, about = "Compare linear-scan and hashed membership lookups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure membership queries across sizes, hit rates and string lengths
    Contains {
        /// Finders to measure (slice, map); defaults to both
        #[arg(short, long, value_delimiter = ',')]
        finders: Vec<FinderKind>,

        /// Number of elements added to each finder
        #[arg(short, long, value_delimiter = ',')]
        num_elems: Vec<usize>,

        /// Fraction of queries that should hit (0.0-1.0)
        #[arg(long, value_delimiter = ',')]
        hit_rates: Vec<f64>,

        /// Each element is its index repeated this many times
        #[arg(long, value_delimiter = ',')]
        str_lens: Vec<usize>,

        /// Number of queries per case
        #[arg(long, default_value = "1000")]
        test_set_len: usize,

        /// Cap sizes and query sets at 100 elements
        #[arg(long)]
        short: bool,

        /// Seed for the data generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Measure dedupe across sizes and duplicate rates
    Dedupe {
        /// Finders to measure (slice, map); defaults to both
        #[arg(short, long, value_delimiter = ',')]
        finders: Vec<FinderKind>,

        /// Number of input elements
        #[arg(short, long, value_delimiter = ',')]
        num_elems: Vec<usize>,

        /// Fraction of input elements that repeat an earlier one (0.0-1.0)
        #[arg(long, value_delimiter = ',')]
        dup_rates: Vec<f64>,

        /// Cap sizes at 100 elements
        #[arg(long)]
        short: bool,

        /// Seed for the data generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run the sweeps described by a config file
    Run {
        /// Config file (YAML or TOML); full default grids if omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a starter config file
    Init {
        /// Where to write the config (.yaml, .yml or .toml)
        #[arg(value_name = "FILE")]
        output: PathBuf,

        /// Write the small quick-check grid instead of the full one
        #[arg(long)]
        quick: bool,
    },

    /// Remove repeated lines from a text file, keeping first occurrences
    DedupeFile {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Finder used to remember seen lines
        #[arg(short, long, default_value = "map")]
        finder: FinderKind,

        /// File whose lines count as already seen
        #[arg(short, long)]
        exclude: Option<PathBuf>,

        /// Show statistics without writing output
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(!cli.json)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Contains {
            finders,
            num_elems,
            hit_rates,
            str_lens,
            test_set_len,
            short,
            seed,
        } => {
            let defaults = ContainsSweep::default();
            let sweep = ContainsSweep {
                finders: or_default(finders, defaults.finders),
                num_elems: or_default(num_elems, defaults.num_elems),
                hit_rates: or_default(hit_rates, defaults.hit_rates),
                str_lens: or_default(str_lens, defaults.str_lens),
                test_set_len,
            };
            let config = BenchConfig {
                seed,
                short,
                contains: Some(sweep),
                dedupe: None,
            };
            run_config(&config, cli.json)?;
        }
        Commands::Dedupe {
            finders,
            num_elems,
            dup_rates,
            short,
            seed,
        } => {
            let defaults = DedupeSweep::default();
            let sweep = DedupeSweep {
                finders: or_default(finders, defaults.finders),
                num_elems: or_default(num_elems, defaults.num_elems),
                dup_rates: or_default(dup_rates, defaults.dup_rates),
            };
            let config = BenchConfig {
                seed,
                short,
                contains: None,
                dedupe: Some(sweep),
            };
            run_config(&config, cli.json)?;
        }
        Commands::Run { config } => {
            let config = match config {
                Some(path) => {
                    info!("Loading config: {:?}", path);
                    BenchConfig::load(&path)?
                }
                None => BenchConfig::default(),
            };
            run_config(&config, cli.json)?;
        }
        Commands::Init { output, quick } => {
            let config = if quick {
                BenchConfig::quick()
            } else {
                BenchConfig::full()
            };
            config.save(&output)?;
            info!("Wrote config to {:?}", output);
        }
        Commands::DedupeFile {
            input,
            output,
            finder,
            exclude,
            dry_run,
        } => {
            dedupe_file(&input, &output, finder, exclude.as_deref(), dry_run, cli.json)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

fn or_default<T>(values: Vec<T>, default: Vec<T>) -> Vec<T> {
    if values.is_empty() {
        default
    } else {
        values
    }
}

fn run_config(config: &BenchConfig, json_output: bool) -> Result<()> {
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);
    info!("Generator seed: {}", seed);

    if config.contains.is_none() && config.dedupe.is_none() {
        warn!("Config names no sweeps; nothing to run");
    }

    let contains = match &config.contains {
        Some(sweep) => Some(contains_sweep(sweep, config.short, &mut rng, json_output)?),
        None => None,
    };
    let dedupe = match &config.dedupe {
        Some(sweep) => Some(dedupe_sweep(sweep, config.short, &mut rng, json_output)?),
        None => None,
    };

    let failed = contains.as_ref().map_or(0, |r| r.failures().len())
        + dedupe.as_ref().map_or(0, |r| r.failures().len());

    if json_output {
        let report = serde_json::json!({
            "seed": seed,
            "short": config.short,
            "contains": contains,
            "dedupe": dedupe,
            "failed": failed,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if let Some(report) = &contains {
            progress::print_contains_report(report);
        }
        if let Some(report) = &dedupe {
            progress::print_dedupe_report(report);
        }
    }

    if failed > 0 {
        anyhow::bail!("{} case(s) failed (seed {})", failed, seed);
    }

    Ok(())
}

fn contains_sweep(
    sweep: &ContainsSweep,
    short: bool,
    rng: &mut StdRng,
    json_output: bool,
) -> Result<SweepReport<ContainsReport>> {
    info!("Starting contains sweep");
    info!("  Finders: {:?}", sweep.finders);
    info!("  Sizes: {:?}", sweep.num_elems);
    info!("  Hit rates: {:?}", sweep.hit_rates);
    info!("  String lengths: {:?}", sweep.str_lens);

    let (cases, _) = sweep.cases(short);
    let mut progress = ProgressReporter::new("contains", cases.len(), json_output);
    let report = run_contains_sweep(sweep, short, rng, |r| progress.update(r))
        .context("Contains sweep failed")?;
    progress.finish();

    Ok(report)
}

fn dedupe_sweep(
    sweep: &DedupeSweep,
    short: bool,
    rng: &mut StdRng,
    json_output: bool,
) -> Result<SweepReport<DedupeReport>> {
    info!("Starting dedupe sweep");
    info!("  Finders: {:?}", sweep.finders);
    info!("  Sizes: {:?}", sweep.num_elems);
    info!("  Duplicate rates: {:?}", sweep.dup_rates);

    let (cases, _) = sweep.cases(short);
    let mut progress = ProgressReporter::new("dedupe", cases.len(), json_output);
    let report = run_dedupe_sweep(sweep, short, rng, |r| progress.update(r))
        .context("Dedupe sweep failed")?;
    progress.finish();

    Ok(report)
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open input: {}", path.display()))?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .with_context(|| format!("Failed to read lines from {}", path.display()))
}

fn dedupe_file(
    input: &Path,
    output: &Path,
    kind: FinderKind,
    exclude: Option<&Path>,
    dry_run: bool,
    json_output: bool,
) -> Result<()> {
    info!("Starting line deduplication");
    info!("  Input: {:?}", input);
    if !dry_run {
        info!("  Output: {:?}", output);
    }
    info!("  Finder: {}", kind);

    let seed = match exclude {
        Some(path) => {
            let lines = read_lines(path)?;
            info!("  Excluding {} lines from {:?}", lines.len(), path);
            lines
        }
        None => Vec::new(),
    };
    if kind == FinderKind::Slice && seed.len() > 10_000 {
        warn!(
            "slice finder with {} excluded lines; lookups scan linearly, consider --finder map",
            seed.len()
        );
    }

    let mut finder = kind.build(seed);
    let lines = read_lines(input)?;
    let (unique, stats) = dedupe_with_stats(lines, &mut finder);

    if !dry_run {
        let mut writer = BufWriter::new(
            File::create(output)
                .with_context(|| format!("Failed to create output: {}", output.display()))?,
        );
        for line in &unique {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
    }

    if json_output {
        let report = serde_json::json!({
            "input": input.to_string_lossy().to_string(),
            "output": if dry_run { serde_json::Value::Null } else { serde_json::Value::String(output.to_string_lossy().to_string()) },
            "finder": kind,
            "total_lines": stats.total_seen,
            "unique_lines": stats.unique_count,
            "duplicates_removed": stats.duplicates_found,
            "deduplication_rate": stats.dedup_rate(),
            "dry_run": dry_run,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        progress::print_summary_report(input, if dry_run { None } else { Some(output) }, &stats);
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "finder", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_finder_lists() {
        let cli = Cli::try_parse_from([
            "finder",
            "contains",
            "--finders",
            "slice,map",
            "--num-elems",
            "10,100",
            "--hit-rates",
            "0.5",
            "--short",
        ])
        .unwrap();

        match cli.command {
            Commands::Contains {
                finders,
                num_elems,
                hit_rates,
                short,
                ..
            } => {
                assert_eq!(finders, vec![FinderKind::Slice, FinderKind::Map]);
                assert_eq!(num_elems, vec![10, 100]);
                assert_eq!(hit_rates, vec![0.5]);
                assert!(short);
            }
            _ => panic!("expected contains command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_finder() {
        assert!(Cli::try_parse_from(["finder", "dedupe", "--finders", "btree"]).is_err());
    }

    #[test]
    fn test_or_default() {
        assert_eq!(or_default(Vec::new(), vec![1, 2]), vec![1, 2]);
        assert_eq!(or_default(vec![3], vec![1, 2]), vec![3]);
    }

    #[test]
    fn test_dedupe_file_with_exclude() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let exclude = dir.path().join("exclude.txt");
        let output = dir.path().join("output.txt");

        std::fs::write(&input, "b\na\nb\nc\na\nd\n").unwrap();
        std::fs::write(&exclude, "c\n").unwrap();

        for kind in FinderKind::ALL {
            dedupe_file(&input, &output, kind, Some(exclude.as_path()), false, true).unwrap();
            let written = std::fs::read_to_string(&output).unwrap();
            assert_eq!(written, "b\na\nd\n", "{}", kind);
        }
    }

    #[test]
    fn test_dedupe_file_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        std::fs::write(&input, "x\nx\n").unwrap();

        dedupe_file(&input, &output, FinderKind::Map, None, true, true).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_quick_config_runs_clean() {
        assert!(run_config(&BenchConfig::quick(), true).is_ok());
    }

    #[test]
    fn test_unsatisfiable_config_is_an_error() {
        let config = BenchConfig {
            seed: Some(3),
            short: false,
            contains: None,
            dedupe: Some(DedupeSweep {
                finders: vec![FinderKind::Map],
                num_elems: vec![10],
                dup_rates: vec![1.0],
            }),
        };
        assert!(run_config(&config, true).is_err());
    }
}
