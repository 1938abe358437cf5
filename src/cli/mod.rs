//! # CLI Module
//!
//! Command-line interface for imgtools.
//!
//! ## Usage
//! ```bash
//! # Print difference hashes
//! imgtools hash a.jpg b.png --bits 64
//!
//! # Compare two images
//! imgtools diff a.jpg b.jpg --threshold 0.9
//!
//! # Remove near-duplicates, previewing first
//! imgtools rmdup ~/Pictures --recursive --dry-run
//! ```

use clap::{Parser, Subcommand};
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use imgtools::core::hasher::DifferenceHasher;
use imgtools::core::pipeline::{Pipeline, PipelineOutcome, DEFAULT_WORKERS, MAX_WORKERS};
use imgtools::core::planner::{DeletionOutcome, DeletionPlanner};
use imgtools::core::similarity::{SsimConfig, SsimScorer};
use imgtools::core::DuplicateThreshold;
use imgtools::events::{DedupEvent, Event, EventChannel, LoadEvent};
use imgtools::{init_tracing, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

/// imgtools - find and remove near-duplicate images
#[derive(Parser, Debug)]
#[command(name = "imgtools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the difference hash of each image
    Hash {
        /// Images to hash
        #[arg(required = true, value_name = "IMAGE")]
        images: Vec<PathBuf>,

        /// Hash length in bits; must be a perfect square
        #[arg(short, long, default_value_t = DifferenceHasher::DEFAULT_BITS)]
        bits: u32,
    },

    /// Compare two images with SSIM
    Diff {
        #[arg(value_name = "IMG1")]
        first: PathBuf,

        #[arg(value_name = "IMG2")]
        second: PathBuf,

        /// Report the pair when SSIM falls below this value
        #[arg(short, long, default_value_t = DuplicateThreshold::DEFAULT)]
        threshold: f64,
    },

    /// Remove near-duplicate images from a directory
    Rmdup {
        /// Directory to scan
        #[arg(value_name = "DIR")]
        root: PathBuf,

        /// List duplicates and ask before deleting
        #[arg(short, long)]
        dry_run: bool,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Worker threads per phase, clamped to 0..=8 (0 runs on the main thread)
        #[arg(short, long, default_value_t = DEFAULT_WORKERS as i64, allow_negative_numbers = true)]
        processes: i64,

        /// SSIM score a duplicate must exceed
        #[arg(short, long, default_value_t = DuplicateThreshold::DEFAULT)]
        threshold: f64,

        /// Hash length in bits used for bucketing
        #[arg(short, long, default_value_t = DifferenceHasher::DEDUP_BITS)]
        bits: u32,

        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Run the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Rmdup { verbose: true, .. });
    init_tracing(if verbose { "debug" } else { "warn" });

    match cli.command {
        Commands::Hash { images, bits } => run_hash(&images, bits),
        Commands::Diff {
            first,
            second,
            threshold,
        } => run_diff(&first, &second, threshold),
        Commands::Rmdup {
            root,
            dry_run,
            recursive,
            processes,
            threshold,
            bits,
            verbose: _,
        } => run_rmdup(root, dry_run, recursive, processes, threshold, bits),
    }
}

fn run_hash(images: &[PathBuf], bits: u32) -> Result<ExitCode> {
    let hasher = DifferenceHasher::new(bits)?;
    let term = Term::stderr();

    for path in images {
        match hasher.hash_file(path) {
            Ok(fingerprint) => println!("{}  {}", fingerprint, path.display()),
            Err(e) => {
                term.write_line(&format!("{} {}", style("error:").red().bold(), e))
                    .ok();
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_diff(first: &Path, second: &Path, threshold: f64) -> Result<ExitCode> {
    let threshold = DuplicateThreshold::new(threshold)?;
    let scorer = SsimScorer::new(SsimConfig::default())?;
    let score = scorer.similarity_files(first, second)?;

    if score < threshold.value() {
        println!("{}", diff_message(first, second, score));
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn diff_message(first: &Path, second: &Path, score: f64) -> String {
    format!(
        "Images {} and {} differ with SSIM={:.3}",
        first.display(),
        second.display(),
        score
    )
}

fn run_rmdup(
    root: PathBuf,
    dry_run: bool,
    recursive: bool,
    processes: i64,
    threshold: f64,
    bits: u32,
) -> Result<ExitCode> {
    let term = Term::stderr();

    let pipeline = Pipeline::builder()
        .root(root)
        .recursive(recursive)
        .workers(worker_count(processes))
        .threshold(threshold)
        .hash_bits(bits)
        .build()?;

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        let mut bar: Option<ProgressBar> = None;
        for event in receiver.iter() {
            match event {
                Event::Load(LoadEvent::Started { total_files }) => {
                    bar = Some(phase_bar("Loading", total_files));
                }
                Event::Load(LoadEvent::Progress(_)) => {
                    if let Some(ref pb) = bar {
                        pb.inc(1);
                    }
                }
                Event::Dedup(DedupEvent::Started {
                    total_comparisons, ..
                }) => {
                    bar = Some(phase_bar("Processing", total_comparisons));
                }
                Event::Dedup(DedupEvent::Progress(p)) => {
                    if let Some(ref pb) = bar {
                        pb.inc(p.comparisons as u64);
                    }
                }
                Event::Load(LoadEvent::Completed { .. })
                | Event::Dedup(DedupEvent::Completed { .. }) => {
                    if let Some(pb) = bar.take() {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    // Run the pipeline
    let outcome = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = match outcome? {
        PipelineOutcome::InsufficientInput { found } => {
            term.write_line(&format!(
                "{} found {} image(s); need at least two to compare",
                style("Nothing to do:").yellow(),
                found
            ))
            .ok();
            return Ok(ExitCode::SUCCESS);
        }
        PipelineOutcome::Completed(result) => result,
    };

    let planner = DeletionPlanner::new(dry_run).show_full_paths(recursive);
    let mut stdout = std::io::stdout().lock();
    let outcome = planner.execute(&result.duplicates, &mut stdout, confirm)?;

    match outcome {
        DeletionOutcome::Completed(report) if !report.is_clean() => Ok(ExitCode::from(1)),
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// Clamp a user-supplied worker count into `0..=MAX_WORKERS`
fn worker_count(processes: i64) -> usize {
    processes.clamp(0, MAX_WORKERS as i64) as usize
}

fn phase_bar(label: &'static str, length: usize) -> ProgressBar {
    let pb = ProgressBar::new(length as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:>10.cyan.bold} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("█▓░"),
    );
    pb.set_prefix(label);
    pb
}

fn confirm(prompt: &str) -> bool {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}
