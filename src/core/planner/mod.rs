//! # Planner Module
//!
//! Applies a duplicate map to the filesystem: optionally lists what would
//! be removed and asks for confirmation, then deletes every duplicate.
//!
//! Deletion is sequential and never stops early. A file that cannot be
//! removed is recorded in the report and the rest are still attempted.

use crate::core::comparator::DuplicateMap;
use crate::error::{DeleteError, DuplicateFinderError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prompt handed to the confirmation callback after a dry-run listing
pub const CONFIRM_PROMPT: &str = "Delete duplicates?";

/// What happened when the planner ran
#[derive(Debug)]
pub enum DeletionOutcome {
    /// The map was empty; nothing to do
    NoDuplicates,
    /// The dry-run listing was shown and the user said no
    Declined,
    Completed(DeletionReport),
}

/// Result of a deletion pass
#[derive(Debug, Default)]
pub struct DeletionReport {
    /// Number of duplicates a removal was attempted for
    pub attempted: usize,
    /// Paths that were removed
    pub deleted: Vec<PathBuf>,
    /// Paths that could not be removed, with the reason
    pub failures: Vec<DeleteError>,
}

impl DeletionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Previews and deletes duplicates
#[derive(Debug, Clone, Default)]
pub struct DeletionPlanner {
    dry_run: bool,
    full_paths: bool,
}

impl DeletionPlanner {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            full_paths: false,
        }
    }

    /// List full paths instead of bare file names
    pub fn show_full_paths(mut self, full_paths: bool) -> Self {
        self.full_paths = full_paths;
        self
    }

    /// Run the plan against `duplicates`, writing messages to `out`.
    ///
    /// In dry-run mode every pair is listed first and `confirm` is called
    /// with [`CONFIRM_PROMPT`]; anything but `true` leaves the filesystem
    /// untouched. Only write failures on `out` are returned as errors.
    pub fn execute<W, F>(
        &self,
        duplicates: &DuplicateMap,
        out: &mut W,
        mut confirm: F,
    ) -> Result<DeletionOutcome, DuplicateFinderError>
    where
        W: Write + ?Sized,
        F: FnMut(&str) -> bool,
    {
        if duplicates.is_empty() {
            writeln!(out, "No duplicates found")?;
            return Ok(DeletionOutcome::NoDuplicates);
        }

        if self.dry_run {
            self.write_listing(duplicates, out)?;
            out.flush()?;
            if !confirm(CONFIRM_PROMPT) {
                debug!("deletion declined");
                return Ok(DeletionOutcome::Declined);
            }
        }

        let report = delete_all(duplicates);
        write_summary(&report, out)?;

        Ok(DeletionOutcome::Completed(report))
    }

    fn write_listing<W: Write + ?Sized>(
        &self,
        duplicates: &DuplicateMap,
        out: &mut W,
    ) -> std::io::Result<()> {
        writeln!(out, "DUPLICATE --> ORIGINAL")?;
        for (duplicate, original) in duplicates.iter() {
            writeln!(
                out,
                "{} --> {}",
                self.display_name(duplicate),
                self.display_name(original)
            )?;
        }
        Ok(())
    }

    fn display_name(&self, path: &Path) -> String {
        if self.full_paths {
            return path.display().to_string();
        }
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

fn delete_all(duplicates: &DuplicateMap) -> DeletionReport {
    let mut report = DeletionReport::default();

    for duplicate in duplicates.duplicates() {
        report.attempted += 1;
        match fs::remove_file(duplicate) {
            Ok(()) => {
                debug!(path = %duplicate.display(), "deleted duplicate");
                report.deleted.push(duplicate.to_path_buf());
            }
            Err(source) => {
                let error = DeleteError {
                    path: duplicate.to_path_buf(),
                    source,
                };
                warn!("{}", error);
                report.failures.push(error);
            }
        }
    }

    report
}

fn write_summary<W: Write + ?Sized>(report: &DeletionReport, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Deleted {} duplicate(s)", report.deleted.len())?;
    if !report.is_clean() {
        for failure in &report.failures {
            writeln!(out, "  {}", failure)?;
        }
        writeln!(
            out,
            "Failed to delete {} of {} duplicate(s)",
            report.failures.len(),
            report.attempted
        )?;
    }
    Ok(())
}
