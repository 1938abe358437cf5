//! Integration tests for the pipeline and deletion planner.
//!
//! These tests run the full workflow against generated PNG fixtures:
//! - Identical and rescaled copies
//! - Too few candidates
//! - Corrupt files
//! - Dry-run confirmation

use assert_fs::prelude::*;
use assert_fs::TempDir;
use image::{ImageBuffer, Rgb};
use imgtools::core::pipeline::{Pipeline, PipelineOutcome, PipelineResult};
use imgtools::core::planner::{DeletionOutcome, DeletionPlanner};
use imgtools::error::{ConfigError, DuplicateFinderError};
use predicates::prelude::*;
use std::path::Path;

/// Horizontal gradient, bright on the left, so every dHash bit is set
fn write_gradient(path: &Path, width: u32, height: u32) {
    ImageBuffer::from_fn(width, height, |x, _| {
        let v = 255 - (x * 255 / (width - 1)) as u8;
        Rgb([v, v / 2 + 60, v])
    })
    .save(path)
    .unwrap();
}

fn run(root: &Path, recursive: bool) -> PipelineOutcome {
    Pipeline::builder()
        .root(root)
        .recursive(recursive)
        .build()
        .unwrap()
        .run()
        .unwrap()
}

fn completed(outcome: PipelineOutcome) -> PipelineResult {
    match outcome {
        PipelineOutcome::Completed(result) => result,
        other => panic!("expected a completed run, got {:?}", other),
    }
}

fn delete(result: &PipelineResult) -> String {
    let mut out = Vec::new();
    DeletionPlanner::new(false)
        .execute(&result.duplicates, &mut out, |_| true)
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn identical_copies_leave_one_file() {
    let temp = TempDir::new().unwrap();
    let first = temp.child("a.png");
    let second = temp.child("b.png");
    write_gradient(first.path(), 96, 64);
    std::fs::copy(first.path(), second.path()).unwrap();

    let result = completed(run(temp.path(), false));
    let output = delete(&result);

    assert_eq!(output, "Deleted 1 duplicate(s)\n");
    first.assert(predicate::path::exists());
    second.assert(predicate::path::missing());
}

#[test]
fn rescaled_copy_keeps_the_larger_image() {
    let temp = TempDir::new().unwrap();
    let small = temp.child("a_small.png");
    let large = temp.child("z_large.png");
    write_gradient(small.path(), 80, 60);
    write_gradient(large.path(), 320, 240);

    let result = completed(run(temp.path(), false));
    assert_eq!(result.duplicates.len(), 1);
    assert_eq!(
        result.duplicates.original_of(small.path()),
        Some(large.path())
    );

    delete(&result);
    large.assert(predicate::path::exists());
    small.assert(predicate::path::missing());
}

#[test]
fn empty_directory_is_insufficient_input() {
    let temp = TempDir::new().unwrap();

    assert!(matches!(
        run(temp.path(), false),
        PipelineOutcome::InsufficientInput { found: 0 }
    ));
}

#[test]
fn single_image_is_left_alone() {
    let temp = TempDir::new().unwrap();
    let only = temp.child("only.png");
    write_gradient(only.path(), 64, 64);
    temp.child("readme.txt").write_str("not an image").unwrap();

    assert!(matches!(
        run(temp.path(), false),
        PipelineOutcome::InsufficientInput { found: 1 }
    ));
    only.assert(predicate::path::exists());
}

#[test]
fn corrupt_file_is_skipped() {
    let temp = TempDir::new().unwrap();
    let corrupt = temp.child("corrupt.jpg");
    corrupt.write_str("this is not a valid image file").unwrap();
    let first = temp.child("a.png");
    let second = temp.child("b.png");
    write_gradient(first.path(), 64, 64);
    write_gradient(second.path(), 64, 64);

    let result = completed(run(temp.path(), false));

    assert_eq!(result.total_images, 3);
    assert_eq!(result.loaded_images, 2);
    assert!(result
        .errors
        .iter()
        .any(|e| predicate::str::contains("corrupt.jpg").eval(e.as_str())));
    assert!(!result.duplicates.is_duplicate(corrupt.path()));

    delete(&result);
    corrupt.assert(predicate::path::exists());
    first.assert(predicate::path::exists());
    second.assert(predicate::path::missing());
}

#[test]
fn recursive_scan_finds_nested_copies() {
    let temp = TempDir::new().unwrap();
    let top = temp.child("a.png");
    temp.child("album").create_dir_all().unwrap();
    let nested = temp.child("album/b.png");
    write_gradient(top.path(), 64, 64);
    write_gradient(nested.path(), 64, 64);

    assert!(matches!(
        run(temp.path(), false),
        PipelineOutcome::InsufficientInput { found: 1 }
    ));

    let result = completed(run(temp.path(), true));
    assert!(result.duplicates.is_duplicate(nested.path()));
}

#[test]
fn declined_dry_run_deletes_nothing() {
    let temp = TempDir::new().unwrap();
    let first = temp.child("a.png");
    let second = temp.child("b.png");
    write_gradient(first.path(), 64, 64);
    write_gradient(second.path(), 64, 64);

    let result = completed(run(temp.path(), false));
    let mut out = Vec::new();
    let outcome = DeletionPlanner::new(true)
        .execute(&result.duplicates, &mut out, |_| false)
        .unwrap();

    assert!(matches!(outcome, DeletionOutcome::Declined));
    let output = String::from_utf8(out).unwrap();
    assert!(predicate::str::contains("DUPLICATE --> ORIGINAL").eval(&output));
    assert!(predicate::str::contains("b.png --> a.png").eval(&output));
    first.assert(predicate::path::exists());
    second.assert(predicate::path::exists());
}

#[test]
fn non_square_bits_are_rejected() {
    let temp = TempDir::new().unwrap();

    let error = Pipeline::builder()
        .root(temp.path())
        .hash_bits(20)
        .build()
        .unwrap_err();

    assert!(matches!(
        error,
        DuplicateFinderError::InvalidConfiguration(ConfigError::HashBits { bits: 20 })
    ));
}
