//! # imgtools CLI
//!
//! Near-duplicate image removal from the command line.
//!
//! ## Usage
//! ```bash
//! imgtools hash photo.jpg
//! imgtools diff a.jpg b.jpg
//! imgtools rmdup ~/Pictures --dry-run
//! ```

mod cli;

use imgtools::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    cli::run()
}
