//! Course advising menu.
//!
//! ```bash
//! # Use the default catalog in the working directory
//! advising
//!
//! # Load a specific catalog and refuse duplicate course ids
//! advising courses.csv --duplicates reject
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use advising::index::{CourseIndex, DuplicatePolicy};
use advising::menu::{Menu, Terminal};

/// Look up courses and their prerequisites.
#[derive(Parser, Debug)]
#[command(name = "advising", version, about)]
struct Args {
    /// Course catalog to load
    #[arg(
        value_name = "FILE",
        default_value = "ABCU_Advising_Program_Input.csv",
        env = "ADVISING_CSV"
    )]
    csv_path: PathBuf,

    /// What to do with a course id that is already loaded
    #[arg(long, value_enum, default_value = "keep")]
    duplicates: DuplicatesArg,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DuplicatesArg {
    /// Keep both courses
    Keep,
    /// Overwrite the loaded course
    Replace,
    /// Skip the new row
    Reject,
}

impl From<DuplicatesArg> for DuplicatePolicy {
    fn from(arg: DuplicatesArg) -> Self {
        match arg {
            DuplicatesArg::Keep => DuplicatePolicy::Keep,
            DuplicatesArg::Replace => DuplicatePolicy::Replace,
            DuplicatesArg::Reject => DuplicatePolicy::Reject,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);
    info!(catalog = %args.csv_path.display(), duplicates = ?args.duplicates, "starting");

    let index = CourseIndex::with_policy(args.duplicates.into());
    let terminal = Terminal::new().context("failed to set up the terminal")?;
    let mut menu = Menu::new(terminal, io::stdout(), index, args.csv_path);
    menu.run().context("advising menu failed")
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("advising=debug")
    } else {
        EnvFilter::new("advising=warn")
    };

    // Logs go to stderr so they don't interleave with the menu.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
