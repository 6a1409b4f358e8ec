mod cli;
mod config;
mod error;
mod finder;
mod media;
mod metadata;
mod namer;
mod parser;
mod renamer;
mod selector;
mod text;
mod workflow;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use error::{Error, Result};
use workflow::{Outcome, Workflow};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli)?;

    let files = finder::find_files(&cli.inputs, &config.finder_config())?;
    if files.is_empty() {
        return Err(Error::InvalidArguments(
            "no valid files found in the given paths".into(),
        ));
    }
    println!("Found {} file(s) to process", files.len());

    let skip_on_error = config.skip_file_on_error;
    let fail_on_data_unavailable = config.fail_on_data_unavailable;
    let mut workflow = Workflow::new(config);

    let mut renamed = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for file in &files {
        println!();
        println!("Processing {}", file.display());
        match workflow.process(file) {
            Ok(Outcome::Renamed(_)) => renamed += 1,
            Ok(Outcome::Unchanged) => renamed += 1,
            Ok(Outcome::Skipped) => skipped += 1,
            Err(e) => {
                if should_abort(&e, skip_on_error, fail_on_data_unavailable) {
                    return Err(e);
                }
                warn!(file = %file.display(), error = %e, "skipping file");
                eprintln!("Skipping {}: {e}", file.display());
                failed += 1;
            }
        }
    }

    println!();
    println!("Done: {renamed} processed, {skipped} skipped, {failed} failed");
    Ok(())
}

/// Whether an error from one file ends the whole run. A user abort always
/// does; everything else skips the file unless skip_file_on_error is off
/// (or, for provider outages, fail_on_data_unavailable is on).
fn should_abort(e: &Error, skip_on_error: bool, fail_on_data_unavailable: bool) -> bool {
    match e {
        Error::UserAbort(_) => true,
        Error::DataUnavailable(_) => fail_on_data_unavailable || !skip_on_error,
        _ => !skip_on_error,
    }
}
