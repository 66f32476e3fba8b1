//! Synchronous invocation of the external phylogenetics tools.

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use log::info;
use std::ffi::OsString;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// File extension of placement-result files deposited by the external tools.
pub const PLACEMENT_EXT: &str = "jplace";

/// Runs an external tool to completion and returns its exit code.
///
/// The call blocks until the subprocess exits. With `quiet`, the tool's
/// standard output is discarded; standard error always passes through.
/// Non-zero exit codes are returned to the caller, not treated as errors:
/// for the comparison script the exit code is the number of failed
/// comparisons.
///
/// ## Arguments
///
/// - `program` - Path to the executable.
/// - `args` - Command-line arguments for the executable.
/// - `quiet` - Discard the tool's standard output.
pub fn execute<P>(program: &P, args: &[OsString], quiet: bool) -> Result<i32, Report>
where
    P: AsRef<Path> + Debug,
{
    let mut command = Command::new(program.as_ref());
    command.args(args);
    if quiet {
        command.stdout(Stdio::null());
    }
    info!("Executing: {program:?} {args:?}");

    let status = command
        .status()
        .wrap_err_with(|| format!("Failed to execute: {program:?}"))
        .suggestion("Is the tool installed and executable?")?;
    status.code().ok_or_else(|| eyre!("{program:?} was terminated by a signal."))
}

/// Returns the placement-result (`.jplace`) files found in a working directory, sorted by name.
pub fn placement_results<P>(dir: &P) -> Result<Vec<PathBuf>, Report>
where
    P: AsRef<Path> + Debug,
{
    let entries = std::fs::read_dir(dir.as_ref())
        .wrap_err_with(|| format!("Failed to read working directory: {dir:?}"))?;
    let mut results = entries
        .map(|entry| Ok(entry?.path()))
        .collect::<Result<Vec<_>, Report>>()?
        .into_iter()
        .filter(|path| path.extension().is_some_and(|ext| ext == PLACEMENT_EXT))
        .collect::<Vec<_>>();
    results.sort();
    Ok(results)
}
