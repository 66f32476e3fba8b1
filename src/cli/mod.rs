//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::validate::RunArgs;
use crate::Verbosity;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI parses user input from the command-line in the main function. This
/// is achieved with the `parse` function, which parses the command line
/// arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = jackknife::Cli::parse();
/// ```
/// The command-line arguments from `std::env::args` are simply a vector of
/// space separated strings. Here is a manual example of setting the
/// command-line input:
/// ```rust
/// # use clap::Parser;
/// let input = ["jackknife", "run", "raxmlHPC", "epa-ng", "tree.newick", "alignment.fasta", "output"];
/// let args = jackknife::Cli::parse_from(input);
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "jackknife", author, version)]
#[clap(about = "jackknife cross-validates phylogenetic placement tools with leave-one-out trials.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants) the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    #[clap(about = "Run leave-one-out placement validation.")]
    Run(RunArgs),
}

#[cfg(test)]
mod tests;
