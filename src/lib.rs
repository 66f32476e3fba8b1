//! `jackknife` cross-validates phylogenetic placement tools with leave-one-out trials.
//!
//! For every tip in a reference tree, `jackknife` prunes that tip, reruns a
//! maximum-likelihood branch-length estimator and an evolutionary placement
//! tool on the reduced tree, and compares the two resulting placement
//! (`.jplace`) files with an external comparison script. The heavy lifting
//! (likelihood optimization, placement, jplace comparison) is delegated
//! entirely to the external tools; this crate is the orchestration around them:
//! argument validation, directory bookkeeping, subprocess invocation, and
//! result tallying.
//!
//! ```no_run
//! use clap::Parser;
//! let input = ["jackknife", "run", "raxmlHPC", "epa-ng", "tree.newick", "alignment.fasta", "output"];
//! let args = jackknife::Cli::parse_from(input);
//! ```

pub mod cli;
pub mod sequence;
pub mod tools;
pub mod validate;

#[doc(inline)]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::validate::{RunArgs, Summary};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ValueEnum)]
pub enum Verbosity {
    #[default]
    Info,
    Warn,
    Debug,
    Error,
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Convert to lowercase for RUST_LOG env var compatibility
        let lowercase = format!("{:?}", self).to_lowercase();
        write!(f, "{lowercase}")
    }
}
