//! Leave-one-out validation of phylogenetic placement tools.
//!
//! For every tip in the reference tree, one trial: prune the tip, write the
//! reduced tree into a per-taxon working directory, rerun the maximum
//! likelihood estimator and the placement tool against it, and compare the two
//! resulting `.jplace` files with the comparison script. Trials run strictly
//! sequentially.

use crate::sequence::Alignment;
use crate::tools;
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use jackknife_phylo::{newick, Node, Phylogeny, ToNewick};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};

/// File name of the pruned tree written into each working directory.
pub const TREE_FILE_NAME: &str = "tree.newick";
/// File name of the pruned alignment written with `--prune-alignment`.
pub const ALIGNMENT_FILE_NAME: &str = "alignment.fasta";
/// Number of placement-result files expected per trial, one from each tool.
pub const PLACEMENTS_PER_TRIAL: usize = 2;
/// Smallest reference tree that still leaves an unrooted topology after pruning.
pub const MIN_TIPS: usize = 4;

// ----------------------------------------------------------------------------
// RunArgs
// ----------------------------------------------------------------------------

/// Run leave-one-out placement validation.
#[derive(Clone, Debug, Deserialize, Parser, Serialize)]
pub struct RunArgs {
    /// Maximum-likelihood branch-length estimator executable (ex. raxmlHPC).
    pub estimator: PathBuf,

    /// Evolutionary placement executable (ex. epa-ng).
    pub placement: PathBuf,

    /// Reference tree file (newick).
    pub tree: PathBuf,

    /// Reference alignment file (fasta).
    pub alignment: PathBuf,

    /// Existing output directory, one subdirectory is created per taxon.
    pub output_dir: PathBuf,

    /// Placement-result comparison script.
    #[clap(long, default_value = "./jplace_compare.py")]
    pub compare: PathBuf,

    /// Substitution model passed to the estimator.
    #[clap(long, default_value = "GTRGAMMA")]
    pub model: String,

    /// Run label passed to the estimator.
    #[clap(long, default_value = "leave_one_out")]
    pub run_name: String,

    /// Exclude the pruned taxon's sequence from the alignment given to the tools.
    ///
    /// By default the full, unpruned alignment is passed, and the pruned
    /// taxon re-enters as a query sequence.
    #[clap(long)]
    pub prune_alignment: bool,

    /// Continue with the remaining taxa when a trial fails structurally.
    ///
    /// By default the first trial with an unexpected number of
    /// placement-result files aborts the whole run. With this flag the
    /// failure is confined to its taxon and counted as one failed test.
    #[clap(long)]
    pub keep_going: bool,
}

impl RunArgs {
    /// Checks the input paths before any trial runs.
    pub fn validate(&self) -> Result<(), Report> {
        let files = [
            (&self.estimator, "estimator executable"),
            (&self.placement, "placement executable"),
            (&self.tree, "tree file"),
            (&self.alignment, "alignment file"),
            (&self.compare, "comparison script"),
        ];
        for (path, description) in files {
            if !path.is_file() {
                Err(eyre!("The {description} does not exist or is not a file: {path:?}")
                    .suggestion("Usage: jackknife run <ESTIMATOR> <PLACEMENT> <TREE> <ALIGNMENT> <OUTPUT_DIR>"))?
            }
        }
        if !self.output_dir.is_dir() {
            Err(eyre!("The output directory does not exist or is not a directory: {:?}", self.output_dir)
                .suggestion("Create the output directory before running."))?
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Summary
// ----------------------------------------------------------------------------

/// Aggregated pass/fail counts over all leave-one-out trials.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Summary {
    /// Number of trials run, one per tip of the reference tree.
    pub num_run: usize,
    /// Summed failed comparisons reported by the comparison script.
    pub num_failed: usize,
}

impl Summary {
    pub fn new() -> Self {
        Summary { num_run: 0, num_failed: 0 }
    }

    /// Write the [`Summary`] to a JSON file.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        let output = serde_json::to_string_pretty(self)
            .wrap_err_with(|| format!("Failed to serialize summary: {self:?}"))?;
        std::fs::write(path.as_ref(), output)
            .wrap_err_with(|| format!("Failed to write summary: {path:?}"))?;
        Ok(())
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed {} out of {} tests", self.num_failed, self.num_run)
    }
}

// ----------------------------------------------------------------------------
// Driver
// ----------------------------------------------------------------------------

/// Runs one leave-one-out trial per tip of the reference tree and returns the [`Summary`].
pub fn run(args: &RunArgs) -> Result<Summary, Report> {
    args.validate()?;

    let tree = newick::read(&args.tree)?;
    let alignment = Alignment::read(&args.alignment)?;

    let tips = tree.tips()?;
    if tips.len() < MIN_TIPS {
        Err(eyre!("The reference tree has {} tips, but at least {MIN_TIPS} are required.", tips.len())
            .suggestion("Pruning a tip must leave an unrooted topology with 3 or more tips."))?
    }
    for tip in &tips {
        if !alignment.contains(&tip.label) {
            Err(eyre!("Tree tip {:?} has no sequence in the alignment: {:?}", tip.label, args.alignment)
                .suggestion("Tip labels and fasta record names must match exactly."))?
        }
    }

    let mut summary = Summary::new();
    for tip in &tips {
        match run_trial(args, &tree, &alignment, tip) {
            Ok(failed) => summary.num_failed += failed,
            Err(error) => match args.keep_going {
                true => {
                    warn!("Trial for {:?} failed: {error}", tip.label);
                    summary.num_failed += 1;
                }
                false => Err(error)?,
            },
        }
        summary.num_run += 1;
    }

    println!("{summary}");
    summary.write(&args.output_dir.join("summary.json"))?;
    Ok(summary)
}

/// Runs a single leave-one-out trial and returns the number of failed comparisons.
fn run_trial(
    args: &RunArgs,
    tree: &Phylogeny,
    alignment: &Alignment,
    tip: &Node,
) -> Result<usize, Report> {
    let taxon = &tip.label;
    info!("Running leave-one-out trial for {taxon:?}");

    // prune the taxon from a copy of the reference tree
    let pruned = tree.prune(tip)?.unroot()?;

    let workdir = args.output_dir.join(taxon);
    if !workdir.exists() {
        std::fs::create_dir_all(&workdir)
            .wrap_err_with(|| format!("Failed to create working directory: {workdir:?}"))?;
    }

    let tree_path = workdir.join(TREE_FILE_NAME);
    std::fs::write(&tree_path, pruned.to_newick()?)
        .wrap_err_with(|| format!("Failed to write pruned tree: {tree_path:?}"))?;

    let alignment_path = match args.prune_alignment {
        true => {
            let path = workdir.join(ALIGNMENT_FILE_NAME);
            alignment.without(taxon).write(&path)?;
            path
        }
        false => args.alignment.clone(),
    };

    // re-estimate branch lengths on the pruned topology
    let params: Vec<OsString> = vec![
        "-f".into(),
        "v".into(),
        "-s".into(),
        alignment_path.clone().into_os_string(),
        "-t".into(),
        tree_path.clone().into_os_string(),
        "-n".into(),
        args.run_name.clone().into(),
        "-m".into(),
        args.model.clone().into(),
        "-w".into(),
        workdir.clone().into_os_string(),
    ];
    let code = tools::execute(&args.estimator, &params, true)?;
    if code != 0 {
        warn!("The estimator exited with code {code} for {taxon:?}");
    }

    // place the pruned taxon's sequence back onto the pruned tree
    let params: Vec<OsString> = vec![
        tree_path.clone().into_os_string(),
        alignment_path.into_os_string(),
        "-oO".into(),
        "-w".into(),
        workdir.clone().into_os_string(),
    ];
    let code = tools::execute(&args.placement, &params, true)?;
    if code != 0 {
        warn!("The placement tool exited with code {code} for {taxon:?}");
    }

    let results = tools::placement_results(&workdir)?;
    if results.len() != PLACEMENTS_PER_TRIAL {
        Err(eyre!(
            "Expected {PLACEMENTS_PER_TRIAL} placement results in {workdir:?}, found {}.",
            results.len()
        )
        .suggestion("A tool may have failed, or stale .jplace files remain from a previous run."))?
    }

    // the comparison script's exit code is the number of failed comparisons
    let mut params: Vec<OsString> = vec!["-v".into()];
    params.extend(results.into_iter().map(PathBuf::into_os_string));
    let failed = tools::execute(&args.compare, &params, false)?;

    Ok(failed.max(0) as usize)
}

#[cfg(test)]
mod tests;
