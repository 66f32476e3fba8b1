use crate::cli::{Cli, Command};

use clap::Parser;
use color_eyre::eyre::{Report, Result};

#[test]
fn parse_five_positional_arguments() -> Result<(), Report> {
    let input =
        ["jackknife", "run", "raxmlHPC", "epa-ng", "tree.newick", "alignment.fasta", "output"];
    let args = Cli::parse_from(input);

    let Command::Run(args) = args.command;
    assert_eq!(args.estimator.to_str(), Some("raxmlHPC"));
    assert_eq!(args.placement.to_str(), Some("epa-ng"));
    assert_eq!(args.tree.to_str(), Some("tree.newick"));
    assert_eq!(args.alignment.to_str(), Some("alignment.fasta"));
    assert_eq!(args.output_dir.to_str(), Some("output"));

    // defaults reproduce the historical behavior
    assert_eq!(args.compare.to_str(), Some("./jplace_compare.py"));
    assert_eq!(args.model, "GTRGAMMA");
    assert_eq!(args.run_name, "leave_one_out");
    assert!(!args.prune_alignment);
    assert!(!args.keep_going);
    Ok(())
}

#[test]
fn reject_incorrect_argument_count() {
    let input = ["jackknife", "run", "raxmlHPC", "epa-ng", "tree.newick", "alignment.fasta"];
    assert!(Cli::try_parse_from(input).is_err());

    let input = ["jackknife", "run"];
    assert!(Cli::try_parse_from(input).is_err());
}
