use crate::sequence::Alignment;
use crate::validate::{run, RunArgs, Summary, ALIGNMENT_FILE_NAME, TREE_FILE_NAME};

use color_eyre::eyre::{Report, Result};
use jackknife_phylo::{newick, Node};
use tempfile::TempDir;

const TREE: &str = "(A:0.1,B:0.2,(C:0.3,D:0.4):0.5);";
const ALIGNMENT: &str = ">A
ACGTACGT
>B
ACCTACGT
>C
ACGTACTT
>D
AGGTACGT
";

// The stub tools take the working directory as their final argument, like the
// real ones, and deposit one .jplace file each.
#[cfg(unix)]
const ESTIMATOR_STUB: &str = "#!/bin/sh
for arg in \"$@\"; do dir=\"$arg\"; done
echo '{}' > \"$dir/RAxML_portableTree.leave_one_out.jplace\"
";
#[cfg(unix)]
const PLACEMENT_STUB: &str = "#!/bin/sh
for arg in \"$@\"; do dir=\"$arg\"; done
echo '{}' > \"$dir/epa_result.jplace\"
";
#[cfg(unix)]
const COMPARE_PASS_STUB: &str = "#!/bin/sh
exit 0
";
#[cfg(unix)]
const COMPARE_FAIL_STUB: &str = "#!/bin/sh
exit 1
";
#[cfg(unix)]
const SILENT_STUB: &str = "#!/bin/sh
exit 0
";

#[cfg(unix)]
fn write_stub(dir: &std::path::Path, name: &str, script: &str) -> Result<std::path::PathBuf, Report> {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, script)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

#[cfg(unix)]
fn setup(tree: &str, alignment: &str, compare_stub: &str) -> Result<(TempDir, RunArgs), Report> {
    let dir = TempDir::new()?;

    let tree_path = dir.path().join("reference.newick");
    std::fs::write(&tree_path, tree)?;
    let alignment_path = dir.path().join("reference.fasta");
    std::fs::write(&alignment_path, alignment)?;
    let output_dir = dir.path().join("output");
    std::fs::create_dir(&output_dir)?;

    let args = RunArgs {
        estimator: write_stub(dir.path(), "estimator.sh", ESTIMATOR_STUB)?,
        placement: write_stub(dir.path(), "placement.sh", PLACEMENT_STUB)?,
        tree: tree_path,
        alignment: alignment_path,
        output_dir,
        compare: write_stub(dir.path(), "compare.sh", compare_stub)?,
        model: "GTRGAMMA".to_string(),
        run_name: "leave_one_out".to_string(),
        prune_alignment: false,
        keep_going: false,
    };
    Ok((dir, args))
}

#[test]
fn summary_display() {
    let summary = Summary { num_run: 4, num_failed: 1 };
    assert_eq!(summary.to_string(), "Failed 1 out of 4 tests");
}

#[test]
#[cfg(unix)]
fn validate_rejects_missing_inputs() -> Result<(), Report> {
    let (_dir, args) = setup(TREE, ALIGNMENT, COMPARE_PASS_STUB)?;
    assert!(args.validate().is_ok());

    let missing = RunArgs { estimator: "does/not/exist".into(), ..args.clone() };
    assert!(missing.validate().is_err());

    let missing = RunArgs { output_dir: "does/not/exist".into(), ..args.clone() };
    assert!(missing.validate().is_err());

    // a directory is not a valid executable path
    let missing = RunArgs { placement: args.output_dir.clone(), ..args.clone() };
    assert!(missing.validate().is_err());
    Ok(())
}

#[test]
#[cfg(unix)]
fn run_four_taxa_all_pass() -> Result<(), Report> {
    let (_dir, args) = setup(TREE, ALIGNMENT, COMPARE_PASS_STUB)?;
    let summary = run(&args)?;
    assert_eq!(summary, Summary { num_run: 4, num_failed: 0 });

    for taxon in ["A", "B", "C", "D"] {
        let workdir = args.output_dir.join(taxon);

        // the pruned tree has 3 tips and does not contain the taxon
        let pruned = newick::read(&workdir.join(TREE_FILE_NAME))?;
        let tips = pruned.tips()?;
        assert_eq!(tips.len(), 3);
        assert!(!tips.contains(&Node::new(taxon)));

        // exactly two placement results per trial
        let results = crate::tools::placement_results(&workdir)?;
        assert_eq!(results.len(), 2);
    }

    assert!(args.output_dir.join("summary.json").is_file());
    Ok(())
}

#[test]
#[cfg(unix)]
fn run_sums_comparison_exit_codes() -> Result<(), Report> {
    let (_dir, args) = setup(TREE, ALIGNMENT, COMPARE_FAIL_STUB)?;
    let summary = run(&args)?;
    assert_eq!(summary, Summary { num_run: 4, num_failed: 4 });
    Ok(())
}

#[test]
#[cfg(unix)]
fn run_pruned_alignment_excludes_taxon() -> Result<(), Report> {
    let (_dir, args) = setup(TREE, ALIGNMENT, COMPARE_PASS_STUB)?;
    let args = RunArgs { prune_alignment: true, ..args };
    let summary = run(&args)?;
    assert_eq!(summary.num_run, 4);

    for taxon in ["A", "B", "C", "D"] {
        let alignment = Alignment::read(&args.output_dir.join(taxon).join(ALIGNMENT_FILE_NAME))?;
        assert_eq!(alignment.records.len(), 3);
        assert!(!alignment.contains(taxon));
    }
    Ok(())
}

#[test]
#[cfg(unix)]
fn run_aborts_on_unexpected_result_count() -> Result<(), Report> {
    let (dir, args) = setup(TREE, ALIGNMENT, COMPARE_PASS_STUB)?;
    // an estimator that deposits no .jplace file leaves one result per trial
    let args =
        RunArgs { estimator: write_stub(dir.path(), "silent.sh", SILENT_STUB)?, ..args };
    assert!(run(&args).is_err());
    Ok(())
}

#[test]
#[cfg(unix)]
fn run_keep_going_isolates_structural_failures() -> Result<(), Report> {
    let (dir, args) = setup(TREE, ALIGNMENT, COMPARE_PASS_STUB)?;
    let args = RunArgs {
        estimator: write_stub(dir.path(), "silent.sh", SILENT_STUB)?,
        keep_going: true,
        ..args
    };
    let summary = run(&args)?;
    assert_eq!(summary, Summary { num_run: 4, num_failed: 4 });
    Ok(())
}

#[test]
#[cfg(unix)]
fn run_rejects_tip_missing_from_alignment() -> Result<(), Report> {
    // no sequence for D
    let alignment = ">A\nACGTACGT\n>B\nACCTACGT\n>C\nACGTACTT\n";
    let (_dir, args) = setup(TREE, alignment, COMPARE_PASS_STUB)?;
    assert!(run(&args).is_err());

    // fatal before any trial, even with --keep-going
    let args = RunArgs { keep_going: true, ..args };
    assert!(run(&args).is_err());
    assert!(!args.output_dir.join("A").exists());
    Ok(())
}

#[test]
#[cfg(unix)]
fn run_rejects_small_trees() -> Result<(), Report> {
    let alignment = ">A\nACGTACGT\n>B\nACCTACGT\n>C\nACGTACTT\n";
    let (_dir, args) = setup("(A:1,B:2,C:3);", alignment, COMPARE_PASS_STUB)?;
    assert!(run(&args).is_err());
    Ok(())
}
