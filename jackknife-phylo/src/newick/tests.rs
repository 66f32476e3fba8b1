use crate::{newick, Node, ToNewick};

use color_eyre::eyre::{Report, Result};

const REFERENCE: &str = "(A:0.1,B:0.2,(C:0.3,(D:0.4,E:0.5):0.6):0.7);";

#[test]
fn parse_tips_in_traversal_order() -> Result<(), Report> {
    let phylo = newick::parse(REFERENCE)?;
    let tips = phylo.tips()?;
    assert_eq!(tips, ["A", "B", "C", "D", "E"].map(Node::new).to_vec());
    Ok(())
}

#[test]
fn parse_write_roundtrip() -> Result<(), Report> {
    let phylo = newick::parse(REFERENCE)?;
    assert_eq!(phylo.to_newick()?, REFERENCE);
    Ok(())
}

#[test]
fn parse_strips_rooting_annotation() -> Result<(), Report> {
    let rooted = format!("[&R] {REFERENCE}");
    let phylo = newick::parse(&rooted)?;
    assert_eq!(phylo.to_newick()?, REFERENCE);
    Ok(())
}

#[test]
fn parse_empty_is_an_error() {
    assert!(newick::parse("").is_err());
    assert!(newick::parse(";").is_err());
}

#[test]
fn parse_unbalanced_is_an_error() {
    assert!(newick::parse("(A,(B,C);").is_err());
    assert!(newick::parse("A,B),C);").is_err());
}

#[test]
fn prune_each_tip_removes_exactly_one() -> Result<(), Report> {
    let phylo = newick::parse(REFERENCE)?;
    let tips = phylo.tips()?;
    for tip in &tips {
        let pruned = phylo.prune(tip)?;
        let pruned_tips = pruned.tips()?;
        assert_eq!(pruned_tips.len(), tips.len() - 1);
        assert!(!pruned_tips.contains(tip));
    }
    Ok(())
}

#[test]
fn prune_internal_node_is_an_error() -> Result<(), Report> {
    let phylo = newick::parse("(A:1,B:2,(C:3,D:4)E:5);")?;
    assert!(phylo.prune(&Node::new("E")).is_err());
    assert!(phylo.prune(&Node::new("missing")).is_err());
    Ok(())
}

#[test]
fn prune_then_unroot_suppresses_bifurcating_root() -> Result<(), Report> {
    // pruning A leaves the root with two children, unroot removes it again
    let phylo = newick::parse("(A:1,B:2,(C:3,D:4):5);")?;
    let pruned = phylo.prune(&Node::new("A"))?.unroot()?;
    assert_eq!(pruned.to_newick()?, "(C:3,D:4,B:7);");
    Ok(())
}
