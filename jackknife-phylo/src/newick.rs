//! Read [Newick](https://en.wikipedia.org/wiki/Newick_format) strings and files into a [`Phylogeny`].

use crate::{Branch, FromNewick, Node, Phylogeny};

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use std::fmt::Debug;
use std::path::Path;

/// Returns a [`Phylogeny`] read from a newick tree file.
pub fn read<P>(path: &P) -> Result<Phylogeny, Report>
where
    P: AsRef<Path> + Debug,
{
    let newick = std::fs::read_to_string(path.as_ref())
        .wrap_err_with(|| format!("Failed to read tree file: {path:?}"))?;
    parse(&newick).wrap_err_with(|| format!("Failed to parse newick tree: {path:?}"))
}

/// Returns a [`Phylogeny`] parsed from a newick [`str`].
///
/// Bracketed comments, including rooting annotations such as `[&R]`, are
/// ignored. Unlabeled internal nodes are assigned unique placeholder labels
/// (`NODE_0`, `NODE_1`, ...), so tip labels starting with `NODE_` are reserved.
///
/// ## Examples
///
/// ```rust
/// use jackknife_phylo::{newick, Node};
/// let phylo = newick::parse("[&R] (A:1,(B:2,C:3):4);")?;
/// assert_eq!(phylo.tips()?, ["A", "B", "C"].map(Node::new).to_vec());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn parse(newick: &str) -> Result<Phylogeny, Report> {
    let stripped = strip_comments(newick);
    let text = stripped.trim().trim_end_matches(';');
    if text.is_empty() {
        Err(eyre!("Newick string is empty."))?
    }

    let mut phylogeny = Phylogeny::new();
    let mut node_i = 0;
    parse_clade(text, None, &mut phylogeny, &mut node_i)?;
    Ok(phylogeny)
}

/// Parses one clade `(children)label:length` and attaches it below `parent`.
fn parse_clade(
    text: &str,
    parent: Option<&Node>,
    phylogeny: &mut Phylogeny,
    node_i: &mut usize,
) -> Result<(), Report> {
    let (inner, rest) = match text.starts_with('(') {
        true => {
            let close = matching_parenthesis(text)?;
            (&text[1..close], text[close + 1..].trim())
        }
        false => ("", text.trim()),
    };
    if rest.contains(&['(', ')', ','][..]) {
        Err(eyre!("Unexpected characters after clade in newick: {rest}"))?
    }

    let mut node = Node::from_newick(rest)?;
    if node.label.is_empty() {
        node = Node::new(format!("NODE_{node_i}"));
        *node_i += 1;
    }
    let branch = Branch::from_newick(rest)?;

    match parent {
        Some(parent) => {
            phylogeny.add_clade(parent.clone(), node.clone(), branch)?;
        }
        None => {
            phylogeny.add_node(node.clone());
        }
    }

    for sibling in split_siblings(inner) {
        parse_clade(sibling, Some(&node), phylogeny, node_i)?;
    }
    Ok(())
}

/// Returns the index of the `)` matching the leading `(`.
fn matching_parenthesis(text: &str) -> Result<usize, Report> {
    let mut depth: usize = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| eyre!("Unbalanced parentheses in newick: {text}"))?;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => (),
        }
    }
    Err(eyre!("Unbalanced parentheses in newick: {text}"))
}

/// Splits clade text on top-level commas.
fn split_siblings(text: &str) -> Vec<&str> {
    let mut siblings = Vec::new();
    let (mut depth, mut start) = (0, 0);
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                siblings.push(&text[start..i]);
                start = i + 1;
            }
            _ => (),
        }
    }
    siblings.push(&text[start..]);
    siblings.into_iter().map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// Removes bracketed comments (ex. the `[&R]` rooting annotation).
fn strip_comments(newick: &str) -> String {
    let mut depth = 0;
    newick
        .chars()
        .filter(|c| match c {
            '[' => {
                depth += 1;
                false
            }
            ']' => {
                depth -= 1;
                false
            }
            _ => depth == 0,
        })
        .collect()
}

#[cfg(test)]
mod tests;
