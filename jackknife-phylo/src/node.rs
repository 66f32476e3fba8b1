use crate::FromNewick;

use color_eyre::eyre::{Report, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt::{Display, Formatter};
use std::hash::Hash;

/// A [`Node`] in the [`Phylogeny`](crate::Phylogeny) graph, labeled by taxon.
///
/// Tips carry the taxon labels observed in the input tree. Unlabeled internal
/// nodes are assigned unique placeholder labels (`NODE_0`, `NODE_1`, ...) by
/// the [newick parser](crate::newick::parse).
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Node {
    /// [`Node`] label for display and lookup.
    pub label: String,
}

impl Node {
    pub fn new<S>(label: S) -> Self
    where
        S: Into<String>,
    {
        Node { label: label.into() }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl FromNewick for Node {
    /// Returns a [`Node`] created from a [Newick](https://en.wikipedia.org/wiki/Newick_format) node [`str`].
    ///
    /// ## Examples
    ///
    /// Just a node name.
    ///
    /// ```rust
    /// use jackknife_phylo::{FromNewick, Node};
    /// let node = Node::from_newick(&"A;")?;
    /// assert_eq!(node, Node::new("A"));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// A node name with branch attributes.
    ///
    /// ```rust
    /// # use jackknife_phylo::{FromNewick, Node};
    /// let node = Node::from_newick(&"A:2:90")?;
    /// assert_eq!(node, Node::new("A"));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// Branch attributes only, the label is left empty.
    ///
    /// ```rust
    /// # use jackknife_phylo::{FromNewick, Node};
    /// let node = Node::from_newick(&":0.5")?;
    /// assert!(node.label.is_empty());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn from_newick(newick: &str) -> Result<Self, Report> {
        let label = newick.replace(';', "").split(':').next().unwrap_or("").trim().to_string();
        Ok(Node { label })
    }
}
