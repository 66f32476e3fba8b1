use crate::{Branch, Node, ToNewick};

use color_eyre::eyre::{eyre, Report, Result};
use itertools::Itertools;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

/// A rooted or unrooted [`Phylogeny`] of taxa.
///
/// Branches are directed from the root towards the tips, so an "unrooted" tree
/// is simply one whose root node has three or more children. Node labels are
/// assumed to be unique, which holds for tip labels in any sane reference tree
/// and is enforced for internal placeholder labels by the
/// [newick parser](crate::newick::parse).
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Phylogeny {
    /// Directed graph of [`Node`] connected by [`Branch`].
    pub graph: Graph<Node, Branch>,
}

impl Phylogeny {
    /// Returns a new empty [`Phylogeny`].
    pub fn new() -> Self {
        Phylogeny { graph: Graph::new() }
    }

    /// Returns `true` if the phylogeny has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Creates a [`Branch`] from the parent [`Node`] to the child and returns the [`EdgeIndex`].
    ///
    /// Parent and child nodes that are not in the phylogeny yet are created.
    /// An edge that would introduce a cycle is an error.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use jackknife_phylo::{Branch, Node, Phylogeny};
    /// let mut phylo = Phylogeny::new();
    /// phylo.add_clade(Node::new("root"), Node::new("A"), Branch { length: 1.0, confidence: 0.0 })?;
    /// phylo.add_clade(Node::new("root"), Node::new("B"), Branch { length: 2.0, confidence: 0.0 })?;
    /// assert_eq!(phylo.tips()?, vec![Node::new("A"), Node::new("B")]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn add_clade(&mut self, parent: Node, child: Node, branch: Branch) -> Result<EdgeIndex, Report> {
        let parent_index = match self.get_node_index(&parent) {
            Ok(node_index) => node_index,
            Err(_) => self.graph.add_node(parent.clone()),
        };
        let child_index = match self.get_node_index(&child) {
            Ok(node_index) => node_index,
            Err(_) => self.graph.add_node(child.clone()),
        };

        let edge_index = self.graph.update_edge(parent_index, child_index, branch);

        if is_cyclic_directed(&self.graph) {
            Err(eyre!("New branch between {parent} and {child} introduced a cycle."))?
        }

        Ok(edge_index)
    }

    /// Adds a [`Node`] to the phylogeny and returns its [`NodeIndex`].
    ///
    /// If the node already exists, returns the existing [`NodeIndex`].
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        match self.get_node_index(&node) {
            Ok(node_index) => node_index,
            Err(_) => self.graph.add_node(node),
        }
    }

    /// Returns the [`NodeIndex`] of a [`Node`], by label equality.
    pub fn get_node_index(&self, node: &Node) -> Result<NodeIndex, Report> {
        self.graph
            .node_indices()
            .find(|i| self.graph[*i] == *node)
            .ok_or_else(|| eyre!("Node {node} is not in the phylogeny."))
    }

    /// Returns the [`NodeIndex`] of the root, the unique node with no incoming branches.
    pub fn get_root_index(&self) -> Result<NodeIndex, Report> {
        let mut externals = self.graph.externals(Direction::Incoming);
        let root = externals.next().ok_or_else(|| eyre!("The phylogeny has no root node."))?;
        match externals.next() {
            Some(_) => Err(eyre!("The phylogeny has multiple root nodes."))?,
            None => Ok(root),
        }
    }

    /// Returns the tips (leaf nodes) of the phylogeny, in preorder traversal order.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use jackknife_phylo::{newick, Node};
    /// let phylo = newick::parse("(A:1,B:2,(C:3,D:4):5);")?;
    /// let tips = phylo.tips()?;
    /// assert_eq!(tips, ["A", "B", "C", "D"].map(Node::new).to_vec());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn tips(&self) -> Result<Vec<Node>, Report> {
        let root_index = self.get_root_index()?;
        let mut tips = Vec::new();
        let mut stack = vec![root_index];
        while let Some(node_index) = stack.pop() {
            let children = self.get_child_indices(node_index);
            match children.is_empty() {
                true => tips.push(self.graph[node_index].clone()),
                // reversed, so that the first child is popped first
                false => stack.extend(children.into_iter().rev()),
            }
        }
        Ok(tips)
    }

    /// Returns a new [`Phylogeny`] with the requested tip removed.
    ///
    /// The original phylogeny is unmodified. If removing the tip leaves its
    /// former parent with a single child, that parent is suppressed and the
    /// two incident branch lengths are summed.
    ///
    /// ## Examples
    ///
    /// Pruning a tip whose parent keeps two or more children.
    ///
    /// ```rust
    /// use jackknife_phylo::{newick, Node, ToNewick};
    /// let phylo = newick::parse("(A:1,B:2,(C:3,D:4):5);")?;
    /// let pruned = phylo.prune(&Node::new("A"))?;
    /// assert_eq!(pruned.to_newick()?, "(B:2,(C:3,D:4):5);");
    /// assert_eq!(phylo.tips()?.len(), 4);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// Pruning a tip whose parent is left with a single child. The parent is
    /// suppressed and the branch lengths 5 and 3 are merged.
    ///
    /// ```rust
    /// # use jackknife_phylo::{newick, Node, ToNewick};
    /// let phylo = newick::parse("(A:1,B:2,(C:3,D:4):5);")?;
    /// let pruned = phylo.prune(&Node::new("D"))?;
    /// assert_eq!(pruned.to_newick()?, "(A:1,B:2,C:8);");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn prune(&self, tip: &Node) -> Result<Phylogeny, Report> {
        let mut pruned = self.clone();
        let tip_index = pruned.get_node_index(tip)?;
        if !pruned.get_child_indices(tip_index).is_empty() {
            Err(eyre!("Node {tip} is an internal node, only tips can be pruned."))?
        }

        // remember the parent by label, node indices are invalidated by removal
        let parent = pruned
            .graph
            .neighbors_directed(tip_index, Direction::Incoming)
            .next()
            .map(|i| pruned.graph[i].clone());
        pruned.graph.remove_node(tip_index);

        if let Some(parent) = parent {
            pruned.suppress_unifurcation(&parent)?;
        }
        Ok(pruned)
    }

    /// Returns a new [`Phylogeny`] without a bifurcating root.
    ///
    /// A root with exactly two children marks a rooted tree. The internal
    /// child becomes the new root and its sibling is reattached beneath it,
    /// with the two root branch lengths summed. Trees that are already
    /// unrooted, or that have only two tips, are returned unchanged.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use jackknife_phylo::{newick, ToNewick};
    /// let phylo = newick::parse("(B:2,(C:3,D:4):5);")?;
    /// let unrooted = phylo.unroot()?;
    /// assert_eq!(unrooted.to_newick()?, "(C:3,D:4,B:7);");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// ```rust
    /// # use jackknife_phylo::{newick, ToNewick};
    /// let phylo = newick::parse("(A:1,B:2,C:3);")?;
    /// assert_eq!(phylo.unroot()?.to_newick()?, "(A:1,B:2,C:3);");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn unroot(&self) -> Result<Phylogeny, Report> {
        let mut unrooted = self.clone();
        let root_index = unrooted.get_root_index()?;
        let children = unrooted.get_child_indices(root_index);
        if children.len() != 2 {
            return Ok(unrooted);
        }

        // the internal child becomes the new root, a two-tip tree stays rooted
        let new_root_index = match children.iter().find(|i| !unrooted.get_child_indices(**i).is_empty()) {
            Some(index) => *index,
            None => return Ok(unrooted),
        };
        let sibling_index = match children.iter().find(|i| **i != new_root_index) {
            Some(index) => *index,
            None => return Ok(unrooted),
        };

        let new_root = unrooted.graph[new_root_index].clone();
        let sibling = unrooted.graph[sibling_index].clone();
        let root_branch = *unrooted.get_branch(root_index, new_root_index)?;
        let sibling_branch = *unrooted.get_branch(root_index, sibling_index)?;

        unrooted.graph.remove_node(root_index);

        let new_root_index = unrooted.get_node_index(&new_root)?;
        let sibling_index = unrooted.get_node_index(&sibling)?;
        let branch = Branch {
            length: root_branch.length + sibling_branch.length,
            confidence: sibling_branch.confidence,
        };
        unrooted.graph.add_edge(new_root_index, sibling_index, branch);

        Ok(unrooted)
    }

    /// Returns the [`Branch`] between a parent and child [`NodeIndex`].
    fn get_branch(&self, parent: NodeIndex, child: NodeIndex) -> Result<&Branch, Report> {
        let edge_index = self
            .graph
            .find_edge(parent, child)
            .ok_or_else(|| eyre!("No branch between {} and {}.", self.graph[parent], self.graph[child]))?;
        self.graph.edge_weight(edge_index).ok_or_else(|| eyre!("Branch weight is missing."))
    }

    /// Returns the child [`NodeIndex`] of a node, in branch insertion order.
    fn get_child_indices(&self, node_index: NodeIndex) -> Vec<NodeIndex> {
        // neighbors iterate in reverse insertion order
        let mut children: Vec<_> = self.graph.neighbors_directed(node_index, Direction::Outgoing).collect();
        children.reverse();
        children
    }

    /// Removes a node left with a single child, merging the incident branch lengths.
    fn suppress_unifurcation(&mut self, node: &Node) -> Result<(), Report> {
        let node_index = self.get_node_index(node)?;
        let children = self.get_child_indices(node_index);
        if children.len() != 1 {
            return Ok(());
        }
        let child = self.graph[children[0]].clone();
        let child_branch = *self.get_branch(node_index, children[0])?;

        let parent = self
            .graph
            .neighbors_directed(node_index, Direction::Incoming)
            .next()
            .map(|i| self.graph[i].clone());

        match parent {
            // the root itself is a unifurcation, its child becomes the new root
            None => {
                self.graph.remove_node(node_index);
            }
            Some(parent) => {
                let parent_index = self.get_node_index(&parent)?;
                let parent_branch = *self.get_branch(parent_index, node_index)?;
                self.graph.remove_node(node_index);

                let parent_index = self.get_node_index(&parent)?;
                let child_index = self.get_node_index(&child)?;
                let branch = Branch {
                    length: parent_branch.length + child_branch.length,
                    confidence: child_branch.confidence,
                };
                self.graph.add_edge(parent_index, child_index, branch);
            }
        }
        Ok(())
    }

    /// Returns the newick representation of the subtree below a [`NodeIndex`].
    ///
    /// Internal node labels are suppressed, tips are written as `label:length`.
    fn to_newick_subtree(&self, node_index: NodeIndex, branch: Option<&Branch>) -> Result<String, Report> {
        let suffix = match branch {
            Some(branch) => format!(":{}", branch.length),
            None => String::new(),
        };
        let children = self.get_child_indices(node_index);
        match children.is_empty() {
            true => Ok(format!("{}{suffix}", self.graph[node_index])),
            false => {
                let inner = children
                    .into_iter()
                    .map(|child_index| {
                        let branch = self.get_branch(node_index, child_index)?;
                        self.to_newick_subtree(child_index, Some(branch))
                    })
                    .collect::<Result<Vec<_>, Report>>()?
                    .into_iter()
                    .join(",");
                Ok(format!("({inner}){suffix}"))
            }
        }
    }
}

impl ToNewick for Phylogeny {
    /// Returns the [Newick](https://en.wikipedia.org/wiki/Newick_format) [`String`] of the [`Phylogeny`].
    ///
    /// No rooting annotation is written, and internal node labels are suppressed.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use jackknife_phylo::{newick, ToNewick};
    /// let phylo = newick::parse("(A:1,B:2,(C:3,D:4):5);")?;
    /// assert_eq!(phylo.to_newick()?, "(A:1,B:2,(C:3,D:4):5);");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn to_newick(&self) -> Result<String, Report> {
        let root_index = self.get_root_index()?;
        let newick = self.to_newick_subtree(root_index, None)?;
        Ok(format!("{newick};"))
    }
}
