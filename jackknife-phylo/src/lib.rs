//! `jackknife-phylo` models phylogenetic trees for leave-one-out placement validation.
//!
//! The [`Phylogeny`] is a directed [`petgraph`] graph from the root towards the tips.
//! Trees are read from [Newick](https://en.wikipedia.org/wiki/Newick_format) with
//! [`newick::read`] or [`newick::parse`], pruned one tip at a time with
//! [`Phylogeny::prune`], and written back out with [`ToNewick`].

use color_eyre::eyre::{Report, Result};

mod branch;
pub mod newick;
mod node;
mod phylogeny;

#[doc(inline)]
pub use branch::Branch;
#[doc(inline)]
pub use node::Node;
#[doc(inline)]
pub use phylogeny::Phylogeny;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Returns an object created from a [Newick](https://en.wikipedia.org/wiki/Newick_format) [`str`].
pub trait FromNewick {
    fn from_newick(newick: &str) -> Result<Self, Report>
    where
        Self: Sized;
}

/// Returns a [Newick](https://en.wikipedia.org/wiki/Newick_format) [`String`] created from an object.
pub trait ToNewick {
    fn to_newick(&self) -> Result<String, Report>;
}
