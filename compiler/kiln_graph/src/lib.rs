//! Kiln Graph - dependency graphs and cycle detection.
//!
//! - [`DependencyGraph`]: an arena of nodes with kinded, deduplicated edges
//! - [`NodeVisitor`] / [`DotVisitor`]: traversal and Graphviz export
//! - [`tarjan`]: strongly connected components
//! - [`CompletionDependencies`]: records which symbol completions triggered
//!   which, to report completion cycles

mod completion;
mod graph;
mod tarjan;

pub use completion::{CompletionCause, CompletionDependencies, CompletionNode, CompletionOrigin};
pub use graph::{DependencyGraph, DependencyKind, DotAttributes, DotVisitor, NodeId, NodeVisitor};
pub use tarjan::{is_cycle, tarjan};
