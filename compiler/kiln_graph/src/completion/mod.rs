//! Symbol-completion dependency tracking.
//!
//! While a compiler completes a symbol it may trigger completion of other
//! symbols. [`CompletionDependencies`] records that nesting: each symbol
//! that starts completing is pushed, and an edge tagged with the
//! [`CompletionCause`] is added from the symbol currently on top of the
//! stack. At the end of compilation the graph can be searched for cycles or
//! exported as dot text.

use std::fmt;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::{
    DependencyGraph, DependencyKind, DotAttributes, DotVisitor, NodeId, NodeVisitor,
};
use crate::tarjan::{is_cycle, tarjan};

/// Why a completion was requested. Tags each dependency edge.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CompletionCause {
    ClassReader,
    HeaderPhase,
    HierarchyPhase,
    ImportsPhase,
    MemberEnter,
    MembersPhase,
    RecordPhase,
    Other,
}

impl DependencyKind for CompletionCause {
    fn dot_style(&self) -> &'static str {
        match self {
            CompletionCause::ClassReader => "dotted",
            CompletionCause::Other => "dashed",
            _ => "solid",
        }
    }
}

/// Where a completed symbol came from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CompletionOrigin {
    Source,
    Class,
}

/// Node payload: the symbol and its origin.
#[derive(Clone, Debug)]
pub struct CompletionNode<S> {
    pub sym: S,
    pub origin: CompletionOrigin,
}

impl<S: fmt::Display> DotAttributes for CompletionNode<S> {
    fn dot_label(&self) -> String {
        self.sym.to_string()
    }

    fn dot_attributes(&self) -> Vec<(&'static str, String)> {
        let style = match self.origin {
            CompletionOrigin::Source => "solid",
            CompletionOrigin::Class => "dotted",
        };
        vec![("shape", "ellipse".to_owned()), ("style", style.to_owned())]
    }
}

type CompletionGraph<S> = DependencyGraph<CompletionNode<S>, CompletionCause>;

/// Records which symbol completions triggered which.
pub struct CompletionDependencies<S> {
    graph: CompletionGraph<S>,
    by_sym: FxHashMap<S, NodeId>,
    stack: Vec<NodeId>,
    /// Nodes still shown by `to_dot` and searched by `cycles`. Filtered-out
    /// nodes keep their slot in the graph but lose every edge.
    visible: Vec<NodeId>,
}

impl<S> CompletionDependencies<S>
where
    S: Clone + Eq + Hash + fmt::Display,
{
    /// Create an empty tracker.
    pub fn new() -> Self {
        CompletionDependencies {
            graph: DependencyGraph::new(),
            by_sym: FxHashMap::default(),
            stack: Vec::new(),
            visible: Vec::new(),
        }
    }

    /// Start completing `sym`, recording a dependency from the symbol
    /// currently being completed.
    pub fn push(&mut self, sym: S, origin: CompletionOrigin, cause: CompletionCause) -> NodeId {
        let node = match self.by_sym.get(&sym) {
            Some(&node) => node,
            None => {
                let node = self.graph.add_node(CompletionNode {
                    sym: sym.clone(),
                    origin,
                });
                self.by_sym.insert(sym, node);
                self.visible.push(node);
                node
            }
        };
        if let Some(&current) = self.stack.last() {
            self.graph.add_dependency(current, cause, node);
        }
        self.stack.push(node);
        node
    }

    /// Finish the completion on top of the stack.
    ///
    /// # Panics
    /// Panics if nothing is being completed.
    pub fn pop(&mut self) -> NodeId {
        match self.stack.pop() {
            Some(node) => node,
            None => panic!("completion stack underflow"),
        }
    }

    /// Number of completions in progress.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Node recorded for `sym`, if any.
    pub fn node_for(&self, sym: &S) -> Option<NodeId> {
        self.by_sym.get(sym).copied()
    }

    /// The underlying graph.
    pub fn graph(&self) -> &DependencyGraph<CompletionNode<S>, CompletionCause> {
        &self.graph
    }

    /// Every completion cycle among the visible nodes.
    pub fn cycles(&self) -> Vec<Vec<NodeId>> {
        tarjan(&self.graph, self.visible.iter().copied())
            .into_iter()
            .filter(|scc| is_cycle(&self.graph, scc))
            .collect()
    }

    /// Remove every edge from a node to itself. Returns how many were removed.
    pub fn prune_self_loops(&mut self) -> usize {
        let mut pass = SelfLoopPruner::default();
        let nodes: Vec<NodeId> = self.graph.nodes().collect();
        pass.visit(&self.graph, &nodes);
        self.remove_edges(pass.doomed)
    }

    /// Keep only nodes of the given origin, dropping every edge that touches
    /// a hidden node.
    pub fn filter(&mut self, origin: CompletionOrigin) {
        let mut pass = OriginFilter {
            origin,
            kept: Vec::new(),
            doomed: Vec::new(),
        };
        let nodes: Vec<NodeId> = self.graph.nodes().collect();
        pass.visit(&self.graph, &nodes);
        let removed = self.remove_edges(pass.doomed);
        let kept: FxHashSet<NodeId> = pass.kept.into_iter().collect();
        self.visible.retain(|node| kept.contains(node));
        tracing::debug!(?origin, removed, visible = self.visible.len(), "filtered completion graph");
    }

    fn remove_edges(&mut self, edges: Vec<(NodeId, CompletionCause, NodeId)>) -> usize {
        edges
            .into_iter()
            .filter(|&(from, cause, to)| self.graph.remove_dependency(from, cause, to))
            .count()
    }

    /// Render the visible nodes as a dot `digraph`.
    pub fn to_dot(&self, name: &str, header: &str) -> String {
        DotVisitor::render(&self.graph, &self.visible, name, header)
    }
}

/// Collects edges from a node to itself.
#[derive(Default)]
struct SelfLoopPruner {
    doomed: Vec<(NodeId, CompletionCause, NodeId)>,
}

impl<S> NodeVisitor<CompletionNode<S>, CompletionCause> for SelfLoopPruner {
    fn visit_node(&mut self, _graph: &CompletionGraph<S>, _node: NodeId) {}

    fn visit_dependency(
        &mut self,
        _graph: &CompletionGraph<S>,
        cause: CompletionCause,
        from: NodeId,
        to: NodeId,
    ) {
        if from == to {
            self.doomed.push((from, cause, to));
        }
    }
}

/// Collects nodes of one origin, and every edge touching a node of another.
struct OriginFilter {
    origin: CompletionOrigin,
    kept: Vec<NodeId>,
    doomed: Vec<(NodeId, CompletionCause, NodeId)>,
}

impl<S> NodeVisitor<CompletionNode<S>, CompletionCause> for OriginFilter {
    fn visit_node(&mut self, graph: &CompletionGraph<S>, node: NodeId) {
        if graph.data(node).origin == self.origin {
            self.kept.push(node);
        }
    }

    fn visit_dependency(
        &mut self,
        graph: &CompletionGraph<S>,
        cause: CompletionCause,
        from: NodeId,
        to: NodeId,
    ) {
        if graph.data(from).origin != self.origin || graph.data(to).origin != self.origin {
            self.doomed.push((from, cause, to));
        }
    }
}

impl<S> Default for CompletionDependencies<S>
where
    S: Clone + Eq + Hash + fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
