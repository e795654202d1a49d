//! Double-dispatch traversal over a dependency graph.

use super::{DependencyGraph, DependencyKind, NodeId};

/// Visitor over the nodes and edges of a [`DependencyGraph`].
///
/// Implementors see each node once and then each of its outgoing edges,
/// grouped by kind in order of first appearance. The graph does not know
/// what the visitor is for; pruning, filtering and export are all visitors.
pub trait NodeVisitor<D, K: DependencyKind> {
    /// Called once per visited node, before its edges.
    fn visit_node(&mut self, graph: &DependencyGraph<D, K>, node: NodeId);

    /// Called once per outgoing edge of a visited node.
    fn visit_dependency(
        &mut self,
        graph: &DependencyGraph<D, K>,
        kind: K,
        from: NodeId,
        to: NodeId,
    );

    /// Walk `nodes` in order.
    fn visit(&mut self, graph: &DependencyGraph<D, K>, nodes: &[NodeId]) {
        for &node in nodes {
            self.visit_node(graph, node);
            for kind in graph.dependency_kinds(node) {
                for to in graph.dependencies_by_kind(node, kind) {
                    self.visit_dependency(graph, kind, node, to);
                }
            }
        }
    }
}
