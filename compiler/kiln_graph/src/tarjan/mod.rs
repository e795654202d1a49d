//! Tarjan's strongly connected components.
//!
//! Linear in nodes plus edges. Each SCC is listed in the order its nodes
//! were popped off the DFS stack (the root last), and SCCs are listed in
//! reverse order of completion, so the SCC containing the first root comes
//! first.
//!
//! # Example
//!
//! ```text
//! A -> B, B -> A, B -> C
//!
//! tarjan(graph, [A]) == [[B, A], [C]]
//! ```

use kiln_ir::{Bits, List, ListBuffer};

use crate::graph::{DependencyGraph, DependencyKind, NodeId};

/// Minimum stack space to keep available before recursing.
const RED_ZONE: usize = 100 * 1024;

/// Stack space allocated when growing.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Per-run scratch state. Rebuilt for every call, so graphs carry no
/// traversal fields of their own.
struct TarjanState<'g, D, K> {
    graph: &'g DependencyGraph<D, K>,
    next_index: u32,
    index: Vec<Option<u32>>,
    lowlink: Vec<u32>,
    /// Nodes currently on the DFS stack.
    active: Bits,
    stack: ListBuffer<NodeId>,
    sccs: List<Vec<NodeId>>,
}

impl<D, K: DependencyKind> TarjanState<'_, D, K> {
    fn strong_connect(&mut self, v: NodeId) {
        let vi = v.index();
        self.index[vi] = Some(self.next_index);
        self.lowlink[vi] = self.next_index;
        self.next_index += 1;
        self.stack.prepend(v);
        self.active.include(vi);

        let graph = self.graph;
        for (_, w) in graph.dependencies(v) {
            let wi = w.index();
            match self.index[wi] {
                None => {
                    ensure_sufficient_stack(|| self.strong_connect(w));
                    self.lowlink[vi] = self.lowlink[vi].min(self.lowlink[wi]);
                }
                Some(w_index) if self.active.is_member(wi) => {
                    self.lowlink[vi] = self.lowlink[vi].min(w_index);
                }
                Some(_) => {}
            }
        }

        if Some(self.lowlink[vi]) == self.index[vi] {
            let mut scc = Vec::new();
            while let Some(n) = self.stack.pop_first() {
                self.active.exclude(n.index());
                scc.push(n);
                if n == v {
                    break;
                }
            }
            tracing::trace!(root = ?v, size = scc.len(), "found strongly connected component");
            self.sccs = self.sccs.prepend(scc);
        }
    }
}

/// Partition every node reachable from `roots` into strongly connected
/// components.
///
/// Roots that were already reached from an earlier root are skipped.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = graph.len()))]
pub fn tarjan<D, K: DependencyKind>(
    graph: &DependencyGraph<D, K>,
    roots: impl IntoIterator<Item = NodeId>,
) -> Vec<Vec<NodeId>> {
    let mut state = TarjanState {
        graph,
        next_index: 0,
        index: vec![None; graph.len()],
        lowlink: vec![0; graph.len()],
        active: Bits::new(),
        stack: ListBuffer::new(),
        sccs: List::nil(),
    };
    for root in roots {
        if state.index[root.index()].is_none() {
            state.strong_connect(root);
        }
    }
    let sccs = std::mem::take(&mut state.sccs);
    sccs.iter().cloned().collect()
}

/// Whether `scc` is a genuine cycle: more than one node, or a node that
/// depends on itself.
pub fn is_cycle<D, K: DependencyKind>(graph: &DependencyGraph<D, K>, scc: &[NodeId]) -> bool {
    match scc {
        [] => false,
        [only] => graph.dependencies(*only).any(|(_, to)| to == *only),
        _ => true,
    }
}
