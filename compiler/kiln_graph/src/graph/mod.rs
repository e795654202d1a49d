//! Arena-backed directed graphs with kinded edges.
//!
//! Nodes are stored in a flat arena and addressed by [`NodeId`]. Each node
//! keeps its outgoing dependencies in insertion order; every edge carries a
//! [`DependencyKind`] that algorithms may group or filter by.

mod dot;
mod visitor;

use std::fmt;
use std::hash::Hash;

use smallvec::SmallVec;

pub use dot::{DotAttributes, DotVisitor};
pub use visitor::NodeVisitor;

/// Handle to a node in a [`DependencyGraph`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Arena index of this node.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag carried by every edge.
pub trait DependencyKind: Copy + Eq + Hash + fmt::Debug {
    /// Dot `style` attribute used when rendering edges of this kind.
    fn dot_style(&self) -> &'static str;
}

struct Node<D, K> {
    data: D,
    deps: SmallVec<[(K, NodeId); 4]>,
}

/// A directed graph whose edges are tagged with a dependency kind.
pub struct DependencyGraph<D, K> {
    nodes: Vec<Node<D, K>>,
}

impl<D, K: DependencyKind> DependencyGraph<D, K> {
    /// Create an empty graph.
    pub fn new() -> Self {
        DependencyGraph { nodes: Vec::new() }
    }

    /// Add a node carrying `data`.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn add_node(&mut self, data: D) -> NodeId {
        let id = match u32::try_from(self.nodes.len()) {
            Ok(id) => NodeId(id),
            Err(_) => panic!("dependency graph exceeded u32::MAX nodes"),
        };
        self.nodes.push(Node {
            data,
            deps: SmallVec::new(),
        });
        id
    }

    /// Add an edge `from -> to`. Returns `false` if it already existed.
    pub fn add_dependency(&mut self, from: NodeId, kind: K, to: NodeId) -> bool {
        let deps = &mut self.nodes[from.index()].deps;
        if deps.contains(&(kind, to)) {
            return false;
        }
        deps.push((kind, to));
        true
    }

    /// Remove the edge `from -> to` of `kind`. Returns `false` if absent.
    pub fn remove_dependency(&mut self, from: NodeId, kind: K, to: NodeId) -> bool {
        let deps = &mut self.nodes[from.index()].deps;
        match deps.iter().position(|&e| e == (kind, to)) {
            Some(i) => {
                deps.remove(i);
                true
            }
            None => false,
        }
    }

    /// Outgoing edges of `id`, in insertion order.
    pub fn dependencies(&self, id: NodeId) -> impl Iterator<Item = (K, NodeId)> + '_ {
        self.nodes[id.index()].deps.iter().copied()
    }

    /// Targets of the outgoing edges of `id` with the given kind.
    pub fn dependencies_by_kind(&self, id: NodeId, kind: K) -> impl Iterator<Item = NodeId> + '_ {
        self.dependencies(id)
            .filter(move |&(k, _)| k == kind)
            .map(|(_, to)| to)
    }

    /// Distinct edge kinds leaving `id`, in order of first appearance.
    pub fn dependency_kinds(&self, id: NodeId) -> SmallVec<[K; 4]> {
        let mut kinds = SmallVec::new();
        for (kind, _) in self.dependencies(id) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// Payload of `id`.
    pub fn data(&self, id: NodeId) -> &D {
        &self.nodes[id.index()].data
    }

    /// Mutable payload of `id`.
    pub fn data_mut(&mut self, id: NodeId) -> &mut D {
        &mut self.nodes[id.index()].data
    }

    /// Every node id, in insertion order.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "add_node keeps the arena within u32 range"
    )]
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<D, K: DependencyKind> Default for DependencyGraph<D, K> {
    fn default() -> Self {
        Self::new()
    }
}
