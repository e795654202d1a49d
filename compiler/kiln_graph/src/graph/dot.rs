//! Graphviz `digraph` export.
//!
//! # Example
//!
//! ```text
//! digraph completion {
//! label = "Completion dependencies";
//!   0 [label="A" shape=ellipse style=solid]
//!   1 [label="B" shape=ellipse style=dotted]
//!   0 -> 1 [style=solid]
//! }
//! ```
//!
//! Attribute values have commas removed and braces turned into brackets so
//! rendered type names never break the attribute list.

use std::fmt::Write;

use rustc_hash::FxHashSet;

use super::{DependencyGraph, DependencyKind, NodeId, NodeVisitor};

/// Node payloads that know how to describe themselves in dot output.
pub trait DotAttributes {
    /// Text of the node's `label` attribute.
    fn dot_label(&self) -> String;

    /// Extra attributes, rendered after the label.
    fn dot_attributes(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Renders visited nodes and edges as dot statements.
///
/// Edges whose target was not among the rendered nodes are skipped.
pub struct DotVisitor {
    out: String,
    included: FxHashSet<NodeId>,
}

impl DotVisitor {
    /// Render `nodes` of `graph` as a complete `digraph` block.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    pub fn render<D, K>(
        graph: &DependencyGraph<D, K>,
        nodes: &[NodeId],
        name: &str,
        header: &str,
    ) -> String
    where
        D: DotAttributes,
        K: DependencyKind,
    {
        let mut visitor = DotVisitor {
            out: String::new(),
            included: nodes.iter().copied().collect(),
        };
        let _ = writeln!(visitor.out, "digraph {name} {{");
        let _ = writeln!(visitor.out, "label = {};", quote(header));
        visitor.visit(graph, nodes);
        visitor.out.push_str("}\n");
        visitor.out
    }
}

impl<D: DotAttributes, K: DependencyKind> NodeVisitor<D, K> for DotVisitor {
    fn visit_node(&mut self, graph: &DependencyGraph<D, K>, node: NodeId) {
        let data = graph.data(node);
        let mut attrs = vec![("label", quote(&data.dot_label()))];
        attrs.extend(data.dot_attributes());
        let _ = writeln!(self.out, "  {node} {}", format_properties(&attrs));
    }

    fn visit_dependency(
        &mut self,
        _graph: &DependencyGraph<D, K>,
        kind: K,
        from: NodeId,
        to: NodeId,
    ) {
        if !self.included.contains(&to) {
            return;
        }
        let attrs = [("style", kind.dot_style().to_owned())];
        let _ = writeln!(self.out, "  {from} -> {to} {}", format_properties(&attrs));
    }
}

/// Wrap `s` in double quotes, dropping newlines and escaping quotes.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\n' | '\r' => {}
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn format_properties(attrs: &[(&str, String)]) -> String {
    let body: Vec<String> = attrs
        .iter()
        .map(|(key, value)| {
            let value: String = value
                .chars()
                .filter(|&c| c != ',')
                .map(|c| match c {
                    '{' => '[',
                    '}' => ']',
                    other => other,
                })
                .collect();
            format!("{key}={value}")
        })
        .collect();
    format!("[{}]", body.join(" "))
}
