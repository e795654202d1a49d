use super::*;
use pretty_assertions::assert_eq;

fn complete(deps: &mut CompletionDependencies<&'static str>, path: &[(&'static str, CompletionOrigin)]) {
    for &(sym, origin) in path {
        deps.push(sym, origin, CompletionCause::MemberEnter);
    }
    for _ in path {
        deps.pop();
    }
}

#[test]
fn push_records_edge_from_current() {
    let mut deps = CompletionDependencies::new();
    let a = deps.push("A", CompletionOrigin::Source, CompletionCause::HeaderPhase);
    let b = deps.push("B", CompletionOrigin::Class, CompletionCause::ClassReader);
    assert_eq!(deps.depth(), 2);
    assert_eq!(deps.pop(), b);
    assert_eq!(deps.pop(), a);
    assert_eq!(
        deps.graph().dependencies(a).collect::<Vec<_>>(),
        vec![(CompletionCause::ClassReader, b)]
    );
    assert_eq!(deps.node_for(&"B"), Some(b));
    assert_eq!(deps.node_for(&"C"), None);
}

#[test]
fn repeated_symbol_reuses_node() {
    let mut deps = CompletionDependencies::new();
    complete(&mut deps, &[("A", CompletionOrigin::Source), ("B", CompletionOrigin::Source)]);
    complete(&mut deps, &[("B", CompletionOrigin::Source), ("A", CompletionOrigin::Source)]);
    assert_eq!(deps.graph().len(), 2);

    let cycles = deps.cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].len(), 2);
}

#[test]
fn prune_self_loops_removes_only_loops() {
    let mut deps = CompletionDependencies::new();
    complete(&mut deps, &[("A", CompletionOrigin::Source), ("A", CompletionOrigin::Source)]);
    assert_eq!(deps.cycles().len(), 1);
    assert_eq!(deps.prune_self_loops(), 1);
    assert!(deps.cycles().is_empty());
}

#[test]
#[should_panic(expected = "underflow")]
fn pop_on_empty_panics() {
    let mut deps: CompletionDependencies<&str> = CompletionDependencies::new();
    deps.pop();
}

#[test]
fn filter_by_origin_then_dot() {
    let mut deps = CompletionDependencies::new();
    complete(&mut deps, &[("A", CompletionOrigin::Source), ("B", CompletionOrigin::Class)]);
    complete(&mut deps, &[("A", CompletionOrigin::Source), ("C", CompletionOrigin::Source)]);

    deps.filter(CompletionOrigin::Source);
    let dot = deps.to_dot("completion", "Completion dependencies");
    assert_eq!(
        dot,
        "digraph completion {\n\
         label = \"Completion dependencies\";\n  \
         0 [label=\"A\" shape=ellipse style=solid]\n  \
         0 -> 2 [style=solid]\n  \
         2 [label=\"C\" shape=ellipse style=solid]\n\
         }\n"
    );
}

#[test]
fn filter_removes_cycles_through_hidden_nodes() {
    let mut deps = CompletionDependencies::new();
    complete(&mut deps, &[("A", CompletionOrigin::Source), ("B", CompletionOrigin::Class)]);
    complete(&mut deps, &[("B", CompletionOrigin::Class), ("A", CompletionOrigin::Source)]);
    assert_eq!(deps.cycles().len(), 1);

    deps.filter(CompletionOrigin::Source);
    assert!(deps.cycles().is_empty());
    let b = deps.node_for(&"B");
    assert_eq!(b.map(|b| deps.graph().dependencies(b).count()), Some(0));
}

#[test]
fn filter_keeps_cycles_among_visible_nodes() {
    let mut deps = CompletionDependencies::new();
    complete(
        &mut deps,
        &[
            ("A", CompletionOrigin::Source),
            ("C", CompletionOrigin::Source),
            ("A", CompletionOrigin::Source),
        ],
    );
    complete(&mut deps, &[("A", CompletionOrigin::Source), ("B", CompletionOrigin::Class)]);

    deps.filter(CompletionOrigin::Source);
    let cycles = deps.cycles();
    assert_eq!(cycles.len(), 1);
    let mut names: Vec<&str> = cycles[0].iter().map(|&n| deps.graph().data(n).sym).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["A", "C"]);
}
