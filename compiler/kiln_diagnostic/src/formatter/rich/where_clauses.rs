//! Per-diagnostic bookkeeping for the rich formatter.
//!
//! Before a diagnostic is rendered its arguments are walked once. Every
//! class mentioned is registered with the [`ClassNameSimplifier`]; every
//! type variable, captured type and intersection type gets an explanatory
//! fragment, kept in first-seen order:
//!
//! ```text
//! error: incompatible types: List<CAP#1> cannot be converted to List<T>
//!   where T is a type-variable:
//!     T extends Object declared in class Box
//!   where CAP#1 is a fresh type-variable:
//!     CAP#1 extends Number from capture of ? extends Number
//! ```

use std::rc::Rc;

use kiln_ir::ListBuffer;

use super::simplifier::ClassNameSimplifier;
use crate::config::RichFeatures;
use crate::diagnostic::{
    CapturedType, DiagArg, Diagnostic, DiagnosticFactory, IntersectionType, SymbolArg, TypeArg,
    TypeVar,
};

/// The three kinds of "where" clause, in rendering order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WhereClauseKind {
    TypeVar,
    Captured,
    Intersection,
}

impl WhereClauseKind {
    pub const ALL: [WhereClauseKind; 3] = [
        WhereClauseKind::TypeVar,
        WhereClauseKind::Captured,
        WhereClauseKind::Intersection,
    ];

    /// Key of the clause header, relative to the factory prefix.
    pub fn key(self) -> &'static str {
        match self {
            WhereClauseKind::TypeVar => "where.description.typevar",
            WhereClauseKind::Captured => "where.description.captured",
            WhereClauseKind::Intersection => "where.description.intersection",
        }
    }
}

struct ClauseEntry {
    id: u32,
    /// Printed name, used to tell same-named type variables apart.
    name: String,
    ty: TypeArg,
    fragment: Diagnostic,
}

#[derive(Default)]
struct ClauseTable {
    entries: Vec<ClauseEntry>,
}

impl ClauseTable {
    fn contains(&self, id: u32) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

/// Simplifier and where-clause tables for one diagnostic.
#[derive(Default)]
pub(super) struct RichState {
    pub(super) simplifier: ClassNameSimplifier,
    typevars: ClauseTable,
    captured: ClauseTable,
    intersections: ClauseTable,
}

impl RichState {
    fn table(&self, kind: WhereClauseKind) -> &ClauseTable {
        match kind {
            WhereClauseKind::TypeVar => &self.typevars,
            WhereClauseKind::Captured => &self.captured,
            WhereClauseKind::Intersection => &self.intersections,
        }
    }

    /// 1-based index of `id` among the `kind` entries. Type variables are
    /// numbered among those sharing their name only.
    pub(super) fn index_of(&self, kind: WhereClauseKind, id: u32, name: &str) -> Option<usize> {
        let mut index = 1;
        for entry in &self.table(kind).entries {
            if entry.id == id {
                return Some(index);
            }
            if kind != WhereClauseKind::TypeVar || entry.name == name {
                index += 1;
            }
        }
        None
    }

    /// Whether no other recorded type variable shares `name`.
    pub(super) fn is_unique_typevar(&self, name: &str) -> bool {
        self.typevars.entries.iter().filter(|e| e.name == name).count() <= 1
    }

    /// One clause per non-empty kind: a header fragment listing the
    /// explained types, with one sub-diagnostic per type.
    pub(super) fn clauses(&self, factory: &DiagnosticFactory) -> Vec<Diagnostic> {
        WhereClauseKind::ALL
            .iter()
            .filter_map(|&kind| {
                let entries = &self.table(kind).entries;
                if entries.is_empty() {
                    return None;
                }
                let key = if entries.len() > 1 {
                    format!("{}.1", kind.key())
                } else {
                    kind.key().to_owned()
                };
                let types = entries.iter().map(|e| DiagArg::Type(e.ty.clone())).collect();
                let mut lines = ListBuffer::new();
                for entry in entries {
                    lines.append(entry.fragment.clone());
                }
                Some(
                    factory
                        .fragment(&key, vec![DiagArg::List(types)])
                        .with_subdiagnostics(lines.into_list()),
                )
            })
            .collect()
    }
}

/// Walks a diagnostic tree filling a [`RichState`].
pub(super) struct Preprocessor<'a> {
    pub(super) state: &'a mut RichState,
    pub(super) factory: &'a DiagnosticFactory,
    pub(super) features: RichFeatures,
}

impl Preprocessor<'_> {
    pub(super) fn diagnostic(&mut self, d: &Diagnostic) {
        for arg in d.args() {
            self.argument(arg);
        }
        for sub in d.subdiagnostics() {
            self.diagnostic(sub);
        }
    }

    fn argument(&mut self, arg: &DiagArg) {
        match arg {
            DiagArg::Type(t) => self.ty(t),
            DiagArg::Symbol(s) => self.symbol(s),
            DiagArg::Diagnostic(d) => self.diagnostic(d),
            DiagArg::List(items) => {
                for item in items {
                    self.argument(item);
                }
            }
            _ => {}
        }
    }

    fn types(&mut self, ts: &[TypeArg]) {
        for t in ts {
            self.ty(t);
        }
    }

    fn ty(&mut self, t: &TypeArg) {
        match t {
            TypeArg::Primitive(_) => {}
            TypeArg::Class { name, args } => {
                self.state.simplifier.add_usage(name);
                self.types(args);
            }
            TypeArg::Array(elem) => self.ty(elem),
            TypeArg::TypeVar(tv) => self.type_var(t, tv),
            TypeArg::Captured(c) => self.captured(t, c),
            TypeArg::Wildcard { bound, .. } => {
                if let Some(bound) = bound {
                    self.ty(bound);
                }
            }
            TypeArg::Intersection(i) => self.intersection(t, i),
        }
    }

    fn type_var(&mut self, t: &TypeArg, tv: &Rc<TypeVar>) {
        if self.state.typevars.contains(tv.id) {
            return;
        }
        let bounds = DiagArg::List(tv.bounds.iter().cloned().map(DiagArg::Type).collect());
        let fragment = if tv.synthetic {
            self.factory
                .fragment("where.fresh.typevar", vec![DiagArg::Type(t.clone()), bounds])
        } else {
            let key = if tv.bounds.is_empty() {
                "where.typevar.1"
            } else {
                "where.typevar"
            };
            self.factory.fragment(
                key,
                vec![
                    DiagArg::Type(t.clone()),
                    bounds,
                    DiagArg::Kind(tv.declared_in.kind_name()),
                    DiagArg::Symbol(tv.declared_in.clone()),
                ],
            )
        };
        self.state.typevars.entries.push(ClauseEntry {
            id: tv.id,
            name: tv.name.clone(),
            ty: t.clone(),
            fragment,
        });
        if !tv.synthetic {
            self.symbol(&tv.declared_in);
        }
        self.types(&tv.bounds);
    }

    fn captured(&mut self, t: &TypeArg, c: &Rc<CapturedType>) {
        if !self.features.contains(RichFeatures::WHERE_CLAUSES) {
            self.ty(&c.wildcard);
            return;
        }
        if self.state.captured.contains(c.id) {
            return;
        }
        let (key, lower) = match &c.lower {
            Some(lower) => ("where.captured", DiagArg::Type(lower.clone())),
            None => ("where.captured.1", DiagArg::Text(String::new())),
        };
        let fragment = self.factory.fragment(
            key,
            vec![
                DiagArg::Type(t.clone()),
                DiagArg::Type(c.upper.clone()),
                lower,
                DiagArg::Type(c.wildcard.clone()),
            ],
        );
        self.state.captured.entries.push(ClauseEntry {
            id: c.id,
            name: String::new(),
            ty: t.clone(),
            fragment,
        });
        self.ty(&c.wildcard);
        if let Some(lower) = &c.lower {
            self.ty(lower);
        }
        self.ty(&c.upper);
    }

    fn intersection(&mut self, t: &TypeArg, i: &Rc<IntersectionType>) {
        if self.state.intersections.contains(i.id) {
            return;
        }
        let components = i.components.iter().cloned().map(DiagArg::Type).collect();
        let fragment = self.factory.fragment(
            "where.intersection",
            vec![DiagArg::Type(t.clone()), DiagArg::List(components)],
        );
        self.state.intersections.entries.push(ClauseEntry {
            id: i.id,
            name: String::new(),
            ty: t.clone(),
            fragment,
        });
        self.types(&i.components);
    }

    fn symbol(&mut self, s: &SymbolArg) {
        match s {
            SymbolArg::Class(name) => self.state.simplifier.add_usage(name),
            SymbolArg::Method {
                owner,
                type_params,
                params,
                ..
            } => {
                self.state.simplifier.add_usage(owner);
                self.types(type_params);
                self.types(params);
            }
            SymbolArg::Variable { .. } | SymbolArg::Package(_) => {}
        }
    }
}
