//! Rich formatting: a decorator over a basic or raw formatter.
//!
//! Three independent features, see [`RichFeatures`]:
//! - simple names: `List` instead of `java.util.List` unless two mentioned
//!   classes share the simple name
//! - where clauses: captured and intersection types print as `CAP#n` /
//!   `INT#n` and every type variable is explained after the message
//! - unique type-variable names: two distinct variables named `T` print
//!   as `T#1` and `T#2`
//!
//! All state is rebuilt for each formatted diagnostic. With every feature
//! off the wrapped formatter runs unchanged, its own printer included.

mod simplifier;
mod where_clauses;

use super::{
    default_visit_captured, default_visit_intersection, DiagnosticFormatter, Localize,
    TypePrinter, CAPTURE_ID_MODULUS,
};
use crate::config::{FormatterConfig, Options, RichFeatures};
use crate::diagnostic::{
    CapturedType, ClassName, Diagnostic, DiagnosticFactory, IntersectionType, TypeVar,
};
use crate::messages::Messages;

pub use where_clauses::WhereClauseKind;
use where_clauses::{Preprocessor, RichState};

/// Decorates another formatter with simplified names and where clauses.
pub struct RichFormatter {
    inner: Box<dyn DiagnosticFormatter>,
    features: RichFeatures,
    factory: DiagnosticFactory,
}

impl std::fmt::Debug for RichFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RichFormatter")
            .field("features", &self.features)
            .field("raw", &self.inner.is_raw())
            .finish_non_exhaustive()
    }
}

impl RichFormatter {
    pub fn new(inner: Box<dyn DiagnosticFormatter>, features: RichFeatures) -> Self {
        RichFormatter {
            inner,
            features,
            factory: DiagnosticFactory::default(),
        }
    }

    /// Features from `-XDdiags` style options; none over a raw formatter.
    pub fn from_options(options: &Options, inner: Box<dyn DiagnosticFormatter>) -> Self {
        let features = RichFeatures::from_options(options, inner.is_raw());
        Self::new(inner, features)
    }

    pub fn features(&self) -> RichFeatures {
        self.features
    }

    fn preprocess(&self, d: &Diagnostic) -> RichState {
        let mut state = RichState::default();
        Preprocessor {
            state: &mut state,
            factory: &self.factory,
            features: self.features,
        }
        .diagnostic(d);
        state
    }
}

impl DiagnosticFormatter for RichFormatter {
    #[tracing::instrument(level = "trace", skip_all, fields(code = d.code()))]
    fn format(&self, d: &Diagnostic) -> String {
        if self.features.is_empty() {
            return self.inner.format(d);
        }
        let state = self.preprocess(d);
        let printer = RichPrinter {
            state: &state,
            features: self.features,
            localizer: self.inner.localizer(),
        };
        let mut buf = self.inner.format_with(d, &printer);
        if self.features.contains(RichFeatures::WHERE_CLAUSES) {
            let indent = if self.inner.is_raw() {
                String::new()
            } else {
                " ".repeat(self.inner.config().indentation.details)
            };
            for clause in state.clauses(&self.factory) {
                let text = self.inner.format_with(&clause, &printer);
                if !text.is_empty() {
                    buf.push('\n');
                    buf.push_str(&indent);
                    buf.push_str(&text);
                }
            }
        }
        buf
    }

    /// Where-clause numbering belongs to this formatter, so a caller's
    /// printer is not used.
    fn format_with(&self, d: &Diagnostic, _printer: &dyn TypePrinter) -> String {
        self.format(d)
    }

    fn format_message(&self, d: &Diagnostic) -> String {
        if self.features.is_empty() {
            return self.inner.format_message(d);
        }
        let state = self.preprocess(d);
        let printer = RichPrinter {
            state: &state,
            features: self.features,
            localizer: self.inner.localizer(),
        };
        self.inner.format_message_with(d, &printer)
    }

    fn format_message_with(&self, d: &Diagnostic, _printer: &dyn TypePrinter) -> String {
        self.format_message(d)
    }

    fn config(&self) -> &FormatterConfig {
        self.inner.config()
    }

    fn messages(&self) -> &Messages {
        self.inner.messages()
    }

    fn localizer(&self) -> &dyn Localize {
        self.inner.localizer()
    }

    fn is_raw(&self) -> bool {
        self.inner.is_raw()
    }
}

struct RichPrinter<'a> {
    state: &'a RichState,
    features: RichFeatures,
    localizer: &'a dyn Localize,
}

impl RichPrinter<'_> {
    fn index(&self, kind: WhereClauseKind, id: u32, name: &str) -> String {
        self.state
            .index_of(kind, id, name)
            .map_or_else(|| "-1".to_owned(), |i| i.to_string())
    }
}

impl TypePrinter for RichPrinter<'_> {
    fn localize(&self, key: &str, args: &[String]) -> String {
        self.localizer.localize(key, args)
    }

    /// Where-clause index, or the plain capture id when captures are not
    /// being explained.
    fn captured_var_id(&self, t: &CapturedType) -> String {
        match self.state.index_of(WhereClauseKind::Captured, t.id, "") {
            Some(index) => index.to_string(),
            None => (t.id % CAPTURE_ID_MODULUS).to_string(),
        }
    }

    fn class_name(&self, name: &ClassName, longform: bool) -> String {
        if name.simple().is_empty() || !self.features.contains(RichFeatures::SIMPLE_NAMES) {
            if longform {
                name.qualified()
            } else {
                name.simple().to_owned()
            }
        } else if longform {
            self.state.simplifier.simplify(name)
        } else {
            name.simple().to_owned()
        }
    }

    fn visit_type_var(&self, t: &TypeVar) -> String {
        if self.state.is_unique_typevar(&t.name)
            || !self.features.contains(RichFeatures::UNIQUE_TYPEVAR_NAMES)
        {
            t.name.clone()
        } else {
            let index = self.index(WhereClauseKind::TypeVar, t.id, &t.name);
            self.localize("compiler.misc.type.var", &[t.name.clone(), index])
        }
    }

    fn visit_captured(&self, t: &CapturedType) -> String {
        if self.features.contains(RichFeatures::WHERE_CLAUSES) {
            let index = self.captured_var_id(t);
            self.localize("compiler.misc.captured.type", &[index])
        } else {
            default_visit_captured(self, t)
        }
    }

    fn visit_intersection(&self, t: &IntersectionType) -> String {
        if self.features.contains(RichFeatures::WHERE_CLAUSES) {
            let index = self.index(WhereClauseKind::Intersection, t.id, "");
            self.localize("compiler.misc.intersection.type", &[index])
        } else {
            default_visit_intersection(self, t)
        }
    }

    fn visit_class_symbol(&self, name: &ClassName) -> String {
        if name.simple().is_empty() || !self.features.contains(RichFeatures::SIMPLE_NAMES) {
            name.qualified()
        } else {
            self.state.simplifier.simplify(name)
        }
    }
}
