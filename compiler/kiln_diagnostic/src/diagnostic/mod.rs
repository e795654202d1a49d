//! The diagnostic value type.
//!
//! A [`Diagnostic`] is built once by a [`DiagnosticFactory`] and never
//! changes afterwards, apart from flags the log sets while routing it.
//! Fragments only ever appear nested, as arguments or sub-diagnostics of a
//! reportable diagnostic.

mod args;
mod factory;
mod lint;

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use kiln_ir::List;

use crate::formatter::{standard_formatter, DiagnosticFormatter};
use crate::source::{DiagnosticSource, FileObject};

pub use args::{
    CapturedType, ClassName, DiagArg, IntersectionType, KindName, Renderable, SymbolArg, TypeArg,
    TypeVar, WildcardKind,
};
pub use factory::DiagnosticFactory;
pub use lint::LintCategory;

/// Severity, as encoded in message keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticType {
    Fragment,
    Note,
    Warning,
    Error,
}

impl DiagnosticType {
    /// Key segment: `compiler.<segment>.<name>`.
    pub fn key(self) -> &'static str {
        match self {
            DiagnosticType::Fragment => "misc",
            DiagnosticType::Note => "note",
            DiagnosticType::Warning => "warn",
            DiagnosticType::Error => "err",
        }
    }
}

/// Kind as seen by tools and listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Error,
    Warning,
    MandatoryWarning,
    Note,
    Other,
}

bitflags! {
    /// How the log treats a diagnostic.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DiagnosticFlags: u16 {
        /// Required by the language; aggregated rather than dropped.
        const MANDATORY = 1 << 0;
        /// Deduplicated per file by message-key chain.
        const SOURCE_LEVEL = 1 << 1;
        /// Never held back by a deferring handler.
        const NON_DEFERRABLE = 1 << 2;
        /// Shortened form of a longer diagnostic.
        const COMPRESSED = 1 << 3;
        /// Reported through the tool API; bypasses position dedup.
        const API = 1 << 4;
        /// Error the compiler may recover from.
        const RECOVERABLE = 1 << 5;
        const SYNTAX = 1 << 6;
        const RESOLVE_ERROR = 1 << 7;
        /// Stands for several underlying diagnostics.
        const AGGREGATE = 1 << 8;
    }
}

/// Start, preferred and end character offsets of a diagnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DiagnosticPosition {
    pub start: u32,
    pub preferred: u32,
    pub end: u32,
}

impl DiagnosticPosition {
    /// A single-point position.
    pub fn at(pos: u32) -> Self {
        DiagnosticPosition {
            start: pos,
            preferred: pos,
            end: pos,
        }
    }

    pub fn span(start: u32, preferred: u32, end: u32) -> Self {
        DiagnosticPosition {
            start,
            preferred,
            end,
        }
    }
}

/// One compiler message.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    dtype: DiagnosticType,
    source: DiagnosticSource,
    position: Option<DiagnosticPosition>,
    code: String,
    args: Vec<DiagArg>,
    subdiagnostics: List<Diagnostic>,
    flags: DiagnosticFlags,
    lint: Option<LintCategory>,
    /// Line and tab-expanded column of the preferred position.
    line_column: OnceCell<Option<(u32, u32)>>,
}

impl Diagnostic {
    pub(crate) fn new(
        dtype: DiagnosticType,
        source: DiagnosticSource,
        position: Option<DiagnosticPosition>,
        code: String,
        args: Vec<DiagArg>,
    ) -> Self {
        Diagnostic {
            dtype,
            source,
            position,
            code,
            args,
            subdiagnostics: List::nil(),
            flags: DiagnosticFlags::empty(),
            lint: None,
            line_column: OnceCell::new(),
        }
    }

    pub fn dtype(&self) -> DiagnosticType {
        self.dtype
    }

    pub fn kind(&self) -> Kind {
        match self.dtype {
            DiagnosticType::Note => Kind::Note,
            DiagnosticType::Warning if self.is_mandatory() => Kind::MandatoryWarning,
            DiagnosticType::Warning => Kind::Warning,
            DiagnosticType::Error => Kind::Error,
            DiagnosticType::Fragment => Kind::Other,
        }
    }

    /// Full message key, e.g. `compiler.err.cant.resolve`.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn args(&self) -> &[DiagArg] {
        &self.args
    }

    pub fn source(&self) -> &DiagnosticSource {
        &self.source
    }

    pub fn file(&self) -> Option<&Rc<dyn FileObject>> {
        self.source.file()
    }

    pub fn position(&self) -> Option<DiagnosticPosition> {
        self.position
    }

    pub fn start_position(&self) -> Option<u32> {
        self.position.map(|p| p.start)
    }

    pub fn preferred_position(&self) -> Option<u32> {
        self.position.map(|p| p.preferred)
    }

    pub fn end_position(&self) -> Option<u32> {
        self.position.map(|p| p.end)
    }

    fn line_column(&self) -> Option<(u32, u32)> {
        *self.line_column.get_or_init(|| {
            let pos = self.preferred_position()?;
            let line = self.source.line_number(pos)?;
            let column = self.source.column_number(pos, true)?;
            Some((line, column))
        })
    }

    /// 1-based line of the preferred position.
    pub fn line_number(&self) -> Option<u32> {
        self.line_column().map(|(line, _)| line)
    }

    /// 1-based, tab-expanded column of the preferred position.
    pub fn column_number(&self) -> Option<u32> {
        self.line_column().map(|(_, column)| column)
    }

    pub fn flags(&self) -> DiagnosticFlags {
        self.flags
    }

    pub fn is_flag_set(&self, flag: DiagnosticFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: DiagnosticFlags) {
        self.flags.insert(flag);
    }

    #[must_use]
    pub fn with_flag(mut self, flag: DiagnosticFlags) -> Self {
        self.set_flag(flag);
        self
    }

    pub fn is_mandatory(&self) -> bool {
        self.is_flag_set(DiagnosticFlags::MANDATORY)
    }

    pub fn lint_category(&self) -> Option<LintCategory> {
        self.lint
    }

    #[must_use]
    pub fn with_lint(mut self, lint: Option<LintCategory>) -> Self {
        self.lint = lint;
        self
    }

    pub fn subdiagnostics(&self) -> &List<Diagnostic> {
        &self.subdiagnostics
    }

    pub fn is_multiline(&self) -> bool {
        self.subdiagnostics.non_empty()
    }

    /// This diagnostic with `subdiagnostics` as its detail lines.
    #[must_use]
    pub fn with_subdiagnostics(mut self, subdiagnostics: List<Diagnostic>) -> Self {
        self.subdiagnostics = subdiagnostics;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&standard_formatter().format(self))
    }
}

#[cfg(test)]
mod tests;
