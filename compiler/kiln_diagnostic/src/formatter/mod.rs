//! Diagnostic formatters.
//!
//! Three strategies implement [`DiagnosticFormatter`]:
//! - [`BasicFormatter`]: human-readable output driven by a small template
//!   language (see [`basic`](BasicFormatter))
//! - [`RawFormatter`]: stable, locale-independent output for golden files
//! - [`RichFormatter`]: wraps either of the above, shortens class names and
//!   explains type variables in trailing "where" clauses
//!
//! The helpers in this module hold the rendering rules the strategies
//! share: argument dispatch, nested sub-diagnostics with depth and length
//! limits, indentation, and the source line with its caret.

mod basic;
mod printer;
mod raw;
mod registry;
mod rich;

use std::sync::{Arc, OnceLock};

use crate::config::{DiagnosticParts, FormatterConfig};
use crate::diagnostic::{DiagArg, Diagnostic, DiagnosticType};
use crate::messages::Messages;

pub use basic::BasicFormatter;
pub use printer::{
    default_visit_captured, default_visit_intersection, DefaultPrinter, Localize, TypePrinter,
    CAPTURE_ID_MODULUS,
};
pub use raw::RawFormatter;
pub use registry::{FormatterFactory, FormatterRegistry, DEFAULT_FORMATTER};
pub use rich::{RichFormatter, WhereClauseKind};

/// Which position [`DiagnosticFormatter::format_position`] renders.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PositionKind {
    Start,
    End,
    Line,
    Column,
    /// The preferred position.
    Offset,
}

/// Renders diagnostics to text.
pub trait DiagnosticFormatter {
    /// Full rendering: message, sub-diagnostics and, when enabled, the
    /// source line with a caret.
    fn format(&self, d: &Diagnostic) -> String;

    /// Full rendering with `printer` rendering types and symbols.
    fn format_with(&self, d: &Diagnostic, printer: &dyn TypePrinter) -> String;

    /// The message and sub-diagnostics only.
    fn format_message(&self, d: &Diagnostic) -> String;

    /// [`format_message`](Self::format_message) with `printer` rendering
    /// types and symbols.
    fn format_message_with(&self, d: &Diagnostic, printer: &dyn TypePrinter) -> String;

    fn config(&self) -> &FormatterConfig;

    fn messages(&self) -> &Messages;

    /// Localizer used for kinds, kind names and printer keys.
    fn localizer(&self) -> &dyn Localize;

    fn is_raw(&self) -> bool;

    /// Kind prefix such as `error: `. Empty for fragments.
    fn format_kind(&self, d: &Diagnostic) -> String {
        let key = match d.dtype() {
            DiagnosticType::Fragment => return String::new(),
            DiagnosticType::Note => "compiler.note.note",
            DiagnosticType::Warning => "compiler.warn.warning",
            DiagnosticType::Error => "compiler.err.error",
        };
        self.localizer().localize(key, &[])
    }

    /// File name, full or short. `-` when the diagnostic has no file.
    fn format_source(&self, d: &Diagnostic, full_name: bool) -> String {
        match d.file() {
            Some(file) if full_name => file.name().to_owned(),
            Some(file) => file.short_name().to_owned(),
            None => "-".to_owned(),
        }
    }

    /// One position component. Lines and columns that cannot be resolved
    /// render as `-`.
    ///
    /// # Panics
    /// Panics if the diagnostic has no position.
    fn format_position(&self, d: &Diagnostic, kind: PositionKind) -> String {
        let Some(pos) = d.position() else {
            panic!("position requested for a diagnostic without one: {}", d.code());
        };
        let resolved = |n: Option<u32>| n.map_or_else(|| "-".to_owned(), |n| n.to_string());
        match kind {
            PositionKind::Start => pos.start.to_string(),
            PositionKind::End => pos.end.to_string(),
            PositionKind::Offset => pos.preferred.to_string(),
            PositionKind::Line => resolved(d.line_number()),
            PositionKind::Column => resolved(d.column_number()),
        }
    }

    /// Whether the source line is shown for `d`.
    fn display_source(&self, d: &Diagnostic) -> bool {
        self.config().visible.contains(DiagnosticParts::SOURCE)
            && d.dtype() != DiagnosticType::Fragment
            && d.position().is_some()
    }
}

/// Recursive message rendering shared by the basic and raw strategies.
pub(crate) trait RenderMessage: DiagnosticFormatter {
    /// Message of `d`, which sits `depth` levels below the top-level
    /// diagnostic.
    fn render_message(&self, d: &Diagnostic, printer: &dyn TypePrinter, depth: usize) -> String;

    fn render_argument(
        &self,
        d: &Diagnostic,
        arg: &DiagArg,
        printer: &dyn TypePrinter,
        depth: usize,
    ) -> String {
        format_argument(self, d, arg, printer, depth)
    }
}

pub(crate) fn format_arguments<F: RenderMessage + ?Sized>(
    f: &F,
    d: &Diagnostic,
    printer: &dyn TypePrinter,
    depth: usize,
) -> Vec<String> {
    d.args()
        .iter()
        .map(|arg| f.render_argument(d, arg, printer, depth))
        .collect()
}

/// Default rendering of one argument.
pub(crate) fn format_argument<F: RenderMessage + ?Sized>(
    f: &F,
    d: &Diagnostic,
    arg: &DiagArg,
    printer: &dyn TypePrinter,
    depth: usize,
) -> String {
    match arg {
        DiagArg::Diagnostic(nested) => f.render_message(nested, printer, depth + 1),
        DiagArg::List(items) => items
            .iter()
            .map(|item| f.render_argument(d, item, printer, depth))
            .collect::<Vec<_>>()
            .join(","),
        DiagArg::Text(s) => s.clone(),
        DiagArg::Int(n) => n.to_string(),
        DiagArg::Kind(kind) => f
            .localizer()
            .localize(&format!("compiler.misc.{}", kind.key()), &[]),
        DiagArg::File(file) => file.name().to_owned(),
        DiagArg::Type(t) => printer.visit_type(t),
        DiagArg::Symbol(s) => printer.visit_symbol(s),
        DiagArg::Expr { text, .. } => text.clone(),
        DiagArg::Opaque(r) => r.render(f.messages()),
    }
}

/// Rendered sub-diagnostics of `d`, honoring the multiline limits.
pub(crate) fn format_subdiagnostics<F: RenderMessage + ?Sized>(
    f: &F,
    d: &Diagnostic,
    printer: &dyn TypePrinter,
    depth: usize,
) -> Vec<String> {
    let limits = f.config().multiline;
    if limits.depth.is_some_and(|max| depth >= max) {
        return Vec::new();
    }
    d.subdiagnostics()
        .iter()
        .take(limits.length.unwrap_or(usize::MAX))
        .map(|sub| f.render_message(sub, printer, depth + 1))
        .collect()
}

/// Prefix every line of `s` with `n` spaces. Trailing empty lines are
/// dropped.
pub fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    let mut lines: Vec<&str> = s.split('\n').collect();
    if !s.is_empty() {
        while lines.last() == Some(&"") {
            lines.pop();
        }
    }
    lines
        .iter()
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Source line of `d` indented by `n`, followed by a caret line when the
/// caret is enabled. Empty when the line cannot be found.
pub(crate) fn format_source_line(config: &FormatterConfig, d: &Diagnostic, n: usize) -> String {
    let Some(pos) = d.preferred_position() else {
        return String::new();
    };
    let source = d.source();
    let Some(line) = source.line(pos) else {
        return String::new();
    };
    let mut buf = indent(&line, n);
    if config.caret {
        let column = source.column_number(pos, false).unwrap_or(1);
        buf.push('\n');
        buf.extend(
            line.chars()
                .take(column.saturating_sub(1) as usize)
                .map(|c| if c == '\t' { '\t' } else { ' ' }),
        );
        buf.push_str(&indent("^", n));
    }
    buf
}

static STANDARD: OnceLock<BasicFormatter> = OnceLock::new();

/// Process-wide basic formatter used by `Display for Diagnostic`. Built
/// on first use with the default messages and no source lines.
pub fn standard_formatter() -> &'static BasicFormatter {
    STANDARD.get_or_init(|| {
        BasicFormatter::new(FormatterConfig::standard(), Arc::new(Messages::with_defaults()))
    })
}
