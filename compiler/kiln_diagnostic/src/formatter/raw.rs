//! Machine-readable formatting for golden-file tests.
//!
//! ```text
//! T.java:3:9: compiler.err.cant.resolve: kindname.variable, x,{(compiler.misc.a),(compiler.misc.b)}
//! T.class:-:-: compiler.warn.some.key
//! - compiler.note.no.source
//! ```
//!
//! Messages are never looked up: a message is its key followed by its
//! rendered arguments.

use std::cell::RefCell;
use std::sync::Arc;

use super::{
    default_visit_captured, format_argument, format_arguments, format_source_line,
    format_subdiagnostics, DiagnosticFormatter, Localize, PositionKind, RenderMessage,
    TypePrinter,
};
use crate::config::{DiagnosticParts, FormatterConfig};
use crate::diagnostic::{CapturedType, DiagArg, Diagnostic};
use crate::messages::Messages;
use crate::source::FileKind;

/// Locale-independent formatter.
#[derive(Debug, Clone)]
pub struct RawFormatter {
    config: FormatterConfig,
    messages: Arc<Messages>,
}

impl RawFormatter {
    pub fn new(config: FormatterConfig, messages: Arc<Messages>) -> Self {
        RawFormatter { config, messages }
    }

    /// `@C` on the diagnostic's own line, `@L:C` otherwise, with `L`
    /// relative to the diagnostic's line.
    fn expression_position(d: &Diagnostic, pos: u32) -> String {
        let source = d.source();
        let expr_line = source.line_number(pos).map_or(0, i64::from);
        let expr_column = source.column_number(pos, false).unwrap_or(0);
        let diag_line = d.line_number().map_or(0, i64::from);
        if expr_line == diag_line {
            format!("@{expr_column}")
        } else {
            format!("@{}:{expr_column}", expr_line - diag_line)
        }
    }
}

impl Localize for RawFormatter {
    fn localize(&self, key: &str, args: &[String]) -> String {
        let mut buf = key.to_owned();
        let mut sep = ": ";
        for arg in args {
            buf.push_str(sep);
            buf.push_str(arg);
            sep = ", ";
        }
        buf
    }
}

impl RenderMessage for RawFormatter {
    fn render_message(&self, d: &Diagnostic, printer: &dyn TypePrinter, depth: usize) -> String {
        let args = format_arguments(self, d, printer, depth);
        let mut buf = self.localize(d.code(), &args);
        if d.is_multiline() && self.config.visible.contains(DiagnosticParts::SUBDIAGNOSTICS) {
            let subs = format_subdiagnostics(self, d, printer, depth);
            if !subs.is_empty() {
                let subs: Vec<String> = subs.into_iter().map(|s| format!("({s})")).collect();
                buf.push_str(",{");
                buf.push_str(&subs.join(","));
                buf.push('}');
            }
        }
        buf
    }

    fn render_argument(
        &self,
        d: &Diagnostic,
        arg: &DiagArg,
        printer: &dyn TypePrinter,
        depth: usize,
    ) -> String {
        match arg {
            DiagArg::Kind(kind) => kind.key().to_owned(),
            DiagArg::Expr { pos, .. } => Self::expression_position(d, *pos),
            DiagArg::File(file) => file.short_name().to_owned(),
            DiagArg::Opaque(r) => r.to_string(),
            DiagArg::Diagnostic(_) => format!("({})", format_argument(self, d, arg, printer, depth)),
            _ => format_argument(self, d, arg, printer, depth),
        }
    }
}

impl DiagnosticFormatter for RawFormatter {
    fn format(&self, d: &Diagnostic) -> String {
        self.format_with(d, &RawPrinter::new(self))
    }

    fn format_with(&self, d: &Diagnostic, printer: &dyn TypePrinter) -> String {
        let mut buf = String::new();
        match d.file() {
            Some(_) if d.position().is_some() => {
                buf.push_str(&self.format_source(d, false));
                buf.push(':');
                buf.push_str(&self.format_position(d, PositionKind::Line));
                buf.push(':');
                buf.push_str(&self.format_position(d, PositionKind::Column));
                buf.push(':');
            }
            Some(file) if file.kind() == FileKind::Class => {
                buf.push_str(&self.format_source(d, false));
                buf.push_str(":-:-:");
            }
            _ => buf.push('-'),
        }
        buf.push(' ');
        buf.push_str(&self.render_message(d, printer, 0));
        if self.display_source(d) {
            buf.push('\n');
            buf.push_str(&format_source_line(&self.config, d, 0));
        }
        buf
    }

    fn format_message(&self, d: &Diagnostic) -> String {
        self.render_message(d, &RawPrinter::new(self), 0)
    }

    fn format_message_with(&self, d: &Diagnostic, printer: &dyn TypePrinter) -> String {
        self.render_message(d, printer, 0)
    }

    fn config(&self) -> &FormatterConfig {
        &self.config
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    fn localizer(&self) -> &dyn Localize {
        self
    }

    fn is_raw(&self) -> bool {
        true
    }
}

/// Numbers captured types by first appearance within one diagnostic, so
/// raw output does not depend on capture ids.
struct RawPrinter<'a> {
    formatter: &'a RawFormatter,
    captured: RefCell<Vec<u32>>,
}

impl<'a> RawPrinter<'a> {
    fn new(formatter: &'a RawFormatter) -> Self {
        RawPrinter {
            formatter,
            captured: RefCell::new(Vec::new()),
        }
    }
}

impl TypePrinter for RawPrinter<'_> {
    fn localize(&self, key: &str, args: &[String]) -> String {
        self.formatter.localize(key, args)
    }

    fn captured_var_id(&self, t: &CapturedType) -> String {
        let captured = self.captured.borrow();
        let index = captured.iter().position(|&id| id == t.id).map_or(0, |i| i + 1);
        index.to_string()
    }

    fn visit_captured(&self, t: &CapturedType) -> String {
        {
            let mut captured = self.captured.borrow_mut();
            if !captured.contains(&t.id) {
                captured.push(t.id);
            }
        }
        default_visit_captured(self, t)
    }
}
