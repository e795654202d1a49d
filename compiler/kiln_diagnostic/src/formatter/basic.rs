//! Template-driven human-readable formatting.
//!
//! One of three templates is chosen per diagnostic and expanded
//! directive by directive:
//!
//! ```text
//! %b  short file name            %f  full file name
//! %l  line                       %c  column
//! %o  preferred offset           %s  start offset
//! %e  end offset                 %p  kind prefix ("error: ")
//! %t  kind prefix, legacy rules  %m  message
//! %L  lint category ("[name] ")  %_  space
//! %%  percent
//! ```
//!
//! Any other character after `%` is emitted as itself.

use std::sync::Arc;

use super::{
    format_arguments, format_source_line, format_subdiagnostics, indent, DefaultPrinter,
    DiagnosticFormatter, Localize, PositionKind, RenderMessage, TypePrinter,
};
use crate::config::{DiagnosticParts, FormatterConfig, SourcePosition};
use crate::diagnostic::{Diagnostic, DiagnosticType};
use crate::messages::Messages;
use crate::source::FileKind;

/// Human-readable formatter.
#[derive(Debug, Clone)]
pub struct BasicFormatter {
    config: FormatterConfig,
    messages: Arc<Messages>,
}

impl BasicFormatter {
    pub fn new(config: FormatterConfig, messages: Arc<Messages>) -> Self {
        BasicFormatter { config, messages }
    }

    /// Template for `d`: the position template when it has a source and a
    /// position, the class template for a positionless class-file
    /// diagnostic, the no-position template otherwise.
    fn select_format(&self, d: &Diagnostic) -> &str {
        let formats = &self.config.formats;
        match d.file() {
            Some(_) if d.position().is_some() => &formats.pos,
            Some(file) if file.kind() == FileKind::Class => &formats.class,
            _ => &formats.no_pos,
        }
    }

    fn format_meta(&self, c: char, d: &Diagnostic, printer: &dyn TypePrinter) -> String {
        match c {
            'b' => self.format_source(d, false),
            'e' => self.format_position(d, PositionKind::End),
            'f' => self.format_source(d, true),
            'l' => self.format_position(d, PositionKind::Line),
            'c' => self.format_position(d, PositionKind::Column),
            'o' => self.format_position(d, PositionKind::Offset),
            'p' => self.format_kind(d),
            's' => self.format_position(d, PositionKind::Start),
            't' => {
                let use_prefix = match d.dtype() {
                    DiagnosticType::Fragment => false,
                    DiagnosticType::Error => d.position().is_none(),
                    _ => !d.source().is_no_source(),
                };
                if use_prefix {
                    self.format_kind(d)
                } else {
                    String::new()
                }
            }
            'm' => self.render_message(d, printer, 0),
            'L' => match d.lint_category() {
                Some(lint) => self
                    .messages
                    .localize("compiler.warn.lintOption", &[lint.option().to_owned()]),
                None => String::new(),
            },
            '_' => " ".to_owned(),
            _ => c.to_string(),
        }
    }

    fn add_source_line_if_needed(&self, d: &Diagnostic, msg: String) -> String {
        if !self.display_source(d) {
            return msg;
        }
        let source_line = format!(
            "\n{}",
            format_source_line(&self.config, d, self.config.indentation.source)
        );
        match msg.split_once('\n') {
            Some((first, rest)) if self.config.source_position == SourcePosition::AfterSummary => {
                format!("{first}{source_line}\n{rest}")
            }
            _ => msg + &source_line,
        }
    }
}

impl Localize for BasicFormatter {
    fn localize(&self, key: &str, args: &[String]) -> String {
        self.messages.localize(key, args)
    }
}

impl RenderMessage for BasicFormatter {
    fn render_message(&self, d: &Diagnostic, printer: &dyn TypePrinter, depth: usize) -> String {
        let visible = self.config.visible;
        let indentation = self.config.indentation;
        let args = format_arguments(self, d, printer, depth);
        let msg = self.messages.localize(d.code(), &args);
        let mut lines: Vec<&str> = msg.split('\n').collect();
        while lines.len() > 1 && lines.last() == Some(&"") {
            lines.pop();
        }

        let mut buf = String::new();
        let mut current = 0;
        if visible.contains(DiagnosticParts::SUMMARY) {
            current += indentation.summary;
            buf.push_str(&indent(lines[0], current));
        }
        if lines.len() > 1 && visible.contains(DiagnosticParts::DETAILS) {
            current += indentation.details;
            for line in &lines[1..] {
                buf.push('\n');
                buf.push_str(&indent(line, current));
            }
        }
        if d.is_multiline() && visible.contains(DiagnosticParts::SUBDIAGNOSTICS) {
            current += indentation.subdiagnostics;
            for sub in format_subdiagnostics(self, d, printer, depth) {
                buf.push('\n');
                buf.push_str(&indent(&sub, current));
            }
        }
        buf
    }
}

impl DiagnosticFormatter for BasicFormatter {
    fn format(&self, d: &Diagnostic) -> String {
        self.format_with(d, &DefaultPrinter::new(self))
    }

    fn format_with(&self, d: &Diagnostic, printer: &dyn TypePrinter) -> String {
        let format = self.select_format(d);
        let mut buf = String::with_capacity(format.len() + 64);
        let mut chars = format.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '%' if chars.peek().is_some() => {
                    if let Some(meta) = chars.next() {
                        buf.push_str(&self.format_meta(meta, d, printer));
                    }
                }
                _ => buf.push(c),
            }
        }
        self.add_source_line_if_needed(d, buf)
    }

    fn format_message(&self, d: &Diagnostic) -> String {
        self.render_message(d, &DefaultPrinter::new(self), 0)
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
        false
    }
}
