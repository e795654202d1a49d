//! The compilation log: reporting policy and output.
//!
//! Every reported diagnostic first passes the handler stack, most recently
//! pushed handler first. What survives reaches the default policy:
//!
//! ```text
//! Fragment  never reported directly (panics)
//! Note      needs warnings enabled or MANDATORY, and notes not suppressed
//! Warning   needs warnings enabled or MANDATORY, and its lint category on
//!           unless MANDATORY; then counted against max_warnings
//! Error     dropped when (file, position) or, for SOURCE_LEVEL errors,
//!           (file, chain of keys) was seen before, unless API; then
//!           counted against max_errors
//! ```
//!
//! Over budget, diagnostics are counted as suppressed and not written.
//! Counters change before anything is written.

mod handler;
mod writer;

use std::io::Write;
use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::config::{FormatterConfig, LogConfig, Options};
use crate::diagnostic::{
    DiagArg, Diagnostic, DiagnosticFactory, DiagnosticFlags, DiagnosticPosition, DiagnosticType,
    LintCategory,
};
use crate::formatter::{BasicFormatter, DiagnosticFormatter, FormatterRegistry};
use crate::messages::Messages;
use crate::source::{DiagnosticSource, FileObject, SourceCache, SourceError};

pub use handler::{
    DeferredDiagnosticHandler, DiagnosticHandler, DiagnosticListener, HandleDiagnostic,
    HandlerToken,
};
pub use writer::{SharedWriter, WriterKind};
use writer::Writers;

/// Message keys of an error and of the diagnostics nested in its
/// arguments, depth first.
type CodeChain = SmallVec<[String; 4]>;

/// Reporting policy, counters and output streams for one compilation.
pub struct Log {
    config: LogConfig,
    formatter: Box<dyn DiagnosticFormatter>,
    factory: DiagnosticFactory,
    writers: Writers,
    handlers: Vec<(HandlerToken, DiagnosticHandler)>,
    next_token: u32,
    listener: Option<Box<dyn DiagnosticListener>>,
    source: DiagnosticSource,
    sources: SourceCache,
    /// `(file, preferred position)` of every error that got past dedup.
    recorded: FxHashSet<(String, Option<u32>)>,
    recorded_source_level: FxHashSet<(String, CodeChain)>,
    nerrors: usize,
    nwarnings: usize,
    nsuppressed_errors: usize,
    nsuppressed_warns: usize,
    compressed_output: bool,
}

impl std::fmt::Debug for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Log")
            .field("config", &self.config)
            .field("handlers", &self.handlers)
            .field("source", &self.source.name())
            .field("nerrors", &self.nerrors)
            .field("nwarnings", &self.nwarnings)
            .field("nsuppressed_errors", &self.nsuppressed_errors)
            .field("nsuppressed_warns", &self.nsuppressed_warns)
            .finish_non_exhaustive()
    }
}

impl Log {
    pub fn new(config: LogConfig, formatter: Box<dyn DiagnosticFormatter>) -> Self {
        let sources = SourceCache::new(config.source_cache_limit);
        Log {
            config,
            formatter,
            factory: DiagnosticFactory::default(),
            writers: Writers::default(),
            handlers: Vec::new(),
            next_token: 0,
            listener: None,
            source: DiagnosticSource::no_source(),
            sources,
            recorded: FxHashSet::default(),
            recorded_source_level: FxHashSet::default(),
            nerrors: 0,
            nwarnings: 0,
            nsuppressed_errors: 0,
            nsuppressed_warns: 0,
            compressed_output: false,
        }
    }

    /// A log configured from `options`, with the formatter the global
    /// registry selects for them.
    pub fn from_options(options: &Options, messages: Arc<Messages>) -> Self {
        let formatter = FormatterRegistry::global()
            .read()
            .from_options(options, Arc::clone(&messages))
            .unwrap_or_else(|| {
                Box::new(BasicFormatter::new(
                    FormatterConfig::from_options(options),
                    messages,
                ))
            });
        Self::new(LogConfig::from_options(options), formatter)
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut LogConfig {
        &mut self.config
    }

    pub fn formatter(&self) -> &dyn DiagnosticFormatter {
        &*self.formatter
    }

    pub fn set_formatter(&mut self, formatter: Box<dyn DiagnosticFormatter>) {
        self.formatter = formatter;
    }

    pub fn factory(&self) -> &DiagnosticFactory {
        &self.factory
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn DiagnosticListener>>) {
        self.listener = listener;
    }

    // --- Counters ---

    pub fn nerrors(&self) -> usize {
        self.nerrors
    }

    pub fn nwarnings(&self) -> usize {
        self.nwarnings
    }

    pub fn nsuppressed_errors(&self) -> usize {
        self.nsuppressed_errors
    }

    pub fn nsuppressed_warns(&self) -> usize {
        self.nsuppressed_warns
    }

    /// Whether any reported diagnostic was a compressed form.
    pub fn compressed_output(&self) -> bool {
        self.compressed_output
    }

    // --- Sources ---

    /// Make `file` the current source. Returns the previous file.
    pub fn use_source(&mut self, file: Option<Rc<dyn FileObject>>) -> Option<Rc<dyn FileObject>> {
        let previous = self.source.file().cloned();
        self.source = match file {
            Some(file) => self.sources.get(&file),
            None => DiagnosticSource::no_source(),
        };
        previous
    }

    pub fn current_source(&self) -> &DiagnosticSource {
        &self.source
    }

    /// The cached source for `file`.
    pub fn source(&mut self, file: &Rc<dyn FileObject>) -> DiagnosticSource {
        self.sources.get(file)
    }

    /// Whether an error was reported at `pos` in the current source.
    pub fn has_error_on(&self, pos: u32) -> bool {
        match self.source.name() {
            Some(name) => self.recorded.contains(&(name.to_owned(), Some(pos))),
            None => false,
        }
    }

    // --- Handler stack ---

    /// Install `handler` on top of the stack.
    pub fn push_handler(&mut self, handler: DiagnosticHandler) -> HandlerToken {
        let token = HandlerToken(self.next_token);
        self.next_token += 1;
        self.handlers.push((token, handler));
        token
    }

    /// Remove the top handler, which must be the one `token` names.
    ///
    /// # Panics
    /// Panics if `token` is not on top of the stack.
    pub fn pop_handler(&mut self, token: HandlerToken) -> DiagnosticHandler {
        match self.handlers.pop() {
            Some((top, handler)) if top == token => handler,
            Some((top, _)) => panic!("popping handler {token:?}, but {top:?} is on top"),
            None => panic!("popping handler {token:?} from an empty stack"),
        }
    }

    // --- Reporting ---

    /// Route `d` through the handler stack and the default policy.
    pub fn report(&mut self, d: Diagnostic) {
        let source = d.source().clone();
        let mut current = Some(d);
        for (_, handler) in self.handlers.iter_mut().rev() {
            current = current.and_then(|d| handler.handle(d));
        }
        if let Some(d) = current {
            self.default_report(d);
        }
        self.report_load_error(&source);
    }

    pub fn error(&mut self, pos: Option<DiagnosticPosition>, key: &str, args: Vec<DiagArg>) {
        self.error_with_flags(DiagnosticFlags::empty(), pos, key, args);
    }

    pub fn error_with_flags(
        &mut self,
        flags: DiagnosticFlags,
        pos: Option<DiagnosticPosition>,
        key: &str,
        args: Vec<DiagArg>,
    ) {
        let d = self.factory.error(flags, self.source.clone(), pos, key, args);
        self.report(d);
    }

    pub fn warning(
        &mut self,
        lint: Option<LintCategory>,
        pos: Option<DiagnosticPosition>,
        key: &str,
        args: Vec<DiagArg>,
    ) {
        let d = self.factory.warning(lint, self.source.clone(), pos, key, args);
        self.report(d);
    }

    pub fn mandatory_warning(
        &mut self,
        lint: Option<LintCategory>,
        pos: Option<DiagnosticPosition>,
        key: &str,
        args: Vec<DiagArg>,
    ) {
        let d = self
            .factory
            .mandatory_warning(lint, self.source.clone(), pos, key, args);
        self.report(d);
    }

    pub fn note(&mut self, pos: Option<DiagnosticPosition>, key: &str, args: Vec<DiagArg>) {
        let d = self.factory.note(self.source.clone(), pos, key, args);
        self.report(d);
    }

    /// A positionless note about `file`, shown even with warnings off.
    pub fn mandatory_note(
        &mut self,
        file: Option<&Rc<dyn FileObject>>,
        key: &str,
        args: Vec<DiagArg>,
    ) {
        let source = self.source_or_none(file);
        let d = self.factory.mandatory_note(source, key, args);
        self.report(d);
    }

    fn source_or_none(&mut self, file: Option<&Rc<dyn FileObject>>) -> DiagnosticSource {
        match file {
            Some(file) => self.sources.get(file),
            None => DiagnosticSource::no_source(),
        }
    }

    /// Unformatted error at `pos` in the current source. Obeys the error
    /// budget and position dedup, but no handler.
    pub fn raw_error(&mut self, pos: Option<u32>, msg: &str) {
        let under_budget = self.nerrors < self.config.max_errors;
        let fresh = under_budget
            && match self.source.name() {
                Some(name) => self.recorded.insert((name.to_owned(), pos)),
                None => true,
            };
        if fresh {
            self.nerrors += 1;
            self.print_raw_diagnostic(WriterKind::Error, "error: ", pos, msg);
        } else {
            self.nsuppressed_errors += 1;
        }
        self.flush(WriterKind::Error);
        self.report_current_load_error();
    }

    /// Unformatted warning at `pos` in the current source.
    pub fn raw_warning(&mut self, pos: Option<u32>, msg: &str) {
        if !self.config.emit_warnings {
            return;
        }
        if self.nwarnings < self.config.max_warnings {
            self.nwarnings += 1;
            self.print_raw_diagnostic(WriterKind::Warning, "warning: ", pos, msg);
        } else {
            self.nsuppressed_warns += 1;
        }
        self.flush(WriterKind::Warning);
        self.report_current_load_error();
    }

    fn report_current_load_error(&mut self) {
        let source = self.source.clone();
        self.report_load_error(&source);
    }

    fn report_load_error(&mut self, source: &DiagnosticSource) {
        if let Some(SourceError::Unreadable { file, reason }) = source.take_load_error() {
            let d = self.factory.error(
                DiagnosticFlags::NON_DEFERRABLE,
                DiagnosticSource::no_source(),
                None,
                "error.reading.file",
                vec![DiagArg::Text(file), DiagArg::Text(reason)],
            );
            self.report(d);
        }
    }

    fn default_report(&mut self, d: Diagnostic) {
        match d.dtype() {
            DiagnosticType::Fragment => {
                panic!("fragment {} reported directly", d.code());
            }
            DiagnosticType::Note => {
                if (self.config.emit_warnings || d.is_mandatory()) && !self.config.suppress_notes {
                    self.write_diagnostic(&d);
                } else {
                    suppressed(&d, "notes disabled");
                }
            }
            DiagnosticType::Warning => {
                let lint_off = d
                    .lint_category()
                    .is_some_and(|lint| !self.config.is_lint_enabled(lint));
                if !(self.config.emit_warnings || d.is_mandatory()) {
                    suppressed(&d, "warnings disabled");
                } else if lint_off && !d.is_mandatory() {
                    suppressed(&d, "lint category disabled");
                } else if self.nwarnings < self.config.max_warnings {
                    self.nwarnings += 1;
                    self.write_diagnostic(&d);
                } else {
                    self.nsuppressed_warns += 1;
                    suppressed(&d, "warning budget exhausted");
                }
            }
            DiagnosticType::Error => {
                if d.is_flag_set(DiagnosticFlags::API) || self.should_report(&d) {
                    if self.nerrors < self.config.max_errors {
                        self.nerrors += 1;
                        self.write_diagnostic(&d);
                    } else {
                        self.nsuppressed_errors += 1;
                        suppressed(&d, "error budget exhausted");
                    }
                }
            }
        }
        if d.is_flag_set(DiagnosticFlags::COMPRESSED) {
            self.compressed_output = true;
        }
    }

    /// Position dedup, then chain dedup for source-level errors. Records
    /// what it lets through.
    fn should_report(&mut self, d: &Diagnostic) -> bool {
        let Some(name) = d.source().name() else {
            return true;
        };
        if !self.recorded.insert((name.to_owned(), d.preferred_position())) {
            suppressed(d, "duplicate position");
            return false;
        }
        if !d.is_flag_set(DiagnosticFlags::SOURCE_LEVEL) {
            return true;
        }
        let mut chain = CodeChain::new();
        code_chain(d, &mut chain);
        if self.recorded_source_level.insert((name.to_owned(), chain)) {
            true
        } else {
            suppressed(d, "duplicate source-level error");
            false
        }
    }

    fn write_diagnostic(&mut self, d: &Diagnostic) {
        if let Some(listener) = self.listener.as_mut() {
            listener.report(d);
            return;
        }
        let kind = match d.dtype() {
            DiagnosticType::Note => WriterKind::Notice,
            DiagnosticType::Warning => WriterKind::Warning,
            DiagnosticType::Error => WriterKind::Error,
            DiagnosticType::Fragment => panic!("fragment {} written directly", d.code()),
        };
        let text = self.formatter.format(d);
        self.print_raw_lines(kind, &text);
        self.flush(kind);
    }

    // --- Plain output ---

    /// Write `msg` line by line. A trailing newline adds no empty line.
    pub fn print_raw_lines(&mut self, kind: WriterKind, msg: &str) {
        let writer = self.writers.get(kind);
        let mut rest = msg;
        let mut result = Ok(());
        while let Some(nl) = rest.find('\n') {
            result = result.and_then(|()| writeln!(writer, "{}", &rest[..nl]));
            rest = &rest[nl + 1..];
        }
        if !rest.is_empty() {
            result = result.and_then(|()| writeln!(writer, "{rest}"));
        }
        if let Err(error) = result {
            tracing::warn!(?kind, %error, "failed to write diagnostic output");
        }
    }

    /// Write the localized `compiler.misc.<key>` message.
    pub fn print_lines(&mut self, kind: WriterKind, key: &str, args: &[String]) {
        let msg = self
            .formatter
            .messages()
            .localize(&format!("compiler.misc.{key}"), args);
        self.print_raw_lines(kind, &msg);
    }

    fn print_raw_diagnostic(&mut self, kind: WriterKind, prefix: &str, pos: Option<u32>, msg: &str) {
        let located = pos.and_then(|pos| {
            let line = self.source.line_number(pos)?;
            let name = self.source.name()?;
            Some((pos, format!("{name}:{line}: {msg}")))
        });
        match located {
            Some((pos, header)) => {
                self.print_raw_lines(kind, &header);
                self.print_error_line(kind, pos);
            }
            None => self.print_raw_lines(kind, &format!("{prefix}{msg}")),
        }
    }

    /// The current source's line at `pos` with a caret under `pos`.
    fn print_error_line(&mut self, kind: WriterKind, pos: u32) {
        let Some(line) = self.source.line(pos) else {
            return;
        };
        let column = self.source.column_number(pos, false).unwrap_or(1);
        let caret: String = line
            .chars()
            .take(column.saturating_sub(1) as usize)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .chain(std::iter::once('^'))
            .collect();
        self.print_raw_lines(kind, &line);
        self.print_raw_lines(kind, &caret);
    }

    /// `1 error` / `N errors` style count line, nothing for zero.
    pub fn print_count(&mut self, kind: &str, count: usize) {
        if count == 0 {
            return;
        }
        let key = if count == 1 {
            format!("count.{kind}")
        } else {
            format!("count.{kind}.plural")
        };
        self.print_lines(WriterKind::Error, &key, &[count.to_string()]);
        self.flush(WriterKind::Error);
    }

    fn print_suppressed_count(&mut self, shown: usize, suppressed: usize, key: &str) {
        if suppressed == 0 {
            return;
        }
        let total = shown + suppressed;
        self.print_lines(
            WriterKind::Error,
            key,
            &[shown.to_string(), total.to_string()],
        );
        self.flush_all();
    }

    /// End-of-compilation summary: the compressed-output note, error and
    /// warning counts, and how many of each were not shown.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn print_summary(&mut self) {
        if self.compressed_output {
            self.mandatory_note(None, "compressed.diags", Vec::new());
        }
        self.print_count("error", self.nerrors);
        self.print_count("warn", self.nwarnings);
        self.print_suppressed_count(self.nerrors, self.nsuppressed_errors, "count.error.recompile");
        self.print_suppressed_count(self.nwarnings, self.nsuppressed_warns, "count.warn.recompile");
    }

    // --- Streams ---

    pub fn set_writer(&mut self, kind: WriterKind, writer: Box<dyn Write>) {
        self.writers.set(kind, writer);
    }

    /// Bind every stream to clones of `writer`.
    pub fn set_writers<W: Write + Clone + 'static>(&mut self, writer: &W) {
        for kind in WriterKind::ALL {
            self.writers.set(kind, Box::new(writer.clone()));
        }
    }

    pub fn flush(&mut self, kind: WriterKind) {
        if let Err(error) = self.writers.get(kind).flush() {
            tracing::warn!(?kind, %error, "failed to flush");
        }
    }

    pub fn flush_all(&mut self) {
        for kind in WriterKind::ALL {
            self.flush(kind);
        }
    }
}

fn suppressed(d: &Diagnostic, reason: &'static str) {
    tracing::trace!(code = d.code(), reason, "diagnostic suppressed");
}

fn code_chain(d: &Diagnostic, chain: &mut CodeChain) {
    chain.push(d.code().to_owned());
    for arg in d.args() {
        if let DiagArg::Diagnostic(nested) = arg {
            code_chain(nested, chain);
        }
    }
}

#[cfg(test)]
mod tests;
