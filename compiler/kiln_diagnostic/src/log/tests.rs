use super::*;
use pretty_assertions::assert_eq;

use std::cell::RefCell;

use crate::formatter::RawFormatter;
use crate::source::MemoryFile;

fn raw_log(config: LogConfig) -> (Log, SharedWriter) {
    let formatter = RawFormatter::new(
        FormatterConfig::raw_from_options(&Options::new()),
        Arc::new(Messages::with_defaults()),
    );
    let mut log = Log::new(config, Box::new(formatter));
    let out = SharedWriter::new();
    log.set_writers(&out);
    (log, out)
}

fn log_on(text: &str, config: LogConfig) -> (Log, SharedWriter) {
    let (mut log, out) = raw_log(config);
    log.use_source(Some(Rc::new(MemoryFile::new("T.java", text))));
    (log, out)
}

fn at(pos: u32) -> Option<DiagnosticPosition> {
    Some(DiagnosticPosition::at(pos))
}

struct Recorder(Rc<RefCell<Vec<String>>>);

impl DiagnosticListener for Recorder {
    fn report(&mut self, d: &Diagnostic) {
        self.0.borrow_mut().push(d.code().to_owned());
    }
}

impl HandleDiagnostic for Recorder {
    fn handle(&mut self, d: Diagnostic) -> Option<Diagnostic> {
        self.0.borrow_mut().push(d.code().to_owned());
        if d.dtype() == DiagnosticType::Note {
            None
        } else {
            Some(d)
        }
    }
}

// === Errors ===

#[test]
fn error_budget_counts_suppressed() {
    let config = LogConfig {
        max_errors: 2,
        ..LogConfig::default()
    };
    let (mut log, out) = log_on("a\nb\nc\n", config);
    log.error(at(0), "one", Vec::new());
    log.error(at(2), "two", Vec::new());
    log.error(at(4), "three", Vec::new());

    assert_eq!(
        out.contents(),
        "T.java:1:1: compiler.err.one\nT.java:2:1: compiler.err.two\n"
    );
    assert_eq!(log.nerrors(), 2);
    assert_eq!(log.nsuppressed_errors(), 1);
}

#[test]
fn duplicate_position_is_reported_once() {
    let (mut log, out) = log_on("int x;\n", LogConfig::default());
    log.error(at(4), "first", Vec::new());
    log.error(at(4), "second", Vec::new());

    assert_eq!(out.contents(), "T.java:1:5: compiler.err.first\n");
    assert_eq!(log.nerrors(), 1);
    assert_eq!(log.nsuppressed_errors(), 0);
    assert!(log.has_error_on(4));
    assert!(!log.has_error_on(0));
}

#[test]
fn api_errors_bypass_dedup() {
    let (mut log, _out) = log_on("int x;\n", LogConfig::default());
    log.error(at(4), "first", Vec::new());
    log.error_with_flags(DiagnosticFlags::API, at(4), "again", Vec::new());
    assert_eq!(log.nerrors(), 2);
}

#[test]
fn positionless_errors_dedup_per_file() {
    let (mut log, _out) = log_on("x", LogConfig::default());
    log.error(None, "a", Vec::new());
    log.error(None, "b", Vec::new());
    assert_eq!(log.nerrors(), 1);
}

#[test]
fn source_level_errors_dedup_on_key_chain() {
    let (mut log, out) = log_on("a\nb\nc\n", LogConfig::default());
    let nested = |log: &Log, key: &str| {
        vec![DiagArg::Diagnostic(Box::new(
            log.factory().fragment(key, Vec::new()),
        ))]
    };
    let args = nested(&log, "release");
    log.error_with_flags(DiagnosticFlags::SOURCE_LEVEL, at(0), "feature", args);
    let args = nested(&log, "release");
    log.error_with_flags(DiagnosticFlags::SOURCE_LEVEL, at(2), "feature", args);
    let args = nested(&log, "other");
    log.error_with_flags(DiagnosticFlags::SOURCE_LEVEL, at(4), "feature", args);

    assert_eq!(log.nerrors(), 2);
    assert_eq!(
        out.contents(),
        "T.java:1:1: compiler.err.feature: (compiler.misc.release)\n\
         T.java:3:1: compiler.err.feature: (compiler.misc.other)\n"
    );
}

#[test]
fn errors_without_source_are_never_deduplicated() {
    let (mut log, _out) = raw_log(LogConfig::default());
    log.error(None, "a", Vec::new());
    log.error(None, "a", Vec::new());
    assert_eq!(log.nerrors(), 2);
}

// === Warnings ===

#[test]
fn warning_budget() {
    let config = LogConfig {
        max_warnings: 1,
        ..LogConfig::default()
    };
    let (mut log, out) = log_on("a\nb\n", config);
    log.warning(None, at(0), "w", Vec::new());
    log.warning(None, at(2), "w", Vec::new());

    assert_eq!(out.contents(), "T.java:1:1: compiler.warn.w\n");
    assert_eq!(log.nwarnings(), 1);
    assert_eq!(log.nsuppressed_warns(), 1);
}

#[test]
fn nowarn_drops_warnings_but_not_mandatory_ones() {
    let config = LogConfig {
        emit_warnings: false,
        ..LogConfig::default()
    };
    let (mut log, out) = log_on("a\n", config);
    log.warning(None, at(0), "plain", Vec::new());
    log.mandatory_warning(None, at(0), "forced", Vec::new());

    assert_eq!(out.contents(), "T.java:1:1: compiler.warn.forced\n");
    assert_eq!(log.nwarnings(), 1);
    assert_eq!(log.nsuppressed_warns(), 0);
}

#[test]
fn disabled_lint_drops_non_mandatory_warnings() {
    let mut config = LogConfig::default();
    config.disabled_lints.insert(LintCategory::Unchecked);
    let (mut log, _out) = log_on("a\n", config);
    log.warning(Some(LintCategory::Unchecked), at(0), "u", Vec::new());
    log.warning(Some(LintCategory::RawTypes), at(0), "r", Vec::new());
    log.mandatory_warning(Some(LintCategory::Unchecked), at(0), "m", Vec::new());
    assert_eq!(log.nwarnings(), 2);
}

// === Notes ===

#[test]
fn notes_follow_warning_and_note_switches() {
    let (mut log, out) = log_on("a\n", LogConfig::default());
    log.note(None, "hint", Vec::new());
    assert_eq!(out.contents(), "- compiler.note.hint\n");

    out.clear();
    log.config_mut().emit_warnings = false;
    log.note(None, "hint", Vec::new());
    assert_eq!(out.contents(), "");
    log.mandatory_note(None, "forced", Vec::new());
    assert_eq!(out.contents(), "- compiler.note.forced\n");

    out.clear();
    log.config_mut().suppress_notes = true;
    log.mandatory_note(None, "forced", Vec::new());
    assert_eq!(out.contents(), "");
}

#[test]
#[should_panic(expected = "reported directly")]
fn reporting_a_fragment_panics() {
    let (mut log, _out) = raw_log(LogConfig::default());
    let fragment = log.factory().fragment("f", Vec::new());
    log.report(fragment);
}

// === Handlers ===

#[test]
fn deferred_handler_holds_accepted_diagnostics() {
    let (mut log, out) = log_on("a\nb\n", LogConfig::default());
    let token = log.push_handler(DiagnosticHandler::Deferred(
        DeferredDiagnosticHandler::with_filter(|d| d.dtype() == DiagnosticType::Error),
    ));
    log.error(at(0), "held", Vec::new());
    log.warning(None, at(0), "passed", Vec::new());
    log.error_with_flags(DiagnosticFlags::NON_DEFERRABLE, at(2), "urgent", Vec::new());

    assert_eq!(
        out.contents(),
        "T.java:1:1: compiler.warn.passed\nT.java:2:1: compiler.err.urgent\n"
    );
    assert_eq!(log.nerrors(), 1);

    let Some(mut deferred) = log.pop_handler(token).into_deferred() else {
        panic!("expected the deferred handler back");
    };
    assert_eq!(deferred.diagnostics().len(), 1);
    out.clear();
    deferred.report_deferred(&mut log, |_| true);
    assert_eq!(out.contents(), "T.java:1:1: compiler.err.held\n");
    assert!(deferred.diagnostics().is_empty());
    assert_eq!(log.nerrors(), 2);
}

#[test]
fn report_deferred_keeps_rejected_diagnostics() {
    let (mut log, _out) = log_on("a\n", LogConfig::default());
    let token = log.push_handler(DiagnosticHandler::Deferred(DeferredDiagnosticHandler::new()));
    log.warning(None, at(0), "w", Vec::new());
    log.note(None, "n", Vec::new());
    let Some(mut deferred) = log.pop_handler(token).into_deferred() else {
        panic!("expected the deferred handler back");
    };
    deferred.report_deferred(&mut log, |d| d.dtype() == DiagnosticType::Warning);
    assert_eq!(log.nwarnings(), 1);
    assert_eq!(deferred.diagnostics().len(), 1);
    assert_eq!(deferred.diagnostics()[0].code(), "compiler.note.n");
}

#[test]
fn discard_handler_drops_everything() {
    let (mut log, out) = log_on("a\n", LogConfig::default());
    let token = log.push_handler(DiagnosticHandler::Discard);
    log.error(at(0), "e", Vec::new());
    log.pop_handler(token);
    assert_eq!(out.contents(), "");
    assert_eq!(log.nerrors(), 0);
    log.error(at(0), "e", Vec::new());
    assert_eq!(log.nerrors(), 1);
}

#[test]
fn handlers_run_top_down() {
    let (mut log, out) = log_on("a\n", LogConfig::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let bottom = log.push_handler(DiagnosticHandler::Discard);
    let top = log.push_handler(DiagnosticHandler::Custom(Box::new(Recorder(Rc::clone(
        &seen,
    )))));
    log.note(None, "swallowed", Vec::new());
    log.error(at(0), "forwarded", Vec::new());

    assert_eq!(
        *seen.borrow(),
        vec![
            "compiler.note.swallowed".to_owned(),
            "compiler.err.forwarded".to_owned()
        ]
    );
    assert_eq!(out.contents(), "");
    log.pop_handler(top);
    log.pop_handler(bottom);
}

#[test]
#[should_panic(expected = "is on top")]
fn popping_out_of_order_panics() {
    let (mut log, _out) = raw_log(LogConfig::default());
    let first = log.push_handler(DiagnosticHandler::Discard);
    let _second = log.push_handler(DiagnosticHandler::Discard);
    log.pop_handler(first);
}

#[test]
fn listener_replaces_output() {
    let (mut log, out) = log_on("a\n", LogConfig::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    log.set_listener(Some(Box::new(Recorder(Rc::clone(&seen)))));
    log.error(at(0), "e", Vec::new());
    assert_eq!(out.contents(), "");
    assert_eq!(*seen.borrow(), vec!["compiler.err.e".to_owned()]);
    assert_eq!(log.nerrors(), 1);
}

// === Sources ===

#[test]
fn use_source_returns_previous_file() {
    let (mut log, _out) = raw_log(LogConfig::default());
    let a: Rc<dyn FileObject> = Rc::new(MemoryFile::new("A.java", ""));
    let b: Rc<dyn FileObject> = Rc::new(MemoryFile::new("B.java", ""));
    assert!(log.use_source(Some(Rc::clone(&a))).is_none());
    let previous = log.use_source(Some(b));
    assert_eq!(previous.map(|f| f.name().to_owned()), Some("A.java".to_owned()));
    assert_eq!(log.current_source().name(), Some("B.java"));
    log.use_source(None);
    assert!(log.current_source().is_no_source());
}

#[test]
fn unreadable_source_reports_reading_error() {
    let (mut log, out) = raw_log(LogConfig::default());
    log.use_source(Some(Rc::new(MemoryFile::unreadable("Bad.java", "boom"))));
    log.error(at(0), "e", Vec::new());

    assert_eq!(
        out.contents(),
        "Bad.java:1:1: compiler.err.e\n- compiler.err.error.reading.file: Bad.java, boom\n"
    );
    assert_eq!(log.nerrors(), 2);
}

// === Raw output ===

#[test]
fn raw_error_prints_line_and_caret() {
    let (mut log, out) = log_on("int x = ;\n", LogConfig::default());
    log.raw_error(Some(8), "illegal start");
    assert_eq!(out.contents(), "T.java:1: illegal start\nint x = ;\n        ^\n");
    assert_eq!(log.nerrors(), 1);

    out.clear();
    log.raw_error(Some(8), "again");
    assert_eq!(out.contents(), "");
    assert_eq!(log.nsuppressed_errors(), 1);
}

#[test]
fn raw_error_over_budget_is_not_recorded() {
    let config = LogConfig {
        max_errors: 1,
        ..LogConfig::default()
    };
    let (mut log, _out) = log_on("a\nb\n", config);
    log.raw_error(Some(0), "first");
    log.raw_error(Some(2), "second");

    assert_eq!(log.nerrors(), 1);
    assert_eq!(log.nsuppressed_errors(), 1);
    assert!(log.has_error_on(0));
    assert!(!log.has_error_on(2));
}

#[test]
fn raw_error_on_unreadable_source_reports_reading_error() {
    let (mut log, out) = raw_log(LogConfig::default());
    log.use_source(Some(Rc::new(MemoryFile::unreadable("Bad.java", "boom"))));
    log.raw_error(Some(3), "illegal start");

    assert_eq!(
        out.contents(),
        "error: illegal start\n- compiler.err.error.reading.file: Bad.java, boom\n"
    );
    assert_eq!(log.nerrors(), 2);

    out.clear();
    log.raw_warning(Some(3), "careful");
    assert_eq!(out.contents(), "warning: careful\n");
}

#[test]
fn raw_messages_without_position_get_a_prefix() {
    let (mut log, out) = raw_log(LogConfig::default());
    log.raw_warning(None, "careful");
    log.raw_error(None, "broken");
    assert_eq!(out.contents(), "warning: careful\nerror: broken\n");
}

#[test]
fn print_raw_lines_splits_on_newlines() {
    let (mut log, out) = raw_log(LogConfig::default());
    log.print_raw_lines(WriterKind::Stdout, "a\nb\n");
    log.print_raw_lines(WriterKind::Stdout, "c");
    assert_eq!(out.contents(), "a\nb\nc\n");
}

#[test]
fn writers_can_be_rebound_individually() {
    let (mut log, out) = log_on("a\n", LogConfig::default());
    let notes = SharedWriter::new();
    log.set_writer(WriterKind::Notice, Box::new(notes.clone()));
    log.note(None, "n", Vec::new());
    log.warning(None, at(0), "w", Vec::new());
    assert_eq!(notes.contents(), "- compiler.note.n\n");
    assert_eq!(out.contents(), "T.java:1:1: compiler.warn.w\n");
}

// === Summary ===

#[test]
fn summary_prints_counts_and_suppressed_totals() {
    let config = LogConfig {
        max_errors: 1,
        ..LogConfig::default()
    };
    let (mut log, out) = log_on("a\nb\nc\n", config);
    log.error(at(0), "e", Vec::new());
    log.error(at(2), "e", Vec::new());
    log.warning(None, at(4), "w", Vec::new());
    log.warning(None, at(4), "w", Vec::new());
    out.clear();
    log.print_summary();

    assert_eq!(
        out.contents(),
        "1 error\n\
         2 warnings\n\
         only showing the first 1 errors, of 2 total; use -Xmaxerrs if you would like to see more\n"
    );
}

#[test]
fn summary_mentions_compressed_output() {
    let (mut log, out) = log_on("a\n", LogConfig::default());
    log.error_with_flags(DiagnosticFlags::COMPRESSED, at(0), "e", Vec::new());
    assert!(log.compressed_output());
    out.clear();
    log.print_summary();
    assert_eq!(
        out.contents(),
        "- compiler.note.compressed.diags\n1 error\n"
    );
}

#[test]
fn empty_summary_prints_nothing() {
    let (mut log, out) = raw_log(LogConfig::default());
    log.print_summary();
    assert_eq!(out.contents(), "");
}

#[test]
fn from_options_reads_limits() {
    let options = Options::from_pairs([("-Xmaxerrs", "3"), ("-nowarn", "")]);
    let log = Log::from_options(&options, Arc::new(Messages::with_defaults()));
    assert_eq!(log.config(), &LogConfig::from_options(&options));
}
