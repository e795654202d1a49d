//! Kiln Diagnostic - building, formatting and reporting compiler diagnostics.
//!
//! - [`Diagnostic`] / [`DiagnosticFactory`]: immutable diagnostics with
//!   keyed messages, typed arguments and policy flags
//! - [`DiagnosticSource`]: lazily loaded source text for line and column
//!   queries
//! - [`Messages`]: layered message catalogs
//! - [`BasicFormatter`], [`RawFormatter`], [`RichFormatter`]: rendering,
//!   selected through the [`FormatterRegistry`]
//! - [`Log`]: handler stack, budgets, deduplication and output streams
//! - [`MandatoryWarningAggregator`]: deferred summaries of suppressed
//!   mandatory warnings
//!
//! # Flow
//!
//! ```text
//! DiagnosticFactory -> Log::report -> handlers -> policy -> formatter -> writer
//! ```

mod config;
mod diagnostic;
mod formatter;
mod log;
mod mandatory;
mod messages;
mod source;

use std::sync::Once;

pub use config::{
    parse_budget, parse_indentation, parse_lint_switches, parse_multiline_limits, BasicFormats,
    ConfigError, DiagnosticParts, FormatterConfig, Indentation, LogConfig, MultilineLimits,
    Options, RichFeatures, SourcePosition, DEFAULT_MAX_DIAGNOSTICS, DEFAULT_SOURCE_CACHE_LIMIT,
};
pub use diagnostic::{
    CapturedType, ClassName, DiagArg, Diagnostic, DiagnosticFactory, DiagnosticFlags,
    DiagnosticPosition, DiagnosticType, IntersectionType, Kind, KindName, LintCategory,
    Renderable, SymbolArg, TypeArg, TypeVar, WildcardKind,
};
pub use formatter::{
    indent, standard_formatter, BasicFormatter, DefaultPrinter, DiagnosticFormatter,
    FormatterFactory, FormatterRegistry, Localize, PositionKind, RawFormatter, RichFormatter,
    TypePrinter, WhereClauseKind, DEFAULT_FORMATTER,
};
pub use log::{
    DeferredDiagnosticHandler, DiagnosticHandler, DiagnosticListener, HandleDiagnostic,
    HandlerToken, Log, SharedWriter, WriterKind,
};
pub use mandatory::{AggregateState, MandatoryWarningAggregator};
pub use messages::{format_pattern, MapCatalog, MessageCatalog, Messages, DEFAULT_MESSAGES};
pub use source::{
    DiagnosticSource, FileKind, FileObject, LineMap, MemoryFile, PathFile, SourceCache,
    SourceError, TAB_WIDTH,
};

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical tracing subscriber.
///
/// Does nothing unless `KILN_LOG` is set, e.g. `KILN_LOG=kiln_diagnostic=trace`.
/// Safe to call more than once; a subscriber installed elsewhere wins.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("KILN_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_env("KILN_LOG");
        let tree = tracing_tree::HierarchicalLayer::new(2)
            .with_indent_lines(true)
            .with_targets(true);
        // Err only when another global subscriber is already set
        let _ = tracing_subscriber::registry().with(filter).with(tree).try_init();
    });
}
