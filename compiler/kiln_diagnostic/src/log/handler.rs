use std::fmt;

use super::Log;
use crate::diagnostic::{Diagnostic, DiagnosticFlags};

/// Identifies a pushed handler. Returned by
/// [`Log::push_handler`](super::Log::push_handler) and required to pop it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerToken(pub(super) u32);

/// A user-supplied handler.
pub trait HandleDiagnostic {
    /// Take `d`. Return it to pass it on to the handler below.
    fn handle(&mut self, d: Diagnostic) -> Option<Diagnostic>;
}

/// Receives written diagnostics in place of the output streams.
pub trait DiagnosticListener {
    fn report(&mut self, d: &Diagnostic);
}

/// One entry of a log's handler stack.
pub enum DiagnosticHandler {
    /// Drops everything.
    Discard,
    /// Holds diagnostics back until asked to report them.
    Deferred(DeferredDiagnosticHandler),
    Custom(Box<dyn HandleDiagnostic>),
}

impl fmt::Debug for DiagnosticHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticHandler::Discard => f.write_str("Discard"),
            DiagnosticHandler::Deferred(h) => f.debug_tuple("Deferred").field(h).finish(),
            DiagnosticHandler::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl DiagnosticHandler {
    /// Offer `d` to this handler. `Some` passes it on.
    pub(super) fn handle(&mut self, d: Diagnostic) -> Option<Diagnostic> {
        match self {
            DiagnosticHandler::Discard => {
                tracing::trace!(code = d.code(), reason = "discard handler", "diagnostic dropped");
                None
            }
            DiagnosticHandler::Deferred(h) => h.defer(d),
            DiagnosticHandler::Custom(h) => h.handle(d),
        }
    }

    /// The deferred handler inside, if that is what this is.
    pub fn into_deferred(self) -> Option<DeferredDiagnosticHandler> {
        match self {
            DiagnosticHandler::Deferred(h) => Some(h),
            _ => None,
        }
    }
}

type Filter = Box<dyn Fn(&Diagnostic) -> bool>;

/// Buffers the diagnostics its filter accepts (all, without a filter).
/// Non-deferrable diagnostics always pass through.
#[derive(Default)]
pub struct DeferredDiagnosticHandler {
    filter: Option<Filter>,
    deferred: Vec<Diagnostic>,
}

impl fmt::Debug for DeferredDiagnosticHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredDiagnosticHandler")
            .field("filtered", &self.filter.is_some())
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

impl DeferredDiagnosticHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: impl Fn(&Diagnostic) -> bool + 'static) -> Self {
        DeferredDiagnosticHandler {
            filter: Some(Box::new(filter)),
            deferred: Vec::new(),
        }
    }

    fn defer(&mut self, d: Diagnostic) -> Option<Diagnostic> {
        let accepted = match &self.filter {
            Some(filter) => filter(&d),
            None => true,
        };
        if accepted && !d.is_flag_set(DiagnosticFlags::NON_DEFERRABLE) {
            self.deferred.push(d);
            None
        } else {
            Some(d)
        }
    }

    /// Held diagnostics, oldest first.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.deferred
    }

    /// Report the held diagnostics `accept` approves to `log`, in order,
    /// and keep the rest.
    pub fn report_deferred(&mut self, log: &mut Log, accept: impl Fn(&Diagnostic) -> bool) {
        let held = std::mem::take(&mut self.deferred);
        for d in held {
            if accept(&d) {
                log.report(d);
            } else {
                self.deferred.push(d);
            }
        }
    }
}
