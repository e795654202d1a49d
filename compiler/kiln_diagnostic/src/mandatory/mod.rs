//! Aggregation of one family of mandatory warnings.
//!
//! While the log's warning budget lasts (verbose mode only) each warning is
//! reported on its own. Past that point, or from the start when not
//! verbose, occurrences only widen a summary state:
//!
//! ```text
//! NoneSeen -> SingleFile -> MultipleFiles             (not verbose)
//! NoneSeen -> SingleFile ----------------+
//!          -> AdditionalInSingleFile ----+-> AdditionalInMultipleFiles
//! ```
//!
//! [`MandatoryWarningAggregator::report_deferred`] turns the final state
//! into one note at the end of compilation.

use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::diagnostic::{DiagArg, DiagnosticFlags, DiagnosticPosition, LintCategory};
use crate::log::Log;
use crate::source::{DiagnosticSource, FileObject};

/// Summary state of a [`MandatoryWarningAggregator`]. Only ever widens.
#[derive(Clone, Debug)]
pub enum AggregateState {
    NoneSeen,
    /// Warnings were held back, all in this file.
    SingleFile(Rc<dyn FileObject>),
    /// Like `SingleFile`, but some warnings of the file were reported.
    AdditionalInSingleFile(Rc<dyn FileObject>),
    MultipleFiles,
    AdditionalInMultipleFiles,
}

impl AggregateState {
    /// Suffix of the summary note key, `None` when nothing was held back.
    pub fn note_suffix(&self) -> Option<&'static str> {
        match self {
            AggregateState::NoneSeen => None,
            AggregateState::SingleFile(_) => Some("filename"),
            AggregateState::AdditionalInSingleFile(_) => Some("filename.additional"),
            AggregateState::MultipleFiles => Some("plural"),
            AggregateState::AdditionalInMultipleFiles => Some("plural.additional"),
        }
    }

    /// The file named by a single-file state.
    pub fn file(&self) -> Option<&Rc<dyn FileObject>> {
        match self {
            AggregateState::SingleFile(file) | AggregateState::AdditionalInSingleFile(file) => {
                Some(file)
            }
            _ => None,
        }
    }
}

impl PartialEq for AggregateState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AggregateState::SingleFile(a), AggregateState::SingleFile(b))
            | (AggregateState::AdditionalInSingleFile(a), AggregateState::AdditionalInSingleFile(b)) => {
                a.name() == b.name()
            }
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

/// Collapses one family of mandatory warnings (deprecation, unchecked
/// operations, preview features) into a deferred summary note.
#[derive(Debug)]
pub struct MandatoryWarningAggregator {
    /// Key family, as in `compiler.note.<prefix>.filename`.
    prefix: String,
    verbose: bool,
    enforce_mandatory: bool,
    lint: Option<LintCategory>,
    state: AggregateState,
    /// File the summary note is attached to: the first held-back one.
    summary_source: Option<Rc<dyn FileObject>>,
    /// Names of files with individually reported warnings.
    reported_in: FxHashSet<String>,
}

impl MandatoryWarningAggregator {
    pub fn new(
        prefix: impl Into<String>,
        verbose: bool,
        enforce_mandatory: bool,
        lint: Option<LintCategory>,
    ) -> Self {
        MandatoryWarningAggregator {
            prefix: prefix.into(),
            verbose,
            enforce_mandatory,
            lint,
            state: AggregateState::NoneSeen,
            summary_source: None,
            reported_in: FxHashSet::default(),
        }
    }

    pub fn state(&self) -> &AggregateState {
        &self.state
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Report a warning of this family at `pos` in the log's current source.
    pub fn report(
        &mut self,
        log: &mut Log,
        pos: Option<DiagnosticPosition>,
        key: &str,
        args: Vec<DiagArg>,
    ) {
        let current = log.current_source().file().cloned();
        let current_name = current.as_ref().map(|f| f.name().to_owned());

        if self.verbose && log.nwarnings() < log.config().max_warnings {
            self.log_warning(log, pos, key, args);
            if let Some(name) = current_name {
                self.reported_in.insert(name);
            }
            return;
        }

        let same_file = match &self.summary_source {
            Some(file) => current_name.as_deref() == Some(file.name()),
            None => current.is_none(),
        };
        let next = match (&self.state, current) {
            (AggregateState::NoneSeen, Some(file)) => {
                self.summary_source = Some(Rc::clone(&file));
                let reported = current_name
                    .as_ref()
                    .is_some_and(|name| self.reported_in.contains(name));
                if self.verbose && reported {
                    AggregateState::AdditionalInSingleFile(file)
                } else {
                    AggregateState::SingleFile(file)
                }
            }
            (AggregateState::NoneSeen, None) => AggregateState::MultipleFiles,
            (AggregateState::SingleFile(_) | AggregateState::AdditionalInSingleFile(_), _)
                if !same_file =>
            {
                if self.verbose {
                    AggregateState::AdditionalInMultipleFiles
                } else {
                    AggregateState::MultipleFiles
                }
            }
            (state, _) => state.clone(),
        };
        if next != self.state {
            tracing::debug!(prefix = %self.prefix, state = ?next, "mandatory warning state widened");
            self.state = next;
        }
    }

    /// Emit the summary note for the current state, if any.
    #[tracing::instrument(level = "debug", skip_all, fields(prefix = %self.prefix))]
    pub fn report_deferred(&mut self, log: &mut Log) {
        let Some(suffix) = self.state.note_suffix() else {
            return;
        };
        let args = match self.state.file() {
            Some(file) => vec![DiagArg::File(Rc::clone(file))],
            None => Vec::new(),
        };
        let file = self.summary_source.clone();
        self.log_note(log, file.as_ref(), &format!("{}.{suffix}", self.prefix), args);
        if !self.verbose {
            self.log_note(log, file.as_ref(), &format!("{}.recompile", self.prefix), Vec::new());
        }
    }

    /// Back to `NoneSeen`, forgetting every file.
    pub fn clear(&mut self) {
        self.state = AggregateState::NoneSeen;
        self.summary_source = None;
        self.reported_in.clear();
    }

    fn log_warning(
        &self,
        log: &mut Log,
        pos: Option<DiagnosticPosition>,
        key: &str,
        args: Vec<DiagArg>,
    ) {
        if self.enforce_mandatory {
            log.mandatory_warning(self.lint, pos, key, args);
        } else {
            log.warning(self.lint, pos, key, args);
        }
    }

    fn log_note(
        &self,
        log: &mut Log,
        file: Option<&Rc<dyn FileObject>>,
        key: &str,
        args: Vec<DiagArg>,
    ) {
        let source = match file {
            Some(file) => log.source(file),
            None => DiagnosticSource::no_source(),
        };
        let factory = log.factory();
        let d = if self.enforce_mandatory {
            factory.mandatory_note(source, key, args)
        } else {
            factory.note(source, None, key, args)
        };
        log.report(d.with_flag(DiagnosticFlags::AGGREGATE));
    }
}
