use super::{DiagArg, Diagnostic, DiagnosticFlags, DiagnosticPosition, DiagnosticType, LintCategory};
use crate::source::DiagnosticSource;

/// Builds diagnostics whose keys share one prefix.
///
/// A key `cant.resolve` used for an error becomes
/// `<prefix>.err.cant.resolve`.
#[derive(Clone, Debug)]
pub struct DiagnosticFactory {
    prefix: String,
}

impl Default for DiagnosticFactory {
    fn default() -> Self {
        Self::new("compiler")
    }
}

impl DiagnosticFactory {
    pub fn new(prefix: impl Into<String>) -> Self {
        DiagnosticFactory {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full key for `key` at severity `dtype`.
    pub fn code(&self, dtype: DiagnosticType, key: &str) -> String {
        format!("{}.{}.{key}", self.prefix, dtype.key())
    }

    pub fn create(
        &self,
        dtype: DiagnosticType,
        source: DiagnosticSource,
        position: Option<DiagnosticPosition>,
        key: &str,
        args: Vec<DiagArg>,
    ) -> Diagnostic {
        Diagnostic::new(dtype, source, position, self.code(dtype, key), args)
    }

    pub fn error(
        &self,
        flags: DiagnosticFlags,
        source: DiagnosticSource,
        position: Option<DiagnosticPosition>,
        key: &str,
        args: Vec<DiagArg>,
    ) -> Diagnostic {
        let mut d = self.create(DiagnosticType::Error, source, position, key, args);
        d.flags = flags;
        d
    }

    pub fn warning(
        &self,
        lint: Option<LintCategory>,
        source: DiagnosticSource,
        position: Option<DiagnosticPosition>,
        key: &str,
        args: Vec<DiagArg>,
    ) -> Diagnostic {
        self.create(DiagnosticType::Warning, source, position, key, args)
            .with_lint(lint)
    }

    pub fn mandatory_warning(
        &self,
        lint: Option<LintCategory>,
        source: DiagnosticSource,
        position: Option<DiagnosticPosition>,
        key: &str,
        args: Vec<DiagArg>,
    ) -> Diagnostic {
        self.warning(lint, source, position, key, args)
            .with_flag(DiagnosticFlags::MANDATORY)
    }

    pub fn note(
        &self,
        source: DiagnosticSource,
        position: Option<DiagnosticPosition>,
        key: &str,
        args: Vec<DiagArg>,
    ) -> Diagnostic {
        self.create(DiagnosticType::Note, source, position, key, args)
    }

    /// A positionless note that is shown even when warnings are off.
    pub fn mandatory_note(&self, source: DiagnosticSource, key: &str, args: Vec<DiagArg>) -> Diagnostic {
        self.note(source, None, key, args)
            .with_flag(DiagnosticFlags::MANDATORY)
    }

    /// A fragment, for use as an argument or sub-diagnostic.
    pub fn fragment(&self, key: &str, args: Vec<DiagArg>) -> Diagnostic {
        self.create(
            DiagnosticType::Fragment,
            DiagnosticSource::no_source(),
            None,
            key,
            args,
        )
    }
}
