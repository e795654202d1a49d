use std::fmt;

/// A class of optional warning with its own enable switch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LintCategory {
    Cast,
    Deprecation,
    DepAnn,
    DivZero,
    Empty,
    Fallthrough,
    Finally,
    Options,
    Overrides,
    Path,
    Processing,
    RawTypes,
    Removal,
    Serial,
    Static,
    Try,
    Unchecked,
    Varargs,
    Preview,
}

impl LintCategory {
    pub const ALL: [LintCategory; 19] = [
        LintCategory::Cast,
        LintCategory::Deprecation,
        LintCategory::DepAnn,
        LintCategory::DivZero,
        LintCategory::Empty,
        LintCategory::Fallthrough,
        LintCategory::Finally,
        LintCategory::Options,
        LintCategory::Overrides,
        LintCategory::Path,
        LintCategory::Processing,
        LintCategory::RawTypes,
        LintCategory::Removal,
        LintCategory::Serial,
        LintCategory::Static,
        LintCategory::Try,
        LintCategory::Unchecked,
        LintCategory::Varargs,
        LintCategory::Preview,
    ];

    /// Name used on the command line and in `[name]` prefixes.
    pub fn option(self) -> &'static str {
        match self {
            LintCategory::Cast => "cast",
            LintCategory::Deprecation => "deprecation",
            LintCategory::DepAnn => "dep-ann",
            LintCategory::DivZero => "divzero",
            LintCategory::Empty => "empty",
            LintCategory::Fallthrough => "fallthrough",
            LintCategory::Finally => "finally",
            LintCategory::Options => "options",
            LintCategory::Overrides => "overrides",
            LintCategory::Path => "path",
            LintCategory::Processing => "processing",
            LintCategory::RawTypes => "rawtypes",
            LintCategory::Removal => "removal",
            LintCategory::Serial => "serial",
            LintCategory::Static => "static",
            LintCategory::Try => "try",
            LintCategory::Unchecked => "unchecked",
            LintCategory::Varargs => "varargs",
            LintCategory::Preview => "preview",
        }
    }

    pub fn from_option(name: &str) -> Option<LintCategory> {
        Self::ALL.into_iter().find(|c| c.option() == name)
    }
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option())
    }
}
