//! Option store and typed configuration views.
//!
//! [`Options`] is a flat string-keyed store, filled from command-line style
//! `name=value` pairs. [`FormatterConfig`] and [`LogConfig`] read the
//! options they care about once, at construction. Malformed values never
//! fail construction: they are logged and replaced by the documented
//! defaults.

use bitflags::bitflags;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::diagnostic::LintCategory;

/// Default `-Xmaxerrs` / `-Xmaxwarns` budget.
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 100;

/// Default number of loaded sources kept by a log.
pub const DEFAULT_SOURCE_CACHE_LIMIT: usize = 16;

const DETAILS_INC: usize = 2;
const DIAG_INC: usize = 4;

/// Error parsing an option value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("option {option}: '{value}' is not a number")]
    InvalidNumber { option: String, value: String },
    #[error("invalid multiline limit '{value}'")]
    InvalidLimit { value: String },
}

/// String-keyed option store.
#[derive(Clone, Debug, Default)]
pub struct Options {
    values: FxHashMap<String, String>,
}

impl Options {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(name, value)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut options = Options::new();
        for (name, value) in pairs {
            options.put(name, value);
        }
        options
    }

    /// Set `name` to `value`, replacing any previous value.
    pub fn put(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_owned(), value.to_owned());
    }

    /// Value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether `name` has any value.
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Remove `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }
}

bitflags! {
    /// Parts of a rendered diagnostic that may be shown or hidden.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct DiagnosticParts: u8 {
        /// First line of the message.
        const SUMMARY = 1 << 0;
        /// Remaining lines of the message.
        const DETAILS = 1 << 1;
        /// Source line and caret.
        const SOURCE = 1 << 2;
        /// Nested sub-diagnostics.
        const SUBDIAGNOSTICS = 1 << 3;
    }
}

bitflags! {
    /// Extra rendering performed by the rich formatter.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct RichFeatures: u8 {
        /// Print simple class names unless they clash.
        const SIMPLE_NAMES = 1 << 0;
        /// Explain type variables, captures and intersections in trailing
        /// "where" clauses.
        const WHERE_CLAUSES = 1 << 1;
        /// Disambiguate distinct type variables sharing a name as `T#1`, `T#2`.
        const UNIQUE_TYPEVAR_NAMES = 1 << 2;
    }
}

impl RichFeatures {
    /// Features for a rich formatter wrapping a raw (`raw`) or basic
    /// formatter, adjusted by `diags.formatterOptions`.
    pub fn from_options(options: &Options, raw: bool) -> Self {
        let mut features = if raw {
            RichFeatures::empty()
        } else {
            RichFeatures::all()
        };
        if let Some(opts) = options.get("diags.formatterOptions") {
            for opt in opts.split(',') {
                let (feature, on) = match opt.strip_prefix('-') {
                    Some(name) => (name, false),
                    None => (opt, true),
                };
                let flag = match feature {
                    "where" => RichFeatures::WHERE_CLAUSES,
                    "simpleNames" => RichFeatures::SIMPLE_NAMES,
                    "disambiguateTvars" => RichFeatures::UNIQUE_TYPEVAR_NAMES,
                    _ => continue,
                };
                features.set(flag, on);
            }
        }
        features
    }
}

/// Where the source line goes in a multi-line message.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SourcePosition {
    /// After the whole message.
    Bottom,
    /// Right after the first line.
    AfterSummary,
}

/// Caps on nested sub-diagnostic output. `None` means unlimited.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct MultilineLimits {
    /// Maximum nesting depth.
    pub depth: Option<usize>,
    /// Maximum number of sub-diagnostics per level.
    pub length: Option<usize>,
}

/// Indentation, in spaces, applied to each part.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Indentation {
    pub summary: usize,
    pub details: usize,
    pub source: usize,
    pub subdiagnostics: usize,
}

impl Default for Indentation {
    fn default() -> Self {
        Indentation {
            summary: 0,
            details: DETAILS_INC,
            source: 0,
            subdiagnostics: DIAG_INC,
        }
    }
}

/// The three templates of the basic formatter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct BasicFormats {
    /// Diagnostic with a position.
    pub pos: String,
    /// Diagnostic without a position or without a source.
    pub no_pos: String,
    /// Positionless diagnostic whose source is a class file.
    pub class: String,
}

impl BasicFormats {
    /// The modern preset.
    pub fn modern() -> Self {
        BasicFormats {
            pos: "%f:%l:%_%p%L%m".to_owned(),
            no_pos: "%p%L%m".to_owned(),
            class: "%f:%_%p%L%m".to_owned(),
        }
    }

    /// The legacy preset, which only prefixes the kind where it helps.
    pub fn legacy() -> Self {
        BasicFormats {
            pos: "%f:%l:%_%t%L%m".to_owned(),
            no_pos: "%p%L%m".to_owned(),
            class: "%f:%_%t%L%m".to_owned(),
        }
    }

    /// Apply a `pos|no_pos|class` layout string.
    ///
    /// Three parts set all templates, two set `pos` and `no_pos`, and any
    /// other count sets only `pos` from the first part.
    pub fn apply_layout(&mut self, layout: &str) {
        let parts: Vec<&str> = layout.split('|').collect();
        if parts.len() == 3 {
            self.class = parts[2].to_owned();
        }
        if parts.len() == 2 || parts.len() == 3 {
            self.no_pos = parts[1].to_owned();
        }
        self.pos = parts[0].to_owned();
    }
}

impl Default for BasicFormats {
    fn default() -> Self {
        Self::modern()
    }
}

/// Rendering settings shared by every formatter.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FormatterConfig {
    pub visible: DiagnosticParts,
    pub multiline: MultilineLimits,
    pub caret: bool,
    pub indentation: Indentation,
    pub source_position: SourcePosition,
    pub formats: BasicFormats,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig {
            visible: DiagnosticParts::all(),
            multiline: MultilineLimits::default(),
            caret: true,
            indentation: Indentation::default(),
            source_position: SourcePosition::AfterSummary,
            formats: BasicFormats::modern(),
        }
    }
}

impl FormatterConfig {
    /// Configuration of the process-wide standard formatter: no source
    /// lines, everything else default.
    pub fn standard() -> Self {
        FormatterConfig {
            visible: DiagnosticParts::all() - DiagnosticParts::SOURCE,
            ..Self::default()
        }
    }

    /// Basic formatter configuration read from `options`.
    pub fn from_options(options: &Options) -> Self {
        let mut config = Self::with_parts(options, DiagnosticParts::all());
        if options.is_set("diags.legacy") {
            config.formats = BasicFormats::legacy();
        }
        if let Some(layout) = options.get("diags.layout") {
            if layout == "OLD" {
                config.formats = BasicFormats::legacy();
            } else {
                config.formats.apply_layout(layout);
            }
        }
        config.source_position = match options.get("diags.sourcePosition") {
            Some("bottom") => SourcePosition::Bottom,
            _ => SourcePosition::AfterSummary,
        };
        if let Some(indent) = options.get("diags.indent") {
            config.indentation = parse_indentation(indent).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "malformed diags.indent, using defaults");
                Indentation::default()
            });
        }
        config
    }

    /// Raw formatter configuration read from `options`. Source lines are
    /// hidden unless requested.
    pub fn raw_from_options(options: &Options) -> Self {
        Self::with_parts(
            options,
            DiagnosticParts::SUMMARY | DiagnosticParts::DETAILS | DiagnosticParts::SUBDIAGNOSTICS,
        )
    }

    fn with_parts(options: &Options, parts: DiagnosticParts) -> Self {
        let mut config = FormatterConfig {
            visible: parts,
            ..Self::default()
        };
        match options.get("diags.showSource") {
            Some("true") => config.visible.insert(DiagnosticParts::SOURCE),
            Some("false") => config.visible.remove(DiagnosticParts::SOURCE),
            _ => {}
        }
        if let Some(opts) = options.get("diags.formatterOptions") {
            let opts: Vec<&str> = opts.split(',').collect();
            if opts.contains(&"short") {
                config
                    .visible
                    .remove(DiagnosticParts::DETAILS | DiagnosticParts::SUBDIAGNOSTICS);
            }
            if opts.contains(&"source") {
                config.visible.insert(DiagnosticParts::SOURCE);
            }
            if opts.contains(&"-source") {
                config.visible.remove(DiagnosticParts::SOURCE);
            }
        }
        if let Some(policy) = options.get("diags.multilinePolicy") {
            if policy == "disabled" {
                config.visible = DiagnosticParts::SUMMARY;
            } else if let Some(limits) = policy.strip_prefix("limit:") {
                config.multiline = parse_multiline_limits(limits).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "malformed diags.multilinePolicy, removing limits");
                    MultilineLimits::default()
                });
            }
        }
        config.caret = options.get("diags.showCaret") != Some("false");
        config
    }
}

/// Parse `LEN[:DEPTH]`, where `*` leaves a limit unset and anything below
/// zero means unlimited.
pub fn parse_multiline_limits(value: &str) -> Result<MultilineLimits, ConfigError> {
    let parse = |s: &str| -> Result<Option<usize>, ConfigError> {
        if s == "*" {
            return Ok(None);
        }
        let n: i64 = s.parse().map_err(|_| ConfigError::InvalidLimit {
            value: value.to_owned(),
        })?;
        Ok(usize::try_from(n).ok())
    };
    let parts: Vec<&str> = value.split(':').collect();
    let mut limits = MultilineLimits::default();
    match parts.as_slice() {
        [length, depth] => {
            limits.depth = parse(depth)?;
            limits.length = parse(length)?;
        }
        [length] => limits.length = parse(length)?,
        _ => {}
    }
    Ok(limits)
}

/// Parse `SUMMARY|DETAILS|SOURCE|SUBDIAGNOSTICS|DETAILS`.
///
/// Levels are applied from the last given part down to the first, so with
/// five parts the second part's `DETAILS` value wins over the fifth.
pub fn parse_indentation(value: &str) -> Result<Indentation, ConfigError> {
    let levels: Vec<&str> = value.split('|').collect();
    let parse = |s: &str| -> Result<usize, ConfigError> {
        s.trim().parse().map_err(|_| ConfigError::InvalidNumber {
            option: "diags.indent".to_owned(),
            value: s.to_owned(),
        })
    };
    let mut indent = Indentation::default();
    // Six or more parts set the summary level only.
    if levels.len() > 5 {
        indent.summary = parse(levels[0])?;
        return Ok(indent);
    }
    if levels.len() == 5 {
        indent.details = parse(levels[4])?;
    }
    if levels.len() >= 4 {
        indent.subdiagnostics = parse(levels[3])?;
    }
    if levels.len() >= 3 {
        indent.source = parse(levels[2])?;
    }
    if levels.len() >= 2 {
        indent.details = parse(levels[1])?;
    }
    indent.summary = parse(levels[0])?;
    Ok(indent)
}

/// Parse a diagnostic budget: positive values are the budget, zero or
/// negative means unlimited.
pub fn parse_budget(option: &str, value: &str) -> Result<usize, ConfigError> {
    let n: i64 = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        option: option.to_owned(),
        value: value.to_owned(),
    })?;
    Ok(if n <= 0 {
        usize::MAX
    } else {
        usize::try_from(n).unwrap_or(usize::MAX)
    })
}

fn budget_option(options: &Options, name: &str) -> usize {
    match options.get(name) {
        None => DEFAULT_MAX_DIAGNOSTICS,
        Some(value) => parse_budget(name, value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default budget");
            DEFAULT_MAX_DIAGNOSTICS
        }),
    }
}

/// Reporting policy settings for a log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub max_errors: usize,
    pub max_warnings: usize,
    pub emit_warnings: bool,
    pub suppress_notes: bool,
    /// Lint categories whose warnings are dropped.
    pub disabled_lints: FxHashSet<LintCategory>,
    pub source_cache_limit: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            max_errors: DEFAULT_MAX_DIAGNOSTICS,
            max_warnings: DEFAULT_MAX_DIAGNOSTICS,
            emit_warnings: true,
            suppress_notes: false,
            disabled_lints: FxHashSet::default(),
            source_cache_limit: DEFAULT_SOURCE_CACHE_LIMIT,
        }
    }
}

impl LogConfig {
    /// Log configuration read from `options`.
    pub fn from_options(options: &Options) -> Self {
        let source_cache_limit = match options.get("sourceCacheLimit") {
            None => DEFAULT_SOURCE_CACHE_LIMIT,
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(value, "malformed sourceCacheLimit, using default");
                    DEFAULT_SOURCE_CACHE_LIMIT
                }
            },
        };
        LogConfig {
            max_errors: budget_option(options, "-Xmaxerrs"),
            max_warnings: budget_option(options, "-Xmaxwarns"),
            emit_warnings: !options.is_set("-nowarn"),
            suppress_notes: options.is_set("suppressNotes"),
            disabled_lints: options
                .get("-Xlint:")
                .map(parse_lint_switches)
                .unwrap_or_default(),
            source_cache_limit,
        }
    }

    /// Whether warnings of `category` are enabled.
    pub fn is_lint_enabled(&self, category: LintCategory) -> bool {
        !self.disabled_lints.contains(&category)
    }
}

/// Parse comma-separated `-Xlint:` switches into the set of disabled
/// categories. Switches apply left to right; unknown names are ignored.
pub fn parse_lint_switches(switches: &str) -> FxHashSet<LintCategory> {
    let mut disabled = FxHashSet::default();
    for switch in switches.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match switch {
            "all" => disabled.clear(),
            "none" => disabled.extend(LintCategory::ALL.iter().copied()),
            _ => {
                let (off, name) = match switch.strip_prefix('-') {
                    Some(name) => (true, name),
                    None => (false, switch),
                };
                match LintCategory::from_option(name) {
                    Some(category) if off => {
                        disabled.insert(category);
                    }
                    Some(category) => {
                        disabled.remove(&category);
                    }
                    None => tracing::warn!(switch, "unknown lint category"),
                }
            }
        }
    }
    disabled
}

#[cfg(test)]
mod tests;
