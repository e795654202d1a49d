//! Formatter lookup by identifier.
//!
//! Built-in identifiers are `basic`, `raw` and `rich`. Tools may register
//! their own with [`register_global`](FormatterRegistry::register_global)
//! and select them through the `diags.formatter` option.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::{BasicFormatter, DiagnosticFormatter, RawFormatter, RichFormatter};
use crate::config::{FormatterConfig, Options};
use crate::messages::Messages;

/// Builds a formatter from options and messages.
pub type FormatterFactory =
    Box<dyn Fn(&Options, Arc<Messages>) -> Box<dyn DiagnosticFormatter> + Send + Sync>;

/// Identifier used when `diags.formatter` is absent or unknown.
pub const DEFAULT_FORMATTER: &str = "rich";

/// Identifier to factory map.
pub struct FormatterRegistry {
    factories: FxHashMap<String, FormatterFactory>,
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FormatterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        FormatterRegistry {
            factories: FxHashMap::default(),
        }
    }

    /// A registry holding `basic`, `raw` and `rich`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("basic", |options, messages| {
            Box::new(BasicFormatter::new(FormatterConfig::from_options(options), messages))
        });
        registry.register("raw", |options, messages| {
            Box::new(RawFormatter::new(FormatterConfig::raw_from_options(options), messages))
        });
        registry.register("rich", |options, messages| {
            let inner: Box<dyn DiagnosticFormatter> = if options.is_set("rawDiagnostics") {
                Box::new(RawFormatter::new(FormatterConfig::raw_from_options(options), messages))
            } else {
                Box::new(BasicFormatter::new(FormatterConfig::from_options(options), messages))
            };
            Box::new(RichFormatter::from_options(options, inner))
        });
        registry
    }

    /// Register `factory` under `id`, replacing any previous entry.
    pub fn register<F>(&mut self, id: &str, factory: F)
    where
        F: Fn(&Options, Arc<Messages>) -> Box<dyn DiagnosticFormatter> + Send + Sync + 'static,
    {
        self.factories.insert(id.to_owned(), Box::new(factory));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Build the formatter registered under `id`.
    pub fn create(
        &self,
        id: &str,
        options: &Options,
        messages: Arc<Messages>,
    ) -> Option<Box<dyn DiagnosticFormatter>> {
        self.factories
            .get(id)
            .map(|factory| factory(options, messages))
    }

    /// The formatter selected by `diags.formatter`, falling back to
    /// [`DEFAULT_FORMATTER`] when the option is absent or names nothing
    /// registered.
    pub fn from_options(
        &self,
        options: &Options,
        messages: Arc<Messages>,
    ) -> Option<Box<dyn DiagnosticFormatter>> {
        let id = options.get("diags.formatter").unwrap_or(DEFAULT_FORMATTER);
        if !self.contains(id) {
            tracing::warn!(id, "unknown diags.formatter, using {DEFAULT_FORMATTER}");
            return self.create(DEFAULT_FORMATTER, options, messages);
        }
        self.create(id, options, messages)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// The process-wide registry.
    pub fn global() -> &'static RwLock<FormatterRegistry> {
        &GLOBAL
    }

    /// Register `factory` in the process-wide registry.
    pub fn register_global<F>(id: &str, factory: F)
    where
        F: Fn(&Options, Arc<Messages>) -> Box<dyn DiagnosticFormatter> + Send + Sync + 'static,
    {
        GLOBAL.write().register(id, factory);
    }

    /// Drop custom registrations from the process-wide registry.
    pub fn reset_global() {
        *GLOBAL.write() = Self::with_builtins();
    }
}

static GLOBAL: LazyLock<RwLock<FormatterRegistry>> =
    LazyLock::new(|| RwLock::new(FormatterRegistry::with_builtins()));
