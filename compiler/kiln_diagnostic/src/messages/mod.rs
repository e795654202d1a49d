//! Message catalogs and pattern substitution.
//!
//! A message key such as `compiler.err.cant.resolve` is looked up in a
//! stack of [`MessageCatalog`]s and the resulting pattern has its `{N}`
//! placeholders replaced by the rendered arguments.
//!
//! # Pattern language
//!
//! ```text
//! {0}            argument 0
//! {1,number}     argument 1; anything after the comma is ignored
//! ''             a literal quote
//! 'text {0}'     quoted: braces inside are literal
//! ```
//!
//! A placeholder whose index has no argument is left as written.

mod defaults;

use std::fmt;

use rustc_hash::FxHashMap;

pub use defaults::DEFAULT_MESSAGES;

/// Source of message patterns.
pub trait MessageCatalog: fmt::Debug + Send + Sync {
    fn get(&self, key: &str) -> Option<&str>;
}

/// Catalog backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct MapCatalog {
    entries: FxHashMap<String, String>,
}

impl MapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a (&'a str, &'a str)>) -> Self {
        let mut catalog = MapCatalog::new();
        for (key, pattern) in pairs {
            catalog.insert(key, pattern);
        }
        catalog
    }

    pub fn insert(&mut self, key: &str, pattern: &str) {
        self.entries.insert(key.to_owned(), pattern.to_owned());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MessageCatalog for MapCatalog {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Layered catalogs. Catalogs added later take precedence.
#[derive(Debug, Default)]
pub struct Messages {
    catalogs: Vec<Box<dyn MessageCatalog>>,
}

impl Messages {
    /// No catalogs at all: every key renders as "message file broken".
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in English texts.
    pub fn with_defaults() -> Self {
        let mut messages = Messages::new();
        messages.add(Box::new(MapCatalog::from_pairs(DEFAULT_MESSAGES)));
        messages
    }

    /// Add a catalog on top of the existing ones.
    pub fn add(&mut self, catalog: Box<dyn MessageCatalog>) {
        self.catalogs.push(catalog);
    }

    /// Raw pattern for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.catalogs.iter().rev().find_map(|c| c.get(key))
    }

    /// Pattern for `key` with `args` substituted.
    pub fn localize(&self, key: &str, args: &[String]) -> String {
        match self.get(key) {
            Some(pattern) => format_pattern(pattern, args),
            None => {
                tracing::debug!(key, "missing message key");
                let pattern = format!(
                    "compiler message file broken: key={key} arguments={{0}}, {{1}}, {{2}}, {{3}}, {{4}}, {{5}}, {{6}}, {{7}}"
                );
                format_pattern(&pattern, args)
            }
        }
    }
}

/// Substitute `args` into `pattern`.
pub fn format_pattern(pattern: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut quoted = false;
    while let Some(c) = chars.next() {
        match c {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            '\'' => quoted = !quoted,
            '{' if !quoted => {
                let mut placeholder = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    placeholder.push(c);
                }
                let arg = placeholder
                    .split(',')
                    .next()
                    .and_then(|index| index.trim().parse::<usize>().ok())
                    .and_then(|index| args.get(index));
                match arg {
                    Some(arg) if closed => out.push_str(arg),
                    _ => {
                        out.push('{');
                        out.push_str(&placeholder);
                        if closed {
                            out.push('}');
                        }
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}
