use std::cell::RefCell;

use kiln_ir::{List, NameTable, UnsharedName, UnsharedNameTable};
use rustc_hash::FxHashMap;

use crate::diagnostic::ClassName;

/// Tracks which classes a diagnostic mentions, per simple name, so that
/// only names shared by two different classes are printed qualified.
#[derive(Default)]
pub(super) struct ClassNameSimplifier {
    names: RefCell<UnsharedNameTable>,
    clashes: FxHashMap<UnsharedName, List<ClassName>>,
}

impl ClassNameSimplifier {
    fn key(&self, class: &ClassName) -> UnsharedName {
        self.names.borrow_mut().from_string(class.simple())
    }

    pub(super) fn add_usage(&mut self, class: &ClassName) {
        let key = self.key(class);
        let classes = self.clashes.entry(key).or_default();
        if !classes.contains(class) {
            *classes = classes.append(class.clone());
        }
    }

    /// Shortest unambiguous rendering of `class`: nested simple names when
    /// no other mentioned class shares its simple name, the qualified name
    /// otherwise.
    pub(super) fn simplify(&self, class: &ClassName) -> String {
        let key = self.key(class);
        let unique = match self.clashes.get(&key) {
            None => true,
            Some(classes) => classes.len() == 1 && classes.contains(class),
        };
        if unique {
            class.names.join(".")
        } else {
            class.qualified()
        }
    }
}
