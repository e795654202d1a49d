//! Rendering of types and symbols inside messages.
//!
//! [`TypePrinter`] walks [`TypeArg`] and [`SymbolArg`] values. Every hook has
//! a default that produces the plain structural form; the free functions in
//! this module are those defaults, so an overriding printer can still fall
//! back to them.

use crate::diagnostic::{
    CapturedType, ClassName, IntersectionType, SymbolArg, TypeArg, TypeVar, WildcardKind,
};

/// Modulus applied to capture ids in the default rendering.
pub const CAPTURE_ID_MODULUS: u32 = 997;

/// Key-plus-arguments to text.
pub trait Localize {
    fn localize(&self, key: &str, args: &[String]) -> String;
}

/// Renders types and symbols.
pub trait TypePrinter {
    fn localize(&self, key: &str, args: &[String]) -> String;

    fn captured_var_id(&self, t: &CapturedType) -> String {
        (t.id % CAPTURE_ID_MODULUS).to_string()
    }

    /// Name of a class. `longform` is false for constructor names.
    fn class_name(&self, name: &ClassName, longform: bool) -> String {
        if longform {
            name.qualified()
        } else {
            name.simple().to_owned()
        }
    }

    fn visit_type(&self, t: &TypeArg) -> String {
        default_visit_type(self, t)
    }

    fn visit_type_var(&self, t: &TypeVar) -> String {
        t.name.clone()
    }

    fn visit_captured(&self, t: &CapturedType) -> String {
        default_visit_captured(self, t)
    }

    fn visit_intersection(&self, t: &IntersectionType) -> String {
        default_visit_intersection(self, t)
    }

    fn visit_class_symbol(&self, name: &ClassName) -> String {
        name.qualified()
    }

    fn visit_symbol(&self, s: &SymbolArg) -> String {
        default_visit_symbol(self, s)
    }
}

/// Render a list of types separated by `,`.
pub fn visit_types<P: TypePrinter + ?Sized>(p: &P, ts: &[TypeArg]) -> String {
    ts.iter().map(|t| p.visit_type(t)).collect::<Vec<_>>().join(",")
}

pub fn default_visit_type<P: TypePrinter + ?Sized>(p: &P, t: &TypeArg) -> String {
    match t {
        TypeArg::Primitive(name) => name.clone(),
        TypeArg::Class { name, args } => {
            let mut s = p.class_name(name, true);
            if !args.is_empty() {
                s.push('<');
                s.push_str(&visit_types(p, args));
                s.push('>');
            }
            s
        }
        TypeArg::Array(elem) => format!("{}[]", p.visit_type(elem)),
        TypeArg::TypeVar(tv) => p.visit_type_var(tv),
        TypeArg::Captured(c) => p.visit_captured(c),
        TypeArg::Wildcard { kind, bound } => match (kind, bound) {
            (WildcardKind::Unbound, _) | (_, None) => WildcardKind::Unbound.prefix().to_owned(),
            (_, Some(bound)) => format!("{}{}", kind.prefix(), p.visit_type(bound)),
        },
        TypeArg::Intersection(i) => p.visit_intersection(i),
    }
}

pub fn default_visit_captured<P: TypePrinter + ?Sized>(p: &P, t: &CapturedType) -> String {
    let id = p.captured_var_id(t);
    let wildcard = p.visit_type(&t.wildcard);
    p.localize("compiler.misc.type.captureof", &[id, wildcard])
}

pub fn default_visit_intersection<P: TypePrinter + ?Sized>(p: &P, t: &IntersectionType) -> String {
    t.components
        .iter()
        .map(|c| p.visit_type(c))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn default_visit_symbol<P: TypePrinter + ?Sized>(p: &P, s: &SymbolArg) -> String {
    match s {
        SymbolArg::Class(name) => p.visit_class_symbol(name),
        SymbolArg::Method {
            owner,
            name,
            type_params,
            params,
            varargs,
        } => {
            let mut ms = if name == "<init>" {
                p.class_name(owner, false)
            } else {
                name.clone()
            };
            if !type_params.is_empty() {
                ms = format!("<{}>{ms}", visit_types(p, type_params));
            }
            format!("{ms}({})", method_args(p, params, *varargs))
        }
        SymbolArg::Variable { name } => name.clone(),
        SymbolArg::Package(name) if name.is_empty() => p.localize("compiler.misc.unnamed.package", &[]),
        SymbolArg::Package(name) => name.clone(),
    }
}

/// Parameter list. With `varargs`, a trailing array renders as `T...`.
pub fn method_args<P: TypePrinter + ?Sized>(p: &P, params: &[TypeArg], varargs: bool) -> String {
    match params.split_last() {
        Some((last, init)) if varargs => {
            let mut parts: Vec<String> = init.iter().map(|t| p.visit_type(t)).collect();
            let last = match last {
                TypeArg::Array(elem) => p.visit_type(elem),
                other => p.visit_type(other),
            };
            parts.push(format!("{last}..."));
            parts.join(",")
        }
        _ => visit_types(p, params),
    }
}

/// Structural printer over a localizer.
pub struct DefaultPrinter<'a> {
    localizer: &'a dyn Localize,
}

impl<'a> DefaultPrinter<'a> {
    pub fn new(localizer: &'a dyn Localize) -> Self {
        DefaultPrinter { localizer }
    }
}

impl TypePrinter for DefaultPrinter<'_> {
    fn localize(&self, key: &str, args: &[String]) -> String {
        self.localizer.localize(key, args)
    }
}
