//! Message arguments.
//!
//! Formatters dispatch on the argument's variant. Types and symbols arrive
//! already converted by the type checker into [`TypeArg`] / [`SymbolArg`],
//! which carry just enough structure to print them and to explain them in
//! "where" clauses.

use std::fmt;
use std::rc::Rc;

use super::Diagnostic;
use crate::messages::Messages;
use crate::source::FileObject;

/// An argument the formatter knows nothing about.
pub trait Renderable: fmt::Debug + fmt::Display {
    /// Localized rendering. Raw output always uses `Display`.
    fn render(&self, _messages: &Messages) -> String {
        self.to_string()
    }
}

/// One message argument.
#[derive(Clone, Debug)]
pub enum DiagArg {
    /// A nested diagnostic, usually a fragment.
    Diagnostic(Box<Diagnostic>),
    /// Rendered element-wise, joined with `,`.
    List(Vec<DiagArg>),
    Text(String),
    Int(i64),
    Kind(KindName),
    File(Rc<dyn FileObject>),
    Type(TypeArg),
    Symbol(SymbolArg),
    /// A source expression at character offset `pos`.
    Expr { pos: u32, text: String },
    Opaque(Rc<dyn Renderable>),
}

impl From<&str> for DiagArg {
    fn from(s: &str) -> Self {
        DiagArg::Text(s.to_owned())
    }
}

impl From<String> for DiagArg {
    fn from(s: String) -> Self {
        DiagArg::Text(s)
    }
}

impl From<i64> for DiagArg {
    fn from(n: i64) -> Self {
        DiagArg::Int(n)
    }
}

impl From<Diagnostic> for DiagArg {
    fn from(d: Diagnostic) -> Self {
        DiagArg::Diagnostic(Box::new(d))
    }
}

impl From<TypeArg> for DiagArg {
    fn from(t: TypeArg) -> Self {
        DiagArg::Type(t)
    }
}

impl From<SymbolArg> for DiagArg {
    fn from(s: SymbolArg) -> Self {
        DiagArg::Symbol(s)
    }
}

impl From<KindName> for DiagArg {
    fn from(k: KindName) -> Self {
        DiagArg::Kind(k)
    }
}

/// Kind of a named entity, as used in "cannot find symbol: class Foo".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KindName {
    Annotation,
    Constructor,
    Interface,
    Enum,
    Static,
    TypeVariable,
    Bound,
    Variable,
    Value,
    Method,
    Class,
    Package,
    Module,
    Record,
}

impl KindName {
    /// Message key, relative to `compiler.misc.`.
    pub fn key(self) -> &'static str {
        match self {
            KindName::Annotation => "kindname.annotation",
            KindName::Constructor => "kindname.constructor",
            KindName::Interface => "kindname.interface",
            KindName::Enum => "kindname.enum",
            KindName::Static => "kindname.static",
            KindName::TypeVariable => "kindname.type.variable",
            KindName::Bound => "kindname.type.variable.bound",
            KindName::Variable => "kindname.variable",
            KindName::Value => "kindname.value",
            KindName::Method => "kindname.method",
            KindName::Class => "kindname.class",
            KindName::Package => "kindname.package",
            KindName::Module => "kindname.module",
            KindName::Record => "kindname.record",
        }
    }
}

/// A class name split into package and (possibly nested) simple names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassName {
    pub package: String,
    /// Outermost first.
    pub names: Vec<String>,
}

impl ClassName {
    /// Parse `a.b.Outer.Inner` style names. Segments starting with an
    /// uppercase letter begin the class part.
    pub fn parse(qualified: &str) -> Self {
        let segments: Vec<&str> = qualified.split('.').collect();
        let split = segments
            .iter()
            .position(|s| s.starts_with(|c: char| c.is_uppercase()))
            .unwrap_or(segments.len().saturating_sub(1));
        ClassName {
            package: segments[..split].join("."),
            names: segments[split..].iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    pub fn new(package: &str, names: &[&str]) -> Self {
        ClassName {
            package: package.to_owned(),
            names: names.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Fully qualified name.
    pub fn qualified(&self) -> String {
        let nested = self.names.join(".");
        if self.package.is_empty() {
            nested
        } else {
            format!("{}.{nested}", self.package)
        }
    }

    /// Innermost simple name.
    pub fn simple(&self) -> &str {
        self.names.last().map_or("", String::as_str)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// `?`, `? extends`, `? super`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WildcardKind {
    Unbound,
    Extends,
    Super,
}

impl WildcardKind {
    pub fn prefix(self) -> &'static str {
        match self {
            WildcardKind::Unbound => "?",
            WildcardKind::Extends => "? extends ",
            WildcardKind::Super => "? super ",
        }
    }
}

/// A type variable. `id` is its identity: two variables with the same
/// name and different ids are distinct.
#[derive(Clone, Debug)]
pub struct TypeVar {
    pub id: u32,
    pub name: String,
    /// Declared upper bounds. Empty means unbounded.
    pub bounds: Vec<TypeArg>,
    pub declared_in: SymbolArg,
    /// Introduced by inference rather than declared in source.
    pub synthetic: bool,
}

/// The capture of a wildcard.
#[derive(Clone, Debug)]
pub struct CapturedType {
    pub id: u32,
    pub upper: TypeArg,
    pub lower: Option<TypeArg>,
    /// The captured wildcard.
    pub wildcard: TypeArg,
}

/// `A & B & C`. The first component is the supertype.
#[derive(Clone, Debug)]
pub struct IntersectionType {
    pub id: u32,
    pub components: Vec<TypeArg>,
}

/// A type, as handed to the formatter.
#[derive(Clone, Debug)]
pub enum TypeArg {
    Primitive(String),
    Class { name: ClassName, args: Vec<TypeArg> },
    Array(Box<TypeArg>),
    TypeVar(Rc<TypeVar>),
    Captured(Rc<CapturedType>),
    Wildcard {
        kind: WildcardKind,
        bound: Option<Box<TypeArg>>,
    },
    Intersection(Rc<IntersectionType>),
}

impl TypeArg {
    pub fn class(qualified: &str) -> Self {
        TypeArg::Class {
            name: ClassName::parse(qualified),
            args: Vec::new(),
        }
    }

    pub fn generic(qualified: &str, args: Vec<TypeArg>) -> Self {
        TypeArg::Class {
            name: ClassName::parse(qualified),
            args,
        }
    }
}

/// A symbol, as handed to the formatter.
#[derive(Clone, Debug)]
pub enum SymbolArg {
    Class(ClassName),
    Method {
        owner: ClassName,
        /// `<init>` for constructors.
        name: String,
        type_params: Vec<TypeArg>,
        params: Vec<TypeArg>,
        varargs: bool,
    },
    Variable {
        name: String,
    },
    /// Empty for the unnamed package.
    Package(String),
}

impl SymbolArg {
    pub fn kind_name(&self) -> KindName {
        match self {
            SymbolArg::Class(_) => KindName::Class,
            SymbolArg::Method { name, .. } if name == "<init>" => KindName::Constructor,
            SymbolArg::Method { .. } => KindName::Method,
            SymbolArg::Variable { .. } => KindName::Variable,
            SymbolArg::Package(_) => KindName::Package,
        }
    }
}
