use super::*;
use pretty_assertions::assert_eq;

use crate::source::MemoryFile;

fn source(text: &str) -> DiagnosticSource {
    DiagnosticSource::new(Rc::new(MemoryFile::new("T.java", text)))
}

// === Construction ===

#[test]
fn factory_builds_prefixed_codes() {
    let factory = DiagnosticFactory::default();
    assert_eq!(factory.prefix(), "compiler");
    assert_eq!(
        factory.code(DiagnosticType::Error, "cant.resolve"),
        "compiler.err.cant.resolve"
    );
    assert_eq!(factory.code(DiagnosticType::Warning, "x"), "compiler.warn.x");
    assert_eq!(factory.code(DiagnosticType::Note, "x"), "compiler.note.x");
    assert_eq!(factory.code(DiagnosticType::Fragment, "x"), "compiler.misc.x");

    let custom = DiagnosticFactory::new("tool");
    let d = custom.fragment("hint", Vec::new());
    assert_eq!(d.code(), "tool.misc.hint");
}

#[test]
fn kinds_follow_type_and_flags() {
    let factory = DiagnosticFactory::default();
    let src = DiagnosticSource::no_source();
    let error = factory.error(DiagnosticFlags::empty(), src.clone(), None, "e", Vec::new());
    let warning = factory.warning(None, src.clone(), None, "w", Vec::new());
    let mandatory = factory.mandatory_warning(None, src.clone(), None, "w", Vec::new());
    let note = factory.note(src.clone(), None, "n", Vec::new());
    let fragment = factory.fragment("f", Vec::new());

    assert_eq!(error.kind(), Kind::Error);
    assert_eq!(warning.kind(), Kind::Warning);
    assert_eq!(mandatory.kind(), Kind::MandatoryWarning);
    assert_eq!(note.kind(), Kind::Note);
    assert_eq!(fragment.kind(), Kind::Other);

    let mandatory_note = factory.mandatory_note(src, "n", Vec::new());
    assert!(mandatory_note.is_mandatory());
    assert_eq!(mandatory_note.kind(), Kind::Note);
}

#[test]
fn error_keeps_flags_and_warning_keeps_lint() {
    let factory = DiagnosticFactory::default();
    let src = DiagnosticSource::no_source();
    let flags = DiagnosticFlags::SYNTAX | DiagnosticFlags::RECOVERABLE;
    let error = factory.error(flags, src.clone(), None, "e", Vec::new());
    assert_eq!(error.flags(), flags);
    assert!(error.is_flag_set(DiagnosticFlags::SYNTAX));
    assert!(!error.is_flag_set(DiagnosticFlags::API));

    let warning = factory.warning(Some(LintCategory::Unchecked), src, None, "w", Vec::new());
    assert_eq!(warning.lint_category(), Some(LintCategory::Unchecked));
    assert_eq!(warning.flags(), DiagnosticFlags::empty());
}

#[test]
fn set_flag_accumulates() {
    let mut d = DiagnosticFactory::default().fragment("f", Vec::new());
    d.set_flag(DiagnosticFlags::COMPRESSED);
    let d = d.with_flag(DiagnosticFlags::NON_DEFERRABLE);
    assert_eq!(
        d.flags(),
        DiagnosticFlags::COMPRESSED | DiagnosticFlags::NON_DEFERRABLE
    );
}

// === Positions ===

#[test]
fn positions_are_exposed() {
    let d = DiagnosticFactory::default().error(
        DiagnosticFlags::empty(),
        source("int x;\nint y;\n"),
        Some(DiagnosticPosition::span(7, 11, 12)),
        "e",
        Vec::new(),
    );
    assert_eq!(d.start_position(), Some(7));
    assert_eq!(d.preferred_position(), Some(11));
    assert_eq!(d.end_position(), Some(12));
    assert_eq!(d.line_number(), Some(2));
    assert_eq!(d.column_number(), Some(5));
}

#[test]
fn column_expands_tabs() {
    let d = DiagnosticFactory::default().error(
        DiagnosticFlags::empty(),
        source("\tx;\n"),
        Some(DiagnosticPosition::at(1)),
        "e",
        Vec::new(),
    );
    assert_eq!(d.column_number(), Some(9));
}

#[test]
fn positionless_diagnostic_has_no_line() {
    let d = DiagnosticFactory::default().note(source("x"), None, "n", Vec::new());
    assert_eq!(d.position(), None);
    assert_eq!(d.line_number(), None);
    assert_eq!(d.column_number(), None);
}

#[test]
fn line_and_column_are_cached() {
    let src = source("int x;\n");
    let d = DiagnosticFactory::default().error(
        DiagnosticFlags::empty(),
        src.clone(),
        Some(DiagnosticPosition::at(4)),
        "e",
        Vec::new(),
    );
    assert_eq!(d.line_number(), Some(1));
    src.reclaim();
    assert_eq!(d.column_number(), Some(5));
    assert!(!src.is_loaded());
}

// === Sub-diagnostics ===

#[test]
fn multiline_when_subdiagnostics_present() {
    let factory = DiagnosticFactory::default();
    let d = factory.fragment("f", Vec::new());
    assert!(!d.is_multiline());
    let d = d.with_subdiagnostics(List::of(&[factory.fragment("g", Vec::new())]));
    assert!(d.is_multiline());
    assert_eq!(d.subdiagnostics().len(), 1);
}

// === Arguments ===

#[test]
fn class_name_parsing() {
    let name = ClassName::parse("java.util.Map.Entry");
    assert_eq!(name.package, "java.util");
    assert_eq!(name.names, vec!["Map".to_owned(), "Entry".to_owned()]);
    assert_eq!(name.simple(), "Entry");
    assert_eq!(name.qualified(), "java.util.Map.Entry");
    assert_eq!(name.to_string(), "java.util.Map.Entry");

    let lower = ClassName::parse("p.q.foo");
    assert_eq!(lower.package, "p.q");
    assert_eq!(lower.simple(), "foo");

    let bare = ClassName::parse("Main");
    assert_eq!(bare.package, "");
    assert_eq!(bare.qualified(), "Main");
}

#[test]
fn symbol_kind_names() {
    let owner = ClassName::new("p", &["A"]);
    let ctor = SymbolArg::Method {
        owner: owner.clone(),
        name: "<init>".to_owned(),
        type_params: Vec::new(),
        params: Vec::new(),
        varargs: false,
    };
    assert_eq!(ctor.kind_name(), KindName::Constructor);
    assert_eq!(SymbolArg::Class(owner).kind_name(), KindName::Class);
    assert_eq!(
        SymbolArg::Variable {
            name: "x".to_owned()
        }
        .kind_name(),
        KindName::Variable
    );
    assert_eq!(KindName::Bound.key(), "kindname.type.variable.bound");
}

#[test]
fn lint_category_options() {
    assert_eq!(LintCategory::from_option("dep-ann"), Some(LintCategory::DepAnn));
    assert_eq!(LintCategory::from_option("rawtypes"), Some(LintCategory::RawTypes));
    assert_eq!(LintCategory::from_option("bogus"), None);
    assert_eq!(LintCategory::DivZero.to_string(), "divzero");
    for category in LintCategory::ALL {
        assert_eq!(LintCategory::from_option(category.option()), Some(category));
    }
}
