/// Built-in texts for every key this crate emits on its own.
pub static DEFAULT_MESSAGES: &[(&str, &str)] = &[
    // Kind prefixes
    ("compiler.err.error", "error: "),
    ("compiler.warn.warning", "warning: "),
    ("compiler.note.note", "Note: "),
    ("compiler.warn.lintOption", "[{0}] "),
    // Counts
    ("compiler.misc.count.error", "{0} error"),
    ("compiler.misc.count.error.plural", "{0} errors"),
    ("compiler.misc.count.warn", "{0} warning"),
    ("compiler.misc.count.warn.plural", "{0} warnings"),
    (
        "compiler.misc.count.error.recompile",
        "only showing the first {0} errors, of {1} total; use -Xmaxerrs if you would like to see more",
    ),
    (
        "compiler.misc.count.warn.recompile",
        "only showing the first {0} warnings, of {1} total; use -Xmaxwarns if you would like to see more",
    ),
    ("compiler.err.error.reading.file", "error reading {0}; {1}"),
    (
        "compiler.note.compressed.diags",
        "Some messages have been simplified; recompile with -Xdiags:verbose to get full output",
    ),
    // Where clauses
    ("compiler.misc.where.description.typevar", "where {0} is a type-variable:"),
    ("compiler.misc.where.description.typevar.1", "where {0} are type-variables:"),
    ("compiler.misc.where.description.captured", "where {0} is a fresh type-variable:"),
    ("compiler.misc.where.description.captured.1", "where {0} are fresh type-variables:"),
    ("compiler.misc.where.description.intersection", "where {0} is an intersection type:"),
    ("compiler.misc.where.description.intersection.1", "where {0} are intersection types:"),
    ("compiler.misc.where.typevar", "{0} extends {1} declared in {2} {3}"),
    ("compiler.misc.where.typevar.1", "{0} declared in {2} {3}"),
    ("compiler.misc.where.fresh.typevar", "{0} extends {1}"),
    ("compiler.misc.where.captured", "{0} extends {1} super: {2} from capture of {3}"),
    ("compiler.misc.where.captured.1", "{0} extends {1} from capture of {3}"),
    ("compiler.misc.where.intersection", "{0} extends {1}"),
    // Type printing
    ("compiler.misc.captured.type", "CAP#{0}"),
    ("compiler.misc.intersection.type", "INT#{0}"),
    ("compiler.misc.type.var", "{0}#{1}"),
    ("compiler.misc.type.captureof", "capture#{0} of {1}"),
    ("compiler.misc.unnamed.package", "unnamed package"),
    // Kind names
    ("compiler.misc.kindname.annotation", "@interface"),
    ("compiler.misc.kindname.constructor", "constructor"),
    ("compiler.misc.kindname.interface", "interface"),
    ("compiler.misc.kindname.enum", "enum"),
    ("compiler.misc.kindname.static", "static"),
    ("compiler.misc.kindname.type.variable", "type variable"),
    ("compiler.misc.kindname.type.variable.bound", "bound of type variable"),
    ("compiler.misc.kindname.variable", "variable"),
    ("compiler.misc.kindname.value", "value"),
    ("compiler.misc.kindname.method", "method"),
    ("compiler.misc.kindname.class", "class"),
    ("compiler.misc.kindname.package", "package"),
    ("compiler.misc.kindname.module", "module"),
    ("compiler.misc.kindname.record", "record"),
    // Mandatory warning summaries
    ("compiler.note.deprecated.filename", "{0} uses or overrides a deprecated API."),
    (
        "compiler.note.deprecated.filename.additional",
        "{0} has additional uses or overrides of a deprecated API.",
    ),
    ("compiler.note.deprecated.plural", "Some input files use or override a deprecated API."),
    (
        "compiler.note.deprecated.plural.additional",
        "Some input files additionally use or override a deprecated API.",
    ),
    ("compiler.note.deprecated.recompile", "Recompile with -Xlint:deprecation for details."),
    (
        "compiler.note.removal.filename",
        "{0} uses or overrides a deprecated API that is marked for removal.",
    ),
    (
        "compiler.note.removal.filename.additional",
        "{0} has additional uses or overrides of a deprecated API that is marked for removal.",
    ),
    (
        "compiler.note.removal.plural",
        "Some input files use or override a deprecated API that is marked for removal.",
    ),
    (
        "compiler.note.removal.plural.additional",
        "Some input files additionally use or override a deprecated API that is marked for removal.",
    ),
    ("compiler.note.removal.recompile", "Recompile with -Xlint:removal for details."),
    ("compiler.note.unchecked.filename", "{0} uses unchecked or unsafe operations."),
    (
        "compiler.note.unchecked.filename.additional",
        "{0} has additional unchecked or unsafe operations.",
    ),
    ("compiler.note.unchecked.plural", "Some input files use unchecked or unsafe operations."),
    (
        "compiler.note.unchecked.plural.additional",
        "Some input files additionally use unchecked or unsafe operations.",
    ),
    ("compiler.note.unchecked.recompile", "Recompile with -Xlint:unchecked for details."),
    ("compiler.note.preview.filename", "{0} uses preview features."),
    ("compiler.note.preview.filename.additional", "{0} has additional uses of preview features."),
    ("compiler.note.preview.plural", "Some input files use preview features."),
    (
        "compiler.note.preview.plural.additional",
        "Some input files additionally use preview features.",
    ),
    ("compiler.note.preview.recompile", "Recompile with -Xlint:preview for details."),
];
