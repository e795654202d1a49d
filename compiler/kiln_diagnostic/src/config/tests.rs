use super::*;
use pretty_assertions::assert_eq;

// === Options ===

#[test]
fn options_put_get_remove() {
    let mut options = Options::from_pairs([("-nowarn", ""), ("diags.layout", "%m")]);
    assert!(options.is_set("-nowarn"));
    assert_eq!(options.get("diags.layout"), Some("%m"));
    options.put("diags.layout", "%f");
    assert_eq!(options.get("diags.layout"), Some("%f"));
    assert_eq!(options.remove("diags.layout"), Some("%f".to_owned()));
    assert!(!options.is_set("diags.layout"));
}

// === Formatter configuration ===

#[test]
fn basic_defaults() {
    let config = FormatterConfig::from_options(&Options::new());
    assert_eq!(config.visible, DiagnosticParts::all());
    assert_eq!(config.multiline, MultilineLimits::default());
    assert!(config.caret);
    assert_eq!(config.indentation, Indentation::default());
    assert_eq!(config.source_position, SourcePosition::AfterSummary);
    assert_eq!(config.formats, BasicFormats::modern());
}

#[test]
fn raw_hides_source_unless_requested() {
    let config = FormatterConfig::raw_from_options(&Options::new());
    assert!(!config.visible.contains(DiagnosticParts::SOURCE));

    let options = Options::from_pairs([("diags.showSource", "true")]);
    let config = FormatterConfig::raw_from_options(&options);
    assert!(config.visible.contains(DiagnosticParts::SOURCE));
}

#[test]
fn formatter_options_override_show_source() {
    let options = Options::from_pairs([
        ("diags.showSource", "true"),
        ("diags.formatterOptions", "short,-source"),
    ]);
    let config = FormatterConfig::from_options(&options);
    assert_eq!(config.visible, DiagnosticParts::SUMMARY);
}

#[test]
fn multiline_policy_disabled_shows_summary_only() {
    let options = Options::from_pairs([
        ("diags.showSource", "true"),
        ("diags.multilinePolicy", "disabled"),
    ]);
    let config = FormatterConfig::from_options(&options);
    assert_eq!(config.visible, DiagnosticParts::SUMMARY);
}

#[test]
fn multiline_limits_parse() {
    assert_eq!(
        parse_multiline_limits("3:2"),
        Ok(MultilineLimits {
            depth: Some(2),
            length: Some(3)
        })
    );
    assert_eq!(
        parse_multiline_limits("*:1"),
        Ok(MultilineLimits {
            depth: Some(1),
            length: None
        })
    );
    assert_eq!(
        parse_multiline_limits("-5"),
        Ok(MultilineLimits {
            depth: None,
            length: None
        })
    );
    assert!(parse_multiline_limits("x:1").is_err());
}

#[test]
fn malformed_multiline_limit_removes_limits() {
    let options = Options::from_pairs([("diags.multilinePolicy", "limit:2:oops")]);
    let config = FormatterConfig::from_options(&options);
    assert_eq!(config.multiline, MultilineLimits::default());
    assert!(config.visible.contains(DiagnosticParts::SUBDIAGNOSTICS));
}

#[test]
fn caret_only_disabled_by_false() {
    let off = Options::from_pairs([("diags.showCaret", "false")]);
    let other = Options::from_pairs([("diags.showCaret", "no")]);
    assert!(!FormatterConfig::from_options(&off).caret);
    assert!(FormatterConfig::from_options(&other).caret);
}

#[test]
fn source_position_bottom() {
    let options = Options::from_pairs([("diags.sourcePosition", "bottom")]);
    let config = FormatterConfig::from_options(&options);
    assert_eq!(config.source_position, SourcePosition::Bottom);
}

// === Layouts ===

#[test]
fn layout_part_counts() {
    let mut formats = BasicFormats::modern();
    formats.apply_layout("A|B|C");
    assert_eq!((formats.pos.as_str(), formats.no_pos.as_str(), formats.class.as_str()), ("A", "B", "C"));

    let mut formats = BasicFormats::modern();
    formats.apply_layout("A|B");
    assert_eq!((formats.pos.as_str(), formats.no_pos.as_str()), ("A", "B"));
    assert_eq!(formats.class, BasicFormats::modern().class);

    let mut formats = BasicFormats::modern();
    formats.apply_layout("A|B|C|D");
    assert_eq!(formats.pos, "A");
    assert_eq!(formats.no_pos, BasicFormats::modern().no_pos);
    assert_eq!(formats.class, BasicFormats::modern().class);
}

#[test]
fn layout_wins_over_legacy_flag() {
    let options = Options::from_pairs([("diags.legacy", ""), ("diags.layout", "%m")]);
    let config = FormatterConfig::from_options(&options);
    assert_eq!(config.formats.pos, "%m");
    assert_eq!(config.formats.class, BasicFormats::legacy().class);
}

#[test]
fn layout_old_selects_legacy() {
    let options = Options::from_pairs([("diags.layout", "OLD")]);
    let config = FormatterConfig::from_options(&options);
    assert_eq!(config.formats, BasicFormats::legacy());
}

// === Indentation ===

#[test]
fn indentation_fallthrough() {
    assert_eq!(
        parse_indentation("1|3"),
        Ok(Indentation {
            summary: 1,
            details: 3,
            ..Indentation::default()
        })
    );

    // The second part is applied after the fifth and wins.
    assert_eq!(
        parse_indentation("0|1|2|3|9"),
        Ok(Indentation {
            summary: 0,
            details: 1,
            source: 2,
            subdiagnostics: 3,
        })
    );
}

#[test]
fn indentation_with_extra_parts_sets_summary_only() {
    assert_eq!(
        parse_indentation("7|1|2|3|9|5"),
        Ok(Indentation {
            summary: 7,
            ..Indentation::default()
        })
    );
}

#[test]
fn malformed_indentation_resets() {
    let options = Options::from_pairs([("diags.indent", "1|x")]);
    let config = FormatterConfig::from_options(&options);
    assert_eq!(config.indentation, Indentation::default());
}

// === Rich features ===

#[test]
fn rich_features_default_by_inner_formatter() {
    let none = Options::new();
    assert_eq!(RichFeatures::from_options(&none, false), RichFeatures::all());
    assert_eq!(RichFeatures::from_options(&none, true), RichFeatures::empty());

    let options = Options::from_pairs([("diags.formatterOptions", "-where,short,disambiguateTvars")]);
    assert_eq!(
        RichFeatures::from_options(&options, false),
        RichFeatures::SIMPLE_NAMES | RichFeatures::UNIQUE_TYPEVAR_NAMES
    );
    assert_eq!(
        RichFeatures::from_options(&options, true),
        RichFeatures::UNIQUE_TYPEVAR_NAMES
    );
}

// === Log configuration ===

#[test]
fn budgets() {
    assert_eq!(parse_budget("-Xmaxerrs", "5"), Ok(5));
    assert_eq!(parse_budget("-Xmaxerrs", "0"), Ok(usize::MAX));
    assert_eq!(parse_budget("-Xmaxerrs", "-3"), Ok(usize::MAX));
    assert!(parse_budget("-Xmaxerrs", "many").is_err());

    let options = Options::from_pairs([("-Xmaxerrs", "many"), ("-Xmaxwarns", "7")]);
    let config = LogConfig::from_options(&options);
    assert_eq!(config.max_errors, DEFAULT_MAX_DIAGNOSTICS);
    assert_eq!(config.max_warnings, 7);
}

#[test]
fn log_flags() {
    let options = Options::from_pairs([("-nowarn", ""), ("suppressNotes", "")]);
    let config = LogConfig::from_options(&options);
    assert!(!config.emit_warnings);
    assert!(config.suppress_notes);
    assert_eq!(config.source_cache_limit, DEFAULT_SOURCE_CACHE_LIMIT);
}

#[test]
fn lint_switches_apply_left_to_right() {
    let disabled = parse_lint_switches("none,unchecked");
    assert!(!disabled.contains(&LintCategory::Unchecked));
    assert!(disabled.contains(&LintCategory::Deprecation));

    let disabled = parse_lint_switches("-cast,bogus,all,-divzero");
    assert_eq!(disabled.len(), 1);
    assert!(disabled.contains(&LintCategory::DivZero));

    let config = LogConfig::from_options(&Options::from_pairs([("-Xlint:", "-rawtypes")]));
    assert!(!config.is_lint_enabled(LintCategory::RawTypes));
    assert!(config.is_lint_enabled(LintCategory::Cast));
}
