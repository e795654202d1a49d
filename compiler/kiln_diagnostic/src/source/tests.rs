use super::*;
use pretty_assertions::assert_eq;

fn source(name: &str, text: &str) -> DiagnosticSource {
    DiagnosticSource::new(Rc::new(MemoryFile::new(name, text)))
}

// === LineMap ===

#[test]
fn line_numbers_with_mixed_terminators() {
    let map = LineMap::for_text("ab\ncde\r\nfg", false);
    assert_eq!(map.line_number(0), 1);
    assert_eq!(map.line_number(3), 2);
    assert_eq!(map.line_number(8), 3);
    assert_eq!(map.line_count(), 3);
    // CRLF is one boundary: line 3 starts at the 'f'.
    assert_eq!(map.start_position(3), Some(8));
}

#[test]
fn first_column_of_each_line_is_one() {
    let map = LineMap::for_text("ab\ncde\r\nfg", false);
    for line in 1..=3 {
        let start = map.start_position(line).unwrap_or_default();
        assert_eq!(map.column_number(start), 1);
    }
    assert_eq!(map.column_number(5), 3);
}

#[test]
fn lone_carriage_return_ends_a_line() {
    let map = LineMap::for_text("a\rb\r\rc", false);
    assert_eq!(map.line_count(), 4);
    assert_eq!(map.line_number(5), 4);
}

#[test]
fn trailing_terminator_starts_empty_line() {
    let map = LineMap::for_text("int x = ;\n", false);
    assert_eq!(map.line_count(), 2);
    assert_eq!(map.line_number(9), 1);
    assert_eq!(map.line_number(10), 2);
}

#[test]
fn repeated_lookup_hits_cache() {
    let map = LineMap::for_text("a\nb\nc", false);
    assert_eq!(map.line_number(4), 3);
    assert_eq!(map.line_number(4), 3);
    assert_eq!(map.line_number(0), 1);
}

#[test]
fn tabs_expand_to_multiples_of_eight() {
    let map = LineMap::for_text("\tx\n ab\tc", true);
    assert_eq!(map.column_number(1), 9);
    // " ab" then a tab: column 3 rounds up to 8.
    assert_eq!(map.column_number(7), 9);
    let plain = LineMap::for_text("\tx\n ab\tc", false);
    assert_eq!(plain.column_number(1), 2);
}

#[test]
fn position_inverts_column() {
    let map = LineMap::for_text("a\tb\nxyz", true);
    assert_eq!(map.position(1, 9), Some(2));
    assert_eq!(map.position(1, 5), Some(1));
    assert_eq!(map.position(2, 3), Some(6));

    let plain = LineMap::for_text("a\tb\nxyz", false);
    assert_eq!(plain.position(2, 2), Some(5));
    assert_eq!(plain.position(0, 1), None);
    assert_eq!(plain.position(3, 1), None);
    assert_eq!(plain.position(1, 0), None);
}

#[test]
fn position_with_huge_column_is_not_found() {
    let map = LineMap::for_text("a\nb", false);
    assert_eq!(map.position(2, u32::MAX), None);
    assert_eq!(map.position(1, u32::MAX), Some(u32::MAX - 1));
}

// === DiagnosticSource ===

#[test]
fn no_source_reports_not_found() {
    let source = DiagnosticSource::no_source();
    assert!(source.is_no_source());
    assert_eq!(source.name(), None);
    assert_eq!(source.line_number(0), None);
    assert_eq!(source.column_number(0, false), None);
    assert_eq!(source.line(0), None);
    assert!(!source.is_loaded());
}

#[test]
fn line_and_column_queries() {
    let source = source("T.java", "class T {\n\tint x;\n}\n");
    assert_eq!(source.line_number(12), Some(2));
    assert_eq!(source.line(12), Some("\tint x;".to_owned()));
    assert_eq!(source.column_number(12, false), Some(3));
    assert_eq!(source.column_number(12, true), Some(10));
    assert!(source.is_loaded());
}

#[test]
fn queries_are_idempotent() {
    let source = source("T.java", "a\nbc\n");
    let first = (source.line_number(3), source.column_number(3, true), source.line(3));
    let second = (source.line_number(3), source.column_number(3, true), source.line(3));
    assert_eq!(first, second);
    assert_eq!(first, (Some(2), Some(2), Some("bc".to_owned())));
}

#[test]
fn out_of_range_and_empty_lines() {
    let source = source("T.java", "x\n\ny");
    assert_eq!(source.line(2), None);
    assert_eq!(source.line_number(2), Some(2));
    assert_eq!(source.line_number(4), Some(3));
    assert_eq!(source.line_number(5), None);
    assert_eq!(source.line(5), None);
}

#[test]
fn reclaimed_buffer_reloads() {
    let source = source("T.java", "a\nb");
    assert_eq!(source.line_number(2), Some(2));
    source.reclaim();
    assert!(!source.is_loaded());
    assert_eq!(source.line(2), Some("b".to_owned()));
    assert!(source.is_loaded());
}

#[test]
fn unreadable_file_behaves_as_empty() {
    let source = DiagnosticSource::new(Rc::new(MemoryFile::unreadable("Gone.java", "no such file")));
    assert_eq!(source.line(0), None);
    assert_eq!(source.line_number(0), Some(1));
    assert_eq!(
        source.take_load_error(),
        Some(SourceError::Unreadable {
            file: "Gone.java".to_owned(),
            reason: "no such file".to_owned(),
        })
    );
    assert_eq!(source.take_load_error(), None);
}

#[test]
fn short_name_is_last_segment() {
    assert_eq!(MemoryFile::new("src/pkg/T.java", "").short_name(), "T.java");
    assert_eq!(MemoryFile::new("T.java", "").short_name(), "T.java");
    assert_eq!(PathFile::new("out/T.class").kind(), FileKind::Class);
    assert_eq!(PathFile::new("src/T.java").kind(), FileKind::Source);
}

// === SourceCache ===

#[test]
fn cache_reuses_and_evicts_least_recent() {
    let mut cache = SourceCache::new(2);
    let a: Rc<dyn FileObject> = Rc::new(MemoryFile::new("A.java", "a"));
    let b: Rc<dyn FileObject> = Rc::new(MemoryFile::new("B.java", "b"));
    let c: Rc<dyn FileObject> = Rc::new(MemoryFile::new("C.java", "c"));

    let sa = cache.get(&a);
    assert!(sa.ptr_eq(&cache.get(&a)));
    sa.line(0);
    let sb = cache.get(&b);
    sb.line(0);
    // Touch A so B is the least recently used.
    cache.get(&a);
    cache.get(&c);
    assert_eq!(cache.len(), 2);
    assert!(sa.is_loaded());
    assert!(!sb.is_loaded());
    assert_eq!(sb.line(0), Some("b".to_owned()));
    assert!(!sb.ptr_eq(&cache.get(&b)));
}
