//! Source files as seen by diagnostics.
//!
//! A [`DiagnosticSource`] wraps a [`FileObject`] and loads its characters on
//! first use. The loaded buffer is a cache: [`DiagnosticSource::reclaim`]
//! drops it and the next query reloads it. A file that cannot be read is
//! not an error for the caller. The failure is recorded (see
//! [`DiagnosticSource::take_load_error`]) and the source behaves as if it
//! were empty.

mod line_map;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub use line_map::{LineMap, TAB_WIDTH};

/// What a file holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Source,
    Class,
    Other,
}

/// A file diagnostics can point into.
pub trait FileObject: fmt::Debug {
    /// Full name, as shown in diagnostics.
    fn name(&self) -> &str;

    /// Last path segment of [`name`](FileObject::name).
    fn short_name(&self) -> &str {
        let name = self.name();
        match name.rfind(['/', '\\']) {
            Some(i) => &name[i + 1..],
            None => name,
        }
    }

    fn kind(&self) -> FileKind;

    /// Read the whole content.
    fn char_content(&self) -> io::Result<String>;
}

/// In-memory file, for tests and generated sources.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    kind: FileKind,
    content: Result<String, String>,
}

impl MemoryFile {
    /// A source file with `content`.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        MemoryFile {
            name: name.into(),
            kind: FileKind::Source,
            content: Ok(content.into()),
        }
    }

    /// A class file. Its content is never read by diagnostics.
    pub fn class(name: impl Into<String>) -> Self {
        MemoryFile {
            name: name.into(),
            kind: FileKind::Class,
            content: Ok(String::new()),
        }
    }

    /// A source file whose reads always fail with `reason`.
    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        MemoryFile {
            name: name.into(),
            kind: FileKind::Source,
            content: Err(reason.into()),
        }
    }
}

impl FileObject for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FileKind {
        self.kind
    }

    fn char_content(&self) -> io::Result<String> {
        match &self.content {
            Ok(content) => Ok(content.clone()),
            Err(reason) => Err(io::Error::other(reason.clone())),
        }
    }
}

/// File on disk. `.class` files are class files, anything else is source.
#[derive(Debug, Clone)]
pub struct PathFile {
    path: PathBuf,
    name: String,
}

impl PathFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        PathFile { path, name }
    }
}

impl FileObject for PathFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FileKind {
        if self.path.extension().is_some_and(|ext| ext == "class") {
            FileKind::Class
        } else {
            FileKind::Source
        }
    }

    fn char_content(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// Failure to load a source file's characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("error reading {file}; {reason}")]
    Unreadable { file: String, reason: String },
}

#[derive(Debug)]
struct Loaded {
    chars: Rc<[char]>,
    map: Rc<LineMap>,
}

#[derive(Debug)]
struct Inner {
    file: Option<Rc<dyn FileObject>>,
    cache: RefCell<Option<Loaded>>,
    load_error: RefCell<Option<SourceError>>,
}

/// A file plus lazily loaded text, for position queries.
///
/// Cloning is cheap and clones share the cache.
#[derive(Clone, Debug)]
pub struct DiagnosticSource(Rc<Inner>);

impl DiagnosticSource {
    pub fn new(file: Rc<dyn FileObject>) -> Self {
        Self::with_file(Some(file))
    }

    /// A source without a file. Every position query reports "not found"
    /// and nothing is ever loaded.
    pub fn no_source() -> Self {
        Self::with_file(None)
    }

    fn with_file(file: Option<Rc<dyn FileObject>>) -> Self {
        DiagnosticSource(Rc::new(Inner {
            file,
            cache: RefCell::new(None),
            load_error: RefCell::new(None),
        }))
    }

    pub fn is_no_source(&self) -> bool {
        self.0.file.is_none()
    }

    pub fn file(&self) -> Option<&Rc<dyn FileObject>> {
        self.0.file.as_ref()
    }

    /// File name, or `None` for [`no_source`](Self::no_source).
    pub fn name(&self) -> Option<&str> {
        self.0.file.as_deref().map(FileObject::name)
    }

    /// Whether both handles share one underlying source.
    pub fn ptr_eq(&self, other: &DiagnosticSource) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether the text is currently cached.
    pub fn is_loaded(&self) -> bool {
        self.0.cache.borrow().is_some()
    }

    /// Drop the cached text. The next query reloads it.
    pub fn reclaim(&self) {
        if self.0.cache.borrow_mut().take().is_some() {
            tracing::trace!(file = ?self.name(), "reclaimed source buffer");
        }
    }

    /// Take the error recorded by the last failed load, if any.
    pub fn take_load_error(&self) -> Option<SourceError> {
        self.0.load_error.borrow_mut().take()
    }

    fn load(&self) -> Option<(Rc<[char]>, Rc<LineMap>)> {
        let file = self.0.file.as_ref()?;
        if let Some(loaded) = self.0.cache.borrow().as_ref() {
            return Some((Rc::clone(&loaded.chars), Rc::clone(&loaded.map)));
        }
        let chars: Rc<[char]> = match file.char_content() {
            Ok(text) => text.chars().collect(),
            Err(e) => {
                let error = SourceError::Unreadable {
                    file: file.name().to_owned(),
                    reason: e.to_string(),
                };
                tracing::warn!(%error, "substituting an empty buffer");
                *self.0.load_error.borrow_mut() = Some(error);
                Rc::from(Vec::new())
            }
        };
        let map = Rc::new(LineMap::new(&chars, false));
        *self.0.cache.borrow_mut() = Some(Loaded {
            chars: Rc::clone(&chars),
            map: Rc::clone(&map),
        });
        Some((chars, map))
    }

    /// Loaded text and the start of the line holding `pos`, if `pos` is
    /// within the text.
    fn find_line(&self, pos: u32) -> Option<(Rc<[char]>, u32, Rc<LineMap>)> {
        let (chars, map) = self.load()?;
        if pos as usize > chars.len() {
            return None;
        }
        let line = map.line_number(pos);
        let start = map.start_position(line)?;
        Some((chars, start, map))
    }

    /// Line index over the loaded text, without tab expansion.
    pub fn line_map(&self) -> Option<Rc<LineMap>> {
        self.load().map(|(_, map)| map)
    }

    /// 1-based line of `pos`.
    pub fn line_number(&self, pos: u32) -> Option<u32> {
        let (_, _, map) = self.find_line(pos)?;
        Some(map.line_number(pos))
    }

    /// 1-based column of `pos`, optionally expanding tabs.
    pub fn column_number(&self, pos: u32, expand_tabs: bool) -> Option<u32> {
        let (chars, start, _) = self.find_line(pos)?;
        let mut column = 0;
        for bp in start..pos {
            let ch = *chars.get(bp as usize)?;
            column = if ch == '\t' && expand_tabs {
                column / TAB_WIDTH * TAB_WIDTH + TAB_WIDTH
            } else {
                column + 1
            };
        }
        Some(column + 1)
    }

    /// Text of the line holding `pos`, without its terminator. `None` when
    /// the line is empty or `pos` is not found.
    pub fn line(&self, pos: u32) -> Option<String> {
        let (chars, start, _) = self.find_line(pos)?;
        let line: String = chars[start as usize..]
            .iter()
            .take_while(|&&c| c != '\n' && c != '\r')
            .collect();
        (!line.is_empty()).then_some(line)
    }
}

/// Bounded, least-recently-used set of sources.
///
/// Evicted sources have their buffers reclaimed. Handles held elsewhere
/// stay valid and reload on their next query.
#[derive(Debug)]
pub struct SourceCache {
    entries: VecDeque<DiagnosticSource>,
    limit: usize,
}

impl SourceCache {
    pub fn new(limit: usize) -> Self {
        SourceCache {
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// The source for `file`, creating it on first request.
    pub fn get(&mut self, file: &Rc<dyn FileObject>) -> DiagnosticSource {
        let name = file.name();
        if let Some(i) = self.entries.iter().position(|s| s.name() == Some(name)) {
            if let Some(source) = self.entries.remove(i) {
                self.entries.push_back(source.clone());
                return source;
            }
        }
        let source = DiagnosticSource::new(Rc::clone(file));
        self.entries.push_back(source.clone());
        while self.entries.len() > self.limit {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::trace!(file = ?evicted.name(), "evicting source");
                evicted.reclaim();
            }
        }
        source
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests;
