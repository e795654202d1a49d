use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// The output streams of a log.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WriterKind {
    /// Notes.
    Notice,
    Warning,
    Error,
    Stdout,
    Stderr,
}

impl WriterKind {
    pub const ALL: [WriterKind; 5] = [
        WriterKind::Notice,
        WriterKind::Warning,
        WriterKind::Error,
        WriterKind::Stdout,
        WriterKind::Stderr,
    ];
}

/// One boxed writer per [`WriterKind`]. Diagnostics go to stderr and
/// `Stdout` to stdout unless rebound.
pub(super) struct Writers {
    notice: Box<dyn Write>,
    warning: Box<dyn Write>,
    error: Box<dyn Write>,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl Default for Writers {
    fn default() -> Self {
        Writers {
            notice: Box::new(io::stderr()),
            warning: Box::new(io::stderr()),
            error: Box::new(io::stderr()),
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }
}

impl Writers {
    pub(super) fn get(&mut self, kind: WriterKind) -> &mut dyn Write {
        match kind {
            WriterKind::Notice => &mut *self.notice,
            WriterKind::Warning => &mut *self.warning,
            WriterKind::Error => &mut *self.error,
            WriterKind::Stdout => &mut *self.stdout,
            WriterKind::Stderr => &mut *self.stderr,
        }
    }

    pub(super) fn set(&mut self, kind: WriterKind, writer: Box<dyn Write>) {
        let slot = match kind {
            WriterKind::Notice => &mut self.notice,
            WriterKind::Warning => &mut self.warning,
            WriterKind::Error => &mut self.error,
            WriterKind::Stdout => &mut self.stdout,
            WriterKind::Stderr => &mut self.stderr,
        };
        *slot = writer;
    }
}

/// In-memory writer whose clones share one buffer.
///
/// Bind it to several streams to capture their interleaved output.
#[derive(Clone, Debug, Default)]
pub struct SharedWriter(Rc<RefCell<Vec<u8>>>);

impl SharedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
