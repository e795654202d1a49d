//! Byte-sequence interning.
//!
//! A [`NameTable`] maps byte sequences to `Name` handles such that two
//! requests with identical content yield the *same* handle. Comparing names
//! is then an identity check, never a content comparison.
//!
//! Two strategies implement the same trait:
//! - [`SharedNameTable`]: every name lives in one growable byte buffer; a
//!   name is a `Copy` index. Names live until the table is disposed.
//! - [`UnsharedNameTable`]: every name owns its bytes. The table only holds
//!   weak references, so names nobody holds any more are reclaimed and their
//!   dead entries pruned the next time their bucket is walked.
//!
//! # Example
//!
//! ```text
//! table.from_string("Foo") == table.from_string("Foo")   // same handle
//! table.from_string("Foo") != table.from_string("Bar")
//! ```

mod shared;
mod unshared;

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

pub use shared::{SharedName, SharedNameTable};
pub use unshared::{UnsharedName, UnsharedNameTable};

/// Error when interning fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    /// The table was disposed; it holds no storage any more.
    #[error("name table has been disposed")]
    TableDisposed,
    /// The table ran out of addressable space.
    #[error("name table exceeded capacity: {count} names, {bytes} bytes")]
    Overflow { count: usize, bytes: usize },
}

/// Bucket-selection hash: `h = h * 31 + b` over every byte.
///
/// Not a stable value; only used to pick a bucket.
#[inline]
pub(crate) fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut hash = 0u32;
    for &byte in bytes {
        hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
    }
    hash
}

/// Interning table for byte sequences.
pub trait NameTable {
    /// Handle for an interned sequence. Equality is identity.
    type Name: Clone + Eq + Hash + fmt::Debug;

    /// Intern `bytes`, or fail if the table cannot take more names.
    fn try_from_bytes(&mut self, bytes: &[u8]) -> Result<Self::Name, InternError>;

    /// Bytes of an interned name.
    ///
    /// Names from a disposed table yield an unspecified slice.
    fn bytes<'a>(&'a self, name: &'a Self::Name) -> &'a [u8];

    /// Number of live names.
    fn len(&self) -> usize;

    /// Release all backing storage.
    fn dispose(&mut self);

    /// Intern `bytes`.
    ///
    /// # Panics
    /// Panics if the table is disposed or full. Use
    /// [`try_from_bytes`](Self::try_from_bytes) to handle those cases.
    fn from_bytes(&mut self, bytes: &[u8]) -> Self::Name {
        match self.try_from_bytes(bytes) {
            Ok(name) => name,
            Err(e) => panic!("{e}"),
        }
    }

    /// Intern the UTF-8 encoding of `chars`.
    fn from_chars(&mut self, chars: &[char]) -> Self::Name {
        let s: String = chars.iter().collect();
        self.from_bytes(s.as_bytes())
    }

    /// Intern the UTF-8 bytes of `s`.
    fn from_string(&mut self, s: &str) -> Self::Name {
        self.from_bytes(s.as_bytes())
    }

    /// Name content as text, replacing invalid UTF-8.
    fn text<'a>(&'a self, name: &'a Self::Name) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes(name))
    }

    /// Whether the table holds no names.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of a name in bytes.
    fn byte_len(&self, name: &Self::Name) -> usize {
        self.bytes(name).len()
    }

    /// Whether `name` is the empty sequence.
    fn is_empty_name(&self, name: &Self::Name) -> bool {
        self.bytes(name).is_empty()
    }

    /// Whether `name` starts with the bytes of `prefix`.
    fn starts_with(&self, name: &Self::Name, prefix: &Self::Name) -> bool {
        self.bytes(name).starts_with(self.bytes(prefix))
    }

    /// Index of the last occurrence of `byte` in `name`.
    fn last_index_of(&self, name: &Self::Name, byte: u8) -> Option<usize> {
        self.bytes(name).iter().rposition(|&b| b == byte)
    }

    /// Intern the bytes `start..end` of `name`.
    fn sub_name(&mut self, name: &Self::Name, start: usize, end: usize) -> Self::Name {
        let slice = self.bytes(name)[start..end].to_vec();
        self.from_bytes(&slice)
    }

    /// Intern the concatenation of `a` and `b`.
    fn concat(&mut self, a: &Self::Name, b: &Self::Name) -> Self::Name {
        let mut joined = self.bytes(a).to_vec();
        joined.extend_from_slice(self.bytes(b));
        self.from_bytes(&joined)
    }
}

/// Names the compiler refers to by identity, interned once up front.
#[derive(Clone, Debug)]
pub struct Names<N> {
    pub empty: N,
    pub error: N,
    pub init: N,
    pub clinit: N,
    pub this: N,
    pub super_: N,
    pub java_lang: N,
}

impl<N> Names<N> {
    /// Pre-intern the well-known names in `table`.
    pub fn new<T>(table: &mut T) -> Self
    where
        T: NameTable<Name = N>,
    {
        Names {
            empty: table.from_string(""),
            error: table.from_string("<any>"),
            init: table.from_string("<init>"),
            clinit: table.from_string("<clinit>"),
            this: table.from_string("this"),
            super_: table.from_string("super"),
            java_lang: table.from_string("java.lang"),
        }
    }
}
