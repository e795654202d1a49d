//! Single-buffer name table.

use super::{hash_bytes, InternError, NameTable};

const DEFAULT_HASH_SIZE: usize = 0x8000;
const DEFAULT_BYTE_SIZE: usize = 0x20000;
const NO_ENTRY: u32 = u32::MAX;

/// Interned name handle for [`SharedNameTable`].
///
/// Index into the table's entry list; equality is index equality.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SharedName(u32);

impl SharedName {
    /// The empty name, pre-interned at index 0.
    pub const EMPTY: SharedName = SharedName(0);

    /// Raw entry index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

#[derive(Copy, Clone)]
struct Entry {
    offset: u32,
    len: u32,
    /// Next entry in the same bucket, or `NO_ENTRY`.
    next: u32,
}

/// Name table storing every name in one growable byte buffer.
pub struct SharedNameTable {
    bytes: Vec<u8>,
    entries: Vec<Entry>,
    buckets: Box<[u32]>,
    mask: u32,
    disposed: bool,
}

impl SharedNameTable {
    /// Create a table with the default bucket count and buffer size.
    pub fn new() -> Self {
        Self::with_sizes(DEFAULT_HASH_SIZE, DEFAULT_BYTE_SIZE)
    }

    /// Create a table with `hash_size` buckets (rounded up to a power of
    /// two) and an initial byte buffer of `byte_size`.
    pub fn with_sizes(hash_size: usize, byte_size: usize) -> Self {
        let hash_size = hash_size.max(1).next_power_of_two();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "bucket counts are far below u32::MAX"
        )]
        let mask = (hash_size - 1) as u32;
        let mut table = SharedNameTable {
            bytes: Vec::with_capacity(byte_size),
            entries: Vec::with_capacity(256),
            buckets: vec![NO_ENTRY; hash_size].into_boxed_slice(),
            mask,
            disposed: false,
        };
        // Index 0 is always the empty name.
        let empty = table.insert(&[], hash_bytes(&[]) & mask);
        debug_assert_eq!(empty, Ok(SharedName::EMPTY));
        table
    }

    fn entry_bytes(&self, entry: Entry) -> &[u8] {
        let start = entry.offset as usize;
        self.bytes
            .get(start..start + entry.len as usize)
            .unwrap_or_default()
    }

    fn insert(&mut self, bytes: &[u8], bucket: u32) -> Result<SharedName, InternError> {
        let overflow = || InternError::Overflow {
            count: self.entries.len(),
            bytes: self.bytes.len(),
        };
        let index = u32::try_from(self.entries.len())
            .ok()
            .filter(|&i| i != NO_ENTRY)
            .ok_or_else(overflow)?;
        let offset = u32::try_from(self.bytes.len()).map_err(|_| overflow())?;
        let len = u32::try_from(bytes.len()).map_err(|_| overflow())?;
        if offset.checked_add(len).is_none() {
            return Err(overflow());
        }

        let needed = self.bytes.len() + bytes.len();
        if needed > self.bytes.capacity() {
            let grown = (self.bytes.capacity() * 2).max(needed);
            tracing::trace!(from = self.bytes.capacity(), to = grown, "growing name buffer");
            self.bytes.reserve_exact(grown - self.bytes.len());
        }
        self.bytes.extend_from_slice(bytes);

        let slot = &mut self.buckets[bucket as usize];
        self.entries.push(Entry {
            offset,
            len,
            next: *slot,
        });
        *slot = index;
        Ok(SharedName(index))
    }
}

impl Default for SharedNameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NameTable for SharedNameTable {
    type Name = SharedName;

    fn try_from_bytes(&mut self, bytes: &[u8]) -> Result<SharedName, InternError> {
        if self.disposed {
            return Err(InternError::TableDisposed);
        }
        let bucket = hash_bytes(bytes) & self.mask;
        let mut cursor = self.buckets[bucket as usize];
        while cursor != NO_ENTRY {
            let entry = self.entries[cursor as usize];
            if self.entry_bytes(entry) == bytes {
                return Ok(SharedName(cursor));
            }
            cursor = entry.next;
        }
        self.insert(bytes, bucket)
    }

    fn bytes<'a>(&'a self, name: &'a SharedName) -> &'a [u8] {
        match self.entries.get(name.0 as usize) {
            Some(&entry) => self.entry_bytes(entry),
            None => &[],
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn dispose(&mut self) {
        tracing::debug!(names = self.entries.len(), "disposing shared name table");
        self.bytes = Vec::new();
        self.entries = Vec::new();
        self.buckets.iter_mut().for_each(|b| *b = NO_ENTRY);
        self.disposed = true;
    }
}
