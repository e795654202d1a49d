//! Per-name-array name table with weakly held entries.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use super::{hash_bytes, InternError, NameTable};

const DEFAULT_HASH_SIZE: usize = 0x8000;

/// Interned name handle for [`UnsharedNameTable`].
///
/// Owns its bytes. Equality and hashing use the allocation's identity,
/// which the table keeps unique per content while the name is alive.
#[derive(Clone)]
pub struct UnsharedName(Rc<[u8]>);

impl UnsharedName {
    /// The name's bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for UnsharedName {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for UnsharedName {}

impl Hash for UnsharedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0).cast::<u8>(), state);
    }
}

impl fmt::Debug for UnsharedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnsharedName({:?})", String::from_utf8_lossy(&self.0))
    }
}

/// Name table whose entries do not keep names alive.
///
/// Dropping every handle to a name frees its bytes. The stale bucket entry
/// is pruned lazily when the bucket is next walked, or eagerly by
/// [`purge`](UnsharedNameTable::purge).
pub struct UnsharedNameTable {
    buckets: Vec<Vec<Weak<[u8]>>>,
    mask: u32,
    disposed: bool,
}

impl UnsharedNameTable {
    /// Create a table with the default bucket count.
    pub fn new() -> Self {
        Self::with_hash_size(DEFAULT_HASH_SIZE)
    }

    /// Create a table with `hash_size` buckets, rounded up to a power of two.
    pub fn with_hash_size(hash_size: usize) -> Self {
        let hash_size = hash_size.max(1).next_power_of_two();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "bucket counts are far below u32::MAX"
        )]
        let mask = (hash_size - 1) as u32;
        UnsharedNameTable {
            buckets: vec![Vec::new(); hash_size],
            mask,
            disposed: false,
        }
    }

    /// Drop every dead entry in every bucket. Returns how many were removed.
    pub fn purge(&mut self) -> usize {
        let mut removed = 0;
        for bucket in &mut self.buckets {
            let before = bucket.len();
            bucket.retain(|w| w.strong_count() > 0);
            removed += before - bucket.len();
        }
        tracing::trace!(removed, "purged dead names");
        removed
    }
}

impl Default for UnsharedNameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NameTable for UnsharedNameTable {
    type Name = UnsharedName;

    fn try_from_bytes(&mut self, bytes: &[u8]) -> Result<UnsharedName, InternError> {
        if self.disposed {
            return Err(InternError::TableDisposed);
        }
        let bucket = &mut self.buckets[(hash_bytes(bytes) & self.mask) as usize];

        let mut found = None;
        bucket.retain(|weak| match weak.upgrade() {
            Some(live) => {
                if found.is_none() && *live == *bytes {
                    found = Some(live);
                }
                true
            }
            None => false,
        });
        if let Some(live) = found {
            return Ok(UnsharedName(live));
        }

        let name: Rc<[u8]> = Rc::from(bytes);
        bucket.push(Rc::downgrade(&name));
        Ok(UnsharedName(name))
    }

    fn bytes<'a>(&'a self, name: &'a UnsharedName) -> &'a [u8] {
        &name.0
    }

    fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.iter().filter(|w| w.strong_count() > 0).count())
            .sum()
    }

    fn dispose(&mut self) {
        tracing::debug!("disposing unshared name table");
        self.buckets = Vec::new();
        self.disposed = true;
    }
}
