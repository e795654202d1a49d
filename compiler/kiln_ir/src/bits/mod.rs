//! Growable bit sets with a tri-state lifecycle.
//!
//! [`Bits`] is the membership set used by flow-analysis style passes. Beyond
//! ordinary set operations it tracks *whether it has a value at all*: a set
//! that was [`reset`](Bits::reset) is `Unknown`, which is different from an
//! empty set. Reading or mutating an `Unknown` set is a bug in the caller and
//! panics before anything changes.
//!
//! # Layout
//!
//! Members are packed into 32-bit words (`word = x >> 5`, `bit = x & 31`).
//! Mutators grow the backing storage to fit the highest index they touch and
//! never shrink it. Small sets (up to 64 members) stay inline.

use std::fmt;

use smallvec::SmallVec;

const WORD_BITS: usize = 32;
const WORD_SHIFT: usize = 5;
const WORD_MASK: usize = 31;

/// Lifecycle state of a [`Bits`] set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BitsState {
    /// Reset: no value assigned. Only `is_reset` and `assign` are allowed.
    Unknown,
    /// Freshly constructed, never written.
    Uninit,
    /// Holds a value.
    Normal,
}

/// A growable set of non-negative integers.
#[derive(Clone, PartialEq, Eq)]
pub struct Bits {
    words: SmallVec<[u32; 2]>,
    state: BitsState,
}

impl Bits {
    /// An empty set in the `Uninit` state.
    pub fn new() -> Self {
        Bits {
            words: SmallVec::new(),
            state: BitsState::Uninit,
        }
    }

    /// A set in the `Unknown` state.
    pub fn new_reset() -> Self {
        Bits {
            words: SmallVec::new(),
            state: BitsState::Unknown,
        }
    }

    /// An independent copy of `other`.
    pub fn from_bits(other: &Bits) -> Self {
        other.clone()
    }

    #[inline]
    fn check_known(&self) {
        assert!(
            self.state != BitsState::Unknown,
            "bit set used while in the Unknown state"
        );
    }

    fn size_to(&mut self, len: usize) {
        if self.words.len() < len {
            self.words.resize(len, 0);
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BitsState {
        self.state
    }

    /// An independent copy. Panics if `Unknown`.
    #[must_use]
    pub fn dup(&self) -> Bits {
        self.check_known();
        self.clone()
    }

    /// Replace the contents with a copy of `other`. Allowed while `Unknown`.
    pub fn assign(&mut self, other: &Bits) -> &mut Self {
        let copy = other.dup();
        self.words = copy.words;
        self.state = BitsState::Normal;
        self
    }

    /// Remove every member.
    pub fn clear(&mut self) -> &mut Self {
        self.check_known();
        self.words.iter_mut().for_each(|w| *w = 0);
        self.state = BitsState::Normal;
        self
    }

    /// Discard the backing storage and move to `Unknown`.
    pub fn reset(&mut self) {
        self.words = SmallVec::new();
        self.state = BitsState::Unknown;
    }

    /// Whether the set is `Unknown`.
    pub fn is_reset(&self) -> bool {
        self.state == BitsState::Unknown
    }

    /// Add `x`.
    pub fn include(&mut self, x: usize) -> &mut Self {
        self.check_known();
        self.size_to((x >> WORD_SHIFT) + 1);
        self.words[x >> WORD_SHIFT] |= 1 << (x & WORD_MASK);
        self.state = BitsState::Normal;
        self
    }

    /// Add every member of `start..limit`.
    pub fn include_range(&mut self, start: usize, limit: usize) -> &mut Self {
        self.check_known();
        if limit > start {
            self.size_to((limit >> WORD_SHIFT) + 1);
            for x in start..limit {
                self.words[x >> WORD_SHIFT] |= 1 << (x & WORD_MASK);
            }
        }
        self.state = BitsState::Normal;
        self
    }

    /// Remove `x`.
    pub fn exclude(&mut self, x: usize) -> &mut Self {
        self.check_known();
        self.size_to((x >> WORD_SHIFT) + 1);
        self.words[x >> WORD_SHIFT] &= !(1 << (x & WORD_MASK));
        self.state = BitsState::Normal;
        self
    }

    /// Remove every member `>= start`. The backing length is unchanged.
    pub fn exclude_from(&mut self, start: usize) -> &mut Self {
        self.check_known();
        let len = self.words.len();
        let mut mask = Bits::new();
        mask.size_to(len);
        mask.include_range(0, start.min(len * WORD_BITS));
        for (w, m) in self.words.iter_mut().zip(mask.words.iter()) {
            *w &= *m;
        }
        self.state = BitsState::Normal;
        self
    }

    /// Whether `x` is a member.
    pub fn is_member(&self, x: usize) -> bool {
        self.check_known();
        self.words
            .get(x >> WORD_SHIFT)
            .is_some_and(|w| w & (1 << (x & WORD_MASK)) != 0)
    }

    /// Intersect with `other`.
    pub fn and_set(&mut self, other: &Bits) -> &mut Self {
        self.check_known();
        other.check_known();
        let n = other.words.len();
        for (i, w) in self.words.iter_mut().enumerate() {
            *w &= if i < n { other.words[i] } else { 0 };
        }
        self.state = BitsState::Normal;
        self
    }

    /// Union with `other`.
    pub fn or_set(&mut self, other: &Bits) -> &mut Self {
        self.check_known();
        other.check_known();
        self.size_to(other.words.len());
        for (w, o) in self.words.iter_mut().zip(other.words.iter()) {
            *w |= *o;
        }
        self.state = BitsState::Normal;
        self
    }

    /// Remove every member of `other`.
    pub fn diff_set(&mut self, other: &Bits) -> &mut Self {
        self.check_known();
        other.check_known();
        for (w, o) in self.words.iter_mut().zip(other.words.iter()) {
            *w &= !*o;
        }
        self.state = BitsState::Normal;
        self
    }

    /// Symmetric difference with `other`.
    pub fn xor_set(&mut self, other: &Bits) -> &mut Self {
        self.check_known();
        other.check_known();
        self.size_to(other.words.len());
        for (w, o) in self.words.iter_mut().zip(other.words.iter()) {
            *w ^= *o;
        }
        self.state = BitsState::Normal;
        self
    }

    /// The smallest member `>= x`, if any.
    pub fn next_bit(&self, x: usize) -> Option<usize> {
        self.check_known();
        let mut windex = x >> WORD_SHIFT;
        if windex >= self.words.len() {
            return None;
        }
        let mut word = self.words[windex] & (u32::MAX << (x & WORD_MASK));
        loop {
            if word != 0 {
                return Some((windex << WORD_SHIFT) + word.trailing_zeros() as usize);
            }
            windex += 1;
            if windex >= self.words.len() {
                return None;
            }
            word = self.words[windex];
        }
    }

    /// Iterate over members in increasing order.
    pub fn iter(&self) -> BitsIter<'_> {
        self.check_known();
        BitsIter {
            bits: self,
            next: 0,
        }
    }
}

impl Default for Bits {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits({:?}, {self})", self.state)
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reset() {
            return f.write_str("<reset>");
        }
        f.write_str("{")?;
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{x}")?;
        }
        f.write_str("}")
    }
}

/// Iterator over the members of a [`Bits`] set.
pub struct BitsIter<'a> {
    bits: &'a Bits,
    next: usize,
}

impl Iterator for BitsIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let found = self.bits.next_bit(self.next)?;
        self.next = found + 1;
        Some(found)
    }
}

#[cfg(test)]
mod tests;
