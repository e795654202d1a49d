//! Immutable, structurally shared linked lists.
//!
//! [`List`] is a singly linked list terminated by a shared empty sentinel.
//! Prepending is O(1) and shares the tail with the original list, so lists
//! are cheap to extend at the front and free to pass around. Lists are meant
//! to be *built* with a [`ListBuffer`] and *consumed* by iteration; `len()`
//! walks the whole list.
//!
//! # Publication
//!
//! A [`ListBuffer`] hands out lists through [`ListBuffer::to_list`]. Once a
//! list has been handed out the buffer is marked shared, and the next
//! mutation copies before touching anything, so a published list never
//! changes underneath its holder.

use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

struct Node<T> {
    head: T,
    tail: List<T>,
}

/// An immutable singly linked list.
///
/// The empty list is the sentinel returned by [`List::nil`]; every non-empty
/// list ends in it.
pub struct List<T> {
    node: Option<Rc<Node<T>>>,
}

impl<T> List<T> {
    /// The empty list.
    #[inline]
    pub const fn nil() -> Self {
        List { node: None }
    }

    /// Check if this is the empty sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// Check if this list has at least one element.
    #[inline]
    pub fn non_empty(&self) -> bool {
        self.node.is_some()
    }

    /// First element, or `None` for the empty list.
    #[inline]
    pub fn head(&self) -> Option<&T> {
        self.node.as_ref().map(|n| &n.head)
    }

    /// Everything after the first element.
    ///
    /// Returns `None` for the empty list: the sentinel has no tail, which is
    /// what distinguishes it from every non-empty list.
    #[inline]
    pub fn tail(&self) -> Option<&List<T>> {
        self.node.as_ref().map(|n| &n.tail)
    }

    /// A new list with `x` in front of this one. O(1); shares `self`.
    #[must_use]
    pub fn prepend(&self, x: T) -> List<T> {
        List {
            node: Some(Rc::new(Node {
                head: x,
                tail: self.clone(),
            })),
        }
    }

    /// Number of elements. O(n).
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Last element, or `None` for the empty list.
    pub fn last(&self) -> Option<&T> {
        self.iter().last()
    }

    /// Iterate from head to end.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.node.as_deref(),
        }
    }

    /// Check membership by equality.
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|y| y == x)
    }

    /// Build a list from an owned vector, preserving order.
    pub fn from_vec(items: Vec<T>) -> List<T> {
        items
            .into_iter()
            .rev()
            .fold(List::nil(), |list, x| list.prepend(x))
    }

    /// Apply `f` to each element, producing a new list in the same order.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> List<U> {
        List::from_vec(self.iter().map(f).collect())
    }

    /// Render the elements separated by `sep`.
    pub fn join(&self, sep: &str) -> String
    where
        T: fmt::Display,
    {
        let mut out = String::new();
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(&x.to_string());
        }
        out
    }
}

impl<T: Clone> List<T> {
    /// Build a list from the given elements.
    pub fn of(items: &[T]) -> List<T> {
        Self::from_slice(items)
    }

    /// Build a list from a slice, preserving order.
    pub fn from_slice(items: &[T]) -> List<T> {
        items
            .iter()
            .rev()
            .fold(List::nil(), |list, x| list.prepend(x.clone()))
    }

    /// A list holding `n` copies of `x`.
    pub fn fill(n: usize, x: &T) -> List<T> {
        (0..n).fold(List::nil(), |list, _| list.prepend(x.clone()))
    }

    /// Copy the elements into a vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// A new list with `xs` in front of this one. Shares `self`.
    #[must_use]
    pub fn prepend_list(&self, xs: &List<T>) -> List<T> {
        xs.to_vec()
            .into_iter()
            .rev()
            .fold(self.clone(), |list, x| list.prepend(x))
    }

    /// A new list with `x` at the end. O(n): copies every node.
    #[must_use]
    pub fn append(&self, x: T) -> List<T> {
        let mut buf = ListBuffer::from_list(self);
        buf.append(x);
        buf.into_list()
    }

    /// A new list with `xs` at the end. Copies `self`, shares `xs`.
    #[must_use]
    pub fn append_list(&self, xs: &List<T>) -> List<T> {
        xs.prepend_list(self)
    }

    /// The elements in reverse order.
    #[must_use]
    pub fn reverse(&self) -> List<T> {
        self.iter()
            .fold(List::nil(), |list, x| list.prepend(x.clone()))
    }

    /// A new list with `sep` between every pair of adjacent elements.
    #[must_use]
    pub fn intersperse(&self, sep: &T) -> List<T> {
        let mut buf = ListBuffer::new();
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                buf.append(sep.clone());
            }
            buf.append(x.clone());
        }
        buf.into_list()
    }

    /// Elements of this list that are not in `other`, in order.
    #[must_use]
    pub fn diff(&self, other: &List<T>) -> List<T>
    where
        T: PartialEq,
    {
        List::from_vec(self.iter().filter(|x| !other.contains(x)).cloned().collect())
    }
}

impl<T> Clone for List<T> {
    fn clone(&self) -> Self {
        List {
            node: self.node.clone(),
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List::nil()
    }
}

impl<T> Drop for List<T> {
    // Unlink iteratively; the derived recursive drop overflows on long lists.
    fn drop(&mut self) {
        let mut next = self.node.take();
        while let Some(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(mut node) => next = node.tail.node.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: PartialEq> PartialEq<[T]> for List<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for List<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<&[T]> for List<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Hash> Hash for List<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for x in self {
            x.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(","))
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        List::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`List`].
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.tail.node.as_deref();
            &node.head
        })
    }
}

/// Builder for [`List`] with O(1) append at either end.
///
/// The last published list is cached: publishing again without an
/// intervening mutation returns the same shared list. Any mutation after a
/// publication drops the cache first, so published lists stay untouched.
pub struct ListBuffer<T> {
    elems: VecDeque<T>,
    published: Option<List<T>>,
    shared: bool,
}

impl<T> ListBuffer<T> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        ListBuffer {
            elems: VecDeque::new(),
            published: None,
            shared: false,
        }
    }

    /// Detach from any published list before mutating.
    fn unshare(&mut self) {
        if self.shared {
            self.published = None;
            self.shared = false;
        }
    }

    /// Append `x` at the end.
    pub fn append(&mut self, x: T) -> &mut Self {
        self.unshare();
        self.elems.push_back(x);
        self
    }

    /// Insert `x` at the front.
    pub fn prepend(&mut self, x: T) -> &mut Self {
        self.unshare();
        self.elems.push_front(x);
        self
    }

    /// First element.
    pub fn first(&self) -> Option<&T> {
        self.elems.front()
    }

    /// Last element.
    pub fn last(&self) -> Option<&T> {
        self.elems.back()
    }

    /// Remove and return the first element.
    pub fn pop_first(&mut self) -> Option<T> {
        self.unshare();
        self.elems.pop_front()
    }

    /// Number of buffered elements. O(1).
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Check membership by equality.
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.elems.contains(x)
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.unshare();
        self.elems.clear();
    }

    /// Iterate over buffered elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elems.iter()
    }

    /// Whether the current contents have been published.
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Consume the buffer, producing a list without cloning elements.
    pub fn into_list(self) -> List<T> {
        List::from_vec(self.elems.into())
    }
}

impl<T: Clone> ListBuffer<T> {
    /// A buffer holding a copy of `list`.
    pub fn from_list(list: &List<T>) -> Self {
        ListBuffer {
            elems: list.iter().cloned().collect(),
            published: None,
            shared: false,
        }
    }

    /// Append every element of `xs`.
    pub fn append_list(&mut self, xs: &List<T>) -> &mut Self {
        self.unshare();
        self.elems.extend(xs.iter().cloned());
        self
    }

    /// Publish the current contents as an immutable list.
    ///
    /// The buffer stays usable; later mutations never affect the returned
    /// list.
    pub fn to_list(&mut self) -> List<T> {
        if let Some(list) = &self.published {
            return list.clone();
        }
        let list: List<T> = self.elems.iter().cloned().collect();
        self.published = Some(list.clone());
        self.shared = true;
        list
    }
}

impl<T> Default for ListBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for ListBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.unshare();
        self.elems.extend(iter);
    }
}

impl<T> FromIterator<T> for ListBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ListBuffer {
            elems: iter.into_iter().collect(),
            published: None,
            shared: false,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ListBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elems.iter()).finish()
    }
}
