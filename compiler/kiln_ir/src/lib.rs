//! Kiln IR - low-level building blocks shared by the compiler.
//!
//! This crate contains the leaf data structures every other phase builds on:
//! - [`List`] / [`ListBuffer`]: immutable, structurally shared linked lists
//!   and the buffer used to build them
//! - [`Bits`]: a growable bit set with an explicit "unassigned" state, used
//!   by flow analysis
//! - [`NameTable`]: byte-sequence interning with two interchangeable
//!   strategies ([`SharedNameTable`] and [`UnsharedNameTable`])
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers become handles compared by identity
//! - **Share Structure**: lists are prepended to, never mutated in place
//! - **Fail Loudly**: misuse of a reset bit set is a bug, not an input error

mod bits;
mod list;
mod name_table;

pub use bits::{Bits, BitsIter, BitsState};
pub use list::{Iter, List, ListBuffer};
pub use name_table::{
    InternError, NameTable, Names, SharedName, SharedNameTable, UnsharedName,
    UnsharedNameTable,
};
