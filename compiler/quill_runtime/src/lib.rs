//! Runtime plumbing for quoted Quill expression trees.
//!
//! A quoted tree burns storage cells into its constants. Whatever later
//! evaluates that tree reads and writes through the types in this crate:
//!
//! - [`StrongBox`]: a single shared, mutable value slot. Aliasing is by cell
//!   identity, never by value.
//! - [`RuntimeVariables`]: an indexable, read/write view over a group of
//!   variables. [`BoxedVariables`] implements it directly over cells.
//! - [`MergedVariables`]: two independently indexed views combined into one
//!   logical sequence through a sign-encoded index map (see [`Slot`]).
//! - [`LocalsArena`]: the storage arrays backing hoisted scope frames, one
//!   cell per slot, each array linked to its parent array.
//!
//! # Crate Dependencies
//!
//! This crate is a leaf: it knows nothing about expression trees or scope
//! frames. `quill_ir` embeds [`Value`] in its constant pool and `quill_quote`
//! builds the views during quoting.

mod cell;
mod errors;
mod locals;
mod merged;
mod value;
mod variables;

pub use cell::StrongBox;
pub use errors::{MergeError, MergeSide, RuntimeError};
pub use locals::{ArrayId, LocalsArena, StorageArray};
pub use merged::{merge_runtime_variables, MergedVariables, Slot};
pub use value::Value;
pub use variables::{BoxedVariables, RuntimeVariables, VariablesRef};
