//! Quill IR - expression trees and hoisted scope frames.
//!
//! This crate contains the data structures that quoting reads and rewrites:
//! - Names for interned identifiers
//! - Variables, identified by [`VarId`] rather than by name
//! - A flat expression arena ([`ExprArena`]) of immutable nodes
//! - Hoisted scope frames ([`ScopeChain`]) mapping variables to storage slots
//! - A [`Rewriter`] trait for structure-sharing tree rewrites
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → `Name(u32)`
//! - **Flatten Everything**: No `Box<Expr>`, children are `ExprId(u32)` indices
//! - **Append, Never Mutate**: a rewrite pushes new nodes and returns a new
//!   root. Unchanged subtrees keep their `ExprId`, so "did this child change"
//!   is an integer compare.

mod arena;
pub mod ast;
mod expr_id;
mod hoisted;
mod interner;
mod name;
pub mod rewrite;
mod var;

pub use arena::ExprArena;
pub use ast::{BinaryOp, CatchBlock, ExprKind, Intrinsic, UnaryOp};
pub use expr_id::{CatchRange, ConstantId, ExprId, ExprRange};
pub use hoisted::{FrameId, ScopeChain, ScopeFrame};
pub use interner::StringInterner;
pub use name::Name;
pub use rewrite::Rewriter;
pub use var::{VarId, VarRange, Variable};

/// Convert a length to `u32`, panicking with context on overflow.
#[inline]
pub(crate) fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}

/// Convert a length to `u16`, panicking with context on overflow.
#[inline]
pub(crate) fn to_u16(len: usize, what: &str) -> u16 {
    u16::try_from(len).unwrap_or_else(|_| panic!("{what} too long: {len} exceeds u16::MAX"))
}
