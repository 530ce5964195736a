//! Hoisted scope frames.
//!
//! The compiler that built a closure decided which variables escape into
//! heap cells and grouped them per lexical scope. Each such scope is a
//! [`ScopeFrame`]: a map from variable identity to a slot in the scope's
//! storage array, plus a link to the enclosing frame. Frames live in a
//! [`ScopeChain`] arena and link to their parent by [`FrameId`].
//!
//! A frame describes layout only. The cells themselves are in a
//! `quill_runtime::LocalsArena`, one array per activation of the frame.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{to_u32, VarId};

/// Index of a frame in a [`ScopeChain`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct FrameId(u32);

impl FrameId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        FrameId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameId({})", self.0)
    }
}

/// Slot layout of one hoisted scope.
#[derive(Clone, Debug)]
pub struct ScopeFrame {
    /// Variable → slot index in the frame's storage array.
    slots: FxHashMap<VarId, u32>,
    /// Variables in slot order.
    variables: Vec<VarId>,
    parent: Option<FrameId>,
}

impl ScopeFrame {
    /// Slot holding `var`'s cell, if this frame hoists it.
    #[inline]
    pub fn slot(&self, var: VarId) -> Option<usize> {
        self.slots.get(&var).map(|&slot| slot as usize)
    }

    /// Returns `true` if this frame hoists `var`.
    #[inline]
    pub fn contains(&self, var: VarId) -> bool {
        self.slots.contains_key(&var)
    }

    /// Number of slots; the length of every storage array for this frame.
    pub fn slot_count(&self) -> usize {
        self.variables.len()
    }

    /// Hoisted variables in slot order.
    pub fn variables(&self) -> &[VarId] {
        &self.variables
    }

    /// The enclosing frame, if any.
    pub fn parent(&self) -> Option<FrameId> {
        self.parent
    }
}

/// Arena of hoisted scope frames.
///
/// Built once by the compiler and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct ScopeChain {
    frames: Vec<ScopeFrame>,
}

impl ScopeChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame hoisting `vars`, nested inside `parent`.
    ///
    /// Slots are assigned in order. A variable listed twice keeps its
    /// first slot.
    pub fn push_frame(&mut self, parent: Option<FrameId>, vars: &[VarId]) -> FrameId {
        let mut slots = FxHashMap::default();
        let mut variables = Vec::with_capacity(vars.len());
        for &var in vars {
            if let std::collections::hash_map::Entry::Vacant(entry) = slots.entry(var) {
                entry.insert(to_u32(variables.len(), "hoisted slots"));
                variables.push(var);
            }
        }
        debug_assert!(
            parent.is_none_or(|p| p.index() < self.frames.len()),
            "parent frame must already exist"
        );

        let id = FrameId::new(to_u32(self.frames.len(), "scope frames"));
        self.frames.push(ScopeFrame {
            slots,
            variables,
            parent,
        });
        id
    }

    /// Get a frame.
    #[inline]
    pub fn get(&self, id: FrameId) -> &ScopeFrame {
        &self.frames[id.index()]
    }

    /// The enclosing frame of `id`, if any.
    #[inline]
    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.get(id).parent
    }

    /// Iterate from `id` outward to the root frame.
    pub fn ancestors(&self, id: FrameId) -> impl Iterator<Item = FrameId> + '_ {
        std::iter::successors(Some(id), move |&frame| self.parent(frame))
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if the chain has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
