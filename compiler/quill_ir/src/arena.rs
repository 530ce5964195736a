//! Flat expression arena.
//!
//! [`ExprArena`] stores nodes in struct-of-arrays form. Nodes are immutable
//! once pushed; a rewrite appends new nodes and leaves the old tree intact,
//! so a quoted tree and its source share every unchanged subtree.
//!
//! # Index Spaces
//!
//! - `kinds`: indexed by [`ExprId`]
//! - `expr_lists`: flat `Vec<ExprId>` indexed by [`ExprRange`]
//! - `var_lists`: flat `Vec<VarId>` indexed by [`VarRange`]
//! - `catch_blocks`: indexed by [`CatchRange`]
//! - `vars`: variable metadata indexed by [`VarId`]
//! - `constants`: runtime values indexed by [`ConstantId`]

use quill_runtime::Value;

use crate::ast::{BinaryOp, CatchBlock, ExprKind, Intrinsic, UnaryOp};
use crate::{
    to_u16, to_u32, CatchRange, ConstantId, ExprId, ExprRange, Name, VarId, VarRange, Variable,
};

/// Arena for expression trees.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    kinds: Vec<ExprKind>,
    expr_lists: Vec<ExprId>,
    var_lists: Vec<VarId>,
    catch_blocks: Vec<CatchBlock>,
    vars: Vec<Variable>,
    constants: Vec<Value>,
}

impl ExprArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Nodes --

    /// Allocate a node, returning its ID.
    pub fn push(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        self.kinds.push(kind);
        id
    }

    /// Get the kind of a node.
    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.kinds[id.index()]
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no nodes have been allocated.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    // -- Variables --

    /// Declare a new variable. Every call yields a distinct identity, even
    /// for a repeated name.
    pub fn new_variable(&mut self, name: Name) -> VarId {
        let id = VarId::new(to_u32(self.vars.len(), "variables"));
        self.vars.push(Variable { name });
        id
    }

    /// Get variable metadata.
    #[inline]
    pub fn variable(&self, id: VarId) -> &Variable {
        &self.vars[id.index()]
    }

    // -- Constants --

    /// Add a value to the constant pool.
    ///
    /// Constants are not deduplicated: cells and views compare by identity,
    /// and each quoted occurrence gets its own entry.
    pub fn push_constant(&mut self, value: Value) -> ConstantId {
        let id = ConstantId::new(to_u32(self.constants.len(), "constants"));
        self.constants.push(value);
        id
    }

    /// Get a constant.
    #[inline]
    pub fn constant(&self, id: ConstantId) -> &Value {
        &self.constants[id.index()]
    }

    // -- Lists --

    /// Allocate a contiguous range of expression IDs.
    pub fn push_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        if ids.is_empty() {
            return ExprRange::EMPTY;
        }
        let start = to_u32(self.expr_lists.len(), "expression lists");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, to_u16(ids.len(), "expression list"))
    }

    /// Get expression IDs from a range.
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Allocate a contiguous range of variables.
    pub fn push_var_list(&mut self, vars: &[VarId]) -> VarRange {
        if vars.is_empty() {
            return VarRange::EMPTY;
        }
        let start = to_u32(self.var_lists.len(), "variable lists");
        self.var_lists.extend_from_slice(vars);
        VarRange::new(start, to_u16(vars.len(), "variable list"))
    }

    /// Get variables from a range.
    pub fn get_var_list(&self, range: VarRange) -> &[VarId] {
        let start = range.start as usize;
        &self.var_lists[start..start + range.len()]
    }

    /// Allocate a contiguous range of catch blocks.
    pub fn push_catch_blocks(&mut self, blocks: &[CatchBlock]) -> CatchRange {
        if blocks.is_empty() {
            return CatchRange::EMPTY;
        }
        let start = to_u32(self.catch_blocks.len(), "catch blocks");
        self.catch_blocks.extend_from_slice(blocks);
        CatchRange::new(start, to_u16(blocks.len(), "handler list"))
    }

    /// Get catch blocks from a range.
    pub fn get_catch_blocks(&self, range: CatchRange) -> &[CatchBlock] {
        let start = range.start as usize;
        &self.catch_blocks[start..start + range.len()]
    }

    // -- Builders --

    pub fn constant_expr(&mut self, value: Value) -> ExprId {
        let id = self.push_constant(value);
        self.push(ExprKind::Constant(id))
    }

    pub fn variable_expr(&mut self, var: VarId) -> ExprId {
        self.push(ExprKind::Variable(var))
    }

    pub fn cell_value(&mut self, operand: ExprId) -> ExprId {
        self.push(ExprKind::CellValue(operand))
    }

    pub fn lambda(&mut self, name: Name, params: &[VarId], body: ExprId) -> ExprId {
        let params = self.push_var_list(params);
        self.push(ExprKind::Lambda { name, params, body })
    }

    pub fn block(&mut self, vars: &[VarId], exprs: &[ExprId]) -> ExprId {
        let vars = self.push_var_list(vars);
        let exprs = self.push_expr_list(exprs);
        self.push(ExprKind::Block { vars, exprs })
    }

    pub fn try_expr(
        &mut self,
        body: ExprId,
        handlers: &[CatchBlock],
        finally: Option<ExprId>,
    ) -> ExprId {
        let handlers = self.push_catch_blocks(handlers);
        self.push(ExprKind::Try {
            body,
            handlers,
            finally: finally.into(),
        })
    }

    pub fn runtime_variables(&mut self, vars: &[VarId]) -> ExprId {
        let vars = self.push_var_list(vars);
        self.push(ExprKind::RuntimeVariables(vars))
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.push(ExprKind::Unary { op, operand })
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.push(ExprKind::Binary { op, left, right })
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> ExprId {
        self.push(ExprKind::Assign { target, value })
    }

    pub fn conditional(
        &mut self,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    ) -> ExprId {
        self.push(ExprKind::Conditional {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn invoke(&mut self, callee: ExprId, args: &[ExprId]) -> ExprId {
        let args = self.push_expr_list(args);
        self.push(ExprKind::Invoke { callee, args })
    }

    pub fn intrinsic(&mut self, op: Intrinsic, args: &[ExprId]) -> ExprId {
        debug_assert_eq!(args.len(), op.arity(), "wrong arity for {}", op.name());
        let args = self.push_expr_list(args);
        self.push(ExprKind::Intrinsic { op, args })
    }

    pub fn quote(&mut self, operand: ExprId) -> ExprId {
        self.push(ExprKind::Quote(operand))
    }
}

#[cfg(test)]
mod tests;
