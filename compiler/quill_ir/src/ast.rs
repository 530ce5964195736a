//! Expression node kinds.
//!
//! Every kind is `Copy`: children are arena indices, so a node can be read
//! out of the arena and matched on while the arena is being appended to.

use crate::{CatchRange, ConstantId, ExprId, ExprRange, Name, VarId, VarRange};

/// Expression kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// A value from the arena's constant pool.
    Constant(ConstantId),

    /// Reference to a variable.
    Variable(VarId),

    /// Current value of the cell `operand` evaluates to. Readable and, as an
    /// assignment target, writable.
    CellValue(ExprId),

    /// Closure: binds `params` for the duration of `body`.
    Lambda {
        name: Name,
        params: VarRange,
        body: ExprId,
    },

    /// Statement sequence: binds `vars` for the duration of `exprs`.
    Block { vars: VarRange, exprs: ExprRange },

    /// Exception handling. `finally` is `ExprId::INVALID` when absent.
    Try {
        body: ExprId,
        handlers: CatchRange,
        finally: ExprId,
    },

    /// The listed variables addressed as one indexable, read/write unit.
    RuntimeVariables(VarRange),

    Unary {
        op: UnaryOp,
        operand: ExprId,
    },

    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    /// `target = value`. The target is a `Variable` or a `CellValue`.
    Assign { target: ExprId, value: ExprId },

    Conditional {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },

    /// Call a closure value.
    Invoke { callee: ExprId, args: ExprRange },

    /// Call a built-in runtime operation.
    Intrinsic { op: Intrinsic, args: ExprRange },

    /// A nested quotation of `operand`.
    Quote(ExprId),
}

impl ExprKind {
    /// Short kind name for diagnostics and tracing.
    pub const fn name(&self) -> &'static str {
        match self {
            ExprKind::Constant(_) => "constant",
            ExprKind::Variable(_) => "variable",
            ExprKind::CellValue(_) => "cell_value",
            ExprKind::Lambda { .. } => "lambda",
            ExprKind::Block { .. } => "block",
            ExprKind::Try { .. } => "try",
            ExprKind::RuntimeVariables(_) => "runtime_variables",
            ExprKind::Unary { .. } => "unary",
            ExprKind::Binary { .. } => "binary",
            ExprKind::Assign { .. } => "assign",
            ExprKind::Conditional { .. } => "conditional",
            ExprKind::Invoke { .. } => "invoke",
            ExprKind::Intrinsic { .. } => "intrinsic",
            ExprKind::Quote(_) => "quote",
        }
    }
}

/// Exception handler of a `Try` node.
///
/// The caught variable, when present, is bound in both `body` and `filter`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CatchBlock {
    pub variable: Option<VarId>,
    pub body: ExprId,
    /// `ExprId::INVALID` when the handler has no filter.
    pub filter: ExprId,
}

impl CatchBlock {
    pub fn new(variable: Option<VarId>, body: ExprId, filter: Option<ExprId>) -> Self {
        CatchBlock {
            variable,
            body,
            filter: filter.into(),
        }
    }

    /// The filter expression, if any.
    #[inline]
    pub fn filter(&self) -> Option<ExprId> {
        self.filter.valid()
    }
}

/// Built-in runtime operations callable from a tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Intrinsic {
    /// `(first: variables, second: variables, indexes) -> variables`.
    ///
    /// Produced by quoting a variable list that mixes captured and local
    /// variables.
    MergeRuntimeVariables,
}

impl Intrinsic {
    pub const fn name(self) -> &'static str {
        match self {
            Intrinsic::MergeRuntimeVariables => "merge_runtime_variables",
        }
    }

    /// Number of arguments the operation takes.
    pub const fn arity(self) -> usize {
        match self {
            Intrinsic::MergeRuntimeVariables => 3,
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    NotEq,
    Lt,
    Gt,

    // Logical
    And,
    Or,
}
