//! Typed statements and blocks.

use super::{BindingId, Expr, Place, Span};

/// A typed `match` arm.
#[derive(Debug, Clone)]
pub struct Arm {
    /// Index of the matched case.
    pub case: usize,
    /// Payload bindings.
    pub bindings: Vec<BindingId>,
    /// Arm body.
    pub body: Block,
    /// Codespan.
    pub span: Span,
}

/// Kind of typed statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Declaration of a binding, with an optional consumed initializer.
    DeclareS(BindingId, Option<Expr>),
    /// (Re)initialization of a place with a consumed value.
    AssignS(Place, Expr),
    /// An evaluated expression, its value being dropped.
    ExprS(Expr),
    /// A conditional.
    IfS {
        /// Condition.
        cond: Expr,
        /// Taken if the condition holds.
        then: Block,
        /// Taken otherwise.
        els: Option<Block>,
    },
    /// A while loop.
    WhileS {
        /// Condition.
        cond: Expr,
        /// Loop body.
        body: Block,
    },
    /// An infinite loop.
    LoopS(Block),
    /// Pattern match.
    MatchS {
        /// Matched place.
        scrutinee: Place,
        /// Does the match consume the scrutinee.
        consuming: bool,
        /// Arms, in source order.
        arms: Vec<Arm>,
    },
    /// A child task body.
    SpawnS(Block),
    /// A nested lexical scope.
    BlockS(Block),
    /// Jump out of the innermost loop.
    BreakS,
    /// Jump to the next iteration of the innermost loop.
    ContinueS,
    /// Return from the function with a consumed value.
    ReturnS(Option<Expr>),
}

/// A typed statement.
#[derive(Debug, Clone)]
pub struct Stmt {
    /// Kind of statement.
    pub kind: StmtKind,
    /// Codespan.
    pub span: Span,
}

/// A typed block: a lexical scope.
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// Statements.
    pub stmts: Vec<Stmt>,
    /// Codespan.
    pub span: Span,
}
