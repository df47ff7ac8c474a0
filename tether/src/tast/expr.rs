//! Typed expressions.

use super::{Convention, Place, Span, Ty};

/// Kind of typed expression.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// A literal.
    ConstE,
    /// Use of a place, with the convention of the position it appears in.
    PlaceE(Place),
    /// A call, with the convention of each argument.
    CallE {
        /// Callee name.
        fun: String,
        /// Arguments.
        args: Vec<(Convention, Expr)>,
        /// Does the callee return `Never`.
        diverging: bool,
    },
    /// Builds a value out of consumed operands: structure and enumeration
    /// constructors, array literals, existential boxing and casts.
    AggregateE(Vec<Expr>),
}

/// A typed expression.
#[derive(Debug, Clone)]
pub struct Expr {
    /// Kind of expression.
    pub kind: ExprKind,
    /// Type.
    pub ty: Ty,
    /// Codespan.
    pub span: Span,
}

impl Expr {
    /// An erroneous expression, already reported.
    pub fn error(span: Span) -> Self {
        Self {
            kind: ExprKind::ConstE,
            ty: Ty::ErrorT,
            span,
        }
    }
}
