//! Parsing blocks, and defining their representation in the AST.

use pest::iterators::Pair;

use super::{Context, Parsable, Span, Stmt};
use crate::grammar::*;

/// A block in the parser AST: a lexical scope with a list of statements.
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// List of consecutive statements.
    pub stmts: Vec<Stmt>,
    /// Codespan.
    pub span: Span,
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Block {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::block));
        let span = Span::from(pair.as_span());
        let stmts = pair.into_inner().map(|stmt| ctx.parse(stmt)).collect();
        Block { stmts, span }
    }
}
