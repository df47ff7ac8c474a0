//! Parsing statements, and defining their representation in the AST.

use pest::iterators::Pair;

use super::{Block, Context, Expr, Parsable, Place, Span, TyUse};
use crate::grammar::*;

/// A match arm.
#[derive(Debug, Clone)]
pub struct Arm {
    /// Matched case name.
    pub case: String,
    /// Payload bindings, in order.
    pub bindings: Vec<(String, Span)>,
    /// Arm body.
    pub body: Block,
    /// Codespan.
    pub span: Span,
}

/// Kind of statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// A declaration, with an optional type annotation and initializer.
    Declare {
        /// `var` if true, `let` otherwise.
        mutable: bool,
        /// Declared name.
        name: String,
        /// Type annotation.
        ty: Option<TyUse>,
        /// Initial value.
        init: Option<Expr>,
    },
    /// An assignment.
    Assign(Place, Expr),
    /// An expression, whose final value is discarded.
    ExprS(Expr),
    /// A conditional.
    If {
        /// Condition.
        cond: Expr,
        /// Taken if the condition holds.
        then: Block,
        /// Taken otherwise.
        els: Option<Block>,
    },
    /// A while loop.
    While {
        /// Condition.
        cond: Expr,
        /// Loop body.
        body: Block,
    },
    /// An infinite loop, left with `break` or `return`.
    Loop(Block),
    /// Pattern match over the cases of an enumeration value.
    Match {
        /// Does the match consume the scrutinee.
        consuming: bool,
        /// Matched value.
        scrutinee: Place,
        /// Arms.
        arms: Vec<Arm>,
    },
    /// A child task body.
    Spawn(Block),
    /// A nested lexical scope.
    BlockS(Block),
    /// Jump out of the innermost loop.
    Break,
    /// Jump to the next iteration of the innermost loop.
    Continue,
    /// Return from the function.
    Return(Option<Expr>),
}

/// A statement.
#[derive(Debug, Clone)]
pub struct Stmt {
    /// Kind of statement.
    pub kind: StmtKind,
    /// Codespan.
    pub span: Span,
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Arm {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::arm));
        let span = Span::from(pair.as_span());
        let mut pairs = pair.into_inner();
        let case = consume!(pairs, Rule::ident).as_str().to_string();
        let body = ctx.parse(consume_back!(pairs, Rule::block));
        let bindings = pairs
            .map(|binding| (binding.as_str().to_string(), Span::from(binding.as_span())))
            .collect();
        Arm {
            case,
            bindings,
            body,
            span,
        }
    }
}

/// Parses an `if` statement.
fn parse_if<'ctx>(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> StmtKind {
    debug_assert!(matches!(pair.as_rule(), Rule::if_stmt));
    let mut pairs = pair.into_inner().peekable();
    consume!(pairs, Rule::if_kw);
    let cond = ctx.parse(consume!(pairs, Rule::expr));
    let then = ctx.parse(consume!(pairs, Rule::block));
    let els = consume_opt!(pairs, Rule::else_kw).map(|_| {
        let pair = consume!(pairs);
        match pair.as_rule() {
            Rule::block => ctx.parse(pair),
            // `else if` is sugar for an else block holding the nested if
            Rule::if_stmt => {
                let span = Span::from(pair.as_span());
                Block {
                    stmts: vec![Stmt {
                        kind: parse_if(pair, ctx),
                        span,
                    }],
                    span,
                }
            }
            rule => panic!("parser internal error: expected else branch, found {rule:?}"),
        }
    });
    StmtKind::If { cond, then, els }
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Stmt {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::stmt));
        let span = Span::from(pair.as_span());
        let pair = consume!(pair.into_inner());
        let kind = match pair.as_rule() {
            Rule::let_stmt => {
                let mut pairs = pair.into_inner().peekable();
                let binder = consume!(consume!(pairs, Rule::binder).into_inner());
                let mutable = matches!(binder.as_rule(), Rule::var_kw);
                let name = consume!(pairs, Rule::ident).as_str().to_string();
                let ty = consume_opt!(pairs, Rule::ty).map(|ty| ctx.parse(ty));
                let init = consume_opt!(pairs, Rule::expr).map(|init| ctx.parse(init));
                StmtKind::Declare {
                    mutable,
                    name,
                    ty,
                    init,
                }
            }
            Rule::if_stmt => parse_if(pair, ctx),
            Rule::while_stmt => {
                let mut pairs = pair.into_inner();
                consume!(pairs, Rule::while_kw);
                let cond = ctx.parse(consume!(pairs, Rule::expr));
                let body = ctx.parse(consume!(pairs, Rule::block));
                StmtKind::While { cond, body }
            }
            Rule::loop_stmt => {
                let mut pairs = pair.into_inner();
                consume!(pairs, Rule::loop_kw);
                StmtKind::Loop(ctx.parse(consume!(pairs, Rule::block)))
            }
            Rule::match_stmt => {
                let mut pairs = pair.into_inner().peekable();
                consume!(pairs, Rule::match_kw);
                let consuming = consume_opt!(pairs, Rule::consume_kw).is_some();
                let scrutinee = ctx.parse(consume!(pairs, Rule::place));
                let arms = pairs.map(|arm| ctx.parse(arm)).collect();
                StmtKind::Match {
                    consuming,
                    scrutinee,
                    arms,
                }
            }
            Rule::spawn_stmt => {
                let mut pairs = pair.into_inner();
                consume!(pairs, Rule::spawn_kw);
                StmtKind::Spawn(ctx.parse(consume!(pairs, Rule::block)))
            }
            Rule::break_stmt => StmtKind::Break,
            Rule::continue_stmt => StmtKind::Continue,
            Rule::return_stmt => {
                let mut pairs = pair.into_inner();
                consume!(pairs, Rule::return_kw);
                StmtKind::Return(pairs.next().map(|value| ctx.parse(value)))
            }
            Rule::block => StmtKind::BlockS(ctx.parse(pair)),
            Rule::assign_stmt => {
                let mut pairs = pair.into_inner();
                let lhs = ctx.parse(consume!(pairs, Rule::place));
                let rhs = ctx.parse(consume!(pairs, Rule::expr));
                StmtKind::Assign(lhs, rhs)
            }
            Rule::expr_stmt => StmtKind::ExprS(ctx.parse(consume!(pair.into_inner(), Rule::expr))),
            rule => panic!("parser internal error: expected statement, found {rule:?}"),
        };
        Stmt { kind, span }
    }
}
