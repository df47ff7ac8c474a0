//! Parsing expressions, and defining their representation in the AST.

use pest::iterators::Pair;

use super::{Context, Parsable, Place, Span, TyUse};
use crate::grammar::*;
use crate::utils::boxed;

/// A call argument, with its optional label.
#[derive(Debug, Clone)]
pub struct Arg {
    /// Label, for structure initializers.
    pub label: Option<String>,
    /// Argument value.
    pub expr: Expr,
    /// Codespan.
    pub span: Span,
}

/// Kind of expression.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Unit literal.
    UnitE,
    /// Boolean literal.
    BoolE(bool),
    /// Integer literal, as written.
    IntE(String),
    /// Reading a place.
    PlaceE(Place),
    /// Function call, or structure initializer if `name` is a structure.
    CallE {
        /// Callee name.
        name: String,
        /// Arguments.
        args: Vec<Arg>,
    },
    /// Enumeration case constructor.
    EnumE {
        /// Enumeration name.
        name: String,
        /// Case name.
        case: String,
        /// Payload.
        args: Vec<Arg>,
    },
    /// Array literal.
    ArrayE(Vec<Expr>),
    /// Cast: boxing into an existential with `as`, dynamic cast with `as!`.
    CastE {
        /// Cast value.
        expr: Box<Expr>,
        /// Is it a forced, dynamic cast.
        forced: bool,
        /// Target type.
        ty: TyUse,
    },
}

/// An expression.
#[derive(Debug, Clone)]
pub struct Expr {
    /// Kind of expression.
    pub kind: ExprKind,
    /// Codespan.
    pub span: Span,
}

/// Parses the arguments of a call or constructor.
fn parse_args<'ctx>(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Vec<Arg> {
    debug_assert!(matches!(pair.as_rule(), Rule::args));
    pair.into_inner()
        .map(|arg| {
            let span = Span::from(arg.as_span());
            let mut pairs = arg.into_inner().peekable();
            let label = consume_opt!(pairs, Rule::label)
                .map(|label| consume!(label.into_inner(), Rule::ident).as_str().to_string());
            let expr = ctx.parse(consume!(pairs, Rule::expr));
            Arg { label, expr, span }
        })
        .collect()
}

/// Parses an expression without its casts.
fn parse_primary<'ctx>(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Expr {
    let span = Span::from(pair.as_span());
    let kind = match pair.as_rule() {
        Rule::literal => {
            let pair = consume!(pair.into_inner());
            match pair.as_rule() {
                Rule::int_lit => ExprKind::IntE(pair.as_str().to_string()),
                Rule::true_kw => ExprKind::BoolE(true),
                Rule::false_kw => ExprKind::BoolE(false),
                Rule::unit_lit => ExprKind::UnitE,
                rule => panic!("parser internal error: expected literal, found {rule:?}"),
            }
        }
        Rule::array_lit => ExprKind::ArrayE(pair.into_inner().map(|e| ctx.parse(e)).collect()),
        Rule::enum_ctor => {
            let mut pairs = pair.into_inner();
            let name = consume!(pairs, Rule::ident).as_str().to_string();
            let case = consume!(pairs, Rule::ident).as_str().to_string();
            let args = pairs.next().map_or(vec![], |args| parse_args(args, ctx));
            ExprKind::EnumE { name, case, args }
        }
        Rule::call => {
            let mut pairs = pair.into_inner();
            let name = consume!(pairs, Rule::ident).as_str().to_string();
            let args = parse_args(consume!(pairs, Rule::args), ctx);
            ExprKind::CallE { name, args }
        }
        Rule::place => ExprKind::PlaceE(ctx.parse(pair)),
        // Parenthesized expression
        Rule::expr => return ctx.parse(pair),
        rule => panic!("parser internal error: expected expression, found {rule:?}"),
    };
    Expr { kind, span }
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Expr {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::expr));
        let mut pairs = pair.into_inner();
        let mut expr = parse_primary(consume!(pairs), ctx);
        for cast in pairs {
            debug_assert!(matches!(cast.as_rule(), Rule::cast));
            let span = expr.span.merge(Span::from(cast.as_span()));
            let mut pairs = cast.into_inner().peekable();
            consume!(pairs, Rule::as_kw);
            let forced = consume_opt!(pairs, Rule::bang).is_some();
            let ty = ctx.parse(consume!(pairs, Rule::ty));
            expr = Expr {
                kind: ExprKind::CastE {
                    expr: boxed(expr),
                    forced,
                    ty,
                },
                span,
            };
        }
        expr
    }
}
