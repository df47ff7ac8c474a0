//! Parsing functions, and defining their representation in the AST.

use pest::iterators::Pair;

use super::generic::parse_ty_params;
use super::{Block, Context, Convention, Parsable, Span, TyParam, TyUse};
use crate::grammar::*;

/// A function parameter.
#[derive(Debug, Clone)]
pub struct Param {
    /// Name.
    pub name: String,
    /// Passing convention, `borrowing` if not written.
    pub convention: Convention,
    /// Type.
    pub ty: TyUse,
    /// Codespan.
    pub span: Span,
}

/// A function in the parser AST.
#[derive(Debug, Clone)]
pub struct Fun {
    /// Name of that function.
    pub name: String,
    /// Generic type parameters.
    pub ty_params: Vec<TyParam>,
    /// Parameters to that function, with their conventions and types.
    pub params: Vec<Param>,
    /// Return type, unit if absent.
    pub ret_ty: Option<TyUse>,
    /// Body of the function, `None` for a declaration without definition.
    pub body: Option<Block>,
    /// Codespan.
    pub span: Span,
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Param {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::param));
        let span = Span::from(pair.as_span());
        let mut pairs = pair.into_inner().peekable();
        let name = consume!(pairs, Rule::ident).as_str().to_string();
        let convention = consume_opt!(pairs, Rule::convention)
            .map(|convention| ctx.parse(convention))
            .unwrap_or_default();
        let ty = ctx.parse(consume!(pairs, Rule::ty));
        Param {
            name,
            convention,
            ty,
            span,
        }
    }
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Fun {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::fun));
        let span = Span::from(pair.as_span());

        let mut pairs = pair.into_inner().peekable();

        consume!(pairs, Rule::fn_kw);

        let name = consume!(pairs, Rule::ident).as_str().to_string();

        let ty_params = consume_opt!(pairs, Rule::ty_params);
        let ty_params = parse_ty_params(ty_params, ctx);

        let params = consume!(pairs, Rule::params)
            .into_inner()
            .map(|param| ctx.parse(param))
            .collect();

        let ret_ty = consume_opt!(pairs, Rule::ret_ty)
            .map(|ret_ty| ctx.parse(consume!(ret_ty.into_inner(), Rule::ty)));

        let body = consume!(pairs, Rule::block | Rule::sc);
        let body = match body.as_rule() {
            Rule::block => Some(ctx.parse(body)),
            _ => None,
        };

        Fun {
            name,
            ty_params,
            params,
            ret_ty,
            body,
            span,
        }
    }
}
