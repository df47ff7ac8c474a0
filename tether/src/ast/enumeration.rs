//! Parsing enumeration declarations, and defining their representation in
//! the AST.

use pest::iterators::Pair;

use super::generic::{parse_conformances, parse_ty_params};
use super::{Conformance, Context, Parsable, Span, TyParam, TyUse};
use crate::generics::Capabilities;
use crate::grammar::*;

/// An enumeration case, with its payload types.
#[derive(Debug, Clone)]
pub struct Case {
    /// Name.
    pub name: String,
    /// Payload types.
    pub payload: Vec<TyUse>,
    /// Codespan.
    pub span: Span,
}

/// An enumeration declaration.
#[derive(Debug, Clone)]
pub struct Enum {
    /// Name.
    pub name: String,
    /// Generic type parameters.
    pub ty_params: Vec<TyParam>,
    /// Capabilities left by the inverse markers of the declaration.
    pub caps: Capabilities,
    /// Protocol conformances.
    pub conformances: Vec<Conformance>,
    /// Cases, in declaration order.
    pub cases: Vec<Case>,
    /// Codespan.
    pub span: Span,
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Enum {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::enum_def));

        let span = Span::from(pair.as_span());
        let mut pairs = pair.into_inner().peekable();
        consume!(pairs, Rule::enum_kw);
        let name = consume!(pairs, Rule::ident).as_str().to_string();
        let ty_params = parse_ty_params(consume_opt!(pairs, Rule::ty_params), ctx);
        let (caps, conformances) = parse_conformances(consume_opt!(pairs, Rule::conformances), ctx);

        let cases = pairs
            .map(|case| {
                debug_assert!(matches!(case.as_rule(), Rule::case_def));
                let span = Span::from(case.as_span());
                let mut pairs = case.into_inner();
                let name = consume!(pairs, Rule::ident).as_str().to_string();
                let payload = pairs.map(|ty| ctx.parse(ty)).collect();
                Case {
                    name,
                    payload,
                    span,
                }
            })
            .collect();

        Enum {
            name,
            ty_params,
            caps,
            conformances,
            cases,
            span,
        }
    }
}
