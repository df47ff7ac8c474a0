//! Parsing structure declarations, and defining their representation in the
//! AST.

use pest::iterators::Pair;

use super::generic::{parse_conformances, parse_ty_params};
use super::{Conformance, Context, Parsable, Span, TyParam, TyUse};
use crate::generics::Capabilities;
use crate::grammar::*;

/// A structure declaration.
#[derive(Debug, Clone)]
pub struct Struct {
    /// Name.
    pub name: String,
    /// Generic type parameters.
    pub ty_params: Vec<TyParam>,
    /// Capabilities left by the inverse markers of the declaration.
    pub caps: Capabilities,
    /// Protocol conformances.
    pub conformances: Vec<Conformance>,
    /// Fields, in declaration order.
    pub fields: Vec<(String, TyUse)>,
    /// Codespan.
    pub span: Span,
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Struct {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::struct_def));

        let span = Span::from(pair.as_span());
        let mut pairs = pair.into_inner().peekable();
        consume!(pairs, Rule::struct_kw);
        let name = consume!(pairs, Rule::ident).as_str().to_string();
        let ty_params = parse_ty_params(consume_opt!(pairs, Rule::ty_params), ctx);
        let (caps, conformances) = parse_conformances(consume_opt!(pairs, Rule::conformances), ctx);

        let fields = pairs
            .map(|field| {
                debug_assert!(matches!(field.as_rule(), Rule::field));
                let mut pairs = field.into_inner();
                let name = consume!(pairs, Rule::ident).as_str().to_string();
                (name, ctx.parse(consume!(pairs, Rule::ty)))
            })
            .collect();

        Struct {
            name,
            ty_params,
            caps,
            conformances,
            fields,
            span,
        }
    }
}
