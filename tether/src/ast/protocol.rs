//! Parsing protocol declarations, and defining their representation in the
//! AST.

use pest::iterators::Pair;

use super::{Context, Parsable, Span};
use crate::generics::Capabilities;
use crate::grammar::*;

/// An associated type requirement of a protocol.
#[derive(Debug, Clone)]
pub struct AssocTy {
    /// Name.
    pub name: String,
    /// Capabilities required from the bound type.
    pub caps: Capabilities,
    /// Codespan.
    pub span: Span,
}

/// A protocol declaration.
#[derive(Debug, Clone)]
pub struct Protocol {
    /// Name.
    pub name: String,
    /// Capabilities required from conforming types.
    pub caps: Capabilities,
    /// Associated types.
    pub assoc_tys: Vec<AssocTy>,
    /// Codespan.
    pub span: Span,
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Protocol {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::protocol_def));

        let span = Span::from(pair.as_span());
        let mut pairs = pair.into_inner().peekable();
        consume!(pairs, Rule::protocol_kw);
        let name = consume!(pairs, Rule::ident).as_str().to_string();
        let caps = consume_opt!(pairs, Rule::inverses)
            .map_or(Capabilities::ALL, |inverses| ctx.parse(inverses));

        let assoc_tys = pairs
            .map(|assoc| {
                debug_assert!(matches!(assoc.as_rule(), Rule::assoc_ty));
                let span = Span::from(assoc.as_span());
                let mut pairs = assoc.into_inner();
                consume!(pairs, Rule::type_kw);
                let name = consume!(pairs, Rule::ident).as_str().to_string();
                let caps = pairs
                    .next()
                    .map_or(Capabilities::ALL, |inverses| ctx.parse(inverses));
                AssocTy { name, caps, span }
            })
            .collect();

        Protocol {
            name,
            caps,
            assoc_tys,
            span,
        }
    }
}
