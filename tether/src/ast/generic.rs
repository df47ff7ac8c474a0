//! Generic parameters and protocol conformances of declarations.

use pest::iterators::Pair;

use super::{Context, Parsable, Span, TyUse};
use crate::generics::{Capabilities, Capability};
use crate::grammar::*;

/// A generic type parameter, with its capability requirements.
///
/// `T` requires every capability, `T: ~Copyable` accepts move-only types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyParam {
    /// Name.
    pub name: String,
    /// Capabilities required from type arguments.
    pub caps: Capabilities,
    /// Codespan.
    pub span: Span,
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for TyParam {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::ty_param));
        let span = Span::from(pair.as_span());
        let mut pairs = pair.into_inner();
        let name = consume!(pairs, Rule::ident).as_str().to_string();
        let caps = pairs
            .next()
            .map_or(Capabilities::ALL, |inverses| ctx.parse(inverses));
        TyParam { name, caps, span }
    }
}

/// Parses an optional list of type parameters.
pub(crate) fn parse_ty_params<'ctx>(
    pair: Option<Pair<'ctx, Rule>>,
    ctx: &mut Context<'ctx>,
) -> Vec<TyParam> {
    match pair {
        Some(pair) => {
            debug_assert!(matches!(pair.as_rule(), Rule::ty_params));
            pair.into_inner().map(|param| ctx.parse(param)).collect()
        }
        None => vec![],
    }
}

/// A declared conformance to a protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conformance {
    /// Protocol name.
    pub protocol: String,
    /// Associated type bindings.
    pub bindings: Vec<(String, TyUse)>,
    /// Codespan.
    pub span: Span,
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Conformance {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::protocol_ref));
        let span = Span::from(pair.as_span());
        let mut pairs = pair.into_inner();
        let protocol = consume!(pairs, Rule::ident).as_str().to_string();
        let bindings = pairs
            .map(|binding| {
                debug_assert!(matches!(binding.as_rule(), Rule::assoc_binding));
                let mut pairs = binding.into_inner();
                let name = consume!(pairs, Rule::ident).as_str().to_string();
                (name, ctx.parse(consume!(pairs, Rule::ty)))
            })
            .collect();
        Conformance {
            protocol,
            bindings,
            span,
        }
    }
}

/// Parses the optional `: ~Copyable, Proto, ...` clause of a nominal
/// declaration.
///
/// Returns the capabilities left by the inverse markers, and the protocol
/// conformances.
pub(crate) fn parse_conformances<'ctx>(
    pair: Option<Pair<'ctx, Rule>>,
    ctx: &mut Context<'ctx>,
) -> (Capabilities, Vec<Conformance>) {
    let mut caps = Capabilities::ALL;
    let mut conformances = vec![];
    if let Some(pair) = pair {
        debug_assert!(matches!(pair.as_rule(), Rule::conformances));
        for conformance in pair.into_inner() {
            let inner = consume!(conformance.into_inner());
            match inner.as_rule() {
                Rule::inverse => caps = caps.without(ctx.parse::<_, Capability>(inner)),
                Rule::protocol_ref => conformances.push(ctx.parse(inner)),
                rule => panic!("parser internal error: expected conformance, found {rule:?}"),
            }
        }
    }
    (caps, conformances)
}
