//! Parsing type expressions, and defining their representation in the AST.

use std::fmt;

use itertools::Itertools;
use pest::iterators::Pair;

use super::{Context, Parsable, Span};
use crate::generics::{Capabilities, Capability};
use crate::grammar::*;
use crate::utils::boxed;

/// A type, as written in the source code.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TyKind {
    /// The type of functions that never return.
    NeverT,
    /// Unit type.
    UnitT,
    /// A named type, with its type arguments: builtins, structures,
    /// enumerations and generic parameters.
    NamedT(String, Vec<TyUse>),
    /// Array of elements.
    ArrayT(Box<TyUse>),
    /// Existential box over an optional protocol.
    AnyT {
        /// Protocol the boxed value conforms to.
        protocol: Option<String>,
        /// Capabilities the boxed value must provide.
        caps: Capabilities,
    },
}

/// A type expression, with its span.
#[derive(Clone, PartialEq, Eq)]
pub struct TyUse {
    /// Type.
    pub kind: TyKind,
    /// Codespan.
    pub span: Span,
}

impl TyUse {
    /// A named type without arguments.
    pub fn named(name: impl ToString, span: Span) -> Self {
        Self {
            kind: TyKind::NamedT(name.to_string(), vec![]),
            span,
        }
    }
}

impl fmt::Display for TyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TyKind::NeverT => write!(f, "Never"),
            TyKind::UnitT => write!(f, "()"),
            TyKind::NamedT(name, args) if args.is_empty() => write!(f, "{name}"),
            TyKind::NamedT(name, args) => write!(f, "{name}<{}>", args.iter().join(", ")),
            TyKind::ArrayT(item) => write!(f, "[{item}]"),
            TyKind::AnyT { protocol, caps } => {
                write!(f, "any")?;
                if let Some(protocol) = protocol {
                    write!(f, " {protocol}")?;
                }
                if !caps.copyable {
                    write!(f, " & ~Copyable")?;
                }
                if !caps.escapable {
                    write!(f, " & ~Escapable")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TyUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl fmt::Debug for TyUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for TyUse {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::ty));
        let span = Span::from(pair.as_span());
        let pair = consume!(pair.into_inner());
        let kind = match pair.as_rule() {
            Rule::never_ty => TyKind::NeverT,
            Rule::unit_ty => TyKind::UnitT,
            Rule::array_ty => TyKind::ArrayT(boxed(
                ctx.parse(consume!(pair.into_inner(), Rule::ty)),
            )),
            Rule::any_ty => {
                let mut pairs = pair.into_inner().peekable();
                consume!(pairs, Rule::any_kw);
                let protocol = consume_opt!(pairs, Rule::ident).map(|p| p.as_str().to_string());
                let caps = pairs
                    .map(|inverse| ctx.parse::<_, Capability>(inverse))
                    .fold(Capabilities::ALL, Capabilities::without);
                TyKind::AnyT { protocol, caps }
            }
            Rule::named_ty => {
                let mut pairs = pair.into_inner();
                let name = consume!(pairs, Rule::ident).as_str().to_string();
                let args = match pairs.next() {
                    Some(ty_args) => ty_args.into_inner().map(|ty| ctx.parse(ty)).collect(),
                    None => vec![],
                };
                TyKind::NamedT(name, args)
            }
            rule => panic!("parser internal error: expected type, found {rule:?}"),
        };
        Self { kind, span }
    }
}
