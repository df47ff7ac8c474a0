//! Operand conventions.

use std::fmt;

use pest::iterators::Pair;

use super::{Context, Parsable};
use crate::grammar::*;

/// How an operand is passed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Convention {
    /// Ownership is transferred; the source is consumed.
    Consuming,
    /// Read-only access for the duration of the call.
    #[default]
    Borrowing,
    /// Exclusive read-write access for the duration of the call.
    Inout,
}

impl Convention {
    /// Does this convention transfer ownership?
    pub fn is_consuming(self) -> bool {
        matches!(self, Convention::Consuming)
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Consuming => write!(f, "consuming"),
            Convention::Borrowing => write!(f, "borrowing"),
            Convention::Inout => write!(f, "inout"),
        }
    }
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Convention {
    fn parse(pair: Pair<'ctx, Rule>, _ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::convention));
        let pair = consume!(pair.into_inner());
        match pair.as_rule() {
            Rule::consuming_kw => Convention::Consuming,
            Rule::borrowing_kw => Convention::Borrowing,
            Rule::inout_kw => Convention::Inout,
            rule => panic!("parser internal error: expected convention, found {rule:?}"),
        }
    }
}
