//! Parsing places, and defining their representation in the AST.

use std::fmt;

use pest::iterators::Pair;

use super::{Context, Parsable, Span};
use crate::grammar::*;

/// A place: a variable, or one field of a variable.
#[derive(Clone, PartialEq, Eq)]
pub struct Place {
    /// Variable name.
    pub var: String,
    /// Projected field, if any.
    pub field: Option<String>,
    /// Codespan.
    pub span: Span,
}

impl fmt::Debug for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}.{field}", self.var),
            None => write!(f, "{}", self.var),
        }
    }
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Place {
    fn parse(pair: Pair<'ctx, Rule>, _ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::place));
        let span = Span::from(pair.as_span());
        let mut pairs = pair.into_inner();
        let var = consume!(pairs, Rule::ident).as_str().to_string();
        let field = pairs.next().map(|field| field.as_str().to_string());
        Place { var, field, span }
    }
}
