//! Parser Abstract Syntax Tree for the language.
//!
//! Each node in the tree = one file.

pub mod block;
pub mod convention;
pub mod enumeration;
pub mod expr;
pub mod fun;
pub mod generic;
pub mod place;
pub mod program;
pub mod protocol;
pub mod span;
pub mod stmt;
pub mod structure;
pub mod ty;

pub use anyhow::Result;
pub use block::Block;
pub use convention::Convention;
pub use enumeration::{Case, Enum};
pub use expr::{Arg, Expr, ExprKind};
pub use fun::{Fun, Param};
pub use generic::{Conformance, TyParam};
use pest::iterators::Pair;
use pest::Parser;
pub use place::Place;
pub use program::Program;
pub use protocol::{AssocTy, Protocol};
pub use span::Span;
pub use stmt::{Arm, Stmt, StmtKind};
pub use structure::Struct;
pub use ty::{TyKind, TyUse};

use crate::codes::PARSER_ERROR;
use crate::context::Context;
use crate::grammar::{Grammar, Rule};
use crate::reporter::Diagnostic;

/// Can be parsed from elements of `T`.
pub trait Parsable<'ctx, T> {
    /// Parses `tokens` into `Self` using `ctx`.
    fn parse(tokens: T, ctx: &mut Context<'ctx>) -> Self;
}

impl<'ctx> Context<'ctx> {
    /// Parses `tokens`.
    #[must_use]
    pub fn parse<U, T: Parsable<'ctx, U>>(&mut self, pair: U) -> T {
        T::parse(pair, self)
    }
}

/// Converts a pest error into a checker diagnostic.
fn pest_diagnostic(err: &pest::error::Error<Rule>) -> Diagnostic {
    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span::at(pos),
        pest::error::InputLocation::Span((start, end)) => Span::new(start, end),
    };
    Diagnostic::error()
        .with_code(PARSER_ERROR)
        .with_message(format!("syntax error: {}", err.variant.message()))
        .with_labels(vec![span.as_label()])
}

/// Parses the whole input of the context as `rule`.
///
/// Syntax errors are reported in the context.
pub fn parse_rule<'ctx, T: Parsable<'ctx, Pair<'ctx, Rule>>>(
    ctx: &mut Context<'ctx>,
    rule: Rule,
) -> Result<T> {
    let mut pairs = match Grammar::parse(rule, ctx.config.input) {
        Ok(pairs) => pairs,
        Err(err) => {
            ctx.emit(pest_diagnostic(&err));
            bail!("Parsing errors found.");
        }
    };
    let pair = pairs
        .next()
        .ok_or_else(|| anyhow!("Parser grammar error: no {rule:?} found"))?;
    Ok(ctx.parse(pair))
}

/// Parses the file in the context, and returns the parsed program.
pub fn parse_file<'ctx>(ctx: &mut Context<'ctx>) -> Result<Program> {
    parse_rule(ctx, Rule::program)
}
