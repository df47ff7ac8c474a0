//! Parsing programs, and defining their representation in the AST.

use pest::iterators::Pair;

use super::{Context, Enum, Fun, Parsable, Protocol, Stmt, Struct};
use crate::grammar::*;

/// A program: a collection of declarations, and top-level statements.
///
/// Top-level statements form an implicit function of their own.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Structure declarations, in source order.
    pub structs: Vec<Struct>,
    /// Enumeration declarations, in source order.
    pub enums: Vec<Enum>,
    /// Protocol declarations, in source order.
    pub protocols: Vec<Protocol>,
    /// Function declarations, in source order.
    pub funs: Vec<Fun>,
    /// Top-level statements, in source order.
    pub top_level: Vec<Stmt>,
}

impl Program {
    /// Appends the declarations of `other` after ours.
    pub fn extend(&mut self, other: Program) {
        self.structs.extend(other.structs);
        self.enums.extend(other.enums);
        self.protocols.extend(other.protocols);
        self.funs.extend(other.funs);
        self.top_level.extend(other.top_level);
    }
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Program {
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::program));
        let mut program = Program::default();

        for pair in pair.into_inner() {
            match pair.as_rule() {
                Rule::struct_def => program.structs.push(ctx.parse(pair)),
                Rule::enum_def => program.enums.push(ctx.parse(pair)),
                Rule::protocol_def => program.protocols.push(ctx.parse(pair)),
                Rule::fun => program.funs.push(ctx.parse(pair)),
                Rule::stmt => program.top_level.push(ctx.parse(pair)),
                Rule::EOI => {}
                rule => panic!("parser internal error: expected declaration, found {rule:?}"),
            }
        }

        program
    }
}
