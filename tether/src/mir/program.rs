//! Defining programs, the biggest units in the MIR.

use super::Fun;
use crate::tast::Decls;

/// A program in the MIR.
#[derive(Debug)]
pub struct Program {
    /// Declarations of the typed program.
    pub decls: Decls,
    /// Functions whose control flow graph could be built, in source order.
    pub funs: Vec<Fun>,
}
