//! Typed programs.

use super::{Decls, Fun};

/// A typed program.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Resolved declarations.
    pub decls: Decls,
    /// Functions with a body, in source order, followed by the top-level
    /// function if there are top-level statements.
    pub funs: Vec<Fun>,
}
