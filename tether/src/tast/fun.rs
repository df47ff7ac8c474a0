//! Typed functions.

use super::{BindingId, Bindings, Block, Span, Ty};
use crate::reporter::Diagnostic;

/// Name of the implicit function formed by top-level statements.
pub const TOP_LEVEL: &str = "<top-level>";

/// A function in the typed AST, with a body.
#[derive(Debug, Clone)]
pub struct Fun {
    /// Name of that function.
    pub name: String,
    /// Parameter bindings.
    pub params: Vec<BindingId>,
    /// Return type.
    pub ret_ty: Ty,
    /// Body of the function.
    pub body: Block,
    /// Every binding of the function.
    pub bindings: Bindings,
    /// Generic restrictions found in its signature and body.
    pub restrictions: Vec<Diagnostic>,
    /// Codespan.
    pub span: Span,
}
