//! Typed AST for the language.
//!
//! Names are resolved to bindings, expressions carry their types, and every
//! operand position carries its convention. This is the input of the CFG
//! builder.

pub mod binding;
pub mod decl;
pub mod expr;
pub mod fun;
pub mod place;
pub mod program;
pub mod stmt;
pub mod ty;

pub use binding::{Binding, BindingId, Bindings, Field, Ownership};
pub use decl::{Decls, EnumDecl, FunSig, ParamSig, ProtocolDecl, StructDecl};
pub use expr::{Expr, ExprKind};
pub use fun::{Fun, TOP_LEVEL};
pub use place::Place;
pub use program::Program;
pub use stmt::{Arm, Block, Stmt, StmtKind};
pub use ty::Ty;

pub use crate::ast::{Convention, Span, TyParam};
