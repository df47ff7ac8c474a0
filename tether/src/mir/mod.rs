//! Medium Intermediate Representation for the language.
//!
//! This representation is the control flow graph representation of function
//! bodies, on which the linearity checker runs.
//!
//! Each node in the tree = one file.

pub mod fun;
pub mod graph;
pub mod instr;
pub mod program;

pub use fun::Fun;
pub use graph::{Cfg, CfgLabel};
pub use instr::{AccessId, BasicBlock, Branch, Instr, InstrKind, Operand, Terminator};
pub use program::Program;

pub use crate::tast::{BindingId, Bindings, Place, Span};
