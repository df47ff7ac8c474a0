//! Defining functions in the MIR.

use std::fmt;

use super::{BasicBlock, Cfg, CfgLabel};
use crate::reporter::Diagnostic;
use crate::tast::{BindingId, Bindings, Span};

/// A function in the MIR: a control flow graph of basic blocks.
pub struct Fun {
    /// Name of that function.
    pub name: String,
    /// Parameter bindings.
    pub params: Vec<BindingId>,
    /// Every binding of the function.
    pub bindings: Bindings,
    /// Generic restrictions found while typing it.
    pub restrictions: Vec<Diagnostic>,
    /// Entry label in the CFG.
    pub entry_l: CfgLabel,
    /// Body of the function.
    pub body: Cfg<BasicBlock>,
    /// Codespan.
    pub span: Span,
}

impl fmt::Display for Fun {
    /// Prints the blocks in reverse postorder, with source names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fn {} {{", self.name)?;
        for label in self.body.reverse_postorder(self.entry_l) {
            let block = &self.body[&label];
            let header = if block.loop_header { " (loop header)" } else { "" };
            writeln!(f, "  {label}:{header}")?;
            for instr in &block.instrs {
                writeln!(f, "    {}", instr.display(&self.bindings))?;
            }
            let targets: Vec<_> = self
                .body
                .out_edges(label)
                .map(|(branch, target)| format!("{branch:?} -> {target}"))
                .collect();
            writeln!(f, "    {:?} [{}]", block.terminator, targets.join(", "))?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for Fun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
