//! Ownership and linearity checking of the MIR.
//!
//! Each function is checked independently:
//! * the linearity dataflow engine computes the liveness of every move-only
//!   binding to a fixpoint;
//! * the borrow scope validator checks the exclusivity of accesses;
//! * destruction points are inserted according to the liveness fixpoint.

pub mod deinit;
pub mod engine;
pub mod error;
pub mod flow;
pub mod scopes;
pub mod state;

pub use deinit::DeinitPoint;
pub use engine::Linearity;
pub use error::{ErrorKind, Verdict};
pub use scopes::Scopes;
pub use state::Liveness;

use crate::mir::{Fun, Program};
pub use crate::reporter::Diagnostic;
use crate::reporter::Diagnostics;
use crate::tast::Decls;
use crate::Context;

/// A checked function.
#[derive(Debug)]
pub struct CheckedFun {
    /// The function, with its destruction points inserted in the CFG.
    pub fun: Fun,
    /// Verdict of the check.
    pub verdict: Verdict,
    /// Destruction points, in reverse postorder of their blocks.
    pub deinits: Vec<DeinitPoint>,
}

/// A checked program.
#[derive(Debug)]
pub struct CheckedProgram {
    /// Declarations.
    pub decls: Decls,
    /// Checked functions, in source order.
    pub funs: Vec<CheckedFun>,
}

/// A program rejected by the checker.
///
/// The verdict of each function is kept when the program went as far as the
/// linearity checker.
pub struct Rejected<'ctx> {
    /// Every diagnostic of the program.
    pub diagnostics: Diagnostics<'ctx>,
    /// The checked functions, if the frontend accepted the program.
    pub checked: Option<CheckedProgram>,
}

impl<'ctx> Rejected<'ctx> {
    /// Consumes the rejection and returns the diagnostic codes, sorted.
    pub fn codes(self) -> Vec<String> {
        self.diagnostics.codes()
    }

    /// Displays the diagnostics, and returns how many of them were errors.
    pub fn display(&self) -> anyhow::Result<usize> {
        self.diagnostics.display()
    }

    /// Renders the diagnostics without colors.
    pub fn render(self) -> anyhow::Result<String> {
        self.diagnostics.render()
    }
}

impl<'ctx> From<Diagnostics<'ctx>> for Rejected<'ctx> {
    fn from(diagnostics: Diagnostics<'ctx>) -> Self {
        Self {
            diagnostics,
            checked: None,
        }
    }
}

impl CheckedProgram {
    /// Did every function pass the check?
    pub fn is_pass(&self) -> bool {
        self.funs.iter().all(|f| f.verdict.is_pass())
    }
}

/// Checks one function.
///
/// Its verdict starts with the generic restrictions found while typing it.
pub fn check_fun(mut fun: Fun) -> CheckedFun {
    let flow = Linearity.fixpoint(&fun);
    let (deinits, found) = deinit::insert_deinits(&mut fun, &flow);
    let mut diagnostics = std::mem::take(&mut fun.restrictions);
    diagnostics.extend(found);
    diagnostics.extend(Scopes.validate(&fun));
    CheckedFun {
        fun,
        verdict: Verdict { diagnostics },
        deinits,
    }
}

/// The linearity checker.
pub struct LinearityChecker;

impl LinearityChecker {
    /// Creates a new linearity checker.
    pub fn new() -> Self {
        Self
    }

    /// Checks a program, emitting the diagnostics of each function.
    pub fn check(&mut self, ctx: &Context, p: Program) -> CheckedProgram {
        let funs = p
            .funs
            .into_iter()
            .map(|fun| {
                // Generic restrictions were already emitted by the typer
                let emitted = fun.restrictions.len();
                let checked = check_fun(fun);
                verbose_println!(
                    ctx,
                    "  `{}`: {} diagnostic(s), {} destruction point(s)",
                    checked.fun.name,
                    checked.verdict.diagnostics.len(),
                    checked.deinits.len()
                );
                for diagnostic in &checked.verdict.diagnostics[emitted..] {
                    ctx.emit(diagnostic.clone());
                }
                checked
            })
            .collect();
        CheckedProgram {
            decls: p.decls,
            funs,
        }
    }
}
