//! Ownership and linearity checker for move-only values.
//!
//! Programs go through the following steps:
//! * parsing into an AST;
//! * typing, during which every generic application site is submitted to the
//!   generic instantiation gate;
//! * lowering of every function body into a control flow graph;
//! * linearity checking of each function, which also inserts the destruction
//!   points of owned values.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::time::Instant;

// Defined first so that the macros can be used in the other modules.
#[macro_use]
pub mod context;
#[macro_use]
mod grammar;

pub mod ast;
pub mod codes;
pub mod config;
pub mod generics;
pub mod linearity;
pub mod mir;
mod miring;
mod prelude;
pub mod reporter;
mod scoped;
pub mod tast;
mod typing;
mod utils;

#[cfg(test)]
#[macro_use]
extern crate tether_tests_proc;

#[macro_use]
extern crate lazy_static;

extern crate pest;
#[macro_use]
extern crate pest_derive;

#[macro_use]
extern crate anyhow;

use anyhow::Result;
pub use context::Context;
pub use linearity::{
    check_fun, CheckedFun, CheckedProgram, DeinitPoint, ErrorKind, Rejected, Verdict,
};
use prelude::prelude;
use reporter::Diagnostics;
pub use steps::{linearity_check, mir, parse, typecheck};

/// Runs every step on the input of the context.
///
/// Returns the checked program, or its rejection if any step found errors.
pub fn check<'ctx>(ctx: &mut Context<'ctx>) -> Result<Result<CheckedProgram, Rejected<'ctx>>> {
    let p = match parse(ctx) {
        Ok(p) => p,
        // Syntax errors are reported as diagnostics
        Err(_) if ctx.has_errors() => return Ok(Err(ctx.reporter.flush().into())),
        Err(err) => return Err(err),
    };
    let typed = match typecheck(ctx, p)? {
        Ok(typed) => typed,
        Err(diagnostics) => return Ok(Err(diagnostics.into())),
    };
    let mired = mir(ctx, typed)?;
    linearity_check(ctx, mired)
}

mod steps {
    //! Defining the function for all the steps of the checker.

    use std::io::Write;

    use linearity::LinearityChecker;
    use miring::MIRer;
    use typing::Typer;

    use super::*;

    /// Parses the input of the context.
    ///
    /// Syntax errors are emitted to the reporter, and make it fail.
    pub fn parse<'ctx>(ctx: &mut Context<'ctx>) -> Result<ast::Program> {
        verbose_print!(ctx, "Parsing...");
        std::io::stdout().flush()?;
        let start = Instant::now();
        let res = ast::parse_file(ctx);
        verbose_println!(ctx, "\rParsed [{:?}]", start.elapsed());
        res
    }

    /// Type-checks a given program.
    ///
    /// Returns the diagnostics if there are errors that prevent any further
    /// analysis. Generic restrictions do not: they stay in the reporter, and
    /// the linearity checker still runs.
    ///
    /// Under the hood, this function is in charge of allocating a new `Typer`
    /// and launching it on your program, with the prelude in scope.
    pub fn typecheck<'ctx>(
        ctx: &mut Context<'ctx>,
        p: ast::Program,
    ) -> Result<Result<tast::Program, Diagnostics<'ctx>>> {
        verbose_print!(ctx, "Type-checking...");
        std::io::stdout().flush()?;
        let start = Instant::now();

        let prelude = prelude()?;
        let mut typer = Typer::new(ctx);
        let typed = typer.check(prelude, p);
        let frontend_errors = typer.has_frontend_errors();
        let res = if frontend_errors {
            Err(ctx.reporter.flush())
        } else {
            Ok(typed)
        };
        verbose_println!(ctx, "\rType-checked [{:?}]", start.elapsed());
        Ok(res)
    }

    /// Computes the MIR output of a given program.
    ///
    /// Functions with a structural error are reported and left out.
    ///
    /// Under the hood, in charge of allocating a new `MIRer` and launching it
    /// on your program.
    pub fn mir<'ctx>(ctx: &mut Context<'ctx>, p: tast::Program) -> Result<mir::Program> {
        verbose_println!(ctx, "Building control flow graphs...");
        std::io::stdout().flush()?;
        let start = Instant::now();
        let mut mirer = MIRer::new(ctx);
        let res = mirer.gen_mir(p);
        verbose_println!(ctx, "Built control flow graphs [{:?}]", start.elapsed());
        Ok(res)
    }

    /// Checks the ownership and linearity of a given program.
    ///
    /// Returns the rejection if any error was found so far, including during
    /// the previous steps. It keeps the verdict of every function.
    pub fn linearity_check<'ctx>(
        ctx: &mut Context<'ctx>,
        p: mir::Program,
    ) -> Result<Result<CheckedProgram, Rejected<'ctx>>> {
        verbose_println!(ctx, "Linearity-checking...");
        std::io::stdout().flush()?;
        let start = Instant::now();
        let mut checker = LinearityChecker::new();
        let checked = checker.check(ctx, p);
        if ctx.config.emit_cfg {
            for f in &checked.funs {
                println!("{}", f.fun);
            }
        }
        verbose_println!(ctx, "Linearity-checked [{:?}]", start.elapsed());
        if ctx.has_errors() {
            Ok(Err(Rejected {
                diagnostics: ctx.reporter.flush(),
                checked: Some(checked),
            }))
        } else {
            Ok(Ok(checked))
        }
    }
}
