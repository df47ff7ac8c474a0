//! Declarations available to every program.

use anyhow::{Context as AnyhowContext, Result};

use crate::ast::{self, parse_rule};
use crate::config::Config;
use crate::grammar::Rule;
use crate::Context;

/// Source of the prelude.
pub(crate) const PRELUDE: &str = "
fn exit() -> Never;
fn fatal_error() -> Never;
fn print(value: borrowing any);
";

/// Parses the prelude declarations.
pub(crate) fn prelude() -> Result<ast::Program> {
    let config = Config {
        input: PRELUDE,
        filename: Some("<prelude>"),
        ..Config::default()
    };
    let mut ctx = Context::new(config);
    parse_rule(&mut ctx, Rule::program).context("Could not parse the prelude")
}
