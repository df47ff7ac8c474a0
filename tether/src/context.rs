//! Defining the checker context.

use codespan_reporting::files::SimpleFile;

use crate::config::Config;
use crate::reporter::{Diagnostic, Reporter};

/// Prints to the standard output if the context is in verbose mode.
#[macro_export]
macro_rules! verbose_print {
    ($ctx:expr, $($arg:tt)*) => {
        if $ctx.config.verbose {
            print!($($arg)*);
        }
    };
}

/// Prints a line to the standard output if the context is in verbose mode.
#[macro_export]
macro_rules! verbose_println {
    ($ctx:expr, $($arg:tt)*) => {
        if $ctx.config.verbose {
            println!($($arg)*);
        }
    };
}

/// Checker context.
pub struct Context<'ctx> {
    /// Checker configuration.
    pub config: Config<'ctx>,
    /// Error reporter.
    pub reporter: Reporter<'ctx>,
    /// File representation, in part for diagnostic reporting.
    pub files: SimpleFile<&'ctx str, &'ctx str>,
}

impl<'ctx> Context<'ctx> {
    /// Creates a new checker context.
    pub fn new(config: Config<'ctx>) -> Self {
        let files = SimpleFile::new(config.filename.unwrap_or("unknown file"), config.input);
        Self {
            reporter: Reporter::new(files.clone()),
            config,
            files,
        }
    }

    /// Create a new error diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.reporter.emit(diagnostic);
    }

    /// Was there any errors so far?
    pub fn has_errors(&self) -> bool {
        self.reporter.has_errors()
    }
}
