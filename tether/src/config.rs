//! Defining the checker config options.

/// Check configuration.
#[derive(Default, Clone, Copy)]
pub struct Config<'ctx> {
    /// Checker input string.
    pub input: &'ctx str,
    /// Checker input filename.
    pub filename: Option<&'ctx str>,
    /// Verbose mode.
    pub verbose: bool,
    /// Do we print the annotated control flow graphs once checked.
    pub emit_cfg: bool,
}

impl<'ctx> Config<'ctx> {
    /// Configuration for checking some `input` with default options.
    pub fn with_input(input: &'ctx str) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }
}
