//! User-facing error reporting facility.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use codespan_reporting::diagnostic::{LabelStyle, Severity};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream};
use crossbeam_queue::SegQueue;

/// A checker diagnostic.
pub type Diagnostic = codespan_reporting::diagnostic::Diagnostic<()>;

lazy_static! {
    /// Terminal configuration.
    static ref TERM_CONFIG: term::Config = term::Config::default();
    /// Standard stream handle.
    static ref STD_STREAM: StandardStream = StandardStream::stderr(ColorChoice::Auto);
    /// Dummy file descriptor for internal errors.
    static ref DUMMY_FILE_FOR_INTERNAL_ERRORS: SimpleFile<&'static str, &'static str> =
        SimpleFile::new("internal error", "");
}

/// Collection of checker diagnostics, ready to be displayed.
pub struct Diagnostics<'ctx> {
    /// Stream to which we will display the diagnostics.
    writer: &'static StandardStream,
    /// Terminal configuration.
    config: &'static term::Config,
    /// The original file/source code.
    ///
    /// Needed to display the diagnostics to the terminal.
    files: SimpleFile<&'ctx str, &'ctx str>,
    /// The actual list of diagnostics.
    diagnostics: SegQueue<Diagnostic>,
    /// True iff `self.diagnostics` contains at least one error diagnostic.
    is_error: AtomicBool,
}

impl<'ctx> From<anyhow::Error> for Diagnostics<'ctx> {
    fn from(err: anyhow::Error) -> Self {
        let diagnostics = SegQueue::default();
        let mut chain = err.chain().rev();
        if let Some(final_error) = chain.next() {
            let caused_by: Vec<_> = chain.map(|x| format!("Caused by: {x}")).collect();
            diagnostics.push(
                Diagnostic::error()
                    .with_message(final_error.to_string())
                    .with_notes(caused_by),
            );
        } else {
            diagnostics.push(Diagnostic::error().with_message("internal checker error"));
        }
        Self {
            config: &TERM_CONFIG,
            writer: &STD_STREAM,
            files: DUMMY_FILE_FOR_INTERNAL_ERRORS.clone(),
            diagnostics,
            is_error: AtomicBool::new(true),
        }
    }
}

/// Offset of the primary label of a diagnostic, if any.
fn position(diagnostic: &Diagnostic) -> usize {
    diagnostic
        .labels
        .iter()
        .find(|label| label.style == LabelStyle::Primary)
        .map_or(usize::MAX, |label| label.range.start)
}

impl<'ctx> Diagnostics<'ctx> {
    /// Takes all the diagnostics out, in source order.
    ///
    /// Diagnostics at the same offset keep their emission order.
    fn drain(&self) -> Vec<Diagnostic> {
        let mut drained = Vec::with_capacity(self.diagnostics.len());
        while let Some(diagnostic) = self.diagnostics.pop() {
            drained.push(diagnostic);
        }
        drained.sort_by_key(position);
        drained
    }

    /// Displays the diagnostics to the standard error output, in source
    /// order, and returns how many of them were errors.
    ///
    /// The diagnostics are consumed by the display.
    pub fn display(&self) -> anyhow::Result<usize> {
        let mut writer = self.writer.lock();
        // Clears the line of progress indicators
        write!(&mut writer, "\r")?;
        let mut errors = 0;
        for diagnostic in self.drain() {
            if diagnostic.severity >= Severity::Error {
                errors += 1;
            }
            term::emit(&mut writer, self.config, &self.files, &diagnostic)?;
        }
        Ok(errors)
    }

    /// Renders all the diagnostics without colors, in source order.
    pub fn render(self) -> anyhow::Result<String> {
        let mut writer = NoColor::new(vec![]);
        for diagnostic in self.drain() {
            term::emit(&mut writer, self.config, &self.files, &diagnostic)?;
        }
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Pushes a new diagnostic to the list.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.is_error
            .fetch_or(diagnostic.severity >= Severity::Error, Ordering::Relaxed);
        self.diagnostics.push(diagnostic);
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Is there no diagnostic at all?
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Is there at least one error among the diagnostics?
    pub fn has_errors(&self) -> bool {
        self.is_error.load(Ordering::SeqCst)
    }

    /// Consumes the diagnostics and returns their codes, sorted.
    ///
    /// Diagnostics without a code are skipped.
    pub fn codes(self) -> Vec<String> {
        let mut codes: Vec<String> = self.into_iter().filter_map(|diag| diag.code).collect();
        codes.sort();
        codes
    }

    /// Flushes all diagnostics and returns them, leaving self's own diagnostic
    /// list empty and ready to receive messages.
    fn flush(&mut self) -> Diagnostics<'ctx> {
        Diagnostics {
            writer: self.writer,
            config: self.config,
            files: self.files.clone(),
            diagnostics: std::mem::take(&mut self.diagnostics),
            // Revert error flag and get it back
            is_error: AtomicBool::new(self.is_error.swap(false, Ordering::SeqCst)),
        }
    }
}

impl<'ctx> IntoIterator for Diagnostics<'ctx> {
    type IntoIter = ::std::vec::IntoIter<Diagnostic>;
    type Item = Diagnostic;

    fn into_iter(self) -> Self::IntoIter {
        self.drain().into_iter()
    }
}

/// Checker reporter.
///
/// Collects and reports any diagnostics emitted during checking.
pub struct Reporter<'ctx> {
    /// The actual diagnostics.
    diagnostics: Diagnostics<'ctx>,
}

impl<'ctx> Reporter<'ctx> {
    /// Create a new `Reporter`.
    pub fn new(files: SimpleFile<&'ctx str, &'ctx str>) -> Self {
        Self {
            diagnostics: Diagnostics {
                config: &TERM_CONFIG,
                writer: &STD_STREAM,
                files,
                diagnostics: SegQueue::default(),
                is_error: AtomicBool::new(false),
            },
        }
    }

    /// Create a new error diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Flushes all diagnostics and returns them.
    pub fn flush(&mut self) -> Diagnostics<'ctx> {
        self.diagnostics.flush()
    }

    /// Displays all the diagnostics to the `stderr` output, and returns how
    /// many of them were errors.
    pub fn display(&self) -> anyhow::Result<usize> {
        self.diagnostics.display()
    }

    /// Was there any errors so far?
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}
