//! Kinds of ownership and linearity errors, and per-function verdicts.

use std::fmt;

use crate::codes::*;
use crate::reporter::Diagnostic;

/// Kind of error found by the checker.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    /// Use of a consumed or uninitialized binding or field.
    UseAfterConsume,
    /// Whole-value use after a partial consumption, or field reinitialization
    /// into a consumed aggregate.
    PartialUseConflict,
    /// Disagreeing states at a merge point.
    InconsistentMerge,
    /// Conflicting accesses to the same storage.
    OverlappingAccess,
    /// Move-only or non-escapable type in a generic position that forbids it.
    GenericRestriction,
    /// Jump with no valid target.
    StructuralControlFlow,
    /// Consumption of a borrowed binding.
    BorrowedConsume,
    /// `inout` parameter left uninitialized.
    MissingReinit,
}

impl ErrorKind {
    /// All the kinds.
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::UseAfterConsume,
        ErrorKind::PartialUseConflict,
        ErrorKind::InconsistentMerge,
        ErrorKind::OverlappingAccess,
        ErrorKind::GenericRestriction,
        ErrorKind::StructuralControlFlow,
        ErrorKind::BorrowedConsume,
        ErrorKind::MissingReinit,
    ];

    /// Stable diagnostic code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::UseAfterConsume => USE_AFTER_CONSUME_ERROR,
            ErrorKind::PartialUseConflict => PARTIAL_USE_ERROR,
            ErrorKind::InconsistentMerge => INCONSISTENT_MERGE_ERROR,
            ErrorKind::OverlappingAccess => OVERLAPPING_ACCESS_ERROR,
            ErrorKind::GenericRestriction => GENERIC_RESTRICTION_ERROR,
            ErrorKind::StructuralControlFlow => STRUCTURAL_CONTROL_FLOW_ERROR,
            ErrorKind::BorrowedConsume => BORROWED_CONSUME_ERROR,
            ErrorKind::MissingReinit => MISSING_REINIT_ERROR,
        }
    }

    /// Kind of a diagnostic code, if it is a checker code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Creates an error diagnostic of that kind.
    pub fn diagnostic(self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error()
            .with_code(self.code())
            .with_message(message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UseAfterConsume => "use after consume",
            ErrorKind::PartialUseConflict => "partial use conflict",
            ErrorKind::InconsistentMerge => "inconsistent merge",
            ErrorKind::OverlappingAccess => "overlapping access",
            ErrorKind::GenericRestriction => "generic restriction",
            ErrorKind::StructuralControlFlow => "structural control flow",
            ErrorKind::BorrowedConsume => "borrowed consume",
            ErrorKind::MissingReinit => "missing reinitialization",
        };
        write!(f, "{name}")
    }
}

/// Outcome of the check of one function.
#[derive(Debug)]
pub struct Verdict {
    /// Diagnostics found in the function, in discovery order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    /// Did the function pass the check?
    pub fn is_pass(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Error kinds of the diagnostics, sorted.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        let mut kinds: Vec<_> = self
            .diagnostics
            .iter()
            .filter_map(|diag| diag.code.as_deref())
            .filter_map(ErrorKind::from_code)
            .collect();
        kinds.sort_by_key(|kind| kind.code());
        kinds
    }
}
