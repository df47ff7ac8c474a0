//! Borrow scope validator.
//!
//! Forward may-analysis of the accesses open at each program point. Storage
//! under a mutate access is exclusively held. Storage under a borrow access
//! can only be read.

use std::collections::BTreeMap;

use super::error::ErrorKind;
use super::flow::{Analysis, Fixpoint, Sink};
use crate::mir::{AccessId, CfgLabel, Fun, Instr, InstrKind, Operand, Place, Span};
use crate::tast::Convention;

/// Accesses that may be open.
pub type OpenAccesses = BTreeMap<AccessId, Operand>;

/// The borrow scope validator.
pub struct Scopes;

/// What an instruction does to some storage.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Action {
    /// Reads it, or opens a borrow of it.
    Read,
    /// Consumes it, reinitializes it, or opens a mutate access over it.
    Write,
}

impl Scopes {
    /// Validates the accesses of `fun`, returning the diagnostics.
    pub fn validate(&self, fun: &Fun) -> Vec<super::Diagnostic> {
        Fixpoint::compute(self, fun).replay(self, fun, |_, _, _, _| {})
    }

    /// Is the use of `place` a write?
    ///
    /// Consuming a copyable value is a copy, which only reads it.
    fn consuming_action(fun: &Fun, place: &Place) -> Action {
        let binding = &fun.bindings[place.binding];
        let copyable = match place.field {
            Some(field) => binding
                .fields
                .get(field)
                .map_or(binding.copyable, |field| field.copyable),
            None => binding.copyable,
        };
        if copyable {
            Action::Read
        } else {
            Action::Write
        }
    }

    /// Checks that `action` on `place` does not conflict with an open access.
    fn check(
        fun: &Fun,
        open: &OpenAccesses,
        place: &Place,
        action: Action,
        span: Span,
        sink: &mut Sink,
    ) {
        let conflict = open.values().find(|access| {
            access.place.overlaps(place) && (action == Action::Write || access.is_mutating())
        });
        if let Some(access) = conflict {
            let name = place.display(&fun.bindings).to_string();
            let accessed = access.place.display(&fun.bindings).to_string();
            let (what, held) = match (action, access.convention) {
                (Action::Read, _) => ("read", "mutated"),
                (Action::Write, Convention::Inout) => ("modify", "mutated"),
                (Action::Write, _) => ("modify", "borrowed"),
            };
            let access_span = access.place.span;
            sink.report(|| {
                ErrorKind::OverlappingAccess
                    .diagnostic(format!(
                        "cannot {what} `{name}` while `{accessed}` is {held}"
                    ))
                    .with_labels(vec![
                        span.as_label(),
                        access_span
                            .as_secondary_label()
                            .with_message(format!("`{accessed}` is {held} here")),
                    ])
            });
        }
    }
}

impl Analysis for Scopes {
    type State = OpenAccesses;

    /// Union of the incoming accesses.
    fn join(&self, _: &Fun, _: CfgLabel, states: &[&OpenAccesses], _: &mut Sink) -> OpenAccesses {
        states
            .iter()
            .flat_map(|state| state.iter().map(|(id, operand)| (*id, *operand)))
            .collect()
    }

    fn transfer(&self, fun: &Fun, open: &mut OpenAccesses, instr: &Instr, sink: &mut Sink) {
        let span = instr.span;
        match &instr.kind {
            InstrKind::Use(operand) => {
                let action = match operand.convention {
                    Convention::Consuming => Self::consuming_action(fun, &operand.place),
                    Convention::Borrowing | Convention::Inout => Action::Read,
                };
                Self::check(fun, open, &operand.place, action, span, sink);
            }
            InstrKind::Init(place) => Self::check(fun, open, place, Action::Write, span, sink),
            InstrKind::BeginAccess { id, operand } => {
                let action = if operand.is_mutating() {
                    Action::Write
                } else {
                    Action::Read
                };
                Self::check(fun, open, &operand.place, action, span, sink);
                open.insert(*id, *operand);
            }
            InstrKind::EndAccess(id) => {
                open.remove(id);
            }
            InstrKind::Noop
            | InstrKind::Declare(_)
            | InstrKind::Call(_)
            | InstrKind::ScopeEnd(_)
            | InstrKind::Deinit { .. } => {}
        }
    }
}
