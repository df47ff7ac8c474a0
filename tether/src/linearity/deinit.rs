//! Deinitialization insertion.
//!
//! Rewrites scope exits and reinitializations into explicit destruction
//! points, according to the liveness fixpoint.

use super::engine::{Linearity, LinearityFlow};
use super::state::Liveness;
use crate::mir::{BindingId, CfgLabel, Fun, Instr, InstrKind};
use crate::reporter::Diagnostic;
use crate::tast::{Binding, Ownership};

/// A point where a value is destroyed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeinitPoint {
    /// Block of the destruction.
    pub label: CfgLabel,
    /// Destroyed binding.
    pub binding: BindingId,
    /// Destroyed fields, or the whole value if `None`.
    pub fields: Option<Vec<usize>>,
}

/// An edit of the instructions of a block.
#[derive(Debug)]
enum Edit {
    /// Replaces the instruction.
    Replace(InstrKind),
    /// Inserts an instruction right before.
    InsertBefore(InstrKind),
}

/// What is left to destroy of `binding`, if anything.
fn remains(binding: &Binding, liveness: &Liveness) -> Option<Option<Vec<usize>>> {
    match liveness {
        Liveness::Live => Some(None),
        Liveness::Partial { moved, .. } => {
            let fields: Vec<usize> = (0..binding.fields.len())
                .filter(|field| !moved.contains(field))
                .collect();
            (!fields.is_empty()).then_some(Some(fields))
        }
        Liveness::Uninit | Liveness::Consumed(_) | Liveness::Merged { .. } => None,
    }
}

/// Computes the destruction points of `fun` and rewrites its CFG with them.
///
/// Returns the destruction points, and the diagnostics of the liveness
/// analysis, reported during the replay.
pub fn insert_deinits(fun: &mut Fun, flow: &LinearityFlow) -> (Vec<DeinitPoint>, Vec<Diagnostic>) {
    let mut edits: Vec<(CfgLabel, usize, Edit)> = vec![];
    let diagnostics = flow.replay(&Linearity, fun, |label, i, instr, state| {
        match &instr.kind {
            InstrKind::ScopeEnd(b) => {
                let binding = &fun.bindings[*b];
                let fields = (binding.is_move_only() && binding.ownership == Ownership::Owned)
                    .then(|| remains(binding, state.get(*b)))
                    .flatten();
                let kind = match fields {
                    Some(fields) => InstrKind::Deinit {
                        binding: *b,
                        fields,
                    },
                    None => InstrKind::Noop,
                };
                edits.push((label, i, Edit::Replace(kind)));
            }
            InstrKind::Init(place) => {
                let binding = &fun.bindings[place.binding];
                if !binding.is_move_only() {
                    return;
                }
                let liveness = state.get(place.binding);
                let fields = match place.field {
                    None => remains(binding, liveness),
                    Some(field) => liveness.is_field_live(field).then(|| Some(vec![field])),
                };
                if let Some(fields) = fields {
                    let kind = InstrKind::Deinit {
                        binding: place.binding,
                        fields,
                    };
                    edits.push((label, i, Edit::InsertBefore(kind)));
                }
            }
            _ => {}
        }
    });

    let mut points = vec![];
    // Back to front, so that indexes stay valid
    for (label, i, edit) in edits.into_iter().rev() {
        let block = &mut fun.body[&label];
        let span = block.instrs[i].span;
        let kind = match edit {
            Edit::Replace(kind) => {
                block.instrs[i].kind = kind.clone();
                kind
            }
            Edit::InsertBefore(kind) => {
                block.instrs.insert(
                    i,
                    Instr {
                        kind: kind.clone(),
                        span,
                    },
                );
                kind
            }
        };
        if let InstrKind::Deinit { binding, fields } = kind {
            points.push(DeinitPoint {
                label,
                binding,
                fields,
            });
        }
    }
    points.reverse();
    (points, diagnostics)
}
