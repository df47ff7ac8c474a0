//! Linearity dataflow engine.
//!
//! Tracks the liveness of every move-only binding along the control flow
//! graph, and checks that each value is consumed at most once, never used
//! after being consumed, and consistently consumed across merging paths.

use std::collections::BTreeSet;

use super::error::ErrorKind;
use super::flow::{Analysis, Fixpoint, Sink};
use super::state::{Disagreement, Liveness, State};
use crate::mir::{CfgLabel, Fun, Instr, InstrKind, Operand, Place, Span};
use crate::tast::{Binding, Convention, Ownership};

/// The linearity analysis.
pub struct Linearity;

/// Fixpoint of the linearity analysis.
pub type LinearityFlow = Fixpoint<State>;

impl Linearity {
    /// Computes the fixpoint on `fun`.
    pub fn fixpoint(&self, fun: &Fun) -> LinearityFlow {
        Fixpoint::compute(self, fun)
    }

    /// Tracked binding of a place, if the binding is move-only.
    fn tracked<'f>(fun: &'f Fun, place: &Place) -> Option<&'f Binding> {
        let binding = &fun.bindings[place.binding];
        binding.is_move_only().then_some(binding)
    }

    /// Displays a place.
    fn name(fun: &Fun, place: &Place) -> String {
        place.display(&fun.bindings).to_string()
    }

    /// Reports a use of a place that is not live.
    fn report_dead_use(
        fun: &Fun,
        place: &Place,
        liveness: &Liveness,
        span: Span,
        sink: &mut Sink,
    ) {
        let name = Self::name(fun, place);
        match liveness {
            Liveness::Merged { .. } | Liveness::Live => {}
            Liveness::Uninit => sink.report(|| {
                ErrorKind::UseAfterConsume
                    .diagnostic(format!("`{name}` is used before being initialized"))
                    .with_labels(vec![span.as_label()])
            }),
            Liveness::Consumed(consumed) => sink.report(|| {
                ErrorKind::UseAfterConsume
                    .diagnostic(format!("`{name}` is used after being consumed"))
                    .with_labels(vec![
                        span.as_label(),
                        consumed.as_secondary_label().with_message("consumed here"),
                    ])
            }),
            Liveness::Partial { span: moved, .. } => match place.field {
                Some(_) => sink.report(|| {
                    ErrorKind::UseAfterConsume
                        .diagnostic(format!("`{name}` is used after being consumed"))
                        .with_labels(vec![
                            span.as_label(),
                            moved.as_secondary_label().with_message("consumed here"),
                        ])
                }),
                None => sink.report(|| {
                    ErrorKind::PartialUseConflict
                        .diagnostic(format!("`{name}` is used after being partially consumed"))
                        .with_labels(vec![
                            span.as_label(),
                            moved
                                .as_secondary_label()
                                .with_message("a field is consumed here"),
                        ])
                }),
            },
        }
    }

    /// Reads a place: it must be live.
    fn read(fun: &Fun, state: &State, place: &Place, span: Span, sink: &mut Sink) {
        let liveness = state.get(place.binding);
        let live = match place.field {
            Some(field) => liveness.is_field_live(field),
            None => matches!(liveness, Liveness::Live),
        };
        if !live {
            Self::report_dead_use(fun, place, liveness, span, sink);
        }
    }

    /// Consumes a place.
    fn consume(
        fun: &Fun,
        binding: &Binding,
        state: &mut State,
        place: &Place,
        span: Span,
        sink: &mut Sink,
    ) {
        if binding.ownership == Ownership::Borrowed {
            let name = Self::name(fun, place);
            sink.report(|| {
                ErrorKind::BorrowedConsume
                    .diagnostic(format!("cannot consume `{name}`, which is borrowed"))
                    .with_labels(vec![
                        span.as_label(),
                        binding
                            .span
                            .as_secondary_label()
                            .with_message("borrowed here"),
                    ])
            });
            return;
        }
        let liveness = state.get(place.binding).clone();
        match (place.field, &liveness) {
            (None, Liveness::Live) => state.set(place.binding, Liveness::Consumed(span)),
            (Some(field), Liveness::Live) => state.set(
                place.binding,
                Liveness::Partial {
                    moved: BTreeSet::from([field]),
                    span,
                },
            ),
            (Some(field), Liveness::Partial { moved, .. }) if !moved.contains(&field) => {
                let mut moved = moved.clone();
                moved.insert(field);
                state.set(place.binding, Liveness::Partial { moved, span });
            }
            (_, liveness) => Self::report_dead_use(fun, place, liveness, span, sink),
        }
    }

    /// Applies a use of an operand.
    fn use_operand(fun: &Fun, state: &mut State, operand: &Operand, span: Span, sink: &mut Sink) {
        let place = &operand.place;
        let Some(binding) = Self::tracked(fun, place) else {
            return;
        };
        let copyable_field = place
            .field
            .and_then(|field| binding.fields.get(field))
            .map_or(false, |field| field.copyable);
        match operand.convention {
            Convention::Consuming if !copyable_field => {
                Self::consume(fun, binding, state, place, span, sink)
            }
            Convention::Consuming | Convention::Borrowing | Convention::Inout => {
                Self::read(fun, state, place, span, sink)
            }
        }
    }

    /// (Re)initializes a place.
    fn init(fun: &Fun, state: &mut State, place: &Place, span: Span, sink: &mut Sink) {
        let Some(binding) = Self::tracked(fun, place) else {
            return;
        };
        let Some(field) = place.field else {
            if !binding.mutable {
                Self::check_single_init(binding, state.get(place.binding), span, sink);
            }
            state.set(place.binding, Liveness::Live);
            return;
        };
        match state.get(place.binding).clone() {
            Liveness::Live | Liveness::Merged { .. } => {}
            Liveness::Partial { mut moved, span: at } => {
                moved.remove(&field);
                let liveness = if moved.is_empty() {
                    Liveness::Live
                } else {
                    Liveness::Partial { moved, span: at }
                };
                state.set(place.binding, liveness);
            }
            Liveness::Uninit | Liveness::Consumed(_) => {
                let name = fun.bindings[place.binding].name.clone();
                sink.report(|| {
                    ErrorKind::PartialUseConflict
                        .diagnostic(format!(
                            "cannot reinitialize a field of `{name}`, which is not initialized"
                        ))
                        .with_labels(vec![span.as_label()])
                        .with_notes(vec![format!("reinitialize `{name}` as a whole instead")])
                });
            }
        }
    }

    /// An immutable binding is initialized at most once on every path, even
    /// when its single assignment is repeated by a loop.
    fn check_single_init(binding: &Binding, liveness: &Liveness, span: Span, sink: &mut Sink) {
        let name = &binding.name;
        let message = match liveness {
            Liveness::Uninit | Liveness::Merged { .. } => return,
            Liveness::Live => format!("immutable `{name}` is initialized twice"),
            Liveness::Consumed(_) | Liveness::Partial { .. } => {
                format!("immutable `{name}` is initialized again after being consumed")
            }
        };
        let consumed_at = liveness.consumed_at();
        sink.report(|| {
            let mut labels = vec![span.as_label()];
            labels.extend(
                consumed_at.map(|at| at.as_secondary_label().with_message("consumed here")),
            );
            ErrorKind::UseAfterConsume
                .diagnostic(message)
                .with_labels(labels)
                .with_notes(vec![format!("declare `{name}` with `var` to reinitialize it")])
        });
    }

    /// A binding goes out of scope.
    fn scope_end(state: &mut State, binding: &Binding, span: Span, sink: &mut Sink) {
        if binding.ownership == Ownership::Inout {
            match state.get(binding.id) {
                Liveness::Live | Liveness::Merged { .. } => {}
                liveness => {
                    let consumed_at = liveness.consumed_at();
                    let name = &binding.name;
                    sink.report(|| {
                        let mut labels = vec![span.as_label()];
                        labels.extend(consumed_at.map(|at| {
                            at.as_secondary_label().with_message("consumed here")
                        }));
                        ErrorKind::MissingReinit
                            .diagnostic(format!(
                                "`inout` parameter `{name}` must be reinitialized before the function returns"
                            ))
                            .with_labels(labels)
                    });
                }
            }
        }
        state.remove(binding.id);
    }
}

impl Analysis for Linearity {
    type State = State;

    fn join(&self, fun: &Fun, label: CfgLabel, states: &[&State], sink: &mut Sink) -> State {
        let block = &fun.body[&label];
        State::join(label, states, |binding, kind, consumed_at| {
            let name = &fun.bindings[binding].name;
            let message = match kind {
                Disagreement::Consumed if block.loop_header => {
                    format!("`{name}` is consumed in a previous loop iteration")
                }
                Disagreement::Consumed => {
                    format!("`{name}` is consumed on some paths but not others")
                }
                Disagreement::Uninitialized => {
                    format!("`{name}` is initialized on some paths but not others")
                }
            };
            sink.report(|| {
                let mut labels = vec![block.span.as_label()];
                labels.extend(
                    consumed_at.map(|at| at.as_secondary_label().with_message("consumed here")),
                );
                ErrorKind::InconsistentMerge
                    .diagnostic(message)
                    .with_labels(labels)
            });
        })
    }

    fn transfer(&self, fun: &Fun, state: &mut State, instr: &Instr, sink: &mut Sink) {
        let span = instr.span;
        match &instr.kind {
            InstrKind::Declare(b) => {
                if fun.bindings[*b].is_move_only() {
                    state.set(*b, Liveness::Uninit);
                }
            }
            InstrKind::Init(place) => Self::init(fun, state, place, span, sink),
            InstrKind::Use(operand) => Self::use_operand(fun, state, operand, span, sink),
            InstrKind::BeginAccess { operand, .. } => {
                if Self::tracked(fun, &operand.place).is_some() {
                    Self::read(fun, state, &operand.place, span, sink);
                }
            }
            InstrKind::ScopeEnd(b) => {
                let binding = &fun.bindings[*b];
                if binding.is_move_only() {
                    Self::scope_end(state, binding, span, sink);
                }
            }
            InstrKind::Noop
            | InstrKind::EndAccess(_)
            | InstrKind::Call(_)
            | InstrKind::Deinit { .. } => {}
        }
    }
}
