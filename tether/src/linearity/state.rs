//! Liveness states of move-only bindings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::mir::{BindingId, CfgLabel, Span};

/// Liveness of a move-only binding at a program point.
#[derive(Clone, Debug)]
pub enum Liveness {
    /// Declared but never initialized.
    Uninit,
    /// Holds a value.
    Live,
    /// Its value was consumed at `span`.
    Consumed(Span),
    /// Some fields were consumed, the last one at `span`.
    Partial {
        /// Indexes of the consumed fields.
        moved: BTreeSet<usize>,
        /// Where the last field was consumed.
        span: Span,
    },
    /// Disagreeing states met at the merge point `at`. It is reported there,
    /// and uses are silent from now on.
    Merged {
        /// The merge block.
        at: CfgLabel,
        /// Where it was consumed on one of the paths, if it was.
        consumed_at: Option<Span>,
    },
}

impl Liveness {
    /// Where it was consumed, if known.
    pub fn consumed_at(&self) -> Option<Span> {
        match self {
            Liveness::Consumed(span) | Liveness::Partial { span, .. } => Some(*span),
            Liveness::Merged { consumed_at, .. } => *consumed_at,
            Liveness::Uninit | Liveness::Live => None,
        }
    }

    /// Is the field `field` live?
    pub fn is_field_live(&self, field: usize) -> bool {
        match self {
            Liveness::Live => true,
            Liveness::Partial { moved, .. } => !moved.contains(&field),
            Liveness::Uninit | Liveness::Consumed(_) | Liveness::Merged { .. } => false,
        }
    }

    /// Joins two incoming states, or returns `None` if they disagree.
    ///
    /// `Merged` absorbs everything.
    fn agree(&self, other: &Liveness) -> Option<Liveness> {
        use Liveness::*;
        match (self, other) {
            (merged @ Merged { .. }, _) | (_, merged @ Merged { .. }) => Some(merged.clone()),
            (Live, Live) => Some(Live),
            (Uninit, Uninit) => Some(Uninit),
            (Consumed(s1), Consumed(s2)) => Some(Consumed(earliest(*s1, *s2))),
            (Consumed(span), Uninit) | (Uninit, Consumed(span)) => Some(Consumed(*span)),
            (
                Partial { moved: m1, span: s1 },
                Partial { moved: m2, span: s2 },
            ) if m1 == m2 => Some(Partial {
                moved: m1.clone(),
                span: earliest(*s1, *s2),
            }),
            _ => None,
        }
    }
}

/// The span that starts first, for deterministic joins.
fn earliest(s1: Span, s2: Span) -> Span {
    if s2.start() < s1.start() {
        s2
    } else {
        s1
    }
}

impl PartialEq for Liveness {
    fn eq(&self, other: &Self) -> bool {
        use Liveness::*;
        match (self, other) {
            (Uninit, Uninit) | (Live, Live) => true,
            (Merged { at: a1, consumed_at: c1 }, Merged { at: a2, consumed_at: c2 }) => {
                a1 == a2 && c1 == c2
            }
            (Consumed(s1), Consumed(s2)) => s1 == s2,
            (
                Partial { moved: m1, span: s1 },
                Partial { moved: m2, span: s2 },
            ) => m1 == m2 && s1 == s2,
            _ => false,
        }
    }
}

impl Eq for Liveness {}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Liveness::Uninit => write!(f, "uninitialized"),
            Liveness::Live => write!(f, "live"),
            Liveness::Consumed(_) => write!(f, "consumed"),
            Liveness::Partial { moved, .. } => write!(f, "partially consumed {moved:?}"),
            Liveness::Merged { at, .. } => write!(f, "merged at {at}"),
        }
    }
}

/// Liveness of every move-only binding in scope.
///
/// Bindings out of scope are absent, and behave as `Uninit`.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct State(BTreeMap<BindingId, Liveness>);

/// Outcome of the join of one binding at a merge point.
#[derive(Debug, PartialEq, Eq)]
pub enum Disagreement {
    /// Consumed on some paths, live on others.
    Consumed,
    /// Initialized on some paths only.
    Uninitialized,
}

impl State {
    /// Liveness of `binding`.
    pub fn get(&self, binding: BindingId) -> &Liveness {
        self.0.get(&binding).unwrap_or(&Liveness::Uninit)
    }

    /// Sets the liveness of `binding`.
    pub fn set(&mut self, binding: BindingId, liveness: Liveness) {
        self.0.insert(binding, liveness);
    }

    /// Forgets `binding`, which goes out of scope.
    pub fn remove(&mut self, binding: BindingId) {
        self.0.remove(&binding);
    }

    /// Joins the incoming states of the merge point `at`.
    ///
    /// Every binding whose incoming states disagree becomes `Merged` at `at`,
    /// and so does every binding that comes back `Merged` at `at` through a
    /// back edge. Those are passed to `disagree`, with the span of one of
    /// their consumptions, if any. A binding merged elsewhere stays silent.
    pub fn join(
        at: CfgLabel,
        states: &[&State],
        mut disagree: impl FnMut(BindingId, Disagreement, Option<Span>),
    ) -> State {
        let bindings: BTreeSet<BindingId> = states
            .iter()
            .flat_map(|state| state.0.keys().copied())
            .collect();
        let mut res = State::default();
        for binding in bindings {
            let incoming: Vec<&Liveness> = states.iter().map(|state| state.get(binding)).collect();
            // Already merged here, through a back edge
            let merged_here = incoming.iter().find_map(|liveness| match liveness {
                Liveness::Merged {
                    at: merged_at,
                    consumed_at,
                } if *merged_at == at => Some(*consumed_at),
                _ => None,
            });
            let merged_elsewhere = incoming
                .iter()
                .find(|liveness| matches!(liveness, Liveness::Merged { .. }));
            let agreed = match (merged_here, merged_elsewhere) {
                (Some(_), _) => None,
                (None, Some(merged)) => Some((*merged).clone()),
                (None, None) => incoming[1..]
                    .iter()
                    .try_fold(incoming[0].clone(), |acc, liveness| acc.agree(liveness)),
            };
            let joined = match agreed {
                Some(joined) => joined,
                None => {
                    let consumed_at = merged_here.flatten().or_else(|| {
                        incoming.iter().find_map(|liveness| liveness.consumed_at())
                    });
                    let kind = if consumed_at.is_some() {
                        Disagreement::Consumed
                    } else {
                        Disagreement::Uninitialized
                    };
                    disagree(binding, kind, consumed_at);
                    Liveness::Merged { at, consumed_at }
                }
            };
            res.set(binding, joined);
        }
        res
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(b, l)| (b, l.to_string())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mir::Cfg;

    fn state(entries: impl IntoIterator<Item = (usize, Liveness)>) -> State {
        let mut state = State::default();
        for (b, liveness) in entries {
            state.set(BindingId(b), liveness);
        }
        state
    }

    #[test]
    fn consumed_and_uninit_agree() {
        let consumed = state([(0, Liveness::Consumed(Span::at(3)))]);
        let uninit = state([(0, Liveness::Uninit)]);
        let joined = State::join(CfgLabel::default(), &[&consumed, &uninit], |_, _, _| {
            panic!("no disagreement expected")
        });
        assert_eq!(joined.get(BindingId(0)), &Liveness::Consumed(Span::at(3)));
    }

    #[test]
    fn disagreement_is_reported_once_per_binding() {
        let at = CfgLabel::default();
        let live = state([(0, Liveness::Live), (1, Liveness::Live)]);
        let consumed = state([(0, Liveness::Consumed(Span::at(7))), (1, Liveness::Live)]);
        let mut reported = vec![];
        let joined = State::join(at, &[&live, &consumed, &live], |b, kind, span| {
            reported.push((b, kind, span))
        });
        assert_eq!(
            reported,
            vec![(BindingId(0), Disagreement::Consumed, Some(Span::at(7)))]
        );
        assert_eq!(
            joined.get(BindingId(0)),
            &Liveness::Merged {
                at,
                consumed_at: Some(Span::at(7))
            }
        );
        assert_eq!(joined.get(BindingId(1)), &Liveness::Live);
    }

    #[test]
    fn merged_elsewhere_is_silent() {
        let mut cfg = Cfg::<()>::default();
        let (here, elsewhere) = (cfg.add_node(()), cfg.add_node(()));
        let merged = state([(
            0,
            Liveness::Merged {
                at: elsewhere,
                consumed_at: None,
            },
        )]);
        let consumed = state([(0, Liveness::Consumed(Span::at(2)))]);
        let joined = State::join(here, &[&consumed, &merged], |_, _, _| {
            panic!("already reported")
        });
        assert!(matches!(
            joined.get(BindingId(0)),
            Liveness::Merged { at, .. } if *at == elsewhere
        ));
    }

    #[test]
    fn merged_here_is_reported_again() {
        let at = CfgLabel::default();
        let live = state([(0, Liveness::Live)]);
        let back = state([(
            0,
            Liveness::Merged {
                at,
                consumed_at: Some(Span::at(5)),
            },
        )]);
        let mut reported = vec![];
        State::join(at, &[&live, &back], |b, kind, span| {
            reported.push((b, kind, span))
        });
        assert_eq!(
            reported,
            vec![(BindingId(0), Disagreement::Consumed, Some(Span::at(5)))]
        );
    }

    #[test]
    fn initialized_on_some_paths() {
        let live = state([(0, Liveness::Live)]);
        let uninit = state([]);
        let mut reported = vec![];
        State::join(CfgLabel::default(), &[&live, &uninit], |b, kind, span| {
            reported.push((b, kind, span))
        });
        assert_eq!(
            reported,
            vec![(BindingId(0), Disagreement::Uninitialized, None)]
        );
    }

    #[test]
    fn partial_fields_must_match() {
        let moved = |fields: &[usize]| Liveness::Partial {
            moved: fields.iter().copied().collect(),
            span: Span::at(1),
        };
        assert!(moved(&[0]).agree(&moved(&[0])).is_some());
        assert!(moved(&[0]).agree(&moved(&[1])).is_none());
        assert!(!moved(&[0]).is_field_live(0));
        assert!(moved(&[0]).is_field_live(1));
    }
}
