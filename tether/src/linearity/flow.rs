//! Providing the general abstractions for the forward dataflow analyses on
//! basic blocks.
//!
//! An analysis is computed to a fixpoint silently, then replayed once with
//! reporting enabled so that each diagnostic is reported exactly once.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use priority_queue::PriorityQueue;

use crate::mir::{CfgLabel, Fun, Instr};
use crate::reporter::Diagnostic;

/// A flow point: the state at the entry of a block, and at its exit.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Flow<S> {
    /// State at the entry.
    pub ins: S,
    /// State at the exit.
    pub outs: S,
}

impl<S: fmt::Debug> fmt::Debug for Flow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} --> {:?}", self.ins, self.outs)
    }
}

/// Where diagnostics go during an analysis.
///
/// While computing the fixpoint, nothing is reported.
#[derive(Default)]
pub struct Sink {
    /// Reported diagnostics, if reporting is enabled.
    diagnostics: Option<Vec<Diagnostic>>,
}

impl Sink {
    /// A sink that reports.
    pub fn reporting() -> Self {
        Self {
            diagnostics: Some(vec![]),
        }
    }

    /// Reports a diagnostic, built only if reporting is enabled.
    pub fn report(&mut self, diagnostic: impl FnOnce() -> Diagnostic) {
        if let Some(diagnostics) = &mut self.diagnostics {
            diagnostics.push(diagnostic());
        }
    }

    /// Reported diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.unwrap_or_default()
    }
}

/// A forward dataflow analysis on a function.
pub trait Analysis {
    /// Abstract state at a program point.
    type State: Clone + PartialEq + Default + fmt::Debug;

    /// State at the entry of the function.
    fn entry_state(&self) -> Self::State {
        Self::State::default()
    }

    /// Joins the exit states of the predecessors of `label`.
    ///
    /// Only called for blocks with at least two predecessors.
    fn join(
        &self,
        fun: &Fun,
        label: CfgLabel,
        states: &[&Self::State],
        sink: &mut Sink,
    ) -> Self::State;

    /// Applies an instruction to the state.
    fn transfer(&self, fun: &Fun, state: &mut Self::State, instr: &Instr, sink: &mut Sink);
}

/// Fixpoint of an analysis: the flow of each reachable block.
pub struct Fixpoint<S> {
    /// Flow for each block.
    flows: BTreeMap<CfgLabel, Flow<S>>,
    /// Blocks, in reverse postorder.
    order: Vec<CfgLabel>,
}

impl<S: Clone + PartialEq + Default + fmt::Debug> Fixpoint<S> {
    /// Computes the fixpoint of `analysis` on `fun`.
    ///
    /// The worklist is ordered by reverse postorder, so that a block is
    /// visited after its forward predecessors.
    pub fn compute<A: Analysis<State = S>>(analysis: &A, fun: &Fun) -> Self {
        let order = fun.body.reverse_postorder(fun.entry_l);
        let rank: HashMap<CfgLabel, usize> =
            order.iter().enumerate().map(|(i, l)| (*l, i)).collect();
        // Blocks are only given a flow once visited
        let mut flows: BTreeMap<CfgLabel, Flow<S>> = BTreeMap::new();

        let mut queue = PriorityQueue::new();
        for (i, label) in order.iter().enumerate() {
            queue.push(*label, Reverse(i));
        }
        let mut silent = Sink::default();
        while let Some((label, _)) = queue.pop() {
            let ins = Self::ins(analysis, fun, label, &flows, &mut silent);
            let mut outs = ins.clone();
            for instr in &fun.body[&label].instrs {
                analysis.transfer(fun, &mut outs, instr, &mut silent);
            }
            let flow = Flow { ins, outs };
            if flows.get(&label) != Some(&flow) {
                flows.insert(label, flow);
                for next in fun.body.neighbors(label) {
                    queue.push(next, Reverse(rank[&next]));
                }
            }
        }
        Self { flows, order }
    }

    /// Computes the entry state of a block from the exit states of its
    /// predecessors.
    ///
    /// Predecessors that were not visited yet, through back edges, are
    /// skipped.
    fn ins<A: Analysis<State = S>>(
        analysis: &A,
        fun: &Fun,
        label: CfgLabel,
        flows: &BTreeMap<CfgLabel, Flow<S>>,
        sink: &mut Sink,
    ) -> S {
        if label == fun.entry_l {
            return analysis.entry_state();
        }
        let preds: Vec<&S> = fun
            .body
            .preneighbors(label)
            .filter_map(|pred| flows.get(&pred).map(|flow| &flow.outs))
            .collect();
        match preds.as_slice() {
            [] => S::default(),
            [single] => (*single).clone(),
            states => analysis.join(fun, label, states, sink),
        }
    }

    /// Replays the fixpoint with reporting enabled, calling `visit` with the
    /// state right before each instruction.
    ///
    /// Returns the reported diagnostics.
    pub fn replay<A: Analysis<State = S>>(
        &self,
        analysis: &A,
        fun: &Fun,
        mut visit: impl FnMut(CfgLabel, usize, &Instr, &S),
    ) -> Vec<Diagnostic> {
        let mut sink = Sink::reporting();
        for &label in &self.order {
            let mut state = Self::ins(analysis, fun, label, &self.flows, &mut sink);
            for (i, instr) in fun.body[&label].instrs.iter().enumerate() {
                visit(label, i, instr, &state);
                analysis.transfer(fun, &mut state, instr, &mut sink);
            }
        }
        sink.into_diagnostics()
    }

    /// Flow of a block.
    pub fn flow(&self, label: CfgLabel) -> Option<&Flow<S>> {
        self.flows.get(&label)
    }
}
