//! Defining instructions, terminators and branches, which are the basic units
//! in the MIR/CFG.

use std::fmt;

use crate::ast::Convention;
use crate::tast::{BindingId, Bindings, Place, Span};

/// Branch = label on CFG edges.
///
/// A branch is label that indicates the conditions to follow that path/jump to
/// the target node of that edge.
///
/// Example: an If statement has an outgoing edge to two other nodes. One of
/// them is labeled with `TrueB`, the other `FalseB`.
///
/// The unconditional jump is `DefaultB`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Clone, Copy)]
pub enum Branch {
    /// Branch if true.
    TrueB,
    /// Branch if false.
    FalseB,
    /// Branch to the arm of the case with that index.
    CaseB(usize),
    /// Default, always branch.
    #[default]
    DefaultB,
}

/// Identifier of a borrow scope.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessId(pub usize);

impl fmt::Debug for AccessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'a{}", self.0)
    }
}

/// A use of a place, with its convention.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Operand {
    /// Used place.
    pub place: Place,
    /// How the place is used.
    pub convention: Convention,
}

impl Operand {
    /// Is it a mutating use.
    pub fn is_mutating(&self) -> bool {
        self.convention == Convention::Inout
    }
}

/// Instructions in the MIR.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InstrKind {
    /// No-op instruction.
    #[default]
    Noop,
    /// Declares a new, uninitialized binding.
    Declare(BindingId),
    /// (Re)initializes a place.
    Init(Place),
    /// Uses a place for the duration of the instruction.
    Use(Operand),
    /// Opens a borrow scope over a place: borrowing (read-only) or inout
    /// (mutating).
    BeginAccess {
        /// Access identifier.
        id: AccessId,
        /// Accessed place.
        operand: Operand,
    },
    /// Closes a borrow scope.
    EndAccess(AccessId),
    /// Calls a function whose arguments were evaluated before.
    Call(String),
    /// A binding goes out of scope.
    ScopeEnd(BindingId),
    /// Destroys the value of a binding, or the given fields of it.
    Deinit {
        /// Destroyed binding.
        binding: BindingId,
        /// Destroyed fields, or the whole value if `None`.
        fields: Option<Vec<usize>>,
    },
}

/// An instruction, with its span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instr {
    /// Instruction kind.
    pub kind: InstrKind,
    /// Codespan.
    pub span: Span,
}

impl Instr {
    /// Displays the instruction with source names.
    pub fn display<'a>(&'a self, bindings: &'a Bindings) -> impl fmt::Display + 'a {
        InstrDisplay {
            instr: self,
            bindings,
        }
    }
}

/// Displays an instruction with source names.
struct InstrDisplay<'a> {
    /// Displayed instruction.
    instr: &'a Instr,
    /// Where to find the names.
    bindings: &'a Bindings,
}

impl fmt::Display for InstrDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.bindings;
        match &self.instr.kind {
            InstrKind::Noop => write!(f, "noop"),
            InstrKind::Declare(b) => write!(f, "declare {}", bindings[*b].name),
            InstrKind::Init(place) => write!(f, "init {}", place.display(bindings)),
            InstrKind::Use(operand) => write!(
                f,
                "use {} {}",
                operand.convention,
                operand.place.display(bindings)
            ),
            InstrKind::BeginAccess { id, operand } => write!(
                f,
                "begin_access {id:?} {} {}",
                operand.convention,
                operand.place.display(bindings)
            ),
            InstrKind::EndAccess(id) => write!(f, "end_access {id:?}"),
            InstrKind::Call(fun) => write!(f, "call {fun}"),
            InstrKind::ScopeEnd(b) => write!(f, "scope_end {}", bindings[*b].name),
            InstrKind::Deinit {
                binding,
                fields: None,
            } => write!(f, "deinit {}", bindings[*binding].name),
            InstrKind::Deinit {
                binding,
                fields: Some(fields),
            } => {
                let binding = &bindings[*binding];
                let fields: Vec<_> = fields
                    .iter()
                    .map(|field| binding.field_name(*field))
                    .collect();
                write!(f, "deinit {}.{{{}}}", binding.name, fields.join(", "))
            }
        }
    }
}

/// How a basic block ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminator {
    /// Unconditional jump.
    Goto,
    /// Two-way conditional jump.
    Branch,
    /// Jump to one of the arms of a `match`.
    Switch,
    /// Return from the function.
    Return,
    /// Call to a function that never returns: no successor.
    Diverge,
}

/// A basic block: instructions, then a terminator.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicBlock {
    /// Instructions, in execution order.
    pub instrs: Vec<Instr>,
    /// Terminator.
    pub terminator: Terminator,
    /// Is it the header of a loop.
    pub loop_header: bool,
    /// Codespan of the construct that created the block.
    pub span: Span,
}

impl BasicBlock {
    /// Creates an empty block.
    pub fn new(span: Span) -> Self {
        Self {
            instrs: vec![],
            terminator: Terminator::Return,
            loop_header: false,
            span,
        }
    }

    /// Does the block end with a diverging call, so that nothing after it
    /// is ever executed?
    pub fn is_unreachable_after(&self) -> bool {
        self.terminator == Terminator::Diverge
    }
}

impl fmt::Debug for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.instrs {
            writeln!(f, "{:?}", instr.kind)?;
        }
        write!(f, "{:?}", self.terminator)
    }
}
