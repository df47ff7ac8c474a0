//! CFG production.
//!
//! Lowers typed function bodies into basic blocks. Every lexical scope exit
//! becomes explicit: bindings get a `ScopeEnd`, borrow scopes an `EndAccess`.

use Branch::*;

use crate::codes::STRUCTURAL_CONTROL_FLOW_ERROR;
use crate::mir::*;
use crate::reporter::Diagnostic;
use crate::tast::{self, Convention, Expr, ExprKind, Stmt, StmtKind};
use crate::Context;

/// Marker for a function whose lowering was aborted by a structural error.
///
/// The error is already reported.
struct Aborted;

/// Kind of lexical frame.
#[derive(Debug, Clone, Copy)]
enum FrameKind {
    /// Function body, holding its parameters.
    Fun,
    /// Plain lexical scope.
    Block,
    /// Loop, with the targets of `continue` and `break`.
    Loop {
        /// Loop header.
        header: CfgLabel,
        /// Loop exit.
        exit: CfgLabel,
    },
    /// Child task body. Jumps cannot cross it.
    Spawn,
}

/// A lexical frame.
#[derive(Debug)]
struct Frame {
    /// Kind of frame.
    kind: FrameKind,
    /// Bindings declared in that frame, in declaration order.
    bindings: Vec<BindingId>,
    /// Borrow scopes held by that frame, in opening order.
    accesses: Vec<AccessId>,
}

impl Frame {
    /// Creates an empty frame.
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            bindings: vec![],
            accesses: vec![],
        }
    }
}

/// Typed AST to MIR transformer.
pub(crate) struct MIRer<'t, 'ctx> {
    /// Checker context.
    ctx: &'t Context<'ctx>,
    /// The WIP CFG for the current function.
    cfg: Cfg<BasicBlock>,
    /// Block being filled.
    current: CfgLabel,
    /// Stack of open lexical frames, innermost last.
    frames: Vec<Frame>,
    /// Fresh access identifier counter.
    access_counter: usize,
}

impl<'t, 'ctx> MIRer<'t, 'ctx> {
    /// Creates a new MIR processor.
    pub fn new(ctx: &'t Context<'ctx>) -> Self {
        Self {
            ctx,
            cfg: Cfg::default(),
            current: CfgLabel::default(),
            frames: vec![],
            access_counter: 0,
        }
    }

    /// Computes the MIR output of a typed program using that processor.
    ///
    /// Functions with a structural error are left out.
    pub fn gen_mir(&mut self, p: tast::Program) -> Program {
        let funs = p
            .funs
            .into_iter()
            .filter_map(|f| self.visit_fun(f))
            .collect();
        Program {
            decls: p.decls,
            funs,
        }
    }

    /// Creates a new empty block.
    #[must_use]
    fn fresh_block(&mut self, span: Span) -> CfgLabel {
        self.cfg.add_node(BasicBlock::new(span))
    }

    /// Appends an instruction to the current block.
    fn push(&mut self, kind: InstrKind, span: Span) {
        let current = self.current;
        self.cfg[&current].instrs.push(Instr { kind, span });
    }

    /// Ends the current block.
    fn terminate(
        &mut self,
        terminator: Terminator,
        targets: impl IntoIterator<Item = (Branch, CfgLabel)>,
    ) {
        let current = self.current;
        self.cfg[&current].terminator = terminator;
        for (branch, target) in targets {
            self.cfg.add_edge(current, target, branch);
        }
    }

    /// Ends the current block with a jump to `target`.
    fn goto(&mut self, target: CfgLabel) {
        self.terminate(Terminator::Goto, [(DefaultB, target)]);
    }

    /// Ends the current block, and continues in a block that no edge reaches.
    ///
    /// It is pruned at the end.
    fn dead_end(&mut self, terminator: Terminator, span: Span) {
        self.terminate(terminator, []);
        self.current = self.fresh_block(span);
    }

    /// Innermost frame.
    fn frame(&mut self) -> &mut Frame {
        self.frames
            .last_mut()
            .expect("lowering outside of any frame")
    }

    /// Opens a borrow scope over `operand`.
    fn begin_access(&mut self, operand: Operand, span: Span) -> AccessId {
        let id = AccessId(self.access_counter);
        self.access_counter += 1;
        self.push(InstrKind::BeginAccess { id, operand }, span);
        id
    }

    /// Emits the cleanups of the frames from `depth` (included) to the
    /// innermost one, without popping them.
    fn cleanups(&mut self, depth: usize, span: Span) {
        let mut instrs = vec![];
        for frame in self.frames[depth..].iter().rev() {
            instrs.extend(frame.bindings.iter().rev().map(|b| InstrKind::ScopeEnd(*b)));
            instrs.extend(frame.accesses.iter().rev().map(|a| InstrKind::EndAccess(*a)));
        }
        for instr in instrs {
            self.push(instr, span);
        }
    }

    /// Runs `f` in a new frame, emitting its cleanups when it falls through.
    fn in_frame<T>(
        &mut self,
        kind: FrameKind,
        span: Span,
        f: impl FnOnce(&mut Self) -> Result<T, Aborted>,
    ) -> Result<T, Aborted> {
        self.frames.push(Frame::new(kind));
        let res = f(self);
        if res.is_ok() {
            let depth = self.frames.len() - 1;
            self.cleanups(depth, span);
        }
        self.frames.pop();
        res
    }

    /// Reports a structural error, aborting the function.
    fn structural(&self, message: impl Into<String>, span: Span) -> Aborted {
        self.ctx.emit(
            Diagnostic::error()
                .with_code(STRUCTURAL_CONTROL_FLOW_ERROR)
                .with_message(message)
                .with_labels(vec![span.as_label()]),
        );
        Aborted
    }

    /// Visits a function.
    ///
    /// Returns `None` if the function has a structural error.
    fn visit_fun(&mut self, f: tast::Fun) -> Option<Fun> {
        self.cfg = Cfg::default();
        self.frames.clear();
        self.access_counter = 0;

        let entry_l = self.fresh_block(f.span);
        self.current = entry_l;

        let res = self.in_frame(FrameKind::Fun, f.body.span, |this| {
            for &param in &f.params {
                let span = f.bindings[param].span;
                this.push(InstrKind::Declare(param), span);
                this.push(InstrKind::Init(Place::whole(param, span)), span);
                this.frame().bindings.push(param);
            }
            this.visit_block(f.body, FrameKind::Block)
        });
        // Falling through the end of the body
        self.terminate(Terminator::Return, []);

        let mut body = std::mem::take(&mut self.cfg);
        res.ok()?;
        let pruned = body.retain_reachable(entry_l);
        verbose_println!(
            self.ctx,
            "  `{}`: {} block(s), {pruned} unreachable block(s) pruned",
            f.name,
            body.len()
        );
        Some(Fun {
            name: f.name,
            params: f.params,
            bindings: f.bindings,
            restrictions: f.restrictions,
            entry_l,
            body,
            span: f.span,
        })
    }

    /// Visits a block in a new frame of kind `kind`.
    fn visit_block(&mut self, b: tast::Block, kind: FrameKind) -> Result<(), Aborted> {
        self.in_frame(kind, b.span, |this| {
            b.stmts.into_iter().try_for_each(|s| this.visit_stmt(s))
        })
    }

    /// Visits a statement, appending its instructions to the current block.
    fn visit_stmt(&mut self, s: Stmt) -> Result<(), Aborted> {
        let span = s.span;
        match s.kind {
            StmtKind::DeclareS(binding, init) => {
                if let Some(init) = &init {
                    self.lower_value(init);
                }
                self.push(InstrKind::Declare(binding), span);
                self.frame().bindings.push(binding);
                if init.is_some() {
                    self.push(InstrKind::Init(Place::whole(binding, span)), span);
                }
            }
            StmtKind::AssignS(place, value) => {
                self.lower_value(&value);
                self.push(InstrKind::Init(place), span);
            }
            StmtKind::ExprS(e) => self.lower_value(&e),
            StmtKind::IfS { cond, then, els } => {
                self.lower_read(&cond);
                let then_l = self.fresh_block(then.span);
                let merge_l = self.fresh_block(span);
                let els_l = match &els {
                    Some(els) => self.fresh_block(els.span),
                    None => merge_l,
                };
                self.terminate(Terminator::Branch, [(TrueB, then_l), (FalseB, els_l)]);

                self.current = then_l;
                self.visit_block(then, FrameKind::Block)?;
                self.goto(merge_l);

                if let Some(els) = els {
                    self.current = els_l;
                    self.visit_block(els, FrameKind::Block)?;
                    self.goto(merge_l);
                }
                self.current = merge_l;
            }
            StmtKind::WhileS { cond, body } => {
                let (header_l, exit_l) = self.loop_header(span);
                self.lower_read(&cond);
                let body_l = self.fresh_block(body.span);
                self.terminate(Terminator::Branch, [(TrueB, body_l), (FalseB, exit_l)]);
                self.current = body_l;
                self.visit_loop_body(body, header_l, exit_l)?;
            }
            StmtKind::LoopS(body) => {
                let (header_l, exit_l) = self.loop_header(span);
                self.visit_loop_body(body, header_l, exit_l)?;
            }
            StmtKind::MatchS {
                scrutinee,
                consuming,
                arms,
            } => self.visit_match(scrutinee, consuming, arms, span)?,
            StmtKind::SpawnS(body) => self.visit_block(body, FrameKind::Spawn)?,
            StmtKind::BlockS(body) => self.visit_block(body, FrameKind::Block)?,
            StmtKind::BreakS => {
                let (depth, _, exit) = self.innermost_loop("break", span)?;
                self.cleanups(depth + 1, span);
                self.goto(exit);
                self.current = self.fresh_block(span);
            }
            StmtKind::ContinueS => {
                let (depth, header, _) = self.innermost_loop("continue", span)?;
                self.cleanups(depth + 1, span);
                self.goto(header);
                self.current = self.fresh_block(span);
            }
            StmtKind::ReturnS(value) => {
                if self
                    .frames
                    .iter()
                    .any(|frame| matches!(frame.kind, FrameKind::Spawn))
                {
                    return Err(self.structural("`return` cannot escape a `spawn` body", span));
                }
                if let Some(value) = &value {
                    self.lower_value(value);
                }
                self.cleanups(0, span);
                self.dead_end(Terminator::Return, span);
            }
        }
        Ok(())
    }

    /// Starts a loop: jumps to a new header block, and creates the exit
    /// block. Lowering continues in the header.
    fn loop_header(&mut self, span: Span) -> (CfgLabel, CfgLabel) {
        let header_l = self.fresh_block(span);
        self.cfg[&header_l].loop_header = true;
        let exit_l = self.fresh_block(span);
        self.goto(header_l);
        self.current = header_l;
        (header_l, exit_l)
    }

    /// Visits a loop body, which jumps back to the header. Lowering continues
    /// at the loop exit.
    fn visit_loop_body(
        &mut self,
        body: tast::Block,
        header_l: CfgLabel,
        exit_l: CfgLabel,
    ) -> Result<(), Aborted> {
        let kind = FrameKind::Loop {
            header: header_l,
            exit: exit_l,
        };
        self.in_frame(kind, body.span, |this| {
            this.visit_block(body, FrameKind::Block)
        })?;
        self.goto(header_l);
        self.current = exit_l;
        Ok(())
    }

    /// Finds the innermost loop, returning its frame depth, header and exit.
    ///
    /// Reports a structural error if there is none, or if reaching it would
    /// escape a `spawn` body.
    fn innermost_loop(
        &self,
        jump: &str,
        span: Span,
    ) -> Result<(usize, CfgLabel, CfgLabel), Aborted> {
        for (depth, frame) in self.frames.iter().enumerate().rev() {
            match frame.kind {
                FrameKind::Loop { header, exit } => return Ok((depth, header, exit)),
                FrameKind::Spawn => {
                    return Err(self.structural(
                        format!("`{jump}` cannot escape a `spawn` body"),
                        span,
                    ))
                }
                FrameKind::Fun | FrameKind::Block => {}
            }
        }
        Err(self.structural(format!("`{jump}` outside of a loop"), span))
    }

    /// Visits a `match`.
    ///
    /// A consuming `match` consumes its scrutinee before switching. A
    /// borrowing one holds a borrow of it until the arms merge back.
    fn visit_match(
        &mut self,
        scrutinee: Place,
        consuming: bool,
        arms: Vec<tast::Arm>,
        span: Span,
    ) -> Result<(), Aborted> {
        let merge_l = self.fresh_block(span);
        self.in_frame(FrameKind::Block, span, |this| {
            if consuming {
                let operand = Operand {
                    place: scrutinee,
                    convention: Convention::Consuming,
                };
                this.push(InstrKind::Use(operand), scrutinee.span);
            } else {
                let operand = Operand {
                    place: scrutinee,
                    convention: Convention::Borrowing,
                };
                let access = this.begin_access(operand, scrutinee.span);
                this.frame().accesses.push(access);
            }

            let arm_ls: Vec<_> = arms.iter().map(|arm| this.fresh_block(arm.span)).collect();
            this.terminate(
                Terminator::Switch,
                arm_ls.iter().enumerate().map(|(i, l)| (CaseB(i), *l)),
            );

            for (arm, arm_l) in arms.into_iter().zip(arm_ls) {
                this.current = arm_l;
                let tast::Arm {
                    bindings,
                    body,
                    span: arm_span,
                    ..
                } = arm;
                this.in_frame(FrameKind::Block, body.span, |this| {
                    for binding in bindings {
                        this.push(InstrKind::Declare(binding), arm_span);
                        this.push(InstrKind::Init(Place::whole(binding, arm_span)), arm_span);
                        this.frame().bindings.push(binding);
                    }
                    this.visit_block(body, FrameKind::Block)
                })?;
                this.goto(merge_l);
            }
            // Borrow scopes end after the merge
            this.current = merge_l;
            Ok(())
        })
    }

    /// Lowers an expression whose value is consumed.
    fn lower_value(&mut self, e: &Expr) {
        self.lower_expr(e, Convention::Consuming)
    }

    /// Lowers an expression whose value is only read.
    fn lower_read(&mut self, e: &Expr) {
        self.lower_expr(e, Convention::Borrowing)
    }

    /// Lowers an expression used with `convention`.
    fn lower_expr(&mut self, e: &Expr, convention: Convention) {
        match &e.kind {
            ExprKind::ConstE => {}
            ExprKind::PlaceE(place) => {
                let operand = Operand {
                    place: *place,
                    convention,
                };
                self.push(InstrKind::Use(operand), e.span);
            }
            ExprKind::CallE {
                fun,
                args,
                diverging,
            } => self.lower_call(fun, args, *diverging, e.span),
            ExprKind::AggregateE(items) => {
                for item in items {
                    self.lower_value(item);
                }
            }
        }
    }

    /// Lowers a call.
    ///
    /// Place arguments passed `borrowing` or `inout` are accessed for the
    /// whole duration of the call: their borrow scope opens when the argument
    /// is evaluated, and closes after the call returns.
    fn lower_call(&mut self, fun: &str, args: &[(Convention, Expr)], diverging: bool, span: Span) {
        let mut accesses = vec![];
        for (convention, arg) in args {
            match (convention, &arg.kind) {
                (Convention::Borrowing | Convention::Inout, ExprKind::PlaceE(place)) => {
                    let operand = Operand {
                        place: *place,
                        convention: *convention,
                    };
                    accesses.push(self.begin_access(operand, arg.span));
                }
                _ => self.lower_expr(arg, *convention),
            }
        }
        self.push(InstrKind::Call(fun.to_string()), span);
        if diverging {
            // Nothing after the call is ever executed
            self.dead_end(Terminator::Diverge, span);
        } else {
            for access in accesses.into_iter().rev() {
                self.push(InstrKind::EndAccess(access), span);
            }
        }
    }
}
