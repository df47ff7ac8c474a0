//! Typing.
//!
//! Resolves names to bindings and declarations, types expressions, attaches
//! its convention to every operand, and submits every generic application
//! site to the generic instantiation gate.

use std::collections::{HashMap, HashSet};

use ordinal::Ordinal;

use crate::ast::{self, TyKind};
use crate::codes::*;
use crate::generics::gate::{self, Site};
use crate::generics::Capabilities;
use crate::reporter::Diagnostic;
use crate::scoped::Scoped;
use crate::tast::decl::substitution;
use crate::tast::*;
use crate::utils::{boxed, label_mismatches};
use crate::Context;

/// Names of the builtin types.
const BUILTIN_TYS: [&str; 3] = ["Int", "Bool", "Array"];

/// A typer that will type-check some program by visiting it.
pub(crate) struct Typer<'t, 'ctx> {
    /// Checker context.
    ctx: &'t mut Context<'ctx>,
    /// Declarations resolved so far.
    decls: Decls,
    /// Generic type parameters in scope, with their capabilities.
    ty_params: HashMap<String, Capabilities>,
    /// Variables in scope.
    scopes: Scoped<String, BindingId>,
    /// Bindings of the function being typed.
    bindings: Bindings,
    /// `let` bindings declared without initializer, which can be assigned
    /// once.
    deferred: HashSet<BindingId>,
    /// Return type of the function being typed.
    ret_ty: Ty,
    /// Was there any error other than a generic restriction.
    frontend_errors: bool,
    /// Generic restrictions of the function being declared or typed.
    restrictions: Option<Vec<Diagnostic>>,
    /// Generic restrictions of each function signature, until its body is
    /// typed.
    signature_restrictions: HashMap<String, Vec<Diagnostic>>,
}

impl<'t, 'ctx> Typer<'t, 'ctx> {
    /// Creates a new typer.
    pub fn new(ctx: &'t mut Context<'ctx>) -> Self {
        Self {
            ctx,
            decls: Decls::default(),
            ty_params: HashMap::new(),
            scopes: Scoped::default(),
            bindings: Bindings::default(),
            deferred: HashSet::new(),
            ret_ty: Ty::UnitT,
            frontend_errors: false,
            restrictions: None,
            signature_restrictions: HashMap::new(),
        }
    }

    /// Did typing report errors that prevent any further analysis?
    ///
    /// Generic restrictions do not: the program is still well-formed enough
    /// for the linearity checker to find independent errors.
    pub fn has_frontend_errors(&self) -> bool {
        self.frontend_errors
    }

    /// Type-checks a program, with the declarations of the `prelude` in scope.
    pub fn check(&mut self, prelude: ast::Program, p: ast::Program) -> Program {
        let mut all = prelude;
        all.extend(p);
        let ast::Program {
            structs,
            enums,
            protocols,
            funs,
            top_level,
        } = all;

        for protocol in &protocols {
            self.declare_protocol(protocol);
        }
        self.declare_nominals(&structs, &enums);
        for s in &structs {
            self.resolve_struct(s);
        }
        for e in &enums {
            self.resolve_enum(e);
        }
        for f in &funs {
            self.declare_fun(f);
        }

        let mut typed_funs: Vec<Fun> = funs
            .into_iter()
            .filter_map(|f| self.visit_fun(f))
            .collect();
        if !top_level.is_empty() {
            typed_funs.push(self.visit_top_level(top_level));
        }

        Program {
            decls: std::mem::take(&mut self.decls),
            funs: typed_funs,
        }
    }

    /// Reports a frontend error.
    fn error(&mut self, code: &str, message: impl Into<String>, span: Span) {
        self.frontend_errors = true;
        self.ctx.emit(
            Diagnostic::error()
                .with_code(code)
                .with_message(message)
                .with_labels(vec![span.as_label()]),
        );
    }

    /// Submits a generic application to the gate, reporting any rejection.
    fn gate(&mut self, site: Site, requirement: Capabilities, ty: &Ty, span: Span, in_cast: bool) {
        let provided = self.decls.provided(ty);
        if let Err(rejection) = gate::check(site, requirement, ty, provided, span) {
            let rejection = if in_cast {
                rejection.in_cast()
            } else {
                rejection
            };
            let diagnostic = rejection.to_diagnostic();
            if let Some(restrictions) = &mut self.restrictions {
                restrictions.push(diagnostic.clone());
            }
            self.ctx.emit(diagnostic);
        }
    }

    /// Runs `f` in a new variable scope.
    fn in_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.push_scope();
        let res = f(self);
        // A scope was pushed above, so this pop leaves at least one scope
        let _ = self.scopes.pop_scope();
        res
    }

    /// Sets the generic type parameters in scope.
    fn set_ty_params(&mut self, ty_params: &[TyParam]) {
        self.ty_params = ty_params
            .iter()
            .map(|param| (param.name.clone(), param.caps))
            .collect();
    }

    /// Registers a protocol.
    fn declare_protocol(&mut self, protocol: &ast::Protocol) {
        self.decls.protocols.insert(
            protocol.name.clone(),
            ProtocolDecl {
                name: protocol.name.clone(),
                caps: protocol.caps,
                assoc_tys: protocol
                    .assoc_tys
                    .iter()
                    .map(|assoc| (assoc.name.clone(), assoc.caps))
                    .collect(),
            },
        );
    }

    /// Registers the names, generic parameters and capabilities of nominal
    /// types, so that their members can refer to each other.
    fn declare_nominals(&mut self, structs: &[ast::Struct], enums: &[ast::Enum]) {
        for s in structs {
            self.decls.structs.insert(
                s.name.clone(),
                StructDecl {
                    name: s.name.clone(),
                    ty_params: s.ty_params.clone(),
                    caps: s.caps,
                    conformances: s
                        .conformances
                        .iter()
                        .map(|conformance| conformance.protocol.clone())
                        .collect(),
                    fields: vec![],
                    span: s.span,
                },
            );
        }
        for e in enums {
            self.decls.enums.insert(
                e.name.clone(),
                EnumDecl {
                    name: e.name.clone(),
                    ty_params: e.ty_params.clone(),
                    caps: e.caps,
                    conformances: e
                        .conformances
                        .iter()
                        .map(|conformance| conformance.protocol.clone())
                        .collect(),
                    cases: vec![],
                    span: e.span,
                },
            );
        }
    }

    /// The type of `Self` inside a generic nominal declaration.
    fn self_ty(name: &str, ty_params: &[TyParam], is_struct: bool) -> Ty {
        let args = ty_params
            .iter()
            .map(|param| Ty::ParamT(param.name.clone(), param.caps))
            .collect();
        if is_struct {
            Ty::StructT(name.to_string(), args)
        } else {
            Ty::EnumT(name.to_string(), args)
        }
    }

    /// Resolves the fields and conformances of a structure.
    fn resolve_struct(&mut self, s: &ast::Struct) {
        self.set_ty_params(&s.ty_params);
        let fields: Vec<_> = s
            .fields
            .iter()
            .map(|(name, ty)| (name.clone(), self.resolve_ty(ty, false)))
            .collect();
        if let Some(decl) = self.decls.structs.get_mut(&s.name) {
            decl.fields = fields;
        }
        let self_ty = Self::self_ty(&s.name, &s.ty_params, true);
        for conformance in &s.conformances {
            self.check_conformance(&self_ty, conformance);
        }
    }

    /// Resolves the cases and conformances of an enumeration.
    fn resolve_enum(&mut self, e: &ast::Enum) {
        self.set_ty_params(&e.ty_params);
        let cases: Vec<_> = e
            .cases
            .iter()
            .map(|case| {
                let payload = case
                    .payload
                    .iter()
                    .map(|ty| self.resolve_ty(ty, false))
                    .collect();
                (case.name.clone(), payload)
            })
            .collect();
        if let Some(decl) = self.decls.enums.get_mut(&e.name) {
            decl.cases = cases;
        }
        let self_ty = Self::self_ty(&e.name, &e.ty_params, false);
        for conformance in &e.conformances {
            self.check_conformance(&self_ty, conformance);
        }
    }

    /// Checks a protocol conformance and its associated type bindings.
    fn check_conformance(&mut self, self_ty: &Ty, conformance: &ast::Conformance) {
        let Some(protocol) = self.decls.protocols.get(&conformance.protocol).cloned() else {
            self.error(
                UNKNOWN_TYPE_ERROR,
                format!("unknown protocol `{}`", conformance.protocol),
                conformance.span,
            );
            return;
        };
        self.gate(
            Site::Conformance {
                protocol: protocol.name.clone(),
            },
            protocol.caps,
            self_ty,
            conformance.span,
            false,
        );
        for (name, ty) in &conformance.bindings {
            let bound = self.resolve_ty(ty, false);
            match protocol.assoc_tys.iter().find(|(assoc, _)| assoc == name) {
                Some((_, caps)) => self.gate(
                    Site::AssociatedType {
                        protocol: protocol.name.clone(),
                        name: name.clone(),
                    },
                    *caps,
                    &bound,
                    ty.span,
                    false,
                ),
                None => self.error(
                    UNKNOWN_TYPE_ERROR,
                    format!(
                        "protocol `{}` has no associated type `{name}`",
                        protocol.name
                    ),
                    ty.span,
                ),
            }
        }
    }

    /// Resolves and registers the signature of a function.
    fn declare_fun(&mut self, f: &ast::Fun) {
        self.set_ty_params(&f.ty_params);
        self.restrictions = Some(vec![]);
        let params = f
            .params
            .iter()
            .map(|param| ParamSig {
                name: param.name.clone(),
                convention: param.convention,
                ty: self.resolve_ty(&param.ty, false),
            })
            .collect();
        let ret_ty = match &f.ret_ty {
            Some(ty) => self.resolve_ty(ty, false),
            None => Ty::UnitT,
        };
        self.decls.funs.insert(
            f.name.clone(),
            FunSig {
                name: f.name.clone(),
                ty_params: f.ty_params.clone(),
                params,
                ret_ty,
            },
        );
        let restrictions = self.restrictions.take().unwrap_or_default();
        self.signature_restrictions.insert(f.name.clone(), restrictions);
    }

    /// Resolves a type expression.
    ///
    /// Every generic application in it goes through the gate. Inside the
    /// target type of a dynamic cast (`in_cast`), rejections note that the
    /// cast always fails.
    fn resolve_ty(&mut self, ty: &ast::TyUse, in_cast: bool) -> Ty {
        match &ty.kind {
            TyKind::NeverT => Ty::NeverT,
            TyKind::UnitT => Ty::UnitT,
            TyKind::ArrayT(item) => {
                let item_ty = self.resolve_ty(item, in_cast);
                self.gate(Site::Collection, Capabilities::ALL, &item_ty, item.span, in_cast);
                Ty::ArrayT(boxed(item_ty))
            }
            TyKind::AnyT { protocol, caps } => {
                if let Some(protocol) = protocol {
                    if !self.decls.protocols.contains_key(protocol) {
                        self.error(
                            UNKNOWN_TYPE_ERROR,
                            format!("unknown protocol `{protocol}`"),
                            ty.span,
                        );
                    }
                }
                Ty::AnyT {
                    protocol: protocol.clone(),
                    caps: *caps,
                }
            }
            TyKind::NamedT(name, args) => self.resolve_named_ty(name, args, ty.span, in_cast),
        }
    }

    /// Resolves a named type with its arguments.
    fn resolve_named_ty(
        &mut self,
        name: &str,
        args: &[ast::TyUse],
        span: Span,
        in_cast: bool,
    ) -> Ty {
        let params = if let Some(caps) = self.ty_params.get(name) {
            let caps = *caps;
            if !self.check_ty_arity(name, 0, args.len(), span) {
                return Ty::ErrorT;
            }
            return Ty::ParamT(name.to_string(), caps);
        } else if BUILTIN_TYS.contains(&name) {
            let arity = usize::from(name == "Array");
            if !self.check_ty_arity(name, arity, args.len(), span) {
                return Ty::ErrorT;
            }
            match name {
                "Int" => return Ty::IntT,
                "Bool" => return Ty::BoolT,
                _ => {
                    let item = self.resolve_ty(&args[0], in_cast);
                    self.gate(Site::Collection, Capabilities::ALL, &item, args[0].span, in_cast);
                    return Ty::ArrayT(boxed(item));
                }
            }
        } else if let Some(decl) = self.decls.structs.get(name) {
            decl.ty_params.clone()
        } else if let Some(decl) = self.decls.enums.get(name) {
            decl.ty_params.clone()
        } else {
            self.error(UNKNOWN_TYPE_ERROR, format!("unknown type `{name}`"), span);
            return Ty::ErrorT;
        };

        if !self.check_ty_arity(name, params.len(), args.len(), span) {
            return Ty::ErrorT;
        }
        let args = params
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                let arg_ty = self.resolve_ty(arg, in_cast);
                self.gate(
                    Site::TypeArg {
                        generic: name.to_string(),
                        param: param.name.clone(),
                    },
                    param.caps,
                    &arg_ty,
                    arg.span,
                    in_cast,
                );
                arg_ty
            })
            .collect();
        if self.decls.structs.contains_key(name) {
            Ty::StructT(name.to_string(), args)
        } else {
            Ty::EnumT(name.to_string(), args)
        }
    }

    /// Checks the number of type arguments of a named type.
    fn check_ty_arity(&mut self, name: &str, expected: usize, found: usize, span: Span) -> bool {
        if expected == found {
            true
        } else {
            self.error(
                ARITY_ERROR,
                format!("type `{name}` expects {expected} type argument(s), found {found}"),
                span,
            );
            false
        }
    }

    /// Declares a new binding in the current scope.
    fn add_binding(
        &mut self,
        name: String,
        ty: Ty,
        mutable: bool,
        ownership: Ownership,
        span: Span,
    ) -> BindingId {
        let caps = self.decls.provided(&ty);
        let fields = self
            .decls
            .fields_of(&ty)
            .unwrap_or_default()
            .into_iter()
            .map(|(name, ty)| Field {
                copyable: self.decls.provided(&ty).copyable,
                name,
                ty,
            })
            .collect();
        let id = self.bindings.push(|id| Binding {
            id,
            name: name.clone(),
            ty,
            copyable: caps.copyable,
            escapable: caps.escapable,
            mutable,
            ownership,
            fields,
            span,
        });
        self.scopes.insert(name, id);
        id
    }

    /// Prepares the typer for a new function body.
    fn enter_fun(&mut self, ty_params: &[TyParam], ret_ty: Ty) {
        self.set_ty_params(ty_params);
        self.scopes = Scoped::default();
        self.bindings = Bindings::default();
        self.deferred = HashSet::new();
        self.ret_ty = ret_ty;
        self.restrictions = Some(vec![]);
    }

    /// Types a function. Declarations without body are skipped.
    fn visit_fun(&mut self, f: ast::Fun) -> Option<Fun> {
        let body = f.body?;
        let sig = self.decls.funs.get(&f.name)?.clone();
        self.enter_fun(&f.ty_params, sig.ret_ty.clone());
        let signature = self.signature_restrictions.remove(&f.name);
        self.restrictions = Some(signature.unwrap_or_default());

        let params = f
            .params
            .iter()
            .zip(sig.params)
            .map(|(param, param_sig)| {
                let ownership = match param_sig.convention {
                    Convention::Consuming => Ownership::Owned,
                    Convention::Borrowing => Ownership::Borrowed,
                    Convention::Inout => Ownership::Inout,
                };
                self.add_binding(
                    param_sig.name,
                    param_sig.ty,
                    ownership == Ownership::Inout,
                    ownership,
                    param.span,
                )
            })
            .collect();

        let body = self.visit_block(body);
        Some(Fun {
            name: f.name,
            params,
            ret_ty: sig.ret_ty,
            body,
            bindings: std::mem::take(&mut self.bindings),
            restrictions: self.restrictions.take().unwrap_or_default(),
            span: f.span,
        })
    }

    /// Types the top-level statements, as a function of their own.
    fn visit_top_level(&mut self, stmts: Vec<ast::Stmt>) -> Fun {
        self.enter_fun(&[], Ty::UnitT);
        let span = stmts
            .iter()
            .map(|stmt| stmt.span)
            .reduce(Span::merge)
            .unwrap_or_default();
        let body = self.visit_block(ast::Block { stmts, span });
        Fun {
            name: TOP_LEVEL.to_string(),
            params: vec![],
            ret_ty: Ty::UnitT,
            body,
            bindings: std::mem::take(&mut self.bindings),
            restrictions: self.restrictions.take().unwrap_or_default(),
            span,
        }
    }

    /// Types a block, in its own scope.
    fn visit_block(&mut self, block: ast::Block) -> Block {
        self.in_scope(|typer| Block {
            stmts: block
                .stmts
                .into_iter()
                .map(|stmt| typer.visit_stmt(stmt))
                .collect(),
            span: block.span,
        })
    }

    /// Checks that a value of type `e.ty` can be used where `expected` is
    /// expected.
    ///
    /// Using a value where an existential is expected boxes it, which goes
    /// through the gate.
    fn coerce(&mut self, expected: &Ty, e: &Expr, what: impl FnOnce() -> String) {
        if !expected.accepts(&e.ty) {
            self.error(
                TYPE_MISMATCH_ERROR,
                format!("mismatched types for {}: expected `{expected}`, found `{}`", what(), e.ty),
                e.span,
            );
            return;
        }
        if let Ty::AnyT { protocol, caps } = expected {
            if !matches!(e.ty, Ty::AnyT { .. }) {
                self.check_boxing(&e.ty, protocol.as_deref(), *caps, e.span);
            }
        }
    }

    /// Checks the boxing of a value of type `ty` into an existential.
    fn check_boxing(&mut self, ty: &Ty, protocol: Option<&str>, caps: Capabilities, span: Span) {
        self.gate(Site::Existential, caps, ty, span, false);
        let Some(protocol) = protocol else {
            return;
        };
        let conforms = match ty {
            Ty::StructT(name, _) => self
                .decls
                .structs
                .get(name)
                .map_or(true, |decl| decl.conformances.iter().any(|p| p == protocol)),
            Ty::EnumT(name, _) => self
                .decls
                .enums
                .get(name)
                .map_or(true, |decl| decl.conformances.iter().any(|p| p == protocol)),
            Ty::ParamT(..) | Ty::ErrorT | Ty::NeverT => true,
            Ty::AnyT { protocol: boxed, .. } => boxed.as_deref() == Some(protocol),
            _ => false,
        };
        if !conforms {
            self.error(
                TYPE_MISMATCH_ERROR,
                format!("type `{ty}` does not conform to protocol `{protocol}`"),
                span,
            );
        }
    }

    /// Types a statement.
    fn visit_stmt(&mut self, stmt: ast::Stmt) -> Stmt {
        let span = stmt.span;
        let kind = match stmt.kind {
            ast::StmtKind::Declare {
                mutable,
                name,
                ty,
                init,
            } => {
                let annotation = ty.map(|ty| self.resolve_ty(&ty, false));
                // The initializer cannot refer to the declared binding
                let init = init.map(|init| self.visit_expr(init));
                let ty = match (annotation, &init) {
                    (Some(annotation), Some(init)) => {
                        self.coerce(&annotation, init, || format!("`{name}`"));
                        annotation
                    }
                    (Some(annotation), None) => annotation,
                    (None, Some(init)) => init.ty.clone(),
                    (None, None) => {
                        self.error(
                            TYPE_MISMATCH_ERROR,
                            format!("type annotation needed for `{name}`"),
                            span,
                        );
                        Ty::ErrorT
                    }
                };
                let deferred = init.is_none() && !mutable;
                let id = self.add_binding(name, ty, mutable, Ownership::Owned, span);
                if deferred {
                    self.deferred.insert(id);
                }
                StmtKind::DeclareS(id, init)
            }
            ast::StmtKind::Assign(place, value) => {
                let value = self.visit_expr(value);
                match self.visit_place(place) {
                    Some((place, ty)) => {
                        let binding = &self.bindings[place.binding];
                        if !binding.mutable && !self.deferred.remove(&place.binding) {
                            let message =
                                format!("cannot assign to immutable binding `{}`", binding.name);
                            self.error(IMMUTABLE_ASSIGN_ERROR, message, place.span);
                        }
                        self.coerce(&ty, &value, || "the assigned value".to_string());
                        StmtKind::AssignS(place, value)
                    }
                    None => StmtKind::ExprS(value),
                }
            }
            ast::StmtKind::ExprS(e) => StmtKind::ExprS(self.visit_expr(e)),
            ast::StmtKind::If { cond, then, els } => {
                let cond = self.visit_cond(cond);
                let then = self.visit_block(then);
                let els = els.map(|els| self.visit_block(els));
                StmtKind::IfS { cond, then, els }
            }
            ast::StmtKind::While { cond, body } => {
                let cond = self.visit_cond(cond);
                let body = self.visit_block(body);
                StmtKind::WhileS { cond, body }
            }
            ast::StmtKind::Loop(body) => StmtKind::LoopS(self.visit_block(body)),
            ast::StmtKind::Match {
                consuming,
                scrutinee,
                arms,
            } => self.visit_match(consuming, scrutinee, arms, span),
            ast::StmtKind::Spawn(body) => StmtKind::SpawnS(self.visit_block(body)),
            ast::StmtKind::BlockS(block) => StmtKind::BlockS(self.visit_block(block)),
            ast::StmtKind::Break => StmtKind::BreakS,
            ast::StmtKind::Continue => StmtKind::ContinueS,
            ast::StmtKind::Return(value) => {
                let ret_ty = self.ret_ty.clone();
                match value {
                    Some(value) => {
                        let value = self.visit_expr(value);
                        self.coerce(&ret_ty, &value, || "the returned value".to_string());
                        StmtKind::ReturnS(Some(value))
                    }
                    None => {
                        if !ret_ty.accepts(&Ty::UnitT) {
                            self.error(
                                TYPE_MISMATCH_ERROR,
                                format!("missing return value of type `{ret_ty}`"),
                                span,
                            );
                        }
                        StmtKind::ReturnS(None)
                    }
                }
            }
        };
        Stmt { kind, span }
    }

    /// Types a condition.
    fn visit_cond(&mut self, cond: ast::Expr) -> Expr {
        let cond = self.visit_expr(cond);
        self.coerce(&Ty::BoolT, &cond, || "the condition".to_string());
        cond
    }

    /// Types a `match` statement.
    fn visit_match(
        &mut self,
        consuming: bool,
        scrutinee: ast::Place,
        arms: Vec<ast::Arm>,
        span: Span,
    ) -> StmtKind {
        let Some((scrutinee, ty)) = self.visit_place(scrutinee) else {
            return StmtKind::BlockS(Block::default());
        };
        let cases = match &ty {
            Ty::ErrorT => None,
            ty => {
                let cases = self.decls.cases_of(ty);
                if cases.is_none() {
                    self.error(
                        TYPE_MISMATCH_ERROR,
                        format!("cannot match on a value of non-enumeration type `{ty}`"),
                        scrutinee.span,
                    );
                }
                cases
            }
        };

        let ownership = if consuming {
            Ownership::Owned
        } else {
            Ownership::Borrowed
        };
        let mut covered = HashSet::new();
        let arms = arms
            .into_iter()
            .map(|arm| {
                let case = cases.as_ref().and_then(|cases| {
                    let case = cases.iter().position(|(name, _)| *name == arm.case);
                    if case.is_none() {
                        self.error(
                            UNKNOWN_CASE_ERROR,
                            format!("no case `{}` in `{ty}`", arm.case),
                            arm.span,
                        );
                    }
                    case
                });
                let payload = match (case, &cases) {
                    (Some(case), Some(cases)) => {
                        covered.insert(case);
                        let payload = cases[case].1.clone();
                        if payload.len() != arm.bindings.len() {
                            self.error(
                                ARITY_ERROR,
                                format!(
                                    "case `{}` has {} payload value(s), found {} binding(s)",
                                    arm.case,
                                    payload.len(),
                                    arm.bindings.len()
                                ),
                                arm.span,
                            );
                        }
                        payload
                    }
                    _ => vec![],
                };
                self.in_scope(|typer| {
                    let bindings = arm
                        .bindings
                        .into_iter()
                        .enumerate()
                        .map(|(i, (name, span))| {
                            let ty = payload.get(i).cloned().unwrap_or(Ty::ErrorT);
                            typer.add_binding(name, ty, false, ownership, span)
                        })
                        .collect();
                    Arm {
                        case: case.unwrap_or_default(),
                        bindings,
                        body: typer.visit_block(arm.body),
                        span: arm.span,
                    }
                })
            })
            .collect();

        if let Some(cases) = &cases {
            if let Some((missing, _)) = cases
                .iter()
                .enumerate()
                .find(|(i, _)| !covered.contains(i))
                .map(|(_, case)| case)
            {
                self.error(
                    UNKNOWN_CASE_ERROR,
                    format!("match is not exhaustive: case `{missing}` is not covered"),
                    span,
                );
            }
        }

        StmtKind::MatchS {
            scrutinee,
            consuming,
            arms,
        }
    }

    /// Resolves a place.
    ///
    /// Returns `None` if it does not resolve, the error being reported.
    fn visit_place(&mut self, place: ast::Place) -> Option<(Place, Ty)> {
        let Some(&binding) = self.scopes.get(&place.var) else {
            self.error(
                UNKNOWN_VAR_ERROR,
                format!("unknown variable `{}`", place.var),
                place.span,
            );
            return None;
        };
        let ty = self.bindings[binding].ty.clone();
        let Some(field) = place.field else {
            return Some((Place::whole(binding, place.span), ty));
        };
        if ty == Ty::ErrorT {
            return None;
        }
        match self.bindings[binding]
            .fields
            .iter()
            .position(|f| f.name == field)
        {
            Some(index) => {
                let field_ty = self.bindings[binding].fields[index].ty.clone();
                Some((
                    Place {
                        binding,
                        field: Some(index),
                        span: place.span,
                    },
                    field_ty,
                ))
            }
            None => {
                self.error(
                    FIELD_ACCESS_ERROR,
                    format!("no field `{field}` on type `{ty}`"),
                    place.span,
                );
                None
            }
        }
    }

    /// Types an expression.
    fn visit_expr(&mut self, e: ast::Expr) -> Expr {
        let span = e.span;
        match e.kind {
            ast::ExprKind::UnitE => Expr {
                kind: ExprKind::ConstE,
                ty: Ty::UnitT,
                span,
            },
            ast::ExprKind::BoolE(_) => Expr {
                kind: ExprKind::ConstE,
                ty: Ty::BoolT,
                span,
            },
            ast::ExprKind::IntE(_) => Expr {
                kind: ExprKind::ConstE,
                ty: Ty::IntT,
                span,
            },
            ast::ExprKind::PlaceE(place) => match self.visit_place(place) {
                Some((place, ty)) => Expr {
                    kind: ExprKind::PlaceE(place),
                    ty,
                    span,
                },
                None => Expr::error(span),
            },
            ast::ExprKind::CallE { name, args } => {
                if self.decls.structs.contains_key(&name) {
                    self.visit_struct_init(name, args, span)
                } else if self.decls.funs.contains_key(&name) {
                    self.visit_call(name, args, span)
                } else {
                    self.error(UNKNOWN_FUN_ERROR, format!("unknown function `{name}`"), span);
                    for arg in args {
                        self.visit_expr(arg.expr);
                    }
                    Expr::error(span)
                }
            }
            ast::ExprKind::EnumE { name, case, args } => self.visit_enum_ctor(name, case, args, span),
            ast::ExprKind::ArrayE(items) => {
                let items: Vec<_> = items.into_iter().map(|item| self.visit_expr(item)).collect();
                let item_ty = items
                    .iter()
                    .map(|item| &item.ty)
                    .find(|ty| !matches!(ty, Ty::ErrorT | Ty::NeverT))
                    .cloned()
                    .unwrap_or(Ty::ErrorT);
                for (i, item) in items.iter().enumerate() {
                    self.coerce(&item_ty, item, || {
                        format!("the {} array element", Ordinal(i + 1))
                    });
                }
                self.gate(Site::Collection, Capabilities::ALL, &item_ty, span, false);
                Expr {
                    kind: ExprKind::AggregateE(items),
                    ty: Ty::ArrayT(boxed(item_ty)),
                    span,
                }
            }
            ast::ExprKind::CastE { expr, forced, ty } => {
                let inner = self.visit_expr(*expr);
                let target = self.resolve_ty(&ty, forced);
                if !forced {
                    match &target {
                        Ty::AnyT { protocol, caps } => {
                            self.check_boxing(&inner.ty, protocol.as_deref(), *caps, span)
                        }
                        Ty::ErrorT => {}
                        target => self.error(
                            TYPE_MISMATCH_ERROR,
                            format!(
                                "`as` only boxes into existentials, found `{target}`: use `as!` for dynamic casts"
                            ),
                            ty.span,
                        ),
                    }
                }
                Expr {
                    kind: ExprKind::AggregateE(vec![inner]),
                    ty: target,
                    span,
                }
            }
        }
    }

    /// Types a structure initializer `S(f1: e1, ..)`.
    fn visit_struct_init(&mut self, name: String, args: Vec<ast::Arg>, span: Span) -> Expr {
        let Some(decl) = self.decls.structs.get(&name).cloned() else {
            return Expr::error(span);
        };
        let labels: Vec<&str> = args.iter().filter_map(|arg| arg.label.as_deref()).collect();
        let labeled = labels.len() == args.len() && !args.is_empty();
        let fields = decl.fields.iter().map(|(name, _)| name.as_str());
        if args.len() != decl.fields.len()
            || (labeled && !label_mismatches(labels, fields).is_empty())
        {
            self.error(
                ARITY_ERROR,
                format!(
                    "structure `{name}` is initialized with fields {}",
                    decl.fields
                        .iter()
                        .map(|(name, _)| format!("`{name}`"))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                span,
            );
            for arg in args {
                self.visit_expr(arg.expr);
            }
            return Expr::error(span);
        }

        let args: Vec<(Option<String>, Expr)> = args
            .into_iter()
            .map(|arg| (arg.label, self.visit_expr(arg.expr)))
            .collect();
        let field_tys: Vec<&Ty> = args
            .iter()
            .enumerate()
            .map(|(i, (label, _))| {
                label
                    .as_ref()
                    .and_then(|label| decl.fields.iter().find(|(name, _)| name == label))
                    .unwrap_or(&decl.fields[i])
            })
            .map(|(_, ty)| ty)
            .collect();
        let ty_args = self.infer(
            &decl.ty_params,
            field_tys.iter().copied().zip(args.iter().map(|(_, e)| e)),
            |param| Site::TypeArg {
                generic: name.clone(),
                param,
            },
        );
        {
            // The substitution borrows the type arguments until the end of this block
            let subst = substitution(&decl.ty_params, &ty_args);
            for ((label, arg), field_ty) in args.iter().zip(&field_tys) {
                self.coerce(&field_ty.subst(&subst), arg, || match label {
                    Some(label) => format!("field `{label}` of `{name}`"),
                    None => format!("a field of `{name}`"),
                });
            }
        }
        Expr {
            kind: ExprKind::AggregateE(args.into_iter().map(|(_, e)| e).collect()),
            ty: Ty::StructT(name, ty_args),
            span,
        }
    }

    /// Types an enumeration constructor `E::c(e1, ..)`.
    fn visit_enum_ctor(
        &mut self,
        name: String,
        case: String,
        args: Vec<ast::Arg>,
        span: Span,
    ) -> Expr {
        let args: Vec<_> = args.into_iter().map(|arg| self.visit_expr(arg.expr)).collect();
        let Some(decl) = self.decls.enums.get(&name).cloned() else {
            self.error(UNKNOWN_TYPE_ERROR, format!("unknown enumeration `{name}`"), span);
            return Expr::error(span);
        };
        let Some((_, payload)) = decl.cases.iter().find(|(c, _)| *c == case) else {
            self.error(
                UNKNOWN_CASE_ERROR,
                format!("no case `{case}` in `{name}`"),
                span,
            );
            return Expr::error(span);
        };
        if payload.len() != args.len() {
            self.error(
                ARITY_ERROR,
                format!(
                    "case `{name}::{case}` takes {} payload value(s), found {}",
                    payload.len(),
                    args.len()
                ),
                span,
            );
            return Expr::error(span);
        }
        let ty_args = self.infer(&decl.ty_params, payload.iter().zip(&args), |param| {
            Site::TypeArg {
                generic: name.clone(),
                param,
            }
        });
        {
            let subst = substitution(&decl.ty_params, &ty_args);
            for (i, (ty, arg)) in payload.iter().zip(&args).enumerate() {
                self.coerce(&ty.subst(&subst), arg, || {
                    format!("the {} payload value of `{name}::{case}`", Ordinal(i + 1))
                });
            }
        }
        Expr {
            kind: ExprKind::AggregateE(args),
            ty: Ty::EnumT(name, ty_args),
            span,
        }
    }

    /// Types a call to a function.
    fn visit_call(&mut self, name: String, args: Vec<ast::Arg>, span: Span) -> Expr {
        let args: Vec<_> = args.into_iter().map(|arg| self.visit_expr(arg.expr)).collect();
        let Some(sig) = self.decls.funs.get(&name).cloned() else {
            return Expr::error(span);
        };
        if sig.params.len() != args.len() {
            self.error(
                ARITY_ERROR,
                format!(
                    "function `{name}` takes {} argument(s) but {} were supplied",
                    sig.params.len(),
                    args.len()
                ),
                span,
            );
            return Expr::error(span);
        }

        let ty_args = self.infer(
            &sig.ty_params,
            sig.params.iter().map(|param| &param.ty).zip(&args),
            |param| Site::CallArg {
                fun: name.clone(),
                param,
            },
        );
        let subst = substitution(&sig.ty_params, &ty_args);
        for (i, (param, arg)) in sig.params.iter().zip(&args).enumerate() {
            self.coerce(&param.ty.subst(&subst), arg, || {
                format!("the {} argument of `{name}`", Ordinal(i + 1))
            });
        }

        Expr {
            ty: sig.ret_ty.subst(&subst),
            kind: ExprKind::CallE {
                fun: name,
                args: sig
                    .params
                    .iter()
                    .map(|param| param.convention)
                    .zip(args)
                    .collect(),
                diverging: sig.is_diverging(),
            },
            span,
        }
    }

    /// Infers the type arguments of a generic application by unifying the
    /// declared types with the types of the given values, and submits each
    /// inferred argument to the gate.
    ///
    /// Parameters that cannot be inferred get the error type, which is
    /// compatible with everything.
    fn infer<'a>(
        &mut self,
        ty_params: &[TyParam],
        pairs: impl Iterator<Item = (&'a Ty, &'a Expr)>,
        site: impl Fn(String) -> Site,
    ) -> Vec<Ty> {
        let mut inferred = HashMap::new();
        for (declared, value) in pairs {
            unify(ty_params, declared, &value.ty, value.span, &mut inferred);
        }
        ty_params
            .iter()
            .map(|param| match inferred.remove(&param.name) {
                Some((ty, span)) => {
                    self.gate(site(param.name.clone()), param.caps, &ty, span, false);
                    ty
                }
                None => Ty::ErrorT,
            })
            .collect()
    }
}

/// Unifies a declared type against the type of a value, recording the first
/// binding found for each generic parameter in `ty_params`.
fn unify(
    ty_params: &[TyParam],
    declared: &Ty,
    found: &Ty,
    span: Span,
    inferred: &mut HashMap<String, (Ty, Span)>,
) {
    match (declared, found) {
        (_, Ty::ErrorT | Ty::NeverT) => {}
        (Ty::ParamT(name, _), found) if ty_params.iter().any(|param| param.name == *name) => {
            inferred
                .entry(name.clone())
                .or_insert_with(|| (found.clone(), span));
        }
        (Ty::StructT(n1, args1), Ty::StructT(n2, args2))
        | (Ty::EnumT(n1, args1), Ty::EnumT(n2, args2))
            if n1 == n2 =>
        {
            for (declared, found) in args1.iter().zip(args2) {
                unify(ty_params, declared, found, span, inferred);
            }
        }
        (Ty::ArrayT(declared), Ty::ArrayT(found)) => {
            unify(ty_params, declared, found, span, inferred)
        }
        _ => {}
    }
}
