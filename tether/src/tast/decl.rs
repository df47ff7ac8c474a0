//! Resolved declarations: nominal types, protocols and function signatures.

use std::collections::HashMap;

use super::{Convention, Span, Ty, TyParam};
use crate::generics::Capabilities;

/// A resolved structure declaration.
#[derive(Debug, Clone)]
pub struct StructDecl {
    /// Name.
    pub name: String,
    /// Generic type parameters.
    pub ty_params: Vec<TyParam>,
    /// Capabilities left by the inverse markers of the declaration.
    pub caps: Capabilities,
    /// Protocols it conforms to.
    pub conformances: Vec<String>,
    /// Fields, in declaration order.
    pub fields: Vec<(String, Ty)>,
    /// Codespan.
    pub span: Span,
}

/// A resolved enumeration declaration.
#[derive(Debug, Clone)]
pub struct EnumDecl {
    /// Name.
    pub name: String,
    /// Generic type parameters.
    pub ty_params: Vec<TyParam>,
    /// Capabilities left by the inverse markers of the declaration.
    pub caps: Capabilities,
    /// Protocols it conforms to.
    pub conformances: Vec<String>,
    /// Cases, with their payload types.
    pub cases: Vec<(String, Vec<Ty>)>,
    /// Codespan.
    pub span: Span,
}

/// A resolved protocol declaration.
#[derive(Debug, Clone)]
pub struct ProtocolDecl {
    /// Name.
    pub name: String,
    /// Capabilities required from conforming types.
    pub caps: Capabilities,
    /// Associated types, with the capabilities required from their bindings.
    pub assoc_tys: Vec<(String, Capabilities)>,
}

/// A resolved parameter of a function signature.
#[derive(Debug, Clone)]
pub struct ParamSig {
    /// Name.
    pub name: String,
    /// Passing convention.
    pub convention: Convention,
    /// Type.
    pub ty: Ty,
}

/// A resolved function signature.
#[derive(Debug, Clone)]
pub struct FunSig {
    /// Name.
    pub name: String,
    /// Generic type parameters.
    pub ty_params: Vec<TyParam>,
    /// Parameters.
    pub params: Vec<ParamSig>,
    /// Return type.
    pub ret_ty: Ty,
}

impl FunSig {
    /// Does a call to this function never return?
    pub fn is_diverging(&self) -> bool {
        self.ret_ty == Ty::NeverT
    }
}

/// All the declarations of a program.
#[derive(Debug, Clone, Default)]
pub struct Decls {
    /// Structures, by name.
    pub structs: HashMap<String, StructDecl>,
    /// Enumerations, by name.
    pub enums: HashMap<String, EnumDecl>,
    /// Protocols, by name.
    pub protocols: HashMap<String, ProtocolDecl>,
    /// Function signatures, by name.
    pub funs: HashMap<String, FunSig>,
}

impl Decls {
    /// Capabilities provided by values of type `ty`.
    ///
    /// A nominal type lacks the capabilities its declaration suppresses. An
    /// unmarked generic nominal type is conditionally copyable (resp.
    /// escapable) on the arguments of its `~Copyable` (resp. `~Escapable`)
    /// parameters.
    pub fn provided(&self, ty: &Ty) -> Capabilities {
        match ty {
            Ty::NeverT | Ty::UnitT | Ty::IntT | Ty::BoolT | Ty::ArrayT(_) | Ty::ErrorT => {
                Capabilities::ALL
            }
            Ty::ParamT(_, caps) | Ty::AnyT { caps, .. } => *caps,
            Ty::StructT(name, args) | Ty::EnumT(name, args) => {
                let Some((declared, params)) = self.nominal(name) else {
                    return Capabilities::ALL;
                };
                let mut caps = declared;
                for (param, arg) in params.iter().zip(args) {
                    let arg_caps = self.provided(arg);
                    if !param.caps.copyable {
                        caps.copyable &= arg_caps.copyable;
                    }
                    if !param.caps.escapable {
                        caps.escapable &= arg_caps.escapable;
                    }
                }
                caps
            }
        }
    }

    /// Declared capabilities and type parameters of a nominal type.
    fn nominal(&self, name: &str) -> Option<(Capabilities, &[TyParam])> {
        self.structs
            .get(name)
            .map(|s| (s.caps, &s.ty_params[..]))
            .or_else(|| self.enums.get(name).map(|e| (e.caps, &e.ty_params[..])))
    }

    /// Fields of a structure type, with its type arguments substituted.
    pub fn fields_of(&self, ty: &Ty) -> Option<Vec<(String, Ty)>> {
        let Ty::StructT(name, args) = ty else {
            return None;
        };
        let decl = self.structs.get(name)?;
        let subst = substitution(&decl.ty_params, args);
        Some(
            decl.fields
                .iter()
                .map(|(name, ty)| (name.clone(), ty.subst(&subst)))
                .collect(),
        )
    }

    /// Cases of an enumeration type, with its type arguments substituted.
    pub fn cases_of(&self, ty: &Ty) -> Option<Vec<(String, Vec<Ty>)>> {
        let Ty::EnumT(name, args) = ty else {
            return None;
        };
        let decl = self.enums.get(name)?;
        let subst = substitution(&decl.ty_params, args);
        Some(
            decl.cases
                .iter()
                .map(|(name, payload)| {
                    (
                        name.clone(),
                        payload.iter().map(|ty| ty.subst(&subst)).collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Substitution of `params` by `args`.
pub(crate) fn substitution<'a>(
    params: &'a [TyParam],
    args: &'a [Ty],
) -> impl Fn(&str) -> Option<Ty> + 'a {
    move |name: &str| {
        params
            .iter()
            .position(|param| param.name == name)
            .and_then(|i| args.get(i).cloned())
    }
}
