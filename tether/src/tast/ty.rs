//! Resolved types.

use std::fmt;

use itertools::Itertools;

use crate::generics::Capabilities;

/// A resolved type.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// The type of functions that never return.
    NeverT,
    /// Unit type.
    UnitT,
    /// Integers.
    IntT,
    /// Booleans.
    BoolT,
    /// Structure type, with its type arguments.
    StructT(String, Vec<Ty>),
    /// Enumeration type, with its type arguments.
    EnumT(String, Vec<Ty>),
    /// Generic type parameter, with the capabilities it provides.
    ParamT(String, Capabilities),
    /// Array of elements.
    ArrayT(Box<Ty>),
    /// Existential box.
    AnyT {
        /// Protocol the boxed value conforms to.
        protocol: Option<String>,
        /// Capabilities of the boxed value.
        caps: Capabilities,
    },
    /// Type of an erroneous expression, already reported. Unifies with
    /// anything.
    ErrorT,
}

impl Ty {
    /// Applies a substitution of type parameters.
    pub fn subst(&self, subst: &impl Fn(&str) -> Option<Ty>) -> Ty {
        match self {
            Ty::ParamT(name, _) => subst(name).unwrap_or_else(|| self.clone()),
            Ty::StructT(name, args) => {
                Ty::StructT(name.clone(), args.iter().map(|arg| arg.subst(subst)).collect())
            }
            Ty::EnumT(name, args) => {
                Ty::EnumT(name.clone(), args.iter().map(|arg| arg.subst(subst)).collect())
            }
            Ty::ArrayT(item) => Ty::ArrayT(Box::new(item.subst(subst))),
            _ => self.clone(),
        }
    }

    /// Can a value of type `found` be used where `self` is expected?
    ///
    /// Existentials accept anything (boxing is checked by the generic gate),
    /// and diverging or erroneous expressions fit everywhere.
    pub fn accepts(&self, found: &Ty) -> bool {
        match (self, found) {
            (Ty::ErrorT, _) | (_, Ty::ErrorT) | (_, Ty::NeverT) | (Ty::AnyT { .. }, _) => true,
            (Ty::StructT(n1, args1), Ty::StructT(n2, args2))
            | (Ty::EnumT(n1, args1), Ty::EnumT(n2, args2)) => {
                n1 == n2
                    && args1.len() == args2.len()
                    && args1.iter().zip(args2).all(|(a1, a2)| a1.accepts(a2))
            }
            (Ty::ArrayT(item1), Ty::ArrayT(item2)) => item1.accepts(item2),
            (Ty::ParamT(n1, _), Ty::ParamT(n2, _)) => n1 == n2,
            _ => self == found,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::NeverT => write!(f, "Never"),
            Ty::UnitT => write!(f, "()"),
            Ty::IntT => write!(f, "Int"),
            Ty::BoolT => write!(f, "Bool"),
            Ty::StructT(name, args) | Ty::EnumT(name, args) if args.is_empty() => {
                write!(f, "{name}")
            }
            Ty::StructT(name, args) | Ty::EnumT(name, args) => {
                write!(f, "{name}<{}>", args.iter().join(", "))
            }
            Ty::ParamT(name, _) => write!(f, "{name}"),
            Ty::ArrayT(item) => write!(f, "[{item}]"),
            Ty::AnyT { protocol, caps } => {
                write!(f, "any")?;
                if let Some(protocol) = protocol {
                    write!(f, " {protocol}")?;
                }
                if !caps.copyable {
                    write!(f, " & ~Copyable")?;
                }
                if !caps.escapable {
                    write!(f, " & ~Escapable")?;
                }
                Ok(())
            }
            Ty::ErrorT => write!(f, "{{error}}"),
        }
    }
}

impl fmt::Debug for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
