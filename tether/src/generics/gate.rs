//! The generic instantiation gate.
//!
//! Every application of a generic (type argument, inferred call argument,
//! collection element, existential box, protocol conformance, associated type
//! binding) asks the gate whether the capabilities of the argument satisfy
//! the requirements of the position. The answer depends only on declared
//! capabilities, never on how the value is later used.

use std::fmt;

use super::{Capabilities, Capability};
use crate::ast::Span;
use crate::codes::GENERIC_RESTRICTION_ERROR;
use crate::reporter::Diagnostic;

/// A generic application site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Site {
    /// Explicit type argument for parameter `param` of the generic type
    /// `generic`.
    TypeArg {
        /// Generic type name.
        generic: String,
        /// Generic parameter name.
        param: String,
    },
    /// Type argument inferred for parameter `param` of a call to `fun`.
    CallArg {
        /// Called generic function.
        fun: String,
        /// Generic parameter name.
        param: String,
    },
    /// Element of a collection literal or of a collection type.
    Collection,
    /// Boxing into an existential.
    Existential,
    /// Conformance of a nominal type to a protocol.
    Conformance {
        /// Protocol name.
        protocol: String,
    },
    /// Binding of an associated type in a protocol conformance.
    AssociatedType {
        /// Protocol name.
        protocol: String,
        /// Associated type name.
        name: String,
    },
}

impl Site {
    /// What the position is, for diagnostics.
    fn describe(&self, requirement: Capability) -> String {
        match self {
            Site::TypeArg { generic, param } => {
                format!("generic parameter `{param}` of `{generic}` requires `{requirement}`")
            }
            Site::CallArg { fun, param } => format!(
                "inferred for generic parameter `{param}` of `{fun}`, which requires `{requirement}`"
            ),
            Site::Collection => format!("collection elements must be `{requirement}`"),
            Site::Existential => format!("this existential requires `{requirement}` values"),
            Site::Conformance { protocol } => {
                format!("protocol `{protocol}` requires conforming types to be `{requirement}`")
            }
            Site::AssociatedType { protocol, name } => {
                format!("associated type `{name}` of `{protocol}` requires `{requirement}`")
            }
        }
    }
}

/// Does a position requiring `requirement` accept an argument providing
/// `provided`?
///
/// Monotonic: dropping capabilities from `requirement` or adding capabilities
/// to `provided` never turns an acceptance into a rejection.
pub fn permits(requirement: Capabilities, provided: Capabilities) -> bool {
    provided.missing(requirement).is_none()
}

/// A rejected generic application.
#[derive(Clone, Debug)]
pub struct Rejection {
    /// Capability the argument lacks.
    pub capability: Capability,
    /// Printed argument type.
    pub ty: String,
    /// Where the generic was applied.
    pub site: Site,
    /// Span of the application.
    pub span: Span,
    /// Was it applied in the target type of a dynamic cast.
    pub in_cast: bool,
}

impl Rejection {
    /// Marks the rejection as coming from the target type of a dynamic cast.
    #[must_use]
    pub fn in_cast(self) -> Self {
        Self {
            in_cast: true,
            ..self
        }
    }

    /// Turns the rejection into a checker diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let kind = match self.capability {
            Capability::Copyable => "move-only",
            Capability::Escapable => "non-escapable",
        };
        let mut notes = vec![];
        if matches!(self.site, Site::TypeArg { .. } | Site::CallArg { .. }) {
            notes.push(format!(
                "declare the generic parameter with `~{}` to accept such types",
                self.capability
            ));
        }
        if self.in_cast {
            notes.push("a dynamic cast to this type always fails at runtime".to_string());
        }
        Diagnostic::error()
            .with_code(GENERIC_RESTRICTION_ERROR)
            .with_message(format!(
                "{kind} type `{}` cannot be used with generics",
                self.ty
            ))
            .with_labels(vec![self
                .span
                .as_label()
                .with_message(self.site.describe(self.capability))])
            .with_notes(notes)
    }
}

/// Checks a generic application.
///
/// Returns the rejection if the argument of type `ty`, which provides
/// `provided`, does not satisfy the `requirement` of the position `site`.
pub fn check(
    site: Site,
    requirement: Capabilities,
    ty: impl fmt::Display,
    provided: Capabilities,
    span: Span,
) -> Result<(), Rejection> {
    match provided.missing(requirement) {
        None => Ok(()),
        Some(capability) => Err(Rejection {
            capability,
            ty: ty.to_string(),
            site,
            span,
            in_cast: false,
        }),
    }
}
