//! Resolved places.

use std::fmt;

use super::{BindingId, Bindings, Span};

/// A place: a binding, or one field of a binding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Place {
    /// Root binding.
    pub binding: BindingId,
    /// Index of the projected field, if any.
    pub field: Option<usize>,
    /// Codespan.
    pub span: Span,
}

impl Place {
    /// The whole value of `binding`.
    pub fn whole(binding: BindingId, span: Span) -> Self {
        Self {
            binding,
            field: None,
            span,
        }
    }

    /// Do the two places share some storage?
    ///
    /// True when they have the same root and one field path is a prefix of the
    /// other.
    pub fn overlaps(&self, other: &Place) -> bool {
        self.binding == other.binding
            && match (self.field, other.field) {
                (Some(f1), Some(f2)) => f1 == f2,
                _ => true,
            }
    }

    /// Displays the place with source names.
    pub fn display<'a>(&'a self, bindings: &'a Bindings) -> impl fmt::Display + 'a {
        PlaceDisplay {
            place: self,
            bindings,
        }
    }
}

/// Displays a place with source names.
struct PlaceDisplay<'a> {
    /// Displayed place.
    place: &'a Place,
    /// Where to find its names.
    bindings: &'a Bindings,
}

impl fmt::Display for PlaceDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binding = &self.bindings[self.place.binding];
        match self.place.field {
            Some(field) => write!(f, "{}.{}", binding.name, binding.field_name(field)),
            None => write!(f, "{}", binding.name),
        }
    }
}
