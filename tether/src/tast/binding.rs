//! Value bindings: locals, parameters and match payloads.

use std::fmt;
use std::ops::Index;

use super::{Span, Ty};

/// Unique identifier of a binding within its function.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(pub usize);

impl fmt::Debug for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Who owns the value of a binding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Ownership {
    /// Locals and `consuming` parameters.
    Owned,
    /// `borrowing` parameters and payloads of a borrowing `match`.
    Borrowed,
    /// `inout` parameters.
    Inout,
}

/// A field of the aggregate type of a binding.
#[derive(Clone, Debug)]
pub struct Field {
    /// Name.
    pub name: String,
    /// Type.
    pub ty: Ty,
    /// Is the field copyable.
    pub copyable: bool,
}

/// A value binding.
#[derive(Clone, Debug)]
pub struct Binding {
    /// Identifier.
    pub id: BindingId,
    /// Source name.
    pub name: String,
    /// Declared type.
    pub ty: Ty,
    /// Can the value be implicitly copied.
    pub copyable: bool,
    /// Can the value escape its scope.
    pub escapable: bool,
    /// `var` or `inout`.
    pub mutable: bool,
    /// Ownership kind.
    pub ownership: Ownership,
    /// Fields of its structure type, empty for other types.
    pub fields: Vec<Field>,
    /// Declaration span.
    pub span: Span,
}

impl Binding {
    /// Should the linearity of this binding be tracked?
    pub fn is_move_only(&self) -> bool {
        !self.copyable
    }

    /// Name of the field at `index`.
    pub fn field_name(&self, index: usize) -> &str {
        self.fields.get(index).map_or("?", |field| &field.name)
    }
}

/// Binding table of a function.
#[derive(Clone, Debug, Default)]
pub struct Bindings(Vec<Binding>);

impl Bindings {
    /// Registers a new binding, giving it the next identifier.
    pub fn push(&mut self, make: impl FnOnce(BindingId) -> Binding) -> BindingId {
        let id = BindingId(self.0.len());
        self.0.push(make(id));
        id
    }

    /// Iterates over all bindings, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.0.iter()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<BindingId> for Bindings {
    type Output = Binding;

    fn index(&self, id: BindingId) -> &Binding {
        &self.0[id.0]
    }
}
