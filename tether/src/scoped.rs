//! Lexically scoped name tables.

use std::borrow::Borrow;
use std::fmt;

/// Name table with nested lexical scopes.
///
/// Entries live in a single stack, and each open scope remembers where it
/// starts in it. Shadowing is resolved by looking up from the top.
#[derive(Clone)]
pub struct Scoped<K, V> {
    /// Entries, in order of insertion.
    entries: Vec<(K, V)>,
    /// Start of each open scope in `entries`, innermost last.
    marks: Vec<usize>,
}

impl<K, V> Scoped<K, V> {
    /// Opens a new scope.
    pub fn push_scope(&mut self) {
        self.marks.push(self.entries.len());
    }

    /// Closes the innermost scope, and returns the entries it declared.
    ///
    /// The outermost scope cannot be closed.
    pub fn pop_scope(&mut self) -> anyhow::Result<Vec<(K, V)>> {
        let mark = self
            .marks
            .pop()
            .ok_or_else(|| anyhow!("cannot close the outermost scope"))?;
        Ok(self.entries.split_off(mark))
    }

    /// Declares a name in the innermost scope, shadowing any previous one.
    pub fn insert(&mut self, key: K, v: V) {
        self.entries.push((key, v));
    }

    /// Resolves a name, from the innermost declaration outwards.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Number of open scopes, the outermost one included.
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.marks.len() + 1
    }
}

impl<K, V> Default for Scoped<K, V> {
    fn default() -> Self {
        Self {
            entries: vec![],
            marks: vec![],
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Scoped<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}
