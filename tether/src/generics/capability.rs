//! Copyability and escapability capabilities.
//!
//! The same structure describes what a type provides and what a generic
//! position requires: a position requires every capability unless it was
//! suppressed with an inverse marker (`~Copyable`, `~Escapable`).

use std::fmt;

use pest::iterators::Pair;

use crate::ast::Parsable;
use crate::grammar::Rule;
use crate::Context;

/// A single capability.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Capability {
    /// Values can be implicitly copied.
    Copyable,
    /// Values can outlive the scope that created them.
    Escapable,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Copyable => write!(f, "Copyable"),
            Capability::Escapable => write!(f, "Escapable"),
        }
    }
}

/// A set of capabilities.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Capabilities {
    /// Copyability.
    pub copyable: bool,
    /// Escapability.
    pub escapable: bool,
}

impl Default for Capabilities {
    /// Every capability, which is both what ordinary types provide and what
    /// unannotated generic positions require.
    fn default() -> Self {
        Self::ALL
    }
}

impl Capabilities {
    /// All capabilities.
    pub const ALL: Self = Self {
        copyable: true,
        escapable: true,
    };

    /// Returns `self` with `cap` suppressed.
    #[must_use]
    pub fn without(self, cap: Capability) -> Self {
        match cap {
            Capability::Copyable => Self {
                copyable: false,
                ..self
            },
            Capability::Escapable => Self {
                escapable: false,
                ..self
            },
        }
    }

    /// Capabilities provided by both `self` and `other`.
    #[must_use]
    pub fn meet(self, other: Self) -> Self {
        Self {
            copyable: self.copyable && other.copyable,
            escapable: self.escapable && other.escapable,
        }
    }

    /// Is `cap` in the set?
    pub fn has(self, cap: Capability) -> bool {
        match cap {
            Capability::Copyable => self.copyable,
            Capability::Escapable => self.escapable,
        }
    }

    /// The first capability `requirement` asks for and `self` does not
    /// provide, if any.
    ///
    /// Copyability is reported before escapability.
    pub fn missing(self, requirement: Self) -> Option<Capability> {
        [Capability::Copyable, Capability::Escapable]
            .into_iter()
            .find(|&cap| requirement.has(cap) && !self.has(cap))
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.copyable, self.escapable) {
            (true, true) => write!(f, "Copyable & Escapable"),
            (true, false) => write!(f, "Copyable & ~Escapable"),
            (false, true) => write!(f, "~Copyable & Escapable"),
            (false, false) => write!(f, "~Copyable & ~Escapable"),
        }
    }
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Capability {
    fn parse(pair: Pair<'ctx, Rule>, _ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::inverse));
        let pair = consume!(pair.into_inner());
        match pair.as_rule() {
            Rule::copyable_kw => Capability::Copyable,
            Rule::escapable_kw => Capability::Escapable,
            rule => panic!("parser internal error: expected capability, found {rule:?}"),
        }
    }
}

impl<'ctx> Parsable<'ctx, Pair<'ctx, Rule>> for Capabilities {
    /// Parses a list of inverse markers into the capabilities left.
    fn parse(pair: Pair<'ctx, Rule>, ctx: &mut Context<'ctx>) -> Self {
        debug_assert!(matches!(pair.as_rule(), Rule::inverses));
        pair.into_inner()
            .map(|inverse| ctx.parse::<_, Capability>(inverse))
            .fold(Capabilities::ALL, Capabilities::without)
    }
}
