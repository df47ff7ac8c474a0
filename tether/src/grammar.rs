//! Pest grammar of the surface language, and helpers to walk its pairs.

/// Pest parser for the surface language.
#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct Grammar;

/// Takes the next pair out of an iterator of pairs, optionally checking its
/// rule.
///
/// The grammar guarantees the shape of the pairs the tree builders walk, so a
/// mismatch is a bug in the builders.
macro_rules! consume {
    ($pairs:expr) => {
        $pairs
            .next()
            .unwrap_or_else(|| panic!("parser internal error: missing pair"))
    };
    ($pairs:expr, $rule:pat) => {{
        let pair = consume!($pairs);
        debug_assert!(
            matches!(pair.as_rule(), $rule),
            "parser internal error: unexpected {:?}",
            pair.as_rule()
        );
        pair
    }};
}

/// Takes the next pair if it has the given rule.
///
/// Requires a `Peekable` iterator of pairs.
macro_rules! consume_opt {
    ($pairs:expr, $rule:pat) => {
        $pairs.next_if(|pair| matches!(pair.as_rule(), $rule))
    };
}

/// Takes the last pair out of an iterator of pairs, checking its rule.
macro_rules! consume_back {
    ($pairs:expr, $rule:pat) => {{
        let pair = $pairs
            .next_back()
            .unwrap_or_else(|| panic!("parser internal error: missing pair"));
        debug_assert!(
            matches!(pair.as_rule(), $rule),
            "parser internal error: unexpected {:?}",
            pair.as_rule()
        );
        pair
    }};
}
