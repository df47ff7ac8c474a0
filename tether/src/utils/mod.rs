//! Small helpers shared by the frontend.

use std::collections::BTreeMap;

/// Names that do not pair up between labels and fields: unknown or
/// repeated labels, and fields without a label. Sorted.
pub fn label_mismatches<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    fields: impl IntoIterator<Item = &'a str>,
) -> Vec<&'a str> {
    let mut balance: BTreeMap<&str, isize> = BTreeMap::new();
    for field in fields {
        *balance.entry(field).or_default() += 1;
    }
    for label in labels {
        *balance.entry(label).or_default() -= 1;
    }
    balance
        .into_iter()
        .filter(|&(_, count)| count != 0)
        .map(|(name, _)| name)
        .collect()
}

/// Shorthand for `Box::new`, for building trees.
pub fn boxed<T>(t: T) -> Box<T> {
    Box::new(t)
}
