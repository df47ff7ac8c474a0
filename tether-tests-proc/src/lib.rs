//! Procedural macros to write the checker tests.

extern crate proc_macro;
use proc_macro::TokenStream;

#[macro_use]
extern crate quote;

mod by_resources;
mod item;
mod parses;
mod should_fail;

/// Generates one test per resource file matching a glob pattern, relative to
/// the crate of the test.
///
/// The test function takes the path of the file as its only argument.
#[proc_macro_attribute]
pub fn by_resources(attr: TokenStream, item: TokenStream) -> TokenStream {
    by_resources::by_resources(attr, item)
}

/// Parses a string with a grammar rule, and passes the tree to the test
/// function.
///
/// Usage: `#[parses("inout" as convention)]`.
#[proc_macro_attribute]
pub fn parses(attr: TokenStream, item: TokenStream) -> TokenStream {
    parses::parses(attr, item)
}

/// Checks that the source returned by the test function fails with exactly
/// the given diagnostic codes, counted with multiplicity.
#[proc_macro_attribute]
pub fn should_fail(attr: TokenStream, item: TokenStream) -> TokenStream {
    should_fail::should_fail(attr, item)
}

/// Checks that the source returned by the test function passes the check.
#[proc_macro_attribute]
pub fn tether_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    tether_test::tether_test(attr, item)
}
