use proc_macro::TokenStream;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Expr, Token};

use crate::item::SourceFn;

pub fn should_fail(attr: TokenStream, item: TokenStream) -> TokenStream {
    let codes = match Punctuated::<Expr, Token![,]>::parse_terminated.parse(attr) {
        Ok(codes) => codes.into_iter(),
        Err(err) => return err.to_compile_error().into(),
    };
    parse_macro_input!(item as SourceFn)
        .checking(quote! {
            let Err(diagnostics) = result else {
                ::anyhow::bail!("program should not pass the check");
            };
            let codes = diagnostics.codes();
            let mut expected: Vec<String> = vec![#(#codes.to_string()),*];
            expected.sort();
            ::anyhow::ensure!(
                codes == expected,
                "diagnostic codes mismatch: expected {expected:?}, got {codes:?}"
            );
            Ok(())
        })
        .into()
}
