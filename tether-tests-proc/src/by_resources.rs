use std::path::{Component, Path};

use glob::glob;
use proc_macro::TokenStream;
use proc_macro2::Span;
use syn::{parse_macro_input, Error, LitStr};

use crate::item::ArgFn;

/// Identifier-friendly name of a resource, made of its directory and stem,
/// relative to the start of the pattern.
fn resource_ident(root: &Path, entry: &Path) -> String {
    let relative = entry.strip_prefix(root).unwrap_or(entry).with_extension("");
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("_")
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
}

pub fn by_resources(attr: TokenStream, item: TokenStream) -> TokenStream {
    let pattern = parse_macro_input!(attr as LitStr);
    let ArgFn {
        name,
        attrs,
        body,
        arg_name,
        arg_ty,
    } = parse_macro_input!(item as ArgFn);

    // Patterns are relative to the crate of the test
    let manifest = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let full_pattern = Path::new(&manifest).join(pattern.value());
    // Directory part of the pattern, before the first wildcard
    let root: std::path::PathBuf = full_pattern
        .components()
        .take_while(|c| !c.as_os_str().to_string_lossy().contains(['*', '?', '[']))
        .collect();

    let entries = match glob(&full_pattern.display().to_string()) {
        Ok(entries) => entries,
        Err(err) => return Error::new(pattern.span(), err).to_compile_error().into(),
    };
    let mut paths: Vec<_> = entries.filter_map(Result::ok).collect();
    paths.sort();
    if paths.is_empty() {
        return Error::new(pattern.span(), "no resource matches this pattern")
            .to_compile_error()
            .into();
    }

    let tests = paths.iter().map(|path| {
        let test_name = syn::Ident::new(
            &format!("{name}__{}", resource_ident(&root, path)),
            Span::call_site(),
        );
        let path = path.display().to_string();
        quote! {
            #(#attrs)*
            #[allow(non_snake_case)]
            fn #test_name() -> ::anyhow::Result<()> {
                let #arg_name: #arg_ty = #path.into();
                #body
                Ok(())
            }
        }
    });

    quote! {
        #(#tests)*
    }
    .into()
}
