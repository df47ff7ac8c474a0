//! Shapes of the test functions the attributes are applied to.

use proc_macro2::TokenStream;
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Attribute, Block, Error, FnArg, Ident, ItemFn, Pat, Result, Type};

/// A test function without arguments, whose body evaluates to a program
/// source.
pub struct SourceFn {
    pub name: Ident,
    pub attrs: Vec<Attribute>,
    pub source: Block,
}

impl Parse for SourceFn {
    fn parse(input: ParseStream) -> Result<Self> {
        let f: ItemFn = input.parse()?;
        if !f.sig.inputs.is_empty() {
            return Err(Error::new(f.sig.inputs.span(), "expected no arguments"));
        }
        Ok(Self {
            name: f.sig.ident,
            attrs: f.attrs,
            source: *f.block,
        })
    }
}

impl SourceFn {
    /// Wraps the checking of the source into a test function.
    ///
    /// `on_result` is evaluated with `result` in scope, the outcome of
    /// `tether_lib::check`.
    pub fn checking(self, on_result: TokenStream) -> TokenStream {
        let Self {
            name,
            attrs,
            source,
        } = self;
        quote! {
            #(#attrs)*
            fn #name() -> ::anyhow::Result<()> {
                let source: &str = #source;
                let input = ::unindent::unindent(source);
                let config = ::tether_lib::config::Config::with_input(&input);
                let mut context = ::tether_lib::Context::new(config);
                let result = ::tether_lib::check(&mut context)?;
                #on_result
            }
        }
    }
}

/// A test function with a single argument, that the attribute provides.
pub struct ArgFn {
    pub name: Ident,
    pub attrs: Vec<Attribute>,
    pub body: Block,
    pub arg_name: Ident,
    pub arg_ty: Type,
}

impl Parse for ArgFn {
    fn parse(input: ParseStream) -> Result<Self> {
        let f: ItemFn = input.parse()?;
        if f.sig.inputs.len() != 1 {
            return Err(Error::new(
                f.sig.inputs.span(),
                format!(
                    "expected exactly one argument, found {} in `{}`",
                    f.sig.inputs.len(),
                    f.sig.ident
                ),
            ));
        }
        let Some(FnArg::Typed(arg)) = f.sig.inputs.into_iter().next() else {
            return Err(Error::new(f.sig.ident.span(), "argument may not be a receiver"));
        };
        let Pat::Ident(arg_name) = *arg.pat else {
            return Err(Error::new(arg.pat.span(), "argument must be an identifier"));
        };
        Ok(Self {
            name: f.sig.ident,
            attrs: f.attrs,
            body: *f.block,
            arg_name: arg_name.ident,
            arg_ty: *arg.ty,
        })
    }
}
