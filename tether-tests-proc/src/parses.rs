use proc_macro::TokenStream;
use syn::parse::{Parse, ParseStream};
use syn::{parse_macro_input, Ident, LitStr, Result, Token};

use crate::item::ArgFn;

/// `"input" as rule`.
struct RuleInput {
    input: LitStr,
    rule: Ident,
}

impl Parse for RuleInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let source = input.parse()?;
        input.parse::<Token![as]>()?;
        Ok(Self {
            input: source,
            rule: input.parse()?,
        })
    }
}

pub fn parses(attr: TokenStream, item: TokenStream) -> TokenStream {
    let RuleInput { input, rule } = parse_macro_input!(attr as RuleInput);
    let ArgFn {
        name,
        attrs,
        body,
        arg_name,
        arg_ty,
    } = parse_macro_input!(item as ArgFn);
    let rule_name = rule.to_string();

    quote! {
        #(#attrs)*
        fn #name() -> ::anyhow::Result<()> {
            let config = crate::config::Config::with_input(#input);
            let mut ctx = crate::Context::new(config);
            let parsed = crate::ast::parse_rule(&mut ctx, crate::grammar::Rule::#rule);
            let #arg_name: #arg_ty = match parsed {
                Ok(node) => node,
                Err(err) => {
                    ctx.reporter.display()?;
                    ::anyhow::bail!("`{}` does not parse as `{}`: {err}", #input, #rule_name);
                }
            };
            #body
            Ok(())
        }
    }
    .into()
}
