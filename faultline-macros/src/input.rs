//! Macro argument grammar
//!
//! ```text
//! verify!( [in DOMAIN;] EXPR [, PATCH] )
//! attempt!([in DOMAIN;] EXPR [, PATCH] )
//! fault!(  [in DOMAIN[;]]    [PATCH]   )
//! ```
//!
//! `PATCH` is any expression callable with the error builder, usually a
//! closure such as `|b| b.error_code(Code::NotFound)`.

use syn::parse::{Parse, ParseStream};
use syn::{Expr, Token};

/// Arguments of `verify!` and `attempt!`
pub(crate) struct CheckInput {
    pub domain: Option<Expr>,
    pub subject: Expr,
    pub patch: Option<Expr>,
}

/// Arguments of `fault!`
pub(crate) struct FaultInput {
    pub domain: Option<Expr>,
    pub patch: Option<Expr>,
}

fn parse_domain(input: ParseStream) -> syn::Result<Option<Expr>> {
    if !input.peek(Token![in]) {
        return Ok(None);
    }
    input.parse::<Token![in]>()?;
    let domain: Expr = input.parse()?;
    Ok(Some(domain))
}

fn parse_patch(input: ParseStream) -> syn::Result<Option<Expr>> {
    if input.is_empty() {
        return Ok(None);
    }
    let patch: Expr = input.parse()?;
    if input.peek(Token![,]) {
        input.parse::<Token![,]>()?;
    }
    if !input.is_empty() {
        return Err(input.error("unexpected tokens after the builder patch"));
    }
    Ok(Some(patch))
}

impl Parse for CheckInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let domain = parse_domain(input)?;
        if domain.is_some() {
            input.parse::<Token![;]>()?;
        }
        if input.is_empty() {
            return Err(input.error("expected an expression to classify"));
        }
        let subject: Expr = input.parse()?;
        let patch = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            parse_patch(input)?
        } else if input.is_empty() {
            None
        } else {
            return Err(input.error("expected `,` or the end of the arguments"));
        };
        Ok(Self {
            domain,
            subject,
            patch,
        })
    }
}

impl Parse for FaultInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let domain = parse_domain(input)?;
        if domain.is_some() && (input.peek(Token![;]) || input.peek(Token![,])) {
            if input.peek(Token![;]) {
                input.parse::<Token![;]>()?;
            } else {
                input.parse::<Token![,]>()?;
            }
        }
        let patch = parse_patch(input)?;
        Ok(Self { domain, patch })
    }
}
