//! Procedural macros for faultline
//!
//! Use these through `faultline-api`, which provides the support paths the
//! expansions refer to.
//!
//! - `verify!(expr)` returns from the enclosing function when `expr` is an
//!   error.
//! - `attempt!(expr)` does the same and otherwise evaluates to the value
//!   extracted from `expr`.
//! - `fault!()` evaluates to the error value unconditionally.
//!
//! All three take an optional `in DOMAIN;` prefix (default: `error_domain()`
//! at the call site) and an optional trailing builder patch.

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod expand;
mod input;

/// Classify an expression; return the error from the enclosing function
///
/// ```ignore
/// fn open(limit: usize, rows: usize) -> Result<(), Status> {
///     verify!(rows < limit, |b| b.error_code(Code::ResourceExhausted));
///     Ok(())
/// }
/// ```
///
/// Comparisons with `==`, `!=`, `<`, `>`, `<=` and `>=` at the top level are
/// decomposed: when the check fails and the domain asks for it, the rendered
/// operands are recorded in the error context.
#[proc_macro]
pub fn verify(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as input::CheckInput);
    expand::check(expand::Kind::Verify, input).into()
}

/// Classify an expression and extract its value; return the error otherwise
///
/// ```ignore
/// fn parse(text: &str) -> Result<u16, Status> {
///     let port = attempt!(text.parse::<u16>().ok());
///     Ok(port)
/// }
/// ```
#[proc_macro]
pub fn attempt(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as input::CheckInput);
    expand::check(expand::Kind::Attempt, input).into()
}

/// Build an error value at the call site
///
/// ```ignore
/// fn lookup(key: &str) -> Result<String, Status> {
///     return fault!(|b| b.error_code(Code::NotFound).describe(key));
/// }
/// ```
#[proc_macro]
pub fn fault(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as input::FaultInput);
    expand::fault(input).into()
}
