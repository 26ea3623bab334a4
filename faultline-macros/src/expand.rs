//! Code generation for the error macros
//!
//! Every expansion is a block that
//!
//! - declares a per-call-site static whose address identifies the site,
//! - declares a nested `fn` whose type name yields the enclosing function,
//! - borrows the domain (`error_domain()` unless `in DOMAIN;` is given) as a
//!   `match` scrutinee, so temporaries in the domain expression outlive the
//!   check,
//! - classifies the subject and, on error, creates a builder, applies the
//!   patch and returns `build_error()` from the enclosing function.
//!
//! Locals use mixed-site hygiene so they cannot capture user names.

use crate::input::{CheckInput, FaultInput};
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::{BinOp, Expr};

#[derive(Clone, Copy)]
pub(crate) enum Kind {
    Verify,
    Attempt,
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::Verify => "verify",
            Kind::Attempt => "attempt",
        }
    }

    fn macro_kind(self) -> TokenStream {
        match self {
            Kind::Verify => quote!(::faultline_api::__private::MacroKind::Verify),
            Kind::Attempt => quote!(::faultline_api::__private::MacroKind::Try),
        }
    }
}

struct Locals {
    site: Ident,
    here: Ident,
    domain: Ident,
    culprit: Ident,
    builder: Ident,
    value: Ident,
    left: Ident,
    right: Ident,
    verdict: Ident,
    relation: Ident,
}

impl Locals {
    fn new() -> Self {
        let ident = |name: &str| Ident::new(name, Span::mixed_site());
        Self {
            site: ident("__FAULTLINE_SITE"),
            here: ident("__faultline_here"),
            domain: ident("__domain"),
            culprit: ident("__culprit"),
            builder: ident("__builder"),
            value: ident("__value"),
            left: ident("__left"),
            right: ident("__right"),
            verdict: ident("__verdict"),
            relation: ident("__relation"),
        }
    }
}

fn domain_expr(domain: Option<&Expr>) -> TokenStream {
    match domain {
        Some(domain) => quote!(#domain),
        None => {
            let name = Ident::new("error_domain", Span::call_site());
            quote!(#name())
        }
    }
}

fn site_items(locals: &Locals) -> TokenStream {
    let Locals { site, here, .. } = locals;
    quote! {
        static #site: u8 = 0;
        fn #here() {}
    }
}

fn context(
    locals: &Locals,
    macro_kind: TokenStream,
    name: &str,
    args: TokenStream,
    culprit: TokenStream,
    relation: TokenStream,
) -> TokenStream {
    let Locals { site, here, .. } = locals;
    quote! {
        ::faultline_api::__private::Context::new(
            ::faultline_api::__private::Location {
                file: ::core::file!(),
                line: ::core::line!(),
                column: ::core::column!(),
                id: ::faultline_api::__private::LocationId::from_static(&#site),
            },
            ::faultline_api::__private::function_path(
                ::core::any::type_name_of_val(&#here),
            ),
            #macro_kind,
            #name,
            #args,
        )
        .with_culprit(#culprit)
        .with_relation(#relation)
    }
}

fn apply_patch(locals: &Locals, patch: Option<&Expr>) -> TokenStream {
    let builder = &locals.builder;
    match patch {
        Some(patch) => quote! {
            let #builder = ::faultline_api::__private::patch(#builder, #patch);
        },
        None => TokenStream::new(),
    }
}

/// The error arm shared by `verify!` and `attempt!`
fn error_arm(
    locals: &Locals,
    kind: Kind,
    args: &TokenStream,
    relation: TokenStream,
    patch: Option<&Expr>,
) -> TokenStream {
    let Locals {
        domain,
        culprit,
        builder,
        ..
    } = locals;
    let ctx = context(
        locals,
        kind.macro_kind(),
        kind.name(),
        args.clone(),
        quote!(#culprit),
        relation,
    );
    let patch = apply_patch(locals, patch);
    quote! {
        let #builder = #domain.error_builder(#ctx);
        #patch
        return #builder.build_error();
    }
}

fn rel_op(op: &BinOp) -> Option<TokenStream> {
    let variant = match op {
        BinOp::Eq(_) => quote!(Eq),
        BinOp::Ne(_) => quote!(Ne),
        BinOp::Lt(_) => quote!(Lt),
        BinOp::Le(_) => quote!(Le),
        BinOp::Gt(_) => quote!(Gt),
        BinOp::Ge(_) => quote!(Ge),
        _ => return None,
    };
    Some(quote!(::faultline_api::__private::RelOp::#variant))
}

/// Strip invisible groups left by `macro_rules!` forwarding
fn ungroup(expr: &Expr) -> &Expr {
    match expr {
        Expr::Group(group) => ungroup(&group.expr),
        other => other,
    }
}

pub(crate) fn check(kind: Kind, input: CheckInput) -> TokenStream {
    let CheckInput {
        domain: domain_arg,
        subject,
        patch,
    } = input;
    let locals = Locals::new();
    let items = site_items(&locals);
    let domain_value = domain_expr(domain_arg.as_ref());
    let args = quote!(::core::stringify!(#subject));
    let Locals {
        domain,
        culprit,
        value,
        verdict,
        ..
    } = &locals;

    let body = match (kind, ungroup(&subject)) {
        (Kind::Verify, Expr::Binary(binary)) if rel_op(&binary.op).is_some() => {
            relational(&locals, &args, binary, patch.as_ref())
        }
        (Kind::Verify, _) => {
            let on_error = error_arm(&locals, kind, &args, quote!(None), patch.as_ref());
            quote! {
                let #verdict = {
                    use ::faultline_api::__private::{VerifyDirect as _, VerifyViaAttempt as _};
                    (&::faultline_api::__private::Subject(&(#subject))).verify_with(#domain)
                };
                match #verdict {
                    ::faultline_api::__private::Accepted::Value(()) => {}
                    ::faultline_api::__private::Accepted::Error(#culprit) => { #on_error }
                }
            }
        }
        (Kind::Attempt, _) => {
            let on_error = error_arm(&locals, kind, &args, quote!(None), patch.as_ref());
            quote! {
                match #domain.attempt(#subject) {
                    ::faultline_api::__private::Accepted::Value(#value) => #value,
                    ::faultline_api::__private::Accepted::Error(#culprit) => { #on_error }
                }
            }
        }
    };

    quote! {
        {
            #items
            match &(#domain_value) {
                #domain => { #body }
            }
        }
    }
}

/// `verify!(L op R)`: operands are evaluated once, in order, and compared by
/// reference; they are rendered only if the check fails and the domain
/// decomposes.
fn relational(
    locals: &Locals,
    args: &TokenStream,
    binary: &syn::ExprBinary,
    patch: Option<&Expr>,
) -> TokenStream {
    let Locals {
        domain,
        culprit,
        left,
        right,
        verdict,
        relation,
        ..
    } = locals;
    let (lhs, rhs, op) = (&binary.left, &binary.right, &binary.op);
    let tag = rel_op(op).unwrap_or_default();
    let on_error = error_arm(locals, Kind::Verify, args, quote!(#relation), patch);
    quote! {
        match (&(#lhs), &(#rhs)) {
            (#left, #right) => {
                let #verdict: bool = *#left #op *#right;
                match #domain.verify(&#verdict) {
                    ::faultline_api::__private::Accepted::Value(()) => {}
                    ::faultline_api::__private::Accepted::Error(#culprit) => {
                        let #relation = if #domain.decomposes() {
                            #[allow(unused_imports)]
                            use ::faultline_api::__private::{RenderDebug as _, RenderFallback as _};
                            ::faultline_api::__private::Relation::from_parts(
                                (&::faultline_api::__private::Operand(#left)).render_operand(),
                                #tag,
                                (&::faultline_api::__private::Operand(#right)).render_operand(),
                            )
                        } else {
                            ::core::option::Option::None
                        };
                        #on_error
                    }
                }
            }
        }
    }
}

pub(crate) fn fault(input: FaultInput) -> TokenStream {
    let FaultInput {
        domain: domain_arg,
        patch,
    } = input;
    let locals = Locals::new();
    let items = site_items(&locals);
    let domain_value = domain_expr(domain_arg.as_ref());
    let ctx = context(
        &locals,
        quote!(::faultline_api::__private::MacroKind::Error),
        "fault",
        quote!(""),
        quote!(::faultline_api::__private::Culprit::unknown()),
        quote!(::core::option::Option::None),
    );
    let patch = apply_patch(&locals, patch.as_ref());
    let Locals {
        domain, builder, ..
    } = &locals;
    quote! {
        {
            #items
            match &(#domain_value) {
                #domain => {
                    let #builder = #domain.error_builder(#ctx);
                    #patch
                    #builder.build_error()
                }
            }
        }
    }
}
