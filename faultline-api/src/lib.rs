//! Composable error domains for Rust
//!
//! An error domain decides whether a value is an error and what a function
//! returns when it is. Call sites use three macros:
//!
//! - [`verify!`] checks a value and returns the error from the enclosing
//!   function,
//! - [`attempt!`] does the same and evaluates to the extracted value,
//! - [`fault!`] builds an error value unconditionally.
//!
//! Each macro uses `error_domain()` from the call site's scope unless an
//! explicit domain is given with `in DOMAIN;`. The prelude brings a default
//! [`error_domain()`] built from [`standard()`]; define your own function of
//! that name to override it.
//!
//! ```
//! use faultline_api::prelude::*;
//!
//! fn parse_port(text: &str) -> Result<u16, Status> {
//!     let port = attempt!(text.parse::<u16>().ok(), |b| b.error_code(Code::InvalidArgument));
//!     verify!(port >= 1024, |b| b.error_code(Code::PermissionDenied));
//!     Ok(port)
//! }
//!
//! assert_eq!(parse_port("8080"), Ok(8080));
//! assert_eq!(parse_port("http").unwrap_err().code(), Code::InvalidArgument);
//!
//! let err = parse_port("80").unwrap_err();
//! assert_eq!(err.code(), Code::PermissionDenied);
//! assert!(err.message().ends_with("verify!(port >= 1024)\nSame as: verify!(80 >= 1024)"));
//! ```
//!
//! Domains are values composed from extensions:
//!
//! ```
//! use faultline_api::prelude::*;
//!
//! let domain = Domain::new()
//!     .with((passthrough(), print(), status()))
//!     .default_error_code(Code::Internal);
//! # let _ = domain;
//! ```

#![warn(missing_docs)]

extern crate self as faultline_api;

use std::sync::LazyLock;

pub use faultline_macros::{attempt, fault, verify};

pub use faultline_core::{
    Accepted, Acceptor, Annotated, Annotations, Attempt, BoolAcceptor, Builder, BuilderLayer,
    Context, Culprit, Domain, ErrorMaker, Hook, IntoCulprit, Key, Location, MacroKind,
    OptionAcceptor, PointerAcceptor, PolicyCx, PolicyLayer, RelOp, Relation, ResultAcceptor,
    ReturnConfig, Stack, Target, TryAcceptor, Unknown, Verifier, Verify,
};
pub use faultline_domain::{
    description, forward, logging, passthrough, print, print_operands, standard, status, tee,
    Code, ConfigError, DescribeConfig, DomainConfig, Filter, ForwardConfig, Logger,
    LoggingConfig, PrintConfig, PrintOperandsConfig, Standard, Status, StatusConfig, TeeConfig,
};

static STANDARD: LazyLock<Standard> = LazyLock::new(standard);

/// The default domain: [`standard()`] with no knobs set
pub fn error_domain() -> &'static Standard {
    &STANDARD
}

/// Everything call sites need
pub mod prelude {
    pub use crate::error_domain;
    pub use faultline_core::{Annotated, Domain, ReturnConfig, Target};
    pub use faultline_domain::{
        description, forward, logging, passthrough, print, print_operands, standard, status, tee,
        Code, DescribeConfig, Filter, ForwardConfig, Logger, LoggingConfig, PrintConfig,
        PrintOperandsConfig, Status, StatusConfig, TeeConfig,
    };
    pub use faultline_macros::{attempt, fault, verify};
}

#[doc(hidden)]
pub mod __private {
    pub use faultline_core::operand::{Operand, RenderDebug, RenderFallback};
    pub use faultline_core::subject::{Subject, VerifyDirect, VerifyViaAttempt};
    pub use faultline_core::{
        function_path, Accepted, Context, Culprit, Location, LocationId, MacroKind, RelOp,
        Relation,
    };

    /// Apply a builder patch; the bound lets closures infer their argument
    pub fn patch<B, R>(builder: B, f: impl FnOnce(B) -> R) -> R {
        f(builder)
    }
}
