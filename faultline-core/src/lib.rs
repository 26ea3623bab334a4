//! Composition engine and classification protocol for error domains
//!
//! An error domain decides, at a call site, whether a value is an error and
//! what to return when it is. Domains are built from small layers:
//!
//! - **Policy layers** classify values ([`PolicyLayer`]).
//! - **Builder layers** construct the value returned on error
//!   ([`BuilderLayer`]).
//! - **Annotations** configure both ([`Annotations`]).
//!
//! Layers stack through [`Domain::with`]; each hook is offered to the most
//! recently added layer first and falls through to earlier ones, ending at the
//! traits implemented on the value itself ([`Verify`], [`Attempt`],
//! [`Target`]). All dispatch is resolved during monomorphization.
//!
//! # Example
//!
//! ```rust
//! use faultline_core::{Accepted, Domain};
//!
//! let domain = Domain::new();
//! assert!(matches!(domain.verify(&true), Accepted::Value(())));
//! assert!(matches!(domain.attempt(Some(3)), Accepted::Value(3)));
//! assert!(domain.attempt(None::<u8>).is_error());
//! ```
//!
//! This crate has no policy of its own; see `faultline-domain` for the
//! standard extensions and `faultline-api` for the macros.

#![warn(missing_docs)]

pub mod acceptor;
pub mod annotations;
pub mod builder;
pub mod cast;
pub mod compose;
pub mod context;
pub mod culprit;
pub mod error;
pub mod layer;
pub mod operand;
pub mod returning;
pub mod subject;
pub mod target;

#[cfg(test)]
mod testing;

pub use acceptor::{
    Accepted, Acceptor, Attempt, BoolAcceptor, OptionAcceptor, PointerAcceptor, ResultAcceptor,
    TryAcceptor, Verify,
};
pub use annotations::{Annotations, GetAll, Key, Lookup};
pub use builder::{Builder, ErrorMaker};
pub use compose::{Annotated, Domain, Extension};
pub use context::{function_path, Context, Location, LocationId, MacroKind, RelOp, Relation};
pub use culprit::{Culprit, IntoCulprit, Unknown};
pub use error::{CoreError, Result};
pub use layer::{
    subject_as, BuilderLayer, Contains, Here, Hook, InInner, InOuter, PolicyCx, PolicyLayer, Stack,
};
pub use returning::{ReturnConfig, ReturnKey, ReturnKind, ReturnMode};
pub use subject::Verifier;
pub use target::Target;
