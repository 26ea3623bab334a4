//! Returning the culprit itself
//!
//! When the culprit already has the type the call site returns, the returned
//! error is a clone of the culprit. `verify!(load())` in a function returning
//! `Result<_, LoadError>` then hands the `LoadError` back unchanged.

use faultline_core::{BuilderLayer, Domain, ErrorMaker, Hook};
use std::any::{Any, TypeId};

/// Builder layer that passes same-typed culprits through
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl BuilderLayer for Passthrough {
    fn make_error(&self, maker: &dyn ErrorMaker, target: TypeId) -> Hook<Box<dyn Any>> {
        Hook::from_option(maker.culprit().cloned_as(target))
    }

    fn fill_error(&self, maker: &dyn ErrorMaker, out: &mut dyn Any) -> Hook<()> {
        if maker.culprit().clone_into(out) {
            Hook::Handled(())
        } else {
            Hook::Pass(())
        }
    }
}

/// Extension: pass same-typed culprits through
pub fn passthrough() -> Domain<(), Passthrough> {
    Domain::builder(Passthrough)
}
