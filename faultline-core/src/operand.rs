//! Rendering comparison operands
//!
//! `verify!` renders both sides of a failed comparison when the domain asks for
//! it. Operand types without a `Debug` impl are not an error: the call
//! resolves to [`RenderFallback`] through auto-ref and yields `None`, which
//! turns decomposition off for that comparison.
//!
//! ```
//! use faultline_core::operand::{Operand, RenderDebug, RenderFallback};
//!
//! struct Opaque;
//!
//! assert_eq!((&Operand(&5)).render_operand().as_deref(), Some("5"));
//! assert_eq!((&Operand(&Opaque)).render_operand(), None);
//! ```

use std::fmt;

/// Borrowed operand of a comparison
pub struct Operand<'a, T: ?Sized>(pub &'a T);

/// Rendering for operands with a `Debug` impl
pub trait RenderDebug {
    /// `Debug` text of the operand
    fn render_operand(&self) -> Option<String>;
}

impl<T: fmt::Debug + ?Sized> RenderDebug for Operand<'_, T> {
    fn render_operand(&self) -> Option<String> {
        Some(format!("{:?}", self.0))
    }
}

/// Rendering for everything else
pub trait RenderFallback {
    /// Always `None`
    fn render_operand(&self) -> Option<String>;
}

impl<T: ?Sized> RenderFallback for &Operand<'_, T> {
    fn render_operand(&self) -> Option<String> {
        None
    }
}
