//! Forwarding `attempt!`
//!
//! `domain.forward()` is a view of the domain for which `attempt!` evaluates
//! to its whole argument instead of the unwrapped value. Failures still
//! return from the enclosing function exactly as before.
//!
//! ```ignore
//! fn churn() -> Result<(), Status> {
//!     // `make()` returns Option<Widget>; consume takes the Option.
//!     consume(attempt!(in ERROR_DOMAIN.forward(); make()));
//!     Ok(())
//! }
//! ```
//!
//! The subject is classified through [`Domain::verify`], so any type the
//! domain can verify can be forwarded.

use faultline_core::{
    Accepted, Builder, BuilderLayer, Contains, Context, Domain, PolicyLayer, Verifier, Verify,
};

/// Policy layer that enables `forward()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Forward;

impl PolicyLayer for Forward {}

/// Extension: `forward()`
pub fn forward() -> Domain<Forward, ()> {
    Domain::policy(Forward)
}

/// A borrowed domain whose `attempt` yields the subject itself
#[derive(Debug, Clone, Copy)]
pub struct Forwarding<'d, P: PolicyLayer, B: BuilderLayer> {
    domain: &'d Domain<P, B>,
}

impl<'d, P: PolicyLayer, B: BuilderLayer> Forwarding<'d, P, B> {
    /// The wrapped domain
    pub fn domain(&self) -> &'d Domain<P, B> {
        self.domain
    }

    /// Classify a borrowed value, as the wrapped domain does
    pub fn verify<T: Verify>(&self, subject: &T) -> Accepted<()> {
        self.domain.verify(subject)
    }

    /// Classify `subject` and hand it back whole on success
    pub fn attempt<T: Verify>(&self, subject: T) -> Accepted<T> {
        match self.domain.verify(&subject) {
            Accepted::Value(()) => Accepted::Value(subject),
            Accepted::Error(culprit) => Accepted::Error(culprit),
        }
    }

    /// Whether failed comparisons are split into rendered operands
    pub fn decomposes(&self) -> bool {
        self.domain.decomposes()
    }

    /// Builder borrowing the wrapped domain
    pub fn error_builder(&self, context: Context) -> Builder<'d, P, B> {
        self.domain.error_builder(context)
    }
}

impl<P: PolicyLayer, B: BuilderLayer> Verifier for Forwarding<'_, P, B> {
    fn verify<T: Verify>(&self, subject: &T) -> Accepted<()> {
        self.domain.verify(subject)
    }
}

/// `forward` knob
pub trait ForwardConfig<I> {
    /// Policy layers of the domain
    type Policy: PolicyLayer;
    /// Builder layers of the domain
    type Builder: BuilderLayer;

    /// View of this domain whose `attempt` yields the subject itself
    fn forward(&self) -> Forwarding<'_, Self::Policy, Self::Builder>;
}

impl<P, B, I> ForwardConfig<I> for Domain<P, B>
where
    P: PolicyLayer + Contains<Forward, I>,
    B: BuilderLayer,
{
    type Policy = P;
    type Builder = B;

    fn forward(&self) -> Forwarding<'_, P, B> {
        Forwarding { domain: self }
    }
}
