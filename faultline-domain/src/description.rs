//! Free-form descriptions attached to errors
//!
//! A domain carries a policy description, a builder a builder description.
//! Each is the concatenation of every piece passed to `describe`, in the order
//! the pieces were added.

use faultline_core::{
    Annotated, Builder, BuilderLayer, Contains, Domain, ErrorMaker, Key, PolicyLayer,
};
use std::fmt::Display;

/// Builder layer that enables `describe`
#[derive(Debug, Clone, Copy, Default)]
pub struct Describe;

impl BuilderLayer for Describe {}

/// Extension: `describe` on domains and builders
pub fn description() -> Domain<(), Describe> {
    Domain::builder(Describe)
}

/// Annotation holding one piece of a domain's description
pub struct PolicyDescription;

impl Key for PolicyDescription {
    type Value = String;
}

/// Annotation holding one piece of a builder's description
pub struct BuilderDescription;

impl Key for BuilderDescription {
    type Value = String;
}

fn concat<K: Key<Value = String>>(maker: &dyn ErrorMaker) -> String {
    let mut pieces: Vec<&str> = maker
        .annotations()
        .get_all::<K>()
        .map(String::as_str)
        .collect();
    pieces.reverse();
    pieces.concat()
}

/// The domain description seen by a builder
pub fn policy_description(maker: &dyn ErrorMaker) -> String {
    concat::<PolicyDescription>(maker)
}

/// The builder's own description
pub fn builder_description(maker: &dyn ErrorMaker) -> String {
    concat::<BuilderDescription>(maker)
}

/// `describe` knob
///
/// `I` is inferred; it locates [`Describe`] in the builder stack.
pub trait DescribeConfig<I>: Sized {
    /// Append `text` to the description
    fn describe(self, text: impl Display) -> Self;
}

impl<P, B, I> DescribeConfig<I> for Domain<P, B>
where
    P: PolicyLayer,
    B: BuilderLayer + Contains<Describe, I>,
{
    fn describe(self, text: impl Display) -> Self {
        self.annotate::<PolicyDescription>(text.to_string())
    }
}

impl<P, B, I> DescribeConfig<I> for Builder<'_, P, B>
where
    P: PolicyLayer,
    B: BuilderLayer + Contains<Describe, I>,
{
    fn describe(self, text: impl Display) -> Self {
        self.annotate::<BuilderDescription>(text.to_string())
    }
}
