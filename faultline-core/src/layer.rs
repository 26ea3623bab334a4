//! Layers and hook resolution
//!
//! A layer is a zero-sized type that plugs into one side of a domain: a
//! [`PolicyLayer`] takes part in classification, a [`BuilderLayer`] in result
//! construction. Every hook has a default implementation that passes, so a
//! layer only implements the hooks and the types it cares about.
//!
//! Layers nest through [`Stack`]. A stack offers each hook call to its outer
//! layer first and hands it to the inner layer when the outer one passes,
//! which makes fallback transitive through any depth. `()` is the empty layer
//! and passes everything.

use crate::acceptor::{Accepted, Attempt, Verify};
use crate::annotations::{Annotations, Lookup};
use crate::builder::ErrorMaker;
use crate::culprit::Culprit;
use std::any::{Any, TypeId};
use std::marker::PhantomData;

/// Outcome of offering a hook call to one layer
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hook<T, P = ()> {
    /// The layer handled the call
    Handled(T),
    /// The layer passed; carries back whatever the next layer needs
    Pass(P),
}

impl<T, P> Hook<T, P> {
    /// Offer the call to the next layer if this one passed
    pub fn or_else(self, next: impl FnOnce(P) -> Hook<T, P>) -> Hook<T, P> {
        match self {
            Hook::Handled(out) => Hook::Handled(out),
            Hook::Pass(rest) => next(rest),
        }
    }

    /// Whether a layer handled the call
    pub fn is_handled(&self) -> bool {
        matches!(self, Hook::Handled(_))
    }

    /// The handled value, if any
    pub fn handled(self) -> Option<T> {
        match self {
            Hook::Handled(out) => Some(out),
            Hook::Pass(_) => None,
        }
    }
}

impl<T> Hook<T> {
    /// `Handled` for `Some`, `Pass` for `None`
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(out) => Hook::Handled(out),
            None => Hook::Pass(()),
        }
    }
}

/// What a policy layer sees of the domain it is part of
#[derive(Clone, Copy)]
pub struct PolicyCx<'a> {
    annotations: &'a Annotations,
}

impl<'a> PolicyCx<'a> {
    /// Context over a domain's store
    pub fn new(annotations: &'a Annotations) -> Self {
        Self { annotations }
    }

    /// The domain's annotations
    pub fn annotations(&self) -> Lookup<'a> {
        Lookup::single(self.annotations)
    }
}

/// Borrow a classified value as a concrete type
///
/// Layers use this to recognize the types they own; the test folds to a
/// constant after monomorphization.
pub fn subject_as<T: 'static, X: 'static>(subject: &T) -> Option<&X> {
    (subject as &dyn Any).downcast_ref::<X>()
}

/// Policy side of a layer
pub trait PolicyLayer: Copy + Default + Send + Sync + 'static {
    /// Classify a borrowed value for `verify!`
    fn verify<T: Verify>(&self, cx: PolicyCx<'_>, subject: &T) -> Hook<Accepted<()>> {
        let _ = (cx, subject);
        Hook::Pass(())
    }

    /// Classify and unwrap an owned value for `attempt!`
    ///
    /// A layer that does not handle `T` gives the value back.
    fn attempt<T: Attempt>(&self, cx: PolicyCx<'_>, subject: T) -> Hook<Accepted<T::Value>, T> {
        let _ = cx;
        Hook::Pass(subject)
    }

    /// Whether failed comparisons should be split into rendered operands
    fn decomposes(&self, cx: PolicyCx<'_>) -> Hook<bool> {
        let _ = cx;
        Hook::Pass(())
    }
}

/// Builder side of a layer
///
/// Builder hooks work on type ids so that stored callbacks can reach them
/// through `&dyn ErrorMaker` without knowing the concrete builder.
pub trait BuilderLayer: Copy + Default + Send + Sync + 'static {
    /// Make a value of type `target` from the builder's culprit
    fn make_error(&self, maker: &dyn ErrorMaker, target: TypeId) -> Hook<Box<dyn Any>> {
        let _ = (maker, target);
        Hook::Pass(())
    }

    /// Fill a caller-supplied output in place
    fn fill_error(&self, maker: &dyn ErrorMaker, out: &mut dyn Any) -> Hook<()> {
        let _ = (maker, out);
        Hook::Pass(())
    }

    /// Render a culprit for messages
    fn render(&self, maker: &dyn ErrorMaker, culprit: &Culprit) -> Hook<String> {
        let _ = (maker, culprit);
        Hook::Pass(())
    }

    /// See the final return value before it leaves the builder
    ///
    /// Unlike the other hooks this one is not first-wins: every layer observes,
    /// outer layers first.
    fn observe(&self, maker: &dyn ErrorMaker, ret: &dyn Any) {
        let _ = (maker, ret);
    }
}

impl PolicyLayer for () {}

impl BuilderLayer for () {}

/// Two layers, `Outer` consulted before `Inner`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stack<Outer, Inner>(pub Outer, pub Inner);

impl<O: PolicyLayer, I: PolicyLayer> PolicyLayer for Stack<O, I> {
    fn verify<T: Verify>(&self, cx: PolicyCx<'_>, subject: &T) -> Hook<Accepted<()>> {
        self.0
            .verify(cx, subject)
            .or_else(|()| self.1.verify(cx, subject))
    }

    fn attempt<T: Attempt>(&self, cx: PolicyCx<'_>, subject: T) -> Hook<Accepted<T::Value>, T> {
        self.0
            .attempt(cx, subject)
            .or_else(|subject| self.1.attempt(cx, subject))
    }

    fn decomposes(&self, cx: PolicyCx<'_>) -> Hook<bool> {
        self.0.decomposes(cx).or_else(|()| self.1.decomposes(cx))
    }
}

impl<O: BuilderLayer, I: BuilderLayer> BuilderLayer for Stack<O, I> {
    fn make_error(&self, maker: &dyn ErrorMaker, target: TypeId) -> Hook<Box<dyn Any>> {
        self.0
            .make_error(maker, target)
            .or_else(|()| self.1.make_error(maker, target))
    }

    fn fill_error(&self, maker: &dyn ErrorMaker, out: &mut dyn Any) -> Hook<()> {
        match self.0.fill_error(maker, out) {
            Hook::Handled(()) => Hook::Handled(()),
            Hook::Pass(()) => self.1.fill_error(maker, out),
        }
    }

    fn render(&self, maker: &dyn ErrorMaker, culprit: &Culprit) -> Hook<String> {
        self.0
            .render(maker, culprit)
            .or_else(|()| self.1.render(maker, culprit))
    }

    fn observe(&self, maker: &dyn ErrorMaker, ret: &dyn Any) {
        self.0.observe(maker, ret);
        self.1.observe(maker, ret);
    }
}

/// Position marker: the layer itself
pub struct Here;

/// Position marker: inside the outer half of a [`Stack`]
pub struct InOuter<I>(PhantomData<I>);

/// Position marker: inside the inner half of a [`Stack`]
pub struct InInner<I>(PhantomData<I>);

/// Compile-time proof that a layer stack contains layer `L`
///
/// `Index` is inferred and only disambiguates the impls. Extension traits
/// bound on this to make their configuration methods available exactly when
/// their layer is installed.
pub trait Contains<L, Index> {}

impl<L> Contains<L, Here> for L {}

impl<L, O, I, Index> Contains<L, InOuter<Index>> for Stack<O, I> where O: Contains<L, Index> {}

impl<L, O, I, Index> Contains<L, InInner<Index>> for Stack<O, I> where I: Contains<L, Index> {}
