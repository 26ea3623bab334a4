//! Domain composition
//!
//! A [`Domain`] is a policy layer stack, a builder layer stack and an
//! annotation store. Domains are composed with [`Domain::with`]: the
//! extension's layers are stacked on top of the base's, so they are consulted
//! first, and the extension's annotations are merged after the base's, so they
//! shadow them.
//!
//! `with` accepts another domain, `()` or a tuple of up to eight extensions.
//! Tuples are applied left to right, which makes
//! `base.with((a, b))` the same type and the same store as
//! `base.with(a).with(b)`.

use crate::acceptor::{Accepted, Attempt, Verify};
use crate::annotations::{Annotations, Key};
use crate::builder::Builder;
use crate::context::Context;
use crate::layer::{BuilderLayer, Hook, PolicyCx, PolicyLayer, Stack};
use std::borrow::Cow;

/// A composed error domain
#[derive(Clone, Default, Debug)]
pub struct Domain<P = (), B = ()> {
    policy: P,
    builder: B,
    annotations: Annotations,
}

impl Domain {
    /// The empty domain: no layers, no annotations
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: PolicyLayer> Domain<P, ()> {
    /// Domain fragment with only a policy layer
    pub fn policy(policy: P) -> Self {
        Self::from_layers(policy, ())
    }
}

impl<B: BuilderLayer> Domain<(), B> {
    /// Domain fragment with only a builder layer
    pub fn builder(builder: B) -> Self {
        Self::from_layers((), builder)
    }
}

impl<P: PolicyLayer, B: BuilderLayer> Domain<P, B> {
    /// Domain with the given layers and an empty store
    pub fn from_layers(policy: P, builder: B) -> Self {
        Self {
            policy,
            builder,
            annotations: Annotations::new(),
        }
    }

    /// Compose with `extension`
    pub fn with<E: Extension<P, B>>(self, extension: E) -> Domain<E::Policy, E::Builder> {
        extension.extend(self)
    }

    /// The domain's own annotations
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// The policy layer stack
    pub fn policy_layer(&self) -> &P {
        &self.policy
    }

    /// The builder layer stack
    pub fn builder_layer(&self) -> &B {
        &self.builder
    }

    fn cx(&self) -> PolicyCx<'_> {
        PolicyCx::new(&self.annotations)
    }

    /// Classify a borrowed value
    ///
    /// Policy layers are asked first; the value's own [`Verify`] impl is the
    /// fallback.
    pub fn verify<T: Verify>(&self, subject: &T) -> Accepted<()> {
        match self.policy.verify(self.cx(), subject) {
            Hook::Handled(accepted) => accepted,
            Hook::Pass(()) => Accepted::check(subject.verify()),
        }
    }

    /// Classify an owned value and extract its success value
    pub fn attempt<T: Attempt>(&self, subject: T) -> Accepted<T::Value> {
        match self.policy.attempt(self.cx(), subject) {
            Hook::Handled(accepted) => accepted,
            Hook::Pass(subject) => Accepted::extract(subject.attempt()),
        }
    }

    /// Whether failed comparisons are split into rendered operands
    pub fn decomposes(&self) -> bool {
        self.policy.decomposes(self.cx()).handled().unwrap_or(false)
    }

    /// Builder borrowing this domain
    pub fn error_builder(&self, context: Context) -> Builder<'_, P, B> {
        Builder::new(Cow::Borrowed(self), context)
    }

    /// Builder owning this domain
    pub fn into_error_builder(self, context: Context) -> Builder<'static, P, B> {
        Builder::new(Cow::Owned(self), context)
    }
}

/// Something [`Domain::with`] can compose onto a `Domain<P, B>`
pub trait Extension<P, B> {
    /// Resulting policy stack
    type Policy: PolicyLayer;
    /// Resulting builder stack
    type Builder: BuilderLayer;

    /// Compose onto `base`
    fn extend(self, base: Domain<P, B>) -> Domain<Self::Policy, Self::Builder>;
}

impl<P, B, P2, B2> Extension<P, B> for Domain<P2, B2>
where
    P: PolicyLayer,
    B: BuilderLayer,
    P2: PolicyLayer,
    B2: BuilderLayer,
{
    type Policy = Stack<P2, P>;
    type Builder = Stack<B2, B>;

    fn extend(self, base: Domain<P, B>) -> Domain<Self::Policy, Self::Builder> {
        Domain {
            policy: Stack(self.policy, base.policy),
            builder: Stack(self.builder, base.builder),
            annotations: Annotations::merge([base.annotations, self.annotations]),
        }
    }
}

impl<P: PolicyLayer, B: BuilderLayer> Extension<P, B> for () {
    type Policy = P;
    type Builder = B;

    fn extend(self, base: Domain<P, B>) -> Domain<P, B> {
        base
    }
}

macro_rules! tuple_extension {
    () => {};
    ($first:ident $(, $rest:ident)*) => {
        impl<P, B, $first, $($rest,)*> Extension<P, B> for ($first, $($rest,)*)
        where
            P: PolicyLayer,
            B: BuilderLayer,
            $first: Extension<P, B>,
            ($($rest,)*): Extension<
                <$first as Extension<P, B>>::Policy,
                <$first as Extension<P, B>>::Builder,
            >,
        {
            type Policy = <($($rest,)*) as Extension<
                <$first as Extension<P, B>>::Policy,
                <$first as Extension<P, B>>::Builder,
            >>::Policy;
            type Builder = <($($rest,)*) as Extension<
                <$first as Extension<P, B>>::Policy,
                <$first as Extension<P, B>>::Builder,
            >>::Builder;

            #[allow(non_snake_case)]
            fn extend(self, base: Domain<P, B>) -> Domain<Self::Policy, Self::Builder> {
                let ($first, $($rest,)*) = self;
                ($($rest,)*).extend($first.extend(base))
            }
        }

        tuple_extension!($($rest),*);
    };
}

tuple_extension!(E1, E2, E3, E4, E5, E6, E7, E8);

/// Values that carry an annotation store: domains and builders
///
/// Extension crates implement their configuration traits over this, bounded
/// on [`Contains`](crate::layer::Contains) so the methods only exist where
/// their layer is installed.
pub trait Annotated: Sized {
    /// Policy stack of the underlying domain
    type Policy: PolicyLayer;
    /// Builder stack of the underlying domain
    type Builder: BuilderLayer;

    /// Replace the store with `f(store)`
    fn map_annotations(self, f: impl FnOnce(Annotations) -> Annotations) -> Self;

    /// Add a value for `K`
    fn annotate<K: Key>(self, value: K::Value) -> Self {
        self.map_annotations(|store| store.add::<K>(value))
    }

    /// Hide every value of `K` set so far
    fn unannotate<K: Key>(self) -> Self {
        self.map_annotations(|store| store.remove_all::<K>())
    }
}

impl<P: PolicyLayer, B: BuilderLayer> Annotated for Domain<P, B> {
    type Policy = P;
    type Builder = B;

    fn map_annotations(mut self, f: impl FnOnce(Annotations) -> Annotations) -> Self {
        self.annotations = f(self.annotations);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culprit::Culprit;
    use crate::layer::{subject_as, Contains};
    use std::any::TypeId;

    struct Name;
    impl Key for Name {
        type Value = &'static str;
    }

    #[derive(Debug, Clone, Copy, Default)]
    struct RejectNone;

    impl PolicyLayer for RejectNone {
        fn verify<T: Verify>(&self, _cx: PolicyCx<'_>, subject: &T) -> Hook<Accepted<()>> {
            match subject_as::<T, Option<i32>>(subject) {
                Some(Some(0)) => Hook::Handled(Accepted::Error(Culprit::new("zero"))),
                _ => Hook::Pass(()),
            }
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    struct Marker;
    impl BuilderLayer for Marker {}

    fn same_type<A: 'static, B: 'static>(_: &A, _: &B) -> bool {
        TypeId::of::<A>() == TypeId::of::<B>()
    }

    fn has_marker<D: Annotated<Builder = S>, S: Contains<Marker, I>, I>(_: &D) {}

    #[test]
    fn test_policy_layer_before_own_impl() {
        let domain = Domain::new().with(Domain::policy(RejectNone));
        assert!(domain.verify(&Some(0)).is_error());
        assert!(!domain.verify(&Some(1)).is_error());
        assert!(domain.verify(&None::<i32>).is_error());
        assert!(!domain.verify(&true).is_error());
        assert!(!domain.decomposes());
    }

    #[test]
    fn test_attempt_falls_back_to_own_impl() {
        let domain = Domain::new();
        assert!(matches!(domain.attempt(Some(4)), Accepted::Value(4)));
        let err: Result<u8, String> = Err("bad".into());
        assert!(domain.attempt(err).is_error());
    }

    #[test]
    fn test_with_tuple_matches_chained_with() {
        let a = Domain::policy(RejectNone).annotate::<Name>("a");
        let b = Domain::builder(Marker).annotate::<Name>("b");

        let chained = Domain::new().with(a.clone()).with(b.clone());
        let grouped = Domain::new().with((a, b));

        assert!(same_type(&chained, &grouped));
        let names = |d: &Annotations| d.get_all::<Name>().copied().collect::<Vec<_>>();
        assert_eq!(names(chained.annotations()), vec!["b", "a"]);
        assert_eq!(names(chained.annotations()), names(grouped.annotations()));
        has_marker(&grouped);
    }

    #[test]
    fn test_unit_extension_is_identity() {
        let domain = Domain::new().annotate::<Name>("x");
        let same = domain.clone().with(());
        assert!(same_type(&domain, &same));
        assert_eq!(same.annotations().get::<Name>(), Some(&"x"));
    }
}
