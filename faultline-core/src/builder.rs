//! Error builders
//!
//! A [`Builder`] is created on the error path of a macro call. It carries the
//! [`Context`] of the failure, its own annotation store (initially empty) and
//! the domain that produced it, whose store it sees as a secondary source.
//! [`Builder::build_error`] is the terminal step: it produces the value the
//! call site returns and lets every builder layer observe it exactly once.

use crate::annotations::{Annotations, Lookup};
use crate::compose::{Annotated, Domain};
use crate::context::Context;
use crate::culprit::Culprit;
use crate::error::CoreError;
use crate::layer::{BuilderLayer, PolicyLayer};
use crate::returning::ReturnKey;
use crate::target::Target;
use std::any::{type_name, Any, TypeId};
use std::borrow::Cow;
use std::fmt;

/// Object-safe view of a builder
///
/// Builder layers and stored callbacks only ever see a builder through this
/// trait, which lets them make errors of any [`Target`] type with
/// [`make`](trait.ErrorMaker.html#method.make) regardless of how the domain
/// was composed.
pub trait ErrorMaker {
    /// Context of the failure
    fn context(&self) -> &Context;

    /// Builder annotations followed by the domain's
    fn annotations(&self) -> Lookup<'_>;

    /// Offer `make_error` for `target` to the builder layers
    fn make_raw(&self, target: TypeId) -> Option<Box<dyn Any>>;

    /// Offer `fill_error` to the builder layers; `true` if one handled it
    fn fill_raw(&self, out: &mut dyn Any) -> bool;

    /// Culprit text from the builder layers, if any layer renders it
    fn render_culprit(&self) -> Option<String>;
}

impl dyn ErrorMaker + '_ {
    /// Culprit of the failure
    pub fn culprit(&self) -> &Culprit {
        &self.context().culprit
    }

    /// Make an `R`: builder layers first, then `R`'s own [`Target`] impl
    pub fn make<R: Target>(&self) -> R {
        if let Some(made) = self.make_raw(TypeId::of::<R>()) {
            match made.downcast::<R>() {
                Ok(made) => return *made,
                Err(_) => {
                    let err = CoreError::LayerTypeMismatch {
                        expected: type_name::<R>(),
                    };
                    tracing::warn!(error = %err, "ignoring builder layer output");
                }
            }
        }
        R::make_error(self)
    }

    /// Assign an error to `out`, letting builder layers fill it in place
    pub fn fill<R: Target>(&self, out: &mut R) {
        if !self.fill_raw(out) {
            *out = self.make::<R>();
        }
    }
}

/// Builder produced by a domain on the error path
pub struct Builder<'d, P: PolicyLayer = (), B: BuilderLayer = ()> {
    domain: Cow<'d, Domain<P, B>>,
    context: Context,
    annotations: Annotations,
}

impl<'d, P: PolicyLayer, B: BuilderLayer> Builder<'d, P, B> {
    pub(crate) fn new(domain: Cow<'d, Domain<P, B>>, context: Context) -> Self {
        Self {
            domain,
            context,
            annotations: Annotations::new(),
        }
    }

    /// Context of the failure
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Culprit of the failure
    pub fn culprit(&self) -> &Culprit {
        &self.context.culprit
    }

    /// Domain that produced this builder
    pub fn domain(&self) -> &Domain<P, B> {
        &self.domain
    }

    /// Builder annotations followed by the domain's
    pub fn annotations(&self) -> Lookup<'_> {
        Lookup::layered(&self.annotations, self.domain.annotations())
    }

    /// Make an error of type `R` from the culprit
    ///
    /// Ignores return modes and does not observe the result.
    pub fn make_error<R: Target>(&self) -> R {
        self.maker().make::<R>()
    }

    /// Assign an error to `out`
    pub fn fill_error<R: Target>(&self, out: &mut R) {
        self.maker().fill(out)
    }

    /// Produce the value the call site returns
    ///
    /// The configured return mode decides how the value is made; without one,
    /// or when the mode cannot produce an `R`, it is made with
    /// [`make_error`](Builder::make_error). Builder layers observe the value
    /// once before it is returned.
    pub fn build_error<R: Target>(self) -> R {
        tracing::trace!(
            location = %self.context.location,
            invocation = %self.context.invocation(),
            target = type_name::<R>(),
            "building error"
        );
        let ret = self.produce::<R>();
        self.observe(&ret);
        ret
    }

    /// Let every builder layer see `ret`, outer layers first
    pub fn observe(&self, ret: &dyn Any) {
        self.domain.builder_layer().observe(self.maker(), ret);
    }

    fn produce<R: Target>(&self) -> R {
        let Some(mode) = self.annotations().get::<ReturnKey>() else {
            return self.make_error();
        };
        match mode.produce::<R>(self.maker()) {
            Some(Ok(ret)) => ret,
            Some(Err(err)) => {
                tracing::warn!(error = %err, "falling back to the automatic return value");
                self.make_error()
            }
            None => self.make_error(),
        }
    }

    fn maker(&self) -> &dyn ErrorMaker {
        self
    }
}

impl<P: PolicyLayer, B: BuilderLayer> ErrorMaker for Builder<'_, P, B> {
    fn context(&self) -> &Context {
        &self.context
    }

    fn annotations(&self) -> Lookup<'_> {
        Lookup::layered(&self.annotations, self.domain.annotations())
    }

    fn make_raw(&self, target: TypeId) -> Option<Box<dyn Any>> {
        self.domain.builder_layer().make_error(self, target).handled()
    }

    fn fill_raw(&self, out: &mut dyn Any) -> bool {
        self.domain
            .builder_layer()
            .fill_error(self, out)
            .is_handled()
    }

    fn render_culprit(&self) -> Option<String> {
        self.domain
            .builder_layer()
            .render(self, &self.context.culprit)
            .handled()
    }
}

impl<P: PolicyLayer, B: BuilderLayer> Annotated for Builder<'_, P, B> {
    type Policy = P;
    type Builder = B;

    fn map_annotations(mut self, f: impl FnOnce(Annotations) -> Annotations) -> Self {
        self.annotations = f(self.annotations);
        self
    }
}

impl<P: PolicyLayer, B: BuilderLayer> fmt::Debug for Builder<'_, P, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("context", &self.context)
            .field("annotations", &self.annotations)
            .field("domain_annotations", self.domain.annotations())
            .finish()
    }
}
