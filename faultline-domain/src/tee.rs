//! Fan-out sinks
//!
//! `tee(sink)` registers a sink that sees every error the domain or builder
//! returns. Sinks accumulate; on error they run newest first, each exactly
//! once. `no_tee()` drops every sink registered so far on the same domain or
//! builder.
//!
//! A sink is one of
//!
//! - `Fn()`, called with nothing,
//! - `Fn(E)`, called with an `E` made from the culprit,
//! - `Arc<Mutex<Option<E>>>`, which receives `Some(E)`.

use faultline_core::{Annotated, BuilderLayer, Contains, Domain, ErrorMaker, Key, Target};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type SinkFn = Arc<dyn Fn(&dyn ErrorMaker) + Send + Sync>;

/// A registered sink
#[derive(Clone)]
pub struct Sink {
    run: SinkFn,
}

impl Sink {
    fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn ErrorMaker) + Send + Sync + 'static,
    {
        Self { run: Arc::new(f) }
    }

    /// Feed the failure described by `maker` to the sink
    pub fn run(&self, maker: &dyn ErrorMaker) {
        (self.run)(maker)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sink")
    }
}

/// Shape marker for `Fn()` sinks
pub struct Notify;

/// Shape marker for `Fn(E)` sinks
pub struct Receive<E>(PhantomData<fn(E)>);

/// Shape marker for slot sinks
pub struct Store<E>(PhantomData<fn(E)>);

/// Values usable as sinks; `M` is inferred from the value's shape
pub trait IntoSink<M> {
    /// Convert into a [`Sink`]
    fn into_sink(self) -> Sink;
}

impl<F> IntoSink<Notify> for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn into_sink(self) -> Sink {
        Sink::new(move |_: &dyn ErrorMaker| self())
    }
}

impl<F, E> IntoSink<Receive<E>> for F
where
    F: Fn(E) + Send + Sync + 'static,
    E: Target,
{
    fn into_sink(self) -> Sink {
        Sink::new(move |maker: &dyn ErrorMaker| self(maker.make::<E>()))
    }
}

impl<E> IntoSink<Store<E>> for Arc<Mutex<Option<E>>>
where
    E: Target + Send,
{
    fn into_sink(self) -> Sink {
        Sink::new(move |maker: &dyn ErrorMaker| {
            let made = maker.make::<E>();
            *self.lock() = Some(made);
        })
    }
}

/// Annotation holding one sink
pub struct TeeKey;

impl Key for TeeKey {
    type Value = Sink;
}

/// Builder layer that runs sinks when the returned value is observed
#[derive(Debug, Clone, Copy, Default)]
pub struct Tee;

impl BuilderLayer for Tee {
    fn observe(&self, maker: &dyn ErrorMaker, _ret: &dyn Any) {
        for sink in maker.annotations().get_all::<TeeKey>() {
            sink.run(maker);
        }
    }
}

/// Extension: fan-out sinks
pub fn tee() -> Domain<(), Tee> {
    Domain::builder(Tee)
}

/// `tee` knobs
pub trait TeeConfig<I>: Annotated {
    /// Register a sink
    fn tee<M, S: IntoSink<M>>(self, sink: S) -> Self {
        self.annotate::<TeeKey>(sink.into_sink())
    }

    /// Drop every sink registered so far
    fn no_tee(self) -> Self {
        self.unannotate::<TeeKey>()
    }
}

impl<D, I> TeeConfig<I> for D
where
    D: Annotated,
    D::Builder: Contains<Tee, I>,
{
}
