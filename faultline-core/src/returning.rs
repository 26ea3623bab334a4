//! Return modes
//!
//! By default a builder makes the value its call site returns from the culprit.
//! A return mode replaces that step with a fixed value, `()`, or a callback.
//! Modes live under [`ReturnKey`]; the most recently set mode wins, whether it
//! was set on the domain or on the builder.

use crate::annotations::Key;
use crate::builder::ErrorMaker;
use crate::compose::Annotated;
use crate::error::{self, CoreError};
use crate::target::Target;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

type Produce = Arc<dyn Fn(&dyn ErrorMaker) -> Box<dyn Any> + Send + Sync>;

fn erase<F>(f: F) -> Produce
where
    F: Fn(&dyn ErrorMaker) -> Box<dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How a return value is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    /// Make the call site's return type from the culprit
    Auto,
    /// Clone a stored value
    Value,
    /// Produce `()`
    Void,
    /// Call a stored function
    Callback,
}

impl ReturnKind {
    /// Short name used in diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnKind::Auto => "auto",
            ReturnKind::Value => "value",
            ReturnKind::Void => "void",
            ReturnKind::Callback => "callback",
        }
    }
}

/// One configured way of producing a return value
#[derive(Clone)]
pub struct ReturnMode {
    kind: ReturnKind,
    produces: Option<(TypeId, &'static str)>,
    produce: Option<Produce>,
}

impl ReturnMode {
    /// Make the return value from the culprit
    pub fn auto() -> Self {
        Self {
            kind: ReturnKind::Auto,
            produces: None,
            produce: None,
        }
    }

    /// Return a clone of `value`
    pub fn value<T>(value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self::producing::<T>(
            ReturnKind::Value,
            erase(move |_: &dyn ErrorMaker| Box::new(value.clone()) as Box<dyn Any>),
        )
    }

    /// Return `()`
    pub fn void() -> Self {
        Self::producing::<()>(
            ReturnKind::Void,
            erase(|_: &dyn ErrorMaker| Box::new(()) as Box<dyn Any>),
        )
    }

    /// Return whatever `f` returns
    pub fn callback<T, F>(f: F) -> Self
    where
        T: 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::producing::<T>(
            ReturnKind::Callback,
            erase(move |_: &dyn ErrorMaker| Box::new(f()) as Box<dyn Any>),
        )
    }

    /// Make an `E` from the culprit and return whatever `f` makes of it
    pub fn map<E, T, F>(f: F) -> Self
    where
        E: Target,
        T: 'static,
        F: Fn(E) -> T + Send + Sync + 'static,
    {
        Self::producing::<T>(
            ReturnKind::Callback,
            erase(move |maker: &dyn ErrorMaker| {
                Box::new(f(maker.make::<E>())) as Box<dyn Any>
            }),
        )
    }

    fn producing<T: 'static>(kind: ReturnKind, produce: Produce) -> Self {
        Self {
            kind,
            produces: Some((TypeId::of::<T>(), type_name::<T>())),
            produce: Some(produce),
        }
    }

    /// Kind of this mode
    pub fn kind(&self) -> ReturnKind {
        self.kind
    }

    /// Check that this mode can produce an `R`
    pub fn check<R: Target>(&self) -> error::Result<()> {
        match self.produces {
            Some((id, produced)) if !R::accepts(id) => Err(CoreError::ReturnTypeMismatch {
                mode: self.kind.as_str(),
                produced,
                expected: type_name::<R>(),
            }),
            _ => Ok(()),
        }
    }

    /// Produce an `R`
    ///
    /// `None` for [`ReturnKind::Auto`]. A mode that cannot produce an `R` is
    /// reported without running its callback.
    pub fn produce<R: Target>(&self, maker: &dyn ErrorMaker) -> Option<error::Result<R>> {
        let produce = self.produce.as_ref()?;
        if let Err(err) = self.check::<R>() {
            return Some(Err(err));
        }
        Some(R::adopt(produce(maker)).map_err(|_| CoreError::ReturnTypeMismatch {
            mode: self.kind.as_str(),
            produced: self.produces.map_or("?", |(_, name)| name),
            expected: type_name::<R>(),
        }))
    }
}

impl fmt::Debug for ReturnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReturnMode")
            .field("kind", &self.kind)
            .field("produces", &self.produces.map(|(_, name)| name))
            .finish()
    }
}

/// Annotation holding the active [`ReturnMode`]
pub struct ReturnKey;

impl Key for ReturnKey {
    type Value = ReturnMode;
}

/// Return-mode knobs, available on every domain and builder
pub trait ReturnConfig: Annotated {
    /// Return a clone of `value`
    fn returning<T>(self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.annotate::<ReturnKey>(ReturnMode::value(value))
    }

    /// Return `()`
    fn returning_void(self) -> Self {
        self.annotate::<ReturnKey>(ReturnMode::void())
    }

    /// Return the result of `f()`
    fn returning_with<T, F>(self, f: F) -> Self
    where
        T: 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.annotate::<ReturnKey>(ReturnMode::callback(f))
    }

    /// Return the result of `f(error)`, with `error` made from the culprit
    fn returning_map<E, T, F>(self, f: F) -> Self
    where
        E: Target,
        T: 'static,
        F: Fn(E) -> T + Send + Sync + 'static,
    {
        self.annotate::<ReturnKey>(ReturnMode::map(f))
    }

    /// Go back to making the return value from the culprit
    fn auto_return(self) -> Self {
        self.annotate::<ReturnKey>(ReturnMode::auto())
    }
}

impl<T: Annotated> ReturnConfig for T {}
