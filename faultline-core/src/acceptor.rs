//! Classification protocol
//!
//! Classifying an expression produces an [`Acceptor`]. The engine asks it
//! [`Acceptor::is_error`] exactly once and then consumes it exactly once,
//! through [`Acceptor::culprit`] on the error path or [`TryAcceptor::value`] on
//! the success path of an extracting classification. Both consuming methods take
//! `self`, so no acceptor can be asked twice.
//!
//! [`Verify`] and [`Attempt`] are implemented by the classified types
//! themselves. They are the last resort of hook resolution: policy layers get
//! the first chance to classify a value, and only when every layer passes does
//! the engine fall back to the type's own impl.

use crate::culprit::{Culprit, IntoCulprit, Unknown};
use std::ptr::NonNull;

/// Result of one classification
pub trait Acceptor: Sized {
    /// Culprit produced on the error path
    type Culprit: IntoCulprit;

    /// Whether the classified value is an error
    fn is_error(&self) -> bool;

    /// Consume the acceptor on the error path
    fn culprit(self) -> Self::Culprit;
}

/// Acceptor that can also yield a value on the success path
pub trait TryAcceptor: Acceptor {
    /// Extracted value
    type Value;

    /// Consume the acceptor on the success path
    fn value(self) -> Self::Value;
}

/// Normalized classification outcome
#[derive(Debug, Clone)]
pub enum Accepted<V> {
    /// Success, with the extracted value
    Value(V),
    /// Failure, with the blamed value
    Error(Culprit),
}

impl Accepted<()> {
    /// Drive a checking acceptor through the protocol
    pub fn check<A: Acceptor>(acceptor: A) -> Self {
        if acceptor.is_error() {
            Accepted::Error(acceptor.culprit().into_culprit())
        } else {
            Accepted::Value(())
        }
    }
}

impl<V> Accepted<V> {
    /// Drive an extracting acceptor through the protocol
    pub fn extract<A: TryAcceptor<Value = V>>(acceptor: A) -> Self {
        if acceptor.is_error() {
            Accepted::Error(acceptor.culprit().into_culprit())
        } else {
            Accepted::Value(acceptor.value())
        }
    }

    /// Whether this is the error outcome
    pub fn is_error(&self) -> bool {
        matches!(self, Accepted::Error(_))
    }

    /// Convert into a standard `Result`
    pub fn into_result(self) -> Result<V, Culprit> {
        match self {
            Accepted::Value(value) => Ok(value),
            Accepted::Error(culprit) => Err(culprit),
        }
    }

    /// Map the success value
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Accepted<U> {
        match self {
            Accepted::Value(value) => Accepted::Value(f(value)),
            Accepted::Error(culprit) => Accepted::Error(culprit),
        }
    }
}

/// Types that `verify!` accepts
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be verified by an error domain",
    label = "no classification for this type",
    note = "implement `faultline_core::Verify` for `{Self}`, or compare it to get a `bool`"
)]
pub trait Verify: 'static {
    /// Acceptor borrowing the verified value
    type Acceptor<'a>: Acceptor
    where
        Self: 'a;

    /// Classify `self`
    fn verify(&self) -> Self::Acceptor<'_>;
}

/// Types that `attempt!` accepts
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be unwrapped by an error domain",
    label = "no extraction for this type",
    note = "implement `faultline_core::Attempt` for `{Self}`"
)]
pub trait Attempt: Sized + 'static {
    /// Value produced on success
    type Value: 'static;
    /// Acceptor owning the classified value
    type Acceptor: TryAcceptor<Value = Self::Value>;

    /// Classify `self`
    fn attempt(self) -> Self::Acceptor;
}

/// Acceptor for `bool`: `false` is an error with an [`Unknown`] culprit
#[derive(Debug, Clone, Copy)]
pub struct BoolAcceptor(pub bool);

impl Acceptor for BoolAcceptor {
    type Culprit = Unknown;

    fn is_error(&self) -> bool {
        !self.0
    }

    fn culprit(self) -> Unknown {
        Unknown
    }
}

impl Verify for bool {
    type Acceptor<'a> = BoolAcceptor;

    fn verify(&self) -> BoolAcceptor {
        BoolAcceptor(*self)
    }
}

/// Acceptor for `Option`: `None` is an error with an [`Unknown`] culprit
#[derive(Debug)]
pub struct OptionAcceptor<O>(pub O);

impl<T> Acceptor for OptionAcceptor<&Option<T>> {
    type Culprit = Unknown;

    fn is_error(&self) -> bool {
        self.0.is_none()
    }

    fn culprit(self) -> Unknown {
        Unknown
    }
}

impl<T> Acceptor for OptionAcceptor<Option<T>> {
    type Culprit = Unknown;

    fn is_error(&self) -> bool {
        self.0.is_none()
    }

    fn culprit(self) -> Unknown {
        Unknown
    }
}

impl<T> TryAcceptor for OptionAcceptor<Option<T>> {
    type Value = T;

    fn value(self) -> T {
        match self.0 {
            Some(value) => value,
            None => unreachable!("value() is only called when is_error() is false"),
        }
    }
}

impl<T: 'static> Verify for Option<T> {
    type Acceptor<'a> = OptionAcceptor<&'a Option<T>>;

    fn verify(&self) -> Self::Acceptor<'_> {
        OptionAcceptor(self)
    }
}

impl<T: 'static> Attempt for Option<T> {
    type Value = T;
    type Acceptor = OptionAcceptor<Option<T>>;

    fn attempt(self) -> Self::Acceptor {
        OptionAcceptor(self)
    }
}

/// Acceptor for `Result`: `Err(e)` is an error with culprit `e`
#[derive(Debug)]
pub struct ResultAcceptor<R>(pub R);

impl<T, E> Acceptor for ResultAcceptor<&Result<T, E>>
where
    E: IntoCulprit + Clone,
{
    type Culprit = E;

    fn is_error(&self) -> bool {
        self.0.is_err()
    }

    fn culprit(self) -> E {
        match self.0 {
            Err(error) => error.clone(),
            Ok(_) => unreachable!("culprit() is only called when is_error() is true"),
        }
    }
}

impl<T, E: IntoCulprit> Acceptor for ResultAcceptor<Result<T, E>> {
    type Culprit = E;

    fn is_error(&self) -> bool {
        self.0.is_err()
    }

    fn culprit(self) -> E {
        match self.0 {
            Err(error) => error,
            Ok(_) => unreachable!("culprit() is only called when is_error() is true"),
        }
    }
}

impl<T, E: IntoCulprit> TryAcceptor for ResultAcceptor<Result<T, E>> {
    type Value = T;

    fn value(self) -> T {
        match self.0 {
            Ok(value) => value,
            Err(_) => unreachable!("value() is only called when is_error() is false"),
        }
    }
}

impl<T: 'static, E> Verify for Result<T, E>
where
    E: IntoCulprit + Clone + 'static,
{
    type Acceptor<'a> = ResultAcceptor<&'a Result<T, E>>;

    fn verify(&self) -> Self::Acceptor<'_> {
        ResultAcceptor(self)
    }
}

impl<T: 'static, E: IntoCulprit + 'static> Attempt for Result<T, E> {
    type Value = T;
    type Acceptor = ResultAcceptor<Result<T, E>>;

    fn attempt(self) -> Self::Acceptor {
        ResultAcceptor(self)
    }
}

/// Acceptor for raw pointers: null is an error with an [`Unknown`] culprit
#[derive(Debug, Clone, Copy)]
pub struct PointerAcceptor<P>(pub P);

impl<T: ?Sized> Acceptor for PointerAcceptor<*mut T> {
    type Culprit = Unknown;

    fn is_error(&self) -> bool {
        self.0.is_null()
    }

    fn culprit(self) -> Unknown {
        Unknown
    }
}

impl<T: ?Sized> TryAcceptor for PointerAcceptor<*mut T> {
    type Value = NonNull<T>;

    fn value(self) -> NonNull<T> {
        match NonNull::new(self.0) {
            Some(ptr) => ptr,
            None => unreachable!("value() is only called when is_error() is false"),
        }
    }
}

impl<T: ?Sized + 'static> Verify for *const T {
    type Acceptor<'a> = PointerAcceptor<*mut T>;

    fn verify(&self) -> PointerAcceptor<*mut T> {
        PointerAcceptor(self.cast_mut())
    }
}

impl<T: ?Sized + 'static> Verify for *mut T {
    type Acceptor<'a> = PointerAcceptor<*mut T>;

    fn verify(&self) -> PointerAcceptor<*mut T> {
        PointerAcceptor(*self)
    }
}

impl<T: ?Sized + 'static> Attempt for *const T {
    type Value = NonNull<T>;
    type Acceptor = PointerAcceptor<*mut T>;

    fn attempt(self) -> PointerAcceptor<*mut T> {
        PointerAcceptor(self.cast_mut())
    }
}

impl<T: ?Sized + 'static> Attempt for *mut T {
    type Value = NonNull<T>;
    type Acceptor = PointerAcceptor<*mut T>;

    fn attempt(self) -> PointerAcceptor<*mut T> {
        PointerAcceptor(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting<'a> {
        error: bool,
        calls: &'a Cell<(u32, u32, u32)>,
    }

    impl Acceptor for Counting<'_> {
        type Culprit = &'static str;

        fn is_error(&self) -> bool {
            let (e, c, v) = self.calls.get();
            self.calls.set((e + 1, c, v));
            self.error
        }

        fn culprit(self) -> &'static str {
            let (e, c, v) = self.calls.get();
            self.calls.set((e, c + 1, v));
            "bad"
        }
    }

    impl TryAcceptor for Counting<'_> {
        type Value = u8;

        fn value(self) -> u8 {
            let (e, c, v) = self.calls.get();
            self.calls.set((e, c, v + 1));
            42
        }
    }

    #[test]
    fn test_protocol_calls_each_step_once() {
        let calls = Cell::new((0, 0, 0));
        let out = Accepted::extract(Counting { error: false, calls: &calls });
        assert!(matches!(out, Accepted::Value(42)));
        assert_eq!(calls.get(), (1, 0, 1));

        let calls = Cell::new((0, 0, 0));
        let out = Accepted::extract(Counting { error: true, calls: &calls });
        assert_eq!(out.into_result().unwrap_err().downcast_ref::<&str>(), Some(&"bad"));
        assert_eq!(calls.get(), (1, 1, 0));

        let calls = Cell::new((0, 0, 0));
        assert!(Accepted::check(Counting { error: false, calls: &calls }).into_result().is_ok());
        assert_eq!(calls.get(), (1, 0, 0));
    }

    #[test]
    fn test_bool_acceptor() {
        assert!(!Accepted::check(true.verify()).is_error());
        match Accepted::check(false.verify()) {
            Accepted::Error(culprit) => {
                assert!(culprit.is_unknown());
                assert_eq!(culprit.render(), None);
            }
            Accepted::Value(()) => panic!("false must be an error"),
        }
        match Accepted::extract(None::<u8>.attempt()) {
            Accepted::Error(culprit) => assert_eq!(culprit.render(), None),
            Accepted::Value(_) => panic!("None must be an error"),
        }
    }

    #[test]
    fn test_pointers() {
        let value = 5_u32;
        let ptr: *const u32 = &value;
        assert!(!Accepted::check(ptr.verify()).is_error());
        assert!(Accepted::check(std::ptr::null::<u32>().verify()).is_error());
        match Accepted::extract(ptr.attempt()) {
            Accepted::Value(non_null) => assert_eq!(non_null.as_ptr().cast_const(), ptr),
            Accepted::Error(_) => panic!("a live pointer is not an error"),
        }
        assert!(Accepted::extract(std::ptr::null_mut::<u8>().attempt()).is_error());
    }

    #[test]
    fn test_option_and_result() {
        assert!(matches!(Accepted::extract(Some(3).attempt()), Accepted::Value(3)));
        let none: Option<u8> = None;
        assert!(Accepted::check(none.verify()).is_error());

        let err: Result<u8, String> = Err("nope".into());
        match Accepted::check(err.verify()) {
            Accepted::Error(culprit) => assert_eq!(culprit.cloned::<String>().as_deref(), Some("nope")),
            Accepted::Value(()) => panic!("Err must be an error"),
        }
        let ok: Result<u8, String> = Ok(1);
        assert!(matches!(Accepted::extract(ok.attempt()), Accepted::Value(1)));
    }
}
