//! Routing `verify!` subjects
//!
//! A type with only an extracting acceptor can still be verified: the value
//! is cloned and run through its [`Attempt`] impl, and the extracted value is
//! dropped. `verify!` picks the route through auto-ref, so a [`Verify`] impl
//! always wins when both exist.
//!
//! ```
//! use faultline_core::subject::{Subject, VerifyDirect, VerifyViaAttempt};
//! use faultline_core::{Acceptor, Attempt, Domain, TryAcceptor};
//!
//! #[derive(Clone)]
//! struct Ticket(Option<u32>);
//!
//! struct Take(Option<u32>);
//!
//! impl Acceptor for Take {
//!     type Culprit = &'static str;
//!     fn is_error(&self) -> bool {
//!         self.0.is_none()
//!     }
//!     fn culprit(self) -> &'static str {
//!         "void"
//!     }
//! }
//!
//! impl TryAcceptor for Take {
//!     type Value = u32;
//!     fn value(self) -> u32 {
//!         self.0.unwrap_or_default()
//!     }
//! }
//!
//! impl Attempt for Ticket {
//!     type Value = u32;
//!     type Acceptor = Take;
//!     fn attempt(self) -> Take {
//!         Take(self.0)
//!     }
//! }
//!
//! let domain = Domain::new();
//! assert!(!(&Subject(&Ticket(Some(1)))).verify_with(&domain).is_error());
//! assert!((&Subject(&Ticket(None))).verify_with(&domain).is_error());
//! assert!((&Subject(&false)).verify_with(&domain).is_error());
//! ```

use crate::acceptor::{Accepted, Acceptor, Attempt, TryAcceptor, Verify};
use crate::compose::Domain;
use crate::layer::{BuilderLayer, PolicyLayer};

/// Anything `verify!` can classify with: domains and views of them
pub trait Verifier {
    /// Classify a borrowed value
    fn verify<T: Verify>(&self, subject: &T) -> Accepted<()>;
}

impl<P: PolicyLayer, B: BuilderLayer> Verifier for Domain<P, B> {
    fn verify<T: Verify>(&self, subject: &T) -> Accepted<()> {
        Domain::verify(self, subject)
    }
}

impl<V: Verifier + ?Sized> Verifier for &V {
    fn verify<T: Verify>(&self, subject: &T) -> Accepted<()> {
        (**self).verify(subject)
    }
}

/// A `Verify` view of an extracting classification
///
/// Policy layers see the wrapper, not `T`, so only the type's own acceptor
/// classifies it.
#[derive(Debug, Clone)]
pub struct ViaAttempt<T>(pub T);

/// Checking half of an extracting acceptor
#[derive(Debug)]
pub struct AttemptCheck<A>(A);

impl<A: TryAcceptor> Acceptor for AttemptCheck<A> {
    type Culprit = A::Culprit;

    fn is_error(&self) -> bool {
        self.0.is_error()
    }

    fn culprit(self) -> A::Culprit {
        self.0.culprit()
    }
}

impl<T: Attempt + Clone> Verify for ViaAttempt<T> {
    type Acceptor<'a> = AttemptCheck<T::Acceptor>;

    fn verify(&self) -> AttemptCheck<T::Acceptor> {
        AttemptCheck(self.0.clone().attempt())
    }
}

/// Borrowed `verify!` subject
pub struct Subject<'a, T: ?Sized>(pub &'a T);

/// Route for subjects with a [`Verify`] impl
pub trait VerifyDirect {
    /// Classify through `Verify`
    fn verify_with<V: Verifier + ?Sized>(&self, verifier: &V) -> Accepted<()>;
}

impl<T: Verify> VerifyDirect for Subject<'_, T> {
    fn verify_with<V: Verifier + ?Sized>(&self, verifier: &V) -> Accepted<()> {
        verifier.verify(self.0)
    }
}

/// Route for subjects that can only be attempted
pub trait VerifyViaAttempt {
    /// Classify a clone through `Attempt`
    fn verify_with<V: Verifier + ?Sized>(&self, verifier: &V) -> Accepted<()>;
}

impl<T: Attempt + Clone> VerifyViaAttempt for &Subject<'_, T> {
    fn verify_with<V: Verifier + ?Sized>(&self, verifier: &V) -> Accepted<()> {
        verifier.verify(&ViaAttempt(self.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culprit::Culprit;
    use crate::layer::{subject_as, Hook, PolicyCx};
    use std::cell::Cell;

    thread_local! {
        static ATTEMPTS: Cell<u32> = const { Cell::new(0) };
    }

    #[derive(Debug, Clone)]
    struct Ticket(u32);

    struct Punch(u32);

    impl Acceptor for Punch {
        type Culprit = u32;

        fn is_error(&self) -> bool {
            self.0 == 0
        }

        fn culprit(self) -> u32 {
            self.0
        }
    }

    impl TryAcceptor for Punch {
        type Value = u32;

        fn value(self) -> u32 {
            self.0
        }
    }

    impl Attempt for Ticket {
        type Value = u32;
        type Acceptor = Punch;

        fn attempt(self) -> Punch {
            ATTEMPTS.with(|n| n.set(n.get() + 1));
            Punch(self.0)
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    struct RejectAll;

    impl PolicyLayer for RejectAll {
        fn verify<T: Verify>(&self, _cx: PolicyCx<'_>, subject: &T) -> Hook<Accepted<()>> {
            match subject_as::<T, bool>(subject) {
                Some(_) => Hook::Handled(Accepted::Error(Culprit::new("rejected"))),
                None => Hook::Pass(()),
            }
        }
    }

    #[test]
    fn test_attempt_only_type_is_verified_by_its_acceptor() {
        let domain = Domain::new();
        ATTEMPTS.with(|n| n.set(0));
        assert!(!(&Subject(&Ticket(3))).verify_with(&domain).is_error());
        match (&Subject(&Ticket(0))).verify_with(&domain) {
            Accepted::Error(culprit) => assert_eq!(culprit.cloned::<u32>(), Some(0)),
            Accepted::Value(()) => panic!("a zero ticket is an error"),
        }
        assert_eq!(ATTEMPTS.with(Cell::get), 2);
    }

    #[test]
    fn test_verify_impl_wins_and_sees_policy() {
        let domain = Domain::policy(RejectAll);
        assert!((&Subject(&true)).verify_with(&domain).is_error());
        assert!(!(&Subject(&Some(1))).verify_with(&&domain).is_error());
    }
}
