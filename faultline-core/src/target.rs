//! Types an error builder can produce

use crate::builder::ErrorMaker;
use std::any::{Any, TypeId};

/// Type that a builder can manufacture from a culprit
///
/// This is the fallback of `make_error`: builder layers are asked first, and
/// only when all of them pass is the target's own impl used. Implement it next
/// to your error type to make the type returnable from `verify!`, `attempt!`
/// and `fault!`.
#[diagnostic::on_unimplemented(
    message = "an error domain cannot produce `{Self}`",
    label = "no `Target` impl for this return type",
    note = "implement `faultline_core::Target` next to `{Self}`; foreign types can be returned through a newtype, `Option` or `Result`"
)]
pub trait Target: Sized + 'static {
    /// Build an error value of this type
    fn make_error(maker: &dyn ErrorMaker) -> Self;

    /// Whether [`adopt`](Target::adopt) turns a value of type `id` into `Self`
    fn accepts(id: TypeId) -> bool {
        id == TypeId::of::<Self>()
    }

    /// Take a value produced by a return mode as `Self`
    fn adopt(value: Box<dyn Any>) -> Result<Self, Box<dyn Any>> {
        value.downcast::<Self>().map(|value| *value)
    }
}

impl Target for bool {
    fn make_error(_maker: &dyn ErrorMaker) -> Self {
        false
    }
}

impl Target for () {
    fn make_error(_maker: &dyn ErrorMaker) -> Self {}
}

impl<T: 'static> Target for Option<T> {
    fn make_error(_maker: &dyn ErrorMaker) -> Self {
        None
    }
}

// Plain values have no error representation of their own. They are meant to
// be returned through a return mode such as `returning(-1)`; without one they
// fall back to their default.
macro_rules! plain_target {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Target for $ty {
                fn make_error(maker: &dyn ErrorMaker) -> Self {
                    tracing::warn!(
                        location = %maker.context().location,
                        target = stringify!($ty),
                        "no return mode configured for a plain value; returning its default"
                    );
                    <$ty>::default()
                }
            }
        )*
    };
}

plain_target!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, String,
);

// A mode producing the error type itself returns it as `Err`.
impl<T: 'static, E: Target> Target for Result<T, E> {
    fn make_error(maker: &dyn ErrorMaker) -> Self {
        Err(maker.make::<E>())
    }

    fn accepts(id: TypeId) -> bool {
        id == TypeId::of::<Self>() || E::accepts(id)
    }

    fn adopt(value: Box<dyn Any>) -> Result<Self, Box<dyn Any>> {
        match value.downcast::<Self>() {
            Ok(value) => Ok(*value),
            Err(value) => E::adopt(value).map(Err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_adopts_error_values() {
        let adopted = <Result<u8, bool>>::adopt(Box::new(false));
        assert!(matches!(adopted, Ok(Err(false))));
        let adopted = <Result<u8, bool>>::adopt(Box::new(Ok::<u8, bool>(3)));
        assert!(matches!(adopted, Ok(Ok(3))));
        assert!(<Result<u8, bool>>::adopt(Box::new(1_i64)).is_err());
    }

    #[test]
    fn test_plain_values_accept_their_own_type() {
        assert!(i32::accepts(TypeId::of::<i32>()));
        assert!(!i32::accepts(TypeId::of::<i64>()));
        assert_eq!(<String>::adopt(Box::new(String::from("x"))).ok().as_deref(), Some("x"));
    }

    #[test]
    fn test_plain_value_without_mode_warns_and_defaults() {
        use crate::compose::Domain;
        use crate::context::{Context, Location, LocationId, MacroKind};
        use crate::testing::warnings_during;

        let location = Location {
            file: "src/lib.rs",
            line: 3,
            column: 5,
            id: LocationId::from_raw(9),
        };
        let domain = Domain::new();
        let (ret, warnings) = warnings_during(|| {
            let context = Context::new(location, "tests::f", MacroKind::Try, "attempt", "x");
            domain.error_builder(context).make_error::<String>()
        });
        assert_eq!(ret, "");
        assert_eq!(
            warnings,
            ["no return mode configured for a plain value; returning its default"]
        );
    }

    #[test]
    fn test_accepts() {
        assert!(bool::accepts(TypeId::of::<bool>()));
        assert!(!bool::accepts(TypeId::of::<()>()));
        assert!(<Result<(), ()>>::accepts(TypeId::of::<()>()));
    }
}
