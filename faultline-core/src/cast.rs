//! Moving values between generic types that are known to be equal at runtime

use std::any::Any;

/// Move `value` into type `B` if `A` and `B` are the same type
///
/// Returns the value unchanged otherwise. No allocation is involved, and the
/// type test folds to a constant once `A` and `B` are concrete.
pub fn cast<A: 'static, B: 'static>(value: A) -> Result<B, A> {
    let mut slot = Some(value);
    if let Some(target) = (&mut slot as &mut dyn Any).downcast_mut::<Option<B>>() {
        if let Some(out) = target.take() {
            return Ok(out);
        }
    }
    match slot {
        Some(value) => Err(value),
        None => unreachable!("slot is only emptied on a successful cast"),
    }
}

/// Borrow `value` as a `B` if `A` and `B` are the same type
pub fn cast_ref<A: 'static, B: 'static>(value: &A) -> Option<&B> {
    (value as &dyn Any).downcast_ref::<B>()
}
