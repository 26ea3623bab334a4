//! The value blamed for a failed classification

use crate::cast::cast;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Culprit for inputs that carry no structure of their own, such as `false`
/// or `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Unknown;

trait Erased: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn Any>;
    fn clone_into(&self, out: &mut dyn Any) -> bool;
    fn render(&self) -> Option<String>;
    fn type_name(&self) -> &'static str;
}

struct Printable<T>(T);

impl<T> Erased for Printable<T>
where
    T: Any + Clone + fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn clone_boxed(&self) -> Box<dyn Any> {
        Box::new(self.0.clone())
    }

    fn clone_into(&self, out: &mut dyn Any) -> bool {
        match out.downcast_mut::<T>() {
            Some(slot) => {
                slot.clone_from(&self.0);
                true
            }
            None => false,
        }
    }

    fn render(&self) -> Option<String> {
        Some(format!("{:?}", self.0))
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

struct Opaque<T>(T);

impl<T> Erased for Opaque<T>
where
    T: Any + Clone + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn clone_boxed(&self) -> Box<dyn Any> {
        Box::new(self.0.clone())
    }

    fn clone_into(&self, out: &mut dyn Any) -> bool {
        match out.downcast_mut::<T>() {
            Some(slot) => {
                slot.clone_from(&self.0);
                true
            }
            None => false,
        }
    }

    fn render(&self) -> Option<String> {
        None
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Type-erased culprit
///
/// Cloning is cheap. The concrete value can be inspected with
/// [`Culprit::downcast_ref`] or copied out with [`Culprit::cloned`].
#[derive(Clone)]
pub struct Culprit {
    value: Arc<dyn Erased>,
}

impl Culprit {
    /// Capture a printable culprit
    ///
    /// [`Unknown`] is always captured as opaque: it says nothing a message
    /// could show.
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Clone + fmt::Debug + Send + Sync,
    {
        let value = match cast::<T, Culprit>(value) {
            Ok(culprit) => return culprit,
            Err(value) => value,
        };
        match cast::<T, Unknown>(value) {
            Ok(unknown) => Self::opaque(unknown),
            Err(value) => Self {
                value: Arc::new(Printable(value)),
            },
        }
    }

    /// Capture a culprit that never shows up in messages
    pub fn opaque<T>(value: T) -> Self
    where
        T: Any + Clone + Send + Sync,
    {
        Self {
            value: Arc::new(Opaque(value)),
        }
    }

    /// The [`Unknown`] culprit
    pub fn unknown() -> Self {
        Self::opaque(Unknown)
    }

    /// Whether this is the [`Unknown`] culprit
    pub fn is_unknown(&self) -> bool {
        self.is::<Unknown>()
    }

    /// Whether the captured value has type `T`
    pub fn is<T: Any>(&self) -> bool {
        self.value.as_any().is::<T>()
    }

    /// Type id of the captured value
    pub fn value_type_id(&self) -> TypeId {
        self.value.as_any().type_id()
    }

    /// Name of the captured value's type
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    /// Borrow the captured value as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_any().downcast_ref::<T>()
    }

    /// Clone the captured value out as `T`
    pub fn cloned<T: Any>(&self) -> Option<T> {
        self.cloned_as(TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Clone the captured value if its type is `target`
    pub fn cloned_as(&self, target: TypeId) -> Option<Box<dyn Any>> {
        (self.value_type_id() == target).then(|| self.value.clone_boxed())
    }

    /// Overwrite `out` with a clone of the captured value if the types match
    pub fn clone_into(&self, out: &mut dyn Any) -> bool {
        Erased::clone_into(&*self.value, out)
    }

    /// `Debug` rendering of the captured value, if it was captured as printable
    pub fn render(&self) -> Option<String> {
        self.value.render()
    }
}

impl Default for Culprit {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Debug for Culprit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(text) => write!(f, "Culprit({text})"),
            None => write!(f, "Culprit(<{}>)", self.type_name()),
        }
    }
}

/// Conversion into a [`Culprit`]
///
/// Implemented for every clonable `Debug` value, so acceptors can name their
/// concrete culprit type.
pub trait IntoCulprit {
    /// Capture `self`
    fn into_culprit(self) -> Culprit;
}

impl<T> IntoCulprit for T
where
    T: Any + Clone + fmt::Debug + Send + Sync,
{
    fn into_culprit(self) -> Culprit {
        Culprit::new(self)
    }
}
