//! Rendering culprits for messages

use faultline_core::{Annotated, BuilderLayer, Contains, Culprit, Domain, ErrorMaker, Hook, Key};
use std::any::{Any, TypeId};
use std::sync::Arc;

type RenderFn = Arc<dyn Fn(&Culprit) -> Option<String> + Send + Sync>;

/// Per-type rendering override
#[derive(Clone)]
pub struct Printer {
    type_id: TypeId,
    render: RenderFn,
}

impl Printer {
    /// Render culprits of type `T` with `f`
    pub fn new<T, F>(f: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            render: Arc::new(move |culprit: &Culprit| culprit.downcast_ref::<T>().map(&f)),
        }
    }
}

/// Annotation holding rendering overrides; the newest matching one is used
pub struct PrinterKey;

impl Key for PrinterKey {
    type Value = Printer;
}

/// Builder layer that renders culprits
///
/// Overrides registered with `print_as` come first; otherwise culprits
/// captured as printable are rendered with `Debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Print;

impl BuilderLayer for Print {
    fn render(&self, maker: &dyn ErrorMaker, culprit: &Culprit) -> Hook<String> {
        let custom = maker
            .annotations()
            .get_all::<PrinterKey>()
            .find(|printer| printer.type_id == culprit.value_type_id())
            .and_then(|printer| (printer.render)(culprit));
        Hook::from_option(custom.or_else(|| culprit.render()))
    }
}

/// Extension: render culprits in messages
pub fn print() -> Domain<(), Print> {
    Domain::builder(Print)
}

/// `print_as` knob
pub trait PrintConfig<I>: Annotated {
    /// Render culprits of type `T` with `f`
    fn print_as<T, F>(self, f: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.annotate::<PrinterKey>(Printer::new(f))
    }
}

impl<D, I> PrintConfig<I> for D
where
    D: Annotated,
    D::Builder: Contains<Print, I>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use faultline_core::MacroKind;

    #[derive(Debug, Clone)]
    struct Timeout(u32);

    #[test]
    fn test_debug_rendering() {
        let domain = Domain::new().with(print());
        let builder = domain.error_builder(testing::context(
            MacroKind::Verify,
            "x",
            Culprit::new(Timeout(3)),
        ));
        let maker: &dyn ErrorMaker = &builder;
        assert_eq!(maker.render_culprit().as_deref(), Some("Timeout(3)"));
    }

    #[test]
    fn test_override_and_opaque() {
        let domain = Domain::new()
            .with(print())
            .print_as(|t: &Timeout| format!("timed out after {}s", t.0));
        let builder = domain.error_builder(testing::context(
            MacroKind::Verify,
            "x",
            Culprit::new(Timeout(3)),
        ));
        let maker: &dyn ErrorMaker = &builder;
        assert_eq!(maker.render_culprit().as_deref(), Some("timed out after 3s"));

        let ctx = testing::context(MacroKind::Verify, "x", Culprit::unknown());
        let builder = domain.error_builder(ctx);
        let maker: &dyn ErrorMaker = &builder;
        assert_eq!(maker.render_culprit(), None);
    }

    #[test]
    fn test_nothing_rendered_without_layer() {
        let domain = Domain::new();
        let builder = domain.error_builder(testing::context(
            MacroKind::Verify,
            "x",
            Culprit::new(Timeout(3)),
        ));
        let maker: &dyn ErrorMaker = &builder;
        assert_eq!(maker.render_culprit(), None);
    }
}
