//! Splitting failed comparisons into their operands
//!
//! With this extension installed, a failed `verify!(a < b)` records the
//! rendered values of `a` and `b`, and messages gain a `Same as:` line.

use faultline_core::{
    Annotated, BuilderLayer, Contains, Domain, Hook, Key, PolicyCx, PolicyLayer,
};

/// Policy layer that turns operand decomposition on
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOperands;

impl PolicyLayer for PrintOperands {
    fn decomposes(&self, cx: PolicyCx<'_>) -> Hook<bool> {
        Hook::Handled(cx.annotations().get_or::<PrintOperandsKey>(true))
    }
}

/// Annotation switching decomposition on or off
pub struct PrintOperandsKey;

impl Key for PrintOperandsKey {
    type Value = bool;
}

/// Extension: decompose failed comparisons
pub fn print_operands() -> Domain<PrintOperands, ()> {
    Domain::policy(PrintOperands)
}

/// `print_operands` knob
pub trait PrintOperandsConfig<I>: Annotated {
    /// Whether to decompose failed comparisons
    fn print_operands(self, enabled: bool) -> Self {
        self.annotate::<PrintOperandsKey>(enabled)
    }
}

// Decomposition happens before a builder exists, so builders do not get the knob.
impl<P, B, I> PrintOperandsConfig<I> for Domain<P, B>
where
    P: PolicyLayer + Contains<PrintOperands, I>,
    B: BuilderLayer,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decomposition_switch() {
        assert!(!Domain::new().decomposes());
        let domain = Domain::new().with(print_operands());
        assert!(domain.decomposes());
        assert!(!domain.clone().print_operands(false).decomposes());
        assert!(domain.print_operands(false).print_operands(true).decomposes());
    }
}
