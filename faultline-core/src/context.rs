//! Where and why a classification failed

use crate::culprit::Culprit;
use std::fmt;
use std::num::NonZeroUsize;

/// Which macro produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroKind {
    /// Unconditional error construction
    Error,
    /// Classification only
    Verify,
    /// Classification with value extraction
    Try,
}

/// Stable, non-zero identifier of one macro call site
///
/// Derived from the address of a per-call-site static, so it is stable for the
/// lifetime of the process but not across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(NonZeroUsize);

impl LocationId {
    /// Identifier of the call site owning `site`
    pub fn from_static(site: &'static u8) -> Self {
        let address = site as *const u8 as usize;
        Self(NonZeroUsize::new(address).unwrap_or(NonZeroUsize::MIN))
    }

    /// Identifier from a raw value; zero maps to one
    pub fn from_raw(raw: usize) -> Self {
        Self(NonZeroUsize::new(raw).unwrap_or(NonZeroUsize::MIN))
    }

    /// Raw value
    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// Source location of a call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Source file
    pub file: &'static str,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
    /// Call-site identifier
    pub id: LocationId,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Relational operator of a decomposed comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl RelOp {
    /// Source token
    pub fn as_str(self) -> &'static str {
        match self {
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
            RelOp::Lt => "<",
            RelOp::Gt => ">",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered operands of a failed comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Rendered left operand
    pub left: String,
    /// Operator
    pub op: RelOp,
    /// Rendered right operand
    pub right: String,
}

impl Relation {
    /// Relation from rendered operands; `None` unless both rendered
    pub fn from_parts(left: Option<String>, op: RelOp, right: Option<String>) -> Option<Self> {
        Some(Self {
            left: left?,
            op,
            right: right?,
        })
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

/// Immutable description of one error occurrence
#[derive(Debug, Clone)]
pub struct Context {
    /// Call site
    pub location: Location,
    /// Path of the enclosing function
    pub function: &'static str,
    /// Macro kind
    pub kind: MacroKind,
    /// Macro name without the `!`
    pub macro_name: &'static str,
    /// Source text of the macro arguments
    pub args: &'static str,
    /// Value blamed for the failure
    pub culprit: Culprit,
    /// Decomposed comparison, when available
    pub relation: Option<Relation>,
}

impl Context {
    /// Context with an [`Unknown`](crate::Unknown) culprit and no relation
    pub fn new(
        location: Location,
        function: &'static str,
        kind: MacroKind,
        macro_name: &'static str,
        args: &'static str,
    ) -> Self {
        Self {
            location,
            function,
            kind,
            macro_name,
            args,
            culprit: Culprit::unknown(),
            relation: None,
        }
    }

    /// Set the culprit
    pub fn with_culprit(mut self, culprit: Culprit) -> Self {
        self.culprit = culprit;
        self
    }

    /// Set the decomposed comparison
    pub fn with_relation(mut self, relation: Option<Relation>) -> Self {
        self.relation = relation;
        self
    }

    /// `name!(args)` as written at the call site
    pub fn invocation(&self) -> String {
        format!("{}!({})", self.macro_name, self.args)
    }
}

/// Strip the helper item suffix from a `type_name` taken inside a function
///
/// The macros name a nested `fn` and take its type name; this turns
/// `crate::module::function::__here` into `crate::module::function`.
pub fn function_path(helper_type_name: &'static str) -> &'static str {
    helper_type_name
        .rsplit_once("::")
        .map_or(helper_type_name, |(path, _)| path)
}

#[cfg(test)]
mod tests {
    use super::*;

    static SITE_A: u8 = 0;
    static SITE_B: u8 = 0;

    #[test]
    fn test_location_ids_differ_per_site() {
        let a = LocationId::from_static(&SITE_A);
        let b = LocationId::from_static(&SITE_B);
        assert_ne!(a, b);
        assert_eq!(a, LocationId::from_static(&SITE_A));
        assert_eq!(LocationId::from_raw(0).get(), 1);
    }

    #[test]
    fn test_relation_requires_both_operands() {
        assert!(Relation::from_parts(Some("1".into()), RelOp::Lt, None).is_none());
        let rel = Relation::from_parts(Some("5".into()), RelOp::Lt, Some("4".into())).unwrap();
        assert_eq!(rel.to_string(), "5 < 4");
    }

    #[test]
    fn test_function_path() {
        assert_eq!(function_path("app::load::__here"), "app::load");
        assert_eq!(function_path("plain"), "plain");
    }

    #[test]
    fn test_invocation_text() {
        let location = Location {
            file: "src/lib.rs",
            line: 3,
            column: 5,
            id: LocationId::from_raw(9),
        };
        let ctx = Context::new(location, "f", MacroKind::Verify, "verify", "x > 0");
        assert_eq!(ctx.invocation(), "verify!(x > 0)");
        assert!(ctx.culprit.is_unknown());
        assert_eq!(location.to_string(), "src/lib.rs:3");
    }
}
