//! Arguments of the field specification helper, e.g. `field(default=0, init=False)`.

use dataform_core::Expr;

/// Keyword arguments of a field specification call.
///
/// Only the keywords that shape the constructor are kept; anything else
/// (`repr=`, `compare=`, ...) is ignored.
#[derive(Clone, Debug, Default)]
pub struct FieldSpec {
    /// `init=`; a value that is not a boolean literal counts as `False`.
    pub init: Option<bool>,
    pub default: Option<Expr>,
    pub default_factory: Option<Expr>,
}

impl FieldSpec {
    /// Parse `expr` if it is a call to `helper`.
    pub fn parse(expr: &Expr, helper: &str) -> Option<Self> {
        let Expr::Call(call) = expr else {
            return None;
        };
        if call.callee_fullname() != Some(helper) {
            return None;
        }

        let mut spec = Self::default();
        for (name, value) in call.keywords() {
            match name {
                "init" => spec.init = Some(value.as_bool().unwrap_or(false)),
                "default" => spec.default = Some(value.clone()),
                "default_factory" => spec.default_factory = Some(value.clone()),
                _ => {}
            }
        }
        Some(spec)
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some() || self.default_factory.is_some()
    }

    pub fn in_init(&self) -> bool {
        self.init.unwrap_or(true)
    }
}
