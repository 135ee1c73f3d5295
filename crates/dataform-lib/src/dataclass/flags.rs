//! Decorator-level switches: `@dataclass(init=..., eq=..., order=..., frozen=...)`.

use dataform_core::{Expr, Position};

use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Which members the decorator asks for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DecoratorFlags {
    pub init: bool,
    pub eq: bool,
    pub order: bool,
    pub frozen: bool,
}

impl Default for DecoratorFlags {
    fn default() -> Self {
        Self {
            init: true,
            eq: true,
            order: false,
            frozen: false,
        }
    }
}

impl DecoratorFlags {
    /// Read flags from a decorator expression.
    ///
    /// A bare decorator yields the defaults. A keyword whose value is not a
    /// boolean literal is reported at `position` and keeps its default.
    /// Unknown keywords are ignored.
    pub fn from_decorator(
        decorator: Option<&Expr>,
        position: Position,
        diag: &mut Diagnostics,
    ) -> Self {
        let mut flags = Self::default();
        let Some(Expr::Call(call)) = decorator else {
            return flags;
        };

        for (name, value) in call.keywords() {
            let slot = match name {
                "init" => &mut flags.init,
                "eq" => &mut flags.eq,
                "order" => &mut flags.order,
                "frozen" => &mut flags.frozen,
                _ => continue,
            };
            match value.as_bool() {
                Some(parsed) => *slot = parsed,
                None => diag
                    .report(DiagnosticKind::InvalidDecoratorArgument, position)
                    .message(name)
                    .emit(),
            }
        }

        flags
    }
}
