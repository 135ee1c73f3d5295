//! One declared field of a data-holder class.

use dataform_core::{ArgKind, Argument, Position, Type, Var};
use serde::{Deserialize, Serialize};

/// A field as seen by the synthesis pass.
///
/// Created fresh from source on every run, or read back from an ancestor's
/// persisted record. The serialized keys are part of the metadata format.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Becomes a constructor parameter.
    #[serde(rename = "is_in_init")]
    pub in_init: bool,
    /// Accepted by the constructor but not kept as an attribute.
    #[serde(rename = "is_init_var")]
    pub init_only: bool,
    pub has_default: bool,
    pub line: u32,
    pub column: u32,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            in_init: true,
            init_only: false,
            has_default: false,
            line: position.line,
            column: position.column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Constructor parameter for this field, typed as `ty`.
    pub fn to_argument(&self, ty: Type) -> Argument {
        Argument {
            variable: self.to_var(ty.clone()),
            annotation: Some(ty),
            kind: if self.has_default {
                ArgKind::Optional
            } else {
                ArgKind::Positional
            },
        }
    }

    pub fn to_var(&self, ty: Type) -> Var {
        let mut var = Var::new(self.name.clone(), ty);
        var.position = self.position();
        var
    }
}
