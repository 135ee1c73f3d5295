use std::fmt;

use super::field::FieldDescriptor;
use super::flags::DecoratorFlags;

/// Result of one invocation of the transform.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// Not enough is known yet; run the transform again later.
    Deferred(DeferReason),
    Synthesized(Synthesis),
}

impl Outcome {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    pub fn synthesis(&self) -> Option<&Synthesis> {
        match self {
            Self::Synthesized(synthesis) => Some(synthesis),
            Self::Deferred(_) => None,
        }
    }
}

/// Why a run was deferred. Not an error: the driver retries.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DeferReason {
    /// A declared name is still a forward-reference placeholder.
    PlaceholderSymbol(String),
    /// A field's type has not been resolved.
    PendingType(String),
    /// A data-holder ancestor has no persisted field list yet.
    AncestorNotSynthesized(String),
}

impl fmt::Display for DeferReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlaceholderSymbol(name) => write!(f, "`{name}` is not resolved yet"),
            Self::PendingType(name) => write!(f, "type of `{name}` is not resolved yet"),
            Self::AncestorNotSynthesized(class) => {
                write!(f, "ancestor `{class}` has not been synthesized yet")
            }
        }
    }
}

/// What a completed run produced.
#[derive(Clone, Debug)]
pub struct Synthesis {
    /// Merged fields in constructor order.
    pub fields: Vec<FieldDescriptor>,
    pub flags: DecoratorFlags,
    /// Members written to the class table, in insertion order.
    pub generated: Vec<String>,
    /// Fully qualified names of the data-holder ancestors that were merged.
    pub dependencies: Vec<String>,
}

impl Synthesis {
    /// Wildcard triggers for the incremental driver: the class must be
    /// re-transformed whenever any of these ancestors changes.
    pub fn triggers(&self) -> impl Iterator<Item = String> + '_ {
        self.dependencies.iter().map(|name| format!("<{name}.*>"))
    }
}
