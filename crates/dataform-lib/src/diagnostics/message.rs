use dataform_core::Position;

/// Diagnostic kinds reported by the synthesis pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Decorator configuration
    InvalidDecoratorArgument,
    OrderWithoutEq,

    // Field declarations
    NonDefaultAfterDefault,

    // Collisions with user code
    CustomOrderMethod,
}

impl DiagnosticKind {
    /// Default severity for this kind.
    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::NonDefaultAfterDefault => {
                Some("give it a default, or move it before the first defaulted field")
            }
            Self::CustomOrderMethod => Some("remove the method, or drop `order=True`"),
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::InvalidDecoratorArgument => "decorator argument must be True or False",
            Self::OrderWithoutEq => "eq must be True if order is True",
            Self::NonDefaultAfterDefault => {
                "Attributes without a default cannot follow attributes with one"
            }
            Self::CustomOrderMethod => "You may not have a custom ordering method when order=True",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::InvalidDecoratorArgument => "\"{}\" argument must be True or False.".to_string(),
            Self::CustomOrderMethod => {
                "You may not have a custom {} method when order=True".to_string()
            }
            Self::NonDefaultAfterDefault => format!("{}: `{{}}`", self.fallback_message()),
            Self::OrderWithoutEq => self.fallback_message().to_string(),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) position: Position,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) position: Position,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, position: Position, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
            related: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, position: Position) -> Self {
        Self::new(kind, position, kind.fallback_message())
    }

    pub(crate) fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.severity(), self.position, self.message)?;
        for related in &self.related {
            write!(f, " (related: {} at {})", related.message, related.position)?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
