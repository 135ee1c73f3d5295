//! Class body syntax as seen after name binding.

use crate::Position;
use crate::symbols::FuncDef;
use crate::types::TypeBinding;

/// A class definition: its decorators and body statements.
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: String,
    pub decorators: Vec<Expr>,
    pub body: Vec<Statement>,
    pub position: Position,
}

#[derive(Clone, Debug)]
pub enum Statement {
    Assign(AssignmentStmt),
    Func(FuncDef),
    Pass,
}

/// `target: annotation = value`, or a plain `target = value` when `annotation` is `None`.
///
/// An annotation the analyzer could not resolve yet is `Some(TypeBinding::Pending)`.
#[derive(Clone, Debug)]
pub struct AssignmentStmt {
    pub target: NameExpr,
    pub annotation: Option<TypeBinding>,
    pub value: Expr,
    pub position: Position,
}

impl AssignmentStmt {
    /// Annotated declarations are the only ones that can declare fields.
    pub fn is_declaration(&self) -> bool {
        self.annotation.is_some()
    }
}

#[derive(Clone, Debug)]
pub enum Expr {
    Name(NameExpr),
    Call(CallExpr),
    Literal(Literal),
    /// Right-hand side of a bare annotation (`x: int`).
    Empty,
    /// Any expression the pass has no reason to look into.
    Other,
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(NameExpr::new(name))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Literal(Literal::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Fully qualified name of a reference expression.
    pub fn ref_fullname(&self) -> Option<&str> {
        match self {
            Self::Name(name) => name.fullname.as_deref(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[derive(Clone, Debug)]
pub struct NameExpr {
    pub name: String,
    /// What the reference resolves to, when it is a reference.
    pub fullname: Option<String>,
    /// Symbol registered for this name when it is a declaration target.
    pub binding: Option<String>,
}

impl NameExpr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fullname: None,
            binding: None,
        }
    }

    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = Some(fullname.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<CallArg>,
}

impl CallExpr {
    pub fn callee_fullname(&self) -> Option<&str> {
        self.callee.ref_fullname()
    }

    /// Keyword arguments in call order.
    pub fn keywords(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.args
            .iter()
            .filter_map(|arg| arg.name.as_deref().map(|name| (name, &arg.value)))
    }
}

#[derive(Clone, Debug)]
pub struct CallArg {
    /// Keyword name; `None` for positional arguments.
    pub name: Option<String>,
    pub value: Expr,
}

impl CallArg {
    pub fn keyword(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }

    pub fn positional(value: Expr) -> Self {
        Self { name: None, value }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Str(String),
    None,
}
