//! Type representations handed over by the analyzer.

use std::fmt;

/// A resolved type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Type {
    /// Instance of a class, e.g. `builtins.int` or `dataclasses.InitVar[builtins.str]`.
    Instance { fullname: String, args: Vec<Type> },
    /// Reference to a type variable.
    TypeVar(TypeVarDef),
    /// The type of `None`; return type of constructors.
    NoneType,
    Any,
}

impl Type {
    pub fn instance(fullname: impl Into<String>) -> Self {
        Self::Instance {
            fullname: fullname.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(fullname: impl Into<String>, args: Vec<Type>) -> Self {
        Self::Instance {
            fullname: fullname.into(),
            args,
        }
    }

    /// Fully qualified class name, for instance types.
    pub fn fullname(&self) -> Option<&str> {
        match self {
            Self::Instance { fullname, .. } => Some(fullname),
            _ => None,
        }
    }

    pub fn args(&self) -> &[Type] {
        match self {
            Self::Instance { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_instance_of(&self, name: &str) -> bool {
        self.fullname() == Some(name)
    }

    pub fn as_type_var(&self) -> Option<&TypeVarDef> {
        match self {
            Self::TypeVar(def) => Some(def),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance { fullname, args } => {
                write!(f, "{fullname}")?;
                if args.is_empty() {
                    return Ok(());
                }
                write!(f, "[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, "]")
            }
            Self::TypeVar(def) => write!(f, "{}", def.name),
            Self::NoneType => write!(f, "None"),
            Self::Any => write!(f, "Any"),
        }
    }
}

/// Declaration of a type variable bound to a single method.
///
/// `id` follows the analyzer's convention: negative ids are method-scoped.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeVarDef {
    pub name: String,
    pub fullname: String,
    pub id: i32,
    pub upper_bound: Box<Type>,
}

impl TypeVarDef {
    pub fn new(
        name: impl Into<String>,
        fullname: impl Into<String>,
        id: i32,
        upper_bound: Type,
    ) -> Self {
        Self {
            name: name.into(),
            fullname: fullname.into(),
            id,
            upper_bound: Box::new(upper_bound),
        }
    }
}

/// Type of a declared name, which may not be known yet.
///
/// `Pending` means the analyzer has not resolved the annotation; consumers
/// should retry later rather than treat it as an error.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TypeBinding {
    Resolved(Type),
    Pending,
}

impl TypeBinding {
    pub fn resolved(&self) -> Option<&Type> {
        match self {
            Self::Resolved(ty) => Some(ty),
            Self::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl From<Type> for TypeBinding {
    fn from(ty: Type) -> Self {
        Self::Resolved(ty)
    }
}

impl From<Option<Type>> for TypeBinding {
    fn from(ty: Option<Type>) -> Self {
        ty.map_or(Self::Pending, Self::Resolved)
    }
}
