//! Member tables: what a class name resolves to.
//!
//! Entries written by a plugin pass carry `plugin_generated`, which is how a
//! later run tells its own output apart from user code.

use indexmap::IndexMap;

use crate::Position;
use crate::types::{Type, TypeBinding, TypeVarDef};

/// A variable: an instance field, a class variable, or a parameter.
#[derive(Clone, PartialEq, Debug)]
pub struct Var {
    pub name: String,
    pub fullname: String,
    pub ty: TypeBinding,
    /// Declared as `ClassVar[...]`: shared by the class, not per-instance.
    pub is_classvar: bool,
    /// Read-only accessor; assignment through an instance is rejected.
    pub is_property: bool,
    pub position: Position,
}

impl Var {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeBinding>) -> Self {
        let name = name.into();
        Self {
            fullname: name.clone(),
            name,
            ty: ty.into(),
            is_classvar: false,
            is_property: false,
            position: Position::default(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArgKind {
    /// Required positional parameter.
    Positional,
    /// Positional parameter with a default.
    Optional,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Argument {
    pub variable: Var,
    pub annotation: Option<Type>,
    pub kind: ArgKind,
}

impl Argument {
    pub fn name(&self) -> &str {
        &self.variable.name
    }
}

/// A method signature. Bodies are irrelevant to the pass.
#[derive(Clone, PartialEq, Debug)]
pub struct FuncDef {
    pub name: String,
    pub fullname: String,
    /// Parameters after `self`.
    pub arguments: Vec<Argument>,
    pub return_type: Type,
    /// Explicit type of `self`; `None` means the enclosing class's instance type.
    pub self_type: Option<Type>,
    pub type_vars: Vec<TypeVarDef>,
    pub position: Position,
}

impl FuncDef {
    pub fn new(name: impl Into<String>, arguments: Vec<Argument>, return_type: Type) -> Self {
        let name = name.into();
        Self {
            fullname: name.clone(),
            name,
            arguments,
            return_type,
            self_type: None,
            type_vars: Vec::new(),
            position: Position::default(),
        }
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.name() == name)
    }
}

/// Class-level declaration of a type variable, e.g. `_DT = TypeVar('_DT', bound=...)`.
#[derive(Clone, PartialEq, Debug)]
pub struct TypeVarExpr {
    pub name: String,
    pub fullname: String,
    pub upper_bound: Type,
}

#[derive(Clone, PartialEq, Debug)]
pub enum SymbolNode {
    Var(Var),
    Func(FuncDef),
    TypeVarExpr(TypeVarExpr),
    /// Forward reference the analyzer has not resolved yet.
    Placeholder,
}

impl SymbolNode {
    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Self::Var(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_var_mut(&mut self) -> Option<&mut Var> {
        match self {
            Self::Var(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncDef> {
        match self {
            Self::Func(func) => Some(func),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct SymbolTableNode {
    pub node: SymbolNode,
    pub plugin_generated: bool,
}

impl SymbolTableNode {
    pub fn new(node: SymbolNode) -> Self {
        Self {
            node,
            plugin_generated: false,
        }
    }

    pub fn generated(node: SymbolNode) -> Self {
        Self {
            node,
            plugin_generated: true,
        }
    }
}

/// Names declared in one class, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolTable {
    table: IndexMap<String, SymbolTableNode>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    ///
    /// A replaced entry keeps its original position in iteration order.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        node: SymbolTableNode,
    ) -> Option<SymbolTableNode> {
        self.table.insert(name.into(), node)
    }

    /// Remove an entry, preserving the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<SymbolTableNode> {
        self.table.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&SymbolTableNode> {
        self.table.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SymbolTableNode> {
        self.table.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolTableNode)> {
        self.table.iter().map(|(k, v)| (k.as_str(), v))
    }
}
