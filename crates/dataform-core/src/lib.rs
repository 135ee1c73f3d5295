#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared between a semantic analyzer and the dataform pass.
//!
//! Three layers:
//! - **Types**: resolved type representations plus the resolved-or-pending binding
//! - **Syntax**: the parts of a class body the pass inspects (annotated assignments, calls)
//! - **Symbols**: per-class member tables, class records and the registry that owns them
//!
//! The analyzer builds these; the synthesis pass reads ancestors and mutates the class
//! it is transforming.

mod class;
mod symbols;
mod syntax;
mod types;


pub use class::{ClassId, ClassInfo, ClassRegistry};
pub use symbols::{
    ArgKind, Argument, FuncDef, SymbolNode, SymbolTable, SymbolTableNode, TypeVarExpr, Var,
};
pub use syntax::{
    AssignmentStmt, CallArg, CallExpr, ClassDef, Expr, Literal, NameExpr, Statement,
};
pub use types::{Type, TypeBinding, TypeVarDef};

/// Source location of a node.
///
/// Lines are 1-based, columns 0-based.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
