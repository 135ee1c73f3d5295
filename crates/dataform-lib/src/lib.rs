//! Dataform: synthesized members for data-holder classes.
//!
//! Given a class marked with a data-holder decorator, the pass collects its
//! declared fields (merging those inherited from data-holder ancestors),
//! generates a constructor, equality and ordering methods, optionally turns
//! fields into read-only properties, and records the field list on the class
//! so descendants and later incremental runs can reuse it.
//!
//! # Example
//!
//! ```
//! use dataform_core::{
//!     AssignmentStmt, ClassDef, ClassInfo, ClassRegistry, Expr, NameExpr, Position, Statement,
//!     Type,
//! };
//! use dataform_lib::{Config, Diagnostics, Outcome, transform_class};
//!
//! let field = |name: &str, line| {
//!     Statement::Assign(AssignmentStmt {
//!         target: NameExpr::new(name),
//!         annotation: Some(Type::instance("builtins.int").into()),
//!         value: Expr::Empty,
//!         position: Position::new(line, 4),
//!     })
//! };
//! let defn = ClassDef {
//!     name: "Point".to_owned(),
//!     decorators: vec![Expr::name("dataclass")],
//!     body: vec![field("x", 2), field("y", 3)],
//!     position: Position::new(1, 0),
//! };
//!
//! let mut registry = ClassRegistry::new();
//! let object = registry.add(ClassInfo::new("builtins.object", ClassDef {
//!     name: "object".to_owned(),
//!     decorators: Vec::new(),
//!     body: Vec::new(),
//!     position: Position::default(),
//! }), &[]);
//! let mut point = ClassInfo::new("geometry.Point", defn);
//! point.bind_declarations();
//! let point = registry.add(point, &[object]);
//!
//! let mut diag = Diagnostics::new();
//! let outcome = transform_class(&mut registry, point, &Config::default(), &mut diag)
//!     .expect("registered class");
//!
//! assert!(matches!(outcome, Outcome::Synthesized(_)));
//! assert!(registry.lookup_method(point, "__init__").is_some());
//! assert!(diag.is_empty());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod dataclass;
pub mod diagnostics;
pub mod dump;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use dataclass::{
    ClassMetadata, DecoratorFlags, DeferReason, FieldDescriptor, FieldSpec, Outcome, Synthesis,
    transform_class,
};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use dump::dump_class;

/// Internal failures of the pass.
///
/// Problems in user code are never errors; they are reported through
/// [`Diagnostics`] and the pass carries on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The class id does not belong to the registry.
    #[error("class #{0} is not registered")]
    UnknownClass(u32),

    /// A persisted record could not be converted to or from its JSON form.
    #[error("malformed `{key}` metadata on `{class}`")]
    Metadata {
        class: String,
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for synthesis operations.
pub type Result<T> = std::result::Result<T, Error>;
