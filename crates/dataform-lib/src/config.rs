//! Names the synthesis pass recognizes.

use dataform_core::{ClassInfo, Expr};

/// Configuration for the dataclass transform.
///
/// Every fully qualified name the pass matches against lives here, so an
/// analyzer hosting a differently named runtime can retarget the pass.
#[derive(Clone, Debug)]
pub struct Config {
    /// Decorators that mark a class as a data holder
    pub(crate) decorator_names: Vec<String>,
    /// Helper call customizing a single field
    pub(crate) field_helper: String,
    /// Wrapper type for constructor-only fields
    pub(crate) init_var_wrapper: String,
    /// Key of the persisted record in class metadata
    pub(crate) metadata_key: String,
    /// Name of the self type variable used by comparison methods
    pub(crate) self_tvar_name: String,
    /// Return type of comparison methods
    pub(crate) bool_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decorator_names: vec!["dataclass".to_owned(), "dataclasses.dataclass".to_owned()],
            field_helper: "dataclasses.field".to_owned(),
            init_var_wrapper: "dataclasses.InitVar".to_owned(),
            metadata_key: "dataclass".to_owned(),
            self_tvar_name: "_DT".to_owned(),
            bool_type: "builtins.bool".to_owned(),
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of recognized decorators.
    pub fn decorator_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.decorator_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fully qualified name of the field specification helper.
    pub fn field_helper(mut self, fullname: impl Into<String>) -> Self {
        self.field_helper = fullname.into();
        self
    }

    /// Set the fully qualified name of the constructor-only wrapper type.
    pub fn init_var_wrapper(mut self, fullname: impl Into<String>) -> Self {
        self.init_var_wrapper = fullname.into();
        self
    }

    /// Set the metadata key the field list is persisted under.
    pub fn metadata_key(mut self, key: impl Into<String>) -> Self {
        self.metadata_key = key.into();
        self
    }

    /// Set the name of the generated self type variable.
    pub fn self_tvar_name(mut self, name: impl Into<String>) -> Self {
        self.self_tvar_name = name.into();
        self
    }

    pub fn bool_type(mut self, fullname: impl Into<String>) -> Self {
        self.bool_type = fullname.into();
        self
    }

    pub fn get_metadata_key(&self) -> &str {
        &self.metadata_key
    }

    /// Whether `expr` is one of the recognized decorators, bare or called.
    pub fn is_decorator(&self, expr: &Expr) -> bool {
        let callee = match expr {
            Expr::Call(call) => call.callee.as_ref(),
            other => other,
        };
        let Expr::Name(name) = callee else {
            return false;
        };
        let fullname = name.fullname.as_deref().unwrap_or(&name.name);
        self.decorator_names.iter().any(|known| known == fullname)
    }

    /// The first recognized decorator on a class.
    pub fn find_decorator<'a>(&self, info: &'a ClassInfo) -> Option<&'a Expr> {
        info.defn.decorators.iter().find(|d| self.is_decorator(d))
    }

    /// Whether a class is a data holder whose fields descendants inherit.
    pub fn is_data_holder(&self, info: &ClassInfo) -> bool {
        self.find_decorator(info).is_some()
    }
}
