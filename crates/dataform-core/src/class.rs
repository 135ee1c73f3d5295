//! Class records and the registry that owns them.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::Position;
use crate::symbols::{FuncDef, SymbolNode, SymbolTable, SymbolTableNode, Var};
use crate::syntax::{ClassDef, Statement};
use crate::types::{Type, TypeBinding};

/// Root of every class hierarchy.
pub const OBJECT: &str = "builtins.object";

/// Wrapper marking a class-level shared declaration.
pub const CLASS_VAR: &str = "typing.ClassVar";

/// Index of a class inside a [`ClassRegistry`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClassId(u32);

impl ClassId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Everything the analyzer knows about one class.
#[derive(Clone, Debug)]
pub struct ClassInfo {
    pub name: String,
    pub fullname: String,
    pub defn: ClassDef,
    pub names: SymbolTable,
    /// Linearized ancestors: the class itself first, the root last.
    pub mro: Vec<ClassId>,
    /// Opaque per-plugin records, keyed by plugin name.
    pub metadata: IndexMap<String, serde_json::Value>,
}

impl ClassInfo {
    pub fn new(fullname: impl Into<String>, defn: ClassDef) -> Self {
        Self {
            name: defn.name.clone(),
            fullname: fullname.into(),
            defn,
            names: SymbolTable::new(),
            mro: Vec::new(),
            metadata: IndexMap::new(),
        }
    }

    /// `Class.member`
    pub fn member_fullname(&self, member: &str) -> String {
        format!("{}.{}", self.fullname, member)
    }

    /// Method declared directly on this class.
    pub fn method(&self, name: &str) -> Option<&FuncDef> {
        self.names.get(name)?.node.as_func()
    }

    pub fn instance_type(&self) -> Type {
        Type::instance(self.fullname.clone())
    }

    /// Register symbols for body declarations that have none.
    ///
    /// Targets whose binding was cleared get a fresh `Var` from their
    /// annotation, so a reset declaration is recreated the same way it
    /// was created the first time.
    pub fn bind_declarations(&mut self) {
        let fullname = self.fullname.clone();
        for stmt in &mut self.defn.body {
            match stmt {
                Statement::Assign(assign) => {
                    let Some(annotation) = &assign.annotation else {
                        continue;
                    };
                    if assign.target.binding.is_some() {
                        continue;
                    }
                    let name = assign.target.name.clone();
                    let var_fullname = format!("{fullname}.{name}");
                    if !self.names.contains(&name) {
                        let var = declared_var(&name, &var_fullname, annotation, assign.position);
                        self.names
                            .insert(name, SymbolTableNode::new(SymbolNode::Var(var)));
                    }
                    assign.target.binding = Some(var_fullname);
                }
                Statement::Func(func) => {
                    if !self.names.contains(&func.name) {
                        self.names.insert(
                            func.name.clone(),
                            SymbolTableNode::new(SymbolNode::Func(func.clone())),
                        );
                    }
                }
                Statement::Pass => {}
            }
        }
    }
}

fn declared_var(
    name: &str,
    fullname: &str,
    annotation: &TypeBinding,
    position: Position,
) -> Var {
    let (ty, is_classvar) = match annotation {
        TypeBinding::Resolved(ty) if ty.is_instance_of(CLASS_VAR) => {
            let inner = ty.args().first().cloned().unwrap_or(Type::Any);
            (TypeBinding::Resolved(inner), true)
        }
        other => (other.clone(), false),
    };
    Var {
        name: name.to_owned(),
        fullname: fullname.to_owned(),
        ty,
        is_classvar,
        is_property: false,
        position,
    }
}

/// Arena of all classes known to the analyzer.
#[derive(Clone, Debug, Default)]
pub struct ClassRegistry {
    classes: Vec<ClassInfo>,
    by_fullname: HashMap<String, ClassId>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class whose linearized ancestors (excluding itself) are `ancestors`.
    pub fn add(&mut self, mut info: ClassInfo, ancestors: &[ClassId]) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        info.mro = std::iter::once(id).chain(ancestors.iter().copied()).collect();
        self.by_fullname.insert(info.fullname.clone(), id);
        self.classes.push(info);
        id
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassInfo> {
        self.classes.get(id.index())
    }

    pub fn get_mut(&mut self, id: ClassId) -> Option<&mut ClassInfo> {
        self.classes.get_mut(id.index())
    }

    pub fn by_fullname(&self, fullname: &str) -> Option<ClassId> {
        self.by_fullname.get(fullname).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Resolve a member along the MRO of `id`.
    pub fn lookup(&self, id: ClassId, name: &str) -> Option<&SymbolTableNode> {
        self.get(id)?
            .mro
            .iter()
            .filter_map(|&ancestor| self.get(ancestor))
            .find_map(|info| info.names.get(name))
    }

    /// Resolve a method along the MRO of `id`.
    pub fn lookup_method(&self, id: ClassId, name: &str) -> Option<&FuncDef> {
        self.lookup(id, name)?.node.as_func()
    }

    pub fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        self.get(sub).is_some_and(|info| info.mro.contains(&sup))
    }

    /// Whether a value of type `ty` may be passed where `bound` is the upper bound.
    pub fn satisfies_bound(&self, ty: &Type, bound: &Type) -> bool {
        match (ty, bound) {
            (Type::Any, _) | (_, Type::Any) => true,
            (Type::TypeVar(def), _) => self.satisfies_bound(&def.upper_bound, bound),
            (_, Type::TypeVar(def)) => self.satisfies_bound(ty, &def.upper_bound),
            (_, Type::Instance { fullname, .. }) if fullname == OBJECT => true,
            (Type::NoneType, Type::NoneType) => true,
            (Type::Instance { fullname: sub, .. }, Type::Instance { fullname: sup, .. }) => {
                if sub == sup {
                    return true;
                }
                match (self.by_fullname(sub), self.by_fullname(sup)) {
                    (Some(sub), Some(sup)) => self.is_subclass(sub, sup),
                    _ => false,
                }
            }
            _ => false,
        }
    }
}
