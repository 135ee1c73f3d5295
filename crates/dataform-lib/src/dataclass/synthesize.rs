//! Member generation: constructor, equality and ordering methods.

use dataform_core::{
    Argument, ArgKind, ClassId, ClassInfo, ClassRegistry, FuncDef, Position, Statement,
    SymbolNode, SymbolTableNode, Type, TypeVarDef, TypeVarExpr, Var,
};

use super::field::FieldDescriptor;
use super::flags::DecoratorFlags;
use crate::config::Config;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::{Error, Result};

const EQUALITY_METHODS: [&str; 2] = ["__eq__", "__ne__"];
const ORDERING_METHODS: [&str; 4] = ["__lt__", "__gt__", "__le__", "__ge__"];

/// The symbol a field name resolves to along the MRO of `id`.
///
/// Variables materialized by an earlier run are copies and are skipped, so
/// the lookup always reaches the declaring class.
pub(crate) fn declared_node<'r>(
    registry: &'r ClassRegistry,
    id: ClassId,
    name: &str,
) -> Option<&'r SymbolNode> {
    registry.get(id)?.mro.iter().find_map(|&class| {
        let entry = registry.get(class)?.names.get(name)?;
        let materialized = entry.plugin_generated && matches!(entry.node, SymbolNode::Var(_));
        (!materialized).then_some(&entry.node)
    })
}

/// Type of a field as seen from `id`.
///
/// `None` when the field has no symbol or its type is still pending.
pub(crate) fn field_type(registry: &ClassRegistry, id: ClassId, name: &str) -> Option<Type> {
    match declared_node(registry, id, name)? {
        SymbolNode::Var(var) => var.ty.resolved().cloned(),
        SymbolNode::Func(_) | SymbolNode::TypeVarExpr(_) => Some(Type::Any),
        SymbolNode::Placeholder => None,
    }
}

/// Remove every member an earlier run generated, from the table and the body.
///
/// Each run regenerates what its flags ask for, so nothing stale survives a
/// change of flags or of an ancestor.
pub(crate) fn clear_generated(info: &mut ClassInfo) {
    let stale: Vec<String> = info
        .names
        .iter()
        .filter(|(_, entry)| entry.plugin_generated)
        .map(|(name, _)| name.to_owned())
        .collect();

    let mut methods = Vec::new();
    for name in &stale {
        if let Some(SymbolTableNode {
            node: SymbolNode::Func(func),
            ..
        }) = info.names.remove(name)
        {
            methods.push(func);
        }
    }
    info.defn
        .body
        .retain(|stmt| !matches!(stmt, Statement::Func(func) if methods.contains(func)));

    if !stale.is_empty() {
        tracing::trace!(count = stale.len(), "cleared generated members");
    }
}

pub(crate) struct Synthesizer<'a> {
    pub(crate) registry: &'a mut ClassRegistry,
    pub(crate) id: ClassId,
    pub(crate) config: &'a Config,
    pub(crate) diag: &'a mut Diagnostics,
    /// Inherited constructor-only fields, which have no symbol on any class.
    pub(crate) recovered: &'a [Var],
    pub(crate) generated: Vec<String>,
}

impl<'a> Synthesizer<'a> {
    pub(crate) fn new(
        registry: &'a mut ClassRegistry,
        id: ClassId,
        config: &'a Config,
        diag: &'a mut Diagnostics,
        recovered: &'a [Var],
    ) -> Self {
        Self {
            registry,
            id,
            config,
            diag,
            recovered,
            generated: Vec::new(),
        }
    }

    fn info(&self) -> Result<&ClassInfo> {
        self.registry
            .get(self.id)
            .ok_or(Error::UnknownClass(self.id.as_u32()))
    }

    fn info_mut(&mut self) -> Result<&mut ClassInfo> {
        self.registry
            .get_mut(self.id)
            .ok_or(Error::UnknownClass(self.id.as_u32()))
    }

    /// Generate every member `flags` asks for.
    pub(crate) fn run(&mut self, fields: &[FieldDescriptor], flags: DecoratorFlags) -> Result<()> {
        // Without fields the implicit no-argument constructor applies.
        if flags.init && self.may_define("__init__")? && !fields.is_empty() {
            self.add_init(fields)?;
        }

        let wants_eq = flags.eq && self.may_define("__eq__")?;
        if wants_eq || flags.order {
            self.add_self_type_var()?;
        }

        if wants_eq {
            for name in EQUALITY_METHODS {
                if self.may_define(name)? {
                    self.add_comparison(name)?;
                }
            }
        }

        if flags.order {
            self.add_ordering(flags)?;
        }

        Ok(())
    }

    /// A member may be generated unless user code already defines it.
    fn may_define(&self, name: &str) -> Result<bool> {
        Ok(!self.info()?.names.contains(name))
    }

    fn add_init(&mut self, fields: &[FieldDescriptor]) -> Result<()> {
        let registry = &*self.registry;
        let arguments = fields
            .iter()
            .filter(|field| field.in_init)
            .map(|field| {
                let recovered = self
                    .recovered
                    .iter()
                    .find(|var| var.name == field.name)
                    .and_then(|var| var.ty.resolved().cloned());
                let ty = recovered
                    .or_else(|| field_type(registry, self.id, &field.name))
                    .unwrap_or(Type::Any);
                field.to_argument(ty)
            })
            .collect();
        let init = FuncDef::new("__init__", arguments, Type::NoneType);
        self.add_method(init)
    }

    /// `_DT`, bound to the class itself so comparisons only accept the same type.
    fn add_self_type_var(&mut self) -> Result<()> {
        let name = self.config.self_tvar_name.clone();
        let info = self.info_mut()?;
        let tvar = TypeVarExpr {
            fullname: info.member_fullname(&name),
            name: name.clone(),
            upper_bound: info.instance_type(),
        };
        info.names
            .insert(name.clone(), SymbolTableNode::generated(SymbolNode::TypeVarExpr(tvar)));
        self.generated.push(name);
        Ok(())
    }

    fn add_ordering(&mut self, flags: DecoratorFlags) -> Result<()> {
        let class_position = self.info()?.defn.position;
        if !flags.eq {
            self.diag
                .report(DiagnosticKind::OrderWithoutEq, class_position)
                .emit();
            return Ok(());
        }

        for name in ORDERING_METHODS {
            let existing = self
                .info()?
                .names
                .get(name)
                .filter(|node| !node.plugin_generated)
                .map(|node| node_position(&node.node, class_position));
            match existing {
                Some(position) => self
                    .diag
                    .report(DiagnosticKind::CustomOrderMethod, position)
                    .message(name)
                    .related_to("order=True requested here", class_position)
                    .emit(),
                None => self.add_comparison(name)?,
            }
        }
        Ok(())
    }

    /// `def name(self: _DT, other: _DT) -> bool`
    fn add_comparison(&mut self, name: &str) -> Result<()> {
        let info = self.info()?;
        let tvar = TypeVarDef::new(
            self.config.self_tvar_name.clone(),
            info.member_fullname(&self.config.self_tvar_name),
            -1,
            info.instance_type(),
        );
        let other = Type::TypeVar(tvar.clone());
        let argument = Argument {
            variable: Var::new("other", other.clone()),
            annotation: Some(other.clone()),
            kind: ArgKind::Positional,
        };

        let mut method = FuncDef::new(name, vec![argument], Type::instance(self.config.bool_type.clone()));
        method.self_type = Some(other);
        method.type_vars = vec![tvar];
        self.add_method(method)
    }

    /// Insert a generated method into the member table and the class body.
    fn add_method(&mut self, mut method: FuncDef) -> Result<()> {
        let info = self.info_mut()?;
        method.fullname = info.member_fullname(&method.name);
        method.position = info.defn.position;
        let name = method.name.clone();

        info.defn.body.push(Statement::Func(method.clone()));
        info.names
            .insert(name.clone(), SymbolTableNode::generated(SymbolNode::Func(method)));

        tracing::trace!(member = %name, "generated member");
        self.generated.push(name);
        Ok(())
    }
}

/// Where a user-written member is declared; `fallback` for nodes without a position.
fn node_position(node: &SymbolNode, fallback: Position) -> Position {
    match node {
        SymbolNode::Var(var) => var.position,
        SymbolNode::Func(func) => func.position,
        SymbolNode::TypeVarExpr(_) | SymbolNode::Placeholder => fallback,
    }
}
