//! Field collection: the class's own declarations merged with its ancestors'.

use std::collections::HashSet;

use dataform_core::{
    ClassId, ClassInfo, ClassRegistry, Statement, SymbolNode, Type, TypeBinding, Var,
};

use super::field::FieldDescriptor;
use super::field_spec::FieldSpec;
use super::metadata::ClassMetadata;
use super::outcome::DeferReason;
use crate::config::Config;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::{Error, Result};

/// Fields of a class in constructor order, plus the ancestors they came from.
#[derive(Clone, Debug, Default)]
pub(crate) struct Collection {
    pub(crate) fields: Vec<FieldDescriptor>,
    /// Data-holder ancestors whose records were merged, nearest first.
    pub(crate) dependencies: Vec<String>,
    /// Inherited constructor-only fields, recovered from ancestor constructors.
    pub(crate) recovered: Vec<Var>,
}

pub(crate) enum Collected {
    Ready(Collection),
    NotReady(DeferReason),
}

/// Collect the fields of `id`.
///
/// Constructor-only fields inherited from ancestors are returned alongside
/// the fields so the constructor can be typed; they never enter the class's
/// member table.
pub(crate) fn collect_fields(
    registry: &mut ClassRegistry,
    id: ClassId,
    config: &Config,
    diag: &mut Diagnostics,
) -> Result<Collected> {
    let info = registry
        .get_mut(id)
        .ok_or(Error::UnknownClass(id.as_u32()))?;
    let own = match collect_own(info, config) {
        Ok(own) => own,
        Err(reason) => return Ok(Collected::NotReady(reason)),
    };

    let mut known: HashSet<String> = own.iter().map(|f| f.name.clone()).collect();
    let mut all = own;
    let mut dependencies = Vec::new();
    let mut recovered: Vec<Var> = Vec::new();

    let mro = registry
        .get(id)
        .map(|info| info.mro.clone())
        .unwrap_or_default();
    // The class itself and the root never contribute.
    let ancestors = mro.get(1..mro.len().saturating_sub(1)).unwrap_or(&[]);

    for &ancestor_id in ancestors {
        let Some(ancestor) = registry.get(ancestor_id) else {
            continue;
        };
        let record = match ClassMetadata::read(ancestor, &config.metadata_key)? {
            Some(record) => record,
            None if config.is_data_holder(ancestor) => {
                return Ok(Collected::NotReady(DeferReason::AncestorNotSynthesized(
                    ancestor.fullname.clone(),
                )));
            }
            None => continue,
        };
        dependencies.push(ancestor.fullname.clone());

        let mut inherited = Vec::with_capacity(record.attributes.len());
        for field in record.attributes.into_values() {
            if known.insert(field.name.clone()) {
                if field.init_only
                    && let Some(var) = init_only_parameter(registry, ancestor_id, &field.name)
                {
                    recovered.push(var);
                }
                tracing::trace!(field = %field.name, from = %ancestor.fullname, "inherited field");
                inherited.push(field);
            } else if let Some(pos) = all.iter().position(|f| f.name == field.name) {
                // Overridden further down: keep the derived descriptor, but at
                // the ancestor's slot.
                inherited.push(all.remove(pos));
            }
        }
        inherited.append(&mut all);
        all = inherited;
    }

    check_ordering(&all, diag);

    Ok(Collected::Ready(Collection {
        fields: all,
        dependencies,
        recovered,
    }))
}

/// Scan the class body for annotated declarations.
fn collect_own(
    info: &mut ClassInfo,
    config: &Config,
) -> std::result::Result<Vec<FieldDescriptor>, DeferReason> {
    let mut fields = Vec::new();

    for stmt in &info.defn.body {
        let Statement::Assign(assign) = stmt else {
            continue;
        };
        if !assign.is_declaration() {
            continue;
        }

        let name = &assign.target.name;
        // No symbol at all: shadowed by a star import, the analyzer defers elsewhere.
        let Some(sym) = info.names.get_mut(name) else {
            continue;
        };
        let var = match &mut sym.node {
            SymbolNode::Var(var) => var,
            SymbolNode::Placeholder => return Err(DeferReason::PlaceholderSymbol(name.clone())),
            SymbolNode::Func(_) | SymbolNode::TypeVarExpr(_) => continue,
        };
        if var.is_classvar {
            continue;
        }

        let declared = match &assign.annotation {
            Some(TypeBinding::Resolved(ty)) => Some(ty),
            _ => None,
        };
        let wrapper = &config.init_var_wrapper;
        let unwrapped = match &var.ty {
            TypeBinding::Resolved(ty) if ty.is_instance_of(wrapper) => Some(wrapped_type(ty)),
            _ => None,
        };
        let init_only = unwrapped.is_some() || declared.is_some_and(|ty| ty.is_instance_of(wrapper));
        if let Some(inner) = unwrapped {
            var.ty = TypeBinding::Resolved(inner);
        }

        let spec = FieldSpec::parse(&assign.value, &config.field_helper);
        let (in_init, has_default) = match &spec {
            Some(spec) => (spec.in_init(), spec.has_default()),
            // Any other initializer is a default; the checker validates its type.
            None => (true, !assign.value.is_empty()),
        };

        fields.push(FieldDescriptor {
            in_init,
            init_only,
            has_default,
            ..FieldDescriptor::new(name.clone(), assign.position)
        });
    }

    Ok(fields)
}

fn wrapped_type(wrapper: &Type) -> Type {
    wrapper.args().first().cloned().unwrap_or(Type::Any)
}

/// Recover a constructor-only field from the constructor generated for
/// `owner` (or the nearest constructor above it).
///
/// The field itself was removed from `owner`'s table after its own
/// synthesis, so the constructor parameter is the only place left that
/// still knows its type.
fn init_only_parameter(registry: &ClassRegistry, owner: ClassId, name: &str) -> Option<Var> {
    let init = registry.lookup_method(owner, "__init__")?;
    init.argument(name).map(|arg| arg.variable.clone())
}

/// Report every in-constructor field without a default that follows one with a default.
fn check_ordering(fields: &[FieldDescriptor], diag: &mut Diagnostics) {
    let mut found_default = false;
    for field in fields {
        if found_default && field.in_init && !field.has_default {
            diag.report(DiagnosticKind::NonDefaultAfterDefault, field.position())
                .message(&field.name)
                .emit();
        }
        found_default |= field.has_default && field.in_init;
    }
}
