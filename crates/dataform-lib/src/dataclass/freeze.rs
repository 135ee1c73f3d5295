use dataform_core::{ClassId, ClassRegistry, SymbolNode, SymbolTableNode, Type};

use super::field::FieldDescriptor;
use super::synthesize::field_type;
use crate::{Error, Result};

/// Make every field a read-only property of the class, or a plain attribute
/// again when `frozen` is off.
///
/// Inherited fields of a frozen class get a generated property on the class
/// itself so that assignment through an instance of this class is rejected
/// too. Constructor-only fields are skipped; they leave the table anyway.
pub(crate) fn apply_frozen(
    registry: &mut ClassRegistry,
    id: ClassId,
    fields: &[FieldDescriptor],
    frozen: bool,
) -> Result<()> {
    let fields: Vec<&FieldDescriptor> = fields.iter().filter(|field| !field.init_only).collect();
    let declared_types: Vec<Option<Type>> = fields
        .iter()
        .map(|field| field_type(registry, id, &field.name))
        .collect();

    let info = registry.get_mut(id).ok_or(Error::UnknownClass(id.as_u32()))?;
    for (field, ty) in fields.into_iter().zip(declared_types) {
        if let Some(var) = info.names.get_mut(&field.name).and_then(|node| node.node.as_var_mut()) {
            var.is_property = frozen;
            continue;
        }
        if !frozen {
            continue;
        }

        let mut var = field.to_var(ty.unwrap_or(Type::Any));
        var.fullname = info.member_fullname(&field.name);
        var.is_property = true;
        info.names
            .insert(field.name.clone(), SymbolTableNode::generated(SymbolNode::Var(var)));
        tracing::trace!(field = %field.name, "froze inherited field");
    }
    Ok(())
}
