//! The data-holder transform.
//!
//! One call to [`transform_class`] handles one class. The analyzer may call
//! it several times for the same class as forward references resolve. A
//! deferred run leaves generated members alone; a completed run drops what
//! earlier runs generated and builds it again from the current state.

mod collect;
mod field;
mod field_spec;
mod flags;
mod freeze;
mod init_only;
mod metadata;
mod outcome;
mod synthesize;

#[cfg(test)]
mod transform_tests;

use dataform_core::{ClassId, ClassRegistry, SymbolNode};

pub use field::FieldDescriptor;
pub use field_spec::FieldSpec;
pub use flags::DecoratorFlags;
pub use metadata::ClassMetadata;
pub use outcome::{DeferReason, Outcome, Synthesis};

use collect::{Collected, collect_fields};
use freeze::apply_frozen;
use init_only::reset_init_only_vars;
use synthesize::{Synthesizer, clear_generated, declared_node};

use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::{Error, Result};

/// Synthesize the members of a data-holder class.
///
/// On [`Outcome::Deferred`] nothing is reported; any partial changes are
/// ones a later run repeats identically. Diagnostics of a completed run
/// are appended to `diag`.
pub fn transform_class(
    registry: &mut ClassRegistry,
    id: ClassId,
    config: &Config,
    diag: &mut Diagnostics,
) -> Result<Outcome> {
    let fullname = registry
        .get(id)
        .map(|info| info.fullname.clone())
        .ok_or(Error::UnknownClass(id.as_u32()))?;
    let _span = tracing::debug_span!("dataclass_transform", class = %fullname).entered();

    let mut scratch = Diagnostics::new();
    let collection = match collect_fields(registry, id, config, &mut scratch)? {
        Collected::Ready(collection) => collection,
        Collected::NotReady(reason) => return Ok(defer(reason)),
    };
    if let Some(reason) = pending_field(registry, id, &collection.fields) {
        return Ok(defer(reason));
    }

    let (flags, class_position) = {
        let info = registry.get_mut(id).ok_or(Error::UnknownClass(id.as_u32()))?;
        clear_generated(info);
        let position = info.defn.position;
        let flags = DecoratorFlags::from_decorator(config.find_decorator(info), position, &mut scratch);
        (flags, position)
    };
    tracing::trace!(?flags, at = %class_position, "decorator flags");

    let mut synthesizer =
        Synthesizer::new(registry, id, config, &mut scratch, &collection.recovered);
    synthesizer.run(&collection.fields, flags)?;
    let generated = std::mem::take(&mut synthesizer.generated);

    apply_frozen(registry, id, &collection.fields, flags.frozen)?;

    let info = registry.get_mut(id).ok_or(Error::UnknownClass(id.as_u32()))?;
    reset_init_only_vars(info, &collection.fields);
    ClassMetadata::new(&collection.fields, flags.frozen).write(info, &config.metadata_key)?;

    tracing::debug!(
        fields = collection.fields.len(),
        generated = generated.len(),
        diagnostics = scratch.len(),
        "synthesized"
    );
    diag.extend(scratch);

    Ok(Outcome::Synthesized(Synthesis {
        fields: collection.fields,
        flags,
        generated,
        dependencies: collection.dependencies,
    }))
}

fn defer(reason: DeferReason) -> Outcome {
    tracing::debug!(%reason, "deferred");
    Outcome::Deferred(reason)
}

/// First field whose type is not known yet.
///
/// Inherited constructor-only fields have no symbol anywhere and are skipped.
/// Properties materialized by an earlier run are looked through, so a field
/// whose declaration became pending again is noticed.
fn pending_field(
    registry: &ClassRegistry,
    id: ClassId,
    fields: &[FieldDescriptor],
) -> Option<DeferReason> {
    fields.iter().find_map(|field| {
        let Some(node) = declared_node(registry, id, &field.name) else {
            return (!field.init_only).then(|| DeferReason::PendingType(field.name.clone()));
        };
        match node {
            SymbolNode::Var(var) if var.ty.is_pending() => {
                Some(DeferReason::PendingType(field.name.clone()))
            }
            SymbolNode::Placeholder => Some(DeferReason::PlaceholderSymbol(field.name.clone())),
            SymbolNode::Var(_) | SymbolNode::Func(_) | SymbolNode::TypeVarExpr(_) => None,
        }
    })
}
