use dataform_core::{ClassInfo, Statement};

use super::field::FieldDescriptor;

/// Drop constructor-only fields from the class once the constructor exists.
///
/// Their declarations lose their binding, so the analyzer's next binding
/// pass registers them afresh and a re-run sees the same declarations.
pub(crate) fn reset_init_only_vars(info: &mut ClassInfo, fields: &[FieldDescriptor]) {
    for field in fields.iter().filter(|field| field.init_only) {
        info.names.remove(&field.name);

        for stmt in &mut info.defn.body {
            let Statement::Assign(assign) = stmt else {
                continue;
            };
            if assign.is_declaration() && assign.target.name == field.name {
                assign.target.binding = None;
            }
        }
    }
}
