//! Textual dump of a class after synthesis, used by tests and debugging.

use std::fmt::Write;

use dataform_core::{ArgKind, ClassInfo, FuncDef, SymbolNode, SymbolTableNode, TypeBinding};

use crate::config::Config;
use crate::dataclass::ClassMetadata;

/// Render the member table and persisted records of `info`.
///
/// Members are listed in table order. The record stored under the
/// configured metadata key is decoded; other records are printed as JSON.
pub fn dump_class(info: &ClassInfo, config: &Config) -> String {
    let mut out = String::new();
    write_class(&mut out, info, config).expect("String write never fails");
    out
}

fn write_class(w: &mut impl Write, info: &ClassInfo, config: &Config) -> std::fmt::Result {
    writeln!(w, "class {}", info.fullname)?;
    for (name, node) in info.names.iter() {
        writeln!(w, "  {}", member_line(name, node))?;
    }

    for (key, value) in &info.metadata {
        if key != config.get_metadata_key() {
            writeln!(w, "{key}: {value}")?;
            continue;
        }
        let Ok(Some(record)) = ClassMetadata::read(info, key) else {
            writeln!(w, "{key}: <malformed>")?;
            continue;
        };
        writeln!(w, "{key}: frozen={}", record.frozen)?;
        for field in record.fields() {
            let mut traits = Vec::new();
            if field.in_init {
                traits.push("init");
            }
            if field.init_only {
                traits.push("init-only");
            }
            if field.has_default {
                traits.push("default");
            }
            write!(w, "  {} @{}", field.name, field.position())?;
            if !traits.is_empty() {
                write!(w, " {}", traits.join(", "))?;
            }
            writeln!(w)?;
        }
    }
    Ok(())
}

fn member_line(name: &str, entry: &SymbolTableNode) -> String {
    let mut markers = Vec::new();
    let mut line = match &entry.node {
        SymbolNode::Var(var) => {
            if var.is_classvar {
                markers.push("classvar");
            }
            if var.is_property {
                markers.push("property");
            }
            match &var.ty {
                TypeBinding::Resolved(ty) => format!("{name}: {ty}"),
                TypeBinding::Pending => format!("{name}: <pending>"),
            }
        }
        SymbolNode::Func(func) => signature(func),
        SymbolNode::TypeVarExpr(tvar) => format!("{name} = TypeVar(bound={})", tvar.upper_bound),
        SymbolNode::Placeholder => format!("{name}: <placeholder>"),
    };
    if entry.plugin_generated {
        markers.push("generated");
    }
    if !markers.is_empty() {
        line.push_str(&format!(" [{}]", markers.join(", ")));
    }
    line
}

/// `def name[T <: B](self: T, arg: ty = ...) -> ret`
fn signature(func: &FuncDef) -> String {
    let mut out = format!("def {}", func.name);
    if !func.type_vars.is_empty() {
        let vars: Vec<String> = func
            .type_vars
            .iter()
            .map(|tv| format!("{} <: {}", tv.name, tv.upper_bound))
            .collect();
        out.push_str(&format!("[{}]", vars.join(", ")));
    }

    let mut params = vec![match &func.self_type {
        Some(ty) => format!("self: {ty}"),
        None => "self".to_owned(),
    }];
    for arg in &func.arguments {
        let mut param = match &arg.annotation {
            Some(ty) => format!("{}: {ty}", arg.name()),
            None => arg.name().to_owned(),
        };
        if arg.kind == ArgKind::Optional {
            param.push_str(" = ...");
        }
        params.push(param);
    }

    out.push_str(&format!("({}) -> {}", params.join(", "), func.return_type));
    out
}
