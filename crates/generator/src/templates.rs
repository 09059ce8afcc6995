//! Template loading and management

use protostub_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Name of the fuzzing stub template
pub const STUB_TEMPLATE: &str = "fuzz_stub.cc";

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("cpp_type", cpp_type_filter);

    tera.add_raw_template(STUB_TEMPLATE, include_str!("../templates/fuzz_stub.cc.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load {} template: {}", STUB_TEMPLATE, e))
        })?;

    Ok(tera)
}

/// C++ spelling of a schema type name
///
/// Dotted names are treated as already package-qualified; a leading dot marks
/// a fully-qualified name and becomes a leading `::`. Bare names are placed in
/// the namespace of `package`.
pub fn cpp_type_name(type_name: &str, package: &str) -> String {
    if let Some(absolute) = type_name.strip_prefix('.') {
        return format!("::{}", absolute.replace('.', "::"));
    }
    if type_name.contains('.') {
        return type_name.replace('.', "::");
    }
    if package.is_empty() {
        return type_name.to_string();
    }
    format!("{}::{}", package.replace('.', "::"), type_name)
}

/// Filter to convert a request type name to its C++ type
fn cpp_type_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let type_name = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("cpp_type filter expects a string"))?;

    let package = args.get("package").and_then(Value::as_str).unwrap_or("");

    Ok(Value::String(cpp_type_name(type_name, package)))
}
