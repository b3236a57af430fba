//! Argument validation against a JSON Schema subset.
//!
//! Supported keywords: `type` (a name or a list of names), `required`, `properties`,
//! `additionalProperties: false`, `items` and `enum`. Anything else is ignored, so an
//! empty schema accepts every value.

use serde_json::{Map, Value};

use crate::tool_source::ToolError;

/// Checks `args` against `schema`; the error names the offending path.
pub fn validate_arguments(schema: &Value, args: &Value) -> Result<(), ToolError> {
    check(schema, args, "$").map_err(ToolError::InvalidArguments)
}

fn check(schema: &Value, value: &Value, path: &str) -> Result<(), String> {
    let schema = match schema.as_object() {
        Some(s) => s,
        None => return Ok(()),
    };

    if let Some(ty) = schema.get("type") {
        let allowed: Vec<&str> = match ty {
            Value::String(s) => vec![s.as_str()],
            Value::Array(list) => list.iter().filter_map(Value::as_str).collect(),
            _ => vec![],
        };
        if !allowed.is_empty() && !allowed.iter().any(|t| matches_type(t, value)) {
            return Err(format!(
                "{}: expected {}, got {}",
                path,
                allowed.join(" or "),
                type_name(value)
            ));
        }
    }

    if let Some(Value::Array(options)) = schema.get("enum") {
        if !options.contains(value) {
            return Err(format!("{}: {} is not one of the allowed values", path, value));
        }
    }

    if let Value::Object(obj) = value {
        check_object(schema, obj, path)?;
    }

    if let (Value::Array(items), Some(item_schema)) = (value, schema.get("items")) {
        for (i, item) in items.iter().enumerate() {
            check(item_schema, item, &format!("{}[{}]", path, i))?;
        }
    }
    Ok(())
}

fn check_object(schema: &Map<String, Value>, obj: &Map<String, Value>, path: &str) -> Result<(), String> {
    if let Some(Value::Array(required)) = schema.get("required") {
        for key in required.iter().filter_map(Value::as_str) {
            if !obj.contains_key(key) {
                return Err(format!("{}: missing required property '{}'", path, key));
            }
        }
    }

    let properties = schema.get("properties").and_then(Value::as_object);
    if let Some(props) = properties {
        for (key, prop_schema) in props {
            if let Some(v) = obj.get(key) {
                check(prop_schema, v, &format!("{}.{}", path, key))?;
            }
        }
    }

    if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
        if let Some(extra) = obj
            .keys()
            .find(|k| !properties.map_or(false, |p| p.contains_key(k.as_str())))
        {
            return Err(format!("{}: unexpected property '{}'", path, extra));
        }
    }
    Ok(())
}

fn matches_type(ty: &str, value: &Value) -> bool {
    match ty {
        "object" => value.is_object(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
