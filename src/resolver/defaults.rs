use crate::reflect::{Kind, TypeDescriptor};
use anyhow::{anyhow, Context};
use serde_json::Value;

/// Parse a textual default value according to the kind of the field it belongs to.
///
/// Integers are read as 64-bit signed, unsigned integers as 64-bit unsigned, floats as
/// 64-bit, booleans with the usual `1/t/true/0/f/false` spellings, and strings are taken
/// verbatim. Any other kind must be valid JSON.
pub fn parse_default(desc: &TypeDescriptor, text: &str) -> anyhow::Result<Value> {
    let desc = desc.clone().deref_pointers();

    match desc.kind {
        Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 | Kind::Isize => {
            let v: i64 = text
                .parse()
                .with_context(|| format!("invalid integer default `{text}`"))?;
            Ok(Value::from(v))
        }
        Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64 | Kind::Usize => {
            let v: u64 = text
                .parse()
                .with_context(|| format!("invalid unsigned default `{text}`"))?;
            Ok(Value::from(v))
        }
        Kind::Float32 | Kind::Float64 => {
            let v: f64 = text
                .parse()
                .with_context(|| format!("invalid float default `{text}`"))?;
            serde_json::Number::from_f64(v)
                .map(Value::Number)
                .ok_or_else(|| anyhow!("float default `{text}` is not a finite number"))
        }
        Kind::String | Kind::Char => Ok(Value::String(text.to_string())),
        Kind::Bool => parse_bool(text).map(Value::Bool),
        _ => serde_json::from_str(text).with_context(|| format!("invalid JSON default `{text}`")),
    }
}

fn parse_bool(text: &str) -> anyhow::Result<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(anyhow!("invalid boolean default `{other}`")),
    }
}
