use super::Extensions;
use crate::common_types::{is_common_name, CommonName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Prefix of every reference to a named definition.
pub const REF_DEFINITION_PREFIX: &str = "#/definitions/";

/// A JSON-Schema-like description of a value, as used by Swagger 2.0.
///
/// Exactly one of the following describes the shape:
///
/// - a primitive `type` (+ optional `format`)
/// - `type = "array"` with `items`
/// - `type = "object"` with `additional_properties` (a map)
/// - `type = "object"` with `properties` (a struct)
/// - a non-empty `reference`, in which case no other structural field is set
///
/// `type_name` is internal bookkeeping and never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaObject {
    #[serde(rename = "$ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub schema_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaObject>>,
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<SchemaObject>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaObject>,
    #[serde(skip)]
    pub type_name: String,
    #[serde(rename = "x-rust-type", default, skip_serializing_if = "String::is_empty")]
    pub rust_type: String,
    #[serde(
        rename = "x-rust-property-names",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub rust_property_names: BTreeMap<String, String>,
    #[serde(
        rename = "x-rust-property-types",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub rust_property_types: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl SchemaObject {
    /// Schema for a predeclared common type.
    pub fn from_common_name(name: CommonName) -> Self {
        let tf = name.type_format();
        SchemaObject {
            schema_type: tf.json_type.to_string(),
            format: tf.format.to_string(),
            ..Default::default()
        }
    }

    /// Schema for a symbolic type name.
    ///
    /// Known common names expand to their `(type, format)` pair; anything else is used verbatim
    /// as the JSON type (e.g. `"file"`), with no format.
    pub fn from_type_name(name: &str) -> Self {
        match CommonName::lookup(name) {
            Some(common) => Self::from_common_name(common),
            None => SchemaObject {
                schema_type: name.to_string(),
                ..Default::default()
            },
        }
    }

    /// A reference schema pointing at the named definition.
    pub fn reference(type_name: &str) -> Self {
        SchemaObject {
            reference: format!("{REF_DEFINITION_PREFIX}{type_name}"),
            type_name: type_name.to_string(),
            ..Default::default()
        }
    }

    pub fn object() -> Self {
        SchemaObject {
            schema_type: "object".to_string(),
            ..Default::default()
        }
    }

    pub fn array(items: SchemaObject) -> Self {
        SchemaObject {
            schema_type: "array".to_string(),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    pub fn map(values: SchemaObject) -> Self {
        SchemaObject {
            schema_type: "object".to_string(),
            additional_properties: Some(Box::new(values)),
            ..Default::default()
        }
    }

    pub fn is_reference(&self) -> bool {
        !self.reference.is_empty()
    }

    /// Name of the definition a reference schema points at.
    pub fn referenced_name(&self) -> Option<&str> {
        self.reference.strip_prefix(REF_DEFINITION_PREFIX)
    }

    /// The abridged reference form of this schema: only `reference` and `type_name` survive.
    pub fn export(&self) -> SchemaObject {
        SchemaObject {
            reference: self.reference.clone(),
            type_name: self.type_name.clone(),
            ..Default::default()
        }
    }

    /// Whether the schema describes nothing.
    ///
    /// Common types and references are never empty. Otherwise an object is empty without
    /// properties, an array is empty without items, and anything else is empty when it has
    /// neither properties, additional properties nor a format.
    pub fn is_empty(&self) -> bool {
        if is_common_name(&self.type_name) || self.is_reference() {
            return false;
        }

        match self.schema_type.as_str() {
            "object" => self.properties.is_empty(),
            "array" => self.items.is_none(),
            _ => {
                self.properties.is_empty()
                    && self.additional_properties.is_none()
                    && self.format.is_empty()
            }
        }
    }
}
