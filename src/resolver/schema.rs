use super::{parse_default, InferMode, Resolver};
use crate::common_types::CommonName;
use crate::error::{Result, SchemaError};
use crate::model::SchemaObject;
use crate::reflect::{FieldDescriptor, Kind, TypeDescriptor};
use std::collections::BTreeMap;
use tracing::warn;

impl Resolver {
    /// Resolve a top-level type into a schema.
    ///
    /// Named structs, arrays and maps are registered as definitions and a reference is
    /// returned; everything else is described inline. Nested named structs are queued and must
    /// be expanded by draining the queue afterwards.
    ///
    /// # Errors
    ///
    /// Fails on behavior-bearing interfaces, unsupported kinds and failing custom definitions.
    pub fn resolve(&self, desc: &TypeDescriptor) -> Result<SchemaObject> {
        if let Some(reference) = self.register_custom(desc)? {
            return Ok(reference);
        }

        if let Some(target) = self.mapped(desc) {
            return self.resolve(&target);
        }

        if let Kind::Pointer(inner) = desc.kind {
            return self.resolve(&inner());
        }

        if !desc.is_named() {
            return match &desc.kind {
                Kind::Struct(fields) => self.inline_object(fields),
                _ => self.infer(desc, InferMode::Definition),
            };
        }

        let (name, mut schema) = match &desc.kind {
            Kind::Struct(_) | Kind::Array(_) | Kind::Map(_) => {
                let name = self.registry.allocate_name(
                    desc.id,
                    desc.display_name(),
                    desc.qualified_name,
                );
                if self.registry.exists(&name) {
                    return Ok(SchemaObject::reference(&name));
                }
                (name, self.expand_named(desc)?)
            }
            _ => {
                let mut schema = self.infer(desc, InferMode::Definition)?;
                schema.type_name = schema.schema_type.clone();
                return Ok(schema);
            }
        };

        if self.reflect_types() {
            schema.rust_type = desc.qualified_name.to_string();
        }
        self.registry.register(&name, schema);
        Ok(SchemaObject::reference(&name))
    }

    /// Full schema of a named struct, array or map.
    fn expand_named(&self, desc: &TypeDescriptor) -> Result<SchemaObject> {
        match &desc.kind {
            Kind::Struct(fields) => self.inline_object(fields),
            Kind::Array(elem) => {
                let elem = elem().deref_pointers();
                let items = match &elem.kind {
                    Kind::Struct(fields) if !elem.is_named() => self.inline_object(fields)?,
                    _ => self.infer(&elem, InferMode::Definition)?,
                };
                Ok(SchemaObject::array(items))
            }
            Kind::Map(values) => Ok(SchemaObject::map(
                self.infer(&values(), InferMode::Definition)?,
            )),
            _ => self.infer(desc, InferMode::Definition),
        }
    }

    /// Structural inference for a nested type.
    ///
    /// # Errors
    ///
    /// Fails on behavior-bearing interfaces, unsupported kinds and failing custom definitions.
    pub fn infer(&self, desc: &TypeDescriptor, mode: InferMode) -> Result<SchemaObject> {
        let custom = match mode {
            InferMode::Definition => self.register_custom(desc)?,
            InferMode::Parameter => self.inline_custom(desc)?,
        };
        if let Some(schema) = custom {
            return Ok(schema);
        }

        if let Some(target) = self.mapped(desc) {
            return self.infer(&target, mode);
        }

        let mut schema = match &desc.kind {
            Kind::Pointer(inner) => return self.infer(&inner(), mode),
            Kind::Bool => SchemaObject::from_common_name(CommonName::Boolean),
            Kind::Int8
            | Kind::Int16
            | Kind::Int32
            | Kind::Isize
            | Kind::Uint8
            | Kind::Uint16
            | Kind::Usize => SchemaObject::from_common_name(CommonName::Integer),
            // u32 does not fit the int32 range, so it is promoted along with the 64-bit kinds.
            Kind::Int64 | Kind::Uint32 | Kind::Uint64 => {
                SchemaObject::from_common_name(CommonName::Long)
            }
            Kind::Float32 => SchemaObject::from_common_name(CommonName::Float),
            Kind::Float64 => SchemaObject::from_common_name(CommonName::Double),
            Kind::String | Kind::Char => SchemaObject::from_common_name(CommonName::String),
            Kind::Bytes => SchemaObject::default(),
            Kind::Array(elem) => SchemaObject::array(self.infer(&elem(), mode)?),
            Kind::Map(values) => SchemaObject::map(self.infer(&values(), mode)?),
            Kind::Timestamp => SchemaObject::from_common_name(CommonName::DateTime),
            Kind::Text => SchemaObject::from_type_name("string"),
            Kind::Struct(fields) if !desc.is_named() => match mode {
                InferMode::Definition => self.inline_object(fields)?,
                InferMode::Parameter => SchemaObject::reference(desc.display_name()),
            },
            Kind::Struct(_) => match mode {
                InferMode::Definition => self.defer(desc),
                InferMode::Parameter => SchemaObject::reference(desc.display_name()),
            },
            Kind::Interface { has_methods: true } => {
                return Err(SchemaError::UnsupportedInterface {
                    type_name: desc.qualified_name.to_string(),
                })
            }
            Kind::Interface { has_methods: false } => SchemaObject::default(),
            Kind::Unsupported(kind) => {
                return Err(SchemaError::UnsupportedKind {
                    kind: *kind,
                    type_name: desc.qualified_name.to_string(),
                })
            }
        };

        if self.reflect_types() && !schema.is_reference() {
            schema.rust_type = desc.qualified_name.to_string();
        }
        Ok(schema)
    }

    /// Reference a named struct and queue it unless it is registered or queued already.
    fn defer(&self, desc: &TypeDescriptor) -> SchemaObject {
        let name = self
            .registry
            .allocate_name(desc.id, desc.display_name(), desc.qualified_name);
        if !self.registry.exists_type(desc.id) && !self.queue.contains(desc.id) {
            self.queue.enqueue(desc.clone());
        }
        SchemaObject::reference(&name)
    }

    /// Object schema built from struct fields.
    fn inline_object(&self, fields: &[FieldDescriptor]) -> Result<SchemaObject> {
        let mut object = SchemaObject::object();
        let properties = self.properties(fields, &mut object)?;
        object.properties = properties;
        Ok(object)
    }

    /// Properties of a struct.
    ///
    /// Private and unserialized fields are skipped. Embedded struct fields contribute their own
    /// properties, later fields overwriting earlier ones with the same name. Property metadata
    /// for `x-rust-property-*` is recorded on `parent`.
    fn properties(
        &self,
        fields: &[FieldDescriptor],
        parent: &mut SchemaObject,
    ) -> Result<BTreeMap<String, SchemaObject>> {
        let mut properties = BTreeMap::new();

        for field in fields {
            if !field.exported {
                continue;
            }

            let ty = (field.ty)();

            if field.embedded {
                if let Kind::Struct(inner) = &ty.deref_pointers().kind {
                    let embedded = self.properties(inner, parent)?;
                    properties.extend(embedded);
                }
                continue;
            }

            let Some(json_name) = field.json_name else {
                continue;
            };

            let mut schema = match field.config.schema_type {
                Some(common) => SchemaObject::from_type_name(common),
                None => self.infer(&ty, InferMode::Definition)?,
            };

            if let Some(text) = field.config.default {
                match parse_default(&ty, text) {
                    Ok(value) => schema.default = Some(value),
                    Err(err) => warn!(
                        field = %field.name,
                        default = %text,
                        error = %err,
                        "ignoring unparsable default value"
                    ),
                }
            }

            if let Some(description) = field.config.description {
                if !schema.is_reference() {
                    schema.description = description.to_string();
                }
            }

            if self.reflect_types() {
                if !schema.is_reference() {
                    schema.rust_type = ty.qualified_name.to_string();
                }
                parent
                    .rust_property_names
                    .insert(json_name.to_string(), field.name.to_string());
                parent
                    .rust_property_types
                    .insert(json_name.to_string(), ty.qualified_name.to_string());
            }

            properties.insert(json_name.to_string(), schema);
        }

        Ok(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{describe, Reflect};
    use serde_json::json;

    struct Node;

    impl Reflect for Node {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::named::<Node>(
                "Node",
                Kind::Struct(vec![
                    FieldDescriptor::new("value", i64::descriptor),
                    FieldDescriptor::new("next", <Option<Box<Node>>>::descriptor),
                ]),
            )
        }
    }

    #[test]
    fn test_primitive_table() {
        let resolver = Resolver::new();
        let cases = [
            (describe::<bool>(), json!({"type": "boolean"})),
            (describe::<i8>(), json!({"type": "integer", "format": "int32"})),
            (describe::<u16>(), json!({"type": "integer", "format": "int32"})),
            (describe::<usize>(), json!({"type": "integer", "format": "int32"})),
            (describe::<i64>(), json!({"type": "integer", "format": "int64"})),
            (describe::<u32>(), json!({"type": "integer", "format": "int64"})),
            (describe::<f32>(), json!({"type": "number", "format": "float"})),
            (describe::<f64>(), json!({"type": "number", "format": "double"})),
            (describe::<char>(), json!({"type": "string"})),
            (
                describe::<chrono::NaiveDateTime>(),
                json!({"type": "string", "format": "date-time"}),
            ),
            (describe::<uuid::Uuid>(), json!({"type": "string"})),
            (describe::<serde_json::Value>(), json!({})),
        ];
        for (desc, expected) in cases {
            let schema = resolver.infer(&desc, InferMode::Definition).unwrap();
            assert_eq!(serde_json::to_value(&schema).unwrap(), expected, "{}", desc.qualified_name);
        }
    }

    #[test]
    fn test_recursive_type_is_deferred() {
        let resolver = Resolver::new();
        let schema = resolver.resolve(&describe::<Node>()).unwrap();
        assert_eq!(schema.reference, "#/definitions/Node");
        let node = resolver.registry.get("Node").unwrap();
        assert_eq!(node.properties["next"].reference, "#/definitions/Node");

        // The self-reference was queued while Node was being expanded; resolving it again is
        // a no-op returning the same reference.
        assert!(resolver.queue.contains(std::any::TypeId::of::<Node>()));
        let again = resolver.resolve(&describe::<Node>()).unwrap();
        assert_eq!(again, schema);
        assert_eq!(resolver.registry.len(), 1);
    }

    #[test]
    fn test_behavior_interface_fails() {
        let resolver = Resolver::new();
        let err = resolver
            .infer(
                &describe::<Box<dyn std::error::Error + Send + Sync>>(),
                InferMode::Definition,
            )
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedInterface { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_named_primitive_keeps_type_name() {
        let resolver = Resolver::new();
        let schema = resolver.resolve(&describe::<String>()).unwrap();
        assert_eq!(schema.schema_type, "string");
        assert_eq!(schema.type_name, "string");
        assert!(!resolver.is_schema_empty(&schema));
    }
}
