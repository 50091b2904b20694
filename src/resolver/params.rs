use super::{parse_default, InferMode, Resolver};
use crate::error::{Result, SchemaError};
use crate::model::{ParamItemObject, ParamLocation, ParamObject, SchemaObject};
use crate::reflect::{Kind, TypeDescriptor};
use tracing::warn;

impl Resolver {
    /// Flat operation parameters derived from the fields of a struct.
    ///
    /// A field becomes a parameter when it carries a parameter name (or, failing that, a path
    /// parameter name). Parameters are required unless configured otherwise and are read
    /// from the query string unless a location is given or the field names a path parameter.
    /// Types supplying their own parameters are used verbatim.
    ///
    /// # Returns
    ///
    /// The name of the parameter struct and its parameters in field order.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidParameterSource`] if `desc` is not a struct
    /// - [`SchemaError::InvalidParameterShape`] if a field resolves to an object, an untyped
    ///   value, or an array of objects or arrays
    pub fn parameters(&self, desc: &TypeDescriptor) -> Result<(String, Vec<ParamObject>)> {
        if let Some(provide) = desc.custom_parameters {
            return provide().map_err(|source| SchemaError::CustomParameters {
                type_name: desc.qualified_name.to_string(),
                source,
            });
        }

        let desc = desc.clone().deref_pointers();
        if let Some(target) = self.mapped(&desc) {
            return self.parameters(&target);
        }

        let Kind::Struct(fields) = &desc.kind else {
            return Err(SchemaError::InvalidParameterSource {
                type_name: desc.qualified_name.to_string(),
            });
        };

        let owner = desc.display_name().to_string();
        let mut params = Vec::new();

        for field in fields {
            if !field.exported || field.embedded {
                continue;
            }

            let (name, in_path) = match (field.config.param_name, field.config.path_name) {
                (Some(name), _) => (name, false),
                (None, Some(name)) => (name, true),
                (None, None) => continue,
            };

            let ty = (field.ty)();
            let mut param = ParamObject {
                name: name.to_string(),
                ..Default::default()
            };

            if self.reflect_types() {
                param.extensions.insert("x-rust-name", field.name);
                param.extensions.insert("x-rust-type", ty.qualified_name);
            }

            let enumer = ty
                .enum_values
                .or_else(|| ty.clone().deref_pointers().enum_values);
            if let Some(values) = enumer {
                param.enum_values = values();
            }

            if let Some(description) = field.config.description {
                param.description = description.to_string();
            }

            param.required = field.config.required.unwrap_or(true);
            param.location = match field.config.location {
                Some(location) => location,
                None if in_path => ParamLocation::Path,
                None => ParamLocation::Query,
            };

            let schema = match field.config.schema_type {
                Some(common) => SchemaObject::from_type_name(common),
                None => self.infer(&ty, InferMode::Parameter)?,
            };

            let shape_error = |reason: &str| SchemaError::InvalidParameterShape {
                owner: owner.clone(),
                field: field.name.to_string(),
                reason: reason.to_string(),
            };

            if schema.schema_type.is_empty() {
                return Err(shape_error("parameters cannot be objects or untyped values"));
            }

            param.param_type = schema.schema_type.clone();
            param.format = schema.format.clone();

            if schema.schema_type == "array" {
                if let Some(items) = &schema.items {
                    if items.is_reference()
                        || items.schema_type == "array"
                        || items.schema_type.is_empty()
                    {
                        return Err(shape_error(
                            "array parameters cannot hold objects or nested arrays",
                        ));
                    }
                    param.items = Some(ParamItemObject {
                        item_type: items.schema_type.clone(),
                        format: items.format.clone(),
                        ..Default::default()
                    });
                    param.collection_format = "multi".to_string();
                }
            }

            if let Some(text) = field.config.default {
                match parse_default(&ty, text) {
                    Ok(value) => param.default = Some(value),
                    Err(err) => warn!(
                        parameter = %param.name,
                        default = %text,
                        error = %err,
                        "ignoring unparsable default value"
                    ),
                }
            }

            params.push(param);
        }

        Ok((owner, params))
    }
}
