//! Serializable Swagger 2.0 object model.
//!
//! Field names, omission rules and key ordering match what Swagger tooling expects:
//! every map is a `BTreeMap` so the emitted JSON has sorted keys and is stable across runs.
//! Objects that accept vendor extensions carry an [`Extensions`] map flattened into them.

mod document;
mod extensions;
mod schema;

pub use document::{
    ApiKeyLocation, ContactObject, Document, EnumValues, InfoObject, LicenseObject, OAuth2Flow,
    OperationObject, ParamItemObject, ParamLocation, ParamObject, PathItem, ResponseObject,
    SecurityDefinition, SecurityRequirement, SecurityType, ServiceType,
};
pub use extensions::Extensions;
pub use schema::{SchemaObject, REF_DEFINITION_PREFIX};
